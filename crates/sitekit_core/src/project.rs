use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::ai_context::{AiArtifactsReport, SourceLabels, build_ai_context, write_ai_artifacts};
use crate::config::{SiteConfig, load_config};
use crate::content::ContentSources;
use crate::manifest::RouteManifest;
use crate::prerender::{ShellReport, write_route_shells};
use crate::runtime::{ProjectLayout, ResolvedPaths};
use crate::sitemap::write_sitemap;
use crate::verify::{ArtifactLabels, VerifyArtifacts, VerifyReport, verify};

/// Resolved paths, layout and config of one site checkout.
#[derive(Debug, Clone)]
pub struct Project {
    pub paths: ResolvedPaths,
    pub layout: ProjectLayout,
    pub config: SiteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapReport {
    pub path: PathBuf,
    pub urls: usize,
}

impl Project {
    pub fn open(paths: ResolvedPaths) -> Result<Self> {
        let config = load_config(&paths.config_path)?;
        let layout = ProjectLayout::resolve(&paths, &config.paths);
        Ok(Self {
            paths,
            layout,
            config,
        })
    }

    pub fn load_sources(&self) -> Result<ContentSources> {
        ContentSources::load(
            &self.layout.static_route_meta.path,
            &self.layout.news.path,
            &self.layout.works.path,
        )
    }

    pub fn source_labels(&self) -> SourceLabels {
        SourceLabels {
            static_route_meta: self.relative(&self.layout.static_route_meta.path),
            news: self.relative(&self.layout.news.path),
            works: self.relative(&self.layout.works.path),
        }
    }

    pub fn artifact_labels(&self) -> ArtifactLabels {
        ArtifactLabels {
            static_route_meta: self.relative(&self.layout.static_route_meta.path),
            route_constants: self.relative(&self.layout.route_constants.path),
            router_source: self.relative(&self.layout.router_source.path),
            sitemap: self.relative(&self.layout.sitemap_path()),
            ai_context: self.relative(&self.layout.ai_context_path()),
            llms_txt: self.relative(&self.layout.llms_txt_path()),
            robots_txt: self.relative(&self.layout.robots_txt_path()),
        }
    }

    pub fn generate_sitemap(&self, today: NaiveDate) -> Result<SitemapReport> {
        let identity = self.config.identity()?;
        let sources = self.load_sources()?;
        let manifest = build_manifest(&sources);
        let path = self.layout.sitemap_path();
        let urls = write_sitemap(
            &path,
            &identity.url,
            &manifest.sitemap_routes(),
            today,
            &self.config.legal_routes(),
        )?;
        Ok(SitemapReport { path, urls })
    }

    pub fn generate_ai_context(&self) -> Result<AiArtifactsReport> {
        let identity = self.config.identity()?;
        let sources = self.load_sources()?;
        let manifest = build_manifest(&sources);
        let context = build_ai_context(
            &identity,
            &sources,
            &manifest,
            &self.source_labels(),
            self.config.public_structure(),
        );
        write_ai_artifacts(
            &context,
            &self.layout.ai_context_path(),
            &self.layout.llms_txt_path(),
        )
    }

    pub fn generate_static_routes(&self) -> Result<ShellReport> {
        let sources = self.load_sources()?;
        let manifest = build_manifest(&sources);
        write_route_shells(
            &self.layout.shell_template_path(),
            &self.layout.build_dir.path,
            &manifest.prerender_routes(),
        )
    }

    pub fn verify(&self) -> Result<VerifyReport> {
        let identity = self.config.identity()?;
        let sources = self.load_sources()?;
        let artifacts = VerifyArtifacts::load(
            &self.layout.route_constants.path,
            &self.layout.router_source.path,
            &self.layout.sitemap_path(),
            &self.layout.ai_context_path(),
            &self.layout.llms_txt_path(),
            &self.layout.robots_txt_path(),
        )?;
        Ok(verify(
            &identity.url,
            &sources,
            &artifacts,
            &self.artifact_labels(),
        ))
    }

    fn relative(&self, target: &Path) -> String {
        self.layout.display_relative(&self.paths, target)
    }
}

pub fn build_manifest(sources: &ContentSources) -> RouteManifest {
    RouteManifest::build(&sources.static_routes, &sources.news, &sources.works)
}

/// Calendar date used for sitemap `lastmod`.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
