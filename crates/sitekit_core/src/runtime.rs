use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{PathsSection, SiteConfig};
use crate::prerender::SHELL_FILENAME;

pub const STATE_DIR_NAME: &str = ".sitekit";
pub const CONFIG_FILENAME: &str = "config.toml";

const ROOT_MARKER: &str = "src/data/staticRouteMeta.json";

pub const DEFAULT_STATIC_ROUTE_META: &str = "src/data/staticRouteMeta.json";
pub const DEFAULT_NEWS: &str = "src/data/news.json";
pub const DEFAULT_WORKS: &str = "src/data/works.json";
pub const DEFAULT_ROUTE_CONSTANTS: &str = "src/constants/routes.ts";
pub const DEFAULT_ROUTER_SOURCE: &str = "src/App.tsx";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_BUILD_DIR: &str = "build";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Flag,
    Env,
    Config,
    Heuristic,
    Default,
}

impl ValueSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::Config => "config",
            Self::Heuristic => "heuristic",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub project_root: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub cwd: PathBuf,
}

impl ResolutionContext {
    pub fn from_process() -> Result<Self> {
        let cwd = env::current_dir().context("failed to read current directory")?;
        Ok(Self { cwd })
    }
}

/// Project root, state directory and config file location.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub project_root: PathBuf,
    pub state_dir: PathBuf,
    pub config_path: PathBuf,
    pub root_source: ValueSource,
    pub config_source: ValueSource,
}

#[derive(Debug, Clone)]
pub struct LayoutEntry {
    pub path: PathBuf,
    pub source: ValueSource,
}

/// Every input and output file the generators and the verifier touch.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub static_route_meta: LayoutEntry,
    pub news: LayoutEntry,
    pub works: LayoutEntry,
    pub route_constants: LayoutEntry,
    pub router_source: LayoutEntry,
    pub public_dir: LayoutEntry,
    pub build_dir: LayoutEntry,
}

impl ProjectLayout {
    pub fn resolve(paths: &ResolvedPaths, overrides: &PathsSection) -> Self {
        let entry = |value: Option<&String>, default: &str| match value {
            Some(value) if !value.trim().is_empty() => LayoutEntry {
                path: absolutize(Path::new(value.trim()), &paths.project_root),
                source: ValueSource::Config,
            },
            _ => LayoutEntry {
                path: paths.project_root.join(default),
                source: ValueSource::Default,
            },
        };
        Self {
            static_route_meta: entry(
                overrides.static_route_meta.as_ref(),
                DEFAULT_STATIC_ROUTE_META,
            ),
            news: entry(overrides.news.as_ref(), DEFAULT_NEWS),
            works: entry(overrides.works.as_ref(), DEFAULT_WORKS),
            route_constants: entry(overrides.route_constants.as_ref(), DEFAULT_ROUTE_CONSTANTS),
            router_source: entry(overrides.router_source.as_ref(), DEFAULT_ROUTER_SOURCE),
            public_dir: entry(overrides.public_dir.as_ref(), DEFAULT_PUBLIC_DIR),
            build_dir: entry(overrides.build_dir.as_ref(), DEFAULT_BUILD_DIR),
        }
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.public_dir.path.join("sitemap.xml")
    }

    pub fn ai_context_path(&self) -> PathBuf {
        self.public_dir.path.join("ai-context.json")
    }

    pub fn llms_txt_path(&self) -> PathBuf {
        self.public_dir.path.join("llms.txt")
    }

    pub fn robots_txt_path(&self) -> PathBuf {
        self.public_dir.path.join("robots.txt")
    }

    pub fn shell_template_path(&self) -> PathBuf {
        self.build_dir.path.join(SHELL_FILENAME)
    }

    /// Path of `target` relative to the project root, for display inside artifacts.
    pub fn display_relative(&self, paths: &ResolvedPaths, target: &Path) -> String {
        target
            .strip_prefix(&paths.project_root)
            .map(normalize_for_display)
            .unwrap_or_else(|_| normalize_for_display(target))
    }

    pub fn diagnostics(&self) -> String {
        let rows = [
            ("static_route_meta", &self.static_route_meta),
            ("news", &self.news),
            ("works", &self.works),
            ("route_constants", &self.route_constants),
            ("router_source", &self.router_source),
            ("public_dir", &self.public_dir),
            ("build_dir", &self.build_dir),
        ];
        rows.iter()
            .map(|(label, entry)| {
                format!(
                    "{label}={} ({})",
                    normalize_for_display(&entry.path),
                    entry.source.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ResolvedPaths {
    pub fn diagnostics(&self) -> String {
        format!(
            "project_root={} ({})\nstate_dir={}\nconfig_path={} ({})",
            normalize_for_display(&self.project_root),
            self.root_source.as_str(),
            normalize_for_display(&self.state_dir),
            normalize_for_display(&self.config_path),
            self.config_source.as_str(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ProjectStatus {
    pub static_route_meta_exists: bool,
    pub news_exists: bool,
    pub works_exists: bool,
    pub route_constants_exists: bool,
    pub router_source_exists: bool,
    pub sitemap_exists: bool,
    pub ai_context_exists: bool,
    pub llms_txt_exists: bool,
    pub robots_txt_exists: bool,
    pub shell_template_exists: bool,
    pub config_exists: bool,
    pub warnings: Vec<String>,
}

pub fn inspect_project(paths: &ResolvedPaths, layout: &ProjectLayout) -> ProjectStatus {
    let static_route_meta_exists = layout.static_route_meta.path.exists();
    let news_exists = layout.news.path.exists();
    let works_exists = layout.works.path.exists();
    let route_constants_exists = layout.route_constants.path.exists();
    let router_source_exists = layout.router_source.path.exists();
    let robots_txt_exists = layout.robots_txt_path().exists();
    let shell_template_exists = layout.shell_template_path().exists();

    let mut warnings = Vec::new();
    for (exists, label) in [
        (static_route_meta_exists, "static route metadata"),
        (news_exists, "news collection"),
        (works_exists, "works collection"),
    ] {
        if !exists {
            warnings.push(format!("{label} is missing; generators will fail"));
        }
    }
    if !route_constants_exists || !router_source_exists {
        warnings.push(
            "router sources are missing; `sitekit verify` will fail to scan registrations"
                .to_string(),
        );
    }
    if !robots_txt_exists {
        warnings.push("robots.txt is missing from the public directory".to_string());
    }
    if !shell_template_exists {
        warnings.push(
            "build/index.html is missing; run the SPA build before `generate-static-routes`"
                .to_string(),
        );
    }

    ProjectStatus {
        static_route_meta_exists,
        news_exists,
        works_exists,
        route_constants_exists,
        router_source_exists,
        sitemap_exists: layout.sitemap_path().exists(),
        ai_context_exists: layout.ai_context_path().exists(),
        llms_txt_exists: layout.llms_txt_path().exists(),
        robots_txt_exists,
        shell_template_exists,
        config_exists: paths.config_path.exists(),
        warnings,
    }
}

pub fn resolve_paths(
    context: &ResolutionContext,
    overrides: &PathOverrides,
) -> Result<ResolvedPaths> {
    resolve_paths_with_lookup(context, overrides, |key| env::var(key).ok())
}

fn resolve_paths_with_lookup<F>(
    context: &ResolutionContext,
    overrides: &PathOverrides,
    lookup_env: F,
) -> Result<ResolvedPaths>
where
    F: Fn(&str) -> Option<String>,
{
    let (project_root, root_source) = resolve_project_root(context, overrides, &lookup_env);
    let state_dir = project_root.join(STATE_DIR_NAME);

    let (config_path, config_source) = if let Some(path) = overrides.config.as_deref() {
        (absolutize(path, &context.cwd), ValueSource::Flag)
    } else if let Some(value) = lookup_env("SITEKIT_CONFIG").filter(|v| !v.trim().is_empty()) {
        (
            absolutize(Path::new(value.trim()), &project_root),
            ValueSource::Env,
        )
    } else {
        (state_dir.join(CONFIG_FILENAME), ValueSource::Default)
    };

    Ok(ResolvedPaths {
        project_root,
        state_dir,
        config_path,
        root_source,
        config_source,
    })
}

#[derive(Debug, Clone)]
pub struct InitReport {
    pub created_dirs: Vec<PathBuf>,
    pub wrote_config: bool,
}

pub fn init_layout(paths: &ResolvedPaths, force: bool) -> Result<InitReport> {
    let mut created_dirs = Vec::new();
    if !paths.state_dir.exists() {
        fs::create_dir_all(&paths.state_dir)
            .with_context(|| format!("failed to create {}", paths.state_dir.display()))?;
        created_dirs.push(paths.state_dir.clone());
    }
    let wrote_config = write_text_file(
        &paths.config_path,
        &SiteConfig::render_materialized(),
        force,
    )?;
    Ok(InitReport {
        created_dirs,
        wrote_config,
    })
}

fn resolve_project_root<F>(
    context: &ResolutionContext,
    overrides: &PathOverrides,
    lookup_env: &F,
) -> (PathBuf, ValueSource)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = overrides.project_root.as_deref() {
        return (absolutize(path, &context.cwd), ValueSource::Flag);
    }

    if let Some(value) = lookup_env("SITEKIT_PROJECT_ROOT").filter(|v| !v.trim().is_empty()) {
        return (
            absolutize(Path::new(value.trim()), &context.cwd),
            ValueSource::Env,
        );
    }

    match detect_project_root_heuristic(&context.cwd) {
        Some(root) => (root, ValueSource::Heuristic),
        None => (context.cwd.clone(), ValueSource::Default),
    }
}

fn detect_project_root_heuristic(cwd: &Path) -> Option<PathBuf> {
    let mut seen = HashSet::new();
    for candidate in cwd.ancestors() {
        let key = normalize_for_display(candidate);
        if !seen.insert(key) {
            continue;
        }
        if candidate.join(STATE_DIR_NAME).is_dir() || candidate.join(ROOT_MARKER).is_file() {
            return Some(candidate.to_path_buf());
        }
    }
    None
}

fn write_text_file(path: &Path, content: &str, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    lexical_normalize(&joined)
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut output = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                output.pop();
            }
            other => output.push(other.as_os_str()),
        }
    }
    output
}

pub fn normalize_for_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
