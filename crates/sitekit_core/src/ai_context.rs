use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::SiteIdentity;
use crate::content::{ContentSources, NewsItem, WorkItem};
use crate::manifest::{RouteManifest, alias_routes, noindex_routes};

pub const EPOCH_TIMESTAMP: &str = "1970-01-01T00:00:00.000Z";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiContext {
    pub generated_at: String,
    pub site: SiteSummary,
    pub routes: RouteSummary,
    pub route_meta: RouteMetaSummary,
    pub content: ContentSummary,
    pub public_structure: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub name: String,
    pub legal_name: String,
    pub url: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub base_routes: Vec<String>,
    pub sitemap_routes: Vec<String>,
    pub canonical_urls: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetaSummary {
    pub source: String,
    pub alias_routes: Vec<String>,
    pub noindex_routes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub news: CollectionSummary,
    pub works: CollectionSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub source: String,
    pub count: usize,
    pub slugs: Vec<String>,
}

/// Display paths of the JSON inputs, recorded inside the generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLabels {
    pub static_route_meta: String,
    pub news: String,
    pub works: String,
}

/// `YYYY.MM.DD` or a bare `YYYY` as an ISO calendar date; anything else is `None`.
pub fn to_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    match parts.as_slice() {
        [year, month, day] => {
            if ![year, month, day]
                .iter()
                .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
            {
                return None;
            }
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
        }
        [year] if year.len() == 4 && year.chars().all(|ch| ch.is_ascii_digit()) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1)
        }
        _ => None,
    }
}

/// Latest news date or work year as an ISO-8601 timestamp at midnight UTC.
pub fn generated_at(news: &[NewsItem], works: &[WorkItem]) -> String {
    news.iter()
        .map(|item| item.date.as_str())
        .chain(works.iter().map(|item| item.year.as_str()))
        .filter_map(to_iso_date)
        .max()
        .map(|date| format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")))
        .unwrap_or_else(|| EPOCH_TIMESTAMP.to_string())
}

pub fn build_ai_context(
    site: &SiteIdentity,
    sources: &ContentSources,
    manifest: &RouteManifest,
    labels: &SourceLabels,
    public_structure: BTreeMap<String, String>,
) -> AiContext {
    let sitemap_routes = manifest.sitemap_routes();
    let canonical_urls = manifest.canonical_urls(&site.url);
    AiContext {
        generated_at: generated_at(&sources.news, &sources.works),
        site: SiteSummary {
            name: site.name.clone(),
            legal_name: site.legal_name.clone(),
            url: site.url.clone(),
            language: site.language.clone(),
        },
        routes: RouteSummary {
            base_routes: manifest.base_routes().to_vec(),
            count: canonical_urls.len(),
            sitemap_routes,
            canonical_urls,
        },
        route_meta: RouteMetaSummary {
            source: labels.static_route_meta.clone(),
            alias_routes: alias_routes(&sources.static_routes),
            noindex_routes: noindex_routes(&sources.static_routes),
        },
        content: ContentSummary {
            news: CollectionSummary {
                source: labels.news.clone(),
                count: sources.news.len(),
                slugs: sources.news.iter().map(|item| item.slug.clone()).collect(),
            },
            works: CollectionSummary {
                source: labels.works.clone(),
                count: sources.works.len(),
                slugs: sources.works.iter().map(|item| item.slug.clone()).collect(),
            },
        },
        public_structure,
    }
}

pub fn render_llms_txt(context: &AiContext) -> String {
    let mut lines = vec![
        format!("# {}", context.site.name),
        String::new(),
        format!(
            "> Official website of {}. Canonical origin: {}",
            context.site.legal_name, context.site.url
        ),
        String::new(),
        format!("Language: {}", context.site.language),
        format!("Last content update: {}", context.generated_at),
        String::new(),
        "## Canonical Pages".to_string(),
        String::new(),
    ];
    lines.extend(context.routes.canonical_urls.iter().map(|url| format!("- {url}")));

    lines.extend([
        String::new(),
        "## Dynamic Content".to_string(),
        String::new(),
        format!(
            "- News articles: {} (path pattern /news/{{slug}})",
            context.content.news.count
        ),
        format!(
            "- Case studies: {} (path pattern /works/{{slug}})",
            context.content.works.count
        ),
        String::new(),
        "## Canonical Notes".to_string(),
        String::new(),
        "- Legacy case-study paths /work/{slug} are served for compatibility; the canonical form is /works/{slug}.".to_string(),
        format!(
            "- Alias routes (canonical elsewhere): {}",
            join_or_none(&context.route_meta.alias_routes)
        ),
        format!(
            "- Noindex routes: {}",
            join_or_none(&context.route_meta.noindex_routes)
        ),
        String::new(),
        "## Data Sources".to_string(),
        String::new(),
        format!("- Route metadata: {}", context.route_meta.source),
        format!("- News: {}", context.content.news.source),
        format!("- Case studies: {}", context.content.works.source),
        "- Structured context: /ai-context.json".to_string(),
        "- Sitemap: /sitemap.xml".to_string(),
        String::new(),
        "## Guidance for AI Systems".to_string(),
        String::new(),
        "- Cite the canonical URLs listed above rather than alias or legacy paths.".to_string(),
        "- Do not index or quote pages listed as noindex.".to_string(),
        "- Treat /ai-context.json as the machine-readable source for route and content counts."
            .to_string(),
        "- Content dates reflect publication dates, not crawl dates.".to_string(),
    ]);

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiArtifactsReport {
    pub canonical_urls: usize,
    pub generated_at: String,
}

/// Overwrites `ai-context.json` and `llms.txt`.
pub fn write_ai_artifacts(
    context: &AiContext,
    ai_context_path: &Path,
    llms_txt_path: &Path,
) -> Result<AiArtifactsReport> {
    let mut json =
        serde_json::to_string_pretty(context).context("failed to serialize ai context")?;
    json.push('\n');
    write_artifact(ai_context_path, &json)?;
    write_artifact(llms_txt_path, &render_llms_txt(context))?;
    Ok(AiArtifactsReport {
        canonical_urls: context.routes.canonical_urls.len(),
        generated_at: context.generated_at.clone(),
    })
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}
