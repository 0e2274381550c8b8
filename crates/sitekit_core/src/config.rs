use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SITE_NAME: &str = "Corporate Site";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_LEGAL_ROUTES: [&str; 2] = ["/privacy", "/terms"];

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub sitemap: SitemapSection,
    #[serde(default)]
    pub public_structure: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct SiteSection {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub url: Option<String>,
    pub language: Option<String>,
}

/// Optional overrides for the project layout, relative to the project root.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct PathsSection {
    pub static_route_meta: Option<String>,
    pub news: Option<String>,
    pub works: Option<String>,
    pub route_constants: Option<String>,
    pub router_source: Option<String>,
    pub public_dir: Option<String>,
    pub build_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct SitemapSection {
    pub legal_routes: Option<Vec<String>>,
}

/// Site identity after env and default resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    pub name: String,
    pub legal_name: String,
    pub url: String,
    pub language: String,
}

impl SiteConfig {
    /// Resolve the site origin: env SITE_URL > config. Trailing slashes are stripped.
    pub fn site_url(&self) -> Option<String> {
        if let Ok(value) = env::var("SITE_URL") {
            let trimmed = value.trim().trim_end_matches('/').to_string();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
        self.site
            .url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
    }

    pub fn identity(&self) -> Result<SiteIdentity> {
        let Some(url) = self.site_url() else {
            bail!("site url is not configured; set [site].url in config.toml or SITE_URL");
        };
        if !is_http_url(&url) {
            bail!("site url must be an absolute http(s) URL: {url}");
        }
        let name = non_empty(self.site.name.as_deref()).unwrap_or(DEFAULT_SITE_NAME);
        Ok(SiteIdentity {
            name: name.to_string(),
            legal_name: non_empty(self.site.legal_name.as_deref())
                .unwrap_or(name)
                .to_string(),
            url,
            language: non_empty(self.site.language.as_deref())
                .unwrap_or(DEFAULT_LANGUAGE)
                .to_string(),
        })
    }

    pub fn legal_routes(&self) -> Vec<String> {
        match &self.sitemap.legal_routes {
            Some(routes) => routes.clone(),
            None => DEFAULT_LEGAL_ROUTES
                .iter()
                .map(|route| (*route).to_string())
                .collect(),
        }
    }

    /// Asset directories advertised in `ai-context.json`.
    pub fn public_structure(&self) -> BTreeMap<String, String> {
        if !self.public_structure.is_empty() {
            return self.public_structure.clone();
        }
        [
            ("images", "/images/"),
            ("videos", "/videos/"),
            ("fonts", "/fonts/"),
            ("favicon", "/favicon.ico"),
            ("robots", "/robots.txt"),
            ("sitemap", "/sitemap.xml"),
            ("llms", "/llms.txt"),
            ("aiContext", "/ai-context.json"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
    }

    pub fn render_materialized() -> String {
        "# sitekit configuration (materialized by `sitekit init`)\n\n[site]\nname = \"Corporate Site\"\n# legal_name = \"Corporate Site Co., Ltd.\"\nurl = \"https://www.example.com\"\nlanguage = \"en\"\n\n# Paths are relative to the project root.\n[paths]\n# static_route_meta = \"src/data/staticRouteMeta.json\"\n# news = \"src/data/news.json\"\n# works = \"src/data/works.json\"\n# route_constants = \"src/constants/routes.ts\"\n# router_source = \"src/App.tsx\"\n# public_dir = \"public\"\n# build_dir = \"build\"\n\n[sitemap]\nlegal_routes = [\"/privacy\", \"/terms\"]\n"
            .to_string()
    }
}

/// Load and parse a SiteConfig from a TOML file. Returns default if file doesn't exist.
pub fn load_config(config_path: &Path) -> Result<SiteConfig> {
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: SiteConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(parsed)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
