use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One hand-authored entry of the static route metadata table.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaticRouteMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub canonical_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_prerender: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_sitemap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image_path: Option<String>,
}

impl StaticRouteMeta {
    /// Prerender unless explicitly disabled.
    pub fn prerender(&self) -> bool {
        self.include_in_prerender != Some(false)
    }

    /// Listed in the sitemap only when explicitly enabled.
    pub fn in_sitemap(&self) -> bool {
        self.include_in_sitemap == Some(true)
    }

    pub fn is_noindex(&self) -> bool {
        self.robots
            .as_deref()
            .is_some_and(|robots| robots.to_ascii_lowercase().contains("noindex"))
    }
}

/// Route-keyed metadata table in authored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRouteTable {
    entries: Vec<(String, StaticRouteMeta)>,
}

impl StaticRouteTable {
    pub fn from_entries(entries: Vec<(String, StaticRouteMeta)>) -> Self {
        Self { entries }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("invalid static route JSON")?;
        let Some(object) = value.as_object() else {
            bail!("static route metadata must be a JSON object keyed by route");
        };
        let mut entries = Vec::with_capacity(object.len());
        for (route, meta) in object {
            let meta: StaticRouteMeta = serde_json::from_value(meta.clone())
                .with_context(|| format!("invalid metadata for route {route}"))?;
            entries.push((route.clone(), meta));
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StaticRouteMeta)> {
        self.entries
            .iter()
            .map(|(route, meta)| (route.as_str(), meta))
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(route, _)| route.as_str())
    }

    pub fn get(&self, route: &str) -> Option<&StaticRouteMeta> {
        self.entries
            .iter()
            .find(|(key, _)| key == route)
            .map(|(_, meta)| meta)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct NewsItem {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub cat: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub img: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct WorkItem {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub scope: Vec<String>,
}

/// All hand-authored JSON inputs of one run.
#[derive(Debug, Clone, Default)]
pub struct ContentSources {
    pub static_routes: StaticRouteTable,
    pub news: Vec<NewsItem>,
    pub works: Vec<WorkItem>,
}

impl ContentSources {
    pub fn load(static_route_meta: &Path, news: &Path, works: &Path) -> Result<Self> {
        Ok(Self {
            static_routes: load_static_route_table(static_route_meta)?,
            news: load_collection(news)?,
            works: load_collection(works)?,
        })
    }
}

pub fn load_static_route_table(path: &Path) -> Result<StaticRouteTable> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    StaticRouteTable::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_collection<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => Ok(vec![text]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                other => Err(serde::de::Error::custom(format!(
                    "expected string in list, found {other}"
                ))),
            })
            .collect(),
        other => Err(serde::de::Error::custom(format!(
            "expected string or list, found {other}"
        ))),
    }
}
