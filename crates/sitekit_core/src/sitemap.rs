use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::manifest::{canonical_url, normalize_route_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteMatch {
    Exact(&'static str),
    Prefix(&'static str),
    Legal,
    Any,
}

#[derive(Debug, Clone, Copy)]
struct RouteRule {
    matcher: RouteMatch,
    changefreq: &'static str,
    priority: &'static str,
}

/// Evaluated in order; the first matching rule wins.
const ROUTE_RULES: [RouteRule; 7] = [
    RouteRule {
        matcher: RouteMatch::Exact("/"),
        changefreq: "weekly",
        priority: "1.0",
    },
    RouteRule {
        matcher: RouteMatch::Prefix("/services"),
        changefreq: "weekly",
        priority: "0.9",
    },
    RouteRule {
        matcher: RouteMatch::Prefix("/news"),
        changefreq: "daily",
        priority: "0.8",
    },
    RouteRule {
        matcher: RouteMatch::Prefix("/works"),
        changefreq: "weekly",
        priority: "0.8",
    },
    RouteRule {
        matcher: RouteMatch::Exact("/contact"),
        changefreq: "weekly",
        priority: "0.7",
    },
    RouteRule {
        matcher: RouteMatch::Legal,
        changefreq: "yearly",
        priority: "0.5",
    },
    RouteRule {
        matcher: RouteMatch::Any,
        changefreq: "weekly",
        priority: "0.8",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

pub fn sitemap_entries(
    site_url: &str,
    routes: &[String],
    today: NaiveDate,
    legal_routes: &[String],
) -> Vec<SitemapEntry> {
    let lastmod = today.format("%Y-%m-%d").to_string();
    routes
        .iter()
        .map(|route| {
            let rule = rule_for(route, legal_routes);
            SitemapEntry {
                loc: canonical_url(site_url, route),
                lastmod: lastmod.clone(),
                changefreq: rule.changefreq,
                priority: rule.priority,
            }
        })
        .collect()
}

fn rule_for(route: &str, legal_routes: &[String]) -> RouteRule {
    for rule in ROUTE_RULES {
        let matched = match rule.matcher {
            RouteMatch::Exact(path) => route == path,
            RouteMatch::Prefix(prefix) => route.starts_with(prefix),
            RouteMatch::Legal => legal_routes.iter().any(|legal| legal == route),
            RouteMatch::Any => true,
        };
        if matched {
            return rule;
        }
    }
    ROUTE_RULES[ROUTE_RULES.len() - 1]
}

pub fn render_sitemap(
    site_url: &str,
    routes: &[String],
    today: NaiveDate,
    legal_routes: &[String],
) -> String {
    let mut output = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in sitemap_entries(site_url, routes, today, legal_routes) {
        output.push_str("  <url>\n");
        output.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        output.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
        output.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq
        ));
        output.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        output.push_str("  </url>\n");
    }
    output.push_str("</urlset>\n");
    output
}

/// Overwrites `path` with the rendered sitemap. Returns the number of `<url>` entries.
pub fn write_sitemap(
    path: &Path,
    site_url: &str,
    routes: &[String],
    today: NaiveDate,
    legal_routes: &[String],
) -> Result<usize> {
    let rendered = render_sitemap(site_url, routes, today, legal_routes);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(routes.len())
}

/// Text content of every `<loc>` element, entity-decoded and trimmed.
pub fn parse_sitemap_locs(xml: &str) -> Vec<String> {
    const OPEN: &str = "<loc>";
    const CLOSE: &str = "</loc>";
    let mut output = Vec::new();
    let mut index = 0usize;
    while let Some(start) = xml[index..].find(OPEN) {
        let value_start = index + start + OPEN.len();
        let Some(end) = xml[value_start..].find(CLOSE) else {
            break;
        };
        let raw = &xml[value_start..value_start + end];
        output.push(decode_xml(raw.trim()));
        index = value_start + end + CLOSE.len();
    }
    output
}

/// Convert a sitemap `<loc>` back to a route path relative to `site_url`.
/// The origin only matches on a host boundary; anything else keeps the full URL.
pub fn loc_to_route(loc: &str, site_url: &str) -> String {
    let origin = site_url.trim_end_matches('/');
    let path = match loc.strip_prefix(origin) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => loc,
    };
    if path.is_empty() {
        return "/".to_string();
    }
    normalize_route_path(path)
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn decode_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
