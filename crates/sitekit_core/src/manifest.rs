//! Route manifest derivation.
//!
//! Every function here is a pure transform of the static route table and the
//! two content collections; nothing reads the filesystem.

use std::collections::HashSet;

use crate::content::{NewsItem, StaticRouteTable, WorkItem};

pub const NEWS_PREFIX: &str = "/news/";
pub const WORKS_PREFIX: &str = "/works/";
pub const LEGACY_WORK_PREFIX: &str = "/work/";

/// Stable set union: concatenates the inputs and keeps the first occurrence of
/// each route, compared by exact string equality.
pub fn stable_union<I, S>(routes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut output = Vec::new();
    for route in routes {
        let route = route.as_ref();
        if seen.insert(route.to_string()) {
            output.push(route.to_string());
        }
    }
    output
}

/// Static routes eligible for prerendering, in authored order.
pub fn base_routes(static_routes: &StaticRouteTable) -> Vec<String> {
    static_routes
        .iter()
        .filter(|(_, meta)| meta.prerender())
        .map(|(route, _)| route.to_string())
        .collect()
}

/// Static routes that opt into the sitemap, in authored order.
pub fn sitemap_static_routes(static_routes: &StaticRouteTable) -> Vec<String> {
    static_routes
        .iter()
        .filter(|(_, meta)| meta.in_sitemap())
        .map(|(route, _)| route.to_string())
        .collect()
}

pub fn news_route(slug: &str) -> String {
    format!("{NEWS_PREFIX}{slug}")
}

pub fn works_route(slug: &str) -> String {
    format!("{WORKS_PREFIX}{slug}")
}

pub fn legacy_work_route(slug: &str) -> String {
    format!("{LEGACY_WORK_PREFIX}{slug}")
}

/// `/news/{slug}` per news item, then `/works/{slug}` and `/work/{slug}` per work item.
pub fn dynamic_routes(news: &[NewsItem], works: &[WorkItem]) -> Vec<String> {
    let news_routes = news.iter().map(|item| news_route(&item.slug));
    let work_routes = works
        .iter()
        .flat_map(|item| [works_route(&item.slug), legacy_work_route(&item.slug)]);
    stable_union(news_routes.chain(work_routes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteManifest {
    base_routes: Vec<String>,
    sitemap_static_routes: Vec<String>,
    dynamic_routes: Vec<String>,
}

impl RouteManifest {
    pub fn build(static_routes: &StaticRouteTable, news: &[NewsItem], works: &[WorkItem]) -> Self {
        Self {
            base_routes: base_routes(static_routes),
            sitemap_static_routes: sitemap_static_routes(static_routes),
            dynamic_routes: dynamic_routes(news, works),
        }
    }

    /// BASE_ROUTES: prerender-eligible static routes, exported as
    /// `routes.baseRoutes` in `ai-context.json`.
    pub fn base_routes(&self) -> &[String] {
        &self.base_routes
    }

    pub fn dynamic_routes(&self) -> &[String] {
        &self.dynamic_routes
    }

    pub fn prerender_routes(&self) -> Vec<String> {
        stable_union(self.base_routes.iter().chain(self.dynamic_routes.iter()))
    }

    /// Legacy `/work/` aliases stay routable but are never advertised.
    pub fn sitemap_routes(&self) -> Vec<String> {
        let dynamic = self
            .dynamic_routes
            .iter()
            .filter(|route| !route.starts_with(LEGACY_WORK_PREFIX));
        stable_union(self.sitemap_static_routes.iter().chain(dynamic))
    }

    pub fn canonical_urls(&self, site_url: &str) -> Vec<String> {
        self.sitemap_routes()
            .iter()
            .map(|route| canonical_url(site_url, route))
            .collect()
    }
}

/// Strip trailing slashes; the root stays `/`.
pub fn normalize_route_path(route: &str) -> String {
    let trimmed = route.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Absolute URL for a route. Only the root carries a trailing slash.
pub fn canonical_url(site_url: &str, route: &str) -> String {
    let origin = site_url.trim_end_matches('/');
    if route == "/" {
        format!("{origin}/")
    } else {
        format!("{origin}{route}")
    }
}

/// Static routes whose canonical path points somewhere else.
pub fn alias_routes(static_routes: &StaticRouteTable) -> Vec<String> {
    static_routes
        .iter()
        .filter(|(route, meta)| meta.canonical_path != *route)
        .map(|(route, _)| route.to_string())
        .collect()
}

pub fn noindex_routes(static_routes: &StaticRouteTable) -> Vec<String> {
    static_routes
        .iter()
        .filter(|(_, meta)| meta.is_noindex())
        .map(|(route, _)| route.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticRouteMeta;

    fn meta(canonical: &str, sitemap: bool) -> StaticRouteMeta {
        StaticRouteMeta {
            title: "t".to_string(),
            description: "d".to_string(),
            canonical_path: canonical.to_string(),
            include_in_sitemap: Some(sitemap),
            ..StaticRouteMeta::default()
        }
    }

    fn news(slug: &str, date: &str) -> NewsItem {
        NewsItem {
            slug: slug.to_string(),
            date: date.to_string(),
            ..NewsItem::default()
        }
    }

    fn work(slug: &str) -> WorkItem {
        WorkItem {
            slug: slug.to_string(),
            ..WorkItem::default()
        }
    }

    fn sample_table() -> StaticRouteTable {
        StaticRouteTable::from_entries(vec![
            ("/".to_string(), meta("/", true)),
            ("/privacy".to_string(), meta("/privacy", false)),
        ])
    }

    #[test]
    fn manifest_orders_static_then_dynamic() {
        let manifest = RouteManifest::build(
            &sample_table(),
            &[news("launch", "2024.01.01")],
            &[work("acme")],
        );
        assert_eq!(
            manifest.sitemap_routes(),
            vec!["/", "/news/launch", "/works/acme"]
        );
        assert_eq!(
            manifest.prerender_routes(),
            vec!["/", "/privacy", "/news/launch", "/works/acme", "/work/acme"]
        );
        assert_eq!(
            manifest.dynamic_routes(),
            ["/news/launch", "/works/acme", "/work/acme"]
        );
    }

    #[test]
    fn legacy_alias_is_prerendered_but_not_advertised() {
        let manifest = RouteManifest::build(&sample_table(), &[], &[work("s"), work("t")]);
        let prerender = manifest.prerender_routes();
        let sitemap = manifest.sitemap_routes();
        for slug in ["s", "t"] {
            assert!(prerender.contains(&legacy_work_route(slug)));
            assert!(!sitemap.contains(&legacy_work_route(slug)));
            assert!(prerender.contains(&works_route(slug)));
            assert!(sitemap.contains(&works_route(slug)));
        }
    }

    #[test]
    fn sitemap_routes_are_prerendered_when_sitemap_statics_prerender() {
        let manifest = RouteManifest::build(
            &sample_table(),
            &[news("a", ""), news("b", "")],
            &[work("c")],
        );
        let prerender = manifest.prerender_routes();
        for route in manifest.sitemap_routes() {
            assert!(prerender.contains(&route), "{route} not prerendered");
        }
    }

    #[test]
    fn build_is_idempotent() {
        let table = sample_table();
        let first = RouteManifest::build(&table, &[news("a", "")], &[work("b")]);
        let second = RouteManifest::build(&table, &[news("a", "")], &[work("b")]);
        assert_eq!(first.prerender_routes(), second.prerender_routes());
        assert_eq!(first.sitemap_routes(), second.sitemap_routes());
    }

    #[test]
    fn duplicate_slugs_collapse_to_first_occurrence() {
        let routes = dynamic_routes(&[news("x", ""), news("x", "")], &[work("y"), work("y")]);
        assert_eq!(routes, vec!["/news/x", "/works/y", "/work/y"]);
    }

    #[test]
    fn stable_union_does_not_normalize() {
        assert_eq!(
            stable_union(["/a", "/a/", "/b", "/a"]),
            vec!["/a", "/a/", "/b"]
        );
    }

    #[test]
    fn prerender_opt_out_is_excluded_from_base_routes() {
        let mut hidden = meta("/draft", false);
        hidden.include_in_prerender = Some(false);
        let table = StaticRouteTable::from_entries(vec![
            ("/".to_string(), meta("/", true)),
            ("/draft".to_string(), hidden),
        ]);
        assert_eq!(base_routes(&table), vec!["/"]);
    }

    #[test]
    fn alias_and_noindex_routes() {
        let mut thanks = meta("/contact", false);
        thanks.robots = Some("NOINDEX".to_string());
        let table = StaticRouteTable::from_entries(vec![
            ("/".to_string(), meta("/", true)),
            ("/contact/thanks".to_string(), thanks),
        ]);
        assert_eq!(alias_routes(&table), vec!["/contact/thanks"]);
        assert_eq!(noindex_routes(&table), vec!["/contact/thanks"]);
    }

    #[test]
    fn normalize_and_canonical_url() {
        assert_eq!(normalize_route_path("/"), "/");
        assert_eq!(normalize_route_path("///"), "/");
        assert_eq!(normalize_route_path("/about/"), "/about");
        assert_eq!(canonical_url("https://x.example/", "/"), "https://x.example/");
        assert_eq!(
            canonical_url("https://x.example", "/about"),
            "https://x.example/about"
        );
    }
}
