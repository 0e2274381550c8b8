//! Cross-artifact consistency verification.
//!
//! Every check runs regardless of earlier failures; mismatches are collected
//! into a [`VerifyReport`]. Only unreadable or unparsable inputs are errors.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::is_http_url;
use crate::content::ContentSources;
use crate::manifest::{
    RouteManifest, alias_routes, noindex_routes, normalize_route_path, stable_union,
};
use crate::sitemap::{loc_to_route, parse_sitemap_locs};
use crate::source_scan::{parse_route_constants, resolve_registrations, scan_router_source};

pub const DYNAMIC_ROUTE_TEMPLATES: [&str; 3] = ["/news/:slug", "/works/:slug", "/work/:slug"];

/// Display names used in failure messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLabels {
    pub static_route_meta: String,
    pub route_constants: String,
    pub router_source: String,
    pub sitemap: String,
    pub ai_context: String,
    pub llms_txt: String,
    pub robots_txt: String,
}

impl Default for ArtifactLabels {
    fn default() -> Self {
        Self {
            static_route_meta: "src/data/staticRouteMeta.json".to_string(),
            route_constants: "src/constants/routes.ts".to_string(),
            router_source: "src/App.tsx".to_string(),
            sitemap: "public/sitemap.xml".to_string(),
            ai_context: "public/ai-context.json".to_string(),
            llms_txt: "public/llms.txt".to_string(),
            robots_txt: "public/robots.txt".to_string(),
        }
    }
}

/// Text of the already-generated artifacts and the scanned application sources.
#[derive(Debug, Clone)]
pub struct VerifyArtifacts {
    pub route_constants: String,
    pub router_source: String,
    pub sitemap_xml: String,
    pub ai_context: Value,
    pub llms_txt: String,
    pub robots_txt: String,
}

impl VerifyArtifacts {
    pub fn load(
        route_constants: &Path,
        router_source: &Path,
        sitemap: &Path,
        ai_context: &Path,
        llms_txt: &Path,
        robots_txt: &Path,
    ) -> Result<Self> {
        let ai_context_text = read_text(ai_context)?;
        Ok(Self {
            route_constants: read_text(route_constants)?,
            router_source: read_text(router_source)?,
            sitemap_xml: read_text(sitemap)?,
            ai_context: serde_json::from_str(&ai_context_text)
                .with_context(|| format!("failed to parse {}", ai_context.display()))?,
            llms_txt: read_text(llms_txt)?,
            robots_txt: read_text(robots_txt)?,
        })
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub name: &'static str,
    pub failures: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub checks: Vec<CheckSummary>,
    pub failures: Vec<String>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures numbered from 1, one per line.
    pub fn render_failures(&self) -> String {
        self.failures
            .iter()
            .enumerate()
            .map(|(index, failure)| format!("{}. {failure}", index + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn record(&mut self, name: &'static str, failures: Vec<String>) {
        self.checks.push(CheckSummary {
            name,
            failures: failures.len(),
        });
        self.failures.extend(failures);
    }
}

/// Compare two route lists as sets. Returns a failure message when either
/// side has entries the other lacks.
pub fn set_equality<E, A>(label: &str, expected: E, actual: A) -> Option<String>
where
    E: IntoIterator,
    E::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
{
    let expected = stable_union(expected);
    let actual = stable_union(actual);
    let expected_set: HashSet<&str> = expected.iter().map(String::as_str).collect();
    let actual_set: HashSet<&str> = actual.iter().map(String::as_str).collect();

    let missing: Vec<&str> = expected
        .iter()
        .map(String::as_str)
        .filter(|item| !actual_set.contains(item))
        .collect();
    let extra: Vec<&str> = actual
        .iter()
        .map(String::as_str)
        .filter(|item| !expected_set.contains(item))
        .collect();
    if missing.is_empty() && extra.is_empty() {
        return None;
    }
    Some(format!(
        "{label} mismatch. missing: {}; extra: {}",
        render_list(&missing),
        render_list(&extra)
    ))
}

fn render_list(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// Run every check against freshly recomputed routes. The exported
/// BASE_ROUTES list is the `routes.baseRoutes` array persisted in
/// `ai-context.json` by the last generation run.
pub fn verify(
    site_url: &str,
    sources: &ContentSources,
    artifacts: &VerifyArtifacts,
    labels: &ArtifactLabels,
) -> VerifyReport {
    let mut report = VerifyReport::default();
    let expected = RouteManifest::build(&sources.static_routes, &sources.news, &sources.works);
    let expected_sitemap = expected.sitemap_routes();
    let expected_canonical = expected.canonical_urls(site_url);
    let exported = string_array(&artifacts.ai_context, "routes", "baseRoutes");

    report.record("content collections", check_content(sources));
    report.record("static route metadata", check_static_meta(sources, labels));
    report.record(
        "base routes",
        check_base_routes(sources, exported.as_deref(), labels),
    );
    report.record(
        "sitemap-eligible static routes",
        check_sitemap_statics(sources, exported.as_deref()),
    );
    report.record("router registrations", check_router(sources, artifacts, labels));
    report.record(
        "sitemap.xml",
        check_sitemap_file(site_url, &expected_sitemap, artifacts, labels),
    );
    report.record(
        "ai-context.json",
        check_ai_context(
            sources,
            &expected_sitemap,
            &expected_canonical,
            artifacts,
            labels,
        ),
    );
    report.record("llms.txt", check_llms_txt(&expected_canonical, artifacts, labels));
    report.record("robots.txt", check_robots(site_url, artifacts, labels));
    report
}

fn check_content(sources: &ContentSources) -> Vec<String> {
    let mut failures = Vec::new();
    let collections = [
        (
            "news",
            sources
                .news
                .iter()
                .map(|item| item.slug.as_str())
                .collect::<Vec<_>>(),
        ),
        (
            "works",
            sources
                .works
                .iter()
                .map(|item| item.slug.as_str())
                .collect::<Vec<_>>(),
        ),
    ];
    for (collection, slugs) in collections {
        let mut seen = HashSet::new();
        for (index, slug) in slugs.iter().enumerate() {
            if slug.trim().is_empty() {
                failures.push(format!("{collection}[{index}] has an empty slug"));
                continue;
            }
            if slug
                .chars()
                .any(|ch| ch.is_whitespace() || matches!(ch, '/' | '?' | '#'))
            {
                failures.push(format!(
                    "{collection}[{index}] slug \"{slug}\" is not URL-safe"
                ));
            }
            if !seen.insert(*slug) {
                failures.push(format!("{collection} slug \"{slug}\" is not unique"));
            }
        }
    }
    failures
}

fn check_static_meta(sources: &ContentSources, labels: &ArtifactLabels) -> Vec<String> {
    let source = &labels.static_route_meta;
    let table = &sources.static_routes;
    let mut failures = Vec::new();
    if table.is_empty() {
        failures.push(format!("{source} has no routes"));
        return failures;
    }

    for (route, meta) in table.iter() {
        if !route.starts_with('/') {
            failures.push(format!("{source}: route key \"{route}\" must start with '/'"));
        }
        for (field, value) in [
            ("title", &meta.title),
            ("description", &meta.description),
            ("canonicalPath", &meta.canonical_path),
        ] {
            if value.trim().is_empty() {
                failures.push(format!("{source}: {route} is missing {field}"));
            }
        }
        if !meta.canonical_path.is_empty() && !meta.canonical_path.starts_with('/') {
            failures.push(format!(
                "{source}: {route} canonicalPath \"{}\" must start with '/'",
                meta.canonical_path
            ));
        }
        if let Some(image) = meta.og_image_path.as_deref()
            && !(image.starts_with('/') || is_http_url(image))
        {
            failures.push(format!(
                "{source}: {route} ogImagePath \"{image}\" must start with '/' or be an absolute http(s) URL"
            ));
        }
        if meta.in_sitemap() && meta.is_noindex() {
            failures.push(format!(
                "{source}: {route} is in the sitemap but robots is \"{}\"",
                meta.robots.as_deref().unwrap_or_default()
            ));
        }
        if meta.in_sitemap()
            && normalize_route_path(&meta.canonical_path) != normalize_route_path(route)
        {
            failures.push(format!(
                "{source}: {route} is in the sitemap but canonicalPath is \"{}\"",
                meta.canonical_path
            ));
        }
    }
    failures
}

fn check_base_routes(
    sources: &ContentSources,
    exported: Option<&[String]>,
    labels: &ArtifactLabels,
) -> Vec<String> {
    let Some(exported) = exported else {
        return vec![format!(
            "{} routes.baseRoutes (exported BASE_ROUTES) is missing or not an array of strings",
            labels.ai_context
        )];
    };
    let expected = sources
        .static_routes
        .iter()
        .filter(|(_, meta)| meta.include_in_prerender != Some(false))
        .map(|(route, _)| route);
    set_equality("BASE_ROUTES", expected, exported)
        .into_iter()
        .collect()
}

/// Reported by the base route check when the export is missing.
fn check_sitemap_statics(sources: &ContentSources, exported: Option<&[String]>) -> Vec<String> {
    let Some(exported) = exported else {
        return Vec::new();
    };
    let table = &sources.static_routes;
    let expected = table
        .iter()
        .filter(|(_, meta)| meta.include_in_sitemap == Some(true))
        .map(|(route, _)| route);
    let actual = exported
        .iter()
        .filter(|route| table.get(route).is_some_and(|meta| meta.in_sitemap()));
    set_equality("sitemap-eligible static routes", expected, actual)
        .into_iter()
        .collect()
}

fn check_router(
    sources: &ContentSources,
    artifacts: &VerifyArtifacts,
    labels: &ArtifactLabels,
) -> Vec<String> {
    let mut failures = Vec::new();
    let constants = parse_route_constants(&artifacts.route_constants);
    failures.extend(
        constants
            .problems
            .iter()
            .map(|problem| format!("{}: {problem}", labels.route_constants)),
    );

    let scan = scan_router_source(&artifacts.router_source);
    failures.extend(
        scan.problems
            .iter()
            .map(|problem| format!("{}: {problem}", labels.router_source)),
    );
    let (registered, problems) = resolve_registrations(&scan, &constants);
    failures.extend(
        problems
            .iter()
            .map(|problem| format!("{}: {problem}", labels.router_source)),
    );

    let concrete = registered
        .iter()
        .filter(|route| !route.contains(':') && route.as_str() != "*");
    let expected = sources.static_routes.routes().filter(|route| !route.contains(':'));
    failures.extend(set_equality(
        &format!("{} registered routes", labels.router_source),
        expected,
        concrete,
    ));

    for template in DYNAMIC_ROUTE_TEMPLATES {
        if !registered.iter().any(|route| route == template) {
            failures.push(format!(
                "{} does not register dynamic route {template}",
                labels.router_source
            ));
        }
    }
    failures
}

fn check_sitemap_file(
    site_url: &str,
    expected_sitemap: &[String],
    artifacts: &VerifyArtifacts,
    labels: &ArtifactLabels,
) -> Vec<String> {
    let actual = parse_sitemap_locs(&artifacts.sitemap_xml)
        .iter()
        .map(|loc| loc_to_route(loc, site_url))
        .collect::<Vec<_>>();
    set_equality(&format!("{} routes", labels.sitemap), expected_sitemap, actual)
        .into_iter()
        .collect()
}

fn check_ai_context(
    sources: &ContentSources,
    expected_sitemap: &[String],
    expected_canonical: &[String],
    artifacts: &VerifyArtifacts,
    labels: &ArtifactLabels,
) -> Vec<String> {
    let mut failures = Vec::new();
    let document = &artifacts.ai_context;
    let comparisons: [(&str, &str, Vec<String>); 4] = [
        ("routes", "sitemapRoutes", expected_sitemap.to_vec()),
        ("routes", "canonicalUrls", expected_canonical.to_vec()),
        ("routeMeta", "aliasRoutes", alias_routes(&sources.static_routes)),
        (
            "routeMeta",
            "noindexRoutes",
            noindex_routes(&sources.static_routes),
        ),
    ];

    for (section, key, expected_values) in comparisons {
        let label = format!("{} {section}.{key}", labels.ai_context);
        match string_array(document, section, key) {
            Some(actual) => failures.extend(set_equality(&label, &expected_values, &actual)),
            None => failures.push(format!("{label} is missing or not an array of strings")),
        }
    }
    failures
}

fn string_array(document: &Value, section: &str, key: &str) -> Option<Vec<String>> {
    document
        .get(section)?
        .get(key)?
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(ToString::to_string))
        .collect()
}

fn check_llms_txt(
    expected_canonical: &[String],
    artifacts: &VerifyArtifacts,
    labels: &ArtifactLabels,
) -> Vec<String> {
    let actual: Vec<&str> = artifacts
        .llms_txt
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("- https://"))
        .map(|line| line.trim_start_matches("- "))
        .collect();
    set_equality(
        &format!("{} canonical URLs", labels.llms_txt),
        expected_canonical,
        actual,
    )
    .into_iter()
    .collect()
}

fn check_robots(
    site_url: &str,
    artifacts: &VerifyArtifacts,
    labels: &ArtifactLabels,
) -> Vec<String> {
    let directive = format!("Sitemap: {}/sitemap.xml", site_url.trim_end_matches('/'));
    if artifacts
        .robots_txt
        .to_ascii_lowercase()
        .contains(&directive.to_ascii_lowercase())
    {
        Vec::new()
    } else {
        vec![format!("{} is missing \"{directive}\"", labels.robots_txt)]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::ai_context::{SourceLabels, build_ai_context, render_llms_txt};
    use crate::config::SiteIdentity;
    use crate::content::{NewsItem, StaticRouteMeta, StaticRouteTable, WorkItem};
    use crate::sitemap::render_sitemap;

    const SITE: &str = "https://acme.example";

    const CONSTANTS: &str = "export const ROUTES = {\n  HOME: '/',\n  ABOUT: '/about',\n  PRIVACY: '/privacy',\n  COMPANY: '/company',\n};\n";

    const ROUTER: &str = r#"
<Routes>
  <Route path={ROUTES.HOME} element={<Home />} />
  <Route path={ROUTES.ABOUT} element={<About />} />
  <Route path={ROUTES.PRIVACY} element={<Privacy />} />
  <Route path={ROUTES.COMPANY} element={<Navigate to="/about" />} />
  <Route path="/news/:slug" element={<NewsDetail />} />
  <Route path="/works/:slug" element={<WorkDetail />} />
  <Route path="/work/:slug" element={<WorkDetail />} />
  <Route path="*" element={<NotFound />} />
</Routes>
"#;

    fn route(canonical: &str, sitemap: bool) -> StaticRouteMeta {
        StaticRouteMeta {
            title: "Title".to_string(),
            description: "Description".to_string(),
            canonical_path: canonical.to_string(),
            include_in_sitemap: Some(sitemap),
            ..StaticRouteMeta::default()
        }
    }

    fn sources() -> ContentSources {
        ContentSources {
            static_routes: StaticRouteTable::from_entries(vec![
                ("/".to_string(), route("/", true)),
                ("/about".to_string(), route("/about", true)),
                ("/privacy".to_string(), route("/privacy", false)),
                ("/company".to_string(), route("/company", false)),
            ]),
            news: vec![NewsItem {
                slug: "launch".to_string(),
                date: "2024.01.01".to_string(),
                ..NewsItem::default()
            }],
            works: vec![WorkItem {
                slug: "acme".to_string(),
                year: "2022".to_string(),
                ..WorkItem::default()
            }],
        }
    }

    fn generated(sources: &ContentSources) -> VerifyArtifacts {
        let manifest = RouteManifest::build(&sources.static_routes, &sources.news, &sources.works);
        let identity = SiteIdentity {
            name: "Acme".to_string(),
            legal_name: "Acme Inc.".to_string(),
            url: SITE.to_string(),
            language: "en".to_string(),
        };
        let context = build_ai_context(
            &identity,
            sources,
            &manifest,
            &SourceLabels {
                static_route_meta: "src/data/staticRouteMeta.json".to_string(),
                news: "src/data/news.json".to_string(),
                works: "src/data/works.json".to_string(),
            },
            BTreeMap::new(),
        );
        VerifyArtifacts {
            route_constants: CONSTANTS.to_string(),
            router_source: ROUTER.to_string(),
            sitemap_xml: render_sitemap(
                SITE,
                &manifest.sitemap_routes(),
                NaiveDate::from_ymd_opt(2026, 1, 2).expect("date"),
                &[],
            ),
            ai_context: serde_json::to_value(&context).expect("serialize"),
            llms_txt: render_llms_txt(&context),
            robots_txt: "User-agent: *\nAllow: /\n\nsitemap: https://ACME.example/sitemap.xml\n"
                .to_string(),
        }
    }

    fn run(sources: &ContentSources, artifacts: &VerifyArtifacts) -> VerifyReport {
        verify(SITE, sources, artifacts, &ArtifactLabels::default())
    }

    #[test]
    fn freshly_generated_artifacts_pass() {
        let sources = sources();
        let report = run(&sources, &generated(&sources));
        assert!(report.passed(), "{}", report.render_failures());
        assert_eq!(report.checks.len(), 9);
    }

    #[test]
    fn dropped_sitemap_entry_is_reported_once() {
        let sources = sources();
        let mut artifacts = generated(&sources);
        artifacts.sitemap_xml = artifacts
            .sitemap_xml
            .replace("<loc>https://acme.example/news/launch</loc>", "");

        let report = run(&sources, &artifacts);
        assert_eq!(report.failures.len(), 1, "{}", report.render_failures());
        assert_eq!(
            report.failures[0],
            "public/sitemap.xml routes mismatch. missing: /news/launch; extra: none"
        );
    }

    #[test]
    fn alias_drift_is_reported_against_ai_context() {
        let mut sources = sources();
        let artifacts = generated(&sources);
        sources.static_routes = StaticRouteTable::from_entries(vec![
            ("/".to_string(), route("/", true)),
            ("/about".to_string(), route("/about", true)),
            ("/privacy".to_string(), route("/privacy", false)),
            ("/company".to_string(), route("/about", false)),
        ]);

        let report = run(&sources, &artifacts);
        assert_eq!(report.failures.len(), 1, "{}", report.render_failures());
        assert_eq!(
            report.failures[0],
            "public/ai-context.json routeMeta.aliasRoutes mismatch. missing: /company; extra: none"
        );

        let regenerated = generated(&sources);
        assert!(run(&sources, &regenerated).passed());
    }

    #[test]
    fn structural_violations_are_accumulated() {
        let mut sources = sources();
        let mut noindexed = route("/about", true);
        noindexed.robots = Some("NOINDEX".to_string());
        let mut pointed = route("/", true);
        pointed.og_image_path = Some("og.png".to_string());
        let mut blank = route("", false);
        blank.title = " ".to_string();
        let mut sitemap_alias = route("/about", true);
        sitemap_alias.include_in_prerender = Some(true);
        sources.static_routes = StaticRouteTable::from_entries(vec![
            ("/".to_string(), pointed),
            ("/about".to_string(), noindexed),
            ("privacy".to_string(), blank),
            ("/company".to_string(), sitemap_alias),
        ]);

        let failures = check_static_meta(&sources, &ArtifactLabels::default());
        assert!(failures.iter().any(|f| f.contains("ogImagePath \"og.png\"")));
        assert!(failures.iter().any(|f| f.contains("/about is in the sitemap but robots")));
        assert!(failures.iter().any(|f| f.contains("\"privacy\" must start with '/'")));
        assert!(failures.iter().any(|f| f.contains("privacy is missing title")));
        assert!(failures.iter().any(|f| f.contains("privacy is missing canonicalPath")));
        assert!(
            failures
                .iter()
                .any(|f| f.contains("/company is in the sitemap but canonicalPath is \"/about\""))
        );
        assert_eq!(failures.len(), 6, "{failures:?}");
    }

    #[test]
    fn empty_metadata_table_is_reported() {
        let mut sources = sources();
        sources.static_routes = StaticRouteTable::default();
        let failures = check_static_meta(&sources, &ArtifactLabels::default());
        assert_eq!(failures, vec!["src/data/staticRouteMeta.json has no routes"]);
    }

    #[test]
    fn exported_base_routes_drift_is_reported() {
        let sources = sources();
        let stale = vec!["/".to_string(), "/retired".to_string()];
        let failures =
            check_base_routes(&sources, Some(stale.as_slice()), &ArtifactLabels::default());
        assert_eq!(
            failures,
            vec!["BASE_ROUTES mismatch. missing: /about, /privacy, /company; extra: /retired"]
        );
        let sitemap_failures = check_sitemap_statics(&sources, Some(stale.as_slice()));
        assert_eq!(
            sitemap_failures,
            vec!["sitemap-eligible static routes mismatch. missing: /about; extra: none"]
        );
    }

    #[test]
    fn stale_base_routes_export_is_reported() {
        let mut sources = sources();
        let artifacts = generated(&sources);
        let mut draft = route("/privacy", false);
        draft.include_in_prerender = Some(false);
        sources.static_routes = StaticRouteTable::from_entries(vec![
            ("/".to_string(), route("/", true)),
            ("/about".to_string(), route("/about", true)),
            ("/privacy".to_string(), draft),
            ("/company".to_string(), route("/company", false)),
        ]);

        let report = run(&sources, &artifacts);
        assert_eq!(
            report.failures,
            vec!["BASE_ROUTES mismatch. missing: none; extra: /privacy".to_string()]
        );
    }

    #[test]
    fn missing_base_routes_export_is_reported() {
        let sources = sources();
        let failures = check_base_routes(&sources, None, &ArtifactLabels::default());
        assert_eq!(
            failures,
            vec![
                "public/ai-context.json routes.baseRoutes (exported BASE_ROUTES) is missing or not an array of strings"
            ]
        );
        assert!(check_sitemap_statics(&sources, None).is_empty());
    }

    #[test]
    fn router_drift_and_missing_templates_are_reported() {
        let sources = sources();
        let mut artifacts = generated(&sources);
        artifacts.router_source = artifacts
            .router_source
            .replace("<Route path=\"/work/:slug\" element={<WorkDetail />} />", "")
            .replace("ROUTES.PRIVACY", "ROUTES.LEGAL")
            .replace("</Routes>", "<Route path=\"/careers\" element={<Careers />} />\n</Routes>");

        let report = run(&sources, &artifacts);
        let failures = &report.failures;
        assert_eq!(failures.len(), 3, "{}", report.render_failures());
        assert!(failures[0].contains("ROUTES.LEGAL"));
        assert_eq!(
            failures[1],
            "src/App.tsx registered routes mismatch. missing: /privacy; extra: /careers"
        );
        assert_eq!(failures[2], "src/App.tsx does not register dynamic route /work/:slug");
    }

    #[test]
    fn llms_and_robots_drift_are_reported() {
        let sources = sources();
        let mut artifacts = generated(&sources);
        artifacts.llms_txt.push_str("- https://acme.example/stale\n");
        artifacts.robots_txt = "User-agent: *\n".to_string();

        let report = run(&sources, &artifacts);
        assert_eq!(
            report.failures,
            vec![
                "public/llms.txt canonical URLs mismatch. missing: none; extra: https://acme.example/stale".to_string(),
                "public/robots.txt is missing \"Sitemap: https://acme.example/sitemap.xml\"".to_string(),
            ]
        );
    }

    #[test]
    fn malformed_ai_context_keys_are_failures_not_errors() {
        let sources = sources();
        let mut artifacts = generated(&sources);
        artifacts.ai_context = serde_json::json!({ "routes": { "sitemapRoutes": "nope" } });
        let report = run(&sources, &artifacts);
        assert_eq!(report.failures.len(), 5, "{}", report.render_failures());
        assert!(report.failures[0].contains("routes.baseRoutes (exported BASE_ROUTES)"));
        assert!(
            report.failures[1]
                .contains("routes.sitemapRoutes is missing or not an array of strings")
        );
    }

    #[test]
    fn duplicate_and_empty_slugs_are_reported() {
        let mut sources = sources();
        sources.news.push(NewsItem {
            slug: "launch".to_string(),
            ..NewsItem::default()
        });
        sources.works.push(WorkItem::default());
        let failures = check_content(&sources);
        assert_eq!(
            failures,
            vec![
                "news slug \"launch\" is not unique".to_string(),
                "works[1] has an empty slug".to_string(),
            ]
        );
    }

    #[test]
    fn set_equality_ignores_order_and_duplicates() {
        assert_eq!(set_equality("x", ["/a", "/b"], ["/b", "/a", "/a"]), None);
        assert_eq!(
            set_equality("x", ["/a", "/b"], ["/c", "/a"]),
            Some("x mismatch. missing: /b; extra: /c".to_string())
        );
    }

    #[test]
    fn render_failures_numbers_from_one() {
        let report = VerifyReport {
            checks: Vec::new(),
            failures: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(report.render_failures(), "1. first\n2. second");
    }
}
