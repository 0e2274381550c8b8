use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

pub const SHELL_FILENAME: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellReport {
    pub written: Vec<String>,
    pub skipped_root: bool,
}

/// Copy the shell template (`build/index.html`) into a directory per
/// prerender route so static hosting can serve the SPA shell on direct
/// navigation. `/` already has it.
pub fn write_route_shells(
    template_path: &Path,
    build_dir: &Path,
    routes: &[String],
) -> Result<ShellReport> {
    if !template_path.is_file() {
        bail!(
            "{} not found. Run the application build before generating static routes.",
            template_path.display()
        );
    }
    let template = fs::read(template_path)
        .with_context(|| format!("failed to read {}", template_path.display()))?;

    let mut written = Vec::new();
    let mut skipped_root = false;
    for route in routes {
        if route == "/" {
            skipped_root = true;
            continue;
        }
        let target_dir = route_directory(build_dir, route)?;
        fs::create_dir_all(&target_dir)
            .with_context(|| format!("failed to create {}", target_dir.display()))?;
        let target = target_dir.join(SHELL_FILENAME);
        fs::write(&target, &template)
            .with_context(|| format!("failed to write {}", target.display()))?;
        written.push(route.clone());
    }

    Ok(ShellReport {
        written,
        skipped_root,
    })
}

/// Directory under `build_dir` mirroring `route`. Rejects anything that could
/// escape the build directory or that is still a route template.
pub fn route_directory(build_dir: &Path, route: &str) -> Result<PathBuf> {
    let Some(relative) = route.strip_prefix('/') else {
        bail!("route must start with '/': {route}");
    };
    let mut output = build_dir.to_path_buf();
    for segment in relative.trim_end_matches('/').split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            bail!("route has an empty or relative segment: {route}");
        }
        if segment.starts_with(':') || segment.contains('\\') || segment == "*" {
            bail!("route is not a concrete path: {route}");
        }
        output.push(segment);
    }
    Ok(output)
}

/// Routes that currently have a shell under `build_dir`, sorted.
pub fn list_route_shells(build_dir: &Path) -> Result<Vec<String>> {
    if !build_dir.exists() {
        return Ok(Vec::new());
    }
    let mut routes = Vec::new();
    for entry in WalkDir::new(build_dir).min_depth(2) {
        let entry = entry.with_context(|| format!("failed to walk {}", build_dir.display()))?;
        if !entry.file_type().is_file() || entry.file_name() != SHELL_FILENAME {
            continue;
        }
        let Some(parent) = entry.path().parent() else {
            continue;
        };
        let relative = parent.strip_prefix(build_dir).with_context(|| {
            format!(
                "failed to strip build dir {} from {}",
                build_dir.display(),
                parent.display()
            )
        })?;
        let segments: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().to_string())
            .collect();
        routes.push(format!("/{}", segments.join("/")));
    }
    routes.sort();
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn routes(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_string()).collect()
    }

    #[test]
    fn missing_shell_template_is_fatal() {
        let temp = tempdir().expect("tempdir");
        let error = write_route_shells(
            &temp.path().join(SHELL_FILENAME),
            temp.path(),
            &routes(&["/about"]),
        )
        .expect_err("must fail");
        assert!(error.to_string().contains("index.html not found"));
    }

    #[test]
    fn shells_mirror_route_paths() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("index.html"), "<div id=\"root\"></div>").expect("write");

        let report = write_route_shells(
            &temp.path().join(SHELL_FILENAME),
            temp.path(),
            &routes(&["/", "/about", "/news/launch", "/work/acme"]),
        )
        .expect("write shells");
        assert!(report.skipped_root);
        assert_eq!(report.written, routes(&["/about", "/news/launch", "/work/acme"]));
        assert_eq!(
            fs::read_to_string(temp.path().join("news/launch/index.html")).expect("read shell"),
            "<div id=\"root\"></div>"
        );

        let listed = list_route_shells(temp.path()).expect("list shells");
        assert_eq!(listed, routes(&["/about", "/news/launch", "/work/acme"]));
    }

    #[test]
    fn route_directory_rejects_escapes_and_templates() {
        let base = Path::new("/srv/build");
        assert!(route_directory(base, "/../etc").is_err());
        assert!(route_directory(base, "/news//x").is_err());
        assert!(route_directory(base, "/news/:slug").is_err());
        assert!(route_directory(base, "about").is_err());
        assert_eq!(
            route_directory(base, "/company/").expect("dir"),
            PathBuf::from("/srv/build/company")
        );
    }
}
