use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use sitekit_core::prerender::list_route_shells;
use sitekit_core::project::{Project, build_manifest, today_utc};
use sitekit_core::runtime::{
    PathOverrides, ResolutionContext, ResolvedPaths, init_layout, inspect_project, resolve_paths,
};

#[derive(Debug, Parser)]
#[command(
    name = "sitekit",
    version,
    about = "Route manifest, sitemap/AI-context generation and consistency checks for a static SPA"
)]
struct Cli {
    #[arg(long, global = true, value_name = "PATH")]
    project_root: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Print resolved runtime diagnostics")]
    diagnostics: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone)]
struct RuntimeOptions {
    project_root: Option<PathBuf>,
    config: Option<PathBuf>,
    diagnostics: bool,
}

impl RuntimeOptions {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            project_root: cli.project_root.clone(),
            config: cli.config.clone(),
            diagnostics: cli.diagnostics,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Init(InitArgs),
    Status,
    Routes(RoutesArgs),
    #[command(name = "generate-sitemap")]
    GenerateSitemap,
    #[command(name = "generate-ai-context")]
    GenerateAiContext,
    #[command(name = "generate-static-routes")]
    GenerateStaticRoutes,
    /// Regenerate sitemap.xml, ai-context.json and llms.txt
    Generate,
    Verify,
}

#[derive(Debug, Args)]
struct InitArgs {
    #[arg(long, help = "Overwrite an existing config.toml")]
    force: bool,
}

#[derive(Debug, Args)]
struct RoutesArgs {
    #[arg(long, help = "Print route lists as JSON")]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = RuntimeOptions::from_cli(&cli);

    match cli.command {
        Some(Commands::Init(args)) => run_init(&runtime, args),
        Some(Commands::Status) => run_status(&runtime),
        Some(Commands::Routes(args)) => run_routes(&runtime, args),
        Some(Commands::GenerateSitemap) => run_generate_sitemap(&runtime),
        Some(Commands::GenerateAiContext) => run_generate_ai_context(&runtime),
        Some(Commands::GenerateStaticRoutes) => run_generate_static_routes(&runtime),
        Some(Commands::Generate) => {
            run_generate_sitemap(&runtime)?;
            run_generate_ai_context(&runtime)
        }
        Some(Commands::Verify) => run_verify(&runtime),
        None => {
            let mut command = Cli::command();
            command.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn run_init(runtime: &RuntimeOptions, args: InitArgs) -> Result<()> {
    let paths = resolve_runtime_paths(runtime)?;
    let report = init_layout(&paths, args.force)?;

    println!("Initialized sitekit layout");
    println!("project_root: {}", normalize_path(&paths.project_root));
    println!("state_dir: {}", normalize_path(&paths.state_dir));
    println!("config_path: {}", normalize_path(&paths.config_path));
    println!("created_dirs: {}", report.created_dirs.len());
    println!("wrote_config: {}", report.wrote_config);
    if !report.wrote_config {
        println!("hint: config already exists; pass --force to overwrite");
    }
    print_diagnostics(runtime, &paths, None);
    Ok(())
}

fn run_status(runtime: &RuntimeOptions) -> Result<()> {
    let project = open_project(runtime)?;
    let layout = &project.layout;
    let status = inspect_project(&project.paths, layout);

    println!("project status");
    println!("project_root: {}", normalize_path(&project.paths.project_root));
    println!(
        "site_url: {}",
        project
            .config
            .site_url()
            .unwrap_or_else(|| "<unset>".to_string())
    );
    println!("config_exists: {}", format_flag(status.config_exists));
    println!(
        "static_route_meta_exists: {}",
        format_flag(status.static_route_meta_exists)
    );
    println!("news_exists: {}", format_flag(status.news_exists));
    println!("works_exists: {}", format_flag(status.works_exists));
    println!(
        "route_constants_exists: {}",
        format_flag(status.route_constants_exists)
    );
    println!(
        "router_source_exists: {}",
        format_flag(status.router_source_exists)
    );
    println!("sitemap_exists: {}", format_flag(status.sitemap_exists));
    println!("ai_context_exists: {}", format_flag(status.ai_context_exists));
    println!("llms_txt_exists: {}", format_flag(status.llms_txt_exists));
    println!("robots_txt_exists: {}", format_flag(status.robots_txt_exists));
    println!(
        "shell_template_exists: {}",
        format_flag(status.shell_template_exists)
    );
    println!(
        "route_shells.count: {}",
        list_route_shells(&layout.build_dir.path)?.len()
    );
    if !status.warnings.is_empty() {
        println!("warnings:");
        for warning in &status.warnings {
            println!("  - {warning}");
        }
    }
    print_diagnostics(runtime, &project.paths, Some(&project));
    Ok(())
}

fn run_routes(runtime: &RuntimeOptions, args: RoutesArgs) -> Result<()> {
    let project = open_project(runtime)?;
    let sources = project.load_sources()?;
    let manifest = build_manifest(&sources);
    let prerender = manifest.prerender_routes();
    let sitemap = manifest.sitemap_routes();

    if args.json {
        let value = serde_json::json!({
            "baseRoutes": manifest.base_routes(),
            "dynamicRoutes": manifest.dynamic_routes(),
            "prerenderRoutes": prerender,
            "sitemapRoutes": sitemap,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("route manifest");
    print_route_list("base_routes", manifest.base_routes());
    print_route_list("dynamic_routes", manifest.dynamic_routes());
    print_route_list("prerender_routes", &prerender);
    print_route_list("sitemap_routes", &sitemap);
    print_diagnostics(runtime, &project.paths, Some(&project));
    Ok(())
}

fn run_generate_sitemap(runtime: &RuntimeOptions) -> Result<()> {
    let project = open_project(runtime)?;
    let report = project.generate_sitemap(today_utc())?;
    println!(
        "wrote {} ({} urls)",
        normalize_path(&report.path),
        report.urls
    );
    print_diagnostics(runtime, &project.paths, Some(&project));
    Ok(())
}

fn run_generate_ai_context(runtime: &RuntimeOptions) -> Result<()> {
    let project = open_project(runtime)?;
    let report = project.generate_ai_context()?;
    println!(
        "wrote {} and {} ({} canonical urls)",
        normalize_path(&project.layout.ai_context_path()),
        normalize_path(&project.layout.llms_txt_path()),
        report.canonical_urls
    );
    println!("generated_at: {}", report.generated_at);
    print_diagnostics(runtime, &project.paths, Some(&project));
    Ok(())
}

fn run_generate_static_routes(runtime: &RuntimeOptions) -> Result<()> {
    let project = open_project(runtime)?;
    let report = project.generate_static_routes()?;
    println!(
        "wrote {} route shells under {}",
        report.written.len(),
        normalize_path(&project.layout.build_dir.path)
    );
    if report.skipped_root {
        println!("skipped: / (served by the build's own index.html)");
    }
    print_diagnostics(runtime, &project.paths, Some(&project));
    Ok(())
}

fn run_verify(runtime: &RuntimeOptions) -> Result<()> {
    let project = open_project(runtime)?;
    let report = project.verify()?;
    print_diagnostics(runtime, &project.paths, Some(&project));

    if report.passed() {
        println!(
            "route consistency verified ({} checks passed)",
            report.checks.len()
        );
        return Ok(());
    }

    eprintln!("route consistency check failed:");
    eprintln!("{}", report.render_failures());
    bail!(
        "{} consistency failure(s) across {} checks",
        report.failures.len(),
        report.checks.iter().filter(|check| check.failures > 0).count()
    );
}

fn open_project(runtime: &RuntimeOptions) -> Result<Project> {
    let paths = resolve_runtime_paths(runtime)?;
    Project::open(paths)
}

fn resolve_runtime_paths(runtime: &RuntimeOptions) -> Result<ResolvedPaths> {
    dotenvy::dotenv().ok();

    let context = ResolutionContext::from_process()?;
    let overrides = PathOverrides {
        project_root: runtime.project_root.clone(),
        config: runtime.config.clone(),
    };

    let initial = resolve_paths(&context, &overrides)?;
    let project_env = initial.project_root.join(".env");
    if project_env.exists() {
        let _ = dotenvy::from_path_override(&project_env);
    }

    resolve_paths(&context, &overrides)
}

fn print_route_list(label: &str, routes: &[String]) {
    println!("{label}.count: {}", routes.len());
    for route in routes {
        println!("  - {route}");
    }
}

fn print_diagnostics(runtime: &RuntimeOptions, paths: &ResolvedPaths, project: Option<&Project>) {
    if !runtime.diagnostics {
        return;
    }
    println!("\n[diagnostics]\n{}", paths.diagnostics());
    if let Some(project) = project {
        println!("{}", project.layout.diagnostics());
    }
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn format_flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
