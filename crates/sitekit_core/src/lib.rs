pub mod ai_context;
pub mod config;
pub mod content;
pub mod manifest;
pub mod prerender;
pub mod project;
pub mod runtime;
pub mod sitemap;
pub mod source_scan;
pub mod verify;
