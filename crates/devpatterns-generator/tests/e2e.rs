//! End-to-end tests for devpatterns.
//!
//! These tests exercise the demo site and verify core functionality.

use std::{fs, path::Path};

use devpatterns_core::{Category, Config};
use devpatterns_generator::{Builder, ContentCollector};
use devpatterns_parser::ParserRegistry;

const SITE: &str = "../../demos/site";

fn site_config() -> Option<Config> {
    let config_path = Path::new(SITE).join("config.toml");
    if !config_path.exists() {
        // Skip if running from a different working directory
        return None;
    }
    Some(Config::load(&config_path).expect("Config should load"))
}

#[test]
fn test_demo_site_config_loads() {
    let Some(config) = site_config() else { return };

    assert_eq!(config.site.title, "Dev Patterns & Practices");
    assert_eq!(config.site.base_url, "https://devpatterns.example");
    assert!(config.site.about.is_some());
    assert_eq!(config.code.default_language, "bash");
    assert_eq!(config.code.copy_reset_ms, 2000);
}

#[test]
fn test_demo_mdx_code_blocks_are_dedented() {
    let path = Path::new(SITE).join("content/setup-guide/husky.mdx");
    if !path.exists() {
        return;
    }

    let registry = ParserRegistry::new();
    let content = fs::read_to_string(&path).expect("Failed to read");
    let parsed = registry.parse(&content, &path).expect("Should parse");

    assert_eq!(parsed.code_blocks, 2);
    assert!(parsed.html.contains(
        "data-code=\"# Install Husky\nnpm install --save-dev husky\n\n# Initialize Husky (creates .husky/ and a sample hook)\nnpx husky init\""
    ));
    assert!(parsed.html.contains("data-code=\"npx lint-staged\nnpm test\""));
}

#[test]
fn test_demo_site_catalog() {
    let Some(config) = site_config() else { return };

    let collector = ContentCollector::new(config, Path::new(SITE).join("content"));
    let catalog = collector.collect().expect("Should collect");

    let titles: Vec<_> = catalog.posts().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "The Art of Simplicity in Modern Design",
            "Building for the Web in 2026",
            "Setup Guide",
            "SOLID Principles",
        ]
    );

    let series: Vec<_> = catalog
        .articles_by_series("setup-guide")
        .iter()
        .map(|p| p.slug.as_str())
        .collect();
    assert_eq!(series, ["nodejs", "prettier", "husky"]);

    assert_eq!(catalog.posts_by_category(Category::All).len(), 4);
    assert_eq!(catalog.posts_by_category(Category::Design).len(), 1);
    assert_eq!(
        catalog.categories(),
        [
            Category::All,
            Category::Design,
            Category::Technology,
            Category::Development
        ]
    );
}

#[test]
fn test_demo_site_builds() {
    let Some(config) = site_config() else { return };
    let output = tempfile::tempdir().expect("temp dir");

    let builder = Builder::new(config, Path::new(SITE).join("content"), output.path());
    let stats = builder.build().expect("Should build");

    // home + 4 posts + 3 setup-guide articles + 1 solid-principles article
    assert_eq!(stats.pages, 9);
    assert_eq!(stats.category_pages, 3);
    // building-for-the-web 1, nodejs 2, prettier 2, husky 2, single-responsibility 2
    assert_eq!(stats.code_blocks, 9);

    let out = output.path();
    for page in [
        "index.html",
        "post/the-art-of-simplicity/index.html",
        "post/setup-guide/index.html",
        "post/setup-guide/husky/index.html",
        "post/solid-principles/single-responsibility/index.html",
        "category/design/index.html",
        "category/technology/index.html",
        "category/development/index.html",
    ] {
        assert!(out.join(page).exists(), "missing {page}");
    }

    let husky = fs::read_to_string(out.join("post/setup-guide/husky/index.html")).unwrap();
    assert!(husky.contains(r#"class="copy-button""#));
    assert!(husky.contains(r#"aria-label="Copy code""#));
    assert!(husky.contains("const RESET_MS = 2000;"));
    assert!(husky.contains(r#"<a rel="prev" href="/post/setup-guide/prettier">"#));

    let solid = fs::read_to_string(
        out.join("post/solid-principles/single-responsibility/index.html"),
    )
    .unwrap();
    assert!(solid.contains(r#"data-lang="ts""#));
    assert!(solid.contains("class InvoicePrinter {"));
}
