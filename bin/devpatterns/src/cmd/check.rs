//! Check command - validate configuration and content

use std::{collections::HashMap, path::Path};

use color_eyre::eyre::{Result, WrapErr, bail};
use devpatterns_core::{Config, Post};
use devpatterns_generator::ContentCollector;

use super::build::{SitePaths, load_config};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration and every content file.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    println!("Checking configuration...");
    let config = match load_config(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e:#}");
            return Err(e);
        }
    };

    let paths = SitePaths::resolve(config_path, &config, None);
    println!("\nChecking content files...");
    let result = validate_content(&config, &paths.content_dir)?;

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Parse every content file and check the site hangs together.
pub fn validate_content(config: &Config, content_dir: &Path) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    if !content_dir.exists() {
        result.add_warning(format!(
            "Content directory does not exist: {}",
            content_dir.display()
        ));
        return Ok(result);
    }

    let collector = ContentCollector::new(config.clone(), content_dir);
    let files = collector
        .find_content_files()
        .wrap_err("Failed to list content files")?;

    let mut posts = Vec::new();
    for path in &files {
        match collector.parse_file(path) {
            Ok(post) => {
                println!("  ✓ {}", display_path(path, content_dir));
                posts.push(post);
            }
            Err(e) => {
                println!("  ✗ {}", display_path(path, content_dir));
                result.add_error(e.to_string());
            }
        }
    }

    check_posts(&posts, &mut result);
    Ok(result)
}

fn check_posts(posts: &[Post], result: &mut ValidationResult) {
    let mut by_url: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        *by_url.entry(post.url.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<_> = by_url.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for (url, count) in duplicates {
        result.add_error(format!("{count} files publish to {url}"));
    }

    if !posts.iter().any(Post::is_home) {
        result.add_warning("No index.md: the home page will only list articles");
    }

    for post in posts.iter().filter(|p| !p.is_home()) {
        if post.date.is_none() && post.series.is_none() {
            result.add_warning(format!("{}: no date, sorted last", post.url));
        }

        if let Some(series) = &post.series
            && !posts.iter().any(|p| p.slug == *series && p.series.is_none())
        {
            result.add_warning(format!(
                "{}: series \"{series}\" has no index page",
                post.url
            ));
        }
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
