//! New command - scaffold an article

use std::{fs, path::Path};

use chrono::Local;
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use devpatterns_core::Category;

use super::build::{SitePaths, load_config};

/// Run the new command.
///
/// Creates `content/<path>.md` with starter frontmatter. A path inside a
/// directory (`setup-guide/eslint`) becomes an article of that series.
pub fn run(config_path: &Path, path: &Path, category: &str) -> Result<()> {
    tracing::info!(?path, category, "Creating new article");

    let category: Category = category.parse().map_err(|e: String| eyre!(e))?;
    if category == Category::All {
        bail!("\"All\" is a filter, pick a real category");
    }

    let content_dir = match load_config(config_path) {
        Ok(config) => SitePaths::resolve(config_path, &config, None).content_dir,
        Err(e) => {
            tracing::debug!(error = %e, "No usable config, using ./content");
            Path::new("content").to_path_buf()
        }
    };

    let file_path = {
        let full = content_dir.join(path);
        if full.extension().is_some() {
            full
        } else {
            full.with_extension("md")
        }
    };

    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    let date = Local::now().date_naive().format("%Y-%m-%d").to_string();
    fs::write(&file_path, frontmatter(path, category, &date)).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new article");
    println!("Created: {}", file_path.display());

    Ok(())
}

/// Starter frontmatter for an article at `path`.
fn frontmatter(path: &Path, category: Category, date: &str) -> String {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(title_case)
        .unwrap_or_else(|| "Untitled".to_string());

    format!(
        r#"---
title: "{title}"
date: {date}
category: {category}
excerpt: ""
draft: true
---

Write your article here.

```bash
echo "code blocks get line numbers and a copy button"
```
"#
    )
}

/// "single-responsibility" → "Single Responsibility".
fn title_case(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("single-responsibility"), "Single Responsibility");
        assert_eq!(title_case("husky"), "Husky");
        assert_eq!(title_case("a--b"), "A B");
    }

    #[test]
    fn test_frontmatter() {
        let fm = frontmatter(Path::new("setup-guide/eslint"), Category::Technology, "2026-02-08");
        assert!(fm.starts_with("---\ntitle: \"Eslint\"\ndate: 2026-02-08\ncategory: Technology\n"));
        assert!(fm.contains("draft: true"));
    }

    #[test]
    fn test_run_creates_article() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            "[site]\ntitle = \"Dev Patterns\"\nbase_url = \"https://example.com\"\n",
        )
        .unwrap();

        run(&config, Path::new("setup-guide/eslint"), "development").unwrap();

        let created = dir.path().join("content/setup-guide/eslint.md");
        let text = fs::read_to_string(&created).unwrap();
        assert!(text.contains("category: Development"));

        assert!(run(&config, Path::new("setup-guide/eslint"), "development").is_err());
    }

    #[test]
    fn test_run_rejects_all_category() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&dir.path().join("config.toml"), Path::new("x"), "All");
        assert!(result.is_err());
    }
}
