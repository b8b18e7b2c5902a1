//! Build command - generates the static site

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use devpatterns_core::Config;
use devpatterns_generator::{BuildStats, Builder};

use crate::site_root;

/// Resolved input and output directories for a build.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl SitePaths {
    /// Resolve the config's directories against the config file location.
    /// An explicit `output` wins over `build.output_dir`.
    pub fn resolve(config_path: &Path, config: &Config, output: Option<&Path>) -> Self {
        let root = site_root(config_path);
        Self {
            content_dir: root.join(&config.build.content_dir),
            output_dir: output.map_or_else(|| root.join(&config.build.output_dir), Path::to_path_buf),
        }
    }
}

/// Load the configuration, with `DEVPATTERNS__…` environment overrides.
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Run the build command.
///
/// Builds the static site from content files to the output directory.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    drafts: bool,
    base_url: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?base_url, "Starting build");

    let mut config = load_config(config_path)?;
    config.build.drafts |= drafts;

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.trim_end_matches('/').to_string();
    }

    tracing::debug!(?config, "Loaded configuration");

    let paths = SitePaths::resolve(config_path, &config, output);
    let builder = Builder::new(config, &paths.content_dir, &paths.output_dir);
    let stats = builder.build().wrap_err("Build failed")?;

    print_build_stats(&stats, &paths.output_dir);
    tracing::info!(?stats, elapsed = ?start.elapsed(), "Build completed successfully");

    Ok(())
}

/// Print build statistics.
pub fn print_build_stats(stats: &BuildStats, output: &Path) {
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Pages:       {:>6}", stats.pages);
    println!("  Categories:  {:>6}", stats.category_pages);
    println!("  Code blocks: {:>6}", stats.code_blocks);
    println!();
    println!("  Duration:    {:>6}ms", stats.duration_ms);
    println!("  Output:      {}", output.display());
    println!();
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_site_paths_resolve() {
        let config = Config::default();

        let paths = SitePaths::resolve(Path::new("site/config.toml"), &config, None);
        assert_eq!(paths.content_dir, PathBuf::from("site/content"));
        assert_eq!(paths.output_dir, PathBuf::from("site/public"));

        let paths = SitePaths::resolve(Path::new("config.toml"), &config, Some(Path::new("dist")));
        assert_eq!(paths.content_dir, PathBuf::from("./content"));
        assert_eq!(paths.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_run_builds_site() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("config.toml"),
            "[site]\ntitle = \"Dev Patterns & Practices\"\nbase_url = \"https://example.com\"\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("content")).unwrap();
        fs::write(
            root.join("content/hello.md"),
            "---\ntitle: Hello\ncategory: Craft\n---\n```\necho hi\n```\n",
        )
        .unwrap();

        run(&root.join("config.toml"), None, false, None).unwrap();

        assert!(root.join("public/index.html").exists());
        assert!(root.join("public/post/hello/index.html").exists());
        assert!(root.join("public/category/craft/index.html").exists());
    }

    #[test]
    fn test_run_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("config.toml"), None, false, None).is_err());
    }
}
