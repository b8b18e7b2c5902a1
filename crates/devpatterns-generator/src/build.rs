//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use devpatterns_core::{Catalog, Category, Config};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    collector::{CollectorError, ContentCollector},
    html::{HtmlError, HtmlGenerator, category_url},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of pages generated (home page and posts).
    pub pages: usize,

    /// Number of category listing pages generated.
    pub category_pages: usize,

    /// Number of code blocks across all written pages.
    pub code_blocks: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        self.clean_output()?;

        let collector = ContentCollector::new(self.config.clone(), &self.content_dir);
        let catalog = collector.collect()?;

        let highlighter = collector.parser().renderer().highlighter();
        let generator = HtmlGenerator::new(self.config.clone())
            .with_code_colors(highlighter.background_css(), highlighter.foreground_css());

        let (pages, code_blocks) = self.generate_pages(&generator, &catalog)?;
        stats.pages = pages;
        stats.code_blocks = code_blocks;
        stats.category_pages = self.generate_category_pages(&generator, &catalog)?;
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            category_pages = stats.category_pages,
            code_blocks = stats.code_blocks,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Write the home page and every post. Returns (pages, code blocks).
    fn generate_pages(&self, generator: &HtmlGenerator, catalog: &Catalog) -> Result<(usize, usize)> {
        let home = generator.generate_home(catalog)?;
        write_page(&HtmlGenerator::output_path("/", &self.output_dir), &home)?;
        let home_blocks = catalog.home().map_or(0, |p| p.code_blocks);

        let posts: Vec<_> = catalog.all().iter().filter(|p| !p.is_home()).collect();
        info!(count = posts.len(), "generating post pages");

        let results: Vec<_> = posts
            .par_iter()
            .map(|post| {
                let html = generator.generate_post(post, catalog)?;
                write_page(&HtmlGenerator::output_path(&post.url, &self.output_dir), &html)?;
                Ok::<_, BuildError>(post.code_blocks)
            })
            .collect();

        let mut pages = 1;
        let mut code_blocks = home_blocks;
        for result in results {
            match result {
                Ok(blocks) => {
                    pages += 1;
                    code_blocks += blocks;
                }
                Err(e) => warn!(error = %e, "failed to generate page"),
            }
        }

        Ok((pages, code_blocks))
    }

    fn generate_category_pages(&self, generator: &HtmlGenerator, catalog: &Catalog) -> Result<usize> {
        let mut count = 0;

        for category in catalog.categories() {
            if category == Category::All {
                continue;
            }
            let html = generator.generate_category(category, catalog)?;
            write_page(
                &HtmlGenerator::output_path(&category_url(category), &self.output_dir),
                &html,
            )?;
            count += 1;
        }

        Ok(count)
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    debug!(path = %path.display(), "wrote page");
    Ok(())
}
