//! Content collection.
//!
//! Walks the content directory, renders every markdown file and gathers the
//! results into a [`Catalog`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use devpatterns_core::{Catalog, Config, Post, PostPath};
use devpatterns_parser::ParserRegistry;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parser error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid content path.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    parser: ParserRegistry,
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        let parser = ParserRegistry::from_config(&config);
        Self {
            config,
            parser,
            content_dir: content_dir.into(),
        }
    }

    /// The parser used for content files.
    pub fn parser(&self) -> &ParserRegistry {
        &self.parser
    }

    /// Collect all content. Files that fail to parse are logged and skipped.
    pub fn collect(&self) -> Result<Catalog> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        let posts: Vec<Post> = files
            .par_iter()
            .filter_map(|path| match self.parse_file(path) {
                Ok(post) if post.draft && !self.config.build.drafts => {
                    debug!(url = %post.url, "skipping draft");
                    None
                }
                Ok(post) => Some(post),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse file");
                    None
                }
            })
            .collect();

        let catalog = Catalog::new(posts);
        info!(
            posts = catalog.len(),
            categories = catalog.categories().len().saturating_sub(1),
            "content collection complete"
        );

        Ok(catalog)
    }

    /// Find all content files recursively, in path order.
    pub fn find_content_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        walk_dir(&self.content_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Parse a single content file into a post.
    pub fn parse_file(&self, path: &Path) -> Result<Post> {
        debug!(path = %path.display(), "parsing file");

        let content = fs::read_to_string(path)?;

        let relative_path = path.strip_prefix(&self.content_dir).unwrap_or(path);
        let location = PostPath::from_path(relative_path)
            .ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;

        let parse_error = |message: String| CollectorError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let parsed = self
            .parser
            .parse(&content, path)
            .map_err(|e| parse_error(e.to_string()))?;

        Post::from_parsed(parsed, &location, path).map_err(|e| parse_error(e.to_string()))
    }
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }
            walk_dir(&path, files)?;
        } else if path.is_file() && ParserRegistry::supports(&path) {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use devpatterns_core::Category;

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "index.md", "---\ntitle: Dev Patterns\n---\nWelcome.");
        write(
            root,
            "setup-guide/index.md",
            "---\ntitle: Setup Guide\ncategory: Technology\ndate: 2026-02-08\n---\nA series.",
        );
        write(
            root,
            "setup-guide/husky.md",
            "---\ntitle: Husky\nweight: 5\n---\n```bash\nnpx husky init\n```\n",
        );
        write(
            root,
            "the-art-of-simplicity.md",
            "---\ntitle: The Art of Simplicity\ncategory: Design\n---\nLess.",
        );
        write(root, "drafts/wip.md", "---\ntitle: WIP\ndraft: true\n---\nSoon.");
        write(root, "broken.md", "---\ntitle: [unclosed\n---\n");
        write(root, ".hidden/secret.md", "---\ntitle: Secret\n---\n");
        write(root, "notes.txt", "not content");
        dir
    }

    #[test]
    fn test_collect() {
        let dir = site();
        let collector = ContentCollector::new(Config::default(), dir.path());
        let catalog = collector.collect().unwrap();

        // index, setup-guide, husky, simplicity; draft, broken and hidden skipped
        assert_eq!(catalog.len(), 4);
        assert!(catalog.home().is_some());
        assert_eq!(catalog.posts().count(), 2);

        let husky = catalog.article("setup-guide", "husky").unwrap();
        assert_eq!(husky.url, "/post/setup-guide/husky");
        assert_eq!(husky.code_blocks, 1);
        assert_eq!(husky.weight, 5);

        let simplicity = catalog.post_by_slug("the-art-of-simplicity").unwrap();
        assert_eq!(simplicity.category, Category::Design);
    }

    #[test]
    fn test_collect_with_drafts() {
        let dir = site();
        let mut config = Config::default();
        config.build.drafts = true;
        let catalog = ContentCollector::new(config, dir.path()).collect().unwrap();

        assert_eq!(catalog.len(), 5);
        assert!(catalog.all().iter().any(|p| p.title == "WIP"));
    }

    #[test]
    fn test_find_content_files_skips_hidden_and_foreign() {
        let dir = site();
        let collector = ContentCollector::new(Config::default(), dir.path());
        let files = collector.find_content_files().unwrap();

        assert_eq!(files.len(), 6);
        assert!(files.iter().all(|f| f.extension().is_some_and(|e| e == "md")));
        assert!(!files.iter().any(|f| f.to_string_lossy().contains(".hidden")));
    }

    #[test]
    fn test_parse_file_error() {
        let dir = site();
        let collector = ContentCollector::new(Config::default(), dir.path());
        let result = collector.parse_file(&dir.path().join("broken.md"));
        assert!(matches!(result, Err(CollectorError::Parse { .. })));
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let collector = ContentCollector::new(Config::default(), dir.path().join("nope"));
        assert!(collector.collect().unwrap().is_empty());
    }
}
