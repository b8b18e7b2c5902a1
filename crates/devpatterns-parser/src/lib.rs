//! Dev Patterns Parser Library
//!
//! Markdown rendering, code block normalization and highlighting, and the
//! fence-to-`<CodeBlock>` source conversion.

pub mod codeblock;
pub mod convert;
pub mod dedent;
pub mod markdown;
pub mod syntax;

use std::path::Path;

pub use codeblock::{CodeBlockRenderer, RenderedCodeBlock};
pub use dedent::{NormalizedBlock, dedent};
use devpatterns_core::{ParsedContent, config::Config};
pub use markdown::MarkdownParser;
pub use syntax::{SyntaxHighlighter, html_escape};
use thiserror::Error;

/// File extensions rendered as markdown.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Markdown parsing error.
    #[error("markdown error: {0}")]
    Markdown(#[from] markdown::MarkdownError),

    /// Source conversion error.
    #[error("conversion error: {0}")]
    Convert(#[from] convert::ConvertError),

    /// Unknown file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Trait for content parsers.
pub trait ContentParser {
    /// Parse content from a string and file path.
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent>;
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        Ok(self.parse(content, path)?)
    }
}

/// Registry for content parsers with auto-detection.
#[derive(Debug, Default)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
}

impl ParserRegistry {
    /// Create a new parser registry with default parsers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser registry from site configuration.
    pub fn from_config(config: &Config) -> Self {
        let renderer = CodeBlockRenderer::from_config(&config.build.syntax_theme, &config.code);
        Self {
            markdown: MarkdownParser::with_renderer(renderer),
        }
    }

    /// Whether a path has an extension this registry can parse.
    pub fn supports(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }

    /// Parse content, auto-detecting the parser from file extension.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParserError::UnknownExtension("(none)".to_string()))?;

        if Self::supports(path) {
            Ok(self.markdown.parse(content, path)?)
        } else {
            Err(ParserError::UnknownExtension(ext.to_string()))
        }
    }

    /// Get the markdown parser.
    pub fn markdown(&self) -> &MarkdownParser {
        &self.markdown
    }

    /// Get the code block renderer.
    pub fn renderer(&self) -> &CodeBlockRenderer {
        self.markdown.renderer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_markdown() {
        let registry = ParserRegistry::new();
        let content = r#"---
title: "Prettier"
---

# Hello"#;

        let result = registry.parse(content, Path::new("prettier.md")).unwrap();
        assert_eq!(result.frontmatter.title, "Prettier");
    }

    #[test]
    fn test_registry_mdx() {
        let registry = ParserRegistry::new();
        let content = "<CodeBlock language=\"bash\">{`npx prettier --write .`}</CodeBlock>";
        let result = registry.parse(content, Path::new("prettier.mdx")).unwrap();
        assert_eq!(result.code_blocks, 1);
    }

    #[test]
    fn test_registry_unknown_extension() {
        let registry = ParserRegistry::new();
        let result = registry.parse("content", Path::new("test.xyz"));

        assert!(matches!(result, Err(ParserError::UnknownExtension(_))));
        assert!(!ParserRegistry::supports(Path::new("test.typ")));
    }

    #[test]
    fn test_registry_from_config() {
        let mut config = Config::default();
        config.code.line_numbers = false;
        let registry = ParserRegistry::from_config(&config);
        let html = registry.renderer().render("ls", None).html;
        assert!(!html.contains("line-number"));
    }

    #[test]
    fn test_content_parser_trait() {
        let parser = MarkdownParser::new();
        let content = r#"---
title: "Trait Test"
---

Content"#;

        let result: Result<ParsedContent> =
            ContentParser::parse(&parser, content, Path::new("test.md"));
        assert!(result.is_ok());
    }
}
