//! Source rewriting: fenced code blocks into `<CodeBlock>` elements.
//!
//! Pages written for the component-based site carry code samples as
//! `<CodeBlock language="x">{`...`}</CodeBlock>`. This module turns markdown
//! fences into that form and lays the template literal out on its own lines,
//! indented one level deeper than the element. Display later undoes that
//! indentation with [`crate::dedent::dedent`].

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// File extensions the tree conversion touches.
pub const SOURCE_EXTENSIONS: &[&str] = &["md", "mdx", "tsx", "jsx", "ts", "js"];

/// Directory names the tree conversion never descends into.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

const INNER_INDENT: &str = "    ";

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```([a-zA-Z0-9+\-_.]*)\n((?s:.*?))\n```").expect("fence pattern is valid")
});

static TEMPLATE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^[ \t]*)(<CodeBlock[^>]*>)[ \t]*\{`((?s:.*?))`\}[ \t]*(</CodeBlock>)")
        .expect("template block pattern is valid")
});

static INLINE_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^[ \t]*)\{`([^\n]*?)`\}").expect("inline template pattern is valid")
});

/// Conversion errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking the directory tree failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Outcome of converting a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertReport {
    /// Files with a matching extension that were read.
    pub scanned: usize,

    /// Files whose content changed, relative to the root.
    pub updated: Vec<PathBuf>,
}

impl ConvertReport {
    /// Number of files that changed.
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}

/// Replace every fenced block with a `<CodeBlock>` element.
pub fn convert_fences(content: &str) -> String {
    FENCE
        .replace_all(content, |caps: &Captures<'_>| {
            let lang = &caps[1];
            let code = &caps[2];
            let lang_attr = if lang.is_empty() {
                String::new()
            } else {
                format!(" language=\"{lang}\"")
            };
            format!("<CodeBlock{lang_attr}>\n{{`\n{code}\n`}}\n</CodeBlock>")
        })
        .into_owned()
}

/// Lay out `<CodeBlock>{`...`}</CodeBlock>` so the opening and closing
/// template markers sit on their own lines and the code is indented one
/// level past the element.
pub fn normalize_template_blocks(content: &str) -> String {
    TEMPLATE_BLOCK
        .replace_all(content, |caps: &Captures<'_>| {
            let indent = &caps[1];
            let open_tag = &caps[2];
            let close_tag = &caps[4];
            let code = caps[3].trim_matches('\n');

            let body = code
                .split('\n')
                .map(|line| format!("{indent}{INNER_INDENT}{}", line.strip_suffix('\r').unwrap_or(line)))
                .collect::<Vec<_>>()
                .join("\n");

            format!("{indent}{open_tag}\n{indent}{{`\n{body}\n{indent}`}}\n{indent}{close_tag}")
        })
        .into_owned()
}

/// Expand a single-line `{`...`}` into three lines.
pub fn normalize_inline_templates(content: &str) -> String {
    INLINE_TEMPLATE
        .replace_all(content, |caps: &Captures<'_>| {
            let indent = &caps[1];
            let code = caps[2].trim();
            format!("{indent}{{`\n{indent}{INNER_INDENT}{code}\n{indent}`}}")
        })
        .into_owned()
}

/// Apply all rewrites in order.
pub fn convert_source(content: &str) -> String {
    let converted = convert_fences(content);
    let converted = normalize_template_blocks(&converted);
    normalize_inline_templates(&converted)
}

/// Rewrite one file in place. Returns whether the content changed.
pub fn convert_file(path: &Path, dry_run: bool) -> Result<bool> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let converted = convert_source(&content);
    if converted == content {
        return Ok(false);
    }

    if !dry_run {
        fs::write(path, converted).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(true)
}

/// Rewrite every source file under `root`.
pub fn convert_tree(root: &Path, dry_run: bool) -> Result<ConvertReport> {
    let mut report = ConvertReport::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_source_extension(entry.path()) {
            continue;
        }

        report.scanned += 1;
        let path = entry.path();
        if convert_file(path, dry_run)? {
            let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            info!(path = %relative.display(), dry_run, "converted code blocks");
            report.updated.push(relative);
        } else {
            debug!(path = %path.display(), "unchanged");
        }
    }

    Ok(report)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedent::dedent;

    #[test]
    fn test_convert_fence_with_language() {
        let input = "Install it:\n```bash\nnpm install --save-dev husky\n```\nThen run.";
        assert_eq!(
            convert_fences(input),
            "Install it:\n<CodeBlock language=\"bash\">\n{`\nnpm install --save-dev husky\n`}\n</CodeBlock>\nThen run."
        );
    }

    #[test]
    fn test_convert_fence_without_language() {
        assert_eq!(
            convert_fences("```\nx\ny\n```"),
            "<CodeBlock>\n{`\nx\ny\n`}\n</CodeBlock>"
        );
    }

    #[test]
    fn test_convert_multiple_fences() {
        let input = "```js\na()\n```\n\ntext\n\n```json\n{}\n```";
        let out = convert_fences(input);
        assert_eq!(out.matches("<CodeBlock").count(), 2);
        assert!(out.contains("language=\"js\""));
        assert!(out.contains("language=\"json\""));
        assert!(out.contains("\ntext\n"));
    }

    #[test]
    fn test_normalize_template_block() {
        let input = "  <CodeBlock language=\"js\">{`\n\nconst a = 1;\nif (a) {\n  run();\n}\n\n`}</CodeBlock>";
        assert_eq!(
            normalize_template_blocks(input),
            "  <CodeBlock language=\"js\">\n  {`\n      const a = 1;\n      if (a) {\n        run();\n      }\n  `}\n  </CodeBlock>"
        );
    }

    #[test]
    fn test_normalize_inline_template() {
        let input = "<CodeBlock>\n    {`npm test`}\n</CodeBlock>";
        assert_eq!(
            normalize_inline_templates(input),
            "<CodeBlock>\n    {`\n        npm test\n    `}\n</CodeBlock>"
        );
    }

    #[test]
    fn test_convert_source_is_stable() {
        let input = "# Setup\n\n```bash\nnpx husky init\n```\n\n  <CodeBlock>{`ls`}</CodeBlock>\n";
        let once = convert_source(input);
        assert_ne!(once, input);
        assert_eq!(convert_source(&once), once);
    }

    #[test]
    fn test_normalized_block_dedents_back() {
        let code = "if (x) {\n  y();\n}";
        let input = format!("      <CodeBlock language=\"js\">{{`{code}`}}</CodeBlock>");
        let out = normalize_template_blocks(&input);

        let start = out.find("{`").expect("opening marker") + 2;
        let end = out.rfind("`}").expect("closing marker");
        assert_eq!(dedent(&out[start..end]), code);
    }

    #[test]
    fn test_plain_text_untouched() {
        let input = "No code here, just `inline` spans.";
        assert_eq!(convert_source(input), input);
    }

    #[test]
    fn test_convert_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("posts")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("posts/husky.mdx"), "```bash\nnpx husky init\n```\n").unwrap();
        fs::write(root.join("posts/plain.md"), "Nothing to do.\n").unwrap();
        fs::write(root.join("posts/notes.txt"), "```bash\nls\n```\n").unwrap();
        fs::write(root.join("node_modules/pkg/readme.md"), "```\nx\n```\n").unwrap();

        let report = convert_tree(root, false).unwrap();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.updated, vec![PathBuf::from("posts/husky.mdx")]);

        let converted = fs::read_to_string(root.join("posts/husky.mdx")).unwrap();
        assert!(converted.starts_with("<CodeBlock language=\"bash\">"));
        let skipped = fs::read_to_string(root.join("node_modules/pkg/readme.md")).unwrap();
        assert_eq!(skipped, "```\nx\n```\n");
        let other = fs::read_to_string(root.join("posts/notes.txt")).unwrap();
        assert_eq!(other, "```bash\nls\n```\n");
    }

    #[test]
    fn test_convert_tree_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.md");
        fs::write(&file, "```js\na()\n```").unwrap();

        let report = convert_tree(dir.path(), true).unwrap();
        assert_eq!(report.updated_count(), 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "```js\na()\n```");
    }
}
