//! Code block rendering: dedent, highlight, number lines, attach a copy button.

use devpatterns_core::{CopyState, config::CodeConfig};

use crate::{
    dedent::NormalizedBlock,
    syntax::{SyntaxHighlighter, html_escape},
};

/// Language assumed when a block has no tag.
pub const DEFAULT_LANGUAGE: &str = "bash";

/// Lucide "copy" icon.
pub const COPY_ICON: &str = r#"<svg class="icon-copy" xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><rect width="14" height="14" x="8" y="8" rx="2" ry="2"/><path d="M4 16c-1.1 0-2-.9-2-2V4c0-1.1.9-2 2-2h10c1.1 0 2 .9 2 2"/></svg>"#;

/// Lucide "check" icon.
pub const CHECK_ICON: &str = r#"<svg class="icon-check" xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><path d="M20 6 9 17l-5-5"/></svg>"#;

/// A rendered code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCodeBlock {
    /// The text a copy action puts on the clipboard.
    pub code: NormalizedBlock,

    /// The language tag as given (or the default).
    pub language: String,

    /// Complete HTML for the block.
    pub html: String,
}

/// Renders code samples as numbered, highlighted blocks with a copy button.
#[derive(Debug)]
pub struct CodeBlockRenderer {
    highlighter: SyntaxHighlighter,
    default_language: String,
    line_numbers: bool,
}

impl Default for CodeBlockRenderer {
    fn default() -> Self {
        Self::new(SyntaxHighlighter::default())
    }
}

impl CodeBlockRenderer {
    /// Create a renderer around a highlighter.
    pub fn new(highlighter: SyntaxHighlighter) -> Self {
        Self {
            highlighter,
            default_language: DEFAULT_LANGUAGE.to_string(),
            line_numbers: true,
        }
    }

    /// Create a renderer from site settings.
    pub fn from_config(theme: &str, code: &CodeConfig) -> Self {
        Self {
            highlighter: SyntaxHighlighter::new(theme),
            default_language: code.default_language.clone(),
            line_numbers: code.line_numbers,
        }
    }

    /// Toggle the line-number gutter.
    #[must_use]
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// The underlying highlighter.
    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    /// Dedent and render a raw block.
    pub fn render(&self, raw: &str, lang: Option<&str>) -> RenderedCodeBlock {
        let code = NormalizedBlock::new(raw);
        let language = lang
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_language)
            .to_string();

        let html = self.block_html(&code, &language);

        RenderedCodeBlock {
            code,
            language,
            html,
        }
    }

    /// Inline style for the `<pre>` element, from the theme colors.
    pub fn pre_style(&self) -> String {
        let mut style = String::new();
        if let Some(bg) = self.highlighter.background_css() {
            style.push_str(&format!("background-color:{bg};"));
        }
        if let Some(fg) = self.highlighter.foreground_css() {
            style.push_str(&format!("color:{fg};"));
        }
        style
    }

    /// Highlighted lines of already-normalized code, one `.line` span each.
    pub fn lines_html(&self, code: &str, language: &str) -> String {
        let mut body = String::new();
        for (index, line) in self.highlighter.highlight_lines(code, Some(language)).iter().enumerate() {
            body.push_str(r#"<span class="line">"#);
            if self.line_numbers {
                body.push_str(&format!(
                    r#"<span class="line-number" aria-hidden="true">{}</span>"#,
                    index + 1
                ));
            }
            body.push_str(r#"<span class="line-content">"#);
            body.push_str(line);
            body.push_str("</span></span>\n");
        }
        body
    }

    fn block_html(&self, code: &NormalizedBlock, language: &str) -> String {
        let lang_attr = html_escape(language);
        let state = CopyState::Idle;
        format!(
            r#"<div class="code-block" data-lang="{lang_attr}">
<button type="button" class="copy-button" data-state="idle" aria-label="{label}" title="{title}" data-code="{data}">{COPY_ICON}{CHECK_ICON}</button>
<pre class="code" style="{style}"><code class="language-{lang_attr}">{body}</code></pre>
</div>
"#,
            label = state.label(),
            title = state.title(),
            data = html_escape(code.as_str()),
            style = self.pre_style(),
            body = self.lines_html(code, language),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dedents_before_highlighting() {
        let renderer = CodeBlockRenderer::default();
        let block = renderer.render("\n    npm install --save-dev husky\n    npx husky init\n  ", Some("bash"));

        assert_eq!(block.code.as_str(), "npm install --save-dev husky\nnpx husky init");
        assert_eq!(block.language, "bash");
        assert_eq!(block.html.matches(r#"class="line""#).count(), 2);
    }

    #[test]
    fn test_copy_payload_is_normalized_text() {
        let renderer = CodeBlockRenderer::default();
        let block = renderer.render("\n  if (a < b) {\n    run(\"x\");\n  }\n", Some("js"));

        assert!(block.html.contains(
            "data-code=\"if (a &lt; b) {\n  run(&quot;x&quot;);\n}\""
        ));
    }

    #[test]
    fn test_line_numbers() {
        let renderer = CodeBlockRenderer::default();
        let block = renderer.render("a\nb\nc", Some("text"));

        assert!(block.html.contains(r#"<span class="line-number" aria-hidden="true">1</span>"#));
        assert!(block.html.contains(r#"<span class="line-number" aria-hidden="true">3</span>"#));

        let bare = CodeBlockRenderer::default().with_line_numbers(false);
        assert!(!bare.render("a", None).html.contains("line-number"));
    }

    #[test]
    fn test_default_language() {
        let renderer = CodeBlockRenderer::default();
        assert_eq!(renderer.render("ls", None).language, "bash");
        assert_eq!(renderer.render("ls", Some("  ")).language, "bash");

        let config = CodeConfig {
            default_language: "text".to_string(),
            ..Default::default()
        };
        let renderer = CodeBlockRenderer::from_config("base16-ocean.dark", &config);
        assert_eq!(renderer.render("ls", None).language, "text");
    }

    #[test]
    fn test_unknown_language_still_renders() {
        let renderer = CodeBlockRenderer::default();
        let block = renderer.render("whatever", Some("klingon"));
        assert!(block.html.contains(r#"data-lang="klingon""#));
        assert!(block.html.contains("whatever"));
    }

    #[test]
    fn test_copy_button_starts_idle() {
        let renderer = CodeBlockRenderer::default();
        let html = renderer.render("x", None).html;
        assert!(html.contains(r#"data-state="idle""#));
        assert!(html.contains(r#"aria-label="Copy code""#));
        assert!(html.contains("icon-copy"));
        assert!(html.contains("icon-check"));
    }

    #[test]
    fn test_empty_block() {
        let renderer = CodeBlockRenderer::default();
        let block = renderer.render("", None);
        assert_eq!(block.code.as_str(), "");
        assert!(!block.html.contains(r#"class="line""#));
    }
}
