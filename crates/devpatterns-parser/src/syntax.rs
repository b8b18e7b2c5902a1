//! Syntax highlighting for code blocks.

use syntect::{
    easy::HighlightLines,
    highlighting::{Color, Style, Theme, ThemeSet},
    html::{IncludeBackground, styled_line_to_highlighted_html},
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use tracing::trace;

/// Default theme, matching the dark code blocks of the site.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter using syntect.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    default_theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with the specified theme.
    pub fn new(theme: &str) -> Self {
        let mut highlighter = Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            default_theme: DEFAULT_THEME.to_string(),
        };
        highlighter.set_theme(theme);
        highlighter
    }

    /// Get available theme names.
    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Name of the active theme.
    pub fn theme_name(&self) -> &str {
        &self.default_theme
    }

    /// Set the default theme. Unknown names are ignored.
    pub fn set_theme(&mut self, theme: &str) {
        if self.theme_set.themes.contains_key(theme) {
            self.default_theme = theme.to_string();
        } else {
            tracing::warn!(theme, fallback = %self.default_theme, "unknown syntax theme");
        }
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.default_theme)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Find the grammar for a language tag, falling back to plain text.
    fn syntax_for(&self, lang: Option<&str>) -> &SyntaxReference {
        lang.map(|l| canonical_language(l.trim()))
            .filter(|l| !l.is_empty())
            .and_then(|l| {
                self.syntax_set
                    .find_syntax_by_token(l)
                    .or_else(|| self.syntax_set.find_syntax_by_name(l))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Display name of the grammar used for a tag, e.g. "Rust" or "Plain Text".
    pub fn language_name(&self, lang: Option<&str>) -> &str {
        &self.syntax_for(lang).name
    }

    /// Whether a tag resolves to a real grammar.
    pub fn is_known_language(&self, lang: &str) -> bool {
        let plain = self.syntax_set.find_syntax_plain_text();
        self.syntax_for(Some(lang)).name != plain.name
    }

    /// CSS background color of the active theme.
    pub fn background_css(&self) -> Option<String> {
        let bg = self.theme()?.settings.background?;
        Some(css_color(bg))
    }

    /// CSS foreground color of the active theme.
    pub fn foreground_css(&self) -> Option<String> {
        let fg = self.theme()?.settings.foreground?;
        Some(css_color(fg))
    }

    /// Highlight code into one HTML fragment per line.
    ///
    /// Fragments carry no line terminators. Unknown languages are rendered
    /// as escaped plain text.
    pub fn highlight_lines(&self, code: &str, lang: Option<&str>) -> Vec<String> {
        let Some(theme) = self.theme() else {
            return plain_lines(code);
        };
        let syntax = self.syntax_for(lang);
        trace!(lang = ?lang, syntax = %syntax.name, "highlighting");

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out = Vec::new();

        for line in LinesWithEndings::from(code) {
            let html = highlighter
                .highlight_line(line, &self.syntax_set)
                .ok()
                .and_then(|regions| {
                    let trimmed: Vec<(Style, &str)> = regions
                        .into_iter()
                        .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
                        .collect();
                    styled_line_to_highlighted_html(&trimmed, IncludeBackground::No).ok()
                })
                .unwrap_or_else(|| html_escape(line.trim_end_matches(['\n', '\r'])));
            out.push(html);
        }

        out
    }

    /// Highlight code with 24-bit ANSI escapes, one string per line.
    pub fn highlight_terminal(&self, code: &str, lang: Option<&str>) -> Vec<String> {
        let Some(theme) = self.theme() else {
            return code.lines().map(str::to_string).collect();
        };
        let mut highlighter = HighlightLines::new(self.syntax_for(lang), theme);

        LinesWithEndings::from(code)
            .map(|line| {
                let text = line.trim_end_matches(['\n', '\r']);
                match highlighter.highlight_line(line, &self.syntax_set) {
                    Ok(regions) => {
                        let trimmed: Vec<(Style, &str)> = regions
                            .into_iter()
                            .map(|(style, t)| (style, t.trim_end_matches(['\n', '\r'])))
                            .collect();
                        format!("{}\x1b[0m", as_24_bit_terminal_escaped(&trimmed, false))
                    }
                    Err(_) => text.to_string(),
                }
            })
            .collect()
    }
}

/// Map the tags used by article authors onto grammars syntect ships with.
fn canonical_language(lang: &str) -> &str {
    match lang.to_ascii_lowercase().as_str() {
        "ts" | "typescript" | "tsx" | "jsx" | "javascript" | "mjs" | "cjs" => "js",
        "shell" | "zsh" | "console" | "terminal" | "sh" => "bash",
        "jsonc" | "json5" => "json",
        "yml" => "yaml",
        "text" | "plaintext" | "txt" => "",
        "md" | "mdx" => "markdown",
        _ => lang,
    }
}

fn css_color(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn plain_lines(code: &str) -> Vec<String> {
    code.lines().map(html_escape).collect()
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
