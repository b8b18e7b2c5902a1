//! Markdown rendering using pulldown-cmark.
//!
//! Fenced and indented code blocks, as well as `<CodeBlock>` elements carried
//! over from MDX sources, are rendered through [`CodeBlockRenderer`].

use std::{ops::Range, path::Path, sync::LazyLock};

use devpatterns_core::{
    content::{ParsedContent, TocEntry},
    frontmatter::parse_frontmatter,
};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::{codeblock::CodeBlockRenderer, syntax::html_escape};

/// Upper bound on the prose collected for excerpts.
const SUMMARY_CHARS: usize = 600;

/// `<CodeBlock language="x">{`...`}</CodeBlock>` as written in MDX pages.
static CODE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<CodeBlock(?:\s+language\s*=\s*"([^"]*)")?\s*>\s*\{`(.*?)`\}\s*</CodeBlock>"#)
        .expect("code element pattern is valid")
});

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] devpatterns_core::error::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Output of rendering a markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMarkdown {
    /// Rendered HTML.
    pub html: String,

    /// Headings in document order.
    pub toc: Vec<TocEntry>,

    /// Number of code blocks rendered.
    pub code_blocks: usize,

    /// Plain paragraph text, unescaped, for excerpts.
    pub summary: String,
}

/// Markdown parser with code block rendering.
#[derive(Debug)]
pub struct MarkdownParser {
    renderer: CodeBlockRenderer,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        Self::with_renderer(CodeBlockRenderer::default())
    }

    /// Create a parser around a configured code block renderer.
    pub fn with_renderer(renderer: CodeBlockRenderer) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { renderer, options }
    }

    /// The code block renderer.
    pub fn renderer(&self) -> &CodeBlockRenderer {
        &self.renderer
    }

    /// Parse markdown content with frontmatter.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let rendered = self.render(&body);
        debug!(
            path = %path.display(),
            headings = rendered.toc.len(),
            code_blocks = rendered.code_blocks,
            "rendered markdown"
        );

        Ok(ParsedContent {
            frontmatter,
            html: rendered.html,
            raw: body,
            toc: rendered.toc,
            code_blocks: rendered.code_blocks,
            summary: rendered.summary,
        })
    }

    /// Render a markdown body (no frontmatter).
    pub fn render(&self, content: &str) -> RenderedMarkdown {
        let (content, elements) = self.extract_code_elements(content);

        let parser = Parser::new_ext(&content, self.options);
        let mut out = RenderedMarkdown {
            code_blocks: elements.len(),
            ..Default::default()
        };
        let html = &mut out.html;

        let mut heading: Option<OpenHeading> = None;
        let mut code: Option<(Option<String>, String)> = None;
        let mut image_alt: Option<String> = None;
        let mut in_table_head = false;
        let mut in_paragraph = false;

        for event in parser {
            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(OpenHeading {
                        level,
                        id: id.map(|i| i.to_string()),
                        start: html.len(),
                        text: String::new(),
                    });
                }

                Event::End(TagEnd::Heading(_)) => {
                    if let Some(open) = heading.take() {
                        let id = open.id.unwrap_or_else(|| slugify(&open.text));
                        let lvl = open.level as u8;
                        html.insert_str(open.start, &format!("<h{lvl} id=\"{}\">", html_escape(&id)));
                        html.push_str(&format!("</h{lvl}>\n"));
                        out.toc.push(TocEntry {
                            level: lvl,
                            text: open.text,
                            id,
                        });
                    }
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some((lang, String::new()));
                }

                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, text)) = code.take() {
                        let block = self.renderer.render(&text, lang.as_deref());
                        html.push_str(&block.html);
                        out.code_blocks += 1;
                    }
                }

                Event::Text(text) => {
                    if let Some((_, ref mut buf)) = code {
                        buf.push_str(&text);
                    } else if let Some(ref mut alt) = image_alt {
                        alt.push_str(&text);
                    } else {
                        if let Some(ref mut open) = heading {
                            open.text.push_str(&text);
                        }
                        if in_paragraph {
                            push_summary(&mut out.summary, &text);
                        }
                        html.push_str(&html_escape(&text));
                    }
                }

                Event::Code(inline) => {
                    if let Some(ref mut open) = heading {
                        open.text.push_str(&inline);
                    }
                    if in_paragraph {
                        push_summary(&mut out.summary, &inline);
                    }
                    html.push_str(&format!("<code>{}</code>", html_escape(&inline)));
                }

                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    html.push_str(&format!("<img src=\"{}\"", html_escape(&dest_url)));
                    if !title.is_empty() {
                        html.push_str(&format!(" title=\"{}\"", html_escape(&title)));
                    }
                    image_alt = Some(String::new());
                }

                Event::End(TagEnd::Image) => {
                    let alt = image_alt.take().unwrap_or_default();
                    html.push_str(&format!(" alt=\"{}\" />", html_escape(&alt)));
                }

                Event::Start(Tag::TableHead) => {
                    in_table_head = true;
                    html.push_str("<thead><tr>");
                }

                Event::End(TagEnd::TableHead) => {
                    in_table_head = false;
                    html.push_str("</tr></thead>\n<tbody>\n");
                }

                Event::Start(Tag::TableCell) => {
                    html.push_str(if in_table_head { "<th>" } else { "<td>" });
                }

                Event::End(TagEnd::TableCell) => {
                    html.push_str(if in_table_head { "</th>" } else { "</td>" });
                }

                Event::Start(Tag::Paragraph) => {
                    in_paragraph = true;
                    if !out.summary.is_empty() {
                        push_summary(&mut out.summary, " ");
                    }
                    html.push_str("<p>");
                }

                Event::End(TagEnd::Paragraph) => {
                    in_paragraph = false;
                    html.push_str("</p>\n");
                }

                Event::SoftBreak => {
                    if in_paragraph {
                        push_summary(&mut out.summary, " ");
                    }
                    html.push('\n');
                }
                Event::HardBreak => html.push_str("<br />\n"),
                Event::Rule => html.push_str("<hr />\n"),

                Event::Start(tag) => html.push_str(&tag_to_html_start(&tag)),
                Event::End(tag) => html.push_str(&tag_to_html_end(&tag)),

                Event::Html(raw) | Event::InlineHtml(raw) => {
                    html.push_str(&expand_placeholders(&raw, &elements));
                }

                Event::FootnoteReference(name) => {
                    html.push_str(&format!(
                        "<sup class=\"footnote-ref\"><a href=\"#fn-{name}\">[{name}]</a></sup>"
                    ));
                }

                Event::TaskListMarker(checked) => {
                    html.push_str(if checked {
                        "<input type=\"checkbox\" checked disabled />"
                    } else {
                        "<input type=\"checkbox\" disabled />"
                    });
                }

                Event::InlineMath(math) => {
                    html.push_str(&format!("<span class=\"math inline\">\\({math}\\)</span>"));
                }

                Event::DisplayMath(math) => {
                    html.push_str(&format!("<div class=\"math display\">\\[{math}\\]</div>"));
                }
            }
        }

        out
    }

    /// Swap `<CodeBlock>` elements for comment placeholders, rendering each.
    ///
    /// Elements written inside a fenced block or an inline code span are
    /// sample text and stay as they are.
    fn extract_code_elements(&self, content: &str) -> (String, Vec<String>) {
        let literal = literal_code_ranges(content, self.options);
        let mut rendered = Vec::new();
        let mut out = String::with_capacity(content.len());
        let mut last = 0;

        for caps in CODE_ELEMENT.captures_iter(content) {
            let Some(whole) = caps.get(0) else { continue };
            if literal
                .iter()
                .any(|r| r.start <= whole.start() && whole.end() <= r.end)
            {
                continue;
            }

            let lang = caps.get(1).map(|m| m.as_str());
            let raw = unescape_template(&caps[2]);
            rendered.push(self.renderer.render(&raw, lang).html);

            out.push_str(&content[last..whole.start()]);
            out.push_str(&format!("\n\n<!--codeblock:{}-->\n\n", rendered.len() - 1));
            last = whole.end();
        }
        out.push_str(&content[last..]);

        (out, rendered)
    }
}

/// Byte ranges of fenced code blocks and inline code spans.
fn literal_code_ranges(content: &str, options: Options) -> Vec<Range<usize>> {
    Parser::new_ext(content, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

fn push_summary(summary: &mut String, text: &str) {
    if summary.len() < SUMMARY_CHARS {
        summary.push_str(text);
    }
}

struct OpenHeading {
    level: HeadingLevel,
    id: Option<String>,
    start: usize,
    text: String,
}

fn expand_placeholders(raw: &str, elements: &[String]) -> String {
    let mut out = raw.to_string();
    for (index, element) in elements.iter().enumerate() {
        let marker = format!("<!--codeblock:{index}-->");
        if out.contains(&marker) {
            out = out.replace(&marker, element);
        }
    }
    out
}

/// Undo template-literal escapes: `` \` ``, `\$`, `\\`.
fn unescape_template(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && matches!(next, '`' | '$' | '\\')
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

/// Convert a pulldown-cmark tag to an HTML opening tag.
fn tag_to_html_start(tag: &Tag) -> String {
    match tag {
        Tag::Paragraph => "<p>".to_string(),
        Tag::BlockQuote(_) => "<blockquote>".to_string(),
        Tag::List(Some(start)) => format!("<ol start=\"{start}\">"),
        Tag::List(None) => "<ul>".to_string(),
        Tag::Item => "<li>".to_string(),
        Tag::FootnoteDefinition(name) => format!("<div class=\"footnote\" id=\"fn-{name}\">"),
        Tag::Table(_) => "<table>".to_string(),
        Tag::TableRow => "<tr>".to_string(),
        Tag::Emphasis => "<em>".to_string(),
        Tag::Strong => "<strong>".to_string(),
        Tag::Strikethrough => "<del>".to_string(),
        Tag::Link {
            dest_url, title, ..
        } => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", html_escape(title))
            };
            format!("<a href=\"{}\"{title_attr}>", html_escape(dest_url))
        }
        Tag::DefinitionList => "<dl>".to_string(),
        Tag::DefinitionListTitle => "<dt>".to_string(),
        Tag::DefinitionListDefinition => "<dd>".to_string(),
        Tag::Superscript => "<sup>".to_string(),
        Tag::Subscript => "<sub>".to_string(),
        // Headings, code blocks, images and table heads are handled by the caller.
        Tag::Heading { .. }
        | Tag::CodeBlock(_)
        | Tag::Image { .. }
        | Tag::TableHead
        | Tag::TableCell
        | Tag::HtmlBlock
        | Tag::MetadataBlock(_) => String::new(),
    }
}

/// Convert a pulldown-cmark tag end to an HTML closing tag.
fn tag_to_html_end(tag: &TagEnd) -> String {
    match tag {
        TagEnd::Paragraph => "</p>\n".to_string(),
        TagEnd::BlockQuote(_) => "</blockquote>\n".to_string(),
        TagEnd::List(true) => "</ol>\n".to_string(),
        TagEnd::List(false) => "</ul>\n".to_string(),
        TagEnd::Item => "</li>\n".to_string(),
        TagEnd::FootnoteDefinition => "</div>\n".to_string(),
        TagEnd::Table => "</tbody></table>\n".to_string(),
        TagEnd::TableRow => "</tr>\n".to_string(),
        TagEnd::Emphasis => "</em>".to_string(),
        TagEnd::Strong => "</strong>".to_string(),
        TagEnd::Strikethrough => "</del>".to_string(),
        TagEnd::Link => "</a>".to_string(),
        TagEnd::DefinitionList => "</dl>\n".to_string(),
        TagEnd::DefinitionListTitle => "</dt>\n".to_string(),
        TagEnd::DefinitionListDefinition => "</dd>\n".to_string(),
        TagEnd::Superscript => "</sup>".to_string(),
        TagEnd::Subscript => "</sub>".to_string(),
        TagEnd::Heading(_)
        | TagEnd::CodeBlock
        | TagEnd::Image
        | TagEnd::TableHead
        | TagEnd::TableCell
        | TagEnd::HtmlBlock
        | TagEnd::MetadataBlock(_) => String::new(),
    }
}

/// Convert text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_markdown() {
        let parser = MarkdownParser::new();
        let content = r#"---
title: "What is Husky?"
---

# Hello World

This is a test."#;

        let result = parser.parse(content, Path::new("husky.md")).unwrap();

        assert_eq!(result.frontmatter.title, "What is Husky?");
        assert!(result.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(result.html.contains("<p>This is a test.</p>"));
        assert_eq!(result.code_blocks, 0);
    }

    #[test]
    fn test_fenced_code_block_uses_renderer() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("```bash\nnpm install --save-dev husky\nnpx husky init\n```\n");

        assert_eq!(rendered.code_blocks, 1);
        assert!(rendered.html.contains(r#"class="code-block""#));
        assert!(rendered.html.contains(r#"data-lang="bash""#));
        assert!(rendered.html.contains("data-code=\"npm install --save-dev husky\nnpx husky init\""));
    }

    #[test]
    fn test_fence_info_string_takes_first_word() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("```json title=\"package.json\"\n{}\n```\n");
        assert!(rendered.html.contains(r#"data-lang="json""#));
    }

    #[test]
    fn test_indented_code_block_gets_default_language() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("Intro\n\n    ls -la\n    pwd\n");
        assert_eq!(rendered.code_blocks, 1);
        assert!(rendered.html.contains(r#"data-lang="bash""#));
        assert!(rendered.html.contains("data-code=\"ls -la\npwd\""));
    }

    #[test]
    fn test_code_block_element_is_dedented() {
        let parser = MarkdownParser::new();
        let source = "Run this:\n\n      <CodeBlock language=\"bash\">\n      {`\n          npm run lint\n          npm test\n      `}\n      </CodeBlock>\n\nDone.";
        let rendered = parser.render(source);

        assert_eq!(rendered.code_blocks, 1);
        assert!(rendered.html.contains("data-code=\"npm run lint\nnpm test\""));
        assert!(!rendered.html.contains("CodeBlock"));
        assert!(rendered.html.contains("<p>Done.</p>"));
    }

    #[test]
    fn test_code_block_element_without_language() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("<CodeBlock>{`echo \\`date\\``}</CodeBlock>");
        assert!(rendered.html.contains(r#"data-lang="bash""#));
        assert!(rendered.html.contains("data-code=\"echo `date`\""));
    }

    #[test]
    fn test_code_block_element_in_fenced_sample_is_literal() {
        let parser = MarkdownParser::new();
        let rendered = parser.render(
            "Usage:\n\n```mdx\n<CodeBlock language=\"bash\">{`npm test`}</CodeBlock>\n```\n",
        );

        assert_eq!(rendered.code_blocks, 1);
        assert!(rendered.html.contains(r#"data-lang="mdx""#));
        assert!(rendered.html.contains("&lt;CodeBlock"));
        assert!(!rendered.html.contains("codeblock:0"));
    }

    #[test]
    fn test_code_block_element_in_inline_code_is_literal() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("Write ``<CodeBlock>{`x`}</CodeBlock>`` in MDX.");

        assert_eq!(rendered.code_blocks, 0);
        assert!(rendered.html.contains("<code>&lt;CodeBlock&gt;"));
    }

    #[test]
    fn test_summary_is_plain_paragraph_text() {
        let parser = MarkdownParser::new();
        let rendered = parser.render(
            "# Setup\n\nDon't mix tabs & spaces.\nUse `prettier`.\n\n```bash\necho hi\n```\n\nThen commit.",
        );

        assert_eq!(
            rendered.summary,
            "Don't mix tabs & spaces. Use prettier. Then commit."
        );
    }

    #[test]
    fn test_toc_extraction() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("# Heading 1\n## Heading `two`\n### Heading 3 {#custom}");

        assert_eq!(rendered.toc.len(), 3);
        assert_eq!(rendered.toc[0].level, 1);
        assert_eq!(rendered.toc[0].text, "Heading 1");
        assert_eq!(rendered.toc[1].text, "Heading two");
        assert_eq!(rendered.toc[1].id, "heading-two");
        assert_eq!(rendered.toc[2].id, "custom");
        assert!(rendered.html.contains(r#"<h3 id="custom">"#));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Using lint-staged (recommended)"), "using-lint-staged-recommended");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("TL;DR"), "tldr");
    }

    #[test]
    fn test_table_rendering() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("| Hook | When |\n|------|------|\n| pre-commit | before commit |");

        assert!(rendered.html.contains("<table>"));
        assert!(rendered.html.contains("<th>Hook</th>"));
        assert!(rendered.html.contains("<td>pre-commit</td>"));
    }

    #[test]
    fn test_image_alt_text() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("![Husky logo](/img/husky.png)");
        assert!(rendered.html.contains(r#"<img src="/img/husky.png" alt="Husky logo" />"#));
    }

    #[test]
    fn test_link_rendering() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("[docs](https://typicode.github.io/husky)");
        assert!(rendered.html.contains(r#"<a href="https://typicode.github.io/husky">docs</a>"#));
    }

    #[test]
    fn test_task_list() {
        let parser = MarkdownParser::new();
        let rendered = parser.render("- [x] Done\n- [ ] Not done");
        assert!(rendered.html.contains("checked"));
    }

    #[test]
    fn test_unescape_template() {
        assert_eq!(unescape_template(r"a \` b \${c} \\ d \n"), r"a ` b ${c} \ d \n");
    }

    #[test]
    fn test_no_frontmatter() {
        let parser = MarkdownParser::new();
        let result = parser.parse("# Just Content", Path::new("test.md")).unwrap();
        assert!(result.frontmatter.title.is_empty());
        assert!(result.html.contains("Just Content"));
    }
}
