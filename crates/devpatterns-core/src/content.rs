//! Content types: posts, series articles, categories and the site catalog.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    frontmatter::Frontmatter,
};

/// Words per minute assumed for read-time estimates.
const WORDS_PER_MINUTE: usize = 200;

/// Article category.
///
/// `All` is a filter, not something a post can belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    All,
    Design,
    #[default]
    Technology,
    Development,
    Thoughts,
    Craft,
}

/// Icons used by the navigation chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Layers,
    Pen,
    Monitor,
    Code,
    Lightbulb,
    Hammer,
    BookOpen,
    Home,
}

impl Icon {
    /// Inner SVG markup (24x24 viewBox, stroke-based).
    pub fn svg_body(self) -> &'static str {
        match self {
            Self::Layers => r#"<path d="m12.83 2.18a2 2 0 0 0-1.66 0L2.6 6.08a1 1 0 0 0 0 1.83l8.58 3.91a2 2 0 0 0 1.66 0l8.58-3.9a1 1 0 0 0 0-1.83Z"/><path d="m22 17.65-9.17 4.16a2 2 0 0 1-1.66 0L2 17.65"/><path d="m22 12.65-9.17 4.16a2 2 0 0 1-1.66 0L2 12.65"/>"#,
            Self::Pen => r#"<path d="M21.174 6.812a1 1 0 0 0-3.986-3.987L3.842 16.174a2 2 0 0 0-.5.83l-1.321 4.352a.5.5 0 0 0 .623.622l4.353-1.32a2 2 0 0 0 .83-.497z"/>"#,
            Self::Monitor => r#"<rect width="20" height="14" x="2" y="3" rx="2"/><line x1="8" x2="16" y1="21" y2="21"/><line x1="12" x2="12" y1="17" y2="21"/>"#,
            Self::Code => r#"<polyline points="16 18 22 12 16 6"/><polyline points="8 6 2 12 8 18"/>"#,
            Self::Lightbulb => r#"<path d="M15 14c.2-1 .7-1.7 1.5-2.5 1-.9 1.5-2.2 1.5-3.5A6 6 0 0 0 6 8c0 1 .2 2.2 1.5 3.5.7.7 1.3 1.5 1.5 2.5"/><path d="M9 18h6"/><path d="M10 22h4"/>"#,
            Self::Hammer => r#"<path d="m15 12-8.373 8.373a1 1 0 1 1-3-3L12 9"/><path d="m18 15 4-4"/><path d="m21.5 11.5-1.914-1.914A2 2 0 0 1 19 8.172V7l-2.26-2.26a6 6 0 0 0-4.202-1.756L9 2.96l.92.82A6.18 6.18 0 0 1 12 8.4V10l2 2h1.172a2 2 0 0 1 1.414.586L18.5 14.5"/>"#,
            Self::BookOpen => r#"<path d="M2 3h6a4 4 0 0 1 4 4v14a3 3 0 0 0-3-3H2z"/><path d="M22 3h-6a4 4 0 0 0-4 4v14a3 3 0 0 1 3-3h7z"/>"#,
            Self::Home => r#"<path d="m3 9 9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/><polyline points="9 22 9 12 15 12 15 22"/>"#,
        }
    }

    /// Complete inline `<svg>` element.
    pub fn to_svg(self) -> String {
        format!(
            r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">{}</svg>"#,
            self.svg_body()
        )
    }
}

impl Category {
    /// Every category in sidebar order.
    pub const ALL: [Category; 6] = [
        Self::All,
        Self::Design,
        Self::Technology,
        Self::Development,
        Self::Thoughts,
        Self::Craft,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Design => "Design",
            Self::Technology => "Technology",
            Self::Development => "Development",
            Self::Thoughts => "Thoughts",
            Self::Craft => "Craft",
        }
    }

    /// URL segment for category pages.
    pub fn slug(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Design => "design",
            Self::Technology => "technology",
            Self::Development => "development",
            Self::Thoughts => "thoughts",
            Self::Craft => "craft",
        }
    }

    /// Sidebar icon.
    pub fn icon(self) -> Icon {
        match self {
            Self::All => Icon::Layers,
            Self::Design => Icon::Pen,
            Self::Technology => Icon::Monitor,
            Self::Development => Icon::Code,
            Self::Thoughts => Icon::Lightbulb,
            Self::Craft => Icon::Hammer,
        }
    }

    /// Whether a post in `category` passes this filter.
    pub fn matches(self, category: Category) -> bool {
        self == Self::All || self == category
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category: {wanted}"))
    }
}

/// Table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,

    /// Heading text.
    pub text: String,

    /// Anchor ID for linking.
    pub id: String,
}

/// Parsed content with metadata and rendered HTML.
#[derive(Debug, Clone)]
pub struct ParsedContent {
    /// Parsed frontmatter metadata.
    pub frontmatter: Frontmatter,

    /// Rendered HTML content.
    pub html: String,

    /// Raw source content (without frontmatter).
    pub raw: String,

    /// Table of contents extracted from headings.
    pub toc: Vec<TocEntry>,

    /// Number of code blocks rendered.
    pub code_blocks: usize,

    /// Plain paragraph text, unescaped, used for the default excerpt.
    pub summary: String,
}

/// Where a content file sits on the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPath {
    /// Last path component, e.g. "husky".
    pub slug: String,

    /// Series the file belongs to, e.g. "setup-guide".
    pub series: Option<String>,

    /// Site URL, e.g. "/post/setup-guide/husky".
    pub url: String,
}

impl PostPath {
    /// Map a path relative to the content directory onto the site.
    ///
    /// - `index.md` → `/`
    /// - `the-art-of-simplicity.md` → `/post/the-art-of-simplicity`
    /// - `setup-guide/index.md` → `/post/setup-guide`
    /// - `setup-guide/husky.md` → `/post/setup-guide/husky` in series `setup-guide`
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let parent = path
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let parent = parent.trim_matches('/');

        if stem == "index" {
            if parent.is_empty() {
                return Some(Self {
                    slug: String::new(),
                    series: None,
                    url: "/".to_string(),
                });
            }
            let slug = parent.rsplit('/').next().unwrap_or(parent).to_string();
            return Some(Self {
                slug,
                series: None,
                url: format!("/post/{parent}"),
            });
        }

        if parent.is_empty() {
            Some(Self {
                slug: stem.to_string(),
                series: None,
                url: format!("/post/{stem}"),
            })
        } else {
            Some(Self {
                slug: stem.to_string(),
                series: Some(parent.to_string()),
                url: format!("/post/{parent}/{stem}"),
            })
        }
    }

    /// Whether this is the site home page.
    pub fn is_home(&self) -> bool {
        self.url == "/"
    }
}

/// A fully processed article ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Last URL segment.
    pub slug: String,

    /// Article title.
    pub title: String,

    /// Teaser text for cards.
    pub excerpt: String,

    /// Publication date.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Read time label, e.g. "6 min read".
    pub read_time: String,

    /// Article category.
    pub category: Category,

    /// Site URL.
    pub url: String,

    /// Parent series slug for series articles.
    #[serde(default)]
    pub series: Option<String>,

    /// Sort weight within a series.
    #[serde(default)]
    pub weight: i32,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Rendered HTML body.
    pub content: String,

    /// Table of contents.
    #[serde(default)]
    pub toc: Vec<TocEntry>,

    /// Number of code blocks in the body.
    #[serde(default)]
    pub code_blocks: usize,

    /// Source file path.
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl Post {
    /// Build a post from parsed content and its location.
    pub fn from_parsed(content: ParsedContent, location: &PostPath, source: &Path) -> Result<Self> {
        let fm = &content.frontmatter;
        fm.validate(source)?;

        let category = match fm.category.as_deref() {
            Some(label) => label
                .parse::<Category>()
                .map_err(|e| CoreError::content(source, e))?,
            None => Category::default(),
        };
        if category == Category::All {
            return Err(CoreError::content(
                source,
                "\"All\" is a filter, not a category",
            ));
        }

        let read_time = fm
            .read_time
            .clone()
            .unwrap_or_else(|| read_time_label(&content.raw));

        let excerpt = fm.excerpt.clone().unwrap_or_else(|| {
            let plain_text = content.summary.split_whitespace().collect::<Vec<_>>().join(" ");
            truncate_at_word_boundary(&plain_text, 160)
        });

        Ok(Self {
            slug: location.slug.clone(),
            title: fm.title.clone(),
            excerpt,
            date: fm.date,
            read_time,
            category,
            url: location.url.clone(),
            series: fm.series.clone().or_else(|| location.series.clone()),
            weight: fm.weight,
            draft: fm.draft,
            content: content.html,
            toc: content.toc,
            code_blocks: content.code_blocks,
            source_path: Some(source.to_path_buf()),
        })
    }

    /// Date as shown on cards, e.g. "Feb 8, 2026".
    pub fn date_display(&self) -> Option<String> {
        self.date.map(|d| d.format("%b %-d, %Y").to_string())
    }

    /// Whether this is the site home page.
    pub fn is_home(&self) -> bool {
        self.url == "/"
    }
}

/// Estimate reading time for a markdown body.
pub fn read_time_label(raw: &str) -> String {
    let words = raw.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

/// All published content, queryable the way the pages need it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    posts: Vec<Post>,
}

impl Catalog {
    /// Build a catalog, ordering posts newest first.
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(a.weight.cmp(&b.weight))
                .then_with(|| a.title.cmp(&b.title))
        });
        Self { posts }
    }

    /// Every entry, including the home page and series articles.
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    /// Home page content, if any.
    pub fn home(&self) -> Option<&Post> {
        self.posts.iter().find(|p| p.is_home())
    }

    /// Top-level posts (not the home page, not series articles).
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts
            .iter()
            .filter(|p| !p.is_home() && p.series.is_none())
    }

    /// Find a top-level post by slug.
    pub fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts().find(|p| p.slug == slug)
    }

    /// Top-level posts passing a category filter.
    pub fn posts_by_category(&self, category: Category) -> Vec<&Post> {
        self.posts().filter(|p| category.matches(p.category)).collect()
    }

    /// Articles in a series, by weight then title.
    pub fn articles_by_series(&self, series: &str) -> Vec<&Post> {
        let mut articles: Vec<_> = self
            .posts
            .iter()
            .filter(|p| p.series.as_deref() == Some(series))
            .collect();
        articles.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.title.cmp(&b.title)));
        articles
    }

    /// One article within a series.
    pub fn article(&self, series: &str, slug: &str) -> Option<&Post> {
        self.posts
            .iter()
            .find(|p| p.series.as_deref() == Some(series) && p.slug == slug)
    }

    /// `All` followed by every category used by a top-level post.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| *c == Category::All || self.posts().any(|p| p.category == *c))
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Truncate text at a word boundary, counting characters rather than bytes.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let truncated = &text[..cut];
    match truncated.rfind(' ') {
        Some(space) => format!("{}...", &truncated[..space]),
        None => format!("{truncated}..."),
    }
}
