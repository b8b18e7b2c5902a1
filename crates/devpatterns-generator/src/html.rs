//! HTML generation from the content catalog.
//!
//! Every page is an inner template (home, post, series, category) wrapped in
//! the base layout with the sidebar and copy script.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use devpatterns_core::{Catalog, Category, Config, Icon, Post};
use devpatterns_parser::html_escape;
use thiserror::Error;
use tracing::debug;

use crate::template::{Template, TemplateContext, TemplateError, TemplateRegistry};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Code block colors when the theme defines none.
const FALLBACK_CODE_BG: &str = "#1e1e1e";
const FALLBACK_CODE_FG: &str = "#d4d4d4";

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
    code_background: String,
    code_foreground: String,
}

/// What the base layout needs to know about the page it wraps.
struct PageShell<'a> {
    title: &'a str,
    url: &'a str,
    description: Option<&'a str>,
    active_category: Option<Category>,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            config,
            code_background: FALLBACK_CODE_BG.to_string(),
            code_foreground: FALLBACK_CODE_FG.to_string(),
        }
    }

    /// Use the highlighting theme's colors for code blocks.
    #[must_use]
    pub fn with_code_colors(mut self, background: Option<String>, foreground: Option<String>) -> Self {
        if let Some(bg) = background {
            self.code_background = bg;
        }
        if let Some(fg) = foreground {
            self.code_foreground = fg;
        }
        self
    }

    /// Register a custom template, replacing a built-in one of the same name.
    pub fn register_template(&mut self, template: Template) {
        self.templates.register(template);
    }

    /// Site configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate the home page: intro from `index.md` plus every top-level post.
    pub fn generate_home(&self, catalog: &Catalog) -> Result<String> {
        let home = catalog.home();
        let title = home.map_or(self.config.site.title.as_str(), |p| p.title.as_str());

        let mut ctx = TemplateContext::new()
            .with_var("title", html_escape(title))
            .with_var("cards", self.cards_html(catalog.posts()));
        ctx.insert_opt(
            "intro",
            home.filter(|p| !p.content.trim().is_empty())
                .map(|p| format!(r#"<div class="content">{}</div>"#, p.content)),
        );

        let inner = self.templates.render("home", &ctx)?;
        self.wrap(
            catalog,
            &inner,
            PageShell {
                title,
                url: "/",
                description: home
                    .map(|p| p.excerpt.as_str())
                    .or(self.config.site.description.as_deref()),
                active_category: Some(Category::All),
            },
        )
    }

    /// Generate a post page. Posts that head a series also list their articles.
    pub fn generate_post(&self, post: &Post, catalog: &Catalog) -> Result<String> {
        debug!(url = %post.url, "generating post page");

        let articles = catalog.articles_by_series(&post.slug);
        let content = if post.series.is_none() && !articles.is_empty() {
            let items = articles
                .iter()
                .map(|a| {
                    format!(
                        r#"<li><a href="{}">{}</a></li>"#,
                        html_escape(&a.url),
                        html_escape(&a.title)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n        ");
            let ctx = TemplateContext::new()
                .with_var("content", &post.content)
                .with_var("items", items);
            self.templates.render("series", &ctx)?
        } else {
            post.content.clone()
        };

        let mut ctx = TemplateContext::new()
            .with_var("title", html_escape(&post.title))
            .with_var("category", post.category.label())
            .with_var("read_time", html_escape(&post.read_time))
            .with_var("content", content);
        ctx.insert_opt("date_html", date_html(post));
        if !post.excerpt.is_empty() {
            ctx.insert(
                "excerpt_html",
                format!(r#"<p class="excerpt">{}</p>"#, html_escape(&post.excerpt)),
            );
        }
        ctx.insert_opt("series_html", self.series_nav_html(post, catalog));

        let inner = self.templates.render("post", &ctx)?;
        self.wrap(
            catalog,
            &inner,
            PageShell {
                title: &post.title,
                url: &post.url,
                description: Some(&post.excerpt),
                active_category: None,
            },
        )
    }

    /// Generate the listing page for one category.
    pub fn generate_category(&self, category: Category, catalog: &Catalog) -> Result<String> {
        let posts = catalog.posts_by_category(category);
        let count = match posts.len() {
            1 => "1 article".to_string(),
            n => format!("{n} articles"),
        };

        let ctx = TemplateContext::new()
            .with_var("icon", category.icon().to_svg())
            .with_var("category", category.label())
            .with_var("count", count)
            .with_var("cards", self.cards_html(posts.into_iter()));

        let inner = self.templates.render("category", &ctx)?;
        let url = category_url(category);
        self.wrap(
            catalog,
            &inner,
            PageShell {
                title: category.label(),
                url: &url,
                description: None,
                active_category: Some(category),
            },
        )
    }

    /// Output file for a site URL.
    #[must_use]
    pub fn output_path(url: &str, output_dir: &Path) -> PathBuf {
        let relative = url.trim_matches('/');

        if relative.is_empty() {
            output_dir.join("index.html")
        } else {
            output_dir.join(relative).join("index.html")
        }
    }

    fn wrap(&self, catalog: &Catalog, inner: &str, page: PageShell<'_>) -> Result<String> {
        let site = &self.config.site;
        let script_ctx =
            TemplateContext::new().with_var("copy_reset_ms", self.config.code.copy_reset_ms.to_string());
        let copy_script = self.templates.render("copy_script", &script_ctx)?;

        let suffix = if page.title == site.title {
            String::new()
        } else {
            format!(" | {}", html_escape(&site.title))
        };

        let mut ctx = TemplateContext::new()
            .with_var("lang", &site.language)
            .with_var("title", html_escape(page.title))
            .with_var("site_title_suffix", suffix)
            .with_var("canonical_url", self.config.url_for(page.url))
            .with_var("code_background", &self.code_background)
            .with_var("code_foreground", &self.code_foreground)
            .with_var("site_icon", Icon::Layers.to_svg())
            .with_var("site_title", html_escape(&site.title))
            .with_var("nav", nav_html(catalog, page.url))
            .with_var("categories", categories_html(catalog, page.active_category))
            .with_var("content", inner)
            .with_var("year", Utc::now().year().to_string())
            .with_var("copy_script", copy_script);

        ctx.insert_opt("description", page.description.map(html_escape));
        ctx.insert_opt("author", site.author.as_deref().map(html_escape));
        ctx.insert_opt(
            "about",
            site.about.as_deref().map(|about| {
                format!(
                    r#"<h2>About</h2>
            <p class="about">{}</p>"#,
                    html_escape(about)
                )
            }),
        );

        Ok(self.templates.render("base", &ctx)?)
    }

    fn cards_html<'a>(&self, posts: impl Iterator<Item = &'a Post>) -> String {
        posts
            .filter_map(|post| {
                let mut ctx = TemplateContext::new()
                    .with_var("url", html_escape(&post.url))
                    .with_var("category", post.category.label())
                    .with_var("title", html_escape(&post.title))
                    .with_var("excerpt", html_escape(&post.excerpt))
                    .with_var("read_time", html_escape(&post.read_time));
                ctx.insert_opt("date_html", date_html(post));
                self.templates.render("card", &ctx).ok()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Previous / next links between articles of the same series.
    fn series_nav_html(&self, post: &Post, catalog: &Catalog) -> Option<String> {
        let series = post.series.as_deref()?;
        let articles = catalog.articles_by_series(series);
        let index = articles.iter().position(|a| a.url == post.url)?;

        let link = |p: &Post, rel: &str, label: &str| {
            format!(
                r#"<a rel="{rel}" href="{}">{label} {}</a>"#,
                html_escape(&p.url),
                html_escape(&p.title)
            )
        };

        let mut parts = Vec::new();
        if let Some(prev) = index.checked_sub(1).and_then(|i| articles.get(i)) {
            parts.push(link(prev, "prev", "&larr;"));
        }
        if let Some(next) = articles.get(index + 1) {
            parts.push(link(next, "next", "&rarr;"));
        }
        if parts.is_empty() {
            return None;
        }
        Some(format!(r#"<nav class="series-nav">{}</nav>"#, parts.join("\n")))
    }
}

/// URL of a category listing; `All` is the home page.
pub fn category_url(category: Category) -> String {
    match category {
        Category::All => "/".to_string(),
        other => format!("/category/{}/", other.slug()),
    }
}

fn date_html(post: &Post) -> Option<String> {
    let date = post.date?;
    Some(format!(
        r#"<span class="sep">/</span>
        <time datetime="{}">{}</time>"#,
        date.format("%Y-%m-%d"),
        date.format("%b %-d, %Y")
    ))
}

fn current_attr(url: &str, current: &str) -> &'static str {
    if url.trim_end_matches('/') == current.trim_end_matches('/') {
        r#" aria-current="page""#
    } else {
        ""
    }
}

/// Home plus every top-level post; series heads list their articles.
fn nav_html(catalog: &Catalog, current: &str) -> String {
    let mut items = vec![format!(
        r#"<li><a href="/"{}>{}<span>Home</span></a></li>"#,
        current_attr("/", current),
        Icon::Home.to_svg()
    )];

    for post in catalog.posts() {
        let articles = catalog.articles_by_series(&post.slug);
        let icon = if articles.is_empty() {
            post.category.icon()
        } else {
            Icon::BookOpen
        };

        let mut item = format!(
            r#"<li><a href="{}"{}>{}<span>{}</span></a>"#,
            html_escape(&post.url),
            current_attr(&post.url, current),
            icon.to_svg(),
            html_escape(&post.title)
        );
        if !articles.is_empty() {
            item.push_str("<ul>");
            for article in articles {
                item.push_str(&format!(
                    r#"<li><a href="{}"{}><span>{}</span></a></li>"#,
                    html_escape(&article.url),
                    current_attr(&article.url, current),
                    html_escape(&article.title)
                ));
            }
            item.push_str("</ul>");
        }
        item.push_str("</li>");
        items.push(item);
    }

    items.join("\n                    ")
}

fn categories_html(catalog: &Catalog, active: Option<Category>) -> String {
    catalog
        .categories()
        .into_iter()
        .map(|category| {
            let current = if active == Some(category) {
                r#" aria-current="page""#
            } else {
                ""
            };
            format!(
                r#"<li><a href="{}"{current}>{}<span>{}</span></a></li>"#,
                category_url(category),
                category.icon().to_svg(),
                category.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n                ")
}
