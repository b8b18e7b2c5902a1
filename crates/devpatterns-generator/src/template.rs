//! HTML template system for page generation.
//!
//! Templates are plain strings with `{{ variable }}` placeholders; a trailing
//! `?` (`{{ variable? }}`) makes a variable optional.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when a value is present.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Check if a variable exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }
}

/// A named template string.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Substituted values are not rescanned, so they may contain `{{`.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..]
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;
            let end = start + end + 2;

            let var_name = result[start + 2..end - 2].trim();
            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim_end(), true),
                None => (var_name, false),
            };

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            };

            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(Template::new("base", BASE_TEMPLATE));
        self.register(Template::new("copy_script", COPY_SCRIPT_TEMPLATE));
        self.register(Template::new("home", HOME_TEMPLATE));
        self.register(Template::new("post", POST_TEMPLATE));
        self.register(Template::new("card", CARD_TEMPLATE));
        self.register(Template::new("series", SERIES_TEMPLATE));
        self.register(Template::new("category", CATEGORY_TEMPLATE));
    }

    /// Register a template, replacing any with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Page shell: sidebar, main column, footer and the copy script.
pub const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}{{ site_title_suffix? }}</title>
    <meta name="description" content="{{ description? }}">
    <meta name="author" content="{{ author? }}">
    <link rel="canonical" href="{{ canonical_url }}">
    <style>
        :root {
            --bg: #fafaf9;
            --bg-sidebar: #f4f4f5;
            --fg: #18181b;
            --muted: #71717a;
            --border: #e4e4e7;
            --accent: #27272a;
            --code-bg: {{ code_background }};
            --code-fg: {{ code_foreground }};
            --gutter: #6b7280;
            --sidebar-width: 16rem;
        }

        @media (prefers-color-scheme: dark) {
            :root {
                --bg: #09090b;
                --bg-sidebar: #111113;
                --fg: #fafafa;
                --muted: #a1a1aa;
                --border: #27272a;
                --accent: #e4e4e7;
            }
        }

        *, *::before, *::after { box-sizing: border-box; }
        body {
            margin: 0;
            font-family: ui-sans-serif, system-ui, -apple-system, sans-serif;
            line-height: 1.7;
            color: var(--fg);
            background: var(--bg);
        }
        a { color: inherit; text-decoration: none; }

        .layout { display: flex; min-height: 100vh; }

        .sidebar {
            position: sticky;
            top: 0;
            flex: 0 0 var(--sidebar-width);
            height: 100vh;
            overflow-y: auto;
            padding: 1.5rem 1rem;
            background: var(--bg-sidebar);
            border-right: 1px solid var(--border);
        }
        .sidebar-title {
            display: flex;
            align-items: center;
            gap: 0.5rem;
            margin-bottom: 2rem;
            font-size: 0.8rem;
            font-weight: 600;
            letter-spacing: 0.08em;
            text-transform: uppercase;
        }
        .sidebar h2 {
            margin: 1.75rem 0 0.5rem;
            font-size: 0.7rem;
            font-weight: 500;
            letter-spacing: 0.12em;
            text-transform: uppercase;
            color: var(--muted);
        }
        .sidebar ul { list-style: none; margin: 0; padding: 0; }
        .sidebar li a {
            display: flex;
            align-items: center;
            gap: 0.5rem;
            padding: 0.35rem 0.5rem;
            border-radius: 0.375rem;
            font-size: 0.875rem;
            color: var(--muted);
        }
        .sidebar li a:hover, .sidebar li a[aria-current="page"] {
            color: var(--fg);
            background: var(--border);
        }
        .sidebar ul ul { margin-left: 1.25rem; border-left: 1px solid var(--border); padding-left: 0.5rem; }
        .sidebar .icon { width: 1rem; height: 1rem; flex-shrink: 0; }
        .about { font-size: 0.8rem; color: var(--muted); }

        main { flex: 1; min-width: 0; }
        .content-column { max-width: 42rem; margin: 0 auto; padding: 3rem 1.5rem; }

        .meta {
            display: flex;
            align-items: center;
            gap: 0.75rem;
            font-size: 0.75rem;
            color: var(--muted);
        }
        .meta .category { font-weight: 500; letter-spacing: 0.12em; text-transform: uppercase; }
        .meta .sep { opacity: 0.4; }

        .post-card { padding: 2rem 0; border-bottom: 1px solid var(--border); }
        .post-card:last-child { border-bottom: none; }
        .post-card h2 { margin: 0.75rem 0; font-family: ui-serif, Georgia, serif; font-size: 1.4rem; line-height: 1.3; }
        .post-card p { margin: 0; font-size: 0.9rem; color: var(--muted); }
        .post-card .read-more { display: flex; gap: 0.5rem; margin-top: 0.75rem; font-size: 0.75rem; }
        .post-card .read-more .read-time { margin-left: auto; color: var(--muted); }

        article h1 { font-family: ui-serif, Georgia, serif; font-size: 2.25rem; line-height: 1.2; margin: 1.5rem 0; }
        article .excerpt { margin: 0 0 3rem; padding-left: 1.25rem; border-left: 2px solid var(--border); font-style: italic; color: var(--muted); }
        article .back { display: block; margin-top: 4rem; padding-top: 2rem; border-top: 1px solid var(--border); font-size: 0.875rem; color: var(--muted); }
        article table { width: 100%; border-collapse: collapse; font-size: 0.875rem; }
        article th, article td { padding: 0.5rem; border-bottom: 1px solid var(--border); text-align: left; }
        article :not(pre) > code { padding: 0.1rem 0.35rem; border-radius: 0.25rem; background: var(--border); font-size: 0.85em; }

        .code-block { position: relative; margin: 1rem 0; }
        .code-block pre {
            margin: 0;
            padding: 1.5rem 1rem 1rem;
            overflow-x: auto;
            border-radius: 0.5rem;
            background: var(--code-bg);
            color: var(--code-fg);
            font-size: 0.875rem;
            line-height: 1.6;
        }
        .code-block code { font-family: ui-monospace, 'SF Mono', Menlo, Consolas, monospace; }
        .code-block .line { display: block; }
        .code-block .line-number {
            display: inline-block;
            min-width: 2.25em;
            padding-right: 1em;
            text-align: right;
            color: var(--gutter);
            font-size: 0.75rem;
            user-select: none;
        }
        .copy-button {
            position: absolute;
            top: 0.5rem;
            right: 0.5rem;
            display: inline-flex;
            align-items: center;
            justify-content: center;
            padding: 6px;
            border: none;
            border-radius: 6px;
            background: transparent;
            color: #a1a1aa;
            cursor: pointer;
        }
        .copy-button:hover { color: #e4e4e7; }
        .copy-button .icon-check { display: none; }
        .copy-button[data-state="copied"] .icon-copy { display: none; }
        .copy-button[data-state="copied"] .icon-check { display: inline; }

        .series-list { list-style: none; padding: 0; counter-reset: article; }
        .series-list li { counter-increment: article; padding: 1rem 0; border-bottom: 1px solid var(--border); }
        .series-list li::before { content: counter(article, decimal-leading-zero); margin-right: 1rem; color: var(--muted); font-variant-numeric: tabular-nums; }

        footer { padding: 2rem 1.5rem; border-top: 1px solid var(--border); font-size: 0.75rem; color: var(--muted); }

        @media (max-width: 768px) {
            .layout { flex-direction: column; }
            .sidebar { position: static; height: auto; flex-basis: auto; border-right: none; border-bottom: 1px solid var(--border); }
            article h1 { font-size: 1.75rem; }
        }
    </style>
</head>
<body>
    <div class="layout">
        <aside class="sidebar">
            <a href="/" class="sidebar-title">{{ site_icon }}<span>{{ site_title }}</span></a>
            <nav aria-label="Articles">
                <ul>
                    {{ nav }}
                </ul>
            </nav>
            <h2>Categories</h2>
            <ul class="categories">
                {{ categories }}
            </ul>
            {{ about? }}
        </aside>
        <main>
            <div class="content-column">
                {{ content }}
            </div>
            <footer>{{ site_title }}, {{ year }}</footer>
        </main>
    </div>
    <script>{{ copy_script }}</script>
    {{ extra_head? }}
</body>
</html>"##;

/// Copy button behaviour for every `.copy-button` on the page.
///
/// A successful write flips the button to "copied" and (re)starts a single
/// revert timer; a failed write leaves it idle. Timers are cleared when the
/// page is hidden.
pub const COPY_SCRIPT_TEMPLATE: &str = r#"
(function () {
    const RESET_MS = {{ copy_reset_ms }};
    const timers = new Map();

    function show(button, state) {
        const copied = state === 'copied';
        button.dataset.state = state;
        button.setAttribute('aria-label', copied ? 'Copied' : 'Copy code');
        button.setAttribute('title', copied ? 'Copied' : 'Copy');
    }

    document.addEventListener('click', async (event) => {
        const button = event.target.closest('.copy-button');
        if (!button) return;
        try {
            await navigator.clipboard.writeText(button.dataset.code || '');
        } catch (_) {
            return;
        }
        clearTimeout(timers.get(button));
        show(button, 'copied');
        timers.set(button, setTimeout(() => {
            timers.delete(button);
            show(button, 'idle');
        }, RESET_MS));
    });

    window.addEventListener('pagehide', () => {
        timers.forEach((timer) => clearTimeout(timer));
        timers.clear();
    });
})();
"#;

/// Home page: every top-level article as a card.
pub const HOME_TEMPLATE: &str = r#"<section class="home">
    <h1>{{ title }}</h1>
    {{ intro? }}
    <div class="post-list">
        {{ cards }}
    </div>
</section>"#;

/// Single article.
pub const POST_TEMPLATE: &str = r#"<article class="post">
    <div class="meta">
        <span class="category">{{ category }}</span>
        {{ date_html? }}
        <span class="sep">/</span>
        <span class="read-time">{{ read_time }}</span>
    </div>
    <h1>{{ title }}</h1>
    {{ excerpt_html? }}
    <div class="content">
        {{ content }}
    </div>
    {{ series_html? }}
    <a class="back" href="/">&larr; Back to all articles</a>
</article>"#;

/// Article card for listings.
pub const CARD_TEMPLATE: &str = r#"<article class="post-card">
    <a href="{{ url }}">
        <div class="meta">
            <span class="category">{{ category }}</span>
            {{ date_html? }}
        </div>
        <h2>{{ title }}</h2>
        <p>{{ excerpt }}</p>
        <div class="read-more">
            <span>Read article &rarr;</span>
            <span class="read-time">{{ read_time }}</span>
        </div>
    </a>
</article>"#;

/// Series index: intro content followed by the ordered article list.
pub const SERIES_TEMPLATE: &str = r#"<section class="series">
    <div class="content">
        {{ content }}
    </div>
    <ol class="series-list">
        {{ items }}
    </ol>
</section>"#;

/// Category listing.
pub const CATEGORY_TEMPLATE: &str = r#"<section class="category-page">
    <h1 class="sidebar-title">{{ icon }}<span>{{ category }}</span></h1>
    <p class="count">{{ count }}</p>
    <div class="post-list">
        {{ cards }}
    </div>
</section>"#;
