//! Article cards and the filtered article list.

use devpatterns_core::{Category, Post};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// What a card needs to know about a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Article title.
    pub title: String,

    /// Teaser text.
    pub excerpt: String,

    /// Display date, e.g. "Feb 8, 2026".
    #[serde(default)]
    pub date: Option<String>,

    /// Read time label.
    pub read_time: String,

    /// Article category.
    pub category: Category,

    /// Link target.
    pub url: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            date: post.date_display(),
            read_time: post.read_time.clone(),
            category: post.category,
            url: post.url.clone(),
        }
    }
}

/// Posts that pass `filter`, in their listed order.
pub fn filter_posts(posts: &[PostSummary], filter: Category) -> Vec<PostSummary> {
    posts
        .iter()
        .filter(|p| filter.matches(p.category))
        .cloned()
        .collect()
}

/// List heading for the active filter.
pub fn list_heading(filter: Category) -> &'static str {
    match filter {
        Category::All => "Latest Articles",
        other => other.label(),
    }
}

/// "1 article", "3 articles".
pub fn article_count(count: usize) -> String {
    let noun = if count == 1 { "article" } else { "articles" };
    format!("{count} {noun}")
}

/// A single article card.
#[component]
pub fn PostCard(post: PostSummary) -> impl IntoView {
    view! {
      <article class="post-card">
        <a href=post.url>
          <div class="post-meta">
            <span class="post-category">{post.category.label()}</span>
            <span class="post-sep">"/"</span>
            <time>{post.date.unwrap_or_default()}</time>
          </div>
          <h2 class="post-title">{post.title}</h2>
          <p class="post-excerpt">{post.excerpt}</p>
          <div class="post-footer">
            <span class="post-read">"Read article"</span>
            <span class="post-read-time">{post.read_time}</span>
          </div>
        </a>
      </article>
    }
}

/// Article cards filtered by the active category.
#[component]
pub fn PostList(
    /// Every listable post, newest first.
    posts: Vec<PostSummary>,
    /// The active filter.
    #[prop(into)]
    active: Signal<Category>,
) -> impl IntoView {
    let posts = StoredValue::new(posts);
    let visible = Memo::new(move |_| posts.with_value(|all| filter_posts(all, active.get())));

    view! {
      <section id="articles" class="post-list">
        <header class="post-list-header">
          <h1>{move || list_heading(active.get())}</h1>
          <span class="post-count">{move || article_count(visible.with(Vec::len))}</span>
        </header>
        <Show
          when=move || visible.with(|v| !v.is_empty())
          fallback=|| view! { <p class="post-list-empty">"No articles found in this category."</p> }
        >
          <For
            each=move || visible.get()
            key=|post| post.url.clone()
            children=|post| view! { <PostCard post=post /> }
          />
        </Show>
      </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(title: &str, category: Category) -> PostSummary {
        PostSummary {
            title: title.to_string(),
            excerpt: String::new(),
            date: Some("Feb 8, 2026".to_string()),
            read_time: "5 min read".to_string(),
            category,
            url: format!("/post/{}", title.to_lowercase()),
        }
    }

    #[test]
    fn test_filter_posts() {
        let posts = vec![
            summary("Simplicity", Category::Design),
            summary("Web", Category::Technology),
            summary("Setup", Category::Technology),
        ];

        assert_eq!(filter_posts(&posts, Category::All).len(), 3);

        let tech: Vec<_> = filter_posts(&posts, Category::Technology)
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(tech, ["Web", "Setup"]);

        assert!(filter_posts(&posts, Category::Craft).is_empty());
    }

    #[test]
    fn test_list_heading() {
        assert_eq!(list_heading(Category::All), "Latest Articles");
        assert_eq!(list_heading(Category::Design), "Design");
    }

    #[test]
    fn test_article_count() {
        assert_eq!(article_count(0), "0 articles");
        assert_eq!(article_count(1), "1 article");
        assert_eq!(article_count(4), "4 articles");
    }

    #[test]
    fn test_summary_serde() {
        let json = serde_json::to_string(&summary("Web", Category::Technology)).unwrap();
        assert!(json.contains(r#""category":"Technology""#));

        let back: PostSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "Web");
    }
}
