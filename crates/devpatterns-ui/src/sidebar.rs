//! Category sidebar.

use devpatterns_core::{Category, Icon};
use leptos::prelude::*;

/// Default blurb under the "About" heading.
pub const DEFAULT_ABOUT: &str =
    "Thoughts on design, technology, and the craft of building for the web.";

/// Sidebar with one filter button per category.
///
/// Clicking a button makes it the active filter and, on narrow screens,
/// closes the sidebar when an `open` signal is given.
#[component]
pub fn CategorySidebar(
    /// Categories to offer, in display order.
    categories: Vec<Category>,
    /// The active filter.
    active: RwSignal<Category>,
    /// Text for the "About" block.
    #[prop(optional, into)]
    about: Option<String>,
    /// Mobile open/closed state.
    #[prop(optional)]
    open: Option<RwSignal<bool>>,
) -> impl IntoView {
    let about = about.unwrap_or_else(|| DEFAULT_ABOUT.to_string());
    let is_open = move || open.is_some_and(|o| o.get());
    let close = move || {
        if let Some(o) = open {
            o.set(false);
        }
    };

    let buttons = categories
        .into_iter()
        .map(|category| {
            let is_active = move || active.get() == category;
            view! {
              <button
                type="button"
                class="sidebar-category"
                class:active=is_active
                aria-pressed=move || is_active().to_string()
                on:click=move |_| {
                    active.set(category);
                    close();
                }
              >
                <span class="sidebar-icon" inner_html=category.icon().to_svg() />
                {category.label()}
              </button>
            }
        })
        .collect_view();

    view! {
      <Show when=is_open>
        <div
          class="sidebar-overlay"
          role="button"
          tabindex="0"
          aria-label="Close sidebar"
          on:click=move |_| close()
        />
      </Show>
      <aside class="sidebar" class:open=is_open aria-label="Sidebar navigation">
        <div class="sidebar-heading">
          <span class="sidebar-icon" inner_html=Icon::BookOpen.to_svg() />
          <span>"Categories"</span>
        </div>
        <nav class="sidebar-categories">{buttons}</nav>
        <div class="sidebar-about">
          <p class="sidebar-label">"About"</p>
          <p>{about}</p>
        </div>
      </aside>
    }
}
