//! Dev Patterns UI Components
//!
//! Leptos components for the Dev Patterns & Practices frontend.
//!
//! # Components
//!
//! ## Code
//! - [`CodeBlock`] - Dedented, highlighted code with a copy button
//!
//! ## Navigation
//! - [`CategorySidebar`] - Category filter buttons with icons
//! - [`PostList`] - Article cards filtered by the active category
//! - [`PostCard`] - A single article card
//!
//! # Example
//!
//! ```ignore
//! use devpatterns_core::Category;
//! use devpatterns_ui::{CategorySidebar, CodeBlock, PostList, PostSummary};
//! use leptos::prelude::*;
//!
//! #[component]
//! fn App(posts: Vec<PostSummary>) -> impl IntoView {
//!     let active = RwSignal::new(Category::All);
//!
//!     view! {
//!         <CategorySidebar categories=Category::ALL.to_vec() active=active />
//!         <PostList posts=posts active=active.into() />
//!         <CodeBlock code="\n    npm install --save-dev husky\n  " language="bash" />
//!     }
//! }
//! ```

pub mod code_block;
pub mod posts;
pub mod sidebar;

pub use code_block::CodeBlock;
pub use posts::{PostCard, PostList, PostSummary};
pub use sidebar::CategorySidebar;
