//! Dev Patterns Core Library
//!
//! Core types, configuration, error handling and the copy-to-clipboard state
//! model shared by the generator, the CLI and the browser components.

pub mod config;
pub mod content;
pub mod copy;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{Catalog, Category, Icon, ParsedContent, Post, PostPath, TocEntry};
pub use copy::{COPY_RESET_DELAY, ClipboardError, CopyState, CopyStatus, RevertTicket};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
