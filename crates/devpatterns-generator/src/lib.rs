//! Dev Patterns Generator Library
//!
//! Static site generation for the Dev Patterns & Practices article site.
//!
//! # Modules
//!
//! - [`template`] - HTML template system with variable interpolation
//! - [`html`] - Page generation from the content catalog
//! - [`collector`] - Content collection
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod html;
pub mod template;

pub use build::{BuildError, BuildStats, Builder};
pub use collector::ContentCollector;
pub use html::HtmlGenerator;
pub use template::{Template, TemplateContext, TemplateRegistry};
