//! Dev Patterns CLI Library
//!
//! Command implementations, the preview server and the native copy session
//! behind the `devpatterns` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, watch, new, check, show, convert)
//! - [`copy`] - Clipboard copy with a self-resetting "copied" indicator
//! - [`server`] - Development server with live reload
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use devpatterns::cmd;
//!
//! // Build the site described by config.toml
//! cmd::build::run(Path::new("config.toml"), None, false, None).unwrap();
//! ```

use std::path::{Path, PathBuf};

pub mod cmd;
pub mod copy;
pub mod server;

pub use copy::{Clipboard, CopySession, SystemClipboard};
pub use devpatterns_core::{Config, Post};
pub use devpatterns_generator::{BuildStats, Builder, ContentCollector};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Directory that relative paths in a config file are resolved against.
pub fn site_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_root() {
        assert_eq!(site_root(Path::new("config.toml")), PathBuf::from("."));
        assert_eq!(
            site_root(Path::new("demos/site/config.toml")),
            PathBuf::from("demos/site")
        );
    }
}
