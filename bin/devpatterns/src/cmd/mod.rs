//! CLI command implementations.

pub mod build;
pub mod check;
pub mod convert;
pub mod new;
pub mod show;
pub mod watch;
