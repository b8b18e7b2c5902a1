//! Show command - print a code sample the way a page renders it

use std::{fs, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use devpatterns_core::{Config, CopyState};
use devpatterns_parser::{SyntaxHighlighter, dedent};

use super::build::load_config;
use crate::copy::{CopySession, SystemClipboard};

/// Run the show command.
///
/// Dedents the file, highlights it with line numbers and optionally copies
/// the dedented text to the clipboard.
pub async fn run(config_path: &Path, file: &Path, lang: Option<&str>, copy: bool) -> Result<()> {
    let config = load_config(config_path).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Using default configuration");
        Config::default()
    });

    let raw = fs::read_to_string(file)
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let code = dedent(&raw);
    let language = resolve_language(lang, file, &config.code.default_language);
    tracing::info!(file = %file.display(), language, "Showing code sample");

    let highlighter = SyntaxHighlighter::new(&config.build.syntax_theme);
    let lines = highlighter.highlight_terminal(&code, Some(&language));
    for line in number_lines(&lines, config.code.line_numbers) {
        println!("{line}");
    }

    if copy {
        let mut session = CopySession::with_reset_delay(
            SystemClipboard::new(),
            config.code.copy_reset_delay(),
        );
        // A rejected write leaves the indicator idle and prints nothing.
        if session.copy(&code) == CopyState::Copied {
            println!();
            println!("  ✓ {}", CopyState::Copied.label());
            session.wait_idle().await;
        }
    }

    Ok(())
}

/// Language to highlight with: explicit flag, then file extension, then default.
fn resolve_language(lang: Option<&str>, file: &Path, default: &str) -> String {
    lang.map(str::trim)
        .filter(|l| !l.is_empty())
        .or_else(|| file.extension().and_then(|e| e.to_str()))
        .unwrap_or(default)
        .to_string()
}

/// Prefix lines with a right-aligned, 1-based gutter.
fn number_lines(lines: &[String], enabled: bool) -> Vec<String> {
    if !enabled {
        return lines.to_vec();
    }
    let width = lines.len().to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("\x1b[2m{:>width$}\x1b[0m  {line}", i + 1))
        .collect()
}
