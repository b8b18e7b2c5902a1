//! Convert command - rewrite fenced code into `<CodeBlock>` elements

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use devpatterns_parser::convert::convert_tree;

/// Run the convert command.
pub fn run(root: &Path, dry_run: bool) -> Result<()> {
    tracing::info!(root = %root.display(), dry_run, "Converting code blocks");

    let report = convert_tree(root, dry_run)
        .wrap_err_with(|| format!("Failed to convert files under {}", root.display()))?;

    let verb = if dry_run { "Would update" } else { "Updated" };
    for path in &report.updated {
        println!("{verb}: {}", path.display());
    }
    println!(
        "\nDone. Files scanned: {}, files {}: {}",
        report.scanned,
        if dry_run { "to update" } else { "updated" },
        report.updated_count()
    );

    Ok(())
}
