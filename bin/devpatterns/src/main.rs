//! Dev Patterns CLI
//!
//! Builds and previews the Dev Patterns & Practices site and works with its
//! code samples.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Dev Patterns.
#[derive(Parser)]
#[command(
    name = "devpatterns",
    version,
    about = "Static site generator and code-sample tooling for Dev Patterns & Practices"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the static site
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include draft articles
        #[arg(long)]
        drafts: bool,
        /// Override site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Start development server with live reload
    Watch {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Create a new article (e.g., setup-guide/eslint)
    New {
        /// Path under the content directory
        path: PathBuf,
        /// Article category
        #[arg(short = 'C', long, default_value = "Technology")]
        category: String,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print a code sample dedented and highlighted
    Show {
        /// File holding the sample
        file: PathBuf,
        /// Language tag (defaults to the file extension)
        #[arg(short, long)]
        lang: Option<String>,
        /// Also copy the dedented sample to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Rewrite fenced code blocks into <CodeBlock> elements
    Convert {
        /// Directory to scan
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Report changes without writing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    devpatterns::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            drafts,
            base_url,
        } => {
            devpatterns::cmd::build::run(
                &cli.config,
                output.as_deref(),
                drafts,
                base_url.as_deref(),
            )?;
        }
        Commands::Watch { port, open } => {
            devpatterns::cmd::watch::run(&cli.config, port, open).await?;
        }
        Commands::New { path, category } => {
            devpatterns::cmd::new::run(&cli.config, &path, &category)?;
        }
        Commands::Check { strict } => {
            devpatterns::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Show { file, lang, copy } => {
            devpatterns::cmd::show::run(&cli.config, &file, lang.as_deref(), copy).await?;
        }
        Commands::Convert { root, dry_run } => {
            devpatterns::cmd::convert::run(&root, dry_run)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let cli = Cli::parse_from(["devpatterns", "build", "--output", "dist"]);

        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                output,
                drafts,
                base_url,
            } => {
                assert_eq!(output, Some(PathBuf::from("dist")));
                assert!(!drafts);
                assert!(base_url.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_drafts_and_base_url() {
        let cli = Cli::parse_from([
            "devpatterns",
            "build",
            "--drafts",
            "--base-url",
            "https://example.com",
        ]);

        match cli.command {
            Commands::Build {
                drafts, base_url, ..
            } => {
                assert!(drafts);
                assert_eq!(base_url.as_deref(), Some("https://example.com"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_watch_command_parsing() {
        let cli = Cli::parse_from(["devpatterns", "watch", "--port", "8080", "--open"]);

        match cli.command {
            Commands::Watch { port, open } => {
                assert_eq!(port, 8080);
                assert!(open);
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_new_command_parsing() {
        let cli = Cli::parse_from(["devpatterns", "new", "setup-guide/eslint", "-C", "Development"]);

        match cli.command {
            Commands::New { path, category } => {
                assert_eq!(path, PathBuf::from("setup-guide/eslint"));
                assert_eq!(category, "Development");
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let cli = Cli::parse_from(["devpatterns", "check", "--strict"]);
        assert!(matches!(cli.command, Commands::Check { strict: true }));
    }

    #[test]
    fn test_cli_show_command_parsing() {
        let cli = Cli::parse_from(["devpatterns", "show", "snippet.ts", "--lang", "ts", "--copy"]);

        match cli.command {
            Commands::Show { file, lang, copy } => {
                assert_eq!(file, PathBuf::from("snippet.ts"));
                assert_eq!(lang.as_deref(), Some("ts"));
                assert!(copy);
            }
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_cli_convert_defaults() {
        let cli = Cli::parse_from(["devpatterns", "convert"]);

        match cli.command {
            Commands::Convert { root, dry_run } => {
                assert_eq!(root, PathBuf::from("."));
                assert!(!dry_run);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_cli_verbosity_and_config() {
        let cli = Cli::parse_from(["devpatterns", "-vvv", "--config", "site.toml", "build"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
