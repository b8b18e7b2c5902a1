//! Watch command - development server with live reload

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use color_eyre::eyre::{Result, WrapErr};
use devpatterns_generator::{BuildStats, Builder};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::{net::TcpListener, sync::mpsc, time::Instant};

use super::build::{SitePaths, load_config};
use crate::server::{ServerState, create_router, inject_livereload};

/// Debounce interval for file changes.
const DEBOUNCE_MS: u64 = 200;

/// Run the watch command.
///
/// Builds the site with drafts, serves it, and rebuilds on content changes.
pub async fn run(config_path: &Path, port: u16, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, port, "Starting watch mode");

    let mut config = load_config(config_path)?;
    config.build.drafts = true;

    let paths = SitePaths::resolve(config_path, &config, None);

    tracing::info!("Running initial build...");
    let builder = Builder::new(config.clone(), &paths.content_dir, &paths.output_dir);
    let stats = build_with_livereload(&builder)?;
    print_rebuild(&stats);

    let state = Arc::new(ServerState::new());

    let (tx, mut rx) = mpsc::channel::<()>(16);
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_))
                        | EventKind::Create(_)
                        | EventKind::Remove(_)
                )
            {
                let _ = tx.blocking_send(());
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for dir in watched_paths(config_path, &paths.content_dir) {
        let mode = if dir.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&dir, mode)
            .wrap_err_with(|| format!("Failed to watch {}", dir.display()))?;
        tracing::debug!(path = %dir.display(), "Watching");
    }

    let rebuild_state = Arc::clone(&state);
    let rebuild_config_path = config_path.to_path_buf();
    let rebuild_paths = paths.clone();
    tokio::spawn(async move {
        let mut last_rebuild = Instant::now();

        while rx.recv().await.is_some() {
            if last_rebuild.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
                continue;
            }
            while rx.try_recv().is_ok() {}

            println!();
            println!("  File change detected, rebuilding...");

            let result = load_config(&rebuild_config_path).and_then(|mut config| {
                config.build.drafts = true;
                let builder =
                    Builder::new(config, &rebuild_paths.content_dir, &rebuild_paths.output_dir);
                build_with_livereload(&builder)
            });

            match result {
                Ok(stats) => {
                    print_rebuild(&stats);
                    rebuild_state.notify_reload();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Rebuild failed");
                    eprintln!("  ✗ Rebuild failed: {e}");
                }
            }

            last_rebuild = Instant::now();
        }
    });

    let app = create_router(&paths.output_dir, state);
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Dev server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser && let Err(e) = open::that(format!("http://{addr}")) {
        tracing::warn!(error = %e, "Failed to open browser");
    }

    // Keep watcher alive
    let _watcher = watcher;

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}

/// Content directory and config file, when they exist.
fn watched_paths(config_path: &Path, content_dir: &Path) -> Vec<PathBuf> {
    [content_dir, config_path]
        .into_iter()
        .filter(|p| p.exists())
        .map(Path::to_path_buf)
        .collect()
}

fn print_rebuild(stats: &BuildStats) {
    println!(
        "  ✓ Built {} pages, {} category pages, {} code blocks in {}ms",
        stats.pages, stats.category_pages, stats.code_blocks, stats.duration_ms
    );
}

/// Build, then inject the live reload script into every HTML page.
fn build_with_livereload(builder: &Builder) -> Result<BuildStats> {
    let stats = builder.build().wrap_err("Build failed")?;
    inject_into_html(builder.output_dir())?;
    tracing::debug!(?stats, "Build completed");
    Ok(stats)
}

fn inject_into_html(output_dir: &Path) -> Result<()> {
    for entry in walkdir::WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
    {
        let path = entry.path();
        let html = fs::read_to_string(path)?;
        if let Some(injected) = inject_livereload(&html) {
            fs::write(path, injected)?;
        }
    }

    Ok(())
}
