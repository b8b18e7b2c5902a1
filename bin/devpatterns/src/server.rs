//! Development server with live reload.

use std::{convert::Infallible, path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use tokio::sync::broadcast;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};
use tower_http::services::ServeDir;

/// Path the browser subscribes to for reload events.
pub const LIVERELOAD_PATH: &str = "/__livereload";

/// Shared server state.
#[derive(Clone)]
pub struct ServerState {
    reload_tx: broadcast::Sender<()>,
}

impl ServerState {
    pub fn new() -> Self {
        let (reload_tx, _) = broadcast::channel(16);
        Self { reload_tx }
    }

    /// Tell every connected page to reload.
    pub fn notify_reload(&self) {
        let receivers = self.reload_tx.send(()).unwrap_or(0);
        tracing::debug!(receivers, "sent reload");
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.reload_tx.subscribe()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the development server router.
pub fn create_router(output_dir: &Path, state: Arc<ServerState>) -> Router {
    Router::new()
        .route(LIVERELOAD_PATH, get(livereload_handler))
        .fallback_service(ServeDir::new(output_dir))
        .with_state(state)
}

async fn livereload_handler(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Lagged receivers just miss a reload; the next one still arrives.
    let stream = BroadcastStream::new(state.subscribe())
        .filter_map(|msg| msg.ok().map(|()| Ok(Event::default().data("reload"))));

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(30)).text("ping"))
}

/// Script injected into generated pages while previewing.
pub const LIVERELOAD_SCRIPT: &str = r#"<script>
(function () {
  const source = new EventSource('/__livereload');
  source.onmessage = function (event) {
    if (event.data === 'reload') window.location.reload();
  };
})();
</script>
"#;

/// Add the live reload script before `</body>`, once.
pub fn inject_livereload(html: &str) -> Option<String> {
    if html.contains(LIVERELOAD_PATH) || !html.contains("</body>") {
        return None;
    }
    Some(html.replacen("</body>", &format!("{LIVERELOAD_SCRIPT}</body>"), 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_livereload() {
        let html = "<html><body><p>hi</p></body></html>";
        let injected = inject_livereload(html).unwrap();

        assert!(injected.contains("EventSource('/__livereload')"));
        assert!(injected.ends_with("</script>\n</body></html>"));
        assert!(inject_livereload(&injected).is_none());
    }

    #[test]
    fn test_inject_livereload_without_body() {
        assert!(inject_livereload("<p>fragment</p>").is_none());
    }

    #[tokio::test]
    async fn test_notify_reload_reaches_subscribers() {
        let state = ServerState::new();
        let mut rx = state.subscribe();

        state.notify_reload();
        assert!(rx.recv().await.is_ok());
    }
}
