//! Native clipboard copy with a self-resetting "copied" indicator.
//!
//! [`CopySession`] is the terminal counterpart of the browser copy button:
//! a successful copy shows "Copied" for the reset delay, copying again
//! restarts that window, a failed write is ignored, and dropping the session
//! cancels the pending reset.

use std::{sync::Arc, time::Duration};

use devpatterns_core::{COPY_RESET_DELAY, ClipboardError, CopyState, CopyStatus};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::debug;

/// Somewhere text can be copied to.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Connect to the system clipboard. A missing clipboard is reported on
    /// the first write.
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                debug!(error = %e, "system clipboard unavailable");
                None
            }
        };
        Self { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| ClipboardError::new("clipboard not available"))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::new(e.to_string()))
    }
}

/// Owns a [`CopyStatus`] and the task that reverts it.
///
/// Must be used from within a tokio runtime.
pub struct CopySession<C: Clipboard = SystemClipboard> {
    clipboard: C,
    status: Arc<watch::Sender<CopyStatus>>,
    reset_delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<C: Clipboard> CopySession<C> {
    /// Create a session with the default reset delay.
    pub fn new(clipboard: C) -> Self {
        Self::with_reset_delay(clipboard, COPY_RESET_DELAY)
    }

    /// Create a session with a custom reset delay.
    pub fn with_reset_delay(clipboard: C, reset_delay: Duration) -> Self {
        let (status, _) = watch::channel(CopyStatus::new());
        Self {
            clipboard,
            status: Arc::new(status),
            reset_delay,
            pending: None,
        }
    }

    /// Current indicator state.
    pub fn state(&self) -> CopyState {
        self.status.borrow().state()
    }

    /// Watch status changes.
    pub fn subscribe(&self) -> watch::Receiver<CopyStatus> {
        self.status.subscribe()
    }

    /// Copy `text`, returning the indicator state afterwards.
    ///
    /// Failures leave the state and any pending reset untouched.
    pub fn copy(&mut self, text: &str) -> CopyState {
        let outcome = self.clipboard.set_text(text);

        let mut ticket = None;
        self.status.send_if_modified(|status| {
            ticket = status.record(outcome);
            ticket.is_some()
        });

        if let Some(ticket) = ticket {
            if let Some(previous) = self.pending.take() {
                previous.abort();
            }

            let status = Arc::clone(&self.status);
            let deadline = Instant::now() + self.reset_delay;
            self.pending = Some(tokio::spawn(async move {
                sleep_until(deadline).await;
                status.send_if_modified(|s| s.revert(ticket));
            }));
            debug!(bytes = text.len(), "copied to clipboard");
        }

        self.state()
    }

    /// Wait until the indicator is idle again.
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        let _ = rx
            .wait_for(|s| !s.state().is_copied() || !s.is_mounted())
            .await;
    }
}

impl<C: Clipboard> Drop for CopySession<C> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.status.send_modify(CopyStatus::unmount);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::time::{advance, sleep};

    use super::*;

    #[derive(Clone, Default)]
    struct FakeClipboard {
        writes: Arc<Mutex<Vec<String>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl FakeClipboard {
        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl Clipboard for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if *self.fail.lock().unwrap() {
                return Err(ClipboardError::new("permission denied"));
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_reverts_after_delay() {
        let clipboard = FakeClipboard::default();
        let mut session = CopySession::new(clipboard.clone());

        assert_eq!(session.copy("foo\nbar"), CopyState::Copied);
        assert_eq!(clipboard.writes(), ["foo\nbar"]);

        sleep(ms(1999)).await;
        assert_eq!(session.state(), CopyState::Copied);

        sleep(ms(2)).await;
        assert_eq!(session.state(), CopyState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recopy_restarts_window_without_idle_flash() {
        let mut session = CopySession::new(FakeClipboard::default());
        let mut rx = session.subscribe();

        session.copy("first");
        sleep(ms(1500)).await;
        session.copy("second");
        rx.mark_unchanged();

        // The first copy's deadline passes without any change being published.
        sleep(ms(501)).await;
        assert_eq!(session.state(), CopyState::Copied);
        assert!(!rx.has_changed().unwrap());

        sleep(ms(1498)).await;
        assert_eq!(session.state(), CopyState::Copied);

        sleep(ms(2)).await;
        assert_eq!(session.state(), CopyState::Idle);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_copy_is_silent() {
        let clipboard = FakeClipboard::default();
        clipboard.set_failing(true);
        let mut session = CopySession::new(clipboard.clone());

        assert_eq!(session.copy("foo"), CopyState::Idle);
        assert!(clipboard.writes().is_empty());

        sleep(ms(5000)).await;
        assert_eq!(session.state(), CopyState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_while_copied_keeps_first_deadline() {
        let clipboard = FakeClipboard::default();
        let mut session = CopySession::new(clipboard.clone());

        session.copy("foo");
        sleep(ms(1000)).await;

        clipboard.set_failing(true);
        assert_eq!(session.copy("bar"), CopyState::Copied);

        sleep(ms(1001)).await;
        assert_eq!(session.state(), CopyState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_revert() {
        let mut session = CopySession::new(FakeClipboard::default());
        let rx = session.subscribe();

        session.copy("foo");
        drop(session);

        let status = rx.borrow().clone();
        assert!(!status.is_mounted());
        assert_eq!(status.state(), CopyState::Copied);

        advance(ms(3000)).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.borrow().state(), CopyState::Copied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_idle() {
        let mut session = CopySession::with_reset_delay(FakeClipboard::default(), ms(500));
        session.copy("foo");

        let start = Instant::now();
        session.wait_idle().await;

        assert_eq!(session.state(), CopyState::Idle);
        assert!(start.elapsed() >= ms(500));
    }
}
