//! Copy-to-clipboard indicator state.
//!
//! A code block shows either an idle "copy" affordance or a "copied"
//! confirmation. A successful copy switches to [`CopyState::Copied`] and hands
//! out a [`RevertTicket`]; whoever owns the timer presents that ticket once the
//! reset delay has elapsed. Only the ticket from the most recent copy is
//! honoured, so copying again while already copied restarts the window
//! without ever passing through [`CopyState::Idle`].
//!
//! The model holds no timer itself. The browser component and the native CLI
//! session each drive it with their own scheduler.

use std::time::Duration;

use thiserror::Error;

/// How long the "copied" indicator stays visible.
pub const COPY_RESET_DELAY: Duration = Duration::from_millis(2000);

/// Visible state of a copy button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CopyState {
    /// Ready to copy.
    #[default]
    Idle,
    /// The block was just copied.
    Copied,
}

impl CopyState {
    /// Accessible label for the button in this state.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Copy code",
            Self::Copied => "Copied",
        }
    }

    /// Short tooltip for the button in this state.
    pub fn title(self) -> &'static str {
        match self {
            Self::Idle => "Copy",
            Self::Copied => "Copied",
        }
    }

    /// Whether the confirmation is showing.
    pub fn is_copied(self) -> bool {
        matches!(self, Self::Copied)
    }
}

/// The clipboard refused or could not accept the write.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("clipboard write rejected: {reason}")]
pub struct ClipboardError {
    reason: String,
}

impl ClipboardError {
    /// Create a clipboard error with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the write failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Proof that a particular copy is allowed to revert the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a revert ticket must be scheduled or the indicator never resets"]
pub struct RevertTicket {
    generation: u64,
}

impl RevertTicket {
    /// Generation of the copy that issued this ticket.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Per-instance copy state with stale-revert protection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStatus {
    state: CopyState,
    generation: u64,
    mounted: bool,
}

impl Default for CopyStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyStatus {
    /// A freshly mounted, idle status.
    pub fn new() -> Self {
        Self {
            state: CopyState::Idle,
            generation: 0,
            mounted: true,
        }
    }

    /// Current visible state.
    pub fn state(&self) -> CopyState {
        self.state
    }

    /// Whether the owning component is still alive.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Record a successful clipboard write.
    ///
    /// Returns the ticket that may later revert this copy, or `None` once the
    /// owner has been torn down.
    pub fn copy_succeeded(&mut self) -> Option<RevertTicket> {
        if !self.mounted {
            return None;
        }
        self.generation += 1;
        self.state = CopyState::Copied;
        Some(RevertTicket {
            generation: self.generation,
        })
    }

    /// Record a failed clipboard write. The state is left untouched.
    pub fn copy_failed(&mut self, error: &ClipboardError) {
        tracing::debug!(reason = error.reason(), "clipboard write failed, ignoring");
    }

    /// Apply the result of a clipboard write.
    pub fn record(&mut self, outcome: Result<(), ClipboardError>) -> Option<RevertTicket> {
        match outcome {
            Ok(()) => self.copy_succeeded(),
            Err(e) => {
                self.copy_failed(&e);
                None
            }
        }
    }

    /// Revert to idle if `ticket` belongs to the latest copy.
    ///
    /// Returns `true` when the state changed.
    pub fn revert(&mut self, ticket: RevertTicket) -> bool {
        if !self.mounted || ticket.generation != self.generation || !self.state.is_copied() {
            return false;
        }
        self.state = CopyState::Idle;
        true
    }

    /// Tear down the owner. Every later event is ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}
