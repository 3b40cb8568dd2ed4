//! Synchronization between the host-owned canonical value and the surface.
//!
//! The host owns the canonical string and pushes it back in on every
//! change - including the change the editor itself just reported. Naively
//! overwriting the surface on every external value would reset the caret
//! and drop in-flight keystrokes, so the controller distinguishes the two
//! cases: "the host changed the document out from under the user" (rare,
//! must reload) and "the document changed because the user is typing"
//! (common, must not touch the surface).

use web_time::Instant;

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Surface content reflects the last known canonical value.
    #[default]
    Idle,
    /// The user is actively editing; the surface is the source of truth
    /// until the next serialization round-trips through the host.
    Editing,
}

/// What to do with an externally pushed canonical value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExternalUpdate {
    /// The value is the echo of this controller's own previous
    /// notification. The surface must not be touched.
    Echo,
    /// The host genuinely changed the document; replace the surface
    /// content wholesale.
    Reload,
}

/// The two-state echo-suppression machine.
#[derive(Clone, Debug, Default)]
pub struct SyncController {
    state: SyncState,
    /// The surface's own last-serialized output; the echo baseline.
    last_local: Option<String>,
    last_local_at: Option<Instant>,
}

impl SyncController {
    /// A controller with no baseline yet (nothing mounted).
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller for a freshly mounted surface whose serialization is
    /// `baseline`. An immediate external push of the same value is then a
    /// no-op instead of a caret-resetting reload.
    pub fn mounted(baseline: impl Into<String>) -> Self {
        Self {
            state: SyncState::Idle,
            last_local: Some(baseline.into()),
            last_local_at: None,
        }
    }

    /// Record a local serialization (command execution or keystroke).
    /// The next external value equal to it is an echo.
    pub fn record_local(&mut self, serialized: &str) {
        self.state = SyncState::Editing;
        if self.last_local.as_deref() != Some(serialized) {
            self.last_local = Some(serialized.to_owned());
        }
        self.last_local_at = Some(Instant::now());
    }

    /// Classify an externally pushed canonical value.
    ///
    /// An echo settles the controller back to [`SyncState::Idle`]: the
    /// round trip through the host is complete. A reload decision leaves
    /// the baseline untouched until the caller re-serializes the reloaded
    /// surface and calls [`SyncController::confirm_reload`].
    pub fn classify_external(&mut self, incoming: &str) -> ExternalUpdate {
        if self.last_local.as_deref() == Some(incoming) {
            tracing::debug!(
                elapsed_ms = self
                    .last_local_at
                    .map(|at| at.elapsed().as_millis() as u64),
                "external value is our own echo, suppressing"
            );
            self.state = SyncState::Idle;
            ExternalUpdate::Echo
        } else {
            tracing::debug!(
                was_editing = self.state == SyncState::Editing,
                "external value differs from last serialization, reloading"
            );
            ExternalUpdate::Reload
        }
    }

    /// Record that the surface was reloaded from an external value and now
    /// serializes to `serialized`.
    pub fn confirm_reload(&mut self, serialized: impl Into<String>) {
        self.state = SyncState::Idle;
        self.last_local = Some(serialized.into());
        self.last_local_at = None;
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == SyncState::Editing
    }

    /// The echo baseline: the last serialization this controller saw.
    pub fn last_serialized(&self) -> Option<&str> {
        self.last_local.as_deref()
    }
}
