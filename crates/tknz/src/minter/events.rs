//! Typed event stream for the mint workflow.
//!
//! The orchestrator never mutates UI state directly; it emits a sequence of
//! discrete events that a presentation layer subscribes to. Emission is
//! fire-and-forget; a lagging or absent subscriber never blocks or fails
//! the workflow.

use std::time::Duration;

use tokio::sync::broadcast;

use tknz_common::types::WorkflowStatus;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One observable event of a mint attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintEvent {
    /// The persistent status line changed
    Status(WorkflowStatus),
    /// A one-off notice for the user
    Notice(Notice),
    /// A previously shown notice expired
    NoticeCleared(NoticeKind),
}

/// Category of a transient notice, driving its presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Unconnected wallet or empty text; user-correctable
    InputInvalid,
    /// Balance too low to mint; shown as a blocking modal
    InsufficientBalance,
    /// Backend may be cold-starting; retry shortly
    BackendTimeout,
    /// Duplicate submission reclassified as success
    AlreadyProcessed,
    /// Terminal failure for this attempt
    Failure,
}

/// A transient user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Notice category
    pub kind: NoticeKind,
    /// User-facing message
    pub message: String,
    /// When set, the notice clears itself after this interval
    pub dismiss_after: Option<Duration>,
}

/// Broadcast side of the event stream, owned by the minter.
#[derive(Debug, Clone)]
pub(crate) struct EventSink {
    sender: broadcast::Sender<MintEvent>,
}

impl EventSink {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<MintEvent> {
        self.sender.subscribe()
    }

    /// Emit a status transition.
    pub(crate) fn status(&self, status: WorkflowStatus) {
        tracing::debug!(%status, "workflow status");
        let _ = self.sender.send(MintEvent::Status(status));
    }

    /// Emit a notice. A notice with a dismiss interval schedules its own
    /// `NoticeCleared` event.
    pub(crate) fn notice(&self, notice: Notice) {
        if let Some(dismiss_after) = notice.dismiss_after {
            let sender = self.sender.clone();
            let kind = notice.kind;
            tokio::spawn(async move {
                tokio::time::sleep(dismiss_after).await;
                let _ = sender.send(MintEvent::NoticeCleared(kind));
            });
        }
        let _ = self.sender.send(MintEvent::Notice(notice));
    }
}
