//! Playback Session - state owned by the controller
//!
//! Tracks:
//! - Which backend owns the surface
//! - Whether the surface is shown
//! - The latest operation token
//!
//! Every change is published on a watch channel so the presentation layer
//! can follow the session without polling.

use crate::types::{ActiveBackend, SessionId, SessionSnapshot};
use chrono::Utc;
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::watch;

/// Identifies one `play` or `close` call.
///
/// A token is current until the next call takes a new one; work that
/// resumes after a suspension point checks the token and drops its result
/// if it went stale.
#[derive(Debug, Clone)]
pub struct OperationToken {
    id: u64,
    latest: Rc<Cell<u64>>,
}

impl OperationToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.latest.get() == self.id
    }
}

/// Mutable state of the single playback surface
pub struct PlaybackSession {
    id: SessionId,
    latest: Rc<Cell<u64>>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl PlaybackSession {
    /// Create a session at rest
    pub fn new() -> Self {
        let id = SessionId::new();
        let (state_tx, _) = watch::channel(SessionSnapshot::at_rest(id));

        Self {
            id,
            latest: Rc::new(Cell::new(0)),
            state_tx,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Take a new token, invalidating every token handed out before
    pub fn begin_operation(&self) -> OperationToken {
        let id = self.latest.get() + 1;
        self.latest.set(id);
        self.update(|s| s.operation = id);

        OperationToken {
            id,
            latest: Rc::clone(&self.latest),
        }
    }

    pub fn active_backend(&self) -> ActiveBackend {
        self.state_tx.borrow().active_backend
    }

    pub fn set_active_backend(&self, backend: ActiveBackend) {
        self.update(|s| s.active_backend = backend);
    }

    pub fn surface_visible(&self) -> bool {
        self.state_tx.borrow().surface_visible
    }

    pub fn set_surface_visible(&self, visible: bool) {
        self.update(|s| s.surface_visible = visible);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    fn update(&self, modify: impl FnOnce(&mut SessionSnapshot)) {
        self.state_tx.send_modify(|snapshot| {
            modify(snapshot);
            snapshot.updated_at = Utc::now();
        });
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}
