//! Epoch-guarded publisher of resolved authorization state.
//!
//! Identity changes define epochs. Each transition starts a fresh resolution
//! pass; a pass that completes after a newer transition has begun must be
//! discarded so a stale, slower lookup never overwrites a newer result.

use std::sync::atomic::{AtomicU64, Ordering};

use dealdesk_core::{AppError, Identity};
use tokio::sync::watch;

use crate::{ResolvedAccess, ScopeService};

/// Published resolution state for the current identity epoch.
#[derive(Debug, Clone)]
pub enum ResolutionState {
    /// No identity yet, the provider is still loading, or a resolution pass
    /// is in flight.
    Pending,
    /// Resolution completed with this epoch's final authorization.
    Ready(ResolvedAccess),
    /// Resolution aborted on a directory failure. Distinct from denial:
    /// consumers render an explicit error, never silently empty data.
    Failed(AppError),
}

impl ResolutionState {
    /// Returns whether resolution for the current epoch is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns the resolved authorization, if this state carries one.
    #[must_use]
    pub fn access(&self) -> Option<&ResolvedAccess> {
        match self {
            Self::Ready(access) => Some(access),
            Self::Pending | Self::Failed(_) => None,
        }
    }
}

/// Single-writer holder of the resolved authorization for one session.
///
/// Any number of consumers may subscribe; only the live epoch's resolution
/// pass may write. The epoch counter is captured at the start of each pass
/// and re-checked under the channel lock before every publish.
pub struct ScopeSession {
    service: ScopeService,
    epoch: AtomicU64,
    sender: watch::Sender<ResolutionState>,
}

impl ScopeSession {
    /// Creates a session in the pending state.
    #[must_use]
    pub fn new(service: ScopeService) -> Self {
        let (sender, _) = watch::channel(ResolutionState::Pending);
        Self {
            service,
            epoch: AtomicU64::new(0),
            sender,
        }
    }

    /// Subscribes to published state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResolutionState> {
        self.sender.subscribe()
    }

    /// Returns the currently published state.
    #[must_use]
    pub fn current(&self) -> ResolutionState {
        self.sender.borrow().clone()
    }

    /// Applies an identity transition from the identity provider and runs the
    /// resolution pass for the new epoch.
    ///
    /// A present identity resolves through the directories; `None` with
    /// `is_loading = false` is the unauthenticated case and publishes the
    /// denied terminal state; `is_loading = true` leaves the epoch pending
    /// until the provider settles and applies again.
    pub async fn apply(&self, identity: Option<Identity>, is_loading: bool) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(epoch, ResolutionState::Pending);

        if is_loading {
            return;
        }

        let Some(identity) = identity else {
            self.publish(epoch, ResolutionState::Ready(ResolvedAccess::denied()));
            return;
        };

        let state = match self.service.resolve(&identity).await {
            Ok(access) => ResolutionState::Ready(access),
            Err(error) => ResolutionState::Failed(error),
        };

        self.publish(epoch, state);
    }

    /// Publishes `state` only while `epoch` is still the live epoch.
    ///
    /// The check and the write happen inside `send_if_modified` so they are
    /// atomic with respect to competing passes; a stale pass observes the
    /// newer epoch and drops its write.
    fn publish(&self, epoch: u64, state: ResolutionState) -> bool {
        self.sender.send_if_modified(|current| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }

            *current = state;
            true
        })
    }
}
