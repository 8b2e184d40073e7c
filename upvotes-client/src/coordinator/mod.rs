//! Optimistic upvote coordinator.
//!
//! `UpvoteCoordinator::toggle` is what a vote button calls. The displayed
//! value flips immediately; the server's answer then either confirms it,
//! replaces it, or rolls it back (see `VoteReconciler`).
mod reconciler;

pub use reconciler::{PendingToggle, Settlement, TogglePhase, VoteReconciler};

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use upvotes_shared::types::{Actor, ResourceRef};

use crate::cache::VoteCache;
use crate::errors::ToggleFailure;
use crate::notifier::{Notification, Notifier};
use crate::transport::ToggleTransport;

struct CoordinatorState<C> {
    cache: C,
    reconciler: VoteReconciler,
    actor: Actor,
}

/// Drives toggles for one client session.
///
/// The cache and the reconciler sit behind one mutex that is taken for each
/// synchronous step and released before the network call, so any number of
/// toggles may be in flight at once.
pub struct UpvoteCoordinator<C, T, N> {
    state: Mutex<CoordinatorState<C>>,
    transport: T,
    notifier: N,
}

impl<C, T, N> UpvoteCoordinator<C, T, N>
where
    C: VoteCache + Send,
    T: ToggleTransport,
    N: Notifier,
{
    pub fn new(cache: C, transport: T, notifier: N) -> Self {
        Self {
            state: Mutex::new(CoordinatorState {
                cache,
                reconciler: VoteReconciler::new(),
                actor: Actor::Anonymous,
            }),
            transport,
            notifier,
        }
    }

    pub fn with_actor(self, actor: Actor) -> Self {
        self.lock().actor = actor;
        self
    }

    /// Called when the session changes (login, logout).
    pub fn set_actor(&self, actor: Actor) {
        self.lock().actor = actor;
    }

    pub fn actor(&self) -> Actor {
        self.lock().actor.clone()
    }

    /// Runs `f` with exclusive access to the cache, e.g. to load or read
    /// list queries.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.lock().cache)
    }

    pub fn phase(&self, resource: ResourceRef) -> TogglePhase {
        self.lock().reconciler.phase(resource)
    }

    /// Toggles the current actor's upvote on `resource`.
    ///
    /// Anonymous sessions are refused before anything is changed. Otherwise
    /// the optimistic flip is applied, in-flight refreshes of every list that
    /// may show the resource are cancelled, and the request is sent. The
    /// returned settlement says what the response did to the cache; failures
    /// are also notified.
    pub async fn toggle(&self, resource: ResourceRef) -> Result<Settlement, ToggleFailure> {
        {
            let mut state = self.lock();
            if !state.actor.is_authenticated() {
                drop(state);
                let failure = ToggleFailure::Unauthorized;
                self.notifier
                    .notify(Notification::toggle_failed(resource.kind, &failure));
                return Err(failure);
            }

            let CoordinatorState {
                cache, reconciler, ..
            } = &mut *state;
            reconciler.begin_toggle(cache, resource);
            let cancelled = cache.cancel_queries(resource);
            if cancelled > 0 {
                debug!(resource = %resource, cancelled, "Cancelled in-flight list refreshes");
            }
        }

        let result = self.transport.toggle(resource).await;

        let outcome = {
            let mut state = self.lock();
            let CoordinatorState {
                cache, reconciler, ..
            } = &mut *state;
            let outcome = match result {
                Ok(vote_state) => Ok(reconciler.toggle_succeeded(cache, resource, vote_state)),
                Err(failure) => {
                    reconciler.toggle_failed(cache, resource);
                    Err(failure)
                }
            };
            reconciler.settle(cache, resource);
            outcome
        };

        if let Err(failure) = &outcome {
            warn!(resource = %resource, error = %failure, "Upvote failed");
            self.notifier
                .notify(Notification::toggle_failed(resource.kind, failure));
        }
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
