//! Per-resource bookkeeping of in-flight toggles.
//!
//! A resource is `Idle` until its first toggle begins, then `Pending(n)`
//! while `n` toggle calls are outstanding. The visible cache is only made
//! authoritative (or rolled back) when the last outstanding call settles,
//! so a burst of clicks never flickers through intermediate responses.
use std::collections::HashMap;

use tracing::{debug, warn};
use upvotes_shared::types::{ResourceRef, VoteState};

use crate::cache::VoteCache;

/// Tracker entry for a resource with toggles in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub in_flight: u32,
    /// Last authoritative state seen for the resource: the server's latest
    /// response, or the cache value before the burst began. `None` when the
    /// resource had no projection at that point.
    pub baseline: Option<VoteState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    Idle,
    Pending(u32),
}

/// What settling one toggle call did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Other calls are still in flight; the cache was left untouched.
    Deferred { in_flight: u32 },
    /// The last call succeeded and its state was written to the cache.
    Reconciled(VoteState),
    /// The last call failed and the cache was restored to the baseline, if
    /// there was one.
    RolledBack(Option<VoteState>),
}

#[derive(Debug, Default)]
pub struct VoteReconciler {
    pending: HashMap<ResourceRef, PendingToggle>,
}

impl VoteReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, resource: ResourceRef) -> TogglePhase {
        match self.pending.get(&resource) {
            Some(entry) => TogglePhase::Pending(entry.in_flight),
            None => TogglePhase::Idle,
        }
    }

    pub fn pending(&self, resource: ResourceRef) -> Option<&PendingToggle> {
        self.pending.get(&resource)
    }

    /// Records a new toggle call and applies the optimistic flip.
    ///
    /// The baseline is captured from the cache only when the resource is
    /// idle; later calls in the same burst keep the stored one. The flip is
    /// computed from the value currently displayed. Returns the optimistic
    /// state, or `None` when the resource has no projection to flip.
    pub fn begin_toggle<C>(&mut self, cache: &mut C, resource: ResourceRef) -> Option<VoteState>
    where
        C: VoteCache + ?Sized,
    {
        let entry = self
            .pending
            .entry(resource)
            .or_insert_with(|| PendingToggle {
                in_flight: 0,
                baseline: cache.read_projection(resource),
            });
        entry.in_flight += 1;

        let optimistic = cache.read_projection(resource).map(|current| current.flipped());
        if let Some(state) = optimistic {
            cache.write_projections(resource, state);
        }

        debug!(
            resource = %resource,
            in_flight = entry.in_flight,
            optimistic = ?optimistic,
            "Toggle started"
        );
        optimistic
    }

    /// Handles an authoritative response for one toggle call.
    ///
    /// Responses may arrive in any order; the latest one to arrive becomes
    /// the baseline and, once nothing else is in flight, the cache value.
    pub fn toggle_succeeded<C>(
        &mut self,
        cache: &mut C,
        resource: ResourceRef,
        state: VoteState,
    ) -> Settlement
    where
        C: VoteCache + ?Sized,
    {
        let Some(entry) = self.pending.get_mut(&resource) else {
            cache.write_projections(resource, state);
            return Settlement::Reconciled(state);
        };

        entry.in_flight = entry.in_flight.saturating_sub(1);
        entry.baseline = Some(state);
        if entry.in_flight > 0 {
            debug!(resource = %resource, in_flight = entry.in_flight, "Toggle confirmed, burst still pending");
            return Settlement::Deferred {
                in_flight: entry.in_flight,
            };
        }

        self.pending.remove(&resource);
        let written = cache.write_projections(resource, state);
        debug!(resource = %resource, ?state, written, "Toggle reconciled");
        Settlement::Reconciled(state)
    }

    /// Handles a failed toggle call.
    ///
    /// The optimistic value stays while other calls are in flight. When the
    /// last one fails, every projection is restored to the baseline.
    pub fn toggle_failed<C>(&mut self, cache: &mut C, resource: ResourceRef) -> Settlement
    where
        C: VoteCache + ?Sized,
    {
        let Some(entry) = self.pending.get_mut(&resource) else {
            return Settlement::RolledBack(None);
        };

        entry.in_flight = entry.in_flight.saturating_sub(1);
        if entry.in_flight > 0 {
            return Settlement::Deferred {
                in_flight: entry.in_flight,
            };
        }

        let baseline = entry.baseline;
        self.pending.remove(&resource);
        if let Some(state) = baseline {
            cache.write_projections(resource, state);
        }
        warn!(resource = %resource, baseline = ?baseline, "Toggle failed, rolled back");
        Settlement::RolledBack(baseline)
    }

    /// Runs after every success or failure. Once the resource is idle again,
    /// the lists that may show it are marked stale for their next natural refetch.
    /// Returns whether they were.
    pub fn settle<C>(&mut self, cache: &mut C, resource: ResourceRef) -> bool
    where
        C: VoteCache + ?Sized,
    {
        if self.pending.contains_key(&resource) {
            return false;
        }
        cache.invalidate(resource);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use upvotes_shared::types::ResourceId;

    /// A single-projection cache recording invalidated resources.
    #[derive(Default)]
    struct FakeCache {
        values: HashMap<ResourceRef, VoteState>,
        invalidated: HashSet<ResourceRef>,
        writes: usize,
    }

    impl FakeCache {
        fn with(resource: ResourceRef, state: VoteState) -> Self {
            let mut cache = Self::default();
            cache.values.insert(resource, state);
            cache
        }

        fn value(&self, resource: ResourceRef) -> Option<VoteState> {
            self.values.get(&resource).copied()
        }
    }

    impl VoteCache for FakeCache {
        fn read_projection(&self, resource: ResourceRef) -> Option<VoteState> {
            self.value(resource)
        }

        fn write_projections(&mut self, resource: ResourceRef, state: VoteState) -> usize {
            self.writes += 1;
            match self.values.get_mut(&resource) {
                Some(value) => {
                    *value = state;
                    1
                }
                None => 0,
            }
        }

        fn cancel_queries(&mut self, _resource: ResourceRef) -> usize {
            0
        }

        fn invalidate(&mut self, resource: ResourceRef) {
            self.invalidated.insert(resource);
        }
    }

    fn post_42() -> ResourceRef {
        ResourceRef::post(ResourceId::new(42).unwrap())
    }

    #[test]
    fn test_confirmed_toggle_leaves_cache_unchanged() {
        let resource = post_42();
        let mut cache = FakeCache::with(resource, VoteState::new(false, 5));
        let mut reconciler = VoteReconciler::new();

        let optimistic = reconciler.begin_toggle(&mut cache, resource);
        assert_eq!(optimistic, Some(VoteState::new(true, 6)));
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));
        assert_eq!(reconciler.phase(resource), TogglePhase::Pending(1));

        let settlement = reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(true, 6));
        assert_eq!(settlement, Settlement::Reconciled(VoteState::new(true, 6)));
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));
        assert_eq!(reconciler.phase(resource), TogglePhase::Idle);

        assert!(reconciler.settle(&mut cache, resource));
        assert!(cache.invalidated.contains(&resource));
    }

    #[test]
    fn test_failed_toggle_rolls_back() {
        let resource = post_42();
        let mut cache = FakeCache::with(resource, VoteState::new(false, 5));
        let mut reconciler = VoteReconciler::new();

        reconciler.begin_toggle(&mut cache, resource);
        let settlement = reconciler.toggle_failed(&mut cache, resource);

        assert_eq!(settlement, Settlement::RolledBack(Some(VoteState::new(false, 5))));
        assert_eq!(cache.value(resource), Some(VoteState::new(false, 5)));
        assert_eq!(reconciler.phase(resource), TogglePhase::Idle);
    }

    #[test]
    fn test_double_click_applies_only_the_final_response() {
        let resource = post_42();
        let mut cache = FakeCache::with(resource, VoteState::new(false, 5));
        let mut reconciler = VoteReconciler::new();

        reconciler.begin_toggle(&mut cache, resource);
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));
        reconciler.begin_toggle(&mut cache, resource);
        assert_eq!(cache.value(resource), Some(VoteState::new(false, 5)));
        assert_eq!(
            reconciler.pending(resource).unwrap().baseline,
            Some(VoteState::new(false, 5))
        );

        let writes_before = cache.writes;
        let first = reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(true, 6));
        assert_eq!(first, Settlement::Deferred { in_flight: 1 });
        assert_eq!(cache.writes, writes_before);
        assert_eq!(cache.value(resource), Some(VoteState::new(false, 5)));
        assert!(!reconciler.settle(&mut cache, resource));
        assert!(cache.invalidated.is_empty());

        let second = reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(false, 5));
        assert_eq!(second, Settlement::Reconciled(VoteState::new(false, 5)));
        assert_eq!(cache.value(resource), Some(VoteState::new(false, 5)));
    }

    #[test]
    fn test_burst_answered_in_reverse_order_ends_on_last_response() {
        let resource = post_42();
        let mut cache = FakeCache::with(resource, VoteState::new(false, 5));
        let mut reconciler = VoteReconciler::new();

        for _ in 0..3 {
            reconciler.begin_toggle(&mut cache, resource);
        }
        assert_eq!(reconciler.phase(resource), TogglePhase::Pending(3));

        // Server committed on, off, on; responses arrive last-first.
        reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(true, 6));
        reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(false, 5));
        let last = reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(true, 6));

        assert_eq!(last, Settlement::Reconciled(VoteState::new(true, 6)));
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));
    }

    #[test]
    fn test_failure_rolls_back_only_when_burst_settles() {
        let resource = post_42();
        let mut cache = FakeCache::with(resource, VoteState::new(false, 5));
        let mut reconciler = VoteReconciler::new();

        reconciler.begin_toggle(&mut cache, resource);
        reconciler.begin_toggle(&mut cache, resource);
        reconciler.begin_toggle(&mut cache, resource);
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));

        assert_eq!(
            reconciler.toggle_failed(&mut cache, resource),
            Settlement::Deferred { in_flight: 2 }
        );
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));

        reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(true, 6));
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));

        // The restore target is the last authoritative state, not the
        // pre-burst value.
        let settlement = reconciler.toggle_failed(&mut cache, resource);
        assert_eq!(settlement, Settlement::RolledBack(Some(VoteState::new(true, 6))));
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));
    }

    #[test]
    fn test_missing_projection_is_a_no_op_until_it_appears() {
        let resource = post_42();
        let mut cache = FakeCache::default();
        let mut reconciler = VoteReconciler::new();

        assert_eq!(reconciler.begin_toggle(&mut cache, resource), None);
        assert_eq!(reconciler.pending(resource).unwrap().baseline, None);

        // A list containing the post is loaded while the call is in flight.
        cache.values.insert(resource, VoteState::new(false, 5));
        reconciler.toggle_succeeded(&mut cache, resource, VoteState::new(true, 6));
        assert_eq!(cache.value(resource), Some(VoteState::new(true, 6)));
    }

    #[test]
    fn test_failure_without_baseline_restores_nothing() {
        let resource = post_42();
        let mut cache = FakeCache::default();
        let mut reconciler = VoteReconciler::new();

        reconciler.begin_toggle(&mut cache, resource);
        let writes_before = cache.writes;

        assert_eq!(reconciler.toggle_failed(&mut cache, resource), Settlement::RolledBack(None));
        assert_eq!(cache.writes, writes_before);
        assert!(reconciler.settle(&mut cache, resource));
    }

    #[test]
    fn test_even_number_of_confirmed_toggles_converges() {
        let resource = post_42();
        let mut cache = FakeCache::with(resource, VoteState::new(false, 5));
        let mut reconciler = VoteReconciler::new();

        for expected in [VoteState::new(true, 6), VoteState::new(false, 5)] {
            reconciler.begin_toggle(&mut cache, resource);
            reconciler.toggle_succeeded(&mut cache, resource, expected);
            reconciler.settle(&mut cache, resource);
        }

        assert_eq!(cache.value(resource), Some(VoteState::new(false, 5)));
        assert_eq!(reconciler.phase(resource), TogglePhase::Idle);
    }
}
