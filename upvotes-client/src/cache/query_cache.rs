//! Keyed store of list query results.
//!
//! Each query key (for example `posts?sortBy=points&order=desc`) maps to the
//! pages fetched for it. The same resource may appear in many queries at
//! once; vote writes always reach every copy.
use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use upvotes_shared::types::{PaginatedResponse, ResourceRef, VoteState};

use crate::cache::VoteCache;
use crate::cache::votable::{Votable, find_state, write_state};

/// Identity of a cached list query: a tag shared by every query over the
/// same kind of resource, plus the query's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    tag: String,
    params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self.params.sort();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

/// One fetched page of a list query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub page: u32,
    pub total_pages: u32,
    pub items: Vec<T>,
}

impl<T> From<PaginatedResponse<T>> for ListPage<T> {
    fn from(response: PaginatedResponse<T>) -> Self {
        Self {
            page: response.pagination.page,
            total_pages: response.pagination.total_pages,
            items: response.data,
        }
    }
}

/// Handle for an in-flight list refresh. Only the latest ticket issued for
/// a key can complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
struct QueryEntry<T> {
    pages: Vec<ListPage<T>>,
    stale: bool,
}

/// Keyed store of list query results holding `T` items.
#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    entries: HashMap<QueryKey, QueryEntry<T>>,
    in_flight: HashMap<QueryKey, FetchTicket>,
    next_ticket: u64,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            next_ticket: 0,
        }
    }
}

impl<T: Votable> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pages of `key` and marks it fresh.
    pub fn set_query_data(&mut self, key: QueryKey, pages: Vec<ListPage<T>>) {
        self.entries.insert(key, QueryEntry { pages, stale: false });
    }

    pub fn query_data(&self, key: &QueryKey) -> Option<&[ListPage<T>]> {
        self.entries.get(key).map(|entry| entry.pages.as_slice())
    }

    pub fn remove_query(&mut self, key: &QueryKey) -> Option<Vec<ListPage<T>>> {
        self.in_flight.remove(key);
        self.entries.remove(key).map(|entry| entry.pages)
    }

    /// Whether `key` was invalidated since its data was last set.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.stale)
    }

    /// Keys marked stale, i.e. the ones the next natural refetch should load.
    pub fn stale_keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.stale)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Registers a refresh of `key`, superseding any earlier one.
    pub fn begin_fetch(&mut self, key: QueryKey) -> FetchTicket {
        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        self.in_flight.insert(key, ticket);
        ticket
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Stores the result of a refresh if `ticket` is still the live one.
    ///
    /// Returns `false` when the refresh was cancelled or superseded; the
    /// pages are dropped in that case.
    pub fn complete_fetch(
        &mut self,
        key: &QueryKey,
        ticket: FetchTicket,
        pages: Vec<ListPage<T>>,
    ) -> bool {
        if self.in_flight.get(key) != Some(&ticket) {
            debug!(query = %key, "Discarding result of a cancelled fetch");
            return false;
        }
        self.in_flight.remove(key);
        self.set_query_data(key.clone(), pages);
        true
    }

    /// Whether the query under `key` is tagged with the resource's kind or
    /// currently holds a copy of it.
    fn covers(&self, key: &QueryKey, resource: ResourceRef) -> bool {
        key.has_tag(resource.kind.cache_tag())
            || self.entries.get(key).is_some_and(|entry| {
                entry
                    .pages
                    .iter()
                    .any(|page| find_state(&page.items, resource).is_some())
            })
    }
}

impl<T: Votable> VoteCache for QueryCache<T> {
    fn read_projection(&self, resource: ResourceRef) -> Option<VoteState> {
        self.entries
            .values()
            .flat_map(|entry| entry.pages.iter())
            .find_map(|page| find_state(&page.items, resource))
    }

    fn write_projections(&mut self, resource: ResourceRef, state: VoteState) -> usize {
        self.entries
            .values_mut()
            .flat_map(|entry| entry.pages.iter_mut())
            .map(|page| write_state(&mut page.items, resource, state))
            .sum()
    }

    fn cancel_queries(&mut self, resource: ResourceRef) -> usize {
        let cancelled: Vec<QueryKey> = self
            .in_flight
            .keys()
            .filter(|key| self.covers(key, resource))
            .cloned()
            .collect();
        for key in &cancelled {
            self.in_flight.remove(key);
        }
        cancelled.len()
    }

    fn invalidate(&mut self, resource: ResourceRef) {
        let stale: Vec<QueryKey> = self
            .entries
            .keys()
            .filter(|key| self.covers(key, resource))
            .cloned()
            .collect();
        for key in stale {
            if let Some(entry) = self.entries.get_mut(&key) {
                entry.stale = true;
            }
        }
    }
}
