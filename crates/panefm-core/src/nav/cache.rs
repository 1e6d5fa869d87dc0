//! Per-pane cache of resolved listings.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use crate::fs::listing::DirectoryListing;
use crate::nav::path::PathValue;

/// Most recent listing per path, bounded to the `capacity` most recently used
/// paths.
///
/// `put` overwrites unconditionally: the navigator decides whether a result
/// is current before it ever reaches the cache.
#[derive(Debug, Clone)]
pub struct ListingCache {
    capacity: usize,
    entries: HashMap<PathValue, Arc<DirectoryListing>>,
    /// Least recently used first.
    order: VecDeque<PathValue>,
}

impl ListingCache {
    /// Creates a cache holding at most `capacity` paths. A capacity of `0`
    /// disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Returns the cached listing for `path` and marks it most recently used.
    pub fn get(&mut self, path: &PathValue) -> Option<Arc<DirectoryListing>> {
        let listing = self.entries.get(path).cloned()?;
        self.touch(path);
        Some(listing)
    }

    /// Like [`get`](Self::get) but only returns listings younger than `ttl`.
    pub fn get_fresh(&mut self, path: &PathValue, ttl: Duration) -> Option<Arc<DirectoryListing>> {
        self.get(path).filter(|listing| listing.age() < ttl)
    }

    /// Looks at a cached listing without affecting recency.
    pub fn peek(&self, path: &PathValue) -> Option<&Arc<DirectoryListing>> {
        self.entries.get(path)
    }

    /// Stores `listing` under `path`, evicting the least recently used path
    /// when over capacity.
    pub fn put(&mut self, path: PathValue, listing: Arc<DirectoryListing>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(path.clone(), listing).is_some() {
            self.touch(&path);
            return;
        }
        self.order.push_back(path);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::trace!("evicted cached listing for {oldest}");
        }
    }

    /// Drops the cached listing for `path`, if any.
    pub fn invalidate(&mut self, path: &PathValue) -> bool {
        if self.entries.remove(path).is_none() {
            return false;
        }
        self.order.retain(|p| p != path);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, path: &PathValue) {
        if let Some(pos) = self.order.iter().position(|p| p == path) {
            if let Some(p) = self.order.remove(pos) {
                self.order.push_back(p);
            }
        }
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(64)
    }
}
