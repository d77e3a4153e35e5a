//! LRU Tracker Module
//!
//! Access ordering used to pick an eviction victim when the in-memory cache is
//! full.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Keys ordered by last access: front is most recent, back is least recent.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_reorders() {
        let mut lru = LruTracker::new();
        lru.touch("cache:/api/users");
        lru.touch("cache:/api/users/1");
        lru.touch("cache:/api/users");

        assert_eq!(lru.len(), 2);
        assert_eq!(lru.evict_oldest().as_deref(), Some("cache:/api/users/1"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("cache:/api/users"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_remove_unknown_key() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.remove("b");
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_evict_empty() {
        let mut lru = LruTracker::new();
        assert!(lru.evict_oldest().is_none());
    }
}
