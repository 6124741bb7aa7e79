use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Options, Range, Version};

/// Entries kept per table by [ParseCache::new].
pub const DEFAULT_CAPACITY: usize = 1000;

/**
Bounded memo of parse results, keyed by the raw input and the [Options] it
was parsed with.

Versions and ranges live in separate tables of the same capacity. Only
successful parses are stored, and once a table is full the oldest entry is
evicted first. A `ParseCache` is safe to share between threads; wrap it in an
[Arc] and hand it to as many [Engine](crate::Engine)s as needed.
*/
pub struct ParseCache {
    versions: Table<Version>,
    ranges: Table<Range>,
}

/// Counters for one table of a [ParseCache].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

impl ParseCache {
    /// A cache holding up to [DEFAULT_CAPACITY] versions and as many ranges.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A cache holding up to `capacity` versions and as many ranges. A
    /// capacity of zero stores nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        ParseCache {
            versions: Table::new(capacity),
            ranges: Table::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.versions.capacity
    }

    pub fn version_stats(&self) -> CacheStats {
        self.versions.stats()
    }

    pub fn range_stats(&self) -> CacheStats {
        self.ranges.stats()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.versions.clear();
        self.ranges.clear();
    }

    pub(crate) fn versions(&self) -> &Table<Version> {
        &self.versions
    }

    pub(crate) fn ranges(&self) -> &Table<Range> {
        &self.ranges
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseCache")
            .field("capacity", &self.capacity())
            .field("versions", &self.version_stats())
            .field("ranges", &self.range_stats())
            .finish()
    }
}

pub(crate) struct Table<V> {
    capacity: usize,
    slots: Mutex<Slots<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

// One map per combination of option flags, so lookups can borrow the input
// instead of building an owned key.
struct Slots<V> {
    maps: [HashMap<Arc<str>, V>; 4],
    order: VecDeque<(usize, Arc<str>)>,
}

fn slot(options: Options) -> usize {
    usize::from(options.loose) | usize::from(options.include_prerelease) << 1
}

impl<V: Clone> Table<V> {
    fn new(capacity: usize) -> Self {
        Table {
            capacity,
            slots: Mutex::new(Slots {
                maps: Default::default(),
                order: VecDeque::new(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub(crate) fn get(&self, input: &str, options: Options) -> Option<V> {
        let found = self.slots.lock().maps[slot(options)].get(input).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub(crate) fn insert(&self, input: &str, options: Options, value: V) {
        if self.capacity == 0 {
            return;
        }

        let slot = slot(options);
        let mut slots = self.slots.lock();
        if let Some(existing) = slots.maps[slot].get_mut(input) {
            // Lost a race with another thread parsing the same input.
            *existing = value;
            return;
        }

        let key: Arc<str> = input.into();
        slots.maps[slot].insert(Arc::clone(&key), value);
        slots.order.push_back((slot, key));

        while slots.order.len() > self.capacity {
            if let Some((slot, oldest)) = slots.order.pop_front() {
                slots.maps[slot].remove(&oldest);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Returns the cached value for `input`, or computes it outside the lock
    /// and stores it if the computation succeeds.
    pub(crate) fn get_or_try_insert_with<E>(
        &self,
        input: &str,
        options: Options,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(input, options) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(input, options, value.clone());
        Ok(value)
    }

    fn clear(&self) {
        let mut slots = self.slots.lock();
        for map in slots.maps.iter_mut() {
            map.clear();
        }
        slots.order.clear();
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.slots.lock().order.len(),
        }
    }
}
