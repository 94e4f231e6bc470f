//! Time-to-live result cache
//!
//! Entries expire lazily: a lookup that finds an entry older than its TTL
//! removes it and reports a miss. There is no background sweeper;
//! [`TtlCache::invalidate_expired`] can be called to sweep explicitly.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::constants::cache::{INITIAL_CONDITIONS_TTL, PORTRAIT_TTL, TRAJECTORY_TTL};
use crate::fingerprint::Fingerprint;
use crate::initial::{self, InitialState};
use crate::portrait::{PhasePortrait, PortraitKey};
use crate::solver::TrajectoryBatch;

/// A cached payload and its expiry clock
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub payload: V,
    pub created_at: Instant,
    pub ttl: Duration,
    last_access: Instant,
}

impl<V> CacheEntry<V> {
    /// Expired once strictly more than `ttl` has passed since insertion
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }
}

/// Key/value store with per-entry TTL
///
/// Capacity is unbounded unless [`TtlCache::with_max_entries`] is used, in
/// which case the least-recently-accessed entry is evicted on overflow.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
    max_entries: Option<usize>,
    hits: u64,
    misses: u64,
    expirations: u64,
    evictions: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            max_entries: None,
            hits: 0,
            misses: 0,
            expirations: 0,
            evictions: 0,
        }
    }

    /// Cap the number of live entries (LRU eviction)
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a live entry, dropping it if expired
    pub fn get(&mut self, key: &K, now: Instant) -> Option<V> {
        let expired = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.last_access = now;
                self.hits += 1;
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.expirations += 1;
        }
        self.misses += 1;
        None
    }

    /// Whether a live entry exists; does not count as an access
    pub fn contains_live(&self, key: &K, now: Instant) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Insert with the store's default TTL
    pub fn put(&mut self, key: K, payload: V, now: Instant) {
        let ttl = self.default_ttl;
        self.put_with_ttl(key, payload, ttl, now);
    }

    /// Insert with an explicit TTL, replacing any previous entry
    pub fn put_with_ttl(&mut self, key: K, payload: V, ttl: Duration, now: Instant) {
        if !self.entries.contains_key(&key) {
            self.enforce_limit(now);
        }
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                created_at: now,
                ttl,
                last_access: now,
            },
        );
    }

    /// Return the live entry or compute, store and return a new one
    pub fn get_or_insert_with<F>(&mut self, key: K, now: Instant, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(payload) = self.get(&key, now) {
            return payload;
        }
        let payload = compute();
        self.put(key, payload.clone(), now);
        payload
    }

    /// Remove every expired entry; returns how many were dropped
    pub fn invalidate_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();
        self.expirations += removed as u64;
        removed
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.payload)
    }

    /// Clear all cached data
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included until swept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            expirations: self.expirations,
            evictions: self.evictions,
        }
    }

    /// Make room for one more entry when capped
    fn enforce_limit(&mut self, now: Instant) {
        let Some(max) = self.max_entries else {
            return;
        };
        if self.entries.len() < max {
            return;
        }

        // Expired entries go first
        self.invalidate_expired(now);

        while self.entries.len() >= max {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(key, _)| key.clone());

            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                    self.evictions += 1;
                }
                None => break,
            }
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of stored entries
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because their TTL ran out
    pub expirations: u64,
    /// Entries dropped by the capacity cap
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// TTLs and capacity for every artifact class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheTtls {
    pub trajectories: Duration,
    pub portraits: Duration,
    pub initial_conditions: Duration,
    /// Per-class LRU cap; `None` keeps the store unbounded
    pub max_entries: Option<usize>,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            trajectories: TRAJECTORY_TTL,
            portraits: PORTRAIT_TTL,
            initial_conditions: INITIAL_CONDITIONS_TTL,
            max_entries: None,
        }
    }
}

/// The session's cached artifacts, one independent store per class
///
/// Payloads are handed out as `Arc` clones; callers never own an entry.
#[derive(Debug)]
pub struct ResultCache {
    trajectories: TtlCache<Fingerprint, Arc<TrajectoryBatch>>,
    portraits: TtlCache<PortraitKey, Arc<PhasePortrait>>,
    initial_conditions: TtlCache<usize, Arc<[InitialState]>>,
}

impl ResultCache {
    pub fn new(ttls: CacheTtls) -> Self {
        let mut trajectories = TtlCache::new(ttls.trajectories);
        let mut portraits = TtlCache::new(ttls.portraits);
        let mut initial_conditions = TtlCache::new(ttls.initial_conditions);

        if let Some(max) = ttls.max_entries {
            trajectories = trajectories.with_max_entries(max);
            portraits = portraits.with_max_entries(max);
            initial_conditions = initial_conditions.with_max_entries(max);
        }

        Self {
            trajectories,
            portraits,
            initial_conditions,
        }
    }

    pub fn trajectories(&mut self, key: &Fingerprint, now: Instant) -> Option<Arc<TrajectoryBatch>> {
        self.trajectories.get(key, now)
    }

    pub fn has_trajectories(&self, key: &Fingerprint, now: Instant) -> bool {
        self.trajectories.contains_live(key, now)
    }

    pub fn put_trajectories(&mut self, key: Fingerprint, batch: Arc<TrajectoryBatch>, now: Instant) {
        debug!(fingerprint = %key.short(), trajectories = batch.len(), "caching batch");
        self.trajectories.put(key, batch, now);
    }

    pub fn portrait(&mut self, key: &PortraitKey, now: Instant) -> Option<Arc<PhasePortrait>> {
        self.portraits.get(key, now)
    }

    pub fn put_portrait(&mut self, key: PortraitKey, portrait: Arc<PhasePortrait>, now: Instant) {
        self.portraits.put(key, portrait, now);
    }

    /// Starting states for `count` trajectories, generated on a miss
    pub fn initial_conditions(&mut self, count: usize, now: Instant) -> Arc<[InitialState]> {
        self.initial_conditions
            .get_or_insert_with(count, now, || initial::generate(count).into())
    }

    /// Sweep every class; returns the total number of dropped entries
    pub fn expire(&mut self, now: Instant) -> usize {
        self.trajectories.invalidate_expired(now)
            + self.portraits.invalidate_expired(now)
            + self.initial_conditions.invalidate_expired(now)
    }

    pub fn clear(&mut self) {
        self.trajectories.clear();
        self.portraits.clear();
        self.initial_conditions.clear();
    }

    pub fn trajectory_stats(&self) -> CacheStats {
        self.trajectories.stats()
    }

    pub fn portrait_stats(&self) -> CacheStats {
        self.portraits.stats()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}
