// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A soft buffer cache with observable reclamation.
//!
//! [`SoftCache`] keeps returned scratch buffers around, binned by size
//! class, so repeated transfers of similarly-sized tensors avoid fresh heap
//! allocation. "Soft" because nothing in it is load-bearing: a
//! [`release_cached`](crate::Housekeeping::release_cached) call drops every
//! cached buffer, which is exactly what the relocation driver requests
//! around a move.
//!
//! # Thread Safety
//! All interior mutability sits behind `Mutex` and `AtomicUsize`; handles
//! are cheap clones sharing one cache.

use crate::{Housekeeping, ReclaimStats};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Buffers below this size share one bin.
const MIN_BIN_BYTES: usize = 4096;

struct CacheShared {
    /// size class → buffers awaiting reuse.
    bins: Mutex<HashMap<usize, Vec<Vec<u8>>>>,
    /// Bytes currently held across all bins.
    cached_bytes: AtomicUsize,
    stats: Mutex<ReclaimStats>,
}

/// A reusable-buffer cache that doubles as the [`Housekeeping`] hook.
///
/// Cloning a `SoftCache` yields another handle to the same cache, so the
/// relocation driver and the code producing buffers can share one instance.
///
/// # Example
/// ```
/// use memory_housekeeping::SoftCache;
///
/// let cache = SoftCache::new();
/// cache.retain(vec![0u8; 4096]);
///
/// // Reuse hits the bin for the same size class.
/// let buffer = cache.take(4096).unwrap();
/// assert_eq!(buffer.len(), 4096);
/// assert!(cache.take(4096).is_none());
/// ```
#[derive(Clone)]
pub struct SoftCache {
    shared: Arc<CacheShared>,
}

impl SoftCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(CacheShared {
                bins: Mutex::new(HashMap::new()),
                cached_bytes: AtomicUsize::new(0),
                stats: Mutex::new(ReclaimStats::default()),
            }),
        }
    }

    /// Returns a buffer of the requested size class, if one is cached.
    ///
    /// The returned buffer keeps its bin capacity but is truncated or grown
    /// to exactly `size_bytes`, zeroed.
    pub fn take(&self, size_bytes: usize) -> Option<Vec<u8>> {
        if size_bytes == 0 {
            return None;
        }
        let bin = bin_for(size_bytes);
        let mut buffer = {
            let mut bins = self.shared.bins.lock().ok()?;
            bins.get_mut(&bin)?.pop()?
        };
        self.shared
            .cached_bytes
            .fetch_sub(buffer.capacity(), Ordering::Release);
        buffer.clear();
        buffer.resize(size_bytes, 0);
        if let Ok(mut stats) = self.shared.stats.lock() {
            stats.record_reuse();
        }
        Some(buffer)
    }

    /// Returns a buffer to the cache for later reuse.
    ///
    /// Zero-capacity buffers are dropped instead of cached.
    pub fn retain(&self, buffer: Vec<u8>) {
        if buffer.capacity() == 0 {
            return;
        }
        let bin = bin_for(buffer.capacity());
        self.shared
            .cached_bytes
            .fetch_add(buffer.capacity(), Ordering::Release);
        if let Ok(mut bins) = self.shared.bins.lock() {
            bins.entry(bin).or_default().push(buffer);
        }
        if let Ok(mut stats) = self.shared.stats.lock() {
            stats.record_retain();
        }
    }

    /// Approximate bytes currently held in the cache.
    pub fn cached_bytes(&self) -> usize {
        self.shared.cached_bytes.load(Ordering::Acquire)
    }

    /// Number of buffers currently held in the cache.
    pub fn cached_buffers(&self) -> usize {
        self.shared
            .bins
            .lock()
            .map(|bins| bins.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Returns a snapshot of the reclamation statistics.
    pub fn stats(&self) -> ReclaimStats {
        self.shared
            .stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }
}

impl Default for SoftCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Housekeeping for SoftCache {
    /// Prunes empty bins and records the pass.
    ///
    /// The cache has no unreferenced objects of its own to collect; the
    /// counter is what makes gc sequencing visible to tests and the CLI.
    fn collect_garbage(&self) {
        if let Ok(mut bins) = self.shared.bins.lock() {
            bins.retain(|_, buffers| !buffers.is_empty());
        }
        if let Ok(mut stats) = self.shared.stats.lock() {
            stats.record_gc_pass();
        }
        tracing::debug!("housekeeping: gc pass");
    }

    /// Drops every cached buffer.
    fn release_cached(&self) {
        let released = {
            let mut bins = match self.shared.bins.lock() {
                Ok(bins) => bins,
                Err(_) => return,
            };
            let bytes: usize = bins
                .values()
                .flat_map(|buffers| buffers.iter())
                .map(Vec::capacity)
                .sum();
            bins.clear();
            self.shared.cached_bytes.store(0, Ordering::Release);
            bytes
        };
        if let Ok(mut stats) = self.shared.stats.lock() {
            stats.record_release(released);
        }
        tracing::debug!(bytes = released, "housekeeping: cache released");
    }
}

impl std::fmt::Debug for SoftCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftCache")
            .field("cached_bytes", &self.cached_bytes())
            .field("cached_buffers", &self.cached_buffers())
            .finish()
    }
}

/// Smallest power of two ≥ `size` and ≥ `MIN_BIN_BYTES`.
fn bin_for(size: usize) -> usize {
    size.max(MIN_BIN_BYTES).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_then_take() {
        let cache = SoftCache::new();
        cache.retain(vec![7u8; 8192]);
        assert_eq!(cache.cached_buffers(), 1);

        let buffer = cache.take(8192).unwrap();
        assert_eq!(buffer.len(), 8192);
        // Reused buffers come back zeroed.
        assert!(buffer.iter().all(|&b| b == 0));
        assert_eq!(cache.cached_buffers(), 0);
    }

    #[test]
    fn test_take_from_empty_cache() {
        let cache = SoftCache::new();
        assert!(cache.take(4096).is_none());
        assert!(cache.take(0).is_none());
    }

    #[test]
    fn test_same_bin_for_nearby_sizes() {
        let cache = SoftCache::new();
        cache.retain(vec![0u8; 5000]);
        // 5000 and 6000 both round up to the 8192 bin.
        assert!(cache.take(6000).is_some());
    }

    #[test]
    fn test_release_cached_drops_everything() {
        let cache = SoftCache::new();
        cache.retain(vec![0u8; 4096]);
        cache.retain(vec![0u8; 16384]);
        assert!(cache.cached_bytes() >= 4096 + 16384);

        cache.release_cached();
        assert_eq!(cache.cached_bytes(), 0);
        assert_eq!(cache.cached_buffers(), 0);

        let stats = cache.stats();
        assert_eq!(stats.cache_releases, 1);
        assert!(stats.bytes_released >= (4096 + 16384) as u64);
    }

    #[test]
    fn test_release_is_idempotent() {
        let cache = SoftCache::new();
        cache.release_cached();
        cache.release_cached();
        let stats = cache.stats();
        assert_eq!(stats.cache_releases, 2);
        assert_eq!(stats.bytes_released, 0);
    }

    #[test]
    fn test_gc_pass_counted() {
        let cache = SoftCache::new();
        cache.collect_garbage();
        cache.collect_garbage();
        assert_eq!(cache.stats().gc_passes, 2);
    }

    #[test]
    fn test_clones_share_state() {
        let cache = SoftCache::new();
        let handle = cache.clone();
        handle.retain(vec![0u8; 4096]);
        assert_eq!(cache.cached_buffers(), 1);

        cache.release_cached();
        assert_eq!(handle.cached_buffers(), 0);
    }

    #[test]
    fn test_zero_capacity_not_retained() {
        let cache = SoftCache::new();
        cache.retain(Vec::new());
        assert_eq!(cache.cached_buffers(), 0);
        assert_eq!(cache.stats().buffers_retained, 0);
    }
}
