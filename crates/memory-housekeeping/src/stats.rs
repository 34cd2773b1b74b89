// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reclamation statistics.
//!
//! [`ReclaimStats`] makes housekeeping observable: tests assert that a
//! relocation pass actually triggered reclamation, and the CLI prints the
//! counters after a run.

/// Cumulative counters for a reclaimable cache.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ReclaimStats {
    /// Number of garbage-collection passes requested.
    pub gc_passes: u64,
    /// Number of cache-release requests.
    pub cache_releases: u64,
    /// Total bytes dropped by cache releases.
    pub bytes_released: u64,
    /// Number of buffers handed back out for reuse.
    pub buffers_reused: u64,
    /// Number of buffers returned to the cache.
    pub buffers_retained: u64,
}

impl ReclaimStats {
    pub(crate) fn record_gc_pass(&mut self) {
        self.gc_passes += 1;
    }

    pub(crate) fn record_release(&mut self, bytes: usize) {
        self.cache_releases += 1;
        self.bytes_released += bytes as u64;
    }

    pub(crate) fn record_reuse(&mut self) {
        self.buffers_reused += 1;
    }

    pub(crate) fn record_retain(&mut self) {
        self.buffers_retained += 1;
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let released_mb = self.bytes_released as f64 / (1024.0 * 1024.0);
        format!(
            "Housekeeping: {} gc passes, {} cache releases ({:.2} MB dropped), \
             {} buffers retained, {} reused",
            self.gc_passes,
            self.cache_releases,
            released_mb,
            self.buffers_retained,
            self.buffers_reused,
        )
    }
}
