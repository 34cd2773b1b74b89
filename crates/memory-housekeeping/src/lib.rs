// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-housekeeping
//!
//! Advisory memory reclamation for the relocation pipeline.
//!
//! Moving a large model between devices is bracketed by housekeeping: cached
//! allocator memory is released so the incoming weights have somewhere to
//! land, and after an offload the memory the move just freed is reclaimed.
//! Both calls are *advisory* — a host may wire them to a real allocator, to
//! a runtime's collector, or to nothing at all, and the relocation driver
//! must never depend on a specific amount being freed.
//!
//! # Key Components
//!
//! - [`Housekeeping`] — the two-call reclamation interface
//!   (`collect_garbage`, `release_cached`).
//! - [`NoopHousekeeping`] — the do-nothing implementation for hosts without
//!   a reclaimable allocator.
//! - [`SoftCache`] — a size-class-binned buffer cache whose `release_cached`
//!   actually frees memory, with [`ReclaimStats`] making every pass
//!   observable.
//! - [`HostMemory`] — a `/proc/meminfo` reading, for showing host memory
//!   around a move.
//!
//! # Example
//! ```
//! use memory_housekeeping::{Housekeeping, SoftCache};
//!
//! let cache = SoftCache::new();
//! cache.retain(vec![0u8; 8192]);
//! assert!(cache.cached_bytes() >= 8192);
//!
//! // A housekeeping round empties the cache.
//! cache.release_cached();
//! assert_eq!(cache.cached_bytes(), 0);
//! assert_eq!(cache.stats().cache_releases, 1);
//! ```

mod cache;
mod error;
mod host;
mod reclaim;
mod stats;

pub use cache::SoftCache;
pub use error::HousekeepingError;
pub use host::HostMemory;
pub use reclaim::{Housekeeping, NoopHousekeeping};
pub use stats::ReclaimStats;
