// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Housekeeping`] reclamation interface.

/// Advisory memory reclamation, invoked around device relocations.
///
/// Both operations are synchronous, idempotent, and side-effect-only:
/// they return nothing, and calling them on an empty allocator is fine.
/// Callers must not depend on any specific amount of memory being freed —
/// on some hosts both calls are no-ops.
pub trait Housekeeping: Send + Sync {
    /// Runs a general-purpose reclamation pass over unreferenced objects.
    fn collect_garbage(&self);

    /// Releases cached-but-unused allocator memory back to the system.
    fn release_cached(&self);
}

/// The do-nothing implementation, for hosts without a reclaimable allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHousekeeping;

impl Housekeeping for NoopHousekeeping {
    fn collect_garbage(&self) {}

    fn release_cached(&self) {}
}
