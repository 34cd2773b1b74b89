// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the relocation driver.

use model_probe::RelocateError;

/// Errors that abort a relocation batch.
///
/// Verification mismatches are *not* errors — they are reported in the
/// [`RelocationReport`](crate::RelocationReport) and processing continues.
/// Only a failing transfer primitive stops the batch; whatever moved before
/// it stays where it landed.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The underlying relocation call failed mid-batch.
    #[error("relocation failed: {0}")]
    Transfer(#[from] RelocateError),
}
