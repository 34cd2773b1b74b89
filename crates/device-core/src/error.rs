// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for device handling.

/// Errors produced while resolving device names.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The supplied name was empty or whitespace-only.
    #[error("empty device name")]
    EmptyName,

    /// The supplied name does not match any known device spelling.
    #[error("unrecognised device name '{name}' (expected 'cpu', 'gpu[:N]', 'cuda[:N]', or an index)")]
    InvalidName { name: String },
}
