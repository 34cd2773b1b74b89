// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for classification and relocation calls.

use crate::Slot;

/// Errors raised by classification.
///
/// Only the denylist can fail a classification, and only when the caller
/// opted into the `raise` policy. Every other rejection comes back as a
/// tagged [`Classification`](crate::Classification) value.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The candidate matches a denylist rule.
    #[error("model kind '{classname}' cannot be relocated: {reason}")]
    Denylisted { classname: String, reason: String },
}

/// Errors raised by a relocation call on a single component.
#[derive(Debug, thiserror::Error)]
pub enum RelocateError {
    /// The underlying device transfer failed.
    #[error("device transfer failed for '{classname}': {detail}")]
    TransferFailed { classname: String, detail: String },

    /// The object no longer exposes the handle the slot needs.
    #[error("'{classname}' has no relocation handle for its {slot} slot")]
    MissingCapability { classname: String, slot: Slot },
}
