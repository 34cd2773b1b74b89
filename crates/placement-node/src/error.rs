// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the host node layer.

/// Errors surfaced by [`route`](crate::PlacementNode::route) and by
/// configuration loading.
///
/// Everything else the node encounters — incompatible models, failed
/// verification — is absorbed into logs and the route outcome; the inputs
/// still pass through.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Classification failed; only a denylist hit under the `raise`
    /// policy lands here.
    #[error(transparent)]
    Classify(#[from] model_probe::ClassifyError),

    /// A relocation round failed outright (underlying transfer error).
    #[error(transparent)]
    Driver(#[from] relocation_driver::DriverError),

    /// A configured device name did not parse.
    #[error("device error: {0}")]
    Device(#[from] device_core::DeviceError),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
