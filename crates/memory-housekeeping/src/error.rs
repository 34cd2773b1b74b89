// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for host memory readings.

/// Errors while reading or parsing host memory information.
#[derive(Debug, thiserror::Error)]
pub enum HousekeepingError {
    /// The memory info file could not be read.
    #[error("cannot read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The memory info file was readable but malformed.
    #[error("cannot parse '{path}': {detail}")]
    ParseError { path: String, detail: String },
}
