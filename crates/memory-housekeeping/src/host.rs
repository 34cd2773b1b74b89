// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Host memory readings via `/proc/meminfo`.
//!
//! An offloaded model lands in host memory, so the CLI shows a reading
//! before and after a move. The parser needs only three fields; everything
//! else in the file is skipped.

use crate::HousekeepingError;
use std::path::Path;

const MEMINFO_PATH: &str = "/proc/meminfo";

/// A point-in-time reading of host memory.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HostMemory {
    /// Total physical memory in bytes.
    pub total_bytes: u64,
    /// Memory the kernel estimates a new allocation can use without
    /// swapping, in bytes.
    pub available_bytes: u64,
    /// Page-cache memory in bytes (reclaimable, counted within available).
    pub cached_bytes: u64,
}

impl HostMemory {
    /// Reads the current host memory state from `/proc/meminfo`.
    pub fn read() -> Result<Self, HousekeepingError> {
        Self::read_from(Path::new(MEMINFO_PATH))
    }

    pub(crate) fn read_from(path: &Path) -> Result<Self, HousekeepingError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| HousekeepingError::ReadError {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, source_path: &Path) -> Result<Self, HousekeepingError> {
        let mut total_kb: Option<u64> = None;
        let mut available_kb: Option<u64> = None;
        let mut cached_kb: Option<u64> = None;

        for line in content.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let field = match key {
                "MemTotal" => &mut total_kb,
                "MemAvailable" => &mut available_kb,
                "Cached" => &mut cached_kb,
                _ => continue,
            };
            let value = rest.split_whitespace().next().ok_or_else(|| {
                HousekeepingError::ParseError {
                    path: source_path.display().to_string(),
                    detail: format!("no value after '{key}'"),
                }
            })?;
            *field = Some(value.parse::<u64>().map_err(|_| {
                HousekeepingError::ParseError {
                    path: source_path.display().to_string(),
                    detail: format!("expected integer kB value for '{key}', got '{value}'"),
                }
            })?);
            if total_kb.is_some() && available_kb.is_some() && cached_kb.is_some() {
                break;
            }
        }

        let total_kb = total_kb.ok_or_else(|| HousekeepingError::ParseError {
            path: source_path.display().to_string(),
            detail: "MemTotal not found".to_string(),
        })?;
        let available_kb = available_kb.ok_or_else(|| HousekeepingError::ParseError {
            path: source_path.display().to_string(),
            detail: "MemAvailable not found".to_string(),
        })?;

        Ok(Self {
            total_bytes: total_kb * 1024,
            available_bytes: available_kb * 1024,
            cached_bytes: cached_kb.unwrap_or(0) * 1024,
        })
    }

    /// Memory in active use, in bytes.
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }

    /// Memory utilisation as a fraction in `[0.0, 1.0]`.
    pub fn utilisation(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes() as f64 / self.total_bytes as f64
    }

    /// Available memory in megabytes.
    pub fn available_mb(&self) -> u64 {
        self.available_bytes / (1024 * 1024)
    }

    /// Total memory in megabytes.
    pub fn total_mb(&self) -> u64 {
        self.total_bytes / (1024 * 1024)
    }

    /// Whether an allocation of `bytes` fits in available memory.
    pub fn fits(&self, bytes: u64) -> bool {
        bytes <= self.available_bytes
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Host memory: {} MB total, {} MB available ({:.1}% used, {} MB cached)",
            self.total_mb(),
            self.available_mb(),
            self.utilisation() * 100.0,
            self.cached_bytes / (1024 * 1024),
        )
    }
}
