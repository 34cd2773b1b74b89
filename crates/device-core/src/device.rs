// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`Device`] value type and its name normalisation rules.
//!
//! Device names arrive from configuration files, node parameters, and CLI
//! flags in a handful of spellings (`"cpu"`, `"cuda:0"`, `"GPU:1"`, a bare
//! index). All of them normalise into the same handle so that equality
//! checks during relocation and verification compare locations, not strings.

use crate::DeviceError;
use std::fmt;
use std::str::FromStr;

/// A compute location: the host, or an indexed accelerator.
///
/// `Device` is `Copy` and compared for equality only. The relocation
/// protocol treats it as opaque — there is no ordering and no notion of
/// "distance" between devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// Host memory.
    Cpu,
    /// Accelerator with the given index.
    Gpu(u16),
}

impl Device {
    /// Parses a raw device name into a handle.
    ///
    /// Accepted spellings (case-insensitive, surrounding whitespace ignored):
    /// - `"cpu"` → [`Device::Cpu`]
    /// - `"gpu"` or `"cuda"` → [`Device::Gpu`]`(0)`
    /// - `"gpu:N"` or `"cuda:N"` → [`Device::Gpu`]`(N)`
    /// - a bare index `"N"` → [`Device::Gpu`]`(N)`
    pub fn parse(raw: &str) -> Result<Self, DeviceError> {
        let name = raw.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(DeviceError::EmptyName);
        }
        match name.as_str() {
            "cpu" => return Ok(Device::Cpu),
            "gpu" | "cuda" => return Ok(Device::Gpu(0)),
            _ => {}
        }
        if let Some(index) = name.strip_prefix("gpu:").or_else(|| name.strip_prefix("cuda:")) {
            return index
                .parse::<u16>()
                .map(Device::Gpu)
                .map_err(|_| DeviceError::InvalidName { name: raw.trim().to_string() });
        }
        if let Ok(index) = name.parse::<u16>() {
            return Ok(Device::Gpu(index));
        }
        Err(DeviceError::InvalidName {
            name: raw.trim().to_string(),
        })
    }

    /// Returns `true` if this device is an accelerator.
    pub fn is_accelerator(&self) -> bool {
        matches!(self, Device::Gpu(_))
    }

    /// Returns the accelerator index, or `None` for the host device.
    pub fn index(&self) -> Option<u16> {
        match self {
            Device::Cpu => None,
            Device::Gpu(index) => Some(*index),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu(index) => write!(f, "gpu:{index}"),
        }
    }
}

impl FromStr for Device {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Device::parse(s)
    }
}

// Devices serialise as their normalised name so that reports and configs
// read the same way they are written by hand.
impl serde::Serialize for Device {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Device {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Device::parse(&name).map_err(serde::de::Error::custom)
    }
}
