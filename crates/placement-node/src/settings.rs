// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-call node settings, mirroring the node's declared input ports.

use device_core::{Device, DeviceError};
use model_probe::ErrorPolicy;
use relocation_driver::TargetSpec;
use std::fmt;
use std::str::FromStr;

/// The `device` input: resolve automatically, or pin a specific device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceChoice {
    /// Let the driver resolve the target from the direction and registry.
    #[default]
    Auto,
    /// Drive every component to this device.
    Pinned(Device),
}

impl DeviceChoice {
    /// Parses the raw value of the `device` input.
    ///
    /// `"auto"` selects automatic resolution; anything else must be a valid
    /// device name.
    pub fn parse(raw: &str) -> Result<Self, DeviceError> {
        if raw.trim().eq_ignore_ascii_case("auto") {
            return Ok(DeviceChoice::Auto);
        }
        Device::parse(raw).map(DeviceChoice::Pinned)
    }
}

impl fmt::Display for DeviceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceChoice::Auto => write!(f, "auto"),
            DeviceChoice::Pinned(device) => write!(f, "{device}"),
        }
    }
}

impl FromStr for DeviceChoice {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceChoice::parse(s)
    }
}

impl From<DeviceChoice> for TargetSpec {
    fn from(choice: DeviceChoice) -> Self {
        match choice {
            DeviceChoice::Auto => TargetSpec::Auto,
            DeviceChoice::Pinned(device) => TargetSpec::Explicit(device),
        }
    }
}

// Same convention as `Device`: settings files carry the spelled-out name.
impl serde::Serialize for DeviceChoice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for DeviceChoice {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DeviceChoice::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// The resolved values of the node's parameter inputs for one `route` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    /// Target selection for the relocation round.
    pub device: DeviceChoice,
    /// What a denylist hit does: skip quietly or fail the call.
    pub on_error: ErrorPolicy,
    /// With `false` the node passes its inputs through untouched.
    pub enable: bool,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            device: DeviceChoice::Auto,
            on_error: ErrorPolicy::Raise,
            enable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = NodeSettings::default();
        assert_eq!(settings.device, DeviceChoice::Auto);
        assert_eq!(settings.on_error, ErrorPolicy::Raise);
        assert!(settings.enable);
    }

    #[test]
    fn test_device_choice_parse() {
        assert_eq!(DeviceChoice::parse("auto").unwrap(), DeviceChoice::Auto);
        assert_eq!(DeviceChoice::parse(" AUTO ").unwrap(), DeviceChoice::Auto);
        assert_eq!(
            DeviceChoice::parse("cuda:1").unwrap(),
            DeviceChoice::Pinned(Device::Gpu(1))
        );
        assert_eq!(
            DeviceChoice::parse("cpu").unwrap(),
            DeviceChoice::Pinned(Device::Cpu)
        );
        assert!(DeviceChoice::parse("npu").is_err());
    }

    #[test]
    fn test_device_choice_into_target() {
        assert_eq!(TargetSpec::from(DeviceChoice::Auto), TargetSpec::Auto);
        assert_eq!(
            TargetSpec::from(DeviceChoice::Pinned(Device::Cpu)),
            TargetSpec::Explicit(Device::Cpu)
        );
    }

    #[test]
    fn test_settings_serde_roundtrip() {
        let settings = NodeSettings {
            device: DeviceChoice::Pinned(Device::Gpu(1)),
            on_error: ErrorPolicy::Ignore,
            enable: false,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"gpu:1\""));
        let back: NodeSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_settings_partial_deserialize_uses_defaults() {
        let settings: NodeSettings = serde_json::from_str(r#"{"device": "cpu"}"#).unwrap();
        assert_eq!(settings.device, DeviceChoice::Pinned(Device::Cpu));
        assert_eq!(settings.on_error, ErrorPolicy::Raise);
        assert!(settings.enable);
    }
}
