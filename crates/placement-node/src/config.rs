// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! accelerator = "gpu:0"
//! offload_device = "cpu"
//! gpu_count = 2
//!
//! [settings]
//! device = "auto"
//! on_error = "raise"
//! enable = true
//!
//! [[deny_rules]]
//! path = ["model", "backbone"]
//! classname = "FrozenQuantTransformer"
//! reason = "weights are paged by the quantised loader"
//! ```
//!
//! Every key has a default; an empty file is a valid configuration.

use crate::{NodeError, NodeSettings};
use device_core::{Device, StaticRegistry};
use model_probe::{Classifier, DenyRule};
use std::path::Path;

/// Configuration for a placement node host.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlacementConfig {
    /// Name of the device models are recalled to (e.g. `"gpu:0"`).
    #[serde(default = "default_accelerator")]
    pub accelerator: String,
    /// Name of the device offloaded models land on (e.g. `"cpu"`).
    #[serde(default = "default_offload")]
    pub offload_device: String,
    /// Number of GPUs offered in the device choice list (defaults to what
    /// the accelerator index implies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_count: Option<u16>,
    /// Default node settings applied when a caller passes none of its own.
    #[serde(default)]
    pub settings: NodeSettings,
    /// Host denylist entries, appended after the built-in rules.
    #[serde(default)]
    pub deny_rules: Vec<DenyRule>,
}

fn default_accelerator() -> String {
    "gpu:0".to_string()
}

fn default_offload() -> String {
    "cpu".to_string()
}

impl PlacementConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NodeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, NodeError> {
        toml::from_str(toml_str)
            .map_err(|e| NodeError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self)
            .map_err(|e| NodeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Builds the device registry described by this config.
    pub fn registry(&self) -> Result<StaticRegistry, NodeError> {
        let accelerator = Device::parse(&self.accelerator)?;
        let offload = Device::parse(&self.offload_device)?;
        let mut registry = StaticRegistry::new(accelerator, offload);
        if let Some(count) = self.gpu_count {
            registry = registry.with_gpu_count(count);
        }
        Ok(registry)
    }

    /// Builds a classifier carrying the built-in denylist plus this
    /// config's extra rules, in that order.
    pub fn classifier(&self) -> Classifier {
        Classifier::default().with_rules(self.deny_rules.iter().cloned())
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            accelerator: default_accelerator(),
            offload_device: default_offload(),
            gpu_count: None,
            settings: NodeSettings::default(),
            deny_rules: Vec::new(),
        }
    }
}
