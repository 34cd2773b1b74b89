// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI plumbing.

pub mod inspect;
pub mod run;
pub mod status;

use device_core::Device;
use model_probe::synthetic::{
    AdapterBundle, DiffusionCore, OpaqueBlob, PinnedModel, SealedTransformer, TensorModel,
};
use model_probe::{ModelProbe, PatchBundle};
use placement_node::PlacementConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialises the tracing subscriber from the `-v` count.
///
/// `RUST_LOG` takes precedence when set, so `-vv` and a handwritten filter
/// never fight each other.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the placement config from `path`, or returns the defaults when no
/// file was given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PlacementConfig> {
    match path {
        Some(path) => {
            let config = PlacementConfig::from_file(path)?;
            tracing::info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(PlacementConfig::default()),
    }
}

/// Builds the synthetic model named by `kind`, loaded on `accelerator`.
pub fn build_candidate(kind: &str, accelerator: Device) -> anyhow::Result<Box<dyn ModelProbe>> {
    let candidate: Box<dyn ModelProbe> = match kind {
        "bundle" => Box::new(PatchBundle::new(
            Box::new(TensorModel::new(accelerator)),
            accelerator,
            Device::Cpu,
        )),
        "adapter" => Box::new(AdapterBundle::new(
            Box::new(TensorModel::new(accelerator)),
            accelerator,
        )),
        "simple" => Box::new(TensorModel::new(accelerator)),
        "sealed" => Box::new(PatchBundle::new(
            Box::new(
                DiffusionCore::new(accelerator).with_backbone(Box::new(SealedTransformer)),
            ),
            accelerator,
            Device::Cpu,
        )),
        "pinned" => Box::new(PatchBundle::new(
            Box::new(PinnedModel::new(accelerator)),
            accelerator,
            Device::Cpu,
        )),
        "opaque" => Box::new(OpaqueBlob),
        other => anyhow::bail!(
            "unknown model kind '{other}' \
             (expected bundle, adapter, simple, sealed, pinned, or opaque)"
        ),
    };
    Ok(candidate)
}

/// Truncates a string with ellipsis.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
