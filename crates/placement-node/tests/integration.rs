// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: configuration → node → relocation round.
//!
//! These tests exercise the complete flow from a TOML config through node
//! construction to routed relocation, proving that the crates compose and
//! that pass-through holds in every outcome.

use device_core::Device;
use memory_housekeeping::{NoopHousekeeping, SoftCache};
use model_probe::synthetic::{PinnedModel, TensorModel};
use model_probe::{scan, ErrorPolicy, PatchBundle, Slot};
use placement_node::{
    DeviceChoice, NodeError, NodeSettings, PlacementConfig, PlacementNode, PortKind, RouteOutcome,
};
use relocation_driver::{BatchStatus, MoveStatus};
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────

fn loaded_bundle() -> PatchBundle {
    PatchBundle::new(
        Box::new(TensorModel::new(Device::Gpu(0))),
        Device::Gpu(0),
        Device::Cpu,
    )
}

fn nodes_from(config: &PlacementConfig) -> (PlacementNode, PlacementNode) {
    let registry: Arc<dyn device_core::DeviceRegistry> = Arc::new(config.registry().unwrap());
    let offload = PlacementNode::offload(Arc::clone(&registry), Arc::new(NoopHousekeeping))
        .with_classifier(config.classifier());
    let recall = PlacementNode::recall(registry, Arc::new(NoopHousekeeping))
        .with_classifier(config.classifier());
    (offload, recall)
}

// ── Full Pipeline Tests ────────────────────────────────────────

#[test]
fn test_config_to_round_trip() {
    let config = PlacementConfig::from_toml(
        r#"
accelerator = "cuda:0"
offload_device = "cpu"
"#,
    )
    .unwrap();
    let (offload, recall) = nodes_from(&config);
    let settings = config.settings;

    let mut bundle = loaded_bundle();
    let routed = offload
        .route("latents", Some(&mut bundle), &settings)
        .unwrap();
    assert_eq!(routed.value, "latents");
    assert_eq!(
        routed.outcome.report().unwrap().status,
        BatchStatus::Success
    );
    for component in scan(&bundle) {
        assert_eq!(component.current_device, Device::Cpu);
    }

    let routed = recall.route("latents", Some(&mut bundle), &settings).unwrap();
    assert_eq!(
        routed.outcome.report().unwrap().status,
        BatchStatus::Success
    );
    for component in scan(&bundle) {
        assert_eq!(component.current_device, Device::Gpu(0));
    }

    // A second recall finds everything in place.
    let routed = recall.route("latents", Some(&mut bundle), &settings).unwrap();
    assert!(routed.outcome.report().unwrap().is_no_op());
}

#[test]
fn test_host_deny_rule_from_config() {
    let config = PlacementConfig::from_toml(
        r#"
[[deny_rules]]
path = []
classname = "TensorModel"
reason = "managed by the host loader"
"#,
    )
    .unwrap();
    let (offload, _) = nodes_from(&config);

    let mut model = TensorModel::new(Device::Gpu(0));

    // Default policy raises.
    let err = offload
        .route((), Some(&mut model), &NodeSettings::default())
        .unwrap_err();
    assert!(matches!(err, NodeError::Classify(_)));

    // Ignore downgrades to a skip, and the model stays put.
    let settings = NodeSettings {
        on_error: ErrorPolicy::Ignore,
        ..Default::default()
    };
    let routed = offload.route((), Some(&mut model), &settings).unwrap();
    assert!(matches!(routed.outcome, RouteOutcome::Skipped { .. }));
    assert_eq!(scan(&model)[0].current_device, Device::Gpu(0));
}

// ── Partial Failure ────────────────────────────────────────────

#[test]
fn test_partial_failure_still_passes_value_through() {
    let mut bundle = PatchBundle::new(
        Box::new(PinnedModel::new(Device::Gpu(0))),
        Device::Gpu(0),
        Device::Cpu,
    );
    let (offload, _) = nodes_from(&PlacementConfig::default());

    let routed = offload
        .route("cargo", Some(&mut bundle), &NodeSettings::default())
        .unwrap();

    assert_eq!(routed.value, "cargo");
    let report = routed.outcome.report().unwrap();
    assert_eq!(report.status, BatchStatus::Partial);

    let inner = report
        .outcomes
        .iter()
        .find(|o| o.slot == Slot::Inner)
        .unwrap();
    assert_eq!(inner.status, MoveStatus::VerificationFailed);
    let patches = report
        .outcomes
        .iter()
        .find(|o| o.slot == Slot::Patches)
        .unwrap();
    assert_eq!(patches.status, MoveStatus::Moved);
}

// ── Disabled Node ──────────────────────────────────────────────

#[test]
fn test_disabled_node_touches_nothing() {
    let cache = SoftCache::new();
    cache.retain(vec![0u8; 2048]);
    let config = PlacementConfig::from_toml("[settings]\nenable = false").unwrap();
    let registry = Arc::new(config.registry().unwrap());
    let node = PlacementNode::offload(registry, Arc::new(cache.clone()));

    let mut bundle = loaded_bundle();
    let routed = node
        .route(99u64, Some(&mut bundle), &config.settings)
        .unwrap();

    assert_eq!(routed.value, 99);
    assert!(matches!(routed.outcome, RouteOutcome::Disabled));
    for component in scan(&bundle) {
        assert_eq!(component.current_device, Device::Gpu(0));
    }
    assert_eq!(cache.stats().cache_releases, 0);
    assert_eq!(cache.stats().gc_passes, 0);
}

// ── Explicit Device Selection ──────────────────────────────────

#[test]
fn test_pinned_device_from_settings() {
    let config = PlacementConfig::from_toml(
        r#"
accelerator = "gpu:0"
gpu_count = 2

[settings]
device = "gpu:1"
"#,
    )
    .unwrap();
    let (_, recall) = nodes_from(&config);
    assert_eq!(config.settings.device, DeviceChoice::Pinned(Device::Gpu(1)));

    let mut model = TensorModel::new(Device::Cpu);
    let routed = recall.route((), Some(&mut model), &config.settings).unwrap();
    assert_eq!(
        routed.outcome.report().unwrap().outcomes[0].device,
        Device::Gpu(1)
    );
}

// ── Schema ─────────────────────────────────────────────────────

#[test]
fn test_schema_follows_config_gpu_count() {
    let config = PlacementConfig {
        gpu_count: Some(3),
        ..Default::default()
    };
    let (offload, _) = nodes_from(&config);
    let schema = offload.schema();

    match &schema.input("device").unwrap().kind {
        PortKind::Choice(options) => {
            assert_eq!(
                options,
                &vec![
                    "auto".to_string(),
                    "cpu".to_string(),
                    "gpu:0".to_string(),
                    "gpu:1".to_string(),
                    "gpu:2".to_string(),
                ]
            );
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}
