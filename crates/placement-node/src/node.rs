// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The placement node: classify, relocate, pass through.
//!
//! A node is a thin host-facing shell over the classifier and the driver.
//! Its one promise is pass-through: whatever arrives on `value` and `model`
//! leaves on the same-named outputs, relocated or not. The only way `route`
//! fails is a denylist hit under the `raise` policy or an underlying
//! transfer error; every lesser condition is logged, recorded in the
//! outcome, and absorbed.

use crate::{NodeError, NodeSchema, NodeSettings};
use device_core::DeviceRegistry;
use memory_housekeeping::Housekeeping;
use model_probe::{Classification, Classifier, ModelProbe};
use relocation_driver::{Direction, RelocationDriver, RelocationReport};
use std::fmt;
use std::sync::Arc;

/// What one `route` call did, alongside the passed-through value.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOutcome {
    /// The node was disabled; nothing was inspected or moved.
    Disabled,
    /// No model was wired in; nothing to do.
    NoModel,
    /// The model was classified but not relocatable; it passed through
    /// untouched.
    Skipped { classification: Classification },
    /// A relocation round ran to completion (possibly partially).
    Completed { report: RelocationReport },
}

impl RouteOutcome {
    /// The relocation report, if a round actually ran.
    pub fn report(&self) -> Option<&RelocationReport> {
        match self {
            RouteOutcome::Completed { report } => Some(report),
            _ => None,
        }
    }
}

/// The result of routing one value/model pair through the node.
#[derive(Debug)]
pub struct Routed<V> {
    /// The `value` input, passed through unchanged.
    pub value: V,
    /// What happened to the model.
    pub outcome: RouteOutcome,
}

/// A relocation node with a fixed direction.
///
/// Hosts construct one node per direction via [`offload`](Self::offload) or
/// [`recall`](Self::recall) and call [`route`](Self::route) once per
/// traversal. The node owns no models and keeps no per-call state, so one
/// instance serves any number of sequential calls.
pub struct PlacementNode {
    direction: Direction,
    registry: Arc<dyn DeviceRegistry>,
    driver: RelocationDriver,
    classifier: Classifier,
}

impl PlacementNode {
    /// Creates a node that moves models to the registry's offload device.
    pub fn offload(registry: Arc<dyn DeviceRegistry>, housekeeping: Arc<dyn Housekeeping>) -> Self {
        Self::with_direction(Direction::Offload, registry, housekeeping)
    }

    /// Creates a node that moves models back to their preferred device.
    pub fn recall(registry: Arc<dyn DeviceRegistry>, housekeeping: Arc<dyn Housekeeping>) -> Self {
        Self::with_direction(Direction::Recall, registry, housekeeping)
    }

    fn with_direction(
        direction: Direction,
        registry: Arc<dyn DeviceRegistry>,
        housekeeping: Arc<dyn Housekeeping>,
    ) -> Self {
        let driver = RelocationDriver::new(Arc::clone(&registry), housekeeping);
        Self {
            direction,
            registry,
            driver,
            classifier: Classifier::default(),
        }
    }

    /// Replaces the default classifier, e.g. with one carrying host rules
    /// from [`PlacementConfig`](crate::PlacementConfig).
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// The direction this node relocates in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The node's declared input/output ports.
    pub fn schema(&self) -> NodeSchema {
        NodeSchema::for_registry(&*self.registry)
    }

    /// Routes one value/model pair through the node.
    ///
    /// `value` is opaque cargo: it is returned unchanged in every outcome,
    /// including alongside a partially failed relocation. `model`, when
    /// wired and relocatable, is driven through one relocation round in
    /// this node's direction.
    ///
    /// # Errors
    /// A denylist hit under [`ErrorPolicy::Raise`](model_probe::ErrorPolicy)
    /// or an underlying transfer error. Incompatible models and failed
    /// verification are not errors.
    pub fn route<V>(
        &self,
        value: V,
        model: Option<&mut dyn ModelProbe>,
        settings: &NodeSettings,
    ) -> Result<Routed<V>, NodeError> {
        if !settings.enable {
            tracing::debug!("{}: disabled, passing inputs through", self.direction);
            return Ok(Routed {
                value,
                outcome: RouteOutcome::Disabled,
            });
        }

        let Some(model) = model else {
            tracing::debug!("{}: no model wired, passing inputs through", self.direction);
            return Ok(Routed {
                value,
                outcome: RouteOutcome::NoModel,
            });
        };

        let classification = self.classifier.classify(&*model, settings.on_error)?;
        if !classification.is_relocatable() {
            tracing::warn!(
                classname = model.classname(),
                "{}: skipping ({classification})",
                self.direction,
            );
            return Ok(Routed {
                value,
                outcome: RouteOutcome::Skipped { classification },
            });
        }

        let report = self
            .driver
            .run(model, settings.device.into(), self.direction)?;
        Ok(Routed {
            value,
            outcome: RouteOutcome::Completed { report },
        })
    }
}

impl fmt::Debug for PlacementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementNode")
            .field("direction", &self.direction)
            .field("driver", &self.driver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeviceChoice;
    use device_core::{Device, StaticRegistry};
    use memory_housekeeping::{NoopHousekeeping, SoftCache};
    use model_probe::synthetic::{DiffusionCore, OpaqueBlob, SealedTransformer, TensorModel};
    use model_probe::{DenyRule, DeviceResident, ErrorPolicy};
    use relocation_driver::BatchStatus;

    fn offload_node() -> PlacementNode {
        PlacementNode::offload(
            Arc::new(StaticRegistry::default()),
            Arc::new(NoopHousekeeping),
        )
    }

    fn recall_node() -> PlacementNode {
        PlacementNode::recall(
            Arc::new(StaticRegistry::default()),
            Arc::new(NoopHousekeeping),
        )
    }

    fn sealed() -> DiffusionCore {
        DiffusionCore::new(Device::Gpu(0)).with_backbone(Box::new(SealedTransformer))
    }

    #[test]
    fn test_offload_completes() {
        let mut model = TensorModel::new(Device::Gpu(0));
        let routed = offload_node()
            .route("latents", Some(&mut model), &NodeSettings::default())
            .unwrap();

        assert_eq!(routed.value, "latents");
        let report = routed.outcome.report().unwrap();
        assert_eq!(report.status, BatchStatus::Success);
        assert_eq!(model.device(), Device::Cpu);
    }

    #[test]
    fn test_disabled_has_zero_side_effects() {
        let cache = SoftCache::new();
        cache.retain(vec![0u8; 4096]);
        let node = PlacementNode::offload(
            Arc::new(StaticRegistry::default()),
            Arc::new(cache.clone()),
        );

        let mut model = TensorModel::new(Device::Gpu(0));
        let settings = NodeSettings {
            enable: false,
            ..Default::default()
        };
        let routed = node.route(7u32, Some(&mut model), &settings).unwrap();

        assert_eq!(routed.value, 7);
        assert!(matches!(routed.outcome, RouteOutcome::Disabled));
        assert_eq!(model.device(), Device::Gpu(0));
        assert_eq!(cache.stats().cache_releases, 0);
        assert_eq!(cache.stats().gc_passes, 0);
    }

    #[test]
    fn test_no_model_passes_through() {
        let routed = offload_node()
            .route(vec![1, 2, 3], None, &NodeSettings::default())
            .unwrap();
        assert_eq!(routed.value, vec![1, 2, 3]);
        assert!(matches!(routed.outcome, RouteOutcome::NoModel));
    }

    #[test]
    fn test_denylist_raise_fails_the_call() {
        let mut model = sealed();
        let err = offload_node()
            .route((), Some(&mut model), &NodeSettings::default())
            .unwrap_err();
        assert!(matches!(err, NodeError::Classify(_)));
    }

    #[test]
    fn test_denylist_ignore_skips() {
        let mut model = sealed();
        let settings = NodeSettings {
            on_error: ErrorPolicy::Ignore,
            ..Default::default()
        };
        let routed = offload_node().route((), Some(&mut model), &settings).unwrap();
        assert!(matches!(
            routed.outcome,
            RouteOutcome::Skipped {
                classification: Classification::Unsupported { .. }
            }
        ));
        // The model was never moved.
        assert_eq!(model.device(), Device::Gpu(0));
    }

    #[test]
    fn test_incompatible_skips_even_under_raise() {
        let mut blob = OpaqueBlob;
        let routed = offload_node()
            .route("cargo", Some(&mut blob), &NodeSettings::default())
            .unwrap();
        assert_eq!(routed.value, "cargo");
        assert!(matches!(
            routed.outcome,
            RouteOutcome::Skipped {
                classification: Classification::Incompatible
            }
        ));
    }

    #[test]
    fn test_pinned_device_setting_overrides_direction() {
        let mut model = TensorModel::new(Device::Cpu);
        let settings = NodeSettings {
            device: DeviceChoice::Pinned(Device::Gpu(1)),
            ..Default::default()
        };
        recall_node().route((), Some(&mut model), &settings).unwrap();
        assert_eq!(model.device(), Device::Gpu(1));
    }

    #[test]
    fn test_custom_classifier_rules_apply() {
        let node = offload_node().with_classifier(Classifier::default().with_rules([DenyRule {
            path: vec![],
            classname: "TensorModel".into(),
            reason: "host rule".into(),
        }]));

        let mut model = TensorModel::new(Device::Gpu(0));
        let settings = NodeSettings {
            on_error: ErrorPolicy::Ignore,
            ..Default::default()
        };
        let routed = node.route((), Some(&mut model), &settings).unwrap();
        assert!(matches!(routed.outcome, RouteOutcome::Skipped { .. }));
    }

    #[test]
    fn test_schema_reflects_registry() {
        let schema = offload_node().schema();
        let device = schema.input("device").unwrap();
        match &device.kind {
            crate::PortKind::Choice(options) => {
                assert_eq!(options[0], "auto");
                assert!(options.contains(&"cpu".to_string()));
                assert!(options.contains(&"gpu:0".to_string()));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_direction_accessor() {
        assert_eq!(offload_node().direction(), Direction::Offload);
        assert_eq!(recall_node().direction(), Direction::Recall);
    }

    #[test]
    fn test_outcome_serialises() {
        let mut model = TensorModel::new(Device::Gpu(0));
        let routed = offload_node()
            .route((), Some(&mut model), &NodeSettings::default())
            .unwrap();
        let json = serde_json::to_value(&routed.outcome).unwrap();
        assert_eq!(json["completed"]["report"]["status"], "success");
    }
}
