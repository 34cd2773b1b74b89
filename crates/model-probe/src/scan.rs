// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The component scanner: from one candidate to its movable pieces.
//!
//! A scan never fails. It produces zero, one, or two transient
//! [`ModelComponent`] descriptors: a wrapper contributes its patch
//! bookkeeping and its inner model, a simple model contributes itself, and
//! anything else contributes nothing. Deeper nesting is deliberately not
//! walked — a wrapper inside a wrapper is out of scope.
//!
//! Descriptors are snapshots. Device fields are read fresh at scan time and
//! discarded after one relocation round; holding them across a move reads
//! stale state, which is why verification re-scans instead of reusing them.

use crate::{ModelProbe, RelocateError};
use device_core::Device;
use std::fmt;

/// Which movable unit of a candidate a descriptor refers to.
///
/// Relocation is dispatched by slot: each slot knows which handle on the
/// underlying object performs its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// A wrapper's patch bookkeeping, moved via
    /// [`Composite::patches_to`].
    Patches,
    /// The inner model inside a wrapper, moved via its own
    /// [`DeviceResident::to_device`](crate::DeviceResident::to_device).
    Inner,
    /// A simple model, moved via its own `to_device`.
    Direct,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Patches => write!(f, "patches"),
            Slot::Inner => write!(f, "inner"),
            Slot::Direct => write!(f, "direct"),
        }
    }
}

/// A transient descriptor of one relocatable unit.
///
/// Holds no capability of its own; the relocation handle stays with the
/// underlying model object and is reached through
/// [`relocate_slot`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelComponent {
    /// Concrete kind, for diagnostics only.
    pub classname: String,
    /// Which movable unit this descriptor covers.
    pub slot: Slot,
    /// Where the unit sits right now.
    pub current_device: Device,
    /// The device the unit declares it wants to run on, if any. Wrappers
    /// declare their load device; simple models declare nothing.
    pub target_device: Option<Device>,
    /// The device the unit prefers when offloaded, if it declares one.
    pub offload_device: Option<Device>,
}

/// Enumerates the movable components of `candidate`.
///
/// - A wrapper yields two components: its patch bookkeeping (current
///   device read live) and its inner model. An inner model without a
///   device accessor is skipped with a warning; the wrapper component is
///   still returned.
/// - A simple model yields one component.
/// - Anything else yields an empty list, which callers treat as "nothing
///   to do", not an error.
pub fn scan(candidate: &dyn ModelProbe) -> Vec<ModelComponent> {
    let mut components = Vec::new();

    if let Some(composite) = candidate.as_composite() {
        components.push(ModelComponent {
            classname: candidate.classname().to_string(),
            slot: Slot::Patches,
            current_device: composite.current_patch_device(),
            target_device: Some(composite.load_device()),
            offload_device: composite.offload_device(),
        });
        let inner = composite.inner();
        match inner.as_resident() {
            Some(resident) => components.push(ModelComponent {
                classname: inner.classname().to_string(),
                slot: Slot::Inner,
                current_device: resident.device(),
                target_device: None,
                offload_device: resident.offload_device(),
            }),
            None => tracing::warn!(
                classname = inner.classname(),
                "inner model exposes no device accessor; only the wrapper patches will move",
            ),
        }
    } else if let Some(resident) = candidate.as_resident() {
        components.push(ModelComponent {
            classname: candidate.classname().to_string(),
            slot: Slot::Direct,
            current_device: resident.device(),
            target_device: None,
            offload_device: resident.offload_device(),
        });
    }

    components
}

/// Invokes the relocation handle behind `slot`, moving that unit of
/// `candidate` to `target`.
///
/// This is the only place that knows which call moves what; the driver
/// stays oblivious to the capability shapes involved.
pub fn relocate_slot(
    candidate: &mut dyn ModelProbe,
    slot: Slot,
    target: Device,
) -> Result<(), RelocateError> {
    let classname = candidate.classname().to_string();
    match slot {
        Slot::Patches => {
            let composite = candidate
                .as_composite_mut()
                .ok_or(RelocateError::MissingCapability { classname, slot })?;
            composite.patches_to(target)
        }
        Slot::Inner => {
            let composite = candidate
                .as_composite_mut()
                .ok_or(RelocateError::MissingCapability { classname, slot })?;
            let inner = composite.inner_mut();
            let inner_name = inner.classname().to_string();
            let resident = inner.as_resident_mut().ok_or(
                RelocateError::MissingCapability {
                    classname: inner_name,
                    slot,
                },
            )?;
            resident.to_device(target)
        }
        Slot::Direct => {
            let resident = candidate
                .as_resident_mut()
                .ok_or(RelocateError::MissingCapability { classname, slot })?;
            resident.to_device(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{OpaqueBlob, TensorModel};
    use crate::PatchBundle;

    fn bundle_offloaded() -> PatchBundle {
        PatchBundle::new(
            Box::new(TensorModel::new(Device::Cpu)),
            Device::Gpu(0),
            Device::Cpu,
        )
        .with_patch_device(Device::Cpu)
    }

    #[test]
    fn test_scan_simple_model() {
        let model = TensorModel::new(Device::Gpu(0));
        let components = scan(&model);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].slot, Slot::Direct);
        assert_eq!(components[0].classname, "TensorModel");
        assert_eq!(components[0].current_device, Device::Gpu(0));
        assert_eq!(components[0].target_device, None);
    }

    #[test]
    fn test_scan_wrapper_yields_two_components() {
        let bundle = bundle_offloaded();
        let components = scan(&bundle);
        assert_eq!(components.len(), 2);

        assert_eq!(components[0].slot, Slot::Patches);
        assert_eq!(components[0].classname, "PatchBundle");
        assert_eq!(components[0].current_device, Device::Cpu);
        assert_eq!(components[0].target_device, Some(Device::Gpu(0)));
        assert_eq!(components[0].offload_device, Some(Device::Cpu));

        assert_eq!(components[1].slot, Slot::Inner);
        assert_eq!(components[1].classname, "TensorModel");
        assert_eq!(components[1].current_device, Device::Cpu);
        assert_eq!(components[1].target_device, None);
    }

    #[test]
    fn test_scan_incompatible_is_empty() {
        let blob = OpaqueBlob;
        assert!(scan(&blob).is_empty());
    }

    #[test]
    fn test_scan_reads_devices_fresh() {
        let mut model = TensorModel::new(Device::Gpu(0));
        relocate_slot(&mut model, Slot::Direct, Device::Cpu).unwrap();
        let components = scan(&model);
        assert_eq!(components[0].current_device, Device::Cpu);
    }

    #[test]
    fn test_scan_skips_inner_without_device() {
        let bundle = PatchBundle::new(Box::new(OpaqueBlob), Device::Gpu(0), Device::Cpu);
        let components = scan(&bundle);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].slot, Slot::Patches);
    }

    #[test]
    fn test_relocate_patches_slot() {
        let mut bundle = bundle_offloaded();
        relocate_slot(&mut bundle, Slot::Patches, Device::Gpu(0)).unwrap();
        let components = scan(&bundle);
        assert_eq!(components[0].current_device, Device::Gpu(0));
        // The inner model stays put until its own slot moves.
        assert_eq!(components[1].current_device, Device::Cpu);
    }

    #[test]
    fn test_relocate_inner_slot() {
        let mut bundle = bundle_offloaded();
        relocate_slot(&mut bundle, Slot::Inner, Device::Gpu(0)).unwrap();
        let components = scan(&bundle);
        assert_eq!(components[0].current_device, Device::Cpu);
        assert_eq!(components[1].current_device, Device::Gpu(0));
    }

    #[test]
    fn test_relocate_missing_capability() {
        let mut blob = OpaqueBlob;
        let err = relocate_slot(&mut blob, Slot::Direct, Device::Cpu).unwrap_err();
        assert!(matches!(
            err,
            RelocateError::MissingCapability {
                slot: Slot::Direct,
                ..
            }
        ));

        let err = relocate_slot(&mut blob, Slot::Patches, Device::Cpu).unwrap_err();
        assert!(matches!(
            err,
            RelocateError::MissingCapability {
                slot: Slot::Patches,
                ..
            }
        ));
    }

    #[test]
    fn test_component_serialises_with_device_names() {
        let model = TensorModel::new(Device::Gpu(1));
        let components = scan(&model);
        let json = serde_json::to_value(&components[0]).unwrap();
        assert_eq!(json["current_device"], "gpu:1");
        assert_eq!(json["slot"], "direct");
    }
}
