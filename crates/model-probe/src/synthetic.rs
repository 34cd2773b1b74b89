// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Synthetic model shapes for demos and tests.
//!
//! Each type exercises one corner of classification and relocation:
//! [`TensorModel`] the plain simple model, [`DiffusionCore`] a model with a
//! nested backbone for the denylist to walk, [`SealedTransformer`] the
//! denylisted kind, [`AdapterBundle`] a derived wrapper, [`PinnedModel`] a
//! transfer that silently fails verification, [`FailingModel`] a transfer
//! that errors outright, and [`OpaqueBlob`] no capability at all.

use crate::{Composite, DeviceResident, ModelProbe, RelocateError};
use device_core::Device;
use std::any::Any;

/// A plain tensor-holding model that moves through its own transfer handle.
#[derive(Debug)]
pub struct TensorModel {
    device: Device,
    offload_device: Option<Device>,
}

impl TensorModel {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            offload_device: None,
        }
    }

    /// Declares a preferred offload device.
    pub fn with_offload_device(mut self, device: Device) -> Self {
        self.offload_device = Some(device);
        self
    }
}

impl DeviceResident for TensorModel {
    fn device(&self) -> Device {
        self.device
    }

    fn offload_device(&self) -> Option<Device> {
        self.offload_device
    }

    fn to_device(&mut self, target: Device) -> Result<(), RelocateError> {
        self.device = target;
        Ok(())
    }
}

impl ModelProbe for TensorModel {
    fn classname(&self) -> &str {
        "TensorModel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_resident(&self) -> Option<&dyn DeviceResident> {
        Some(self)
    }

    fn as_resident_mut(&mut self) -> Option<&mut dyn DeviceResident> {
        Some(self)
    }
}

/// A denoising core that may own a backbone module.
///
/// The backbone is reachable through the `backbone` attribute, giving the
/// denylist a path to walk. Moving the core does not move the backbone —
/// backbones of this shape manage their own residency, which is exactly
/// why sealed ones are denylisted.
pub struct DiffusionCore {
    device: Device,
    backbone: Option<Box<dyn ModelProbe>>,
}

impl DiffusionCore {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            backbone: None,
        }
    }

    /// Attaches a backbone module.
    pub fn with_backbone(mut self, backbone: Box<dyn ModelProbe>) -> Self {
        self.backbone = Some(backbone);
        self
    }
}

impl DeviceResident for DiffusionCore {
    fn device(&self) -> Device {
        self.device
    }

    fn to_device(&mut self, target: Device) -> Result<(), RelocateError> {
        self.device = target;
        Ok(())
    }
}

impl ModelProbe for DiffusionCore {
    fn classname(&self) -> &str {
        "DiffusionCore"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_resident(&self) -> Option<&dyn DeviceResident> {
        Some(self)
    }

    fn as_resident_mut(&mut self) -> Option<&mut dyn DeviceResident> {
        Some(self)
    }

    fn nested(&self, attribute: &str) -> Option<&dyn ModelProbe> {
        match attribute {
            "backbone" => self.backbone.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for DiffusionCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffusionCore")
            .field("device", &self.device)
            .field(
                "backbone",
                &self.backbone.as_deref().map(ModelProbe::classname),
            )
            .finish()
    }
}

/// The denylisted kind: a transformer whose runtime keeps residency under
/// its own control. Exposes no capability on purpose.
#[derive(Debug, Default)]
pub struct SealedTransformer;

impl ModelProbe for SealedTransformer {
    fn classname(&self) -> &str {
        "SealedRuntimeTransformer"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A wrapper that repacks an inner model with adapter weights.
///
/// Implements the full [`Composite`] capability without being the
/// canonical wrapper type, so classification accepts it with a warning.
pub struct AdapterBundle {
    load_device: Device,
    patch_device: Device,
    inner: Box<dyn ModelProbe>,
}

impl AdapterBundle {
    pub fn new(inner: Box<dyn ModelProbe>, load_device: Device) -> Self {
        Self {
            load_device,
            patch_device: load_device,
            inner,
        }
    }

    /// Overrides where the adapter bookkeeping currently sits.
    pub fn with_patch_device(mut self, device: Device) -> Self {
        self.patch_device = device;
        self
    }
}

impl Composite for AdapterBundle {
    fn load_device(&self) -> Device {
        self.load_device
    }

    fn current_patch_device(&self) -> Device {
        self.patch_device
    }

    fn patches_to(&mut self, target: Device) -> Result<(), RelocateError> {
        self.patch_device = target;
        Ok(())
    }

    fn inner(&self) -> &dyn ModelProbe {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn ModelProbe {
        self.inner.as_mut()
    }
}

impl ModelProbe for AdapterBundle {
    fn classname(&self) -> &str {
        "AdapterBundle"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_composite(&self) -> Option<&dyn Composite> {
        Some(self)
    }

    fn as_composite_mut(&mut self) -> Option<&mut dyn Composite> {
        Some(self)
    }

    fn nested(&self, attribute: &str) -> Option<&dyn ModelProbe> {
        match attribute {
            "model" => Some(self.inner.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AdapterBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterBundle")
            .field("load_device", &self.load_device)
            .field("patch_device", &self.patch_device)
            .field("inner", &self.inner.classname())
            .finish()
    }
}

/// A model pinned to its device: the transfer call reports success but the
/// device never changes. Exercises verification-failure reporting.
#[derive(Debug)]
pub struct PinnedModel {
    device: Device,
}

impl PinnedModel {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl DeviceResident for PinnedModel {
    fn device(&self) -> Device {
        self.device
    }

    fn to_device(&mut self, _target: Device) -> Result<(), RelocateError> {
        Ok(())
    }
}

impl ModelProbe for PinnedModel {
    fn classname(&self) -> &str {
        "PinnedModel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_resident(&self) -> Option<&dyn DeviceResident> {
        Some(self)
    }

    fn as_resident_mut(&mut self) -> Option<&mut dyn DeviceResident> {
        Some(self)
    }
}

/// A model whose transfer handle always errors.
#[derive(Debug)]
pub struct FailingModel {
    device: Device,
}

impl FailingModel {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl DeviceResident for FailingModel {
    fn device(&self) -> Device {
        self.device
    }

    fn to_device(&mut self, target: Device) -> Result<(), RelocateError> {
        Err(RelocateError::TransferFailed {
            classname: "FailingModel".to_string(),
            detail: format!("transfer link down moving to {target}"),
        })
    }
}

impl ModelProbe for FailingModel {
    fn classname(&self) -> &str {
        "FailingModel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_resident(&self) -> Option<&dyn DeviceResident> {
        Some(self)
    }

    fn as_resident_mut(&mut self) -> Option<&mut dyn DeviceResident> {
        Some(self)
    }
}

/// Bytes with no device affinity at all.
#[derive(Debug, Default)]
pub struct OpaqueBlob;

impl ModelProbe for OpaqueBlob {
    fn classname(&self) -> &str {
        "OpaqueBlob"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
