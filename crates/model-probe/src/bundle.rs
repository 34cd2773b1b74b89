// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The canonical composite wrapper type.
//!
//! [`PatchBundle`] is the one wrapper whose exact type identity means
//! "supported, no caveats" to the classifier. Anything else implementing
//! [`Composite`] is a derived kind and is flagged with a warning.

use crate::{Composite, ModelProbe, RelocateError};
use device_core::Device;
use std::any::Any;

/// A loaded model plus its patch bookkeeping.
///
/// The bundle records where it was configured to load
/// ([`load_device`](Composite::load_device)), where it prefers to be
/// offloaded, and where its patch bookkeeping currently sits — which can
/// drift from the load device after an offload. The wrapped inner model
/// owns the actual weights and moves through its own handle.
///
/// # Example
/// ```
/// use device_core::Device;
/// use model_probe::synthetic::TensorModel;
/// use model_probe::{Composite, PatchBundle};
///
/// let bundle = PatchBundle::new(
///     Box::new(TensorModel::new(Device::Gpu(0))),
///     Device::Gpu(0),
///     Device::Cpu,
/// );
/// assert_eq!(bundle.current_patch_device(), Device::Gpu(0));
/// ```
pub struct PatchBundle {
    load_device: Device,
    offload_device: Option<Device>,
    patch_device: Device,
    inner: Box<dyn ModelProbe>,
}

impl PatchBundle {
    /// Wraps `inner` with patch bookkeeping starting on `load_device`.
    pub fn new(inner: Box<dyn ModelProbe>, load_device: Device, offload_device: Device) -> Self {
        Self {
            load_device,
            offload_device: Some(offload_device),
            patch_device: load_device,
            inner,
        }
    }

    /// Overrides where the patch bookkeeping currently sits.
    ///
    /// Models restored from an offloaded state start with their patches
    /// away from the load device.
    pub fn with_patch_device(mut self, device: Device) -> Self {
        self.patch_device = device;
        self
    }
}

impl Composite for PatchBundle {
    fn load_device(&self) -> Device {
        self.load_device
    }

    fn current_patch_device(&self) -> Device {
        self.patch_device
    }

    fn offload_device(&self) -> Option<Device> {
        self.offload_device
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

impl ModelProbe for PatchBundle {
    fn classname(&self) -> &str {
        "PatchBundle"
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

impl std::fmt::Debug for PatchBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchBundle")
            .field("load_device", &self.load_device)
            .field("offload_device", &self.offload_device)
            .field("patch_device", &self.patch_device)
            .field("inner", &self.inner.classname())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::TensorModel;

    fn bundle() -> PatchBundle {
        PatchBundle::new(
            Box::new(TensorModel::new(Device::Gpu(0))),
            Device::Gpu(0),
            Device::Cpu,
        )
    }

    #[test]
    fn test_patches_start_on_load_device() {
        let bundle = bundle();
        assert_eq!(bundle.current_patch_device(), Device::Gpu(0));
        assert_eq!(bundle.load_device(), Device::Gpu(0));
        assert_eq!(bundle.offload_device(), Some(Device::Cpu));
    }

    #[test]
    fn test_patches_to_moves_bookkeeping_only() {
        let mut bundle = bundle();
        bundle.patches_to(Device::Cpu).unwrap();
        assert_eq!(bundle.current_patch_device(), Device::Cpu);
        // The inner model has not moved.
        let inner = bundle.inner().as_resident().unwrap();
        assert_eq!(inner.device(), Device::Gpu(0));
    }

    #[test]
    fn test_with_patch_device() {
        let bundle = bundle().with_patch_device(Device::Cpu);
        assert_eq!(bundle.current_patch_device(), Device::Cpu);
        assert_eq!(bundle.load_device(), Device::Gpu(0));
    }

    #[test]
    fn test_nested_exposes_inner_as_model() {
        let bundle = bundle();
        let nested = bundle.nested("model").unwrap();
        assert_eq!(nested.classname(), "TensorModel");
        assert!(bundle.nested("backbone").is_none());
    }

    #[test]
    fn test_exact_type_identity() {
        let bundle = bundle();
        let probe: &dyn ModelProbe = &bundle;
        assert!(probe.as_any().is::<PatchBundle>());
    }
}
