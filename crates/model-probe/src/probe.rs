// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The capability traits that make an opaque object probeable.
//!
//! A host hands the pipeline a `&mut dyn ModelProbe` and nothing else. What
//! the object *is* stays unknown; what it *can do* is answered through the
//! optional-capability accessors here, which default to "no". Implementors
//! opt in by overriding the accessor and returning `self`.

use crate::RelocateError;
use device_core::Device;
use std::any::Any;

/// The minimum capability set of a relocatable model: it knows where it
/// lives and can move its materialised state somewhere else.
pub trait DeviceResident {
    /// The device currently holding this model's state.
    fn device(&self) -> Device;

    /// The device this model prefers when offloaded, if it declares one.
    fn offload_device(&self) -> Option<Device> {
        None
    }

    /// Moves the model's materialised state to `target`.
    ///
    /// Synchronous and blocking; on success a subsequent
    /// [`device`](Self::device) call reads `target`.
    fn to_device(&mut self, target: Device) -> Result<(), RelocateError>;
}

/// The composite-wrapper capability: load/patch bookkeeping kept separate
/// from the tensor-holding inner model.
///
/// Moving a wrapper is a two-part job. [`patches_to`](Self::patches_to)
/// relocates only the patch bookkeeping; the inner model's weights move
/// through its own [`DeviceResident`] handle. Both must reach the target
/// for residency checks to read consistent state.
pub trait Composite {
    /// The device this wrapper was configured to load onto.
    fn load_device(&self) -> Device;

    /// The device the patch bookkeeping currently occupies. Read live,
    /// never cached.
    fn current_patch_device(&self) -> Device;

    /// The device this wrapper prefers when offloaded, if it declares one.
    fn offload_device(&self) -> Option<Device> {
        None
    }

    /// Moves the patch bookkeeping to `target`. Does not touch the inner
    /// model's weights.
    fn patches_to(&mut self, target: Device) -> Result<(), RelocateError>;

    /// The embedded inner model.
    fn inner(&self) -> &dyn ModelProbe;

    /// The embedded inner model, mutably.
    fn inner_mut(&mut self) -> &mut dyn ModelProbe;
}

/// An opaque candidate object, probeable for capabilities and nested models.
///
/// Every accessor defaults to "capability absent"; a concrete model
/// overrides the ones it supports. [`as_any`](Self::as_any) gives
/// classification exact type identity, which is how the canonical wrapper
/// type is told apart from derived kinds implementing the same traits.
pub trait ModelProbe: Any {
    /// The concrete kind's name. Diagnostics and denylist matching only —
    /// never used to dispatch behaviour.
    fn classname(&self) -> &str;

    /// Type-identity handle for exact-match checks.
    fn as_any(&self) -> &dyn Any;

    /// This object's simple-model capability, if it has one.
    fn as_resident(&self) -> Option<&dyn DeviceResident> {
        None
    }

    /// Mutable variant of [`as_resident`](Self::as_resident).
    fn as_resident_mut(&mut self) -> Option<&mut dyn DeviceResident> {
        None
    }

    /// This object's wrapper capability, if it has one.
    fn as_composite(&self) -> Option<&dyn Composite> {
        None
    }

    /// Mutable variant of [`as_composite`](Self::as_composite).
    fn as_composite_mut(&mut self) -> Option<&mut dyn Composite> {
        None
    }

    /// Follows a named attribute to a nested model, if present.
    ///
    /// Drives denylist path walking; a name the object does not carry
    /// returns `None`, which callers treat as "path not matched".
    fn nested(&self, _attribute: &str) -> Option<&dyn ModelProbe> {
        None
    }
}
