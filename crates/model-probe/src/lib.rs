// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-probe
//!
//! Structural probing of arbitrary model objects: deciding whether a
//! candidate of unknown concrete type can be relocated between devices, and
//! enumerating the independently-movable pieces inside it.
//!
//! Candidates are not looked up in a type registry. Instead they expose a
//! small capability set through the [`ModelProbe`] trait:
//!
//! - [`DeviceResident`] — the minimum capability: a current device and a
//!   transfer operation. Anything exposing it is treated as a simple model.
//! - [`Composite`] — the wrapper capability: separate load/patch bookkeeping
//!   around an embedded inner model. [`PatchBundle`] is the canonical
//!   wrapper type; other implementors are derived kinds and classification
//!   flags them.
//!
//! # Key Components
//!
//! - [`Classifier`] — gates candidates in fixed order: denylist, exact
//!   wrapper type, derived wrapper, simple model, incompatible. The
//!   denylist is an injectable table of [`DenyRule`]s walked by attribute
//!   path.
//! - [`scan`] — turns an accepted candidate into transient
//!   [`ModelComponent`] descriptors, one per movable [`Slot`].
//! - [`relocate_slot`] — dispatches the correct transfer call for a slot.
//! - [`synthetic`] — concrete model shapes for demos and tests.
//!
//! # Example
//! ```
//! use device_core::Device;
//! use model_probe::{scan, Classifier, ErrorPolicy};
//! use model_probe::synthetic::TensorModel;
//!
//! let model = TensorModel::new(Device::Gpu(0));
//! let classification = Classifier::default()
//!     .classify(&model, ErrorPolicy::Raise)
//!     .unwrap();
//! assert!(classification.is_relocatable());
//!
//! let components = scan(&model);
//! assert_eq!(components.len(), 1);
//! assert_eq!(components[0].current_device, Device::Gpu(0));
//! ```

mod bundle;
mod classify;
mod error;
mod probe;
mod scan;
pub mod synthetic;

pub use bundle::PatchBundle;
pub use classify::{default_deny_rules, Classification, Classifier, DenyRule, ErrorPolicy};
pub use error::{ClassifyError, RelocateError};
pub use probe::{Composite, DeviceResident, ModelProbe};
pub use scan::{relocate_slot, scan, ModelComponent, Slot};
