// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # device-core
//!
//! Compute-device handles for the relocation pipeline.
//!
//! A [`Device`] is an opaque identifier for a compute location: the host
//! (`cpu`) or an indexed accelerator (`gpu:0`, `gpu:1`, ...). Devices are
//! value types compared for equality only — the relocation protocol never
//! orders them, and never relies on referential identity.
//!
//! The [`DeviceRegistry`] trait is the seam through which the rest of the
//! workspace learns which devices exist on a host: the default accelerator,
//! the configured offload target, and the list of devices offered in
//! selection UIs. [`StaticRegistry`] is the provided implementation, built
//! from configuration rather than hardware discovery.
//!
//! # Example
//! ```
//! use device_core::{Device, DeviceRegistry, StaticRegistry};
//!
//! let registry = StaticRegistry::default();
//! assert_eq!(registry.accelerator(), Device::Gpu(0));
//! assert_eq!(registry.offload_device(), Device::Cpu);
//!
//! // Raw names normalise to the same handle.
//! assert_eq!(Device::parse("CUDA:0").unwrap(), Device::Gpu(0));
//! assert_eq!(Device::parse("cpu").unwrap(), Device::Cpu);
//! ```

mod device;
mod error;
mod registry;

pub use device::Device;
pub use error::DeviceError;
pub use registry::{DeviceRegistry, StaticRegistry};
