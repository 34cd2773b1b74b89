// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`DeviceRegistry`] trait and the configuration-backed
//! [`StaticRegistry`] implementation.

use crate::{Device, DeviceError};

/// Resolves the devices a host offers to the relocation pipeline.
///
/// The registry answers three questions: where models are recalled to by
/// default ([`accelerator`](DeviceRegistry::accelerator)), where they are
/// offloaded to by default ([`offload_device`](DeviceRegistry::offload_device)),
/// and which devices a selection UI should offer
/// ([`enumerate`](DeviceRegistry::enumerate)).
///
/// Implementations are purely informational — they never move data and
/// never touch the models themselves.
pub trait DeviceRegistry: Send + Sync {
    /// The default accelerator device, used as the recall target when a
    /// component declares no preferred device of its own.
    fn accelerator(&self) -> Device;

    /// The configured secondary device that offloaded models land on.
    fn offload_device(&self) -> Device;

    /// Every device this host offers for explicit selection.
    fn enumerate(&self) -> Vec<Device>;

    /// Resolves a raw device name into a handle.
    fn parse(&self, name: &str) -> Result<Device, DeviceError> {
        Device::parse(name)
    }
}

/// A registry built from configuration instead of hardware discovery.
///
/// Suits hosts where the device topology is known up front (one accelerator,
/// host-memory offload) and tests that need a deterministic device list.
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    accelerator: Device,
    offload: Device,
    gpu_count: u16,
}

impl StaticRegistry {
    /// Creates a registry with the given accelerator and offload devices.
    ///
    /// The enumerated GPU count is derived from the accelerator index;
    /// override it with [`with_gpu_count`](Self::with_gpu_count) when the
    /// host has more devices than the default accelerator implies.
    pub fn new(accelerator: Device, offload: Device) -> Self {
        let gpu_count = match accelerator {
            Device::Cpu => 0,
            Device::Gpu(index) => index + 1,
        };
        Self {
            accelerator,
            offload,
            gpu_count,
        }
    }

    /// Overrides the number of GPUs offered by [`enumerate`](DeviceRegistry::enumerate).
    pub fn with_gpu_count(mut self, gpu_count: u16) -> Self {
        self.gpu_count = gpu_count;
        self
    }

    /// A registry for hosts without any accelerator.
    pub fn host_only() -> Self {
        Self::new(Device::Cpu, Device::Cpu)
    }
}

impl Default for StaticRegistry {
    fn default() -> Self {
        Self::new(Device::Gpu(0), Device::Cpu)
    }
}

impl DeviceRegistry for StaticRegistry {
    fn accelerator(&self) -> Device {
        self.accelerator
    }

    fn offload_device(&self) -> Device {
        self.offload
    }

    fn enumerate(&self) -> Vec<Device> {
        let mut devices = vec![Device::Cpu];
        devices.extend((0..self.gpu_count).map(Device::Gpu));
        devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = StaticRegistry::default();
        assert_eq!(registry.accelerator(), Device::Gpu(0));
        assert_eq!(registry.offload_device(), Device::Cpu);
        assert_eq!(registry.enumerate(), vec![Device::Cpu, Device::Gpu(0)]);
    }

    #[test]
    fn test_gpu_count_derived_from_accelerator() {
        let registry = StaticRegistry::new(Device::Gpu(1), Device::Cpu);
        assert_eq!(
            registry.enumerate(),
            vec![Device::Cpu, Device::Gpu(0), Device::Gpu(1)]
        );
    }

    #[test]
    fn test_gpu_count_override() {
        let registry = StaticRegistry::default().with_gpu_count(3);
        assert_eq!(registry.enumerate().len(), 4); // cpu + 3 gpus
    }

    #[test]
    fn test_host_only() {
        let registry = StaticRegistry::host_only();
        assert_eq!(registry.accelerator(), Device::Cpu);
        assert_eq!(registry.enumerate(), vec![Device::Cpu]);
    }

    #[test]
    fn test_parse_through_registry() {
        let registry = StaticRegistry::default();
        assert_eq!(registry.parse("cuda:0").unwrap(), Device::Gpu(0));
        assert!(registry.parse("npu").is_err());
    }
}
