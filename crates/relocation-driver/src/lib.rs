// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # relocation-driver
//!
//! The driver that moves scanned model components onto a target device and
//! verifies they arrived.
//!
//! ```text
//! scan ── resolve targets ──┬─ all resident ─────────────▶ NoOp report
//!                           └─ housekeeping ─▶ move ─▶ re-scan ─▶ verify
//!                                                                  │
//!                                              per-component report ▼
//! ```
//!
//! One algorithm serves both directions: **offload** (move to the secondary
//! device, reclaiming accelerator memory after each verified move) and
//! **recall** (move back to the accelerator, making room beforehand). The
//! difference is the [`TargetSpec`] resolution and which housekeeping round
//! each [`Direction`] emphasises.
//!
//! Verification is reported, not raised: a component that fails to arrive
//! is logged and marked in the [`RelocationReport`], and the driver carries
//! on with the remaining components. Components already moved stay moved.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use device_core::{Device, StaticRegistry};
//! use memory_housekeeping::NoopHousekeeping;
//! use model_probe::{synthetic::TensorModel, DeviceResident};
//! use relocation_driver::{BatchStatus, RelocationDriver, TargetSpec};
//!
//! let driver = RelocationDriver::new(
//!     Arc::new(StaticRegistry::default()),
//!     Arc::new(NoopHousekeeping),
//! );
//!
//! let mut model = TensorModel::new(Device::Gpu(0));
//! let report = driver.offload(&mut model, TargetSpec::Auto).unwrap();
//! assert_eq!(report.status, BatchStatus::Success);
//! assert_eq!(model.device(), Device::Cpu);
//!
//! // Same target again: nothing moves, nothing fails.
//! let report = driver.offload(&mut model, TargetSpec::Auto).unwrap();
//! assert_eq!(report.status, BatchStatus::NoOp);
//! ```

mod driver;
mod error;
mod report;

pub use driver::{Direction, RelocationDriver, TargetSpec};
pub use error::DriverError;
pub use report::{BatchStatus, ComponentOutcome, MoveStatus, RelocationReport};
