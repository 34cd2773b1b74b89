// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # placement-node
//!
//! The host-facing node contract around the relocation pipeline.
//!
//! A [`PlacementNode`] sits in a processing graph between a producer and a
//! consumer. It declares a [`NodeSchema`] (what can be wired in), accepts
//! per-call [`NodeSettings`] (device choice, error policy, enable toggle),
//! and exposes one entry point, [`route`](PlacementNode::route), which
//! passes its `value` and `model` inputs through while relocating the model
//! in the node's direction.
//!
//! Hosts configure the surrounding machinery — device registry, default
//! settings, extra denylist rules — through [`PlacementConfig`], loaded
//! from TOML.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use device_core::{Device, StaticRegistry};
//! use memory_housekeeping::NoopHousekeeping;
//! use model_probe::synthetic::TensorModel;
//! use placement_node::{NodeSettings, PlacementNode, RouteOutcome};
//!
//! let node = PlacementNode::offload(
//!     Arc::new(StaticRegistry::default()),
//!     Arc::new(NoopHousekeeping),
//! );
//!
//! let mut model = TensorModel::new(Device::Gpu(0));
//! let routed = node
//!     .route("latents", Some(&mut model), &NodeSettings::default())
//!     .unwrap();
//!
//! // The value passed through; the model moved to the offload device.
//! assert_eq!(routed.value, "latents");
//! match routed.outcome {
//!     RouteOutcome::Completed { report } => assert_eq!(report.num_moved(), 1),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

mod config;
mod error;
mod node;
mod schema;
mod settings;

pub use config::PlacementConfig;
pub use error::NodeError;
pub use node::{PlacementNode, RouteOutcome, Routed};
pub use schema::{InputPort, NodeSchema, OutputPort, PortKind};
pub use settings::{DeviceChoice, NodeSettings};
