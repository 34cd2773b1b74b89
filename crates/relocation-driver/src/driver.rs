// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The relocation driver: move, re-scan, verify, report.
//!
//! The driver owns no models. It scans the candidate it is handed,
//! resolves a target per component, brackets the moves with advisory
//! housekeeping, and verifies against a *fresh* scan rather than the
//! descriptors it moved — stale descriptors are exactly how a silently
//! failed move goes unnoticed.

use crate::{ComponentOutcome, DriverError, MoveStatus, RelocationReport};
use device_core::{Device, DeviceRegistry};
use memory_housekeeping::Housekeeping;
use model_probe::{relocate_slot, scan, ModelComponent, ModelProbe};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which way a relocation round moves material.
///
/// Both directions run the same algorithm; they differ in how an `Auto`
/// target resolves and in where housekeeping is emphasised. A recall makes
/// room *before* moving; an offload additionally reclaims *after* each
/// verified move, since that move just freed device memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Move to the secondary device to free accelerator capacity.
    Offload,
    /// Move back to the primary accelerator device.
    Recall,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Offload => write!(f, "offload"),
            Direction::Recall => write!(f, "recall"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offload" => Ok(Direction::Offload),
            "recall" => Ok(Direction::Recall),
            other => Err(format!(
                "unknown direction '{other}' (expected 'offload' or 'recall')"
            )),
        }
    }
}

/// How the per-component target device is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSpec {
    /// Resolve per direction: offload lands on the registry's offload
    /// device; recall returns each component to its declared device,
    /// falling back to the registry's accelerator. A component's own
    /// offload preference is advisory and does not override the registry.
    Auto,
    /// Every component is driven to this device.
    Explicit(Device),
}

/// Drives scanned components to a target device and verifies the result.
///
/// The registry answers where `Auto` targets resolve to; the housekeeping
/// hook is asked to reclaim memory at fixed points around the moves. Both
/// are advisory collaborators — the driver never depends on housekeeping
/// freeing anything.
#[derive(Clone)]
pub struct RelocationDriver {
    registry: Arc<dyn DeviceRegistry>,
    housekeeping: Arc<dyn Housekeeping>,
}

impl RelocationDriver {
    /// Creates a driver over the given registry and housekeeping hook.
    pub fn new(registry: Arc<dyn DeviceRegistry>, housekeeping: Arc<dyn Housekeeping>) -> Self {
        Self {
            registry,
            housekeeping,
        }
    }

    /// Moves every component of `candidate` towards the offload device.
    pub fn offload(
        &self,
        candidate: &mut dyn ModelProbe,
        target: TargetSpec,
    ) -> Result<RelocationReport, DriverError> {
        self.run(candidate, target, Direction::Offload)
    }

    /// Moves every component of `candidate` back to its preferred device.
    pub fn recall(
        &self,
        candidate: &mut dyn ModelProbe,
        target: TargetSpec,
    ) -> Result<RelocationReport, DriverError> {
        self.run(candidate, target, Direction::Recall)
    }

    /// Runs one relocation round in the given direction.
    ///
    /// Steps:
    /// 1. Scan the candidate and resolve a target per component. If every
    ///    component already sits on its target, short-circuit: no move, no
    ///    housekeeping, nothing logged as moved.
    /// 2. One housekeeping round before moving (release cached device
    ///    memory, then collect), so the incoming state has room to land.
    /// 3. Move each differing component through its slot. Transfer errors
    ///    propagate; components already moved stay moved.
    /// 4. Re-scan for fresh descriptors.
    /// 5. Verify each component against its target. A mismatch is logged
    ///    and reported, never raised, and later components still verify.
    ///    In the offload direction each verified move is followed by a
    ///    second housekeeping round (collect, then release) to reclaim
    ///    what the move freed.
    pub fn run(
        &self,
        candidate: &mut dyn ModelProbe,
        target: TargetSpec,
        direction: Direction,
    ) -> Result<RelocationReport, DriverError> {
        let components = scan(&*candidate);
        if components.is_empty() {
            tracing::debug!(
                classname = candidate.classname(),
                "{direction}: no relocatable components, nothing to do",
            );
            return Ok(RelocationReport::new(direction, vec![]));
        }

        let targets: Vec<Device> = components
            .iter()
            .map(|component| self.resolve_target(component, target, direction))
            .collect();

        if components
            .iter()
            .zip(&targets)
            .all(|(component, target)| component.current_device == *target)
        {
            tracing::debug!(
                classname = candidate.classname(),
                "{direction}: all components already on target",
            );
            let outcomes = components
                .iter()
                .zip(&targets)
                .map(|(component, target)| ComponentOutcome {
                    classname: component.classname.clone(),
                    slot: component.slot,
                    from: component.current_device,
                    device: component.current_device,
                    target: *target,
                    status: MoveStatus::AlreadyResident,
                })
                .collect();
            return Ok(RelocationReport::new(direction, outcomes));
        }

        tracing::debug!("{direction}: freeing cached device memory before moving");
        self.housekeeping.release_cached();
        self.housekeeping.collect_garbage();

        let mut moved = vec![false; components.len()];
        for (index, (component, target)) in components.iter().zip(&targets).enumerate() {
            if component.current_device == *target {
                continue;
            }
            tracing::info!(
                classname = component.classname.as_str(),
                slot = %component.slot,
                "{direction}: moving from {} to {}",
                component.current_device,
                target,
            );
            relocate_slot(candidate, component.slot, *target)?;
            tracing::info!(
                classname = component.classname.as_str(),
                "{direction}: move done",
            );
            moved[index] = true;
        }

        // Verify against fresh descriptors; the ones just moved are stale.
        let fresh = scan(&*candidate);
        let mut outcomes = Vec::with_capacity(components.len());
        for ((component, target), was_moved) in components.iter().zip(&targets).zip(moved) {
            let device_now = fresh
                .iter()
                .find(|f| f.slot == component.slot)
                .map(|f| f.current_device)
                .unwrap_or(component.current_device);

            let status = if device_now == *target {
                if was_moved {
                    tracing::info!(
                        classname = component.classname.as_str(),
                        "{direction}: validated on {device_now}",
                    );
                    if direction == Direction::Offload {
                        tracing::debug!("{direction}: reclaiming memory freed by the move");
                        self.housekeeping.collect_garbage();
                        self.housekeeping.release_cached();
                    }
                    MoveStatus::Moved
                } else {
                    MoveStatus::AlreadyResident
                }
            } else {
                tracing::error!(
                    classname = component.classname.as_str(),
                    actual = %device_now,
                    expected = %target,
                    "{direction}: could not validate move",
                );
                MoveStatus::VerificationFailed
            };

            outcomes.push(ComponentOutcome {
                classname: component.classname.clone(),
                slot: component.slot,
                from: component.current_device,
                device: device_now,
                target: *target,
                status,
            });
        }

        let report = RelocationReport::new(direction, outcomes);
        tracing::info!("{}", report.summary());
        Ok(report)
    }

    fn resolve_target(
        &self,
        component: &ModelComponent,
        spec: TargetSpec,
        direction: Direction,
    ) -> Device {
        match spec {
            TargetSpec::Explicit(device) => device,
            TargetSpec::Auto => match direction {
                Direction::Offload => self.registry.offload_device(),
                Direction::Recall => component
                    .target_device
                    .unwrap_or_else(|| self.registry.accelerator()),
            },
        }
    }
}

impl fmt::Debug for RelocationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelocationDriver")
            .field("accelerator", &self.registry.accelerator())
            .field("offload_device", &self.registry.offload_device())
            .finish()
    }
}
