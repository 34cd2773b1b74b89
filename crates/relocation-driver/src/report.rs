// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-component outcomes and the batch report.
//!
//! A [`RelocationReport`] is the contract between the driver and its
//! callers: one [`ComponentOutcome`] per scanned component, plus an
//! aggregate [`BatchStatus`]. A partial failure is a report, never an
//! exception, so callers can pass their outputs through regardless of how
//! many components verified.

use crate::Direction;
use device_core::Device;
use model_probe::Slot;

/// What happened to one component during a relocation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    /// Moved and verified on the target device.
    Moved,
    /// Was already on the target device; no relocation call was made.
    AlreadyResident,
    /// The post-move re-scan read a device other than the target.
    VerificationFailed,
}

impl std::fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveStatus::Moved => write!(f, "moved"),
            MoveStatus::AlreadyResident => write!(f, "already resident"),
            MoveStatus::VerificationFailed => write!(f, "verification failed"),
        }
    }
}

/// The outcome for a single scanned component.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ComponentOutcome {
    /// Concrete kind, for diagnostics only.
    pub classname: String,
    /// Which movable unit of the candidate this covers.
    pub slot: Slot,
    /// Where the component sat when the round started.
    pub from: Device,
    /// Where the post-move re-scan found it.
    pub device: Device,
    /// The resolved target it was driven towards.
    pub target: Device,
    /// How the round ended for this component.
    pub status: MoveStatus,
}

/// Aggregate result of one relocation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every component that needed moving arrived and verified.
    Success,
    /// Nothing needed moving (or there was nothing to move at all).
    NoOp,
    /// Some components verified, some did not.
    Partial,
    /// Every component failed verification.
    Failed,
}

impl BatchStatus {
    fn aggregate(outcomes: &[ComponentOutcome]) -> Self {
        if outcomes.is_empty() {
            return BatchStatus::NoOp;
        }
        let failed = outcomes
            .iter()
            .filter(|o| o.status == MoveStatus::VerificationFailed)
            .count();
        let moved = outcomes
            .iter()
            .filter(|o| o.status == MoveStatus::Moved)
            .count();
        if failed == 0 {
            if moved == 0 {
                BatchStatus::NoOp
            } else {
                BatchStatus::Success
            }
        } else if failed == outcomes.len() {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchStatus::Success => write!(f, "success"),
            BatchStatus::NoOp => write!(f, "no-op"),
            BatchStatus::Partial => write!(f, "partial"),
            BatchStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The complete report for one relocation round.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RelocationReport {
    /// Which direction the round ran in.
    pub direction: Direction,
    /// One outcome per scanned component, in scan order.
    pub outcomes: Vec<ComponentOutcome>,
    /// Aggregate status derived from the outcomes.
    pub status: BatchStatus,
}

impl RelocationReport {
    pub(crate) fn new(direction: Direction, outcomes: Vec<ComponentOutcome>) -> Self {
        let status = BatchStatus::aggregate(&outcomes);
        Self {
            direction,
            outcomes,
            status,
        }
    }

    /// Total number of components covered by this round.
    pub fn num_components(&self) -> usize {
        self.outcomes.len()
    }

    /// Components that moved and verified.
    pub fn num_moved(&self) -> usize {
        self.count(MoveStatus::Moved)
    }

    /// Components that were already on their target.
    pub fn num_already_resident(&self) -> usize {
        self.count(MoveStatus::AlreadyResident)
    }

    /// Components that failed the post-move verification.
    pub fn num_failed(&self) -> usize {
        self.count(MoveStatus::VerificationFailed)
    }

    /// `true` if nothing needed moving.
    pub fn is_no_op(&self) -> bool {
        self.status == BatchStatus::NoOp
    }

    fn count(&self, status: MoveStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Relocation '{}': {} components ({} moved, {} already resident, \
             {} failed verification), status: {}",
            self.direction,
            self.num_components(),
            self.num_moved(),
            self.num_already_resident(),
            self.num_failed(),
            self.status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: MoveStatus) -> ComponentOutcome {
        ComponentOutcome {
            classname: "TensorModel".into(),
            slot: Slot::Direct,
            from: Device::Gpu(0),
            device: match status {
                MoveStatus::VerificationFailed => Device::Gpu(0),
                _ => Device::Cpu,
            },
            target: Device::Cpu,
            status,
        }
    }

    #[test]
    fn test_empty_round_is_no_op() {
        let report = RelocationReport::new(Direction::Offload, vec![]);
        assert_eq!(report.status, BatchStatus::NoOp);
        assert!(report.is_no_op());
        assert_eq!(report.num_components(), 0);
    }

    #[test]
    fn test_all_resident_is_no_op() {
        let report = RelocationReport::new(
            Direction::Recall,
            vec![
                outcome(MoveStatus::AlreadyResident),
                outcome(MoveStatus::AlreadyResident),
            ],
        );
        assert_eq!(report.status, BatchStatus::NoOp);
    }

    #[test]
    fn test_all_moved_is_success() {
        let report = RelocationReport::new(
            Direction::Offload,
            vec![outcome(MoveStatus::Moved), outcome(MoveStatus::AlreadyResident)],
        );
        assert_eq!(report.status, BatchStatus::Success);
        assert_eq!(report.num_moved(), 1);
        assert_eq!(report.num_already_resident(), 1);
    }

    #[test]
    fn test_mixed_is_partial() {
        let report = RelocationReport::new(
            Direction::Offload,
            vec![
                outcome(MoveStatus::Moved),
                outcome(MoveStatus::VerificationFailed),
            ],
        );
        assert_eq!(report.status, BatchStatus::Partial);
        assert_eq!(report.num_failed(), 1);
    }

    #[test]
    fn test_resident_plus_failure_is_partial() {
        let report = RelocationReport::new(
            Direction::Offload,
            vec![
                outcome(MoveStatus::AlreadyResident),
                outcome(MoveStatus::VerificationFailed),
            ],
        );
        assert_eq!(report.status, BatchStatus::Partial);
    }

    #[test]
    fn test_all_failed_is_failed() {
        let report = RelocationReport::new(
            Direction::Offload,
            vec![outcome(MoveStatus::VerificationFailed)],
        );
        assert_eq!(report.status, BatchStatus::Failed);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let report = RelocationReport::new(
            Direction::Offload,
            vec![
                outcome(MoveStatus::Moved),
                outcome(MoveStatus::VerificationFailed),
            ],
        );
        let summary = report.summary();
        assert!(summary.contains("'offload'"));
        assert!(summary.contains("2 components"));
        assert!(summary.contains("1 moved"));
        assert!(summary.contains("1 failed verification"));
        assert!(summary.contains("status: partial"));
    }

    #[test]
    fn test_report_serialises_with_device_names() {
        let report =
            RelocationReport::new(Direction::Recall, vec![outcome(MoveStatus::Moved)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["direction"], "recall");
        assert_eq!(json["status"], "success");
        assert_eq!(json["outcomes"][0]["from"], "gpu:0");
        assert_eq!(json["outcomes"][0]["status"], "moved");
    }
}
