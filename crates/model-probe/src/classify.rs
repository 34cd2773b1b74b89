// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The model classifier: gates candidates before any scan or move.
//!
//! Classification runs a fixed sequence of checks and stops at the first
//! hit:
//!
//! 1. Denylist — ordered [`DenyRule`]s walked by attribute path. A match
//!    means the model manages device residency inside its own loader and
//!    an external move would corrupt it.
//! 2. Exact wrapper type — the candidate *is* a
//!    [`PatchBundle`](crate::PatchBundle).
//! 3. Derived wrapper — implements [`Composite`](crate::Composite) without
//!    being the canonical type. Accepted, but flagged.
//! 4. Simple model — exposes [`DeviceResident`](crate::DeviceResident).
//! 5. Otherwise the candidate is incompatible, which is a warning and
//!    "nothing to do", never a failure.

use crate::{ClassifyError, ModelProbe, PatchBundle};
use std::fmt;
use std::str::FromStr;

/// The outcome of classifying one candidate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The canonical wrapper type or a capable simple model.
    Supported,
    /// A derived wrapper kind: accepted, behaviour unverified.
    SupportedWithWarning { classname: String },
    /// Denylisted, with the rule's reason.
    Unsupported { reason: String },
    /// Lacks the minimum capability set.
    Incompatible,
}

impl Classification {
    /// Whether a scan and relocation should proceed.
    pub fn is_relocatable(&self) -> bool {
        matches!(
            self,
            Classification::Supported | Classification::SupportedWithWarning { .. }
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Supported => write!(f, "supported"),
            Classification::SupportedWithWarning { classname } => {
                write!(f, "supported with warning ({classname})")
            }
            Classification::Unsupported { reason } => write!(f, "unsupported: {reason}"),
            Classification::Incompatible => write!(f, "incompatible"),
        }
    }
}

/// What a denylist hit does to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Return the `Unsupported` result; the caller skips and passes
    /// inputs through.
    Ignore,
    /// Fail the call with [`ClassifyError::Denylisted`].
    #[default]
    Raise,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Ignore => write!(f, "ignore"),
            ErrorPolicy::Raise => write!(f, "raise"),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(ErrorPolicy::Ignore),
            "raise" => Ok(ErrorPolicy::Raise),
            other => Err(format!(
                "unknown error policy '{other}' (expected 'ignore' or 'raise')"
            )),
        }
    }
}

/// One denylist entry: an attribute path and the class name that, found at
/// its end, marks the candidate unsupported.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DenyRule {
    /// Attribute names walked from the candidate via
    /// [`ModelProbe::nested`].
    pub path: Vec<String>,
    /// Class name the terminal object must report for the rule to match.
    pub classname: String,
    /// Human-readable reason surfaced to the caller.
    pub reason: String,
}

impl DenyRule {
    /// Whether this rule matches `candidate`.
    ///
    /// A missing attribute anywhere along the path means "not matched",
    /// never an error.
    pub fn matches(&self, candidate: &dyn ModelProbe) -> bool {
        let mut cursor = candidate;
        for attribute in &self.path {
            match cursor.nested(attribute) {
                Some(next) => cursor = next,
                None => return false,
            }
        }
        cursor.classname() == self.classname
    }
}

/// The built-in denylist.
///
/// Sealed-runtime transformers keep their weights under the control of
/// their own loader; both the wrapped and the bare attribute paths are
/// covered so the rule fires whether or not the model arrives inside a
/// wrapper.
pub fn default_deny_rules() -> Vec<DenyRule> {
    let reason = "the sealed runtime manages device residency itself; \
                  disable this node and use the loader's offload toggle instead"
        .to_string();
    vec![
        DenyRule {
            path: vec!["model".into(), "backbone".into()],
            classname: "SealedRuntimeTransformer".into(),
            reason: reason.clone(),
        },
        DenyRule {
            path: vec!["backbone".into()],
            classname: "SealedRuntimeTransformer".into(),
            reason,
        },
    ]
}

/// Classifies candidates against an injectable denylist.
///
/// Rules are evaluated in order; the first match wins. The default
/// classifier carries [`default_deny_rules`]; hosts append their own with
/// [`with_rules`](Classifier::with_rules).
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<DenyRule>,
}

impl Classifier {
    /// Creates a classifier with exactly the given rules.
    pub fn new(rules: Vec<DenyRule>) -> Self {
        Self { rules }
    }

    /// Appends rules after the existing ones.
    pub fn with_rules(mut self, extra: impl IntoIterator<Item = DenyRule>) -> Self {
        self.rules.extend(extra);
        self
    }

    /// The active denylist, in evaluation order.
    pub fn rules(&self) -> &[DenyRule] {
        &self.rules
    }

    /// Classifies `candidate`, honouring `on_error` for denylist hits.
    ///
    /// Always returns a tagged result; the only error path is a denylist
    /// match under [`ErrorPolicy::Raise`]. Incompatible candidates warn
    /// and return — they never fail the call.
    pub fn classify(
        &self,
        candidate: &dyn ModelProbe,
        on_error: ErrorPolicy,
    ) -> Result<Classification, ClassifyError> {
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(candidate)) {
            tracing::error!(
                classname = candidate.classname(),
                denied = rule.classname.as_str(),
                "unsupported model kind: {}",
                rule.reason,
            );
            return match on_error {
                ErrorPolicy::Raise => Err(ClassifyError::Denylisted {
                    classname: candidate.classname().to_string(),
                    reason: rule.reason.clone(),
                }),
                ErrorPolicy::Ignore => Ok(Classification::Unsupported {
                    reason: rule.reason.clone(),
                }),
            };
        }

        if candidate.as_any().is::<PatchBundle>() {
            return Ok(Classification::Supported);
        }

        if candidate.as_composite().is_some() {
            tracing::info!(
                classname = candidate.classname(),
                "derived wrapper kind; relocation behaviour not verified",
            );
            return Ok(Classification::SupportedWithWarning {
                classname: candidate.classname().to_string(),
            });
        }

        if candidate.as_resident().is_some() {
            tracing::info!(
                classname = candidate.classname(),
                "simple model with device and transfer capability",
            );
            return Ok(Classification::Supported);
        }

        tracing::warn!(
            classname = candidate.classname(),
            "no relocation capability; nothing to move",
        );
        Ok(Classification::Incompatible)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_deny_rules())
    }
}
