// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The node's declared input/output schema.
//!
//! The schema is what a graph host sees when it wires the node: port names,
//! kinds, defaults, and the choice lists for the parameter inputs. The
//! `value` and `model` ports are deliberately `Any` — the node relocates
//! whatever capabilities it finds at runtime, so connection-time typing
//! would only reject graphs that work.

use device_core::DeviceRegistry;

/// The wire type of a port.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    /// Accepts or produces any value; never rejects a connection.
    Any,
    /// A boolean toggle.
    Boolean,
    /// One of a fixed list of string options.
    Choice(Vec<String>),
}

/// One declared input.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InputPort {
    pub name: String,
    pub kind: PortKind,
    pub required: bool,
    /// Default value for optional parameter inputs, spelled the way a
    /// settings file would spell it.
    pub default: Option<String>,
    /// Whether the input reappears unchanged on the same-named output.
    pub pass_through: bool,
}

impl InputPort {
    /// Whether a value of the offered kind may be wired into this port.
    ///
    /// `Any` on either side accepts unconditionally; otherwise the kinds
    /// must match exactly.
    pub fn accepts(&self, offered: &PortKind) -> bool {
        matches!(&self.kind, PortKind::Any)
            || matches!(offered, PortKind::Any)
            || self.kind == *offered
    }
}

/// One declared output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutputPort {
    pub name: String,
    pub kind: PortKind,
}

/// The full port declaration of a placement node.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NodeSchema {
    pub inputs: Vec<InputPort>,
    pub outputs: Vec<OutputPort>,
}

impl NodeSchema {
    /// Builds the schema, enumerating the registry's devices into the
    /// `device` choice list.
    pub fn for_registry(registry: &dyn DeviceRegistry) -> Self {
        let mut device_choices = vec!["auto".to_string()];
        device_choices.extend(registry.enumerate().iter().map(|d| d.to_string()));

        let inputs = vec![
            InputPort {
                name: "value".into(),
                kind: PortKind::Any,
                required: true,
                default: None,
                pass_through: true,
            },
            InputPort {
                name: "model".into(),
                kind: PortKind::Any,
                required: false,
                default: None,
                pass_through: true,
            },
            InputPort {
                name: "device".into(),
                kind: PortKind::Choice(device_choices),
                required: false,
                default: Some("auto".into()),
                pass_through: false,
            },
            InputPort {
                name: "on_error".into(),
                kind: PortKind::Choice(vec!["ignore".into(), "raise".into()]),
                required: false,
                default: Some("raise".into()),
                pass_through: false,
            },
            InputPort {
                name: "enable".into(),
                kind: PortKind::Boolean,
                required: false,
                default: Some("true".into()),
                pass_through: false,
            },
        ];

        let outputs = vec![
            OutputPort {
                name: "value".into(),
                kind: PortKind::Any,
            },
            OutputPort {
                name: "model".into(),
                kind: PortKind::Any,
            },
        ];

        Self { inputs, outputs }
    }

    /// Looks up an input port by name.
    pub fn input(&self, name: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|port| port.name == name)
    }

    /// Looks up an output port by name.
    pub fn output(&self, name: &str) -> Option<&OutputPort> {
        self.outputs.iter().find(|port| port.name == name)
    }
}
