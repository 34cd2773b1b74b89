// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `offload-rt inspect` command: classify a model and print its components,
//! the active denylist, and the node's declared schema.

use super::{build_candidate, truncate};
use device_core::{Device, DeviceRegistry};
use model_probe::{scan, ErrorPolicy};
use placement_node::{NodeSchema, PlacementConfig, PortKind};

pub fn execute(config: &PlacementConfig, model_kind: &str) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             offload-rt · Model Inspector            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let registry = config.registry()?;
    let candidate = build_candidate(model_kind, registry.accelerator())?;
    let classifier = config.classifier();

    // ── Classification ─────────────────────────────────────────
    // Inspection never fails the call, so denylist hits report instead
    // of raising.
    let classification = classifier.classify(candidate.as_ref(), ErrorPolicy::Ignore)?;
    println!("  Model:          {} ({})", model_kind, candidate.classname());
    println!("  Classification: {classification}");
    println!();

    // ── Components ─────────────────────────────────────────────
    let components = scan(candidate.as_ref());
    if components.is_empty() {
        println!("  Components: none (nothing to relocate)");
    } else {
        println!("  Components:");
        println!(
            "   {:<16} {:<8} {:>8} {:>8} {:>8}",
            "Classname", "Slot", "Device", "Target", "Offload",
        );
        println!("   {}", "-".repeat(54));
        for component in &components {
            println!(
                "   {:<16} {:<8} {:>8} {:>8} {:>8}",
                truncate(&component.classname, 16),
                component.slot.to_string(),
                component.current_device.to_string(),
                option_device(component.target_device),
                option_device(component.offload_device),
            );
        }
    }
    println!();

    // ── Denylist ───────────────────────────────────────────────
    println!("  Denylist ({} rules):", classifier.rules().len());
    for rule in classifier.rules() {
        let path = if rule.path.is_empty() {
            "<root>".to_string()
        } else {
            rule.path.join(".")
        };
        println!(
            "   {:<16} {:<26} {}",
            path,
            rule.classname,
            truncate(&rule.reason, 48),
        );
    }
    println!();

    // ── Node Schema ────────────────────────────────────────────
    let schema = NodeSchema::for_registry(&registry);
    println!("  Node schema:");
    println!("   Inputs:");
    for input in &schema.inputs {
        let default = input
            .default
            .as_deref()
            .map(|value| format!(", default {value}"))
            .unwrap_or_default();
        println!(
            "    {:<10} {:<28} {}{}",
            input.name,
            kind_label(&input.kind),
            if input.required { "required" } else { "optional" },
            default,
        );
    }
    println!("   Outputs:");
    for output in &schema.outputs {
        println!("    {:<10} {}", output.name, kind_label(&output.kind));
    }
    println!();

    Ok(())
}

fn option_device(device: Option<Device>) -> String {
    device.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn kind_label(kind: &PortKind) -> String {
    match kind {
        PortKind::Any => "any".to_string(),
        PortKind::Boolean => "boolean".to_string(),
        PortKind::Choice(options) => options.join(" | "),
    }
}
