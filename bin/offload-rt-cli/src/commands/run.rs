// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `offload-rt run` command: drive a synthetic model through relocation.
//!
//! A round-trip demonstrates the full pipeline:
//! ```text
//! classify → scan → offload → verify  then  classify → scan → recall → verify
//! ```

use super::{build_candidate, truncate};
use device_core::DeviceRegistry;
use memory_housekeeping::{HostMemory, SoftCache};
use model_probe::ErrorPolicy;
use placement_node::{DeviceChoice, NodeSettings, PlacementConfig, PlacementNode, RouteOutcome};
use relocation_driver::Direction;
use std::sync::Arc;

pub fn execute(
    config: &PlacementConfig,
    direction: &str,
    model_kind: &str,
    device: Option<String>,
    on_error: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let rounds: Vec<Direction> = match direction {
        "offload" => vec![Direction::Offload],
        "recall" => vec![Direction::Recall],
        "round-trip" => vec![Direction::Offload, Direction::Recall],
        other => anyhow::bail!(
            "unknown direction '{other}' (expected offload, recall, or round-trip)"
        ),
    };

    // CLI flags override the config's default settings.
    let settings = NodeSettings {
        device: match device {
            Some(raw) => raw.parse::<DeviceChoice>()?,
            None => config.settings.device,
        },
        on_error: match on_error {
            Some(raw) => raw.parse::<ErrorPolicy>().map_err(anyhow::Error::msg)?,
            None => config.settings.on_error,
        },
        enable: config.settings.enable,
    };

    let registry: Arc<dyn DeviceRegistry> = Arc::new(config.registry()?);
    let cache = SoftCache::new();
    // Scratch buffers stand in for transfer staging, so the housekeeping
    // rounds have something observable to drop.
    for bytes in [1 << 20, 2 << 20, 4 << 20] {
        cache.retain(vec![0u8; bytes]);
    }

    let mut candidate = build_candidate(model_kind, registry.accelerator())?;

    if !json {
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║            offload-rt · Relocation Runner           ║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        println!("  Config:");
        println!("   Model:     {} ({})", model_kind, candidate.classname());
        println!("   Direction: {direction}");
        println!("   Device:    {}", settings.device);
        println!("   On error:  {}", settings.on_error);
        if let Ok(memory) = HostMemory::read() {
            println!("   {}", memory.summary());
        }
        println!();
    }

    let mut records = Vec::new();
    let total = rounds.len();
    for (step, round) in rounds.into_iter().enumerate() {
        let node = match round {
            Direction::Offload => {
                PlacementNode::offload(Arc::clone(&registry), Arc::new(cache.clone()))
            }
            Direction::Recall => {
                PlacementNode::recall(Arc::clone(&registry), Arc::new(cache.clone()))
            }
        }
        .with_classifier(config.classifier());

        if !json {
            println!("  [{}/{}] {} round...", step + 1, total, heading(round));
        }

        let routed = node.route("payload", Some(candidate.as_mut()), &settings)?;

        if !json {
            render_outcome(&routed.outcome);
            println!();
        }
        records.push(serde_json::json!({
            "direction": round,
            "outcome": routed.outcome,
        }));
    }

    if json {
        let doc = serde_json::json!({
            "model": model_kind,
            "classname": candidate.classname(),
            "rounds": records,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("  {}", cache.stats().summary());
    if let Ok(memory) = HostMemory::read() {
        println!("  {}", memory.summary());
    }
    println!();
    Ok(())
}

fn heading(direction: Direction) -> &'static str {
    match direction {
        Direction::Offload => "Offload",
        Direction::Recall => "Recall",
    }
}

fn render_outcome(outcome: &RouteOutcome) {
    match outcome {
        RouteOutcome::Disabled => println!("        Node disabled; inputs passed through."),
        RouteOutcome::NoModel => println!("        No model wired; nothing to do."),
        RouteOutcome::Skipped { classification } => {
            println!("        Skipped: {classification}");
        }
        RouteOutcome::Completed { report } => {
            println!(
                "        {:<16} {:<8} {:>8} {:>8} {:>8}  {}",
                "Classname", "Slot", "From", "Now", "Target", "Status",
            );
            println!("        {}", "-".repeat(62));
            for component in &report.outcomes {
                println!(
                    "        {:<16} {:<8} {:>8} {:>8} {:>8}  {}",
                    truncate(&component.classname, 16),
                    component.slot.to_string(),
                    component.from.to_string(),
                    component.device.to_string(),
                    component.target.to_string(),
                    component.status,
                );
            }
            println!();
            println!("        {}", report.summary());
        }
    }
}
