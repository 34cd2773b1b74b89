// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `offload-rt status` command: display the configured device topology and
//! the host memory an offload would land in.
//!
//! Memory readings come from `/proc/meminfo`; on non-Linux hosts the
//! section degrades to a notice and the command still works.

use device_core::DeviceRegistry;
use memory_housekeeping::HostMemory;
use placement_node::PlacementConfig;

pub fn execute(config: &PlacementConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              offload-rt · Host Status               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let registry = config.registry()?;

    // ── Devices ────────────────────────────────────────────────
    println!("  Devices");
    println!("   Accelerator:  {}", registry.accelerator());
    println!("   Offload to:   {}", registry.offload_device());
    let names: Vec<String> = registry
        .enumerate()
        .iter()
        .map(|device| device.to_string())
        .collect();
    println!("   Available:    {}", names.join(", "));
    println!();

    // ── Host Memory ────────────────────────────────────────────
    println!("  Host memory");
    match HostMemory::read() {
        Ok(memory) => {
            let total = memory.total_mb();
            let avail = memory.available_mb();
            let used = total - avail;
            let pct = memory.utilisation() * 100.0;
            let bar = usage_bar(memory.utilisation());
            println!("   Total:        {total} MB");
            println!("   Available:    {avail} MB");
            println!("   Used:         {used} MB ({pct:.1}%)  {bar}");
            println!("   Page cache:   {} MB", memory.cached_bytes / (1024 * 1024));

            let headroom = (memory.available_bytes as f64 * 0.75) as u64 / (1024 * 1024);
            println!("   Offload headroom: ~{headroom} MB (75% of available)");
        }
        Err(e) => {
            println!("   Unavailable: {e}");
        }
    }
    println!();

    // ── Defaults ───────────────────────────────────────────────
    println!("  Defaults");
    println!("   Device:       {}", config.settings.device);
    println!("   On error:     {}", config.settings.on_error);
    println!("   Enabled:      {}", config.settings.enable);
    println!(
        "   Deny rules:   {} built-in + {} from config",
        model_probe::default_deny_rules().len(),
        config.deny_rules.len(),
    );
    println!();

    Ok(())
}

/// Creates a visual usage bar (0.0-1.0 scale).
fn usage_bar(ratio: f64) -> String {
    let filled = (ratio * 20.0).round() as usize;
    let filled = filled.min(20);
    let empty = 20 - filled;
    let symbol = if ratio >= 0.9 {
        "#"
    } else if ratio >= 0.7 {
        "="
    } else {
        "-"
    };
    format!("[{}{}]", symbol.repeat(filled), ".".repeat(empty))
}
