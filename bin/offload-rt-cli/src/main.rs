// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # offload-rt
//!
//! Command-line interface for the offload-rt relocation pipeline.
//!
//! ## Usage
//! ```bash
//! # Offload a synthetic model bundle to host memory and recall it
//! offload-rt run --direction round-trip --model bundle
//!
//! # Offload only, onto an explicit device, with machine-readable output
//! offload-rt run --direction offload --device cpu --json
//!
//! # Classify a model and print its components and the node schema
//! offload-rt inspect --model adapter
//!
//! # Show the device topology and host memory state
//! offload-rt status
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "offload-rt",
    about = "Device placement and relocation for model graphs",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (devices, defaults, deny rules).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a synthetic model through one or two relocation rounds.
    Run {
        /// Direction: offload, recall, or round-trip.
        #[arg(short, long, default_value = "round-trip")]
        direction: String,

        /// Synthetic model kind: bundle, adapter, simple, sealed, pinned, opaque.
        #[arg(short, long, default_value = "bundle")]
        model: String,

        /// Target device name, or "auto" (defaults to the config's setting).
        #[arg(long)]
        device: Option<String>,

        /// Denylist policy, ignore or raise (defaults to the config's setting).
        #[arg(long)]
        on_error: Option<String>,

        /// Emit the round outcomes as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Classify a synthetic model and print its components and the node schema.
    Inspect {
        /// Synthetic model kind: bundle, adapter, simple, sealed, pinned, opaque.
        #[arg(short, long, default_value = "bundle")]
        model: String,
    },

    /// Display the configured device topology and host memory state.
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            direction,
            model,
            device,
            on_error,
            json,
        } => commands::run::execute(&config, &direction, &model, device, on_error, json),
        Commands::Inspect { model } => commands::inspect::execute(&config, &model),
        Commands::Status => commands::status::execute(&config),
    }
}
