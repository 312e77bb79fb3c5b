// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! `simctl` — a terminal harness that wires a `DebugChain` + `CallbackManager`
//! behind the pipeline orchestrator and replays a scenario file of synthetic
//! `ClientContext` events, printing the resulting disposition of each as a
//! JSON line. Opens no sockets and performs no TLS; those remain collaborator
//! concerns (spec.md Non-goals).

mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sim_config::Config;
use sim_core::{CallbackManager, DebugChain, DelayHandler, DisconnectHandler, ErrorCodeHandler, LogHandler};

use crate::scenario::{read_events, ReplayOutcome};

#[derive(Parser)]
#[command(author, version, about = "Replay synthetic client contexts through the server simulator pipeline", long_about = None)]
struct Args {
    /// Path to a TOML configuration file (spec.md §6 schema).
    #[arg(long)]
    config: PathBuf,

    /// Path to a newline-delimited JSON file of `ClientContext` events.
    #[arg(long)]
    scenario: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config).with_context(|| format!("loading config from {}", args.config.display()))?;

    let mut chain = DebugChain::new();
    chain.register_handler(Box::new(DelayHandler)).expect("built-in handler names never collide");
    chain
        .register_handler(Box::new(DisconnectHandler))
        .expect("built-in handler names never collide");
    chain.register_handler(Box::new(LogHandler)).expect("built-in handler names never collide");
    chain
        .register_handler(Box::new(ErrorCodeHandler))
        .expect("built-in handler names never collide");

    let mut callbacks = CallbackManager::new();
    callbacks.set_callbacks_dir(config.callbacks.callbacks_dir.clone());
    for entry in &config.callbacks.callbacks {
        callbacks.load_script(&entry.script_path, entry.server_port);
    }

    let events = read_events(&args.scenario).with_context(|| format!("reading scenario from {}", args.scenario.display()))?;

    for mut ctx in events {
        let port = ctx.server_port;
        let debug_config = config.debug_config_for_port(port);
        let probability = config.probability_for_port(port);
        let gate = roll_probability(probability);

        let outcome = match sim_core::run(&mut chain, &callbacks, &mut ctx, &debug_config, Some(gate)) {
            Ok(report) => ReplayOutcome::success(&ctx, report),
            Err(err) => ReplayOutcome::error(&ctx, err),
        };

        println!("{}", serde_json::to_string(&outcome)?);
    }

    Ok(())
}

/// The coin flip described in spec.md §6: `probability` of 100 always runs
/// the chain, 0 never does, anything between is a weighted draw.
fn roll_probability(probability: u8) -> bool {
    use rand::Rng;
    match probability {
        0 => false,
        100..=u8::MAX => true,
        p => rand::thread_rng().gen_range(0..100) < p,
    }
}
