// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// The `[callbacks]` section: which directory scripted strategies live in
/// (opaque to the core, spec §6) and which ports get a registered strategy.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallbacksConfig {
    #[serde(default = "default_callbacks_dir")]
    pub callbacks_dir: String,
    #[serde(default)]
    pub callbacks: Vec<CallbackEntry>,
}

fn default_callbacks_dir() -> String {
    "callbacks".to_string()
}

/// One `[[callbacks.callbacks]]` entry: interpreted as "register a default
/// strategy for this port" (spec §6 — scripted strategies are a stub).
#[derive(Clone, Debug, Deserialize)]
pub struct CallbackEntry {
    pub server_port: u16,
    pub script_path: String,
}
