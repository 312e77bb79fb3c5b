// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The on-disk configuration surface consumed by the server simulator core
//! (spec §6). Loading and validation live here; `sim-core` never reads disk.

mod callbacks;
mod debug;
mod error;

use std::path::Path;

use serde::Deserialize;

pub use callbacks::{CallbackEntry, CallbacksConfig};
pub use debug::{DebugAction, DebugPoint, DebugSection};
pub use error::ConfigError;

use sim_core::DebugConfig;

/// One `[[listens]]` entry. Only `port` is read by the core; a real
/// deployment's richer listener schema is carried opaquely.
#[derive(Clone, Debug, Deserialize)]
pub struct Listen {
    pub port: u16,
}

/// The full configuration file (spec §6): `listens`, `certificates`,
/// `callbacks`, `debug`, `logging`, `http2`. Only `callbacks` and `debug` are
/// read by this core; the rest are collaborator concerns (TLS, socket
/// binding, log sinks) and are carried as opaque passthrough values so a
/// richer deployment schema round-trips without this core needing to
/// understand it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub listens: Vec<Listen>,
    pub certificates: Option<serde_json::Value>,
    pub callbacks: CallbacksConfig,
    pub debug: DebugSection,
    pub logging: Option<serde_json::Value>,
    pub http2: Option<serde_json::Value>,
}

impl Config {
    /// Reads and parses a TOML config file from `path`, validating every
    /// `debug.debug_points[]` entry.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// Parses `text` as a TOML config document, validating every
    /// `debug.debug_points[]` entry.
    pub fn from_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.debug.validate()?;
        Ok(config)
    }

    /// Reduces `debug.debug_points[]` into a [`DebugConfig`] for `port`, per
    /// the mapping table in spec §6.
    pub fn debug_config_for_port(&self, port: u16) -> DebugConfig {
        self.debug.debug_config_for_port(port)
    }

    /// The coin-flip probability (0-100) the orchestrator's collaborator
    /// should honor for `port` before invoking the chain, per spec §6.
    pub fn probability_for_port(&self, port: u16) -> u8 {
        self.debug.probability_for_port(port)
    }
}
