// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("debug point {point_name:?} for port {server_port}: {reason}")]
    InvalidDebugPoint {
        server_port: u16,
        point_name: String,
        reason: String,
    },
}
