// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-event scratch shared across chain handlers; never shared across events.

use crate::debug_config::DebugConfig;

/// `override_http_status == 0` is the sentinel meaning "unset".
#[derive(Clone, Debug)]
pub struct DebugContext {
    pub config: DebugConfig,
    /// Populated on demand by handlers that need the raw request bytes.
    pub request_data: Option<Vec<u8>>,
    /// Populated on demand by handlers that need the raw response bytes.
    pub response_data: Option<Vec<u8>>,
    pub override_http_status: u16,
    pub skip_callback: bool,
    pub disconnect_after: bool,
}

impl DebugContext {
    /// Creates fresh per-event scratch seeded with the current `DebugConfig`.
    pub fn new(config: DebugConfig) -> Self {
        Self {
            config,
            request_data: None,
            response_data: None,
            override_http_status: 0,
            skip_callback: false,
            disconnect_after: false,
        }
    }
}
