// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pipeline input, read-only during a run.

/// Parameterizes one pipeline run. `enabled` is the master gate: when false,
/// [`crate::DebugChain::process_request`]/[`crate::DebugChain::process_response`]
/// bypass the chain entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub delay_ms: u32,
    pub force_disconnect: bool,
    pub log_packet: bool,
    pub http_status: u16,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 0,
            force_disconnect: false,
            log_packet: false,
            http_status: 200,
        }
    }
}

/// Re-initializes `config` to defaults; the only way to clear the master
/// `enabled` gate back to false after mutation.
pub fn reset(config: &mut DebugConfig) {
    *config = DebugConfig::default();
}
