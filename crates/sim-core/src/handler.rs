// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The polymorphic debug handler interface and the four built-in handlers.

use std::time::Duration;

use sim_types::ClientContext;

use crate::debug_config::DebugConfig;
use crate::debug_context::DebugContext;

/// The three-valued disposition a hook can return. Only `Continue` lets the
/// next handler in the chain run; `Stop` and `Err` short-circuit and are
/// propagated to the caller of the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    Stop,
    /// An application-defined error code, preserved for any future
    /// foreign-function boundary (see spec §6/§9).
    Err(i32),
}

/// A single processing unit in the [`crate::DebugChain`]. Registration
/// transfers ownership to the chain (`Box<dyn DebugHandler>`); a chain's
/// `Drop` runs each handler's `Drop` exactly once, which stands in for the
/// C-struct `destroy` function pointer this type was generalized from (see
/// spec §9).
///
/// A handler without a hook for a given phase must report `false` from the
/// corresponding `has_*_hook`; the chain silently skips that phase for it.
/// At least one of the two hooks must be present for registration to
/// succeed.
pub trait DebugHandler: Send + Sync {
    fn name(&self) -> &str;

    /// Smaller runs earlier. Handlers with equal priority are ordered by
    /// ASCII comparison of their names to guarantee determinism.
    fn priority(&self) -> i32;

    fn has_request_hook(&self) -> bool {
        false
    }

    fn has_response_hook(&self) -> bool {
        false
    }

    fn handle_request(
        &self,
        _ctx: &ClientContext,
        _config: &DebugConfig,
        _debug_ctx: &mut DebugContext,
    ) -> HookOutcome {
        HookOutcome::Continue
    }

    fn handle_response(
        &self,
        _ctx: &ClientContext,
        _config: &DebugConfig,
        _debug_ctx: &mut DebugContext,
    ) -> HookOutcome {
        HookOutcome::Continue
    }
}

/// Priority 100. Sleeps for `config.delay_ms` if nonzero, in both phases.
#[derive(Default)]
pub struct DelayHandler;

impl DebugHandler for DelayHandler {
    fn name(&self) -> &str {
        "DelayHandler"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn has_request_hook(&self) -> bool {
        true
    }

    fn has_response_hook(&self) -> bool {
        true
    }

    fn handle_request(&self, _ctx: &ClientContext, config: &DebugConfig, _debug_ctx: &mut DebugContext) -> HookOutcome {
        if config.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(config.delay_ms as u64));
        }
        HookOutcome::Continue
    }

    fn handle_response(&self, ctx: &ClientContext, config: &DebugConfig, debug_ctx: &mut DebugContext) -> HookOutcome {
        self.handle_request(ctx, config, debug_ctx)
    }
}

/// Priority 200. If `config.force_disconnect`, marks `disconnect_after` and
/// stops the chain; otherwise continues. Identical behavior in both phases.
#[derive(Default)]
pub struct DisconnectHandler;

impl DebugHandler for DisconnectHandler {
    fn name(&self) -> &str {
        "DisconnectHandler"
    }

    fn priority(&self) -> i32 {
        200
    }

    fn has_request_hook(&self) -> bool {
        true
    }

    fn has_response_hook(&self) -> bool {
        true
    }

    fn handle_request(&self, _ctx: &ClientContext, config: &DebugConfig, debug_ctx: &mut DebugContext) -> HookOutcome {
        if config.force_disconnect {
            debug_ctx.disconnect_after = true;
            HookOutcome::Stop
        } else {
            HookOutcome::Continue
        }
    }

    fn handle_response(&self, ctx: &ClientContext, config: &DebugConfig, debug_ctx: &mut DebugContext) -> HookOutcome {
        self.handle_request(ctx, config, debug_ctx)
    }
}

/// Priority 300. Emits one structured `tracing` event per phase, formatted
/// to match spec §6's literal log line, when `config.log_packet` is set.
#[derive(Default)]
pub struct LogHandler;

impl LogHandler {
    fn log(direction: &str, ctx: &ClientContext) {
        tracing::info!(
            direction,
            conn_id = ctx.connection_id,
            client = %ctx.client_endpoint(),
            server_port = ctx.server_port,
            "[Debug] {}: conn_id={}, client={}, server_port={}",
            direction,
            ctx.connection_id,
            ctx.client_endpoint(),
            ctx.server_port,
        );
    }
}

impl DebugHandler for LogHandler {
    fn name(&self) -> &str {
        "LogHandler"
    }

    fn priority(&self) -> i32 {
        300
    }

    fn has_request_hook(&self) -> bool {
        true
    }

    fn has_response_hook(&self) -> bool {
        true
    }

    fn handle_request(&self, ctx: &ClientContext, config: &DebugConfig, _debug_ctx: &mut DebugContext) -> HookOutcome {
        if config.log_packet {
            Self::log("Request", ctx);
        }
        HookOutcome::Continue
    }

    fn handle_response(&self, ctx: &ClientContext, config: &DebugConfig, _debug_ctx: &mut DebugContext) -> HookOutcome {
        if config.log_packet {
            Self::log("Response", ctx);
        }
        HookOutcome::Continue
    }
}

/// Priority 400. Request phase unconditionally sets `override_http_status`;
/// response phase only sets it if still unset (0), so an earlier
/// request-phase override (from a custom handler) survives the response
/// phase unchanged.
#[derive(Default)]
pub struct ErrorCodeHandler;

impl DebugHandler for ErrorCodeHandler {
    fn name(&self) -> &str {
        "ErrorCodeHandler"
    }

    fn priority(&self) -> i32 {
        400
    }

    fn has_request_hook(&self) -> bool {
        true
    }

    fn has_response_hook(&self) -> bool {
        true
    }

    fn handle_request(&self, _ctx: &ClientContext, config: &DebugConfig, debug_ctx: &mut DebugContext) -> HookOutcome {
        debug_ctx.override_http_status = config.http_status;
        HookOutcome::Continue
    }

    fn handle_response(&self, _ctx: &ClientContext, config: &DebugConfig, debug_ctx: &mut DebugContext) -> HookOutcome {
        if debug_ctx.override_http_status == 0 {
            debug_ctx.override_http_status = config.http_status;
        }
        HookOutcome::Continue
    }
}
