// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Glues the debug chain and callback manager around one [`ClientContext`]
//! at a time (spec §4.6).

use thiserror::Error;

use sim_types::ClientContext;

use crate::callback::CallbackManager;
use crate::chain::{ChainOutcome, DebugChain};
use crate::debug_config::DebugConfig;
use crate::debug_context::DebugContext;

/// What the orchestrator instructs the I/O layer to do with the connection
/// once the pipeline has finished with `client_ctx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    SendAndKeep,
    SendAndClose,
    CloseWithoutSending,
}

/// Only the debug chain reporting an error is fatal to a run; a callback
/// returning failure is informational and recovered from inside the
/// orchestrator per spec §7 (surfaced instead via `RunReport::callback_succeeded`).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("debug chain returned error code {0}")]
    Chain(i32),
}

/// The result of running one event through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub disposition: Disposition,
    /// `false` if the callback strategy reported failure; the response is
    /// still sendable, this is surfaced purely for the I/O layer to log.
    pub callback_succeeded: bool,
}

/// Maps a well-known status code to its conventional reason phrase. Unknown
/// codes leave whatever the callback already set.
fn reason_phrase(status: u16) -> Option<&'static str> {
    Some(match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        408 => "Request Timeout",
        418 => "I'm a Teapot",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return None,
    })
}

/// Runs the five/six-step pipeline algorithm of spec §4.6 for one event.
///
/// `probability_gate`, when `Some`, is the coin-flip decision already made
/// by the caller for this event (spec §6's `debug.debug_points[].probability`);
/// `false` forces the chain to be bypassed for this event regardless of
/// `config.enabled`, exactly as if the chain were disabled.
pub fn run(
    chain: &mut DebugChain,
    callbacks: &CallbackManager,
    client_ctx: &mut ClientContext,
    config: &DebugConfig,
    probability_gate: Option<bool>,
) -> Result<RunReport, OrchestratorError> {
    let mut debug_ctx = DebugContext::new(config.clone());

    let effective_config;
    let config = if probability_gate == Some(false) {
        effective_config = DebugConfig {
            enabled: false,
            ..config.clone()
        };
        &effective_config
    } else {
        config
    };

    let request_outcome = chain.process_request(client_ctx, config, &mut debug_ctx);
    if let ChainOutcome::Err(code) = request_outcome {
        return Err(OrchestratorError::Chain(code));
    }

    if debug_ctx.disconnect_after {
        return Ok(RunReport {
            disposition: Disposition::CloseWithoutSending,
            callback_succeeded: true,
        });
    }

    let callback_succeeded = if debug_ctx.skip_callback {
        true
    } else {
        callbacks.execute_callback(client_ctx)
    };

    let response_outcome = chain.process_response(client_ctx, config, &mut debug_ctx);
    if let ChainOutcome::Err(code) = response_outcome {
        return Err(OrchestratorError::Chain(code));
    }

    if debug_ctx.override_http_status != 0 {
        client_ctx.response.status_code = debug_ctx.override_http_status;
        if let Some(phrase) = reason_phrase(debug_ctx.override_http_status) {
            client_ctx.response.status_text = phrase.to_string();
        }
    }

    let disposition = if debug_ctx.disconnect_after {
        Disposition::SendAndClose
    } else {
        Disposition::SendAndKeep
    };

    Ok(RunReport {
        disposition,
        callback_succeeded,
    })
}
