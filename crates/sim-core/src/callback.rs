// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-port response strategies and the registry that looks them up.

use std::collections::HashMap;
use std::sync::Arc;

use sim_types::ClientContext;

/// Produces the response for a connection on a given listening port by
/// mutating `ctx.response` in place. Implementations must be stateless or
/// internally synchronized: a single `Arc<dyn CallbackStrategy>` may be
/// invoked repeatedly and concurrently if the orchestrator is multi-threaded
/// (not required by this core, but the contract permits it).
pub trait CallbackStrategy: Send + Sync {
    /// A short, human-readable label used in logs; not required to be unique.
    fn name(&self) -> &str;

    /// Mutates `ctx.response` and reports whether it succeeded. The
    /// orchestrator treats the response as sendable either way.
    fn execute(&self, ctx: &mut ClientContext) -> bool;
}

/// The strategy used for any port without a registered override: a `200 OK`
/// with body `{"status":"ok"}` (spec §6).
#[derive(Default)]
pub struct DefaultCallbackStrategy;

const DEFAULT_BODY: &str = "{\"status\":\"ok\"}";

impl CallbackStrategy for DefaultCallbackStrategy {
    fn name(&self) -> &str {
        "DefaultCallbackStrategy"
    }

    fn execute(&self, ctx: &mut ClientContext) -> bool {
        ctx.response.status_code = 200;
        ctx.response.status_text = "OK".to_string();
        ctx.response.body = DEFAULT_BODY.as_bytes().to_vec();
        ctx.response.headers.clear();
        ctx.response.headers.push("Content-Type".to_string(), "application/json".to_string());
        ctx.response
            .headers
            .push("Content-Length".to_string(), ctx.response.body.len().to_string());
        true
    }
}

/// Maps listening ports to their [`CallbackStrategy`]; ports with no entry
/// fall back to the manager's default strategy.
pub struct CallbackManager {
    callbacks_dir: String,
    strategies: HashMap<u16, Arc<dyn CallbackStrategy>>,
    default: Arc<dyn CallbackStrategy>,
}

impl CallbackManager {
    pub fn new() -> Self {
        Self {
            callbacks_dir: "callbacks".to_string(),
            strategies: HashMap::new(),
            default: Arc::new(DefaultCallbackStrategy),
        }
    }

    /// Overrides the fallback used for ports with no explicit registration.
    pub fn with_default(default: Arc<dyn CallbackStrategy>) -> Self {
        Self {
            callbacks_dir: "callbacks".to_string(),
            strategies: HashMap::new(),
            default,
        }
    }

    pub fn set_callbacks_dir(&mut self, path: impl Into<String>) {
        self.callbacks_dir = path.into();
    }

    pub fn callbacks_dir(&self) -> &str {
        &self.callbacks_dir
    }

    /// Registers `strategy` for `port`, replacing and returning any prior
    /// registration.
    pub fn register_strategy(&mut self, port: u16, strategy: Arc<dyn CallbackStrategy>) -> Option<Arc<dyn CallbackStrategy>> {
        self.strategies.insert(port, strategy)
    }

    /// Equivalent to registering the default strategy for `port`. Scripted
    /// strategies loaded from `path` are a future extension; this core only
    /// has the default strategy to fall back to.
    pub fn load_script(&mut self, _path: &str, port: u16) {
        self.register_strategy(port, self.default.clone());
    }

    pub fn unload_script(&mut self, port: u16) -> Option<Arc<dyn CallbackStrategy>> {
        self.strategies.remove(&port)
    }

    pub fn get_strategy(&self, port: u16) -> &Arc<dyn CallbackStrategy> {
        self.strategies.get(&port).unwrap_or(&self.default)
    }

    /// Looks up the strategy for `ctx.server_port` and invokes it.
    pub fn execute_callback(&self, ctx: &mut ClientContext) -> bool {
        let port = ctx.server_port;
        self.get_strategy(port).execute(ctx)
    }
}

impl Default for CallbackManager {
    fn default() -> Self {
        Self::new()
    }
}
