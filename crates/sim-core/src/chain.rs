// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The ordered, extensible pipeline of [`DebugHandler`]s.
//!
//! Registration/deregistration and execution must not overlap; the chain is
//! not internally synchronized (spec §4.4/§5). The intended pattern is: all
//! handlers registered during startup, execution-only during steady state.

use thiserror::Error;

use sim_types::ClientContext;

use crate::debug_config::DebugConfig;
use crate::debug_context::DebugContext;
use crate::handler::{DebugHandler, HookOutcome};

/// The numeric return-code vocabulary of spec §6, preserved so a future
/// foreign-function layer can map to it directly.
pub const RET_SUCCESS: i32 = 0;
pub const RET_CONTINUE_CHAIN: i32 = 0;
pub const RET_INVALID_PARAM: i32 = -1;
pub const RET_NOT_FOUND: i32 = -2;
pub const RET_ALREADY_EXISTS: i32 = -3;
pub const RET_STOP_CHAIN: i32 = 1;

/// Programmer-error conditions surfaced by chain mutation. These are never
/// recovered from within the core; see spec §7.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
    #[error("invalid parameter")]
    InvalidParam,
    #[error("handler not found")]
    NotFound,
    #[error("handler already registered")]
    AlreadyExists,
}

impl ChainError {
    pub fn code(self) -> i32 {
        match self {
            ChainError::InvalidParam => RET_INVALID_PARAM,
            ChainError::NotFound => RET_NOT_FOUND,
            ChainError::AlreadyExists => RET_ALREADY_EXISTS,
        }
    }
}

/// The disposition of a full chain run: not a single handler's [`HookOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    /// `config.enabled` was false; the chain did nothing.
    NotExecuted,
    Continue,
    Stop,
    Err(i32),
}

impl ChainOutcome {
    pub fn code(self) -> i32 {
        match self {
            ChainOutcome::NotExecuted | ChainOutcome::Continue => RET_CONTINUE_CHAIN,
            ChainOutcome::Stop => RET_STOP_CHAIN,
            ChainOutcome::Err(code) => code,
        }
    }
}

impl From<HookOutcome> for ChainOutcome {
    fn from(outcome: HookOutcome) -> Self {
        match outcome {
            HookOutcome::Continue => ChainOutcome::Continue,
            HookOutcome::Stop => ChainOutcome::Stop,
            HookOutcome::Err(code) => ChainOutcome::Err(code),
        }
    }
}

/// Returned when [`DebugChain::register_handler`] fails: the handler is
/// handed back to the caller, who may drop it safely without a double free.
pub struct RegisterError {
    pub error: ChainError,
    pub handler: Box<dyn DebugHandler>,
}

impl std::fmt::Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterError")
            .field("error", &self.error)
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// Which phase a chain run is processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Request,
    Response,
}

/// Orders handlers by priority and invokes them in turn for the request and
/// response phases; supports early termination.
#[derive(Default)]
pub struct DebugChain {
    handlers: Vec<Box<dyn DebugHandler>>,
    sorted: bool,
}

impl DebugChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `handler` and takes ownership on success. Rejects a
    /// duplicate name with [`ChainError::AlreadyExists`] and hands the
    /// handler back unchanged. Must not be called concurrently with any
    /// other chain operation.
    pub fn register_handler(&mut self, handler: Box<dyn DebugHandler>) -> Result<(), RegisterError> {
        if handler.name().is_empty() || (!handler.has_request_hook() && !handler.has_response_hook()) {
            return Err(RegisterError {
                error: ChainError::InvalidParam,
                handler,
            });
        }
        if self.has_handler(handler.name()) {
            return Err(RegisterError {
                error: ChainError::AlreadyExists,
                handler,
            });
        }
        self.handlers.push(handler);
        self.sorted = false;
        Ok(())
    }

    /// Locates `name`; on success drops the handler (running its `Drop`,
    /// standing in for the C-struct `destroy` pointer) and removes it.
    pub fn unregister_handler(&mut self, name: &str) -> Result<(), ChainError> {
        match self.handlers.iter().position(|h| h.name() == name) {
            Some(idx) => {
                self.handlers.remove(idx);
                Ok(())
            }
            None => Err(ChainError::NotFound),
        }
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.iter().any(|h| h.name() == name)
    }

    pub fn process_request(
        &mut self,
        ctx: &ClientContext,
        config: &DebugConfig,
        debug_ctx: &mut DebugContext,
    ) -> ChainOutcome {
        self.run(Phase::Request, ctx, config, debug_ctx)
    }

    pub fn process_response(
        &mut self,
        ctx: &ClientContext,
        config: &DebugConfig,
        debug_ctx: &mut DebugContext,
    ) -> ChainOutcome {
        self.run(Phase::Response, ctx, config, debug_ctx)
    }

    fn run(&mut self, phase: Phase, ctx: &ClientContext, config: &DebugConfig, debug_ctx: &mut DebugContext) -> ChainOutcome {
        if !config.enabled {
            return ChainOutcome::NotExecuted;
        }
        if !self.sorted {
            self.sort_handlers();
            self.sorted = true;
        }
        for handler in &self.handlers {
            let (has_hook, outcome) = match phase {
                Phase::Request => (
                    handler.has_request_hook(),
                    handler.handle_request(ctx, config, debug_ctx),
                ),
                Phase::Response => (
                    handler.has_response_hook(),
                    handler.handle_response(ctx, config, debug_ctx),
                ),
            };
            if !has_hook {
                continue;
            }
            if outcome != HookOutcome::Continue {
                return outcome.into();
            }
        }
        ChainOutcome::Continue
    }

    /// Sorts by `(priority asc, name asc)` to guarantee deterministic
    /// ordering for handlers registered with equal priority.
    fn sort_handlers(&mut self) {
        self.handlers
            .sort_by(|a, b| a.priority().cmp(&b.priority()).then_with(|| a.name().cmp(b.name())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct NamedHandler {
        name: &'static str,
        priority: i32,
    }

    impl DebugHandler for NamedHandler {
        fn name(&self) -> &str {
            self.name
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn has_request_hook(&self) -> bool {
            true
        }
        fn handle_request(&self, _ctx: &ClientContext, _config: &DebugConfig, _debug_ctx: &mut DebugContext) -> HookOutcome {
            HookOutcome::Continue
        }
    }

    struct SpyHandler {
        name: &'static str,
        priority: i32,
        invoked: Arc<AtomicUsize>,
    }

    impl DebugHandler for SpyHandler {
        fn name(&self) -> &str {
            self.name
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn has_request_hook(&self) -> bool {
            true
        }
        fn handle_request(&self, _ctx: &ClientContext, _config: &DebugConfig, _debug_ctx: &mut DebugContext) -> HookOutcome {
            self.invoked.fetch_add(1, Ordering::SeqCst);
            HookOutcome::Continue
        }
    }

    struct HandlerWithNoHooks {
        name: &'static str,
    }

    impl DebugHandler for HandlerWithNoHooks {
        fn name(&self) -> &str {
            self.name
        }
        fn priority(&self) -> i32 {
            0
        }
    }

    struct DropCountingHandler {
        name: &'static str,
        drops: Arc<AtomicUsize>,
    }

    impl DebugHandler for DropCountingHandler {
        fn name(&self) -> &str {
            self.name
        }
        fn priority(&self) -> i32 {
            0
        }
        fn has_request_hook(&self) -> bool {
            true
        }
    }

    impl Drop for DropCountingHandler {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ctx() -> ClientContext {
        ClientContext::new(1, 8443, "127.0.0.1", 40000)
    }

    #[test]
    fn registration_rejects_handler_without_any_hook() {
        let mut chain = DebugChain::new();
        let err = chain
            .register_handler(Box::new(HandlerWithNoHooks { name: "noop" }))
            .unwrap_err();
        assert_eq!(err.error, ChainError::InvalidParam);
    }

    #[test]
    fn duplicate_registration_returns_already_exists_and_keeps_ownership() {
        let mut chain = DebugChain::new();
        chain
            .register_handler(Box::new(NamedHandler { name: "X", priority: 1 }))
            .unwrap();
        let err = chain
            .register_handler(Box::new(NamedHandler { name: "X", priority: 2 }))
            .unwrap_err();
        assert_eq!(err.error, ChainError::AlreadyExists);
        assert_eq!(err.handler.name(), "X");
    }

    #[test]
    fn unregister_missing_handler_returns_not_found() {
        let mut chain = DebugChain::new();
        assert_eq!(chain.unregister_handler("ghost"), Err(ChainError::NotFound));
    }

    #[test]
    fn unregister_drops_handler_exactly_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut chain = DebugChain::new();
        chain
            .register_handler(Box::new(DropCountingHandler {
                name: "D",
                drops: drops.clone(),
            }))
            .unwrap();
        chain.unregister_handler("D").unwrap();
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_the_chain_destroys_every_remaining_handler_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        {
            let mut chain = DebugChain::new();
            for name in ["A", "B", "C"] {
                chain
                    .register_handler(Box::new(DropCountingHandler {
                        name,
                        drops: drops.clone(),
                    }))
                    .unwrap();
            }
        }
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn disabled_config_skips_the_chain_entirely() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let mut chain = DebugChain::new();
        chain
            .register_handler(Box::new(SpyHandler {
                name: "spy",
                priority: 1,
                invoked: invoked.clone(),
            }))
            .unwrap();
        let config = DebugConfig::default();
        let mut debug_ctx = DebugContext::new(config.clone());
        let outcome = chain.process_request(&ctx(), &config, &mut debug_ctx);
        assert_eq!(outcome, ChainOutcome::NotExecuted);
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn execution_order_follows_priority_then_name() {
        let mut chain = DebugChain::new();
        chain
            .register_handler(Box::new(NamedHandler { name: "zeta", priority: 10 }))
            .unwrap();
        chain
            .register_handler(Box::new(NamedHandler { name: "alpha", priority: 10 }))
            .unwrap();
        chain
            .register_handler(Box::new(NamedHandler { name: "first", priority: 1 }))
            .unwrap();

        let config = DebugConfig {
            enabled: true,
            ..DebugConfig::default()
        };
        let mut debug_ctx = DebugContext::new(config.clone());
        chain.process_request(&ctx(), &config, &mut debug_ctx);

        let order: Vec<&str> = chain.handlers.iter().map(|h| h.name()).collect();
        assert_eq!(order, vec!["first", "alpha", "zeta"]);
    }

    #[test]
    fn stop_outcome_short_circuits_remaining_handlers() {
        let invoked_after = Arc::new(AtomicUsize::new(0));
        let mut chain = DebugChain::new();
        chain
            .register_handler(Box::new(NamedHandlerThatStops { priority: 100 }))
            .unwrap();
        chain
            .register_handler(Box::new(SpyHandler {
                name: "after",
                priority: 200,
                invoked: invoked_after.clone(),
            }))
            .unwrap();

        let config = DebugConfig {
            enabled: true,
            ..DebugConfig::default()
        };
        let mut debug_ctx = DebugContext::new(config.clone());
        let outcome = chain.process_request(&ctx(), &config, &mut debug_ctx);
        assert_eq!(outcome, ChainOutcome::Stop);
        assert_eq!(invoked_after.load(Ordering::SeqCst), 0);
    }

    struct NamedHandlerThatStops {
        priority: i32,
    }

    impl DebugHandler for NamedHandlerThatStops {
        fn name(&self) -> &str {
            "stopper"
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn has_request_hook(&self) -> bool {
            true
        }
        fn handle_request(&self, _ctx: &ClientContext, _config: &DebugConfig, _debug_ctx: &mut DebugContext) -> HookOutcome {
            HookOutcome::Stop
        }
    }
}
