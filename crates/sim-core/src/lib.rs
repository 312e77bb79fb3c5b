// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The request/response processing pipeline of the server simulator: an
//! ordered debug handler chain, a per-port callback strategy registry, and
//! the orchestrator that glues the two together around one [`sim_types::ClientContext`]
//! at a time.

pub mod callback;
pub mod chain;
pub mod debug_config;
pub mod debug_context;
pub mod handler;
pub mod orchestrator;

pub use callback::{CallbackManager, CallbackStrategy, DefaultCallbackStrategy};
pub use chain::{ChainError, ChainOutcome, DebugChain};
pub use debug_config::DebugConfig;
pub use debug_context::DebugContext;
pub use handler::{DebugHandler, DelayHandler, DisconnectHandler, ErrorCodeHandler, HookOutcome, LogHandler};
pub use orchestrator::{run, Disposition, OrchestratorError, RunReport};
