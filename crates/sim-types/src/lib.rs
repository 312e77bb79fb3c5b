// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wire-level data model shared by the debug chain, the callback layer, and
//! the pipeline orchestrator. Produced by the (out-of-scope) I/O layer and
//! handed to the pipeline by value.

mod client_context;
mod http;

pub use client_context::ClientContext;
pub use http::{HeaderList, HttpMethod, HttpRequest, HttpResponse};
