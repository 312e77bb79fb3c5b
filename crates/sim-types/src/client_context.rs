// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::http::{HttpRequest, HttpResponse};

/// Identifies a logical request/connection as it flows through the pipeline.
///
/// Created by the (out-of-scope) I/O layer and handed to the pipeline by
/// value; `connection_id` is monotonically unique per process for the life
/// of a connection, not required to be globally unique across restarts.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClientContext {
    pub connection_id: u64,
    /// The local port the client connected to; used as the callback
    /// strategy registry key.
    pub server_port: u16,
    pub client_ip: String,
    pub client_port: u16,
    pub request: HttpRequest,
    pub response: HttpResponse,
}

impl ClientContext {
    pub fn new(connection_id: u64, server_port: u16, client_ip: impl Into<String>, client_port: u16) -> Self {
        Self {
            connection_id,
            server_port,
            client_ip: client_ip.into(),
            client_port,
            request: HttpRequest::default(),
            response: HttpResponse::default(),
        }
    }

    /// Re-initializes every field to its default, for reuse across events.
    pub fn reset(&mut self) {
        *self = ClientContext::default();
    }

    pub fn client_endpoint(&self) -> String {
        format!("{}:{}", self.client_ip, self.client_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_every_field() {
        let mut ctx = ClientContext::new(7, 8443, "10.0.0.1", 5555);
        ctx.request.path = "/foo".to_string();
        ctx.response.status_code = 503;
        ctx.reset();
        assert_eq!(ctx.connection_id, 0);
        assert_eq!(ctx.server_port, 0);
        assert_eq!(ctx.client_ip, "");
        assert_eq!(ctx.request.path, "");
        assert_eq!(ctx.response.status_code, 200);
    }

    #[test]
    fn client_endpoint_formats_ip_and_port() {
        let ctx = ClientContext::new(1, 443, "192.168.1.5", 51000);
        assert_eq!(ctx.client_endpoint(), "192.168.1.5:51000");
    }
}
