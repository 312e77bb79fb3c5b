// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reads synthetic `ClientContext` events from a newline-delimited JSON file
//! and reports each replay's disposition.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use sim_core::{Disposition, OrchestratorError, RunReport};
use sim_types::ClientContext;

pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<ClientContext>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}

#[derive(Serialize)]
pub struct ReplayOutcome {
    connection_id: u64,
    server_port: u16,
    disposition: &'static str,
    status_code: u16,
    callback_succeeded: bool,
    error: Option<String>,
}

impl ReplayOutcome {
    pub fn success(ctx: &ClientContext, report: RunReport) -> Self {
        Self {
            connection_id: ctx.connection_id,
            server_port: ctx.server_port,
            disposition: disposition_label(report.disposition),
            status_code: ctx.response.status_code,
            callback_succeeded: report.callback_succeeded,
            error: None,
        }
    }

    pub fn error(ctx: &ClientContext, err: OrchestratorError) -> Self {
        Self {
            connection_id: ctx.connection_id,
            server_port: ctx.server_port,
            disposition: "error",
            status_code: ctx.response.status_code,
            callback_succeeded: false,
            error: Some(err.to_string()),
        }
    }
}

fn disposition_label(disposition: Disposition) -> &'static str {
    match disposition {
        Disposition::SendAndKeep => "send-and-keep",
        Disposition::SendAndClose => "send-and-close",
        Disposition::CloseWithoutSending => "close-without-sending",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_one_event_per_line_and_skips_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let ctx = ClientContext::new(1, 8443, "127.0.0.1", 40000);
        writeln!(file, "{}", serde_json::to_string(&ctx).unwrap()).unwrap();
        writeln!(file).unwrap();
        let ctx2 = ClientContext::new(2, 8443, "127.0.0.1", 40001);
        writeln!(file, "{}", serde_json::to_string(&ctx2).unwrap()).unwrap();

        let events = read_events(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].connection_id, 1);
        assert_eq!(events[1].connection_id, 2);
    }
}
