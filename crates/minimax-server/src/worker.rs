//! Worker-process entry point (`minimax-server worker`).
//!
//! Reads one job from stdin, runs it, writes one report to stdout.
//! stdout carries nothing else; logs go to stderr.

use std::io::{self, Read, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use minimax_core::analyze;
use minimax_protocol::{decode_job, encode_report};

pub fn run_worker() -> Result<()> {
    let mut job = Vec::new();
    io::stdin()
        .read_to_end(&mut job)
        .context("reading job from stdin")?;

    let request = decode_job(&job).context("decoding job")?;
    let started = Instant::now();
    let result = analyze(&request);
    debug!(
        game = %request.game(),
        nodes = result.evaluated_nodes,
        elapsed = ?started.elapsed(),
        "Analysis finished"
    );

    let report = encode_report(result).context("encoding report")?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&report).context("writing report")?;
    stdout.flush().context("flushing report")?;
    Ok(())
}
