//! CDR Inspection Tool
//!
//! Reads one raw Ribbon/GSX accounting record from stdin and prints
//! its condensed and full decoded views.

use std::io::Read;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cdr_inspect=info,cdr_protocol=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading record from stdin")?;

    let record = match input.lines().find(|l| !l.trim().is_empty()) {
        Some(line) => line,
        None => {
            tracing::warn!("no record found on stdin");
            return Ok(());
        }
    };

    let cdr = cdr_protocol::decode(record);
    tracing::debug!(kind = cdr.kind.name(), "decoded record");

    println!("{}", cdr_protocol::render_condensed(&cdr));
    println!("{}", cdr_protocol::render_full(&cdr));

    Ok(())
}
