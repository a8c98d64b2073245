use anyhow::Result;
use tracing::info;

use rampart_uci::UciEngine;

fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries the UCI protocol.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    info!("rampart starting");
    UciEngine::new().run()?;
    Ok(())
}
