//! Prints what RenderDoc discovery sees as JSON, then tries to attach.
//!
//! Pass `--capture` to also trigger a capture and open the replay UI.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut renderdoc = spartan_renderdoc::CaptureToolManager::system();

    let diag = renderdoc.diagnose();
    let json = serde_json::to_string_pretty(&diag).context("failed to serialize JSON")?;
    println!("{json}");

    renderdoc
        .initialize()
        .context("failed to attach RenderDoc")?;
    tracing::info!(
        ownership = ?renderdoc.ownership(),
        path = ?renderdoc.library_path(),
        "attached"
    );

    if std::env::args().any(|arg| arg == "--capture") {
        let outcome = renderdoc
            .trigger_capture()
            .context("failed to trigger capture")?;
        tracing::info!(?outcome, "capture requested");
    }

    renderdoc.shutdown();
    Ok(())
}
