//! Terminal client for tactical battles.
//!
//! Loads a scenario from the content directory, starts the runtime and reads
//! commands from stdin. Combat-log lines are printed as they happen.
//!
//! ```bash
//! TACTICS_SCENARIO=skirmish RUST_LOG=debug cargo run -p tactics-client
//! ```
mod app;
mod config;
mod input;
mod logging;
mod render;

use anyhow::{Context, Result};
use tactics_content::ContentFactory;
use tactics_runtime::Runtime;

use crate::app::App;
use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(&config.log_dir)?;

    tracing::info!(
        scenario = %config.scenario,
        data_dir = %config.data_dir.display(),
        "Starting tactics client"
    );

    let battle = ContentFactory::new(&config.data_dir)
        .load_battle(&config.scenario)
        .with_context(|| format!("failed to load scenario `{}`", config.scenario))?;

    let runtime = Runtime::builder()
        .config(config.runtime_config())
        .battle(&battle)?
        .build()
        .await?;

    App::new(runtime.handle()).run().await?;

    tracing::info!("Client shutdown complete");
    runtime.shutdown().await?;
    Ok(())
}
