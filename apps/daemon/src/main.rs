//! pulsetray daemon entry point.

mod app;
mod console;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting pulsetray");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run())?;

    tracing::info!("pulsetray shut down cleanly");
    Ok(())
}
