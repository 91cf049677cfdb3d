use std::io;

use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a plain-text subscriber filtered by `RUST_LOG`. Logs go to stderr; stdout is reserved
/// for command output.
pub fn init_logging() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(Layer::new().with_writer(io::stderr))
        .try_init()?;
    Ok(())
}
