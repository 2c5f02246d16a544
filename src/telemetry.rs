use crate::config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
///
/// # Errors
/// Returns an error if a filter directive is invalid or a subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    }
    .add_directive("sqlx=warn".parse()?)
    .add_directive("hyper=warn".parse()?);

    let registry = Registry::default().with(filter);
    let fmt_layer = tracing_subscriber::fmt::layer().with_file(true).with_line_number(true);

    match config.log_format {
        LogFormat::Text => registry.with(fmt_layer).try_init()?,
        LogFormat::Json => registry.with(fmt_layer.json()).try_init()?,
    }

    Ok(())
}
