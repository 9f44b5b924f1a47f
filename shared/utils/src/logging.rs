use anyhow::Result;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LoggingConfig;

/// Initializes the global tracing subscriber from the logging configuration.
///
/// `RUST_LOG` wins over the configured level; format is `json` or plain
/// text; an optional file path appends instead of writing to stderr.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let file = match &config.file_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    match (config.format.as_str(), file) {
        ("json", Some(file)) => registry.with(fmt::layer().json().with_writer(file)).init(),
        ("json", None) => registry.with(fmt::layer().json()).init(),
        (_, Some(file)) => registry.with(fmt::layer().with_writer(file)).init(),
        (_, None) => registry.with(fmt::layer()).init(),
    }

    tracing::info!("Logging initialized with level: {}", config.level);
    Ok(())
}
