pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

pub use self::config::{FileSinkConfig, LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::error::LoggingError;

/// Инициализация логирования с конфигурацией.
///
/// Устанавливает глобальный subscriber; повторный вызов в том же процессе
/// возвращает [`LoggingError::Init`].
pub fn init_logging(config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    config.validate()?;
    config.ensure_log_dir()?;

    let env_filter = filters::build_filter_from_config(&config);
    let mut layers: Vec<formatter::BoxedLayer<Registry>> = Vec::new();

    layers.push(sinks::console::layer(&config));

    let file_guard = match &config.file {
        Some(sink) => {
            let (file_layer, guard) = sinks::file::layer(&config, sink)?;
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = ?config.format,
        file_enabled = file_guard.is_some(),
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
