use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::registry::LookupSpan;

use crate::{
    error::LoggingError,
    logging::{
        config::{FileSinkConfig, LogFormat, LoggingConfig},
        formatter::{build_formatter, BoxedLayer},
    },
};

/// Файловый слой с ежедневной ротацией и неблокирующей записью.
///
/// Возвращённый `WorkerGuard` нужно держать, пока идёт логирование:
/// при его drop фоновый writer сбрасывает буфер.
pub fn layer<S>(
    config: &LoggingConfig,
    sink: &FileSinkConfig,
) -> Result<(BoxedLayer<S>, WorkerGuard), LoggingError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(&sink.dir)?;

    let appender = rolling::daily(&sink.dir, &sink.prefix);
    let (writer, guard) = non_blocking(appender);

    // ANSI-коды в файле не нужны; pretty плохо читается построчно.
    let format = match config.format {
        LogFormat::Json => LogFormat::Json,
        _ => LogFormat::Compact,
    };
    Ok((build_formatter(config, format, false, writer), guard))
}
