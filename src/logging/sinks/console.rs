use std::io::{self, Stdout};

use tracing_subscriber::registry::LookupSpan;

use crate::logging::{
    config::LoggingConfig,
    formatter::{build_formatter, BoxedLayer},
};

/// Консольный слой в формате из конфигурации.
pub fn layer<S>(config: &LoggingConfig) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let writer: fn() -> Stdout = io::stdout;
    build_formatter(config, config.format, config.with_ansi, writer)
}
