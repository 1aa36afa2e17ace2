use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::Layer as LayerTrait,
    registry::LookupSpan,
};

use crate::logging::config::{LogFormat, LoggingConfig};

/// Boxed fmt-слой: стирает конкретный тип формата (json/pretty/compact).
pub type BoxedLayer<S> = Box<dyn LayerTrait<S> + Send + Sync>;

/// Собирает fmt-слой для заданного writer.
pub fn build_formatter<S, W>(
    config: &LoggingConfig,
    format: LogFormat,
    with_ansi: bool,
    writer: W,
) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(with_ansi)
        .with_target(true)
        .with_thread_names(config.with_thread_names);

    match format {
        LogFormat::Json => layer.json().with_current_span(true).boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}
