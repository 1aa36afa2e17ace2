use thiserror::Error;

/// Ошибка инициализации логирования.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },

    #[error("log sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("global tracing subscriber already installed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}
