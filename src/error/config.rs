use thiserror::Error;

/// Ошибка загрузки или проверки настроек.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("queue capacity must be greater than zero")]
    ZeroCapacity,

    #[error("overflow policy `{policy}` requires a queue capacity")]
    MissingCapacity { policy: String },

    #[error("feed requires at least one consumer")]
    NoConsumers,
}
