pub mod config;
pub mod logging;

pub use self::config::ConfigError;
pub use logging::LoggingError;
