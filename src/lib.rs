/// Layered settings loading (defaults, file, environment).
pub mod config;
/// Error types for the configuration and logging layers.
pub mod error;
/// Price-update fan-out scenario built on top of `pubsub`.
pub mod feed;
/// Logging initialisation (filters, formats, sinks).
pub mod logging;
/// Single-producer / multi-subscriber broadcast hub.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings.
pub use self::config::{FeedSettings, HubSettings, OverflowKind, Settings};
/// Errors and result types.
pub use error::{ConfigError, LoggingError};
/// Feed scenario.
pub use feed::{ConsumerReport, Feed, FeedReport, PriceUpdate};
/// Logging entry point.
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
/// Broadcast API.
pub use pubsub::{
    BroadcastStats, Broadcaster, Message, OverflowPolicy, Subscriber, SubscriberHandle,
};
