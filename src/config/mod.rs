//! Загрузка настроек: значения по умолчанию → файл → переменные окружения.

pub mod settings;

pub use settings::{FeedSettings, HubSettings, OverflowKind, Settings};
