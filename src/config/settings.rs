use std::{fmt, num::NonZeroUsize, path::Path};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, logging::LoggingConfig, pubsub::OverflowPolicy};

/// Префикс переменных окружения (`FANOUT_HUB__CAPACITY=64`).
pub const ENV_PREFIX: &str = "FANOUT";

/// Вид политики переполнения в настройках.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OverflowKind {
    #[default]
    Unbounded,
    DropOldest,
    DropNewest,
}

impl fmt::Display for OverflowKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = match self {
            Self::Unbounded => "unbounded",
            Self::DropOldest => "drop_oldest",
            Self::DropNewest => "drop_newest",
        };
        f.write_str(s)
    }
}

/// Настройки вещателя.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    pub overflow: OverflowKind,
    /// Ёмкость очереди подписчика; обязательна для ограниченных политик.
    pub capacity: Option<usize>,
}

impl HubSettings {
    /// Проверяет настройки и собирает из них [`OverflowPolicy`].
    ///
    /// Для `unbounded` ёмкость игнорируется.
    pub fn policy(&self) -> Result<OverflowPolicy, ConfigError> {
        if self.overflow == OverflowKind::Unbounded {
            return Ok(OverflowPolicy::Unbounded);
        }

        let capacity = self
            .capacity
            .ok_or_else(|| ConfigError::MissingCapacity {
                policy: self.overflow.to_string(),
            })
            .and_then(|n| NonZeroUsize::new(n).ok_or(ConfigError::ZeroCapacity))?;

        Ok(match self.overflow {
            OverflowKind::DropOldest => OverflowPolicy::DropOldest(capacity),
            _ => OverflowPolicy::DropNewest(capacity),
        })
    }
}

/// Параметры сценария рассылки котировок.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub consumers: usize,
    pub messages: u64,
    pub interval_ms: u64,
    pub symbol_id: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            consumers: 4,
            messages: 200,
            interval_ms: 10,
            symbol_id: 1,
        }
    }
}

/// Полная конфигурация приложения.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub hub: HubSettings,
    pub feed: FeedSettings,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки.
    ///
    /// Источники по возрастанию приоритета: значения по умолчанию, файл
    /// `path` (формат определяется по расширению), переменные окружения
    /// с префиксом `FANOUT_` и разделителем вложенности `__`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("hub.overflow", "unbounded")?
            .set_default("feed.consumers", 4_i64)?
            .set_default("feed.messages", 200_i64)?
            .set_default("feed.interval_ms", 10_i64)?
            .set_default("logging.level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Проверка зависимостей между полями.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.consumers == 0 {
            return Err(ConfigError::NoConsumers);
        }
        self.hub.policy()?;
        Ok(())
    }
}
