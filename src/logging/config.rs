use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::LoggingError;

/// Формат вывода событий.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Файловый sink с ежедневной ротацией.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FileSinkConfig {
    /// Каталог для файлов логов (создаётся при инициализации).
    pub dir: PathBuf,
    /// Префикс имени файла, к нему добавляется дата.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "fanout.log".to_string()
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень (`info`) или полная директива `EnvFilter`.
    pub level: String,
    /// Формат консольного вывода.
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_thread_names: bool,
    /// Опциональный файловый sink.
    pub file: Option<FileSinkConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_ansi: true,
            with_thread_names: true,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Директива фильтра.
    ///
    /// Голый уровень применяется к этому крейту, остальные крейты
    /// ограничиваются `warn`. Строка с `=` или `,` используется как есть.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.trim();
        if level.contains('=') || level.contains(',') {
            level.to_string()
        } else {
            format!("warn,{}={level}", env!("CARGO_PKG_NAME"))
        }
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        let directive = self.build_filter_directive();
        EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidDirective {
            directive: directive.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn ensure_log_dir(&self) -> Result<(), LoggingError> {
        if let Some(file) = &self.file {
            std::fs::create_dir_all(&file.dir)?;
        }
        Ok(())
    }
}
