use std::time::Instant;

use tracing_appender::non_blocking::WorkerGuard;

/// Handle для управления lifecycle логирования.
///
/// Держит guard файлового sink-а; пока handle жив, фоновый writer работает.
pub struct LoggingHandle {
    file_guard: Option<WorkerGuard>,
}

impl LoggingHandle {
    pub fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self { file_guard }
    }

    /// Включён ли файловый sink.
    pub fn has_file_sink(&self) -> bool {
        self.file_guard.is_some()
    }

    /// Сбрасывает буферы и останавливает фоновый writer.
    pub fn shutdown(mut self) {
        let start = Instant::now();
        let had_file = self.file_guard.is_some();

        tracing::info!(file_sink = had_file, "Initiating logging shutdown");
        drop(self.file_guard.take());

        if had_file {
            // В файл это уже не попадёт, только в консоль.
            tracing::debug!(
                shutdown_duration_ms = start.elapsed().as_millis() as u64,
                "Logging shutdown completed"
            );
        }
    }
}

impl std::fmt::Debug for LoggingHandle {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LoggingHandle")
            .field("file_sink", &self.has_file_sink())
            .finish()
    }
}
