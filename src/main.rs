//! Демонстрация вещателя на потоке котировок.
//!
//! Загружает настройки (файл + `FANOUT_*`), применяет флаги командной строки,
//! запускает издателя и потребителей и пишет итог в лог.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fanout::{init_logging, Feed, OverflowKind, Settings};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fanout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Single-producer / multi-subscriber price feed demo", long_about = None)]
struct Cli {
    /// Файл настроек (toml/json/yaml)
    #[arg(short, long, env = "FANOUT_CONFIG")]
    config: Option<PathBuf>,
    /// Количество потребителей
    #[arg(long)]
    consumers: Option<usize>,
    /// Количество публикуемых сообщений
    #[arg(long)]
    messages: Option<u64>,
    /// Пауза между публикациями, мс
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Ёмкость очереди подписчика
    #[arg(long)]
    capacity: Option<usize>,
    /// Политика переполнения очереди
    #[arg(long, value_enum)]
    overflow: Option<OverflowKind>,
    /// Подробный вывод (debug)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Только warn/error
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn apply(
        &self,
        settings: &mut Settings,
    ) {
        if let Some(n) = self.consumers {
            settings.feed.consumers = n;
        }
        if let Some(n) = self.messages {
            settings.feed.messages = n;
        }
        if let Some(ms) = self.interval_ms {
            settings.feed.interval_ms = ms;
        }
        if let Some(cap) = self.capacity {
            settings.hub.capacity = Some(cap);
        }
        if let Some(kind) = self.overflow {
            settings.hub.overflow = kind;
        }
        if self.verbose {
            settings.logging.level = "debug".to_string();
        } else if self.quiet {
            settings.logging.level = "warn".to_string();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    cli.apply(&mut settings);
    settings.validate().context("invalid settings")?;

    let logging = init_logging(settings.logging.clone()).context("failed to init logging")?;
    let policy = settings.hub.policy()?;

    let report = Feed::new(settings.feed.clone(), policy).run();

    for consumer in &report.consumers {
        info!(
            subscriber_id = consumer.subscriber_id,
            received = consumer.received,
            dropped = consumer.dropped,
            last_price = consumer.last_price,
            "Consumer summary"
        );
    }
    if report.is_lossless() {
        info!(published = report.published, "All consumers received every update");
    } else {
        warn!(
            published = report.published,
            %policy,
            "Some updates were dropped by the overflow policy"
        );
    }

    logging.shutdown();
    Ok(())
}
