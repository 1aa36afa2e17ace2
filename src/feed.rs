//! Рассылка котировок: один издатель, несколько потребителей в потоках.
//!
//! Собирает ядро `pubsub` в законченный сценарий: издатель публикует
//! `PriceUpdate` с заданным интервалом, каждый потребитель читает свою
//! очередь, а по завершении издатель отписывает всех, и потребители
//! дочитывают остаток очереди.

use std::{thread, time::Duration};

use rand::Rng;
use tracing::{debug, info, info_span};

use crate::{
    config::FeedSettings,
    pubsub::{Broadcaster, OverflowPolicy, SubscriberHandle},
};

/// Сколько потребитель ждёт следующего сообщения, прежде чем перепроверить
/// флаг активности.
const POLL_TIMEOUT: Duration = Duration::from_millis(5);

/// Обновление цены по инструменту.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceUpdate {
    pub symbol_id: u32,
    pub price: f64,
    /// Микросекунды с начала эпохи.
    pub timestamp: i64,
    /// Порядковый номер публикации, начиная с 0.
    pub seq: u64,
}

/// Итог работы одного потребителя.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerReport {
    pub subscriber_id: u64,
    pub received: u64,
    pub dropped: u64,
    pub last_price: Option<f64>,
    /// `true`, если номера `seq` шли строго по возрастанию.
    pub in_order: bool,
}

/// Итог прогона.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedReport {
    pub published: u64,
    pub consumers: Vec<ConsumerReport>,
}

impl FeedReport {
    /// Все ли потребители получили каждое опубликованное сообщение.
    pub fn is_lossless(&self) -> bool {
        self.consumers
            .iter()
            .all(|c| c.received == self.published && c.dropped == 0)
    }
}

pub struct Feed {
    settings: FeedSettings,
    policy: OverflowPolicy,
}

impl Feed {
    pub fn new(
        settings: FeedSettings,
        policy: OverflowPolicy,
    ) -> Self {
        Self { settings, policy }
    }

    /// Запускает издателя в текущем потоке и потребителей в scoped-потоках.
    ///
    /// Возвращается, когда все потребители дочитали свои очереди.
    pub fn run(&self) -> FeedReport {
        let broadcaster = Broadcaster::with_policy(self.policy);
        let handles: Vec<SubscriberHandle<PriceUpdate>> = (0..self.settings.consumers)
            .map(|_| broadcaster.subscribe())
            .collect();

        info!(
            consumers = handles.len(),
            messages = self.settings.messages,
            interval_ms = self.settings.interval_ms,
            policy = %self.policy,
            "Starting price feed"
        );

        let consumers = thread::scope(|scope| {
            let workers: Vec<_> = handles
                .iter()
                .map(|handle| {
                    let sub = SubscriberHandle::clone(handle);
                    scope.spawn(move || consume(&sub))
                })
                .collect();

            self.produce(&broadcaster);

            for handle in &handles {
                broadcaster.unsubscribe(handle);
            }

            workers
                .into_iter()
                .map(|w| w.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect::<Vec<_>>()
        });

        let stats = broadcaster.stats();
        info!(
            published = stats.broadcasts,
            deliveries = stats.deliveries,
            "Price feed stopped"
        );

        FeedReport {
            published: stats.broadcasts,
            consumers,
        }
    }

    fn produce(
        &self,
        broadcaster: &Broadcaster<PriceUpdate>,
    ) {
        let mut rng = rand::thread_rng();
        let interval = Duration::from_millis(self.settings.interval_ms);

        for seq in 0..self.settings.messages {
            let update = PriceUpdate {
                symbol_id: self.settings.symbol_id,
                price: 100.0 + f64::from(rng.gen_range(0..100u32)) / 100.0,
                timestamp: chrono::Utc::now().timestamp_micros(),
                seq,
            };
            let delivered = broadcaster.broadcast(update);
            debug!(seq, price = update.price, delivered, "Published update");

            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }
    }
}

/// Цикл потребителя: ждёт сообщения, а после отписки дочитывает очередь.
fn consume(sub: &SubscriberHandle<PriceUpdate>) -> ConsumerReport {
    let _span = info_span!("consumer", subscriber_id = sub.id()).entered();
    let mut report = ConsumerReport {
        subscriber_id: sub.id(),
        received: 0,
        dropped: 0,
        last_price: None,
        in_order: true,
    };
    let mut last_seq: Option<u64> = None;

    let mut on_update = |update: &PriceUpdate| {
        if last_seq.is_some_and(|prev| update.seq <= prev) {
            report.in_order = false;
        }
        last_seq = Some(update.seq);
        report.received += 1;
        report.last_price = Some(update.price);
        debug!(
            symbol_id = update.symbol_id,
            price = update.price,
            timestamp = update.timestamp,
            "Processed update"
        );
    };

    loop {
        if let Some(update) = sub.recv_timeout(POLL_TIMEOUT) {
            on_update(&update);
            continue;
        }
        if !sub.is_active() {
            sub.drain().for_each(|update| on_update(&update));
            break;
        }
    }

    report.dropped = sub.dropped();
    info!(
        received = report.received,
        dropped = report.dropped,
        "Consumer stopped"
    );
    report
}
