use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Weak,
};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{Message, OverflowPolicy, Subscriber, SubscriberHandle};

/// Снимок счётчиков `Broadcaster`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastStats {
    /// Общее количество вызовов `broadcast`.
    pub broadcasts: u64,
    /// Сообщения, принятые очередями подписчиков.
    pub deliveries: u64,
    /// Общее количество вызовов `subscribe`.
    pub subscriptions: u64,
    /// Записи реестра, удалённые после смерти подписчика.
    pub pruned_dead: u64,
    /// Записи реестра, удалённые после `unsubscribe`.
    pub pruned_inactive: u64,
}

#[derive(Default)]
struct Counters {
    broadcasts: AtomicU64,
    deliveries: AtomicU64,
    subscriptions: AtomicU64,
    pruned_dead: AtomicU64,
    pruned_inactive: AtomicU64,
}

/// Вещатель: один издатель, сколько угодно независимых подписчиков.
///
/// Реестр хранит только `Weak`-ссылки, поэтому не держит подписчиков
/// живыми. Мёртвые и отписавшиеся подписчики удаляются лениво, во время
/// очередного `broadcast`. Все методы безопасны для вызова из разных потоков.
pub struct Broadcaster<T> {
    /// Реестр в порядке подписки.
    subscribers: Mutex<Vec<Weak<Subscriber<T>>>>,
    /// Политика переполнения для новых подписчиков.
    policy: OverflowPolicy,
    /// Источник идентификаторов подписчиков.
    next_id: AtomicU64,
    counters: Counters,
}

impl<T> Broadcaster<T> {
    /// Создаёт вещатель с неограниченными очередями.
    pub fn new() -> Self {
        Self::with_policy(OverflowPolicy::Unbounded)
    }

    /// Создаёт вещатель с заданной политикой переполнения.
    pub fn with_policy(policy: OverflowPolicy) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            policy,
            next_id: AtomicU64::new(1),
            counters: Counters::default(),
        }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Регистрирует нового подписчика.
    ///
    /// Подписчик начинает с пустой очереди и получает только сообщения,
    /// опубликованные после того, как регистрация захватила мьютекс реестра.
    pub fn subscribe(&self) -> SubscriberHandle<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let sub = Arc::new(Subscriber::new(id, self.policy));

        self.subscribers.lock().push(Arc::downgrade(&sub));
        self.counters.subscriptions.fetch_add(1, Ordering::Relaxed);

        debug!(subscriber_id = id, policy = %self.policy, "subscriber registered");
        sub
    }

    /// Помечает подписчика неактивным.
    ///
    /// Из реестра он удаляется при следующем `broadcast`. Очередь не
    /// очищается: уже доставленные сообщения можно дочитать. Повторный вызов
    /// ничего не делает.
    pub fn unsubscribe(
        &self,
        handle: &SubscriberHandle<T>,
    ) {
        if handle.deactivate() {
            debug!(
                subscriber_id = handle.id(),
                pending = handle.len(),
                "subscriber deactivated"
            );
        }
    }

    /// Рассылает `item` всем активным подписчикам.
    ///
    /// Значение упаковывается в [`Message`] один раз; каждый подписчик получает
    /// клон `Arc`. Попутно из реестра удаляются мёртвые и неактивные записи.
    /// Никогда не блокируется на медленных подписчиках и не завершается ошибкой.
    ///
    /// Возвращает количество очередей, принявших сообщение.
    pub fn broadcast(
        &self,
        item: T,
    ) -> usize {
        let msg = Message::new(item);
        let mut delivered = 0usize;
        let mut dead = 0u64;
        let mut inactive = 0u64;

        {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|weak| {
                let Some(sub) = weak.upgrade() else {
                    dead += 1;
                    return false;
                };
                if !sub.is_active() {
                    trace!(subscriber_id = sub.id(), "pruning inactive subscriber");
                    inactive += 1;
                    return false;
                }
                if sub.enqueue(msg.clone()) {
                    delivered += 1;
                }
                true
            });
        }

        self.counters.broadcasts.fetch_add(1, Ordering::Relaxed);
        self.counters
            .deliveries
            .fetch_add(delivered as u64, Ordering::Relaxed);
        if dead > 0 {
            trace!(count = dead, "pruned dropped subscribers");
            self.counters.pruned_dead.fetch_add(dead, Ordering::Relaxed);
        }
        if inactive > 0 {
            self.counters
                .pruned_inactive
                .fetch_add(inactive, Ordering::Relaxed);
        }

        delivered
    }

    /// Количество записей в реестре, включая ещё не удалённые лениво.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn stats(&self) -> BroadcastStats {
        BroadcastStats {
            broadcasts: self.counters.broadcasts.load(Ordering::Relaxed),
            deliveries: self.counters.deliveries.load(Ordering::Relaxed),
            subscriptions: self.counters.subscriptions.load(Ordering::Relaxed),
            pruned_dead: self.counters.pruned_dead.load(Ordering::Relaxed),
            pruned_inactive: self.counters.pruned_inactive.load(Ordering::Relaxed),
        }
    }
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Broadcaster<T> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("policy", &self.policy)
            .field("subscribers", &self.subscriber_count())
            .field("stats", &self.stats())
            .finish()
    }
}
