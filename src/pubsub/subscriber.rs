use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam::utils::Backoff;

use super::{queue::MessageQueue, Message, OverflowPolicy};

/// Владеющая ссылка на подписчика, которую получает вызывающий код.
///
/// Может клонироваться; подписчик живёт, пока жив хотя бы один клон.
/// `Broadcaster` хранит только `Weak` и не продлевает жизнь подписчика.
pub type SubscriberHandle<T> = Arc<Subscriber<T>>;

/// Пауза между опросами после исчерпания `Backoff`.
const IDLE_SLEEP: Duration = Duration::from_micros(100);

/// Подписчик: собственная входящая очередь и флаг активности.
///
/// Флаг переключается только в одну сторону (`active` → `inactive`).
/// Неактивный подписчик больше не получает новых сообщений, но всё,
/// что уже лежит в очереди, остаётся доступным через [`Subscriber::receive`].
pub struct Subscriber<T> {
    id: u64,
    queue: MessageQueue<Message<T>>,
    active: AtomicBool,
}

impl<T> Subscriber<T> {
    pub(crate) fn new(
        id: u64,
        policy: OverflowPolicy,
    ) -> Self {
        Self {
            id,
            queue: MessageQueue::new(policy),
            active: AtomicBool::new(true),
        }
    }

    /// Неблокирующая попытка забрать следующее сообщение.
    ///
    /// `None` означает "сейчас сообщений нет" и не является ошибкой.
    pub fn receive(&self) -> Option<Message<T>> {
        self.queue.try_dequeue()
    }

    /// Текущее значение флага активности.
    ///
    /// После `false` в очереди ещё могут быть сообщения, их нужно дочитать.
    /// Все `enqueue`, сделанные потоком до `unsubscribe`, к этому моменту
    /// уже видны.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Идентификатор, уникальный в пределах породившего `Broadcaster`.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Приблизительное число ожидающих сообщений.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Сколько сообщений потеряно из-за политики переполнения.
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.queue.policy()
    }

    /// Итератор, вычитывающий очередь до пустоты.
    pub fn drain(&self) -> impl Iterator<Item = Message<T>> + '_ {
        std::iter::from_fn(move || self.receive())
    }

    /// Опрашивает очередь, пока не придёт сообщение или не истечёт `timeout`.
    ///
    /// Вспомогательный цикл для потребителей поверх [`Subscriber::receive`]:
    /// сначала spin/snooze через `Backoff`, затем короткие `sleep`.
    /// Возвращается сразу, если подписчик неактивен и очередь пуста.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Option<Message<T>> {
        let start = Instant::now();
        let backoff = Backoff::new();

        loop {
            if let Some(msg) = self.receive() {
                return Some(msg);
            }
            if !self.is_active() {
                // Флаг мог опередить последние enqueue.
                return self.receive();
            }
            if start.elapsed() >= timeout {
                return None;
            }
            if backoff.is_completed() {
                thread::sleep(IDLE_SLEEP);
            } else {
                backoff.snooze();
            }
        }
    }

    /// Однонаправленный переход в неактивное состояние.
    ///
    /// Возвращает `true`, если подписчик был активен до вызова.
    pub(crate) fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn enqueue(
        &self,
        msg: Message<T>,
    ) -> bool {
        self.queue.enqueue(msg)
    }
}

impl<T> std::fmt::Debug for Subscriber<T> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .field("pending", &self.len())
            .field("dropped", &self.dropped())
            .finish()
    }
}
