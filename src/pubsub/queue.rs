use std::{
    fmt,
    num::NonZeroUsize,
    sync::atomic::{AtomicU64, Ordering},
};

use crossbeam::queue::{ArrayQueue, SegQueue};

/// Политика переполнения очереди подписчика.
///
/// Выбирается на уровне `Broadcaster` и применяется ко всем подписчикам,
/// которых он создаёт. Публикация никогда не завершается ошибкой, поэтому
/// варианта "отклонить" нет: при переполнении теряется одно сообщение
/// и увеличивается счётчик `dropped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Очередь растёт без ограничений.
    #[default]
    Unbounded,
    /// При заполнении вытесняется самое старое сообщение.
    DropOldest(NonZeroUsize),
    /// При заполнении отбрасывается новое сообщение.
    DropNewest(NonZeroUsize),
}

impl OverflowPolicy {
    /// Ёмкость очереди, если она ограничена.
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        match self {
            Self::Unbounded => None,
            Self::DropOldest(cap) | Self::DropNewest(cap) => Some(*cap),
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::DropOldest(cap) => write!(f, "drop_oldest({cap})"),
            Self::DropNewest(cap) => write!(f, "drop_newest({cap})"),
        }
    }
}

enum Storage<T> {
    Unbounded(SegQueue<T>),
    Bounded(ArrayQueue<T>),
}

/// Входящая FIFO-очередь подписчика.
///
/// Безопасна для конкурентных `enqueue`/`try_dequeue` из любого числа
/// потоков (MPMC), дополнительная синхронизация не нужна.
pub(crate) struct MessageQueue<T> {
    storage: Storage<T>,
    policy: OverflowPolicy,
    dropped: AtomicU64,
}

impl<T> MessageQueue<T> {
    pub(crate) fn new(policy: OverflowPolicy) -> Self {
        let storage = match policy {
            OverflowPolicy::Unbounded => Storage::Unbounded(SegQueue::new()),
            OverflowPolicy::DropOldest(cap) | OverflowPolicy::DropNewest(cap) => {
                Storage::Bounded(ArrayQueue::new(cap.get()))
            }
        };
        Self {
            storage,
            policy,
            dropped: AtomicU64::new(0),
        }
    }

    /// Кладёт элемент в очередь согласно политике.
    ///
    /// Возвращает `false`, только если новый элемент был отброшен
    /// (`DropNewest` при полной очереди).
    pub(crate) fn enqueue(
        &self,
        item: T,
    ) -> bool {
        match (&self.storage, self.policy) {
            (Storage::Unbounded(queue), _) => {
                queue.push(item);
                true
            }
            (Storage::Bounded(queue), OverflowPolicy::DropNewest(_)) => {
                if queue.push(item).is_err() {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    return false;
                }
                true
            }
            (Storage::Bounded(queue), _) => {
                if queue.force_push(item).is_some() {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
                true
            }
        }
    }

    pub(crate) fn try_dequeue(&self) -> Option<T> {
        match &self.storage {
            Storage::Unbounded(queue) => queue.pop(),
            Storage::Bounded(queue) => queue.pop(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.storage {
            Storage::Unbounded(queue) => queue.len(),
            Storage::Bounded(queue) => queue.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match &self.storage {
            Storage::Unbounded(queue) => queue.is_empty(),
            Storage::Bounded(queue) => queue.is_empty(),
        }
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}
