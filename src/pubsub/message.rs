use std::{fmt, ops::Deref, sync::Arc};

/// Опубликованное сообщение.
///
/// Создаётся один раз на каждый вызов `broadcast` и разделяется между всеми
/// подписчиками без копирования полезной нагрузки: каждый подписчик получает
/// клон `Arc`, указывающий на один и тот же экземпляр. Память освобождается,
/// когда последний владелец отпускает сообщение.
pub struct Message<T> {
    inner: Arc<T>,
}

impl<T> Message<T> {
    /// Упаковывает значение в разделяемый контейнер.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Возвращает `true`, если оба сообщения указывают на один экземпляр.
    pub fn ptr_eq(
        this: &Self,
        other: &Self,
    ) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    /// Количество живых владельцев сообщения (включая очереди подписчиков).
    pub fn owners(this: &Self) -> usize {
        Arc::strong_count(&this.inner)
    }

    /// Возвращает внутренний `Arc`.
    pub fn into_arc(self) -> Arc<T> {
        self.inner
    }
}

impl<T> Clone for Message<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Deref for Message<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> AsRef<T> for Message<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

impl<T> From<Arc<T>> for Message<T> {
    fn from(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

impl<T: fmt::Debug> fmt::Debug for Message<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_tuple("Message").field(&*self.inner).finish()
    }
}

impl<T: PartialEq> PartialEq for Message<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        *self.inner == *other.inner
    }
}

impl<T: Eq> Eq for Message<T> {}
