//! Внутрипроцессное вещание "один издатель — много подписчиков".
//!
//! - `broadcaster`: реестр подписчиков (`Weak`-ссылки), `subscribe`,
//!   `unsubscribe`, `broadcast` и ленивая очистка реестра.
//! - `message`: разделяемое неизменяемое сообщение на базе `Arc`.
//! - `queue` (приватный): MPMC-очередь подписчика и политика переполнения.
//! - `subscriber`: очередь подписчика и флаг активности.
//!
//! Издатель никогда не блокируется на медленных подписчиках: каждый
//! подписчик читает свою очередь сам, `Broadcaster` в этом не участвует.

pub mod broadcaster;
pub mod message;
mod queue;
pub mod subscriber;

pub use broadcaster::*;
pub use message::*;
pub use queue::OverflowPolicy;
pub use subscriber::*;
