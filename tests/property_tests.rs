//! Property-based тесты для вещателя.
//!
//! Генерируют случайные последовательности операций и сверяют поведение
//! `Broadcaster` с простой моделью на `VecDeque`.

use std::{collections::VecDeque, num::NonZeroUsize};

use fanout::{Broadcaster, OverflowPolicy, SubscriberHandle};
use proptest::prelude::*;

/// Базовая настройка proptest - количество итераций
const PROPTEST_CASES: u32 = 256;

#[derive(Debug, Clone)]
enum Op {
    Subscribe,
    Unsubscribe(usize),
    Drop(usize),
    Broadcast(u32),
    Receive(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Subscribe),
        1 => any::<usize>().prop_map(Op::Unsubscribe),
        1 => any::<usize>().prop_map(Op::Drop),
        4 => any::<u32>().prop_map(Op::Broadcast),
        3 => any::<usize>().prop_map(Op::Receive),
    ]
}

/// Модель подписчика: ожидаемая очередь и флаг.
struct Model {
    handle: Option<SubscriberHandle<u32>>,
    expected: VecDeque<u32>,
    active: bool,
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: PROPTEST_CASES,
        ..ProptestConfig::default()
    })]

    /// Проверяет, что каждый живой подписчик получает ровно те сообщения,
    /// которые были опубликованы, пока он был активен, в порядке публикации.
    #[test]
    fn prop_matches_queue_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let hub = Broadcaster::new();
        let mut subs: Vec<Model> = Vec::new();

        for op in ops {
            match op {
                Op::Subscribe => subs.push(Model {
                    handle: Some(hub.subscribe()),
                    expected: VecDeque::new(),
                    active: true,
                }),
                Op::Unsubscribe(i) if !subs.is_empty() => {
                    let n = subs.len();
                    let m = &mut subs[i % n];
                    if let Some(h) = &m.handle {
                        hub.unsubscribe(h);
                        m.active = false;
                    }
                }
                Op::Drop(i) if !subs.is_empty() => {
                    let n = subs.len();
                    subs[i % n].handle = None;
                }
                Op::Broadcast(v) => {
                    let mut live = 0;
                    for m in subs.iter_mut().filter(|m| m.handle.is_some() && m.active) {
                        m.expected.push_back(v);
                        live += 1;
                    }
                    prop_assert_eq!(hub.broadcast(v), live);
                }
                Op::Receive(i) if !subs.is_empty() => {
                    let n = subs.len();
                    let m = &mut subs[i % n];
                    if let Some(h) = &m.handle {
                        prop_assert_eq!(h.receive().map(|msg| *msg), m.expected.pop_front());
                    }
                }
                _ => {}
            }
        }

        for m in subs.iter_mut() {
            if let Some(h) = &m.handle {
                let rest: Vec<u32> = h.drain().map(|msg| *msg).collect();
                prop_assert_eq!(rest, m.expected.drain(..).collect::<Vec<_>>());
                prop_assert_eq!(h.is_active(), m.active);
            }
        }

        // После очередной публикации в реестре остаются только живые активные.
        hub.broadcast(0);
        let live = subs.iter().filter(|m| m.handle.is_some() && m.active).count();
        prop_assert_eq!(hub.subscriber_count(), live);
    }

    /// Проверяет, что повторная отписка эквивалентна однократной.
    #[test]
    fn prop_unsubscribe_idempotent(
        before in prop::collection::vec(any::<u32>(), 0..50),
        after in prop::collection::vec(any::<u32>(), 0..50),
        repeats in 1usize..5,
    ) {
        let hub = Broadcaster::new();
        let sub = hub.subscribe();

        for v in &before {
            hub.broadcast(*v);
        }
        for _ in 0..repeats {
            hub.unsubscribe(&sub);
        }
        for v in &after {
            hub.broadcast(*v);
        }

        let got: Vec<u32> = sub.drain().map(|m| *m).collect();
        prop_assert_eq!(got, before);
        prop_assert_eq!(hub.stats().pruned_inactive, u64::from(!after.is_empty()));
    }

    /// Проверяет, что ограниченная очередь с вытеснением хранит хвост
    /// последовательности и честно считает потери.
    #[test]
    fn prop_drop_oldest_keeps_tail(
        values in prop::collection::vec(any::<u32>(), 0..300),
        capacity in 1usize..32,
    ) {
        let policy = OverflowPolicy::DropOldest(NonZeroUsize::new(capacity).unwrap());
        let hub = Broadcaster::with_policy(policy);
        let sub = hub.subscribe();

        for v in &values {
            hub.broadcast(*v);
        }

        let kept = values.len().min(capacity);
        let got: Vec<u32> = sub.drain().map(|m| *m).collect();
        prop_assert_eq!(&got[..], &values[values.len() - kept..]);
        prop_assert_eq!(sub.dropped(), (values.len() - kept) as u64);
    }
}
