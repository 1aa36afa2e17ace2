use std::{
    hint::black_box,
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crossbeam::utils::Backoff;
use fanout::{Broadcaster, OverflowPolicy, SubscriberHandle};

/// Ограниченная очередь, чтобы память не росла во время замеров.
fn bounded() -> OverflowPolicy {
    OverflowPolicy::DropOldest(NonZeroUsize::new(1024).unwrap())
}

fn bench_subscribe(c: &mut Criterion) {
    let hub: Broadcaster<u64> = Broadcaster::new();
    c.bench_function("subscribe_and_drop", |b| {
        b.iter(|| {
            let sub = black_box(hub.subscribe());
            drop(sub);
        });
        // мёртвые записи чистятся только при broadcast
        hub.broadcast(0);
    });
}

fn bench_broadcast_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_width");
    for width in [1usize, 10, 100] {
        let hub = Broadcaster::with_policy(bounded());
        let _subs: Vec<SubscriberHandle<u64>> = (0..width).map(|_| hub.subscribe()).collect();

        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                black_box(hub.broadcast(i));
            })
        });
    }
    group.finish();
}

fn bench_broadcast_contended(c: &mut Criterion) {
    let hub = Arc::new(Broadcaster::with_policy(bounded()));
    let stop = Arc::new(AtomicBool::new(false));

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let sub = hub.subscribe();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let backoff = Backoff::new();
                while !stop.load(Ordering::Relaxed) {
                    match sub.receive() {
                        Some(msg) => {
                            black_box(*msg);
                            backoff.reset();
                        }
                        None => backoff.snooze(),
                    }
                }
            })
        })
        .collect();

    c.bench_function("broadcast_4_draining_consumers", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            black_box(hub.broadcast(i));
        })
    });

    stop.store(true, Ordering::Relaxed);
    for consumer in consumers {
        let _ = consumer.join();
    }
}

criterion_group!(
    benches,
    bench_subscribe,
    bench_broadcast_width,
    bench_broadcast_contended
);
criterion_main!(benches);
