//! # Engine Benchmarks
//!
//! Tick throughput of the execution engine.
//!
//! Run with: `cargo bench -p vsgraph-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use vsgraph_core::nodes::{add, constant, print, relay};
use vsgraph_core::{
    BehaviorTable, EngineConfig, GraphAsset, GraphInstance, GraphManager, NodeHandle, Payload,
    SocketHandle, SocketType,
};

/// A relay chain of `size` hops ending in a printer. Entry socket is 1.
fn create_relay_chain(size: usize) -> GraphAsset {
    let mut asset = GraphAsset::new("chain");
    let mut upstream = None;

    for i in 0..size as u64 {
        let input = SocketHandle(2 * i + 1);
        let output = SocketHandle(2 * i + 2);
        asset = asset.with_node(relay::desc(NodeHandle(i + 1), input, output));
        if let Some(prev) = upstream {
            asset = asset.with_edge(i, prev, input);
        }
        upstream = Some(output);
    }

    let sink = SocketHandle(u64::MAX);
    asset = asset.with_node(print::desc(NodeHandle(u64::MAX), sink, SocketType::Signal, false));
    if let Some(last) = upstream {
        asset = asset.with_edge(size as u64, last, sink);
    }
    asset
}

/// A constant feeding `size` adders in a star. Trigger socket is 1.
fn create_add_star(size: usize) -> GraphAsset {
    let mut asset = GraphAsset::new("star").with_node(constant::desc(
        NodeHandle(1),
        SocketHandle(1),
        SocketHandle(2),
        None,
        Payload::Float(1.0),
    ));

    for i in 0..size as u64 {
        let base = 10 + 3 * i;
        asset = asset
            .with_node(add::desc(
                NodeHandle(base),
                SocketHandle(base),
                SocketHandle(base + 1),
                SocketHandle(base + 2),
            ))
            .with_edge(2 * i + 1, SocketHandle(2), SocketHandle(base))
            .with_edge(2 * i + 2, SocketHandle(2), SocketHandle(base + 1));
    }
    asset
}

fn activate(asset: &GraphAsset) -> GraphInstance {
    GraphInstance::activate(
        asset,
        Arc::new(BehaviorTable::builtin()),
        EngineConfig::default(),
    )
    .expect("activate")
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_signal_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_chain");

    for size in [10, 100, 1000].iter() {
        let mut instance = activate(&create_relay_chain(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                instance
                    .inject(SocketHandle(1), Payload::Signal)
                    .expect("inject");
                black_box(instance.tick().expect("tick"))
            });
        });
    }

    group.finish();
}

fn bench_data_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_fanout");

    for size in [10, 100, 1000].iter() {
        let mut instance = activate(&create_add_star(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                instance
                    .inject(SocketHandle(1), Payload::Signal)
                    .expect("inject");
                black_box(instance.tick().expect("tick"))
            });
        });
    }

    group.finish();
}

fn bench_activation(c: &mut Criterion) {
    let mut group = c.benchmark_group("activation");

    for size in [100, 1000].iter() {
        let asset = create_relay_chain(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(activate(&asset)));
        });
    }

    group.finish();
}

fn bench_tick_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_all");
    let asset = create_relay_chain(100);

    for instances in [4, 16].iter() {
        let mut manager = GraphManager::default();
        let ids: Vec<_> = (0..*instances)
            .map(|_| manager.activate(&asset).expect("activate"))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("sequential", instances),
            instances,
            |b, _| {
                b.iter(|| {
                    for id in &ids {
                        manager
                            .inject(*id, SocketHandle(1), Payload::Signal)
                            .expect("inject");
                    }
                    black_box(manager.tick_all())
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", instances),
            instances,
            |b, _| {
                b.iter(|| {
                    for id in &ids {
                        manager
                            .inject(*id, SocketHandle(1), Payload::Signal)
                            .expect("inject");
                    }
                    black_box(manager.tick_all_parallel())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_signal_chain,
    bench_data_fanout,
    bench_activation,
    bench_tick_all
);
criterion_main!(benches);
