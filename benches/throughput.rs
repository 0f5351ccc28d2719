//! Throughput Benchmark for emberkv
//!
//! Measures the request hot path: frame decoding, command dispatch, and
//! reply encoding, plus raw store operations.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use emberkv::commands::CommandTable;
use emberkv::config::ServerConfig;
use emberkv::protocol::{decode_command, Reply};
use emberkv::storage::KvStore;
use std::sync::Arc;

/// Benchmark frame decoding
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("decode_ping", |b| {
        let frame = b"*1\r\n$4\r\nPING\r\n";
        b.iter(|| {
            black_box(decode_command(frame).unwrap());
        });
    });

    group.bench_function("decode_set", |b| {
        let frame = b"*3\r\n$3\r\nSET\r\n$8\r\nuser:101\r\n$5\r\nember\r\n";
        b.iter(|| {
            black_box(decode_command(frame).unwrap());
        });
    });

    group.bench_function("decode_set_large_value", |b| {
        let value = "x".repeat(4096);
        let frame = format!("*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n${}\r\n{}\r\n", value.len(), value);
        b.iter(|| {
            black_box(decode_command(frame.as_bytes()).unwrap());
        });
    });

    group.finish();
}

/// Benchmark reply encoding
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("encode_simple", |b| {
        let reply = Reply::ok();
        b.iter(|| black_box(reply.encode()));
    });

    group.bench_function("encode_bulk", |b| {
        let reply = Reply::bulk(Bytes::from("x".repeat(1024)));
        b.iter(|| black_box(reply.encode()));
    });

    group.bench_function("encode_array", |b| {
        let reply = Reply::array(vec![
            Reply::bulk(Bytes::from("dir")),
            Reply::bulk(Bytes::from("/tmp")),
        ]);
        b.iter(|| black_box(reply.encode()));
    });

    group.finish();
}

/// Benchmark store operations
fn bench_store(c: &mut Criterion) {
    let store = Arc::new(KvStore::new());

    // Pre-populate with data
    for i in 0..100_000 {
        let key = Bytes::from(format!("key:{}", i));
        let value = Bytes::from(format!("value:{}", i));
        store.set(key, value, None);
    }

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("new:{}", i));
            store.set(key, Bytes::from("small_value"), None);
            i += 1;
        });
    });

    group.bench_function("set_with_ttl", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("ttl:{}", i));
            store.set(key, Bytes::from("value"), Some(3_600_000));
            i += 1;
        });
    });

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i % 100_000));
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("missing:{}", i));
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark the full decode-dispatch-encode pipeline
fn bench_pipeline(c: &mut Criterion) {
    let store = Arc::new(KvStore::new());
    let config = Arc::new(ServerConfig::default());
    let table = CommandTable::new(store, config);

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    group.bench_function("ping_roundtrip", |b| {
        let frame = b"*1\r\n$4\r\nPING\r\n";
        b.iter(|| {
            let (args, _) = decode_command(frame).unwrap();
            let reply = table.execute(&args);
            black_box(reply.encode());
        });
    });

    group.bench_function("set_get_roundtrip", |b| {
        let set = b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n";
        let get = b"*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n";
        b.iter(|| {
            let (args, _) = decode_command(set).unwrap();
            black_box(table.execute(&args).encode());
            let (args, _) = decode_command(get).unwrap();
            black_box(table.execute(&args).encode());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_store, bench_pipeline);

criterion_main!(benches);
