use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geotree::address::format_address;
use geotree::{IpRange, RangeTree};
use rand::Rng;
use std::hint::black_box;

/// Disjoint 256-address ranges spread across the address space, in reverse order
fn generate_ranges(count: usize) -> Vec<IpRange> {
    let stride = u32::MAX / count as u32;
    (0..count as u32)
        .map(|i| {
            let start = i * stride;
            IpRange::new(start, start + 255, format!("C{}", i % 250)).unwrap()
        })
        .rev()
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_tree_build");

    // 250k crosses the parallel sort threshold
    for count in [1_000, 10_000, 100_000, 250_000] {
        let ranges = generate_ranges(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &ranges, |b, ranges| {
            b.iter(|| black_box(RangeTree::from_ranges(ranges.clone())));
        });
    }

    group.finish();
}

fn bench_parse_and_build(c: &mut Criterion) {
    let records: Vec<Vec<String>> = generate_ranges(10_000)
        .into_iter()
        .map(|r| vec![format_address(r.start), format_address(r.end), r.country])
        .collect();

    c.bench_function("range_tree_new_10k_records", |b| {
        b.iter(|| black_box(RangeTree::new(&records)));
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_tree_lookup");
    let mut rng = rand::rng();

    for count in [1_000, 100_000] {
        let tree = RangeTree::from_ranges(generate_ranges(count));
        let addrs: Vec<u32> = (0..10_000).map(|_| rng.random()).collect();
        let texts: Vec<String> = addrs.iter().map(|a| format_address(*a)).collect();

        group.throughput(Throughput::Elements(addrs.len() as u64));
        group.bench_with_input(BenchmarkId::new("find_addr", count), &addrs, |b, addrs| {
            b.iter(|| {
                for addr in addrs {
                    black_box(tree.find_addr(*addr));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("find_str", count), &texts, |b, texts| {
            b.iter(|| {
                for text in texts {
                    black_box(tree.find(text));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_parse_and_build, bench_lookup);
criterion_main!(benches);
