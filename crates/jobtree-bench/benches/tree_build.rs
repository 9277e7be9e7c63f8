use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jobtree_bench::synthetic_jobs;
use jobtree_graph::JobTreeConverter;
use std::hint::black_box;

fn bench_tree_build(c: &mut Criterion) {
    let converter = JobTreeConverter::new();
    let mut group = c.benchmark_group("tree_build");
    for count in [100, 500, 2000] {
        let jobs = synthetic_jobs(count, 4);
        group.bench_with_input(BenchmarkId::from_parameter(count), &jobs, |b, jobs| {
            b.iter(|| black_box(converter.convert(black_box(jobs))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tree_build);
criterion_main!(benches);
