//! FILENAME: core/pivot-table/benches/pivot_build.rs
//! Build-pass throughput over synthetic sales data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pivot_table::{
    record, AggregationType, Dataset, NumberFormat, PivotFieldFactory, PivotTableFactory,
    PivotValue,
};

const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];

fn dataset(rows: usize) -> Dataset {
    (0..rows)
        .map(|i| {
            record([
                ("region", PivotValue::from(REGIONS[i % REGIONS.len()])),
                ("product", PivotValue::text(format!("P{:03}", (i * 7) % 200))),
                ("date", PivotValue::text(format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1))),
                ("amount", PivotValue::from((i % 1000) as f64 * 1.5)),
            ])
        })
        .collect()
}

fn configured(data: Dataset, aggregation: AggregationType) -> PivotTableFactory {
    PivotTableFactory::instance(data)
        .with_column_fields(vec![PivotFieldFactory::month("date").unwrap()])
        .unwrap()
        .with_row_fields(vec![
            PivotFieldFactory::default("region").unwrap(),
            PivotFieldFactory::default("product").unwrap(),
        ])
        .unwrap()
        .with_data_field(PivotFieldFactory::float("amount").unwrap())
        .with_aggregation(aggregation)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for rows in [1_000, 10_000, 100_000] {
        let factory = configured(dataset(rows), AggregationType::Sum);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &factory, |b, f| {
            b.iter(|| black_box(f.create().unwrap()))
        });
    }
    group.finish();
}

fn bench_aggregations(c: &mut Criterion) {
    let data = dataset(10_000);
    let mut group = c.benchmark_group("aggregation");
    for aggregation in [AggregationType::Sum, AggregationType::Average, AggregationType::StdDev] {
        let factory = configured(data.clone(), aggregation);
        group.bench_function(aggregation.name(), |b| {
            b.iter(|| black_box(cell_count(&factory)))
        });
    }
    group.finish();
}

fn cell_count(factory: &PivotTableFactory) -> usize {
    factory
        .create()
        .unwrap()
        .map(|t| t.cells().len())
        .unwrap_or(0)
}

fn bench_view(c: &mut Criterion) {
    let table = configured(dataset(10_000), AggregationType::Sum)
        .create()
        .unwrap()
        .unwrap();
    c.bench_function("view", |b| {
        b.iter(|| black_box(table.view(&NumberFormat::General)))
    });
}

criterion_group!(benches, bench_build, bench_aggregations, bench_view);
criterion_main!(benches);
