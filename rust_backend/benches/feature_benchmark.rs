use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dsi_rust::io::synthetic::SyntheticDataGenerator;
use dsi_rust::preprocessing::pipeline::FeatureBuilder;

fn bench_feature_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_building");

    for days in [7usize, 30, 90] {
        let events = SyntheticDataGenerator::with_shape(42, days, 3).generate();
        group.bench_with_input(BenchmarkId::new("build", days), &events, |b, events| {
            let builder = FeatureBuilder::new();
            b.iter(|| builder.build(black_box(events)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_feature_building);
criterion_main!(benches);
