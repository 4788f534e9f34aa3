//! Run these benches with `cargo bench --bench derived -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use model_sounding::{ReferenceRun, RunTime, SpeedUnit, StationInfo};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(derived_benches);

criterion_group!(
    name = derived_benches;
    config = build_tester();
    targets = assemble_bench, derive_sounding_bench
);

fn assemble_bench(c: &mut Criterion) {
    let columns = utils::model_columns();

    c.bench_function("assemble", |b| {
        b.iter(|| {
            let _x = model_sounding::assemble(columns.clone(), 5);
        });
    });
}

fn derive_sounding_bench(c: &mut Criterion) {
    let profile = model_sounding::assemble(utils::model_columns(), 5).expect("bad columns");
    let run = ReferenceRun::new(RunTime::Latest, chrono::Duration::hours(0));

    c.bench_function("derive_sounding", |b| {
        b.iter(|| {
            let _x = model_sounding::derive_sounding(
                &profile,
                run,
                StationInfo::new(),
                SpeedUnit::KilometersPerHour,
            );
        });
    });
}
