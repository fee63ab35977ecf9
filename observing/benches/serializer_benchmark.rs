use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::hint::black_box;
use ts_observing::models::{ObservingBlock, ObservingScript, SchedulingConstraint, ScriptConfiguration};
use ts_observing::serialization::{quoting_reason, Serializer};

fn track_target_config() -> ScriptConfiguration {
    ScriptConfiguration::from_json(json!({
        "target_name": "HD 164461",
        "slew_icrs": {"ra": "18:00:00", "dec": "-30:00:00"},
        "rot_value": 0.0,
        "filters": ["r", "i", "z"],
        "visits": [{"band": "r", "exptime": 30.0, "nexp": 2}, {"band": "i", "exptime": 15.0, "nexp": 4}],
        "ignore": ["mtdome", "mtptg"],
        "track_for": 300,
    }))
    .unwrap()
}

fn block_with_scripts(count: usize) -> ObservingBlock {
    let scripts = (0..count)
        .map(|i| ObservingScript::new(format!("maintel/script_{}.py", i), i % 2 == 0, track_target_config()).unwrap())
        .collect();
    let constraints = vec![
        SchedulingConstraint::airmass(1.5).unwrap(),
        SchedulingConstraint::altitude(Some(30.0), Some(85.0)).unwrap(),
    ];
    ObservingBlock::build("BENCH", scripts, constraints).unwrap()
}

fn bench_quoting(c: &mut Criterion) {
    let mut group = c.benchmark_group("quoting");

    let inputs = ["W48", "+01:23:45", "10:00:00", "true", "1.5e10", "HD 164461", "value # comment"];
    group.bench_function("quoting_reason", |b| {
        b.iter(|| {
            for input in inputs {
                black_box(quoting_reason(black_box(input)));
            }
        });
    });

    group.finish();
}

fn bench_configuration(c: &mut Criterion) {
    let mut group = c.benchmark_group("configuration");

    let config = track_target_config();
    group.bench_function("render", |b| {
        b.iter(|| black_box(config.render()));
    });

    let text = config.render();
    group.bench_function("parse", |b| {
        b.iter(|| ScriptConfiguration::parse(black_box(&text)));
    });

    group.finish();
}

fn bench_block_documents(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_documents");
    let serializer = Serializer::default();

    for count in [1usize, 10, 100] {
        let block = block_with_scripts(count);
        group.bench_with_input(BenchmarkId::new("dump", count), &block, |b, block| {
            b.iter(|| serializer.dump(black_box(block)));
        });

        let text = serializer.dump(&block).unwrap();
        group.bench_with_input(BenchmarkId::new("load", count), &text, |b, text| {
            b.iter(|| serializer.load(black_box(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_quoting, bench_configuration, bench_block_documents);
criterion_main!(benches);
