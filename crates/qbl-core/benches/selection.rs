use criterion::{black_box, criterion_group, criterion_main, Criterion};

use qbl_core::select::select;
use qbl_core::{seeded_rng, AvoidSet, Choice, Constraints, Question, TagQuota};

fn make_pool(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            id: format!("q{i}"),
            stem: format!("Question {i}?"),
            choices: vec![Choice::new("yes", true), Choice::new("no", false)],
            tags: [format!("unit{}", i % 12), format!("level{}", i % 3)]
                .into_iter()
                .collect(),
            explanation: None,
            source_file: "bench.qbl".into(),
            line: i * 6 + 1,
            raw_order_index: i,
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let pool = make_pool(5000);

    let plain = Constraints::default();

    let mut quotas = Constraints::default();
    for unit in 0..12 {
        quotas.add_quota(TagQuota {
            tag: format!("unit{unit}"),
            count: 3,
        });
    }
    quotas.exclude.insert("level2".into());

    let avoid: AvoidSet = (0..5000).step_by(3).map(|i| format!("q{i}")).collect();

    group.bench_function("fill_only_50", |b| {
        b.iter(|| {
            select(
                black_box(&pool),
                50,
                &plain,
                &AvoidSet::new(),
                &mut seeded_rng(42),
            )
        })
    });

    group.bench_function("quotas_and_avoid_50", |b| {
        b.iter(|| select(black_box(&pool), 50, &quotas, &avoid, &mut seeded_rng(42)))
    });

    group.finish();
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
