use criterion::{criterion_group, criterion_main, Criterion};
use matchlens::config::ExplainConfig;
use matchlens::diff::generate_diff;
use matchlens::explain::{Explanation, FieldOrder, ScoredComparisonRecord};
use serde_json::{json, Map};
use std::hint::black_box;

fn wide_record(fields: usize) -> ScoredComparisonRecord {
    let mut values = Map::new();
    let mut total = -10.0;
    for i in 0..fields {
        let bf = 0.5 + i as f64;
        values.insert(format!("gamma_field_{:02}", i), json!(i % 4));
        values.insert(format!("bf_field_{:02}", i), json!(bf));
        values.insert(format!("bf_tf_adj_field_{:02}", i), json!(1.25));
        total += bf.log2() + 1.25f64.log2();
    }
    values.insert("match_weight".to_string(), json!(total));
    ScoredComparisonRecord::new(values)
}

fn bench_explain(c: &mut Criterion) {
    let record = wide_record(40);
    let config = ExplainConfig::default();
    let order = FieldOrder::Lexicographic;

    c.bench_function("explain_40_fields", |b| {
        b.iter(|| Explanation::build(black_box(&record), black_box(&order), &config))
    });
}

fn bench_diff(c: &mut Criterion) {
    let left = "121 lincoln rd north pune maharashtra 411030".repeat(6);
    let right = "121 lincon road n pune maharastra 411031".repeat(6);

    c.bench_function("diff_address", |b| {
        b.iter(|| generate_diff(black_box(&left), black_box(&right)))
    });
}

criterion_group!(benches, bench_explain, bench_diff);
criterion_main!(benches);
