use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use bayestrait_engine::{
    Direction, Evidence, EvidenceType, InferenceEngine, Settings, SubjectEvidence, TraitRegistry,
};

/// 12 traits, each with a couple of explicit evidence weights.
fn build_registry() -> TraitRegistry {
    let mut reg = TraitRegistry::new();
    for i in 0..12 {
        reg.register_trait(
            format!("trait_{i}"),
            0.0,
            1.0 + i as f64 * 0.25,
            vec![
                (EvidenceType::SelfReport, 0.9),
                (EvidenceType::KeywordMatch, 0.3),
            ],
            0.6,
        )
        .unwrap();
    }
    reg
}

fn make_evidence(n: usize) -> Vec<Evidence> {
    let kinds = [
        EvidenceType::SelfReport,
        EvidenceType::KeywordMatch,
        EvidenceType::Behavioral,
        EvidenceType::LanguageModel,
    ];
    (0..n)
        .map(|i| {
            let direction = match i % 3 {
                0 => Direction::Positive,
                1 => Direction::Negative,
                _ => Direction::Neutral,
            };
            Evidence::new(
                format!("trait_{}", i % 12),
                kinds[i % kinds.len()].clone(),
                direction,
                (i % 10) as f64 / 10.0,
                (i % 9) as f64 / 9.0,
            )
        })
        .collect()
}

fn bench_single_subject(c: &mut Criterion) {
    let engine = InferenceEngine::new(Arc::new(build_registry()), Settings::default()).unwrap();
    let evidence = make_evidence(1_000);

    c.bench_function("infer_1k_evidence_12_traits", |b| {
        b.iter(|| engine.infer("subject", &evidence).unwrap());
    });
}

fn bench_parallel_traits(c: &mut Criterion) {
    let settings = Settings::default().with_parallel_traits(true);
    let engine = InferenceEngine::new(Arc::new(build_registry()), settings).unwrap();
    let evidence = make_evidence(10_000);

    c.bench_function("infer_10k_evidence_parallel_traits", |b| {
        b.iter(|| engine.infer("subject", &evidence).unwrap());
    });
}

fn bench_batch(c: &mut Criterion) {
    let engine = InferenceEngine::new(Arc::new(build_registry()), Settings::default()).unwrap();
    let subjects: Vec<SubjectEvidence> = (0..200)
        .map(|i| SubjectEvidence::new(format!("subject_{i}"), make_evidence(100)))
        .collect();

    c.bench_function("infer_batch_200_subjects", |b| {
        b.iter(|| engine.infer_batch(&subjects));
    });
}

criterion_group!(benches, bench_single_subject, bench_parallel_traits, bench_batch);
criterion_main!(benches);
