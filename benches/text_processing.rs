//! Text Processing Benchmarks
//!
//! Preprocessing, sentence splitting and extractive selection over inputs
//! of increasing size, plus DOCX export.
//!
//! Run with: `cargo bench --bench text_processing`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use summarizer_server::export::docx::render_docx;
use summarizer_server::summarizer::extractive;
use summarizer_server::text::{preprocess, split_sentences};

const SENTENCES: &[&str] = &[
    "The committee reviewed the quarterly budget in detail.",
    "Spending on infrastructure rose by twelve percent.",
    "Several members questioned the maintenance schedule!",
    "Revenue from the new transit line exceeded projections.",
    "Is the surplus large enough to fund the library expansion?",
    "The chair asked staff to prepare a revised forecast.",
    "Public comment focused on road repairs and park lighting.",
    "A final vote is expected at the next meeting.",
];

/// Build a document of roughly `sentences` sentences with messy whitespace
fn sample_text(sentences: usize) -> String {
    SENTENCES
        .iter()
        .cycle()
        .take(sentences)
        .enumerate()
        .map(|(i, s)| if i % 5 == 4 { format!("{}\n\n", s) } else { format!("{}  ", s) })
        .collect()
}

fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");

    for size in [10, 100, 1000] {
        let text = sample_text(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| black_box(preprocess(black_box(text))))
        });
    }

    group.finish();
}

fn bench_split_sentences(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_sentences");

    for size in [10, 100, 1000] {
        let text = preprocess(&sample_text(size));
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| black_box(split_sentences(black_box(text))))
        });
    }

    group.finish();
}

/// Selection is quadratic in the sentence count
fn bench_extractive(c: &mut Criterion) {
    let mut group = c.benchmark_group("extractive_summarize");
    group.measurement_time(Duration::from_secs(10));

    for size in [10, 50, 200] {
        let text = preprocess(&sample_text(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| black_box(extractive::summarize(black_box(text), 5, 150)))
        });
    }

    group.finish();
}

fn bench_docx_export(c: &mut Criterion) {
    let content = sample_text(100);
    let metadata = vec![
        ("method".to_string(), "extractive".to_string()),
        ("model".to_string(), "bart".to_string()),
    ];
    let now = chrono::Utc::now();

    c.bench_function("docx_export", |b| {
        b.iter(|| {
            let bytes = render_docx("summary", &metadata, black_box(&content), now)
                .expect("Failed to render DOCX");
            black_box(bytes)
        })
    });
}

criterion_group!(
    benches,
    bench_preprocess,
    bench_split_sentences,
    bench_extractive,
    bench_docx_export
);
criterion_main!(benches);
