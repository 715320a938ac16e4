//! Latency benchmarks for the chat filter
//!
//! Run with: cargo bench -p chatguard-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chatguard_classifiers::{classify, Classifier, StrictnessProfile, ToxicityClassifier};

/// Benchmark the caps / repeat filter under each profile
fn benchmark_filter(c: &mut Criterion) {
    let test_cases = vec![
        ("short_clean", "gg"),
        ("medium_clean", "How do I claim land near spawn? Anyone know the command?"),
        ("caps", "CHEAP GOLD BUY AT G0LD.COM"),
        ("repeats", "heyyyyyyyyyyyy anyone there????"),
        (
            "long_clean",
            "The quick brown fox jumps over the lazy dog while the server restarts in five minutes, please log out safely.",
        ),
    ];

    let mut group = c.benchmark_group("Chat_Filter");
    group.significance_level(0.05);
    group.sample_size(100);

    for profile in StrictnessProfile::ALL {
        for (name, text) in &test_cases {
            group.bench_with_input(
                BenchmarkId::new(profile.as_str(), name),
                text,
                |b, text| b.iter(|| classify(black_box(text), profile)),
            );
        }
    }

    group.finish();
}

/// Benchmark the toxicity lexicon signal
fn benchmark_toxicity(c: &mut Criterion) {
    let classifier = ToxicityClassifier::new().expect("Failed to create toxicity classifier");

    let mut group = c.benchmark_group("Toxicity_Signal");
    for (name, text) in [
        ("clean", "well played, see you next round"),
        ("toxic", "shut up you stupid idiot, uninstall"),
    ] {
        group.bench_with_input(BenchmarkId::new("classify", name), &text, |b, text| {
            b.iter(|| classifier.classify(black_box(text)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_filter, benchmark_toxicity);
criterion_main!(benches);
