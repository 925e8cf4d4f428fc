use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ecoquiz_core::model::{Difficulty, ExperienceLevel, QuestionItem, UserPreferences};
use ecoquiz_core::selector::select;

const TAGS: [&str; 6] = [
    "recycling",
    "energy",
    "water",
    "biodiversity",
    "sustainable",
    "climate",
];

fn make_bank(size: u32) -> Vec<QuestionItem> {
    (0..size)
        .map(|i| QuestionItem {
            id: i,
            prompt: format!("Question {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: (i % 4) as usize,
            explanation: String::new(),
            tags: vec![
                TAGS[i as usize % TAGS.len()].to_string(),
                TAGS[(i as usize / 3) % TAGS.len()].to_string(),
            ],
            difficulty: match i % 3 {
                0 => Difficulty::Easy,
                1 => Difficulty::Medium,
                _ => Difficulty::Hard,
            },
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let prefs = UserPreferences::new(["energy", "water"], ExperienceLevel::Advanced);

    for size in [12, 100, 500] {
        let bank = make_bank(size);
        group.bench_function(format!("bank={size},count=10"), |b| {
            b.iter(|| select(black_box(&bank), black_box(Some(&prefs)), black_box(10)))
        });
    }

    group.bench_function("no_preferences", |b| {
        let bank = make_bank(500);
        b.iter(|| select(black_box(&bank), black_box(None), black_box(10)))
    });

    group.finish();
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
