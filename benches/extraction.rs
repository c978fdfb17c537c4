use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voicecal::parser::extract_all_time_mentions;
use voicecal::ScheduleParser;

const SENTENCES: [(&str, &str); 5] = [
    ("single", "Meeting tomorrow at 3pm"),
    ("range", "Lunch at the cafe from 12 to 1pm"),
    ("relative", "in 2 hours call mom"),
    ("default", "schedule team sync next friday"),
    ("multi", "gym at 7am in room 101 and dinner with friends at 8 tonight on 5 march"),
];

fn bench_parse(c: &mut Criterion) {
    let reference = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let parser = ScheduleParser::new(reference);

    let mut group = c.benchmark_group("parse_schedule");
    for (name, sentence) in SENTENCES {
        group.bench_with_input(BenchmarkId::from_parameter(name), sentence, |b, sentence| {
            b.iter(|| parser.parse(black_box(sentence)))
        });
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let sentence = SENTENCES[4].1.to_lowercase();
    c.bench_function("extract_all_time_mentions", |b| {
        b.iter(|| extract_all_time_mentions(black_box(&sentence)))
    });
}

criterion_group!(benches, bench_parse, bench_scan);
criterion_main!(benches);
