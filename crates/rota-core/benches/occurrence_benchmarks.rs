use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rota_core::{
    matches, DaySelector, MonthFilter, OrdinalPattern, OrdinalWeek, Recurrence, Weekday, WeekdaySet,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_rules() -> Vec<(&'static str, Recurrence)> {
    vec![
        ("daily", Recurrence::Daily),
        ("weekdays", Recurrence::selected_days(WeekdaySet::WEEKDAYS)),
        ("biweekly", Recurrence::every_n_weeks(2)),
        ("last_week_of_month", Recurrence::weeks_of_month([OrdinalWeek::Last])),
        (
            "last_friday",
            Recurrence::monthly_on_ordinals([OrdinalPattern::new(OrdinalWeek::Last, Weekday::Friday)]),
        ),
        (
            "quarterly",
            Recurrence::monthly(
                MonthFilter::EveryNMonths { interval: 3 },
                DaySelector::Days { days: [1].into() },
            ),
        ),
        ("yearly", Recurrence::every_n_years(1)),
    ]
}

fn bench_occurrences_one_year(c: &mut Criterion) {
    let mut group = c.benchmark_group("occurrences_one_year");
    let anchor = date(2024, 1, 15);
    let from = date(2025, 1, 1);
    let to = date(2026, 1, 1);

    for (name, rule) in sample_rules() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &rule, |b, rule| {
            b.iter(|| rule.occurrences(black_box(anchor), None, black_box(from)..black_box(to)).count())
        });
    }

    group.finish();
}

fn bench_occurrences_vs_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("yearly_rule_decade");
    let rule = Recurrence::every_n_years(1);
    let anchor = date(2000, 3, 10);
    let from = date(2020, 1, 1);
    let to = date(2030, 1, 1);

    group.bench_function("jump_ahead", |b| {
        b.iter(|| rule.occurrences(black_box(anchor), None, from..to).count())
    });
    group.bench_function("day_scan", |b| {
        b.iter(|| {
            from.iter_days()
                .take_while(|day| *day < to)
                .filter(|day| matches(&rule, black_box(anchor), None, *day))
                .count()
        })
    });

    group.finish();
}

fn bench_first_occurrence_of_long_range(c: &mut Criterion) {
    let rule = Recurrence::yearly_on(2, 29);
    let anchor = date(2025, 1, 1);

    c.bench_function("next_leap_day", |b| {
        b.iter(|| rule.next_occurrence(black_box(anchor), None, black_box(date(2028, 3, 1))))
    });
}

criterion_group!(
    benches,
    bench_occurrences_one_year,
    bench_occurrences_vs_scan,
    bench_first_occurrence_of_long_range
);
criterion_main!(benches);
