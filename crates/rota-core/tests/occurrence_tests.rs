mod helpers;

use chrono::{Days, NaiveDate};
use helpers::{collect, date, oracle};
use rota_core::calendar::nth_weekday_of_month;
use rota_core::{
    DaySelector, MonthFilter, OrdinalPattern, OrdinalWeek, Recurrence, Task, Weekday, WeekdaySet,
};
use rstest::rstest;

fn last_friday() -> Recurrence {
    Recurrence::monthly_on_ordinals([OrdinalPattern::new(OrdinalWeek::Last, Weekday::Friday)])
}

#[rstest]
#[case::biweekly(
    Recurrence::every_n_weeks(2),
    date(2024, 1, 15),
    date(2024, 1, 1),
    date(2024, 3, 1),
    vec![date(2024, 1, 15), date(2024, 1, 29), date(2024, 2, 12), date(2024, 2, 26)]
)]
#[case::last_friday(
    last_friday(),
    date(2024, 1, 1),
    date(2024, 1, 1),
    date(2024, 4, 1),
    vec![date(2024, 1, 26), date(2024, 2, 23), date(2024, 3, 29)]
)]
#[case::weekends(
    Recurrence::selected_days(WeekdaySet::WEEKENDS),
    date(2024, 1, 1),
    date(2024, 1, 1),
    date(2024, 1, 15),
    vec![date(2024, 1, 6), date(2024, 1, 7), date(2024, 1, 13), date(2024, 1, 14)]
)]
#[case::leap_day(
    Recurrence::yearly_on(2, 29),
    date(2023, 1, 1),
    date(2023, 1, 1),
    date(2029, 1, 1),
    vec![date(2024, 2, 29), date(2028, 2, 29)]
)]
#[case::fifth_friday(
    Recurrence::monthly_on_ordinals([OrdinalPattern::new(OrdinalWeek::Fifth, Weekday::Friday)]),
    date(2024, 1, 1),
    date(2024, 1, 1),
    date(2024, 7, 1),
    vec![date(2024, 3, 29), date(2024, 5, 31)]
)]
#[case::thirty_first(
    Recurrence::monthly_on_days([31]),
    date(2024, 1, 1),
    date(2024, 1, 1),
    date(2024, 7, 1),
    vec![date(2024, 1, 31), date(2024, 3, 31), date(2024, 5, 31)]
)]
fn test_known_schedules(
    #[case] rule: Recurrence,
    #[case] anchor: NaiveDate,
    #[case] from: NaiveDate,
    #[case] to: NaiveDate,
    #[case] expected: Vec<NaiveDate>,
) {
    assert_eq!(collect(&rule, anchor, None, from..to), expected);
}

#[rstest]
#[case::daily(Recurrence::Daily)]
#[case::weekdays(Recurrence::selected_days(WeekdaySet::WEEKDAYS))]
#[case::every_three_weeks(Recurrence::every_n_weeks(3))]
#[case::first_and_last_week(Recurrence::weeks_of_month([OrdinalWeek::First, OrdinalWeek::Last]))]
#[case::weekly_modulo(Recurrence::weekly_modulo(3, 2))]
#[case::quarterly(Recurrence::monthly(
    MonthFilter::EveryNMonths { interval: 3 },
    DaySelector::Days { days: [1, 15, 31].into() },
))]
#[case::summer_second_tuesday(Recurrence::monthly(
    MonthFilter::SpecificMonths { months: [6, 7, 8].into() },
    DaySelector::Ordinal { patterns: [OrdinalPattern::new(OrdinalWeek::Second, Weekday::Tuesday)].into() },
))]
#[case::overlapping_ordinals(Recurrence::monthly_on_ordinals([
    OrdinalPattern::new(OrdinalWeek::Fourth, Weekday::Sunday),
    OrdinalPattern::new(OrdinalWeek::Last, Weekday::Sunday),
    OrdinalPattern::new(OrdinalWeek::First, Weekday::Monday),
]))]
#[case::fixed_date(Recurrence::yearly_on(12, 31))]
#[case::every_other_year(Recurrence::every_n_years(2))]
#[case::yearly_modulo(Recurrence::yearly_modulo(3, 1))]
fn test_agrees_with_oracle(#[case] rule: Recurrence) {
    let from = date(2019, 6, 1);
    let to = date(2027, 1, 1);
    for anchor in [date(2020, 2, 29), date(2021, 1, 31), date(2022, 7, 6)] {
        for end in [None, Some(date(2025, 3, 10))] {
            assert_eq!(
                collect(&rule, anchor, end, from..to),
                oracle(&rule, anchor, end, from..to),
                "rule {rule:?} anchor {anchor} end {end:?}"
            );
        }
    }
}

#[rstest]
#[case::weekends(Recurrence::selected_days(WeekdaySet::WEEKENDS))]
#[case::every_three_weeks(Recurrence::every_n_weeks(3))]
#[case::first_and_last_week(Recurrence::weeks_of_month([OrdinalWeek::First, OrdinalWeek::Last]))]
#[case::weekly_modulo(Recurrence::weekly_modulo(3, 1))]
fn test_weekly_rules_at_calendar_limits(#[case] rule: Recurrence) {
    let early = NaiveDate::MIN..NaiveDate::MIN + Days::new(800);
    let late = NaiveDate::MAX - Days::new(800)..NaiveDate::MAX;
    for (anchor, range) in [(early.start, early.clone()), (late.start, late.clone())] {
        assert_eq!(
            collect(&rule, anchor, None, range.clone()),
            oracle(&rule, anchor, None, range),
            "rule {rule:?} anchor {anchor}"
        );
    }
}

#[test]
fn test_every_n_weeks_from_earliest_date_starts_on_anchor() {
    let anchor = NaiveDate::MIN;
    let found = collect(&Recurrence::every_n_weeks(3), anchor, None, anchor..anchor + Days::new(50));
    assert_eq!(found.first(), Some(&anchor));
    assert_eq!(found.get(1), Some(&(anchor + Days::new(21))));
}

#[test]
fn test_range_partition() {
    let rule = last_friday();
    let anchor = date(2023, 5, 1);
    let (a, b, c) = (date(2023, 1, 1), date(2024, 2, 24), date(2025, 1, 1));

    let mut joined = collect(&rule, anchor, None, a..b);
    joined.extend(collect(&rule, anchor, None, b..c));
    assert_eq!(collect(&rule, anchor, None, a..c), joined);
}

#[test]
fn test_requery_is_idempotent() {
    let rule = Recurrence::weekly_modulo(4, 3);
    let anchor = date(2024, 3, 5);
    let range = date(2024, 1, 1)..date(2026, 1, 1);
    assert_eq!(collect(&rule, anchor, None, range.clone()), collect(&rule, anchor, None, range));
}

#[test]
fn test_last_differs_from_fifth_in_short_month() {
    let last = nth_weekday_of_month(2024, 2, Weekday::Sunday, OrdinalWeek::Last);
    let fifth = nth_weekday_of_month(2024, 2, Weekday::Sunday, OrdinalWeek::Fifth);
    assert_eq!(last, Some(date(2024, 2, 25)));
    assert_eq!(fifth, None);
}

#[test]
fn test_reanchored_task_round_trips_through_json() {
    let task = Task::new("Budget review", date(2024, 1, 31))
        .with_recurrence(Recurrence::monthly_on_days([31]))
        .with_end(date(2024, 12, 31));
    let json = serde_json::to_string(&task.reanchor(date(2024, 3, 1))).unwrap();
    let restored: Task = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.start, date(2024, 3, 1));
    assert_eq!(restored.next_occurrence(date(2024, 3, 31)), Some(date(2024, 5, 31)));
}
