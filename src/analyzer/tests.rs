use super::*;
use chrono::{NaiveDate, TimeZone, Utc};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn session(project: &str, start: DateTime<Utc>, hours: f64) -> Session {
    let end = start + Duration::milliseconds((hours * 3_600_000.0).round() as i64);
    Session::new(project, start, end, 1_024, 168.0).expect("valid session")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn run(sessions: &[Session]) -> AnalysisResult {
    analyze(sessions, &AnalysisConfig::default(), &Utc, at(2025, 6, 30, 12, 0)).expect("result")
}

#[test]
fn empty_input_has_no_result() {
    assert!(analyze(&[], &AnalysisConfig::default(), &Utc, Utc::now()).is_none());
}

#[test]
fn single_project_day_scenario() {
    let sessions = vec![
        session("foo", at(2025, 6, 2, 9, 0), 1.5),
        session("foo", at(2025, 6, 2, 9, 0), 5.0 / 60.0),
        session("foo", at(2025, 6, 2, 14, 0), 0.0),
    ];

    let result = run(&sessions);

    assert_eq!(result.total_sessions, 3);
    assert!((result.total_hours - 1.5833).abs() < 0.001);
    assert_eq!(result.active_days(), 1);
    assert_eq!(result.total_days_span, 1);
    assert_eq!(result.max_streak, 1);
    assert_eq!(result.first_day, date(2025, 6, 2));
    assert_eq!(result.last_day, date(2025, 6, 2));

    let top = result.top_projects(7);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].0, "foo");
    assert!((top[0].1 - 1.5833).abs() < 0.001);

    assert!((result.hour_buckets[9] - (1.5 + 5.0 / 60.0)).abs() < 1e-9);
    assert_eq!(result.hour_buckets[14], 0.0);
    // 2025-06-02 is a Monday.
    assert!((result.dow_hours[1] - result.total_hours).abs() < 1e-9);
    assert!(result.warnings.is_empty());
}

#[test]
fn analysis_is_deterministic() {
    let sessions = vec![
        session("a", at(2025, 6, 1, 8, 0), 2.0),
        session("b", at(2025, 6, 3, 22, 0), 4.0),
        session("a", at(2025, 6, 4, 1, 0), 0.5),
    ];
    assert_eq!(run(&sessions), run(&sessions));
}

#[test]
fn streak_counts_consecutive_days_only() {
    let sessions = vec![
        session("p", at(2025, 6, 1, 10, 0), 1.0),
        session("p", at(2025, 6, 2, 10, 0), 1.0),
        session("p", at(2025, 6, 3, 10, 0), 1.0),
        session("p", at(2025, 6, 11, 10, 0), 1.0),
    ];

    let result = run(&sessions);

    assert_eq!(result.max_streak, 3);
    assert_eq!(result.active_days(), 4);
    assert_eq!(result.total_days_span, 11);
}

#[test]
fn longest_streak_edge_cases() {
    assert_eq!(longest_streak(&[]), 0);
    assert_eq!(longest_streak(&[date(2025, 1, 1)]), 1);
    assert_eq!(
        longest_streak(&[
            date(2024, 12, 30),
            date(2024, 12, 31),
            date(2025, 1, 1),
            date(2025, 1, 3),
            date(2025, 1, 4),
        ]),
        3
    );
}

#[test]
fn longest_session_prefers_interactive_sessions() {
    let sessions = vec![
        session("p", at(2025, 6, 1, 8, 0), 2.0),
        session("p", at(2025, 6, 2, 8, 0), 5.0),
        session("p", at(2025, 6, 3, 8, 0), 10.0),
    ];

    let result = run(&sessions);

    assert_eq!(result.longest.session.duration_hours(), 5.0);
    assert_eq!(result.longest.date, date(2025, 6, 2));
    assert!(result.has_autonomous_sessions());
}

#[test]
fn longest_session_falls_back_when_all_are_autonomous() {
    let result = run(&[session("p", at(2025, 6, 1, 8, 0), 10.0)]);

    assert_eq!(result.longest.session.duration_hours(), 10.0);
    assert!(!result.has_autonomous_sessions());
}

#[test]
fn session_at_cutoff_counts_as_interactive() {
    let result = run(&[
        session("p", at(2025, 6, 1, 8, 0), 8.0),
        session("p", at(2025, 6, 2, 8, 0), 1.0),
    ]);

    assert_eq!(result.longest.session.duration_hours(), 8.0);
    assert!(!result.has_autonomous_sessions());
}

#[test]
fn long_session_warning_threshold_is_inclusive() {
    let is_long_warning = |w: &HealthWarning| w.message.contains("or longer");

    let at_threshold = run(&[session("p", at(2025, 6, 1, 8, 0), 3.0)]);
    let warning = at_threshold
        .warnings
        .iter()
        .find(|w| is_long_warning(*w))
        .expect("long session warning");
    assert_eq!(warning.level, WarningLevel::Warn);
    assert!(warning.message.starts_with("1 session ran 3h"));

    let below = run(&[session("p", at(2025, 6, 1, 8, 0), 2.999)]);
    assert!(!below.warnings.iter().any(is_long_warning));
}

fn has_level(result: &AnalysisResult, level: WarningLevel) -> bool {
    result.warnings.iter().any(|w| w.level == level)
}

fn daily_run(days: u32) -> AnalysisResult {
    let sessions: Vec<Session> = (1..=days)
        .map(|day| session("p", at(2025, 6, day, 9, 0), 1.0))
        .collect();
    run(&sessions)
}

#[test]
fn streak_warning_starts_at_seven_days() {
    let is_streak_warning = |w: &HealthWarning| w.message.contains("consecutive active days");

    let six = daily_run(6);
    assert_eq!(six.max_streak, 6);
    assert!(!six.warnings.iter().any(is_streak_warning));

    let seven = daily_run(7);
    assert_eq!(seven.max_streak, 7);
    let warning = seven
        .warnings
        .iter()
        .find(|w| is_streak_warning(*w))
        .expect("streak warning");
    assert_eq!(warning.level, WarningLevel::Warn);
}

#[test]
fn session_average_warning_is_strictly_above_two_hours() {
    let at_threshold = run(&[session("p", at(2025, 6, 1, 8, 0), 2.0)]);
    assert_eq!(at_threshold.avg_session_hours, 2.0);
    assert!(!has_level(&at_threshold, WarningLevel::Info));

    let above = run(&[session("p", at(2025, 6, 1, 8, 0), 2.01)]);
    assert!(has_level(&above, WarningLevel::Info));
}

#[test]
fn daily_average_warning_is_strictly_above_six_hours() {
    let at_threshold = run(&[
        session("p", at(2025, 6, 1, 8, 0), 2.0),
        session("p", at(2025, 6, 1, 11, 0), 2.0),
        session("p", at(2025, 6, 1, 14, 0), 2.0),
    ]);
    assert_eq!(at_threshold.avg_daily_hours, 6.0);
    assert!(!has_level(&at_threshold, WarningLevel::Alert));

    let above = run(&[
        session("p", at(2025, 6, 1, 8, 0), 2.0),
        session("p", at(2025, 6, 1, 11, 0), 2.0),
        session("p", at(2025, 6, 1, 14, 0), 2.01),
    ]);
    assert!(has_level(&above, WarningLevel::Alert));
}

#[test]
fn warnings_follow_fixed_order() {
    // Seven consecutive days of 7h sessions trips every rule.
    let sessions: Vec<Session> = (1..=7)
        .map(|day| session("p", at(2025, 6, day, 9, 0), 7.0))
        .collect();

    let result = run(&sessions);
    let levels: Vec<WarningLevel> = result.warnings.iter().map(|w| w.level).collect();

    assert_eq!(
        levels,
        vec![
            WarningLevel::Warn,
            WarningLevel::Warn,
            WarningLevel::Info,
            WarningLevel::Alert,
        ]
    );
    assert_eq!(result.warnings[0].message.split(' ').next(), Some("7"));
    assert!(result.warnings[1].message.starts_with("7 consecutive active days"));
    assert_eq!(result.warnings[2].message, "Average session length is 7.0h.");
    assert_eq!(result.warnings[3].message, "Averaging 7.0h per active day.");
}

#[test]
fn thresholds_come_from_config() {
    let sessions = vec![session("p", at(2025, 6, 1, 9, 0), 1.5)];
    let config = AnalysisConfig {
        long_session_hours: 1.0,
        streak_warning_days: 1,
        high_session_average_hours: 1.0,
        high_daily_average_hours: 1.0,
        interactive_cutoff_hours: 1.0,
    };

    let result = analyze(&sessions, &config, &Utc, at(2025, 6, 30, 0, 0)).expect("result");

    assert_eq!(result.warnings.len(), 4);
    assert_eq!(result.longest.session.duration_hours(), 1.5);
    assert!(!result.has_autonomous_sessions());
}

#[test]
fn dates_and_buckets_use_the_given_timezone() {
    // 02:30 UTC on Monday 2 June is 22:30 on Sunday 1 June in New York.
    let sessions = vec![session("p", at(2025, 6, 2, 2, 30), 2.0)];
    let tz = chrono_tz::America::New_York;

    let result =
        analyze(&sessions, &AnalysisConfig::default(), &tz, at(2025, 6, 30, 0, 0)).expect("result");

    assert_eq!(result.first_day, date(2025, 6, 1));
    assert_eq!(result.longest.date, date(2025, 6, 1));
    assert_eq!(result.dow_hours[0], 2.0);
    assert_eq!(result.hour_buckets[22], 2.0);
    // The session crosses midnight but is not split.
    assert_eq!(result.hour_buckets[23], 0.0);
    assert_eq!(result.hour_buckets[0], 0.0);

    let utc = run(&sessions);
    assert_eq!(utc.first_day, date(2025, 6, 2));
    assert_eq!(utc.dow_hours[1], 2.0);
    assert_eq!(utc.hour_buckets[2], 2.0);
}

#[test]
fn averages_use_active_days() {
    let sessions = vec![
        session("a", at(2025, 6, 1, 9, 0), 1.0),
        session("b", at(2025, 6, 1, 13, 0), 3.0),
        session("a", at(2025, 6, 5, 9, 0), 2.0),
    ];

    let result = run(&sessions);

    assert_eq!(result.total_hours, 6.0);
    assert_eq!(result.avg_session_hours, 2.0);
    assert_eq!(result.avg_daily_hours, 3.0);
    assert_eq!(result.by_date[&date(2025, 6, 1)].sessions.len(), 2);
    assert_eq!(result.by_date[&date(2025, 6, 1)].hours, 4.0);
    assert_eq!(result.project_hours["a"], 3.0);
    assert_eq!(result.project_hours["b"], 3.0);
    // Equal hours fall back to name order.
    assert_eq!(result.top_projects(7), vec![("a", 3.0), ("b", 3.0)]);
    assert_eq!(result.top_projects(1), vec![("a", 3.0)]);
}

#[test]
fn recent_window_excludes_boundary_day() {
    let now = at(2025, 6, 30, 12, 0);
    let sessions = vec![
        // Exactly 7×24h before `now` lands on 23 June, which is excluded.
        session("p", at(2025, 6, 23, 9, 0), 1.0),
        session("p", at(2025, 6, 24, 9, 0), 2.0),
        session("p", at(2025, 6, 30, 9, 0), 0.5),
        session("p", at(2025, 5, 1, 9, 0), 4.0),
    ];
    let mut sorted = sessions.clone();
    sorted.sort_by_key(Session::start);

    let result = analyze(&sorted, &AnalysisConfig::default(), &Utc, now).expect("result");

    assert_eq!(result.recent_7_days, 2);
    assert_eq!(result.recent_7_hours, 2.5);
}

#[test]
fn recent_window_ignores_future_dates() {
    let now = at(2025, 6, 30, 12, 0);
    let sessions = vec![
        session("p", at(2025, 6, 29, 9, 0), 1.0),
        session("p", at(2025, 7, 1, 9, 0), 1.0),
    ];

    let result = analyze(&sessions, &AnalysisConfig::default(), &Utc, now).expect("result");

    assert_eq!(result.recent_7_days, 1);
    assert_eq!(result.recent_7_hours, 1.0);
}
