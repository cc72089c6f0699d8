use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::types::{
    AnalysisResult, DayActivity, HealthWarning, LongestSession, Session, WarningLevel,
};

/// Fold a list of sessions into aggregate statistics.
///
/// Pure: calendar dates, weekdays and hours are taken in `tz`, and the
/// "last 7 days" window is anchored at `now`. Returns `None` for an empty list.
pub fn analyze<Tz: TimeZone>(
    sessions: &[Session],
    config: &AnalysisConfig,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Option<AnalysisResult> {
    if sessions.is_empty() {
        return None;
    }

    let local_date = |instant: DateTime<Utc>| instant.with_timezone(tz).date_naive();

    let total_sessions = sessions.len();
    let total_hours: f64 = sessions.iter().map(Session::duration_hours).sum();

    let mut by_date: BTreeMap<NaiveDate, DayActivity> = BTreeMap::new();
    let mut dow_hours = [0.0; 7];
    let mut hour_buckets = [0.0; 24];
    let mut project_hours: BTreeMap<String, f64> = BTreeMap::new();

    for session in sessions {
        let start = session.start().with_timezone(tz);
        let hours = session.duration_hours();

        let day = by_date.entry(start.date_naive()).or_default();
        day.sessions.push(session.clone());
        day.hours += hours;

        dow_hours[start.weekday().num_days_from_sunday() as usize] += hours;
        hour_buckets[start.hour() as usize] += hours;
        *project_hours
            .entry(session.project().to_string())
            .or_insert(0.0) += hours;
    }

    let (session, autonomous_excluded) =
        select_longest(sessions, config.interactive_cutoff_hours)?;
    let longest = LongestSession {
        date: local_date(session.start()),
        session: session.clone(),
        autonomous_excluded,
    };

    let active_dates: Vec<NaiveDate> = by_date.keys().copied().collect();
    let first_day = *active_dates.first()?;
    let last_day = *active_dates.last()?;
    let total_days_span = (last_day - first_day).num_days() + 1;
    let max_streak = longest_streak(&active_dates);

    let avg_session_hours = total_hours / total_sessions as f64;
    let avg_daily_hours = total_hours / by_date.len() as f64;

    let (recent_7_days, recent_7_hours) = recent_window(&by_date, tz, now);

    let warnings = health_warnings(
        sessions,
        config,
        max_streak,
        avg_session_hours,
        avg_daily_hours,
    );

    Some(AnalysisResult {
        total_sessions,
        total_hours,
        avg_session_hours,
        avg_daily_hours,
        longest,
        by_date,
        dow_hours,
        hour_buckets,
        project_hours,
        max_streak,
        warnings,
        first_day,
        last_day,
        total_days_span,
        recent_7_days,
        recent_7_hours,
    })
}

/// Longest session at or under the interactive cutoff. Falls back to the
/// overall longest when every session is above it. The flag says whether
/// longer sessions were passed over.
fn select_longest(sessions: &[Session], cutoff_hours: f64) -> Option<(&Session, bool)> {
    let interactive = longest_of(sessions.iter().filter(|s| s.duration_hours() <= cutoff_hours));
    match interactive {
        Some(session) => {
            let excluded = sessions.iter().any(|s| s.duration_hours() > cutoff_hours);
            Some((session, excluded))
        }
        None => longest_of(sessions.iter()).map(|session| (session, false)),
    }
}

/// First of the longest sessions, so ties go to the earliest one.
fn longest_of<'a>(candidates: impl Iterator<Item = &'a Session>) -> Option<&'a Session> {
    candidates.fold(None, |best: Option<&'a Session>, s| match best {
        Some(b) if b.duration_hours() >= s.duration_hours() => Some(b),
        _ => Some(s),
    })
}

/// Longest run of calendar-consecutive dates. `dates` must be sorted and unique.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let Some(first) = dates.first() else {
        return 0;
    };

    let mut best = 1;
    let mut current = 1;
    let mut previous = *first;
    for &date in &dates[1..] {
        if date - previous == Duration::days(1) {
            current += 1;
        } else {
            current = 1;
        }
        best = best.max(current);
        previous = date;
    }
    best
}

/// Active days and hours strictly after `now - 7×24h` and up to today, both as
/// local calendar dates.
fn recent_window<Tz: TimeZone>(
    by_date: &BTreeMap<NaiveDate, DayActivity>,
    tz: &Tz,
    now: DateTime<Utc>,
) -> (usize, f64) {
    let today = now.with_timezone(tz).date_naive();
    let seven_days_ago = (now - Duration::hours(7 * 24)).with_timezone(tz).date_naive();

    by_date
        .iter()
        .filter(|(date, _)| **date > seven_days_ago && **date <= today)
        .fold((0, 0.0), |(days, hours), (_, day)| (days + 1, hours + day.hours))
}

fn health_warnings(
    sessions: &[Session],
    config: &AnalysisConfig,
    max_streak: u32,
    avg_session_hours: f64,
    avg_daily_hours: f64,
) -> Vec<HealthWarning> {
    let mut warnings = Vec::new();

    let long_sessions = sessions
        .iter()
        .filter(|s| s.duration_hours() >= config.long_session_hours)
        .count();
    if long_sessions > 0 {
        warnings.push(HealthWarning {
            level: WarningLevel::Warn,
            message: format!(
                "{long_sessions} session{} ran {}h or longer. Schedule breaks during long sessions.",
                if long_sessions == 1 { "" } else { "s" },
                config.long_session_hours
            ),
        });
    }

    if max_streak >= config.streak_warning_days {
        warnings.push(HealthWarning {
            level: WarningLevel::Warn,
            message: format!("{max_streak} consecutive active days. Consider taking a day off."),
        });
    }

    if avg_session_hours > config.high_session_average_hours {
        warnings.push(HealthWarning {
            level: WarningLevel::Info,
            message: format!("Average session length is {avg_session_hours:.1}h."),
        });
    }

    if avg_daily_hours > config.high_daily_average_hours {
        warnings.push(HealthWarning {
            level: WarningLevel::Alert,
            message: format!("Averaging {avg_daily_hours:.1}h per active day."),
        });
    }

    warnings
}

#[cfg(test)]
mod tests;
