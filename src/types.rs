use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

/// Why a transcript file did not produce a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable,
    TooSmall,
    Empty,
    MissingTimestamp,
    EndBeforeStart,
    TooLong,
}

/// One continuous interactive session, derived from a single transcript file.
///
/// Only constructed through [`Session::new`], which enforces `end >= start` and
/// a duration below the configured ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    project: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_hours: f64,
    size_bytes: u64,
}

impl Session {
    pub fn new(
        project: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        size_bytes: u64,
        max_hours: f64,
    ) -> Result<Self, SkipReason> {
        if end < start {
            return Err(SkipReason::EndBeforeStart);
        }

        let duration_hours = (end - start).num_milliseconds() as f64 / 3_600_000.0;
        if duration_hours >= max_hours {
            return Err(SkipReason::TooLong);
        }

        Ok(Self {
            project: project.into(),
            start,
            end,
            duration_hours,
            size_bytes,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// First line and last non-empty line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLines {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningLevel {
    Info,
    Warn,
    Alert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthWarning {
    pub level: WarningLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayActivity {
    pub sessions: Vec<Session>,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongestSession {
    pub session: Session,
    /// Local calendar date the session started on.
    pub date: NaiveDate,
    /// True when sessions above the interactive cutoff were left out of the selection.
    pub autonomous_excluded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub total_sessions: usize,
    pub total_hours: f64,
    pub avg_session_hours: f64,
    pub avg_daily_hours: f64,
    pub longest: LongestSession,
    pub by_date: BTreeMap<NaiveDate, DayActivity>,
    /// Indexed from Sunday (0) to Saturday (6).
    pub dow_hours: [f64; 7],
    pub hour_buckets: [f64; 24],
    pub project_hours: BTreeMap<String, f64>,
    pub max_streak: u32,
    pub warnings: Vec<HealthWarning>,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub total_days_span: i64,
    pub recent_7_days: usize,
    pub recent_7_hours: f64,
}

impl AnalysisResult {
    pub fn active_days(&self) -> usize {
        self.by_date.len()
    }

    pub fn has_autonomous_sessions(&self) -> bool {
        self.longest.autonomous_excluded
    }

    /// Projects ordered by hours, largest first. Ties are broken by name.
    pub fn top_projects(&self, limit: usize) -> Vec<(&str, f64)> {
        let mut projects: Vec<(&str, f64)> = self
            .project_hours
            .iter()
            .map(|(name, hours)| (name.as_str(), *hours))
            .collect();
        projects.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        projects.truncate(limit);
        projects
    }
}
