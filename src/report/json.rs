use anyhow::{Context, Result};
use serde::Serialize;

use super::Reporter;
use crate::types::AnalysisResult;
use crate::utils::round2;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub version: String,
    pub total_sessions: usize,
    pub total_hours: f64,
    pub active_days: usize,
    pub total_days_span: i64,
    pub first_seen: String,
    pub last_seen: String,
    pub averages: Averages,
    pub longest_session: LongestSessionJson,
    pub hours_by_day_of_week: HoursByDayOfWeek,
    pub top_projects: Vec<ProjectHours>,
    pub streak: u32,
    pub health_warnings: Vec<String>,
    #[serde(rename = "last7Days")]
    pub last_7_days: LastSevenDays,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    pub per_session: f64,
    pub per_day: f64,
}

#[derive(Debug, Serialize)]
pub struct LongestSessionJson {
    pub hours: f64,
    pub date: String,
    pub project: String,
}

#[derive(Debug, Serialize)]
pub struct HoursByDayOfWeek {
    #[serde(rename = "Sun")]
    pub sun: f64,
    #[serde(rename = "Mon")]
    pub mon: f64,
    #[serde(rename = "Tue")]
    pub tue: f64,
    #[serde(rename = "Wed")]
    pub wed: f64,
    #[serde(rename = "Thu")]
    pub thu: f64,
    #[serde(rename = "Fri")]
    pub fri: f64,
    #[serde(rename = "Sat")]
    pub sat: f64,
}

impl From<&[f64; 7]> for HoursByDayOfWeek {
    fn from(hours: &[f64; 7]) -> Self {
        let [sun, mon, tue, wed, thu, fri, sat] = hours.map(round2);
        Self {
            sun,
            mon,
            tue,
            wed,
            thu,
            fri,
            sat,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectHours {
    pub name: String,
    pub hours: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSevenDays {
    pub hours: f64,
    pub active_days: usize,
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    error: &'a str,
}

impl JsonReport {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let longest = &result.longest;

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            total_sessions: result.total_sessions,
            total_hours: round2(result.total_hours),
            active_days: result.active_days(),
            total_days_span: result.total_days_span,
            first_seen: result.first_day.format(DATE_FORMAT).to_string(),
            last_seen: result.last_day.format(DATE_FORMAT).to_string(),
            averages: Averages {
                per_session: round2(result.avg_session_hours),
                per_day: round2(result.avg_daily_hours),
            },
            longest_session: LongestSessionJson {
                hours: round2(longest.session.duration_hours()),
                date: longest.date.format(DATE_FORMAT).to_string(),
                project: longest.session.project().to_string(),
            },
            hours_by_day_of_week: HoursByDayOfWeek::from(&result.dow_hours),
            top_projects: result
                .top_projects(usize::MAX)
                .into_iter()
                .map(|(name, hours)| ProjectHours {
                    name: name.to_string(),
                    hours: round2(hours),
                })
                .collect(),
            streak: result.max_streak,
            health_warnings: result
                .warnings
                .iter()
                .map(|warning| warning.message.clone())
                .collect(),
            last_7_days: LastSevenDays {
                hours: round2(result.recent_7_hours),
                active_days: result.recent_7_days,
            },
        }
    }
}

/// Machine-readable output.
#[derive(Debug, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, result: &AnalysisResult) -> Result<String> {
        simd_json::to_string_pretty(&JsonReport::from_result(result))
            .context("Failed to serialize report")
    }

    fn nothing_to_report(&self, reason: &str) -> Result<String> {
        simd_json::to_string_pretty(&ErrorReport { error: reason })
            .context("Failed to serialize error report")
    }
}
