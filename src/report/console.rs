use anyhow::Result;
use crossterm::style::{StyledContent, Stylize};
use std::fmt::Write;

use super::{DAY_NAMES, Reporter};
use crate::types::{AnalysisResult, WarningLevel};
use crate::utils::{NumberFormatOptions, bar, format_hours, format_number};

const BAR_WIDTH: usize = 28;
const TOP_PROJECTS: usize = 7;
const HEAT_LEVELS: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Human-readable multi-section report.
pub struct ConsoleReporter {
    pub color: bool,
    pub number_format: NumberFormatOptions,
    /// Shown in the footer so readers know which clock the histograms use.
    pub timezone_name: String,
}

impl ConsoleReporter {
    fn paint(&self, text: impl Into<String>, style: fn(String) -> StyledContent<String>) -> String {
        let text = text.into();
        if self.color { style(text).to_string() } else { text }
    }

    fn heading(&self, out: &mut String, title: &str) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "{}", self.paint(title, |s| s.cyan().bold()))
    }

    fn overview(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        let n = |v: usize| format_number(v as u64, &self.number_format);

        self.heading(out, "OVERVIEW")?;
        writeln!(
            out,
            "  Sessions      {}",
            self.paint(n(result.total_sessions), |s| s.bold())
        )?;
        writeln!(
            out,
            "  Total time    {}",
            self.paint(format_hours(result.total_hours), |s| s.bold())
        )?;
        writeln!(
            out,
            "  Active days   {} of {} ({} to {})",
            n(result.active_days()),
            n(result.total_days_span.max(0) as usize),
            result.first_day.format("%b %-d, %Y"),
            result.last_day.format("%b %-d, %Y"),
        )?;
        writeln!(
            out,
            "  Last 7 days   {} across {} day{}",
            format_hours(result.recent_7_hours),
            result.recent_7_days,
            if result.recent_7_days == 1 { "" } else { "s" }
        )
    }

    fn averages(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        self.heading(out, "AVERAGES")?;
        writeln!(
            out,
            "  Per session      {}",
            format_hours(result.avg_session_hours)
        )?;
        writeln!(
            out,
            "  Per active day   {}",
            format_hours(result.avg_daily_hours)
        )
    }

    fn longest(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        let longest = &result.longest;

        self.heading(out, "LONGEST SESSION")?;
        writeln!(
            out,
            "  {} in {} on {}{}",
            self.paint(format_hours(longest.session.duration_hours()), |s| s.bold()),
            self.paint(longest.session.project(), |s| s.green()),
            longest.date.format("%a %b %-d, %Y"),
            if longest.autonomous_excluded { "*" } else { "" }
        )?;
        if longest.autonomous_excluded {
            writeln!(
                out,
                "{}",
                self.paint(
                    "  * Longer sessions look like unattended autonomous runs and are not counted here.",
                    |s| s.dark_grey()
                )
            )?;
        }
        Ok(())
    }

    fn weekly(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        let max = result.dow_hours.iter().copied().fold(0.0, f64::max);

        self.heading(out, "BY DAY OF WEEK")?;
        for (day, hours) in DAY_NAMES.iter().zip(result.dow_hours) {
            writeln!(
                out,
                "  {day}  {}  {}",
                self.paint(padded_bar(hours, max), |s| s.blue()),
                format_hours(hours)
            )?;
        }
        Ok(())
    }

    fn hourly(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        let max = result.hour_buckets.iter().copied().fold(0.0, f64::max);

        self.heading(out, "BY HOUR OF DAY")?;
        let cells: String = result
            .hour_buckets
            .iter()
            .map(|&hours| heat_cell(hours, max))
            .flat_map(|c| [c, c])
            .collect();
        writeln!(out, "  {}", self.paint(cells, |s| s.yellow()))?;
        writeln!(
            out,
            "  {}",
            self.paint("0     3     6     9     12    15    18    21    ", |s| {
                s.dark_grey()
            })
        )?;

        if let Some(peak) = peak_index(&result.hour_buckets) {
            writeln!(
                out,
                "  Peak hour {:02}:00 ({})",
                peak,
                format_hours(result.hour_buckets[peak])
            )?;
        }
        Ok(())
    }

    fn projects(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        let top = result.top_projects(TOP_PROJECTS);
        let max = top.first().map(|(_, hours)| *hours).unwrap_or(0.0);
        let name_width = top
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);

        self.heading(out, "TOP PROJECTS")?;
        for (name, hours) in top {
            writeln!(
                out,
                "  {:<name_width$}  {}  {}",
                truncate(name, name_width),
                self.paint(padded_bar(hours, max), |s| s.green()),
                format_hours(hours)
            )?;
        }
        let others = result.project_hours.len().saturating_sub(TOP_PROJECTS);
        if others > 0 {
            writeln!(
                out,
                "{}",
                self.paint(format!("  …and {others} more"), |s| s.dark_grey())
            )?;
        }
        Ok(())
    }

    fn streak(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        self.heading(out, "STREAK")?;
        writeln!(
            out,
            "  Longest run of consecutive active days: {}",
            self.paint(result.max_streak.to_string(), |s| s.bold())
        )
    }

    fn warnings(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        self.heading(out, "HEALTH")?;
        if result.warnings.is_empty() {
            return writeln!(out, "  {}", self.paint("No warnings. Nice pacing.", |s| s.green()));
        }
        for warning in &result.warnings {
            let badge = match warning.level {
                WarningLevel::Info => self.paint("info ", |s| s.blue()),
                WarningLevel::Warn => self.paint("warn ", |s| s.yellow()),
                WarningLevel::Alert => self.paint("alert", |s| s.red().bold()),
            };
            writeln!(out, "  {badge}  {}", warning.message)?;
        }
        Ok(())
    }

    fn tips(&self, out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
        let tips = contextual_tips(result);
        if tips.is_empty() {
            return Ok(());
        }

        self.heading(out, "TIPS")?;
        for tip in tips {
            writeln!(out, "  • {tip}")?;
        }
        Ok(())
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, result: &AnalysisResult) -> Result<String> {
        let mut out = String::new();

        writeln!(
            out,
            "{}",
            self.paint("AI ASSISTANT SESSION HOURS", |s| s.cyan().bold())
        )?;
        writeln!(out, "{}", self.paint("=".repeat(26), |s| s.cyan()))?;
        self.overview(&mut out, result)?;
        self.averages(&mut out, result)?;
        self.longest(&mut out, result)?;
        self.weekly(&mut out, result)?;
        self.hourly(&mut out, result)?;
        self.projects(&mut out, result)?;
        self.streak(&mut out, result)?;
        self.warnings(&mut out, result)?;
        self.tips(&mut out, result)?;

        writeln!(out)?;
        writeln!(out, "{}", self.paint("SHARE", |s| s.cyan().bold()))?;
        writeln!(out, "  {}", share_line(result))?;
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            self.paint(
                format!("Times shown in {}.", self.timezone_name),
                |s| s.dark_grey()
            )
        )?;

        Ok(out)
    }

    fn nothing_to_report(&self, reason: &str) -> Result<String> {
        Ok(format!(
            "{}\n{}",
            self.paint(reason, |s| s.yellow()),
            self.paint(
                "Transcripts are read from <data dir>/projects/*/*.jsonl. Use --data-dir to point elsewhere.",
                |s| s.dark_grey()
            )
        ))
    }
}

/// Bars are padded before styling so escape codes don't throw off alignment.
fn padded_bar(value: f64, max: f64) -> String {
    format!("{:<width$}", bar(value, max, BAR_WIDTH), width = BAR_WIDTH)
}

fn heat_cell(hours: f64, max: f64) -> char {
    if max <= 0.0 || hours <= 0.0 {
        return HEAT_LEVELS[0];
    }
    let level = ((hours / max) * (HEAT_LEVELS.len() - 1) as f64).ceil() as usize;
    HEAT_LEVELS[level.clamp(1, HEAT_LEVELS.len() - 1)]
}

fn peak_index(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(i, _)| i)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Short observations drawn from the histograms.
pub fn contextual_tips(result: &AnalysisResult) -> Vec<String> {
    let mut tips = Vec::new();
    if result.total_hours <= 0.0 {
        return tips;
    }

    if let Some(day) = peak_index(&result.dow_hours) {
        tips.push(format!(
            "{} is your busiest day ({:.0}% of all hours).",
            full_day_name(day),
            result.dow_hours[day] / result.total_hours * 100.0
        ));
    }

    let late_night: f64 = result.hour_buckets[0..5].iter().sum();
    let late_share = late_night / result.total_hours;
    if late_share >= 0.1 {
        tips.push(format!(
            "{:.0}% of your time starts between midnight and 5am. Protect your sleep.",
            late_share * 100.0
        ));
    }

    let weekend_share = (result.dow_hours[0] + result.dow_hours[6]) / result.total_hours;
    if weekend_share >= 0.25 {
        tips.push(format!(
            "{:.0}% of your hours land on weekends.",
            weekend_share * 100.0
        ));
    }

    if result.has_autonomous_sessions() {
        tips.push(
            "Some sessions ran longer than an interactive sitting; they are still counted in totals."
                .to_string(),
        );
    }

    tips
}

/// One line summary suitable for pasting elsewhere.
pub fn share_line(result: &AnalysisResult) -> String {
    format!(
        "{} with my AI assistant across {} sessions on {} days, best streak {} day{}.",
        format_hours(result.total_hours),
        result.total_sessions,
        result.active_days(),
        result.max_streak,
        if result.max_streak == 1 { "" } else { "s" }
    )
}

fn full_day_name(index: usize) -> &'static str {
    const NAMES: [&str; 7] = [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ];
    NAMES[index % 7]
}
