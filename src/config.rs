use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::edge_lines::{DEFAULT_HEAD_BYTES, DEFAULT_TAIL_BYTES};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub analysis: AnalysisConfig,
    pub scan: ScanConfig,
    pub formatting: FormattingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Overrides the transcript root (the directory containing `projects/`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Thresholds used by the stats analyzer and its health warnings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub long_session_hours: f64,
    pub streak_warning_days: u32,
    pub high_session_average_hours: f64,
    pub high_daily_average_hours: f64,
    /// Sessions longer than this are treated as autonomous runs when picking the longest session.
    pub interactive_cutoff_hours: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            long_session_hours: 3.0,
            streak_warning_days: 7,
            high_session_average_hours: 2.0,
            high_daily_average_hours: 6.0,
            interactive_cutoff_hours: 8.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub min_file_bytes: u64,
    pub max_session_hours: f64,
    pub head_bytes: usize,
    pub tail_bytes: usize,
    pub extension: String,
    pub max_concurrent_reads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_file_bytes: 50,
            max_session_hours: 168.0,
            head_bytes: DEFAULT_HEAD_BYTES,
            tail_bytes: DEFAULT_TAIL_BYTES,
            extension: "jsonl".to_string(),
            max_concurrent_reads: 32,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormattingConfig {
    pub number_comma: bool,
    pub locale: String,
    /// IANA timezone name. Unset means the machine's local timezone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            number_comma: true,
            locale: "en".to_string(),
            timezone: None,
        }
    }
}

#[cfg(test)]
thread_local! {
    static TEST_CONFIG_PATH: std::cell::RefCell<Option<PathBuf>> = const { std::cell::RefCell::new(None) };
}

#[cfg(test)]
pub fn set_test_config_path(path: PathBuf) {
    TEST_CONFIG_PATH.with(|p| *p.borrow_mut() = Some(path));
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(test)]
        {
            if let Some(path) = TEST_CONFIG_PATH.with(|p| p.borrow().clone()) {
                return Ok(path);
            }
        }

        Ok(dirs::home_dir()
            .context("Could not find home directory")?
            .join(".session-hours.toml"))
    }

    pub fn load() -> Result<Option<Config>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(Some(config))
    }

    pub fn save(&self, silent: bool) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        if !silent {
            println!("✅ Configuration saved to: {}", config_path.display());
        }

        Ok(())
    }

    /// The transcript root: explicit override, then config, then
    /// `CLAUDE_CONFIG_DIR`, then `~/.claude`.
    pub fn resolve_data_dir(&self, cli_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = cli_override.or_else(|| self.paths.data_dir.clone()) {
            return Ok(dir);
        }
        if let Some(dir) = std::env::var_os("CLAUDE_CONFIG_DIR").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        Ok(dirs::home_dir()
            .context("Could not find home directory")?
            .join(".claude"))
    }

    /// The configured timezone, if any. Invalid names are an error rather than
    /// a silent fallback to local time.
    pub fn timezone(&self) -> Result<Option<chrono_tz::Tz>> {
        self.formatting
            .timezone
            .as_deref()
            .map(|name| {
                name.parse::<chrono_tz::Tz>()
                    .map_err(|e| anyhow::anyhow!("Invalid timezone '{name}': {e}"))
            })
            .transpose()
    }
}

// CLI helper functions
pub fn create_default_config(overwrite: bool) -> Result<()> {
    let config = Config::default();
    if !std::fs::exists(Config::config_path()?)? || overwrite {
        config.save(true)?;

        println!("📝 Created default configuration file.");
        println!("📍 Adjust thresholds with:");
        println!("   session-hours config set long-session-hours 4");
        println!("or edit");
        println!("   {}", Config::config_path()?.display());
    } else {
        println!("Configuration already exists.  Pass `--overwrite` to overwrite.");
    }

    Ok(())
}

pub fn show_config() -> Result<()> {
    match Config::load()? {
        Some(config) => {
            println!("🔧 Current configuration:");
            println!(
                "   Data Dir: {}",
                config.resolve_data_dir(None)?.display()
            );
            println!(
                "   Timezone: {}",
                config
                    .formatting
                    .timezone
                    .clone()
                    .unwrap_or_else(|| format!("{} (local)", crate::utils::get_local_timezone()))
            );
            println!("   Number Comma: {}", config.formatting.number_comma);
            println!("   Locale: {}", config.formatting.locale);
            println!(
                "   Long Session Hours: {}",
                config.analysis.long_session_hours
            );
            println!(
                "   Streak Warning Days: {}",
                config.analysis.streak_warning_days
            );
            println!(
                "   High Session Average Hours: {}",
                config.analysis.high_session_average_hours
            );
            println!(
                "   High Daily Average Hours: {}",
                config.analysis.high_daily_average_hours
            );
            println!(
                "   Interactive Cutoff Hours: {}",
                config.analysis.interactive_cutoff_hours
            );
            println!("   Min File Bytes: {}", config.scan.min_file_bytes);
        }
        None => {
            println!("❌ No configuration file found.");
            println!("   Run 'session-hours config init' to create one.");
        }
    }
    Ok(())
}

fn parse_hours(value: &str) -> Result<f64> {
    let hours = value
        .parse::<f64>()
        .context("Invalid number value")?;
    if !hours.is_finite() || hours < 0.0 {
        anyhow::bail!("Hours must be a non-negative number");
    }
    Ok(hours)
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?.unwrap_or_default();

    match key {
        "data-dir" => config.paths.data_dir = Some(PathBuf::from(value)),
        "timezone" => {
            value
                .parse::<chrono_tz::Tz>()
                .map_err(|e| anyhow::anyhow!("Invalid timezone '{value}': {e}"))?;
            config.formatting.timezone = Some(value.to_string());
        }
        "number-comma" => {
            let enabled = value
                .parse::<bool>()
                .context("Invalid boolean value. Use 'true' or 'false'")?;
            config.formatting.number_comma = enabled;
        }
        "locale" => {
            config.formatting.locale = value.to_string();
        }
        "long-session-hours" => config.analysis.long_session_hours = parse_hours(value)?,
        "streak-warning-days" => {
            config.analysis.streak_warning_days =
                value.parse::<u32>().context("Invalid number value")?;
        }
        "high-session-average-hours" => {
            config.analysis.high_session_average_hours = parse_hours(value)?
        }
        "high-daily-average-hours" => {
            config.analysis.high_daily_average_hours = parse_hours(value)?
        }
        "interactive-cutoff-hours" => {
            config.analysis.interactive_cutoff_hours = parse_hours(value)?
        }
        "min-file-bytes" => {
            config.scan.min_file_bytes = value.parse::<u64>().context("Invalid number value")?;
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    config.save(false)?;
    Ok(())
}
