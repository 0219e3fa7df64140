use crate::error::ConfigError;
use core_types::SharpeBasis;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections and keys take the
/// defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub display: DisplaySettings,
}

/// Parameters for the analytics engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// How each trade's return is normalized for the Sharpe ratio.
    pub sharpe_basis: SharpeBasis,
    /// Date range applied when none is given on the command line
    /// (e.g. "all", "30d", "ytd", "2024-01-01..2024-06-30").
    pub default_range: String,
    /// How many hours the hourly summary lists.
    pub top_hours: usize,
}

/// Parameters for rendering reports.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Maximum rows shown per breakdown table.
    pub max_rows: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            sharpe_basis: SharpeBasis::PerTrade,
            default_range: "all".to_string(),
            top_hours: 5,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { max_rows: 20 }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::ValidationError {
            field,
            reason: reason.to_string(),
        };
        if self.analytics.top_hours == 0 {
            return Err(invalid("analytics.top_hours", "must be at least 1"));
        }
        if self.analytics.default_range.trim().is_empty() {
            return Err(invalid("analytics.default_range", "must not be empty"));
        }
        if self.display.max_rows == 0 {
            return Err(invalid("display.max_rows", "must be at least 1"));
        }
        Ok(())
    }
}
