use crate::error::{AppError, Result};

pub const CSV_FILE_NAME: &str = "matchup_analysis.csv";
pub const CSV_MIME: &str = "text/csv; charset=utf-8";

pub const XLSX_FILE_NAME: &str = "matchup_analysis.xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Worksheet name used by the spreadsheet export.
pub const SHEET_NAME: &str = "Matchup";

/// Header fill of the spreadsheet export (light gray).
pub const XLSX_HEADER_FILL: u32 = 0xDDDDDD;

/// Prefix of every user-visible generate failure.
pub const GENERATE_ERROR_PREFIX: &str = "Error generating table";

/// Largest statistic magnitude accepted from an editor grid. Keeps every
/// `pitcher - batter` delta finite.
pub const MAX_STAT_MAGNITUDE: f64 = 1e15;

/// Delta band thresholds. Both bounds are inclusive on the side closer to zero:
/// `-MODERATE_MAX` is medium red, `STRONG_MAX` is medium green.
pub mod band_thresholds {
    pub const MODERATE_MAX: f64 = 20.0;
    pub const STRONG_MAX: f64 = 45.0;
}

/// Band palette as `(background, foreground)` hex colors.
pub mod band_colors {
    pub const DARK_RED: (&str, Option<&str>) = ("#990000", Some("white"));
    pub const MEDIUM_RED: (&str, Option<&str>) = ("#e06666", None);
    pub const LIGHT_RED: (&str, Option<&str>) = ("#f4cccc", None);
    pub const LIGHT_GREEN: (&str, Option<&str>) = ("#d9ead3", None);
    pub const MEDIUM_GREEN: (&str, Option<&str>) = ("#93c47d", None);
    pub const DARK_GREEN: (&str, Option<&str>) = ("#38761d", Some("white"));
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_port: u16,
    /// Upper bound on concurrently open sessions (MAX_SESSIONS)
    pub max_sessions: usize,
    /// Sessions untouched for longer than this are discarded (SESSION_IDLE_SECS)
    pub session_idle_secs: u64,
    /// Rows accepted per editor grid (MAX_TABLE_ROWS)
    pub max_table_rows: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            max_sessions: std::env::var("MAX_SESSIONS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse::<usize>()
                .unwrap_or(1000),
            session_idle_secs: std::env::var("SESSION_IDLE_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .unwrap_or(3600),
            max_table_rows: std::env::var("MAX_TABLE_ROWS")
                .unwrap_or_else(|_| "500".to_string())
                .parse::<usize>()
                .unwrap_or(500),
        })
    }
}
