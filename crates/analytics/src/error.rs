use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid date range '{0}': expected 'all', '<n>d', 'ytd' or 'YYYY-MM-DD..YYYY-MM-DD'")]
    InvalidRange(String),

    #[error("Unknown grouping '{0}': expected strategy, instrument, hour, weekday or month")]
    UnknownGrouping(String),
}
