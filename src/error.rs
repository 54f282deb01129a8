use thiserror::Error;

/// Typed failures surfaced by the dashboard core.
///
/// Upstream and envelope errors never leave the fetcher on their own: they are
/// logged and replaced by fallback data. Only `Aggregate` reaches the caller of
/// the indicator service.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("upstream request for {indicator} failed: {message}")]
    Upstream { indicator: String, message: String },

    #[error("upstream envelope reported failure: {0}")]
    Envelope(String),

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("series for {0} has no observations")]
    EmptySeries(String),

    #[error("no fallback series registered for {0}")]
    MissingFallback(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to assemble {group} indicators: {source}")]
    Aggregate {
        group: &'static str,
        #[source]
        source: Box<DashboardError>,
    },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
