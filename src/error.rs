//! Error taxonomy for a single pipeline run.
//!
//! Each variant names the stage that failed. Any of them aborts the remaining
//! stages of the current run; retrying is left to whoever triggered the run.

use thiserror::Error;

// ---

#[derive(Debug, Error)]
pub enum PipelineError {
    // ---
    /// Transport failure, non-2xx status, or an undecodable response body
    /// from the weather source.
    #[error("weather request to {endpoint} failed")]
    Fetch {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The source answered successfully but had no record for the station.
    #[error("station {station} currently has no observations")]
    NoData { station: String },

    /// A raw field that is neither a number nor a designated sentinel token.
    #[error("malformed {field} value {value:?}")]
    Parse { field: &'static str, value: String },

    #[error("failed to {action} observation store")]
    Persist {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("push to {endpoint} failed")]
    Notify {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl PipelineError {
    // ---
    pub(crate) fn parse(field: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            field,
            value: value.into(),
        }
    }

    /// Short stage label used in logs and HTTP responses.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch { .. } | Self::NoData { .. } => "fetch",
            Self::Parse { .. } => "transform",
            Self::Persist { .. } => "persist",
            Self::Notify { .. } => "notify",
        }
    }
}
