//! Domain error types.

/// Top-level error type for skintrader.
///
/// Only the I/O and configuration edges produce these. Data problems inside
/// the signal engine degrade to "no signal" instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum SkintraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to load data: {reason}")]
    DataLoad { reason: String },

    #[error("no data for item {item}")]
    NoData { item: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SkintraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SkintraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SkintraderError> for std::process::ExitCode {
    fn from(err: &SkintraderError) -> Self {
        let code: u8 = match err {
            SkintraderError::Io(_) => 1,
            SkintraderError::ConfigParse { .. }
            | SkintraderError::ConfigMissing { .. }
            | SkintraderError::ConfigInvalid { .. } => 2,
            SkintraderError::DataLoad { .. } | SkintraderError::Json(_) => 3,
            SkintraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
