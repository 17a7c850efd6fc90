use thiserror::Error;

pub type CaptionResult<T> = Result<T, CaptionError>;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse subtitles as {0}")]
    Subtitle(String),

    #[error("unrecognized caption input: {0}")]
    UnrecognizedShape(String),

    #[error("bad timestamp: '{0}'")]
    InvalidTime(String),

    #[error("tsv failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to render {format}: {reason}")]
    Render { format: &'static str, reason: String },

    #[error("no display segment starts at {start:.3}s")]
    UnknownSegmentStart { start: f64 },
}

impl CaptionError {
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "CAPSYNC-JSON",
            Self::Subtitle(_) => "CAPSYNC-SUBTITLE",
            Self::UnrecognizedShape(_) => "CAPSYNC-SHAPE",
            Self::InvalidTime(_) => "CAPSYNC-TIME",
            Self::Csv(_) => "CAPSYNC-CSV",
            Self::Render { .. } => "CAPSYNC-RENDER",
            Self::UnknownSegmentStart { .. } => "CAPSYNC-UNKNOWN-START",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_start_message_includes_time() {
        let err = CaptionError::UnknownSegmentStart { start: 12.5 };
        assert_eq!(err.to_string(), "no display segment starts at 12.500s");
        assert_eq!(err.error_code(), "CAPSYNC-UNKNOWN-START");
    }

    #[test]
    fn json_errors_convert() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: CaptionError = parse.unwrap_err().into();
        assert_eq!(err.error_code(), "CAPSYNC-JSON");
        assert!(err.to_string().starts_with("json failure"));
    }
}
