//! Domain error types.

/// Top-level error type for tradesim.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("source failed at index {index}: {reason}")]
    Source { index: usize, reason: String },

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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SimError> for std::process::ExitCode {
    fn from(err: &SimError) -> Self {
        let code: u8 = match err {
            SimError::Io(_) => 1,
            SimError::ConfigParse { .. }
            | SimError::ConfigMissing { .. }
            | SimError::ConfigInvalid { .. } => 2,
            SimError::Source { .. } => 3,
            SimError::Data { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn source_error_message_names_index() {
        let err = SimError::Source {
            index: 7,
            reason: "feed offline".into(),
        };
        assert_eq!(err.to_string(), "source failed at index 7: feed offline");
    }

    #[test]
    fn config_errors_map_to_exit_code_2() {
        let err = SimError::ConfigMissing {
            section: "simulation".into(),
            key: "initial_balance".into(),
        };
        assert_eq!(format!("{:?}", ExitCode::from(&err)), format!("{:?}", ExitCode::from(2)));
        assert_eq!(
            err.to_string(),
            "missing config key [simulation] initial_balance"
        );
    }

    #[test]
    fn source_and_data_errors_have_distinct_exit_codes() {
        let source = SimError::Source {
            index: 0,
            reason: "x".into(),
        };
        let data = SimError::Data { reason: "y".into() };
        assert_eq!(format!("{:?}", ExitCode::from(&source)), format!("{:?}", ExitCode::from(3)));
        assert_eq!(format!("{:?}", ExitCode::from(&data)), format!("{:?}", ExitCode::from(4)));
    }

    #[test]
    fn io_error_converts() {
        let err: SimError = std::io::Error::other("disk full").into();
        assert!(matches!(err, SimError::Io(_)));
        assert_eq!(format!("{:?}", ExitCode::from(&err)), format!("{:?}", ExitCode::from(1)));
    }
}
