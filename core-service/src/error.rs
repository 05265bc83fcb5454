use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<core_runtime::Error> for CoreError {
    fn from(err: core_runtime::Error) -> Self {
        match err {
            core_runtime::Error::CapabilityMissing {
                capability,
                message,
            } => CoreError::CapabilityMissing {
                capability,
                message,
            },
            core_runtime::Error::Config(message) => CoreError::Config(message),
            core_runtime::Error::Internal(message) => CoreError::InitializationFailed(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_errors_keep_capability_name() {
        let err: CoreError = core_runtime::Error::CapabilityMissing {
            capability: "PickerHost".to_string(),
            message: "no picker".to_string(),
        }
        .into();

        assert!(matches!(
            err,
            CoreError::CapabilityMissing { ref capability, .. } if capability == "PickerHost"
        ));
        assert_eq!(err.to_string(), "Capability missing: PickerHost - no picker");
    }

    #[test]
    fn test_config_error_message() {
        let err: CoreError = core_runtime::Error::Config("event_buffer_size must be > 0".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: event_buffer_size must be > 0"
        );
    }
}
