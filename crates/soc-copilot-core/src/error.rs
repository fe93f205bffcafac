//! Error types for SOC Copilot core.

use std::fmt;

/// The main error type for core operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Frame-scheduling error.
    Frame(FrameError),
    /// Invalid animation parameters.
    Param(ParamError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(err) => write!(f, "Frame error: {err}"),
            Self::Param(err) => write!(f, "Parameter error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Frame(err) => Some(err),
            Self::Param(err) => Some(err),
        }
    }
}

/// Frame-scheduler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The handle is unknown, already ran, or was already cancelled.
    InvalidHandle,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle => write!(f, "Invalid, expired or cancelled frame handle"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Count-up parameter errors reported by [`crate::CountUpConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A numeric input was NaN or infinite.
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The value that was supplied.
        value: f64,
    },
    /// The duration was zero, negative or not finite.
    NonPositiveDuration(f64),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field, value } => {
                write!(f, "`{field}` must be finite, got {value}")
            }
            Self::NonPositiveDuration(ms) => {
                write!(f, "duration must be a positive number of milliseconds, got {ms}")
            }
        }
    }
}

impl std::error::Error for ParamError {}

impl From<FrameError> for CoreError {
    fn from(err: FrameError) -> Self {
        Self::Frame(err)
    }
}

impl From<ParamError> for CoreError {
    fn from(err: ParamError) -> Self {
        Self::Param(err)
    }
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CoreError::from(FrameError::InvalidHandle);
        assert_eq!(
            err.to_string(),
            "Frame error: Invalid, expired or cancelled frame handle"
        );

        let err = CoreError::from(ParamError::NonPositiveDuration(-5.0));
        assert!(err.to_string().contains("got -5"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err = CoreError::from(ParamError::NonFinite {
            field: "end",
            value: f64::NAN,
        });
        assert!(err.source().is_some());
    }
}
