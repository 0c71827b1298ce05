//! Error type shared by every Sharenote operation.

use thiserror::Error;

/// Result alias for Sharenote operations.
pub type Result<T> = core::result::Result<T, SharenoteError>;

/// Errors raised by note construction, conversion and formatting.
///
/// Every operation is deterministic, so retrying with the same input fails
/// the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SharenoteError {
    /// Non-finite or out-of-domain numeric input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Malformed string input (compact hex, hashrate text)
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// Text that matches none of the label grammars
    #[error("invalid sharenote label: {0:?}")]
    InvalidLabel(String),
    /// Unrecognized hashrate unit
    #[error("invalid hashrate unit: {0:?}")]
    InvalidUnit(String),
    /// Ratio with a zero denominator difficulty
    #[error("division by zero difficulty")]
    DivisionByZero,
    /// Note too heavy to express as a 256-bit target
    #[error("target underflow: zBits {0} exceeds 256")]
    TargetUnderflow(f64),
    /// Compact exponent does not fit in one byte
    #[error("compact overflow: exponent {0} exceeds 255")]
    Overflow(u64),
}

impl SharenoteError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        SharenoteError::InvalidArgument(msg.into())
    }

    /// Stable identifier for the error kind, used as the JS error name.
    pub fn code(&self) -> &'static str {
        match self {
            SharenoteError::InvalidArgument(_) => "InvalidArgument",
            SharenoteError::InvalidFormat(_) => "InvalidFormat",
            SharenoteError::InvalidLabel(_) => "InvalidLabel",
            SharenoteError::InvalidUnit(_) => "InvalidUnit",
            SharenoteError::DivisionByZero => "DivisionByZero",
            SharenoteError::TargetUnderflow(_) => "TargetUnderflow",
            SharenoteError::Overflow(_) => "Overflow",
        }
    }
}

/// Require a finite value strictly greater than zero.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SharenoteError::invalid_argument(format!(
            "{} must be a finite number greater than zero, got {}",
            name, value
        )));
    }
    Ok(value)
}

/// Require a finite value greater than or equal to zero.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SharenoteError::invalid_argument(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(SharenoteError::DivisionByZero.code(), "DivisionByZero");
        assert_eq!(SharenoteError::Overflow(256).code(), "Overflow");
        assert_eq!(
            SharenoteError::InvalidLabel("x".into()).code(),
            "InvalidLabel"
        );
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("seconds", 5.0), Ok(5.0));
        assert!(ensure_positive("seconds", 0.0).is_err());
        assert!(ensure_positive("seconds", -1.0).is_err());
        assert!(ensure_positive("seconds", f64::NAN).is_err());
        assert!(ensure_positive("seconds", f64::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert_eq!(ensure_non_negative("factor", 0.0), Ok(0.0));
        assert!(ensure_non_negative("factor", -0.5).is_err());
    }

    #[test]
    fn test_display() {
        let err = SharenoteError::InvalidUnit("XH/s".into());
        assert_eq!(err.to_string(), "invalid hashrate unit: \"XH/s\"");
    }
}
