use std::fmt;

/// Result alias carrying an `error_stack` report, matching the convention used
/// throughout the crate.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// A single field that failed shape validation, with the reason it failed.
///
/// `path` is dotted for nested shapes (`links.request`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Config or call options did not match their declared shape.
///
/// Carries every offending field, not just the first one found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn single(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(path, reason)],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape validation failed")?;
        for (index, issue) in self.issues.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{issue}")?;
        }
        Ok(())
    }
}

/// The closed error taxonomy every gateway's status codes classify into.
///
/// Callers branch on [`PaymentError::kind`] instead of provider codes; the
/// original code and documented message ride along for logging and support.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// Config or options failed shape validation. Surfaced immediately,
    /// never retried, fatal to the call it belongs to.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The gateway rejected the call over merchant-side configuration
    /// (wrong credentials, inactive merchant). The integrator must fix
    /// their setup; the payer did nothing wrong.
    #[error("gateway rejected merchant configuration (code {code}): {message}")]
    BadConfig { code: String, message: String },

    /// The gateway rejected the call over payer action or input
    /// (cancelled, insufficient funds, invalid card). Show the payer a
    /// message; this is not a system fault.
    #[error("payment failed on the payer side (code {code}): {message}")]
    User { code: String, message: String },

    /// Any other gateway-side failure: transient faults, undocumented
    /// codes, malformed responses, transport errors. Retryable or
    /// alertable at the caller's discretion.
    #[error("gateway failure")]
    GatewayFailure {
        code: Option<String>,
        message: Option<String>,
    },
}

impl PaymentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::BadConfig { .. } => ErrorKind::BadConfig,
            Self::User { .. } => ErrorKind::User,
            Self::GatewayFailure { .. } => ErrorKind::GatewayFailure,
        }
    }

    /// A gateway failure with no structured detail, for transport-level and
    /// malformed-response errors.
    pub fn gateway_failure() -> Self {
        Self::GatewayFailure {
            code: None,
            message: None,
        }
    }

    pub fn gateway_failure_with(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GatewayFailure {
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }
}

/// Discriminant of [`PaymentError`] for provider-agnostic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    BadConfig,
    User,
    GatewayFailure,
}

/// A gateway's documented status/error codes and their taxonomy kinds.
///
/// Classification is a pure lookup: the same code always yields the same
/// kind. Codes missing from the table fall back to `GatewayFailure` — the
/// provider tables have documented gaps, and treating unknown codes as
/// gateway-side is observed behavior, not a documented contract.
#[derive(Debug, Clone, Copy)]
pub struct CodeTable {
    entries: &'static [(&'static str, ErrorKind, &'static str)],
}

impl CodeTable {
    pub const fn new(entries: &'static [(&'static str, ErrorKind, &'static str)]) -> Self {
        Self { entries }
    }

    pub fn classify(&self, code: &str) -> PaymentError {
        for (known, kind, message) in self.entries {
            if *known == code {
                return match kind {
                    ErrorKind::BadConfig => PaymentError::BadConfig {
                        code: code.to_owned(),
                        message: (*message).to_owned(),
                    },
                    ErrorKind::User => PaymentError::User {
                        code: code.to_owned(),
                        message: (*message).to_owned(),
                    },
                    ErrorKind::GatewayFailure | ErrorKind::Validation => {
                        PaymentError::GatewayFailure {
                            code: Some(code.to_owned()),
                            message: Some((*message).to_owned()),
                        }
                    }
                };
            }
        }
        PaymentError::GatewayFailure {
            code: Some(code.to_owned()),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: CodeTable = CodeTable::new(&[
        ("-3", ErrorKind::BadConfig, "api key is not valid"),
        ("0", ErrorKind::User, "payment was cancelled by the payer"),
        ("-42", ErrorKind::GatewayFailure, "internal gateway error"),
    ]);

    #[test]
    fn classification_covers_all_three_kinds() {
        assert_eq!(TABLE.classify("-3").kind(), ErrorKind::BadConfig);
        assert_eq!(TABLE.classify("0").kind(), ErrorKind::User);
        assert_eq!(TABLE.classify("-42").kind(), ErrorKind::GatewayFailure);
    }

    #[test]
    fn unknown_codes_default_to_gateway_failure() {
        let error = TABLE.classify("-999");
        assert_eq!(
            error,
            PaymentError::GatewayFailure {
                code: Some("-999".to_owned()),
                message: None,
            }
        );
    }

    #[test]
    fn classification_is_idempotent() {
        for code in ["-3", "0", "-42", "whatever"] {
            assert_eq!(TABLE.classify(code), TABLE.classify(code));
        }
    }

    #[test]
    fn validation_error_lists_every_issue() {
        let error = ValidationError::new(vec![
            FieldIssue::new("amount", "must be a positive integer"),
            FieldIssue::new("links.request", "must be an absolute URL"),
        ]);
        let rendered = error.to_string();
        assert!(rendered.contains("amount: must be a positive integer"));
        assert!(rendered.contains("links.request: must be an absolute URL"));
    }
}
