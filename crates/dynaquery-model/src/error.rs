//! Store error types.
//!
//! Failures reported by a document store client are classified into a small
//! set of categories. Callers branch on the category (the [`StoreErrorCode`]),
//! never on transport-specific status codes or message text.

use std::fmt;

/// Well-known store error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum StoreErrorCode {
    /// Table not found.
    ResourceNotFoundException,
    /// A condition expression evaluated to false.
    ConditionalCheckFailedException,
    /// The table is over its throughput allowance.
    ProvisionedThroughputExceededException,
    /// The account is over its request rate.
    RequestLimitExceeded,
    /// The request was malformed.
    #[default]
    ValidationException,
    /// The payload could not be (de)serialized.
    SerializationException,
    /// The store failed internally.
    InternalServerError,
    /// The request never reached the store, or the response never came back.
    TransportError,
}

impl StoreErrorCode {
    /// The unqualified code, as the store spells it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::ProvisionedThroughputExceededException => {
                "ProvisionedThroughputExceededException"
            }
            Self::RequestLimitExceeded => "RequestLimitExceeded",
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
            Self::TransportError => "TransportError",
        }
    }

    /// Parse a short error code as reported by the store.
    ///
    /// Unrecognized codes map to `None` so callers can choose a fallback.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.rsplit('#').next().unwrap_or(code);
        match code {
            "ResourceNotFoundException" => Some(Self::ResourceNotFoundException),
            "ConditionalCheckFailedException" => Some(Self::ConditionalCheckFailedException),
            "ProvisionedThroughputExceededException" => {
                Some(Self::ProvisionedThroughputExceededException)
            }
            "RequestLimitExceeded" | "ThrottlingException" => Some(Self::RequestLimitExceeded),
            "ValidationException" => Some(Self::ValidationException),
            "SerializationException" => Some(Self::SerializationException),
            "InternalServerError" => Some(Self::InternalServerError),
            _ => None,
        }
    }

    /// Returns `true` for throttling categories.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceededException | Self::RequestLimitExceeded
        )
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by (or on the way to) the document store.
#[derive(Debug)]
pub struct StoreError {
    /// The error category.
    pub code: StoreErrorCode,
    /// Store-provided or locally built description.
    pub message: String,
    /// What caused it, when known.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl StoreError {
    /// Create a new `StoreError` from an error code.
    #[must_use]
    pub fn new(code: StoreErrorCode) -> Self {
        Self {
            message: code.as_str().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `StoreError` with a custom message.
    #[must_use]
    pub fn with_message(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns `true` if a condition expression rejected the write.
    #[must_use]
    pub fn is_conditional_check_failed(&self) -> bool {
        self.code == StoreErrorCode::ConditionalCheckFailedException
    }

    /// The table does not exist.
    #[must_use]
    pub fn resource_not_found(message: impl Into<String>) -> Self {
        Self::with_message(StoreErrorCode::ResourceNotFoundException, message)
    }

    /// The write condition did not hold.
    #[must_use]
    pub fn conditional_check_failed(message: impl Into<String>) -> Self {
        Self::with_message(StoreErrorCode::ConditionalCheckFailedException, message)
    }

    /// Validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(StoreErrorCode::ValidationException, message)
    }

    /// Throughput exceeded.
    #[must_use]
    pub fn throughput_exceeded(message: impl Into<String>) -> Self {
        Self::with_message(StoreErrorCode::ProvisionedThroughputExceededException, message)
    }

    /// Internal store error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(StoreErrorCode::InternalServerError, message)
    }

    /// Transport failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::with_message(StoreErrorCode::TransportError, message)
    }
}

/// Create a `StoreError` from an error code.
///
/// # Examples
///
/// ```
/// use dynaquery_model::store_error;
/// use dynaquery_model::error::StoreErrorCode;
///
/// let err = store_error!(ValidationException);
/// assert_eq!(err.code, StoreErrorCode::ValidationException);
///
/// let err = store_error!(ResourceNotFoundException, "Table not found");
/// assert_eq!(err.message, "Table not found");
/// ```
#[macro_export]
macro_rules! store_error {
    ($code:ident) => {
        $crate::error::StoreError::new($crate::error::StoreErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::StoreError::with_message($crate::error::StoreErrorCode::$code, $msg)
    };
}
