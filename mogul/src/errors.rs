use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for mogul operations.
///
/// Each kind names one category of failure so callers can branch on the
/// cause without parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::errors::{ErrorKind, MogulError, MogulResult};
///
/// fn example() -> MogulResult<()> {
///     Err(MogulError::new("no document matched", ErrorKind::NoDocuments))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Construction errors, latched into a condition builder
    /// Error while building a filter expression
    FilterError,
    /// The identifier is not a valid hex object id or is the nil id
    InvalidId,
    /// `filter_by` received a value that is neither a struct nor a map
    InvalidFilterSource,

    // Resolution errors
    /// The naming convention produced an unusable collection name
    InvalidCollectionName,

    // Read errors
    /// A single-document read matched nothing
    NoDocuments,

    // Data mapping errors
    /// Error encoding or decoding bson
    EncodingError,
    /// Error mapping a model to or from a document
    ObjectMappingError,

    // Store errors
    /// A unique index rejected the write
    DuplicateKey,
    /// The store does not understand an operator or stage
    UnsupportedOperator,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Generic failure reported by a store backend
    BackendError,

    // Context errors
    /// The operation deadline passed before the call completed
    Timeout,
    /// The operation context was cancelled
    Cancelled,

    // Configuration errors
    /// Invalid configuration value
    ValidationError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::InvalidId => write!(f, "Invalid identifier"),
            ErrorKind::InvalidFilterSource => write!(f, "Invalid filter source"),
            ErrorKind::InvalidCollectionName => write!(f, "Invalid collection name"),
            ErrorKind::NoDocuments => write!(f, "No documents"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::UnsupportedOperator => write!(f, "Unsupported operator"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::Cancelled => write!(f, "Cancelled"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom mogul error type.
///
/// `MogulError` carries a message, an [`ErrorKind`], an optional cause and
/// the backtrace captured at construction. It is `Clone` so a condition
/// builder can hand the same latched error out on every materialization.
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::errors::{ErrorKind, MogulError};
///
/// let cause = MogulError::new("socket closed", ErrorKind::BackendError);
/// let err = MogulError::new_with_cause("find failed", ErrorKind::BackendError, cause);
/// ```
#[derive(Clone)]
pub struct MogulError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MogulError>>,
    backtrace: Atomic<Backtrace>,
}

impl MogulError {
    /// Creates a new `MogulError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MogulError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new `MogulError` wrapping a cause.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error that caused this error
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MogulError) -> Self {
        MogulError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new_unresolved()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MogulError> {
        self.cause.as_deref()
    }
}

impl PartialEq for MogulError {
    fn eq(&self, other: &Self) -> bool {
        self.error_kind == other.error_kind
            && self.message == other.message
            && self.cause == other.cause
    }
}

impl Display for MogulError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MogulError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({})\nCaused by: {:?}", self.message, self.error_kind, cause),
            None => {
                let mut backtrace = self.backtrace.write();
                backtrace.resolve();
                write!(f, "{} ({})\n{:?}", self.message, self.error_kind, *backtrace)
            }
        }
    }
}

impl Error for MogulError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, MogulError>`.
pub type MogulResult<T> = Result<T, MogulError>;

impl de::Error for MogulError {
    fn custom<T: Display>(msg: T) -> Self {
        MogulError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl ser::Error for MogulError {
    fn custom<T: Display>(msg: T) -> Self {
        MogulError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl From<bson::ser::Error> for MogulError {
    fn from(err: bson::ser::Error) -> Self {
        MogulError::new(
            &format!("bson serialization error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<bson::de::Error> for MogulError {
    fn from(err: bson::de::Error) -> Self {
        MogulError::new(
            &format!("bson deserialization error: {}", err),
            ErrorKind::ObjectMappingError,
        )
    }
}

impl From<bson::oid::Error> for MogulError {
    fn from(err: bson::oid::Error) -> Self {
        MogulError::new(&format!("invalid identifier: {}", err), ErrorKind::InvalidId)
    }
}

impl From<regex::Error> for MogulError {
    fn from(err: regex::Error) -> Self {
        MogulError::new(
            &format!("invalid regular expression: {}", err),
            ErrorKind::FilterError,
        )
    }
}

impl From<String> for MogulError {
    fn from(msg: String) -> Self {
        MogulError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for MogulError {
    fn from(msg: &str) -> Self {
        MogulError::new(msg, ErrorKind::InternalError)
    }
}
