//! Error types for MOBF encoding, decoding, and persistence
//!
//! Every failure in the workspace is a [`MobfError`]. Variants fall into
//! one of five [`ErrorCategory`] buckets so callers can tell corrupt data
//! apart from API misuse without matching on individual variants:
//!
//! | Category | Meaning |
//! |----------|---------|
//! | `Stream` | fewer bytes available than a fixed-width read requires |
//! | `Corruption` | bytes are present but structurally invalid |
//! | `Usage` | the caller built or configured something the format cannot express |
//! | `RegistryMiss` | a type id with no registered decoder |
//! | `Io` | the underlying stream failed |
//!
//! Nothing in the workspace retries or swallows these errors.

use crate::type_id::TypeId;
use std::io;
use thiserror::Error;

/// Result type alias for MOBF operations
pub type MobfResult<T> = std::result::Result<T, MobfError>;

/// Coarse classification of a [`MobfError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Stream ended before a fixed-width value was complete
    Stream,
    /// Structurally invalid data
    Corruption,
    /// Programmer error against the API
    Usage,
    /// Unregistered type id met during decode
    RegistryMiss,
    /// Underlying I/O failure
    Io,
}

/// Errors raised by the MOBF codec, value model, and document store
#[derive(Debug, Error)]
pub enum MobfError {
    // =========================================================================
    // Stream exhaustion
    // =========================================================================
    /// Fewer bytes were available than the read required
    #[error("Truncated stream: {0}")]
    TruncatedStream(String),

    // =========================================================================
    // Structural corruption
    // =========================================================================
    /// The 4 magic bytes did not match
    #[error("Bad signature: expected {expected:02x?}, found {found:02x?}")]
    BadSignature {
        /// Magic the decoder expected
        expected: [u8; 4],
        /// Bytes actually read
        found: [u8; 4],
    },

    /// The charset byte maps to no known charset
    #[error("Bad charset id: 0x{0:02x}")]
    BadCharset(u8),

    /// The reserved header bytes were not both zero
    #[error("Bad header trailer: {0:02x?}")]
    BadTrailer([u8; 2]),

    /// The first body value was not an Object
    #[error("Document root is not an object (type id {0})")]
    NotAnObject(u8),

    /// A timestamp control byte or field was invalid
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// String bytes did not decode under the declared charset
    #[error("Invalid string: {0}")]
    InvalidString(String),

    /// A container declared an element type it cannot hold
    #[error("Invalid element type {id} in {container}")]
    InvalidElementType {
        /// Container being decoded
        container: &'static str,
        /// Offending type id
        id: u8,
    },

    /// Containers nest deeper than the decoder accepts
    #[error("Nesting depth exceeds {0}")]
    NestingTooDeep(usize),

    // =========================================================================
    // Usage errors
    // =========================================================================
    /// A value nested in an object or list carries no name
    #[error("Unnamed {0} value inside a named container")]
    UnnamedValue(TypeId),

    /// An array element is not a primitive
    #[error("Array elements must be primitive, found {0}")]
    NonPrimitiveElement(TypeId),

    /// Container elements do not share one type id
    #[error("Heterogeneous elements at index {index}: expected {expected}, found {found}")]
    HeterogeneousElements {
        /// Index of the first mismatching element
        index: usize,
        /// Type id of the first element
        expected: TypeId,
        /// Type id found at `index`
        found: TypeId,
    },

    /// A registry binding conflicts with an existing one
    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    /// Write was requested on a store with no hydrated document
    #[error("No header or root document to write")]
    NoHeaderOrRoot,

    /// A timestamp field is out of its encodable range
    #[error("Invalid timestamp field {field}: {value}")]
    InvalidTimestampField {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: i64,
    },

    /// A length does not fit the 32-bit wire prefix
    #[error("Length {0} exceeds the 32-bit wire limit")]
    LengthOverflow(usize),

    /// A value tree nests deeper than decoders accept
    #[error("Value nests deeper than {0} levels and cannot be encoded")]
    EncodeTooDeep(usize),

    /// Store configuration could not be parsed or validated
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Registry misses
    // =========================================================================
    /// No decoder is registered for this id
    #[error("Unknown type id: {0}")]
    UnknownTypeId(u8),

    // =========================================================================
    // I/O
    // =========================================================================
    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl MobfError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            MobfError::TruncatedStream(_) => ErrorCategory::Stream,
            MobfError::BadSignature { .. }
            | MobfError::BadCharset(_)
            | MobfError::BadTrailer(_)
            | MobfError::NotAnObject(_)
            | MobfError::MalformedTimestamp(_)
            | MobfError::InvalidString(_)
            | MobfError::InvalidElementType { .. }
            | MobfError::NestingTooDeep(_) => ErrorCategory::Corruption,
            MobfError::UnnamedValue(_)
            | MobfError::NonPrimitiveElement(_)
            | MobfError::HeterogeneousElements { .. }
            | MobfError::DuplicateRegistration(_)
            | MobfError::NoHeaderOrRoot
            | MobfError::InvalidTimestampField { .. }
            | MobfError::LengthOverflow(_)
            | MobfError::EncodeTooDeep(_)
            | MobfError::InvalidConfig(_) => ErrorCategory::Usage,
            MobfError::UnknownTypeId(_) => ErrorCategory::RegistryMiss,
            MobfError::Io(_) => ErrorCategory::Io,
        }
    }

    /// True if the bytes being decoded are at fault
    pub fn is_data_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Stream | ErrorCategory::Corruption | ErrorCategory::RegistryMiss
        )
    }

    /// True if the caller misused the API
    pub fn is_usage_error(&self) -> bool {
        self.category() == ErrorCategory::Usage
    }

    /// Create a truncated-stream error
    pub fn truncated(msg: impl Into<String>) -> Self {
        Self::TruncatedStream(msg.into())
    }

    /// Create a malformed-timestamp error
    pub fn malformed_timestamp(msg: impl Into<String>) -> Self {
        Self::MalformedTimestamp(msg.into())
    }

    /// Create an invalid-string error
    pub fn invalid_string(msg: impl Into<String>) -> Self {
        Self::InvalidString(msg.into())
    }

    /// Create a duplicate-registration error
    pub fn duplicate_registration(msg: impl Into<String>) -> Self {
        Self::DuplicateRegistration(msg.into())
    }

    /// Create an invalid-config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<io::Error> for MobfError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            MobfError::TruncatedStream(e.to_string())
        } else {
            MobfError::Io(e)
        }
    }
}
