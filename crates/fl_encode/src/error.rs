use core::error::Error;
use core::fmt;
use std::io;

use fl_reflect::BoxError;
use thiserror::Error;

// -----------------------------------------------------------------------------
// EncodeError

/// Everything that can fail while encoding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// A failure attributed to a type, and possibly one of its fields.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    /// A shared pointer was reached again below itself.
    #[error("cyclic reference detected")]
    CyclicReference,
    /// A field names a serializer that is not registered.
    #[error("serializer '{0}' not found")]
    SerializerNotFound(String),
    /// Returned by a capability or a serializer function.
    #[error("{0}")]
    Custom(#[source] BoxError),
    /// A capability or serializer returned bytes that are not JSON.
    #[error("invalid raw JSON: {0}")]
    InvalidRaw(#[source] serde_json::Error),
    /// The final JSON text could not be produced.
    #[error("json: {0}")]
    Json(#[source] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl EncodeError {
    /// Wraps an error returned by user code.
    #[inline]
    pub fn custom(err: impl Into<BoxError>) -> Self {
        Self::Custom(err.into())
    }

    /// Returns `true` if a cyclic reference caused this error, at any depth.
    pub fn is_cyclic(&self) -> bool {
        match self {
            Self::CyclicReference => true,
            Self::Marshal(err) => err.source.is_cyclic(),
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// MarshalError

/// An error raised while encoding a value of `type_name`.
///
/// Errors from nested structs wrap each other, outermost first:
///
/// ```text
/// fieldlog: marshal field next of type Node: fieldlog: marshal type Rc<Node>: cyclic reference detected
/// ```
#[derive(Debug)]
pub struct MarshalError {
    type_name: String,
    field: Option<&'static str>,
    source: Box<EncodeError>,
}

impl MarshalError {
    pub fn new(type_name: impl Into<String>, field: Option<&'static str>, source: EncodeError) -> Self {
        Self {
            type_name: type_name.into(),
            field,
            source: Box::new(source),
        }
    }

    /// Short name of the type being encoded.
    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared name of the field, if the failure belongs to one.
    #[inline]
    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    /// The wrapped error.
    #[inline]
    pub fn inner(&self) -> &EncodeError {
        &self.source
    }
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(
                f,
                "fieldlog: marshal field {field} of type {}: {}",
                self.type_name, self.source
            ),
            None => write!(f, "fieldlog: marshal type {}: {}", self.type_name, self.source),
        }
    }
}

impl Error for MarshalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.source)
    }
}

// -----------------------------------------------------------------------------
// Tests
