//! Error types for Unity serialized object reading

use thiserror::Error;

/// Result type for Unity binary operations
pub type Result<T> = std::result::Result<T, BinaryError>;

/// Errors that can occur while navigating or decoding a serialized object
#[derive(Error, Debug)]
pub enum BinaryError {
    /// I/O errors from a byte source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The schema has no child with this name
    #[error("Field '{field}' not found in '{type_name}'")]
    FieldNotFound { field: String, type_name: String },

    /// Array element access past the decoded count
    #[error("Index {index} out of range (count: {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// Requested value type does not match the leaf's declared primitive
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A typed value was requested from a node with children
    #[error("Field '{field}' of type '{type_name}' is not a leaf")]
    NotALeaf { field: String, type_name: String },

    /// A read would go past the end of the byte source
    #[error("Truncated data: {length} bytes at offset {offset} exceed source size {available}")]
    TruncatedData {
        offset: u64,
        length: u64,
        available: u64,
    },

    /// No managed reference registry entry carries this id
    #[error("Managed reference rid({0}) not found")]
    ReferenceNotFound(i64),

    /// A managed reference type could not be resolved to a schema
    #[error("Type not found: class '{class}', namespace '{namespace}', assembly '{assembly}'")]
    TypeNotFound {
        class: String,
        namespace: String,
        assembly: String,
    },

    /// Object id missing from the object table
    #[error("Object {0} not found")]
    ObjectNotFound(i64),

    /// Malformed schema or bytes
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A configured sanity limit was exceeded
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}

impl BinaryError {
    /// Create a field not found error
    pub fn field_not_found<S: Into<String>, T: Into<String>>(field: S, type_name: T) -> Self {
        Self::FieldNotFound {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { index, count }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>, T: Into<String>>(expected: S, actual: T) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a not-a-leaf error
    pub fn not_a_leaf<S: Into<String>, T: Into<String>>(field: S, type_name: T) -> Self {
        Self::NotALeaf {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a truncated data error
    pub fn truncated(offset: u64, length: u64, available: u64) -> Self {
        Self::TruncatedData {
            offset,
            length,
            available,
        }
    }

    /// Create a type not found error
    pub fn type_not_found<S: Into<String>>(class: S, namespace: S, assembly: S) -> Self {
        Self::TypeNotFound {
            class: class.into(),
            namespace: namespace.into(),
            assembly: assembly.into(),
        }
    }

    /// Create a new invalid data error
    pub fn invalid_data<S: Into<String>>(msg: S) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a resource limit error
    pub fn limit_exceeded<S: Into<String>>(msg: S) -> Self {
        Self::ResourceLimitExceeded(msg.into())
    }

    /// Whether the error means the object's schema and bytes disagree.
    ///
    /// Reading such an object cannot continue; a scanner should skip the
    /// object and move on to the next one.
    pub fn aborts_object(&self) -> bool {
        matches!(
            self,
            BinaryError::TruncatedData { .. }
                | BinaryError::InvalidData(_)
                | BinaryError::ResourceLimitExceeded(_)
                | BinaryError::Io(_)
        )
    }
}

impl From<std::string::FromUtf8Error> for BinaryError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::invalid_data(format!("Invalid UTF-8 string: {}", err))
    }
}
