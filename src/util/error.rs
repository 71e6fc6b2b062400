//! Error types for the x3dv library.

use thiserror::Error;

/// Main error type for scene graph construction and export.
#[derive(Error, Debug)]
pub enum Error {
    /// Field name is not part of the node type's schema
    #[error("Unknown field '{field}' on {node_type}")]
    UnknownField { node_type: &'static str, field: String },

    /// Field value kind disagrees with the schema
    #[error("Type mismatch for {node_type}.{field}: expected {expected}, got {actual}")]
    TypeMismatch {
        node_type: &'static str,
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Node type has no children slot
    #[error("{0} cannot hold child nodes")]
    NoChildrenSlot(&'static str),

    /// A name was declared twice during graph construction
    #[error("Duplicate declaration of '{0}'")]
    DuplicateDeclaration(String),

    /// A reference names a node that is never declared in the document
    #[error("Dangling reference to '{name}' ({node_type})")]
    DanglingReference { name: String, node_type: &'static str },

    /// Mesh has no faces; the geometry node is omitted by the caller
    #[error("Mesh '{0}' has no faces")]
    EmptyGeometry(String),

    /// Requested output format is not one of the four supported encodings
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// A reference node was used where a declaration is required
    #[error("Reference node cannot be declared as '{0}'")]
    ReferenceNotAllowed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for x3dv operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::DuplicateDeclaration("MA_Material".to_string());
        assert!(e.to_string().contains("MA_Material"));

        let e = Error::DanglingReference { name: "group_ME_Cube".to_string(), node_type: "Group" };
        assert!(e.to_string().contains("group_ME_Cube"));
        assert!(e.to_string().contains("Group"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
