use thiserror::Error;

/// Structural errors raised by the editor.
///
/// These describe an inconsistency between the declared schema and the
/// stored data. They are not user errors: the offending node cannot be
/// edited and the error is propagated to the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditorError {
    /// The value stored at `path` does not have the type its schema declares.
    #[error("property is not of the type '{expected}' (found {actual}) at path: {path}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    /// No branch of an object switch or type switch applies to the value.
    #[error("unable to detect the type of {kind} at path: {path}")]
    UnmatchedSwitch { kind: &'static str, path: String },
    /// A pre-filled key has no usable default for its schema.
    #[error("pre-filled key '{key}' has no default for its schema at path: {path}")]
    InvalidPreset { key: String, path: String },
    /// A navigation path does not resolve inside the document.
    #[error("path does not exist in the document: {path}")]
    InvalidPath { path: String },
    /// A prompt answered with an entry that was not offered.
    #[error("menu entry {index} is out of range ({len} entries) at path: {path}")]
    InvalidChoice {
        index: usize,
        len: usize,
        path: String,
    },
}
