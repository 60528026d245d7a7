//! # Error Types

/// Errors from phrasemill operations.
#[derive(Debug, thiserror::Error)]
pub enum PhrasemillError {
    /// A vocabulary or corpus path does not exist.
    #[error("path not found: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },

    /// A line of a vocabulary, ids, or weight file failed parsing.
    #[error("parse error at {path}:{line}: {message}")]
    Parse {
        /// The file being read.
        path: String,

        /// The 1-based line number.
        line: usize,

        /// What failed to parse.
        message: String,
    },

    /// Vocabulary data is inconsistent.
    #[error("{0}")]
    VocabConflict(String),

    /// A decoded token id falls outside the reverse vocabulary.
    #[error("token id {id} out of range for vocabulary of size {size}")]
    TokenOutOfRange {
        /// The offending id.
        id: usize,

        /// The vocabulary size.
        size: usize,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for phrasemill operations.
pub type Result<T> = core::result::Result<T, PhrasemillError>;
