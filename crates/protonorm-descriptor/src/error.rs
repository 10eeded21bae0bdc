use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a [`crate::SchemaFile`] for a module identifier.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("schema module `{module}` not found ({location})")]
    ModuleNotFound { module: String, location: String },

    #[error("invalid module identifier `{module}`: {reason}")]
    InvalidModuleId { module: String, reason: &'static str },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse descriptor set JSON")]
    Json(#[from] serde_json::Error),

    #[error("descriptor set contains no files")]
    EmptyDescriptorSet,

    #[error("no file in the descriptor set matches `{expected}` (available: {available})")]
    NoMatchingFile { expected: String, available: String },

    #[error("`{expected}` matches more than one file in the descriptor set ({matches})")]
    AmbiguousModule { expected: String, matches: String },

    #[error("duplicate {kind} `{name}` in {file}")]
    DuplicateDeclaration {
        kind: &'static str,
        name: String,
        file: String,
    },

    #[error("malformed descriptor in {file}: {detail}")]
    Malformed { file: String, detail: String },
}
