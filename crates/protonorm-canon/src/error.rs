use protonorm_descriptor::LoadError;
use thiserror::Error;

/// A descriptor shape the canonical form has no rendering for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalizeError {
    #[error("{label}: an unknown field label (field `{field}` of message `{message}`)")]
    UnknownFieldLabel {
        message: String,
        field: String,
        label: String,
    },

    #[error(
        "message `{message}` declares {count} enum value(s) directly; \
         only enum values inside a nested enum type are supported"
    )]
    UnsupportedShape { message: String, count: usize },
}

/// Everything that can abort a canonicalization run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Canonicalize(#[from] CanonicalizeError),

    #[error("failed to load schema module `{module}`")]
    ModuleLoad {
        module: String,
        #[source]
        source: LoadError,
    },

    #[error("failed to write canonical output")]
    Write(#[from] std::io::Error),
}
