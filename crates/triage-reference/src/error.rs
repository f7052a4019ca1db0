use thiserror::Error;

/// Startup-fatal unless noted otherwise. `ReferenceRuntime::load` propagates this up
/// to the binary's `main`, which refuses to serve — mirrors `TriageError::ReferenceDataMissing`
/// in the core types crate, kept as a separate type here so this crate has no
/// dependency on how the orchestrator wraps it.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{disease} has no specialty mapping and no fallback_specialty_id was configured")]
    UnmappedDisease { disease: String },

    #[error("question_bank entry '{canonical}' has an empty text field")]
    InvalidQuestion { canonical: String },
}
