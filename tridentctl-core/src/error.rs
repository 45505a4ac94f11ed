//! Errors raised while resolving how to reach the Trident REST interface

use crate::process::ProcessError;
use thiserror::Error;

/// Error types for mode resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid server address '{address}': {reason}")]
    InvalidServer { address: String, reason: String },

    #[error("Could not find the Kubernetes CLI (tried {}).", .tried.join(", "))]
    CliNotFound { tried: Vec<String> },

    #[error("could not determine the current namespace with {cli}: {source}")]
    Namespace {
        cli: String,
        #[source]
        source: ProcessError,
    },

    #[error("could not list pods in the {namespace} namespace with {cli}: {source}")]
    PodLookup {
        cli: String,
        namespace: String,
        #[source]
        source: ProcessError,
    },

    #[error(
        "could not find a Trident pod in the {namespace} namespace (found {found}). \
         You may need to use the -n option to specify the correct namespace."
    )]
    PodNotFound { namespace: String, found: usize },
}

impl ResolveError {
    /// Exit code the tool should report for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::Namespace { source, .. } | ResolveError::PodLookup { source, .. } => {
                source.exit_code()
            }
            _ => crate::process::EXIT_CODE_FAILURE,
        }
    }
}
