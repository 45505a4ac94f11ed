//! Namespace inference from the caller's default service account

use super::{KubeCli, ServiceAccount};
use crate::error::ResolveError;
use crate::process::{self, ProcessError};

impl KubeCli {
    /// Namespace of the current context, read from its `default` service account
    pub fn current_namespace(&self) -> Result<String, ResolveError> {
        let account: ServiceAccount = process::run_and_decode(
            self.binary(),
            &["get", "serviceaccount", "default", "-o=json"],
        )
        .map_err(|source| self.namespace_error(source))?;

        account
            .metadata
            .namespace
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| {
                self.namespace_error(ProcessError::Decode {
                    program: self.binary().to_string(),
                    source: serde::de::Error::missing_field("metadata.namespace"),
                })
            })
    }

    fn namespace_error(&self, source: ProcessError) -> ResolveError {
        ResolveError::Namespace {
            cli: self.binary().to_string(),
            source,
        }
    }
}
