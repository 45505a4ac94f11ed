//! Orchestration CLI detection

use super::KubeCli;
use crate::error::ResolveError;
use crate::process;

/// OpenShift CLI, preferred when both are installed
pub const CLI_OPENSHIFT: &str = "oc";
/// Kubernetes CLI
pub const CLI_KUBERNETES: &str = "kubectl";

/// Default preference order for [`detect`]
pub fn default_candidates() -> Vec<String> {
    vec![CLI_OPENSHIFT.to_string(), CLI_KUBERNETES.to_string()]
}

/// Detect which orchestration CLI is usable on this host.
///
/// Each candidate is invoked once with `version`, in order, and the first one
/// that exits successfully wins. Output of the probes is discarded.
pub fn detect(candidates: &[String]) -> Result<KubeCli, ResolveError> {
    for candidate in candidates {
        if process::probe(candidate, &["version"]) {
            tracing::debug!(cli = %candidate, "Detected orchestration CLI");
            return Ok(KubeCli::new(candidate.clone()));
        }
    }

    Err(ResolveError::CliNotFound {
        tried: candidates.to_vec(),
    })
}
