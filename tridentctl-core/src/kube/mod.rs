//! Access to the cluster through an external orchestration CLI (`oc` or `kubectl`)
//!
//! Authentication and context selection are entirely up to the CLI's own
//! configuration; this module only composes argument vectors and reads the
//! structured output back.

mod namespace;
mod objects;
mod pod;
pub mod probe;

pub use objects::{ObjectMeta, Pod, PodList, ServiceAccount};
pub use probe::{detect, CLI_KUBERNETES, CLI_OPENSHIFT};

use crate::process::{self, ProcessError};
use std::fmt;
use std::process::{Command, Stdio};

/// Label selecting the Trident controller pod
pub const TRIDENT_POD_SELECTOR: &str = "app=trident.netapp.io";
/// Container running the Trident REST server inside the controller pod
pub const TRIDENT_CONTAINER: &str = "trident-main";

/// A running pod, addressed by name within its namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodIdentity {
    pub name: String,
    pub namespace: String,
}

impl fmt::Display for PodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// An orchestration CLI binary known to respond on this host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeCli {
    binary: String,
}

impl KubeCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Arguments that run `remote` inside `container` of `pod`
    pub fn exec_args(&self, pod: &PodIdentity, container: &str, remote: &[String]) -> Vec<String> {
        let mut args = vec![
            "exec".to_string(),
            pod.name.clone(),
            "-n".to_string(),
            pod.namespace.clone(),
            "-c".to_string(),
            container.to_string(),
            "--".to_string(),
        ];
        args.extend(remote.iter().cloned());
        args
    }

    /// Arguments that fetch the logs of `container` in `pod`
    pub fn logs_args(&self, pod: &PodIdentity, container: &str, previous: bool) -> Vec<String> {
        let mut args = vec![
            "logs".to_string(),
            pod.name.clone(),
            "-n".to_string(),
            pod.namespace.clone(),
            "-c".to_string(),
            container.to_string(),
        ];
        if previous {
            args.push("--previous".to_string());
        }
        args
    }

    /// Stream the logs of `container` in `pod` to this process's stdout and stderr
    pub fn stream_logs(
        &self,
        pod: &PodIdentity,
        container: &str,
        previous: bool,
    ) -> Result<(), ProcessError> {
        let args = self.logs_args(pod, container, previous);
        tracing::debug!("Retrieving logs: {} {}", self.binary, args.join(" "));

        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ProcessError::spawn(&self.binary, e))?;

        process::check_status(&self.binary, status, &[])
    }
}
