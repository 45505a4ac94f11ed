//! Mode resolution
//!
//! Decides, before any command runs, whether this invocation talks to the
//! Trident REST interface directly or tunnels through the Trident pod.

use super::{PrecedenceSource, Session};
use crate::config::{non_empty, SessionConfig};
use crate::error::ResolveError;
use crate::kube::{self, TRIDENT_POD_SELECTOR};
use std::env;

/// Environment variable holding the server address
pub const SERVER_ENV_VAR: &str = "TRIDENT_SERVER";
/// Address the Trident REST server listens on inside its pod
pub const POD_SERVER: &str = "127.0.0.1:8000";
/// The only command allowed to run without a Trident pod
pub const LOGS_COMMAND: &str = "logs";

/// Resolves the operating mode for one invocation
#[derive(Debug, Clone)]
pub struct Resolver {
    cli_candidates: Vec<String>,
    pod_selector: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            cli_candidates: kube::probe::default_candidates(),
            pod_selector: TRIDENT_POD_SELECTOR.to_string(),
        }
    }

    /// Replace the orchestration CLIs to probe, in preference order
    pub fn with_cli_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cli_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pod_selector(mut self, selector: impl Into<String>) -> Self {
        self.pod_selector = selector.into();
        self
    }

    /// Resolve the operating mode for `command`, reading `TRIDENT_SERVER`
    pub fn resolve(&self, config: &SessionConfig, command: &str) -> Result<Session, ResolveError> {
        self.resolve_with_env(config, command, None)
    }

    /// Resolve the operating mode, optionally overriding the environment.
    ///
    /// `Some(value)` replaces the `TRIDENT_SERVER` lookup so tests do not race
    /// on process-wide environment state.
    ///
    /// Precedence, first match wins:
    /// 1. `--server` on the command line
    /// 2. `TRIDENT_SERVER` in the environment
    /// 3. The single Trident pod in the namespace, through `oc` or `kubectl`
    pub fn resolve_with_env(
        &self,
        config: &SessionConfig,
        command: &str,
        env_override: Option<Option<String>>,
    ) -> Result<Session, ResolveError> {
        let session = self.discover(config, command, env_override)?;
        tracing::debug!("{}", session);
        Ok(session)
    }

    fn discover(
        &self,
        config: &SessionConfig,
        command: &str,
        env_override: Option<Option<String>>,
    ) -> Result<Session, ResolveError> {
        if let Some(server) = config.explicit_server() {
            let server = validate_server(server)?;
            return Ok(Session::direct(config, server, PrecedenceSource::ServerFlag));
        }

        let env_server = env_override.unwrap_or_else(|| env::var(SERVER_ENV_VAR).ok());
        if let Some(server) = non_empty(env_server.as_deref()) {
            let server = validate_server(server)?;
            return Ok(Session::direct(
                config,
                server,
                PrecedenceSource::Environment,
            ));
        }

        // Talking to the pod needs a working CLI first
        let cli = kube::detect(&self.cli_candidates)?;

        let namespace = match config.explicit_namespace() {
            Some(namespace) => namespace.to_string(),
            None => cli.current_namespace()?,
        };

        match cli.locate_pod(&namespace, &self.pod_selector) {
            Ok(pod) => Ok(Session::tunneled(config, cli, pod, POD_SERVER.to_string())),
            Err(e) if command == LOGS_COMMAND => {
                tracing::debug!(error = %e, "No Trident pod, continuing in logs mode");
                Ok(Session::logs(config, cli, namespace))
            }
            Err(e) => Err(e),
        }
    }
}

/// Check that `address` is a usable `host:port` for an `http://` URL
fn validate_server(address: &str) -> Result<String, ResolveError> {
    let invalid = |reason: &str| ResolveError::InvalidServer {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    if address.contains("://") {
        return Err(invalid("expected host:port without a URL scheme"));
    }

    match url::Url::parse(&format!("http://{}", address)) {
        Ok(parsed) if parsed.host_str().is_some() && parsed.path() == "/" => {
            Ok(address.to_string())
        }
        Ok(_) => Err(invalid("expected host:port")),
        Err(e) => Err(invalid(&e.to_string())),
    }
}
