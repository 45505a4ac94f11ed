//! The resolved session: operating mode plus everything discovery produced

use crate::config::{OutputFormat, SessionConfig};
use crate::kube::{KubeCli, PodIdentity, TRIDENT_CONTAINER};
use crate::tunnel::{PodExecutor, Tunnel};
use std::fmt;

/// Path of the Trident REST API below the server address
pub const BASE_PATH: &str = "/trident/v1";

/// How this invocation reaches the Trident REST interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Talk straight to a known host:port
    Direct,
    /// Re-invoke the CLI inside the Trident pod and relay its result
    Tunnel,
    /// No Trident pod was found, but the command only wants logs
    Logs,
}

impl OperatingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Direct => "direct",
            OperatingMode::Tunnel => "tunnel",
            OperatingMode::Logs => "logs",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source that determined the server address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecedenceSource {
    /// --server flag was used
    ServerFlag,
    /// TRIDENT_SERVER environment variable was used
    Environment,
    /// Neither was set, so the cluster was searched for a Trident pod
    Discovery,
}

/// Outcome of mode resolution for a single invocation.
///
/// Built once by [`crate::mode::Resolver`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    mode: OperatingMode,
    precedence_source: PrecedenceSource,
    server: Option<String>,
    cli: Option<KubeCli>,
    namespace: Option<String>,
    pod: Option<PodIdentity>,
    debug: bool,
    output: Option<OutputFormat>,
}

impl Session {
    pub(crate) fn direct(
        config: &SessionConfig,
        server: String,
        precedence_source: PrecedenceSource,
    ) -> Self {
        Self {
            mode: OperatingMode::Direct,
            precedence_source,
            server: Some(server),
            cli: None,
            namespace: None,
            pod: None,
            debug: config.debug,
            output: config.output,
        }
    }

    pub(crate) fn tunneled(
        config: &SessionConfig,
        cli: KubeCli,
        pod: PodIdentity,
        server: String,
    ) -> Self {
        Self {
            mode: OperatingMode::Tunnel,
            precedence_source: PrecedenceSource::Discovery,
            server: Some(server),
            cli: Some(cli),
            namespace: Some(pod.namespace.clone()),
            pod: Some(pod),
            debug: config.debug,
            output: config.output,
        }
    }

    pub(crate) fn logs(config: &SessionConfig, cli: KubeCli, namespace: String) -> Self {
        Self {
            mode: OperatingMode::Logs,
            precedence_source: PrecedenceSource::Discovery,
            server: None,
            cli: Some(cli),
            namespace: Some(namespace),
            pod: None,
            debug: config.debug,
            output: config.output,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn precedence_source(&self) -> PrecedenceSource {
        self.precedence_source
    }

    /// Server address, absent only in [`OperatingMode::Logs`]
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn cli(&self) -> Option<&KubeCli> {
        self.cli.as_ref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn pod(&self) -> Option<&PodIdentity> {
        self.pod.as_ref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn output(&self) -> Option<OutputFormat> {
        self.output
    }

    pub fn is_direct(&self) -> bool {
        self.mode == OperatingMode::Direct
    }

    pub fn is_tunnel(&self) -> bool {
        self.mode == OperatingMode::Tunnel
    }

    pub fn is_logs(&self) -> bool {
        self.mode == OperatingMode::Logs
    }

    /// Base URL of the Trident REST API, e.g. `http://10.0.0.1:8000/trident/v1`
    pub fn base_url(&self) -> Option<String> {
        let url = format!("http://{}{}", self.server.as_deref()?, BASE_PATH);
        tracing::debug!("Trident URL: {}", url);
        Some(url)
    }

    /// Command tunnel into the located pod, only available in [`OperatingMode::Tunnel`]
    pub fn tunnel(&self) -> Option<Tunnel<PodExecutor>> {
        if !self.is_tunnel() {
            return None;
        }

        let executor = PodExecutor::new(
            self.cli.clone()?,
            self.pod.clone()?,
            TRIDENT_CONTAINER.to_string(),
        );
        Some(
            Tunnel::new(executor, self.server.clone()?)
                .with_debug(self.debug)
                .with_output(self.output),
        )
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cli = self.cli.as_ref().map(KubeCli::binary).unwrap_or("");
        let namespace = self.namespace.as_deref().unwrap_or("");

        match self.mode {
            OperatingMode::Direct => write!(
                f,
                "Operating mode = {}, Server = {}",
                self.mode,
                self.server.as_deref().unwrap_or("")
            ),
            OperatingMode::Tunnel => write!(
                f,
                "Operating mode = {}, Trident pod = {}, Namespace = {}, CLI = {}",
                self.mode,
                self.pod.as_ref().map(|p| p.name.as_str()).unwrap_or(""),
                namespace,
                cli
            ),
            OperatingMode::Logs => write!(
                f,
                "Operating mode = {}, Namespace = {}, CLI = {}",
                self.mode, namespace, cli
            ),
        }
    }
}
