//! Command tunnel
//!
//! Runs tridentctl again inside the Trident pod and relays its output and exit
//! status, so a tunneled command looks exactly like a local one to the caller.
//! Where a command runs is decided by the [`RemoteExecutor`]; what it does is
//! just an argument vector.

use crate::config::OutputFormat;
use crate::kube::{KubeCli, PodIdentity};
use crate::process::{self, ProcessError, EXIT_CODE_SUCCESS};
use std::cell::Cell;
use std::process::{Command, Stdio};

/// Binary re-invoked inside the Trident container
pub const REMOTE_BINARY: &str = "tridentctl";

/// How the remote process's output reaches the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Collect stdout and stderr into memory
    Buffered,
    /// Connect the remote stdout and stderr to our own
    Passthrough,
}

/// Result of a remote invocation that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOutput {
    pub code: i32,
    /// Empty with [`Capture::Passthrough`]
    pub stdout: Vec<u8>,
    /// Empty with [`Capture::Passthrough`]
    pub stderr: Vec<u8>,
}

/// Runs an argument vector somewhere other than this process
pub trait RemoteExecutor {
    /// Run `argv` to completion.
    ///
    /// A non-zero exit is reported in [`RemoteOutput::code`], not as an error;
    /// errors mean the invocation could not be carried out at all.
    fn execute(&self, argv: &[String], capture: Capture) -> Result<RemoteOutput, ProcessError>;
}

/// Executes commands in a container of a pod through `oc exec` / `kubectl exec`
#[derive(Debug, Clone)]
pub struct PodExecutor {
    cli: KubeCli,
    pod: PodIdentity,
    container: String,
}

impl PodExecutor {
    pub fn new(cli: KubeCli, pod: PodIdentity, container: String) -> Self {
        Self {
            cli,
            pod,
            container,
        }
    }

    pub fn pod(&self) -> &PodIdentity {
        &self.pod
    }
}

impl RemoteExecutor for PodExecutor {
    fn execute(&self, argv: &[String], capture: Capture) -> Result<RemoteOutput, ProcessError> {
        let program = self.cli.binary();
        let args = self.cli.exec_args(&self.pod, &self.container, argv);
        tracing::debug!("Invoking tunneled command: {} {}", program, args.join(" "));

        let mut command = Command::new(program);
        command.args(&args).stdin(Stdio::null());

        match capture {
            Capture::Buffered => {
                let output = command
                    .output()
                    .map_err(|e| ProcessError::spawn(program, e))?;
                Ok(RemoteOutput {
                    code: process::status_code(output.status),
                    stdout: output.stdout,
                    stderr: output.stderr,
                })
            }
            Capture::Passthrough => {
                let status = command
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(|e| ProcessError::spawn(program, e))?;
                Ok(RemoteOutput {
                    code: process::status_code(status),
                    ..RemoteOutput::default()
                })
            }
        }
    }
}

/// Compose the command line run on the far side of the tunnel:
/// `tridentctl -s <server> [--debug] [--output <format>] <args...>`
pub fn remote_command(
    server: &str,
    debug: bool,
    output: Option<OutputFormat>,
    args: &[String],
) -> Vec<String> {
    let mut command = vec![
        REMOTE_BINARY.to_string(),
        "-s".to_string(),
        server.to_string(),
    ];
    if debug {
        command.push("--debug".to_string());
    }
    if let Some(format) = output {
        command.push("--output".to_string());
        command.push(format.to_string());
    }
    command.extend(args.iter().cloned());
    command
}

/// Relays commands through a [`RemoteExecutor`] and remembers the last exit status
pub struct Tunnel<E> {
    executor: E,
    server: String,
    debug: bool,
    output: Option<OutputFormat>,
    last_exit_code: Cell<i32>,
}

impl<E: RemoteExecutor> Tunnel<E> {
    pub fn new(executor: E, server: impl Into<String>) -> Self {
        Self {
            executor,
            server: server.into(),
            debug: false,
            output: None,
            last_exit_code: Cell::new(EXIT_CODE_SUCCESS),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_output(mut self, output: Option<OutputFormat>) -> Self {
        self.output = output;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Exit status of the most recent tunneled process
    pub fn last_exit_code(&self) -> i32 {
        self.last_exit_code.get()
    }

    /// Run `args` remotely and return what it wrote.
    ///
    /// The caller consumes the output itself, so the session's debug and output
    /// flags are not forwarded; pass any format flag the caller can decode in
    /// `args`. Standard error is kept apart from standard output so the latter
    /// stays decodable. A successful run may still have written warnings there,
    /// which the caller is expected to relay.
    pub fn run(&self, args: &[String]) -> Result<RemoteOutput, ProcessError> {
        let argv = remote_command(&self.server, false, None, args);
        let output = self.record(self.executor.execute(&argv, Capture::Buffered))?;

        if output.code == EXIT_CODE_SUCCESS {
            Ok(output)
        } else {
            Err(ProcessError::Exited {
                program: REMOTE_BINARY.to_string(),
                code: output.code,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }

    /// Run `args` remotely with its output going straight to our stdout and stderr
    pub fn run_and_print(&self, args: &[String]) -> Result<(), ProcessError> {
        let argv = remote_command(&self.server, self.debug, self.output, args);
        let output = self.record(self.executor.execute(&argv, Capture::Passthrough))?;

        if output.code == EXIT_CODE_SUCCESS {
            Ok(())
        } else {
            Err(ProcessError::Exited {
                program: REMOTE_BINARY.to_string(),
                code: output.code,
                stderr: String::new(),
            })
        }
    }

    fn record(
        &self,
        result: Result<RemoteOutput, ProcessError>,
    ) -> Result<RemoteOutput, ProcessError> {
        let code = match &result {
            Ok(output) => output.code,
            Err(e) => process::exit_code_for(Some(e)),
        };
        self.last_exit_code.set(code);
        result
    }
}
