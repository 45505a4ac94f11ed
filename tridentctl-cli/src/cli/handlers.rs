//! CLI command handlers
//!
//! Each handler returns the exit code for the process. In tunnel mode that is
//! the status of the tunneled process, so a remote failure looks local. A
//! remote run that succeeded but whose output cannot be used locally is a
//! local failure and exits with 1.

use crate::cli::render::render;
use crate::cli::rest::RestClient;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::io::{self, Write};
use tridentctl_core::kube::TRIDENT_CONTAINER;
use tridentctl_core::process::{ProcessError, EXIT_CODE_FAILURE, EXIT_CODE_SUCCESS};
use tridentctl_core::{OperatingMode, RemoteExecutor, Session, Tunnel};

/// Handle the 'get' command
pub fn handle_get(session: &Session, resource: &str, names: &[String]) -> Result<i32> {
    if let Some(tunnel) = session.tunnel() {
        let mut args = vec!["get".to_string(), resource.to_string()];
        args.extend(names.iter().cloned());
        let result = tunnel.run_and_print(&args);
        return Ok(relay_status(&tunnel, result.err()));
    }

    let client = rest_client(session)?;
    let docs = if names.is_empty() {
        vec![client.get_json(resource)?]
    } else {
        names
            .iter()
            .map(|name| client.get_json(&format!("{}/{}", resource, name)))
            .collect::<Result<Vec<_>>>()?
    };

    render(&mut io::stdout().lock(), &docs, session.output())?;
    Ok(EXIT_CODE_SUCCESS)
}

/// Handle the 'version' command
pub fn handle_version(session: &Session) -> Result<i32> {
    let doc = if let Some(tunnel) = session.tunnel() {
        let args = vec!["version".to_string(), "-o".to_string(), "json".to_string()];
        match tunnel.run(&args) {
            Ok(output) => {
                relay_stderr(&output.stderr);
                // The remote run succeeded, so a bad document is our own failure
                serde_json::from_slice::<Value>(&output.stdout)
                    .context("Could not decode version from the Trident pod")?
            }
            Err(e) => return Ok(relay_status(&tunnel, Some(e))),
        }
    } else {
        let server = rest_client(session)?.get_json("version")?;
        json!({
            "client": {"version": env!("CARGO_PKG_VERSION")},
            "server": server,
        })
    };

    render(&mut io::stdout().lock(), &[doc], session.output())?;
    Ok(EXIT_CODE_SUCCESS)
}

/// Handle the 'logs' command
pub fn handle_logs(session: &Session, previous: bool) -> Result<i32> {
    match session.mode() {
        OperatingMode::Direct => Err(anyhow::anyhow!(
            "'tridentctl logs' needs cluster access and cannot be used with a server address"
        )),
        OperatingMode::Logs => {
            eprintln!(
                "Error: no Trident pod is running in the {} namespace, so there are no logs to show. \
                 You may need to use the -n option to specify the correct namespace.",
                session.namespace().unwrap_or("current")
            );
            Ok(EXIT_CODE_FAILURE)
        }
        OperatingMode::Tunnel => {
            let (cli, pod) = session
                .cli()
                .zip(session.pod())
                .context("Tunnel mode without a Trident pod")?;
            match cli.stream_logs(pod, TRIDENT_CONTAINER, previous) {
                Ok(()) => Ok(EXIT_CODE_SUCCESS),
                Err(e) => Ok(report_process_error(&e)),
            }
        }
    }
}

fn rest_client(session: &Session) -> Result<RestClient> {
    let base_url = session
        .base_url()
        .context("No Trident server address is available")?;
    RestClient::new(base_url)
}

/// Exit code after a tunneled run, relaying remote stderr verbatim
fn relay_status<E: RemoteExecutor>(tunnel: &Tunnel<E>, err: Option<ProcessError>) -> i32 {
    if let Some(e) = err {
        report_process_error(&e);
    }
    tunnel.last_exit_code()
}

/// Surface a process failure and return its exit code.
///
/// A process that ran and failed has already spoken for itself; only its
/// captured stderr (if any) is passed on, unchanged.
fn report_process_error(err: &ProcessError) -> i32 {
    match err {
        ProcessError::Exited { stderr, .. } => relay_stderr(stderr.as_bytes()),
        other => eprintln!("Error: {}", other),
    }
    err.exit_code()
}

/// Write remote diagnostics to our stderr unchanged
fn relay_stderr(bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let mut out = io::stderr().lock();
    let _ = out.write_all(bytes);
    let _ = out.flush();
}
