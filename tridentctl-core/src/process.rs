//! Subprocess plumbing shared by the discovery probes and the command tunnel
//!
//! Every external process this crate starts goes through here, so exit status
//! translation lives in one place.

use serde::de::DeserializeOwned;
use std::io::{self, BufReader};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Exit code reported when every external process succeeded
pub const EXIT_CODE_SUCCESS: i32 = 0;
/// Exit code reported when a failure has no process status of its own
pub const EXIT_CODE_FAILURE: i32 = 1;

/// Failure of an external process run
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("could not decode the output of {program}: {source}")]
    Decode {
        program: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{program} exited with status {code}{}", stderr_suffix(.stderr))]
    Exited {
        program: String,
        code: i32,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl ProcessError {
    /// Translate this error into a process exit code.
    ///
    /// A process that ran and terminated unsuccessfully reports its own status.
    /// Anything else (could not start, broken pipe, bad output) is a generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::Exited { code, .. } => *code,
            _ => EXIT_CODE_FAILURE,
        }
    }

    pub(crate) fn spawn(program: &str, source: io::Error) -> Self {
        ProcessError::Spawn {
            program: program.to_string(),
            source,
        }
    }

    pub(crate) fn io(program: &str, source: io::Error) -> Self {
        ProcessError::Io {
            program: program.to_string(),
            source,
        }
    }
}

/// Exit code for the outcome of the last external process.
///
/// `None` means the process succeeded.
pub fn exit_code_for(err: Option<&ProcessError>) -> i32 {
    err.map_or(EXIT_CODE_SUCCESS, ProcessError::exit_code)
}

/// Reduce an [`ExitStatus`] to a single integer.
///
/// On Unix a process killed by a signal reports `128 + signal`, as a shell would.
pub fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    EXIT_CODE_FAILURE
}

/// Check a terminated process and turn a non-zero status into an error.
pub(crate) fn check_status(
    program: &str,
    status: ExitStatus,
    stderr: &[u8],
) -> Result<(), ProcessError> {
    if status.success() {
        return Ok(());
    }

    Err(ProcessError::Exited {
        program: program.to_string(),
        code: status_code(status),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
    })
}

/// Run `program` and decode its standard output as a single JSON document.
///
/// The document is decoded straight from the pipe while the process is still
/// running, and any remaining output is drained before waiting. The result is
/// only returned after the process has exited with status zero; a late failure
/// discards whatever was decoded. Standard error is
/// left attached to the caller's terminal so the tool's own diagnostics reach
/// the user unchanged.
pub fn run_and_decode<T>(program: &str, args: &[&str]) -> Result<T, ProcessError>
where
    T: DeserializeOwned,
{
    tracing::debug!(program, args = %args.join(" "), "Running");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| ProcessError::spawn(program, e))?;

    let decoded = match child.stdout.take() {
        Some(stdout) => {
            let mut reader = BufReader::new(stdout);
            let decoded = serde_json::from_reader::<_, T>(&mut reader);
            // Read what is left so a bad document is not turned into a SIGPIPE death
            let _ = io::copy(&mut reader, &mut io::sink());
            decoded
        }
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProcessError::io(
                program,
                io::Error::new(io::ErrorKind::BrokenPipe, "stdout was not captured"),
            ));
        }
    };

    let status = child.wait().map_err(|e| ProcessError::io(program, e))?;
    check_status(program, status, &[])?;

    decoded.map_err(|source| ProcessError::Decode {
        program: program.to_string(),
        source,
    })
}

/// Run `program` with its output discarded and report whether it exited cleanly.
pub fn probe(program: &str, args: &[&str]) -> bool {
    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) => {
            tracing::debug!(program, code = status_code(status), "Probe finished");
            status.success()
        }
        Err(e) => {
            tracing::debug!(program, error = %e, "Probe could not start");
            false
        }
    }
}
