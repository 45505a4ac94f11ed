//! Session configuration data structures

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Logging level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

/// Output format requested with `--output`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Name,
    Wide,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Name => "name",
            OutputFormat::Wide => "wide",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown output format '{0}' (expected one of json|yaml|name|wide)")]
pub struct UnknownOutputFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "name" => Ok(OutputFormat::Name),
            "wide" => Ok(OutputFormat::Wide),
            _ => Err(UnknownOutputFormat(s.to_string())),
        }
    }
}

/// Global options supplied on the command line.
///
/// This is the explicit layer of configuration; the environment and cluster
/// discovery only fill in what is missing here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address/port of the Trident REST interface
    pub server: Option<String>,
    /// Namespace of the Trident deployment
    pub namespace: Option<String>,
    /// Debug output
    pub debug: bool,
    /// Output format forwarded to tunneled invocations
    pub output: Option<OutputFormat>,
}

impl SessionConfig {
    /// Server address given explicitly, ignoring empty values
    pub fn explicit_server(&self) -> Option<&str> {
        non_empty(self.server.as_deref())
    }

    /// Namespace given explicitly, ignoring empty values
    pub fn explicit_namespace(&self) -> Option<&str> {
        non_empty(self.namespace.as_deref())
    }

    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        }
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
