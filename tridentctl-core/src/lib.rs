//! # tridentctl Core Library
//!
//! Decides how tridentctl reaches the Trident REST interface before any command
//! runs: directly over HTTP, or by re-invoking itself inside the Trident pod
//! through `oc` or `kubectl`.

pub mod config;
pub mod error;
pub mod kube;
pub mod mode;
pub mod process;
pub mod services;
pub mod tunnel;

pub use config::{LogLevel, OutputFormat, SessionConfig};
pub use error::ResolveError;
pub use mode::{OperatingMode, Resolver, Session};
pub use process::ProcessError;
pub use tunnel::{RemoteExecutor, Tunnel};
