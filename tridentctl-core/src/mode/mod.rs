//! Mode resolution component
//!
//! Determines whether commands reach Trident directly over HTTP, through the
//! Trident pod, or (for `logs` only) without any Trident target at all.

mod detection;
mod operation_mode;

pub use detection::{Resolver, LOGS_COMMAND, POD_SERVER, SERVER_ENV_VAR};
pub use operation_mode::{OperatingMode, PrecedenceSource, Session, BASE_PATH};
