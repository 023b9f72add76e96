//! Configuration parsing and message sessions for the rotor cipher
//! machine.
//!
//! The engine in `enigma-core` only deals in fully-built machines and
//! streams of symbols. This crate supplies the text layers around it:
//!
//! - [`config`] -- Building a machine from a rotor-inventory description
//!   (alphabet, slot and pawl counts, one wiring per line)
//! - [`session`] -- Applying `*` settings lines, converting message
//!   lines, and grouping output five symbols at a time

pub mod config;
pub mod session;

pub use config::parse_config;
pub use session::{format_groups, run_session};

use enigma_core::EnigmaError;

/// Error type for configuration and input parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
    #[error("configuration file truncated")]
    Truncated,
    #[error("bad slot and pawl counts: {0}")]
    BadCounts(String),
    #[error("bad rotor description: {0}")]
    BadRotorDescription(String),
    #[error("cycle continuation before any rotor")]
    DanglingCycles,
    #[error("input has no machine setting line")]
    MissingSettings,
    #[error("bad setting line: {0}")]
    BadSettingLine(String),
    #[error(transparent)]
    Engine(#[from] EnigmaError),
}
