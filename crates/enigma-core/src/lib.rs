//! Rotor cipher machine engine.
//!
//! This crate simulates an electromechanical rotor cipher machine: a stack
//! of substitution rotors behind a plugboard, closed off by a reflector,
//! driven by a pawl-and-notch stepping mechanism that reproduces the
//! historical double-step anomaly.
//!
//! # Architecture
//!
//! - [`alphabet`] -- Symbol-to-index and index-to-symbol mapping
//! - [`permutation`] -- Cycle-notation substitution tables with forward and
//!   inverse lookup
//! - [`rotor`] -- A single substitution unit: reflector, fixed or moving
//! - [`plugboard`] -- Operator-configured symmetric letter pairs
//! - [`machine`] -- The assembled machine: slot assembly, stepping and
//!   end-to-end symbol conversion
//!
//! Conversion mutates rotor positions in place, so two messages must not
//! share one `Machine`. A rotor inventory is read-only after construction
//! and may back any number of machines; each machine clones the rotors it
//! inserts.

pub mod alphabet;
pub mod machine;
pub mod permutation;
pub mod plugboard;
pub mod rotor;

pub use alphabet::Alphabet;
pub use machine::Machine;
pub use permutation::Permutation;
pub use plugboard::Plugboard;
pub use rotor::{Rotor, RotorKind};

/// Error type for machine configuration and symbol conversion.
///
/// Configuration-shape errors (wrong reflector, bad setting lengths,
/// pawl-count mismatch) are fatal for the current message group and are
/// never retried or silently corrected.
#[derive(Debug, thiserror::Error)]
pub enum EnigmaError {
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,
    #[error("duplicate symbol '{0}' in alphabet")]
    DuplicateSymbol(char),
    #[error("symbol '{0}' is not in the alphabet")]
    UnknownSymbol(char),
    #[error("index {index} out of range for alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("machine layout invalid: {slots} slots, {pawls} pawls")]
    InvalidLayout { slots: usize, pawls: usize },
    #[error("duplicate rotor name '{0}'")]
    DuplicateRotor(String),
    #[error("unknown rotor '{0}'")]
    UnknownRotor(String),
    #[error("wrong number of rotors: expected {expected}, got {actual}")]
    WrongRotorCount { expected: usize, actual: usize },
    #[error("wrong reflector: '{0}' does not reflect")]
    WrongReflector(String),
    #[error("no rotors inserted")]
    RotorsNotInserted,
    #[error("wheel settings too short: expected {expected} symbols, got {actual}")]
    SettingsTooShort { expected: usize, actual: usize },
    #[error("wheel settings too long: expected {expected} symbols, got {actual}")]
    SettingsTooLong { expected: usize, actual: usize },
    #[error("reflector '{0}' has only one position")]
    ReflectorPosition(String),
    #[error("reflector '{0}' has only one ring setting")]
    ReflectorRing(String),
    #[error("reflector '{0}' must substitute every symbol")]
    IncompleteReflector(String),
    #[error("wrong moving rotors: {actual} pawls inserted, machine has {expected}")]
    PawlMismatch { expected: usize, actual: usize },
    #[error("plugboard mapping for '{0}' is not a symmetric pair")]
    PlugboardNotPairwise(char),
}
