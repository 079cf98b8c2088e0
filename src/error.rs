//! Error types for the Enigma library.

use std::fmt;

/// Errors produced by the Enigma library.
///
/// Every variant describes a malformed configuration or assembly step and is
/// raised synchronously at the point of violation, before any conversion
/// output is produced. Symbol conversion itself never fails: its inputs are
/// pre-validated indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// Alphabet is empty or contains a repeated symbol.
    InvalidAlphabet,
    /// Symbol is not a member of the alphabet.
    InvalidSymbol(char),
    /// Index lookup outside `[0, size)`.
    IndexOutOfRange { index: usize, size: usize },
    /// Cycle specification is unbalanced or maps a symbol ambiguously.
    MalformedPermutation(String),
    /// Reflector wiring maps a symbol to itself.
    InvalidReflectorWiring(String),
    /// Pawl count is not below the rotor count, or the wrong number of
    /// rotor names or position symbols was supplied.
    RotorCountMismatch { expected: usize, actual: usize },
    /// Rotor placed in a slot its kind is not allowed to occupy, or a rotor
    /// name repeated within one session.
    SlotOrderingViolation(String),
    /// Rotor name not present in the catalog.
    UnknownRotorName(String),
    /// Configuration or settings text could not be read.
    MalformedConfig(String),
}

impl fmt::Display for EnigmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnigmaError::InvalidAlphabet => {
                write!(f, "Alphabet must be a non-empty sequence of distinct symbols")
            }
            EnigmaError::InvalidSymbol(ch) => {
                write!(f, "Symbol '{}' is not in the alphabet", ch)
            }
            EnigmaError::IndexOutOfRange { index, size } => {
                write!(f, "Index {} is outside the alphabet range 0..{}", index, size)
            }
            EnigmaError::MalformedPermutation(detail) => {
                write!(f, "Malformed cycle specification: {}", detail)
            }
            EnigmaError::InvalidReflectorWiring(name) => {
                write!(f, "Reflector '{}' wiring maps a symbol to itself", name)
            }
            EnigmaError::RotorCountMismatch { expected, actual } => {
                write!(f, "Expected {} entries but got {}", expected, actual)
            }
            EnigmaError::SlotOrderingViolation(detail) => {
                write!(f, "Invalid rotor arrangement: {}", detail)
            }
            EnigmaError::UnknownRotorName(name) => {
                write!(f, "No rotor named '{}' in the catalog", name)
            }
            EnigmaError::MalformedConfig(detail) => {
                write!(f, "Malformed configuration: {}", detail)
            }
        }
    }
}

impl std::error::Error for EnigmaError {}
