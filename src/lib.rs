//! Enigma rotor cipher machine simulator.
//!
//! Simulates the historical Enigma: a stack of rotating wired disks, a
//! reflector, and a plugboard, composing a substitution cipher whose
//! effective permutation changes after every encoded symbol. The machine
//! reproduces the original stepping rule exactly, including the
//! double-step anomaly.
//!
//! # Architecture
//!
//! ```text
//! Alphabet    (symbols ⇄ dense indices — shared by every component)
//!     ↑ built against
//! Permutation (cycle-notation wiring with forward and inverse tables)
//!     ↑ wrapped by
//! Rotor       (permutation behind a mutable rotational offset; reflector,
//!     ↑        fixed, and moving kinds — stored in a RotorCatalog arena)
//! Machine     (orchestrator — slot assembly, stepping pass, plugboard,
//!              and the per-symbol conversion pipeline)
//! ```
//!
//! # Examples
//!
//! Encrypt and decrypt with two identically configured machines:
//!
//! ```
//! use std::rc::Rc;
//! use enigma::{Alphabet, Machine, Permutation, Rotor, RotorCatalog};
//!
//! fn build() -> Machine {
//!     let alpha = Rc::new(Alphabet::range('A', 'D').unwrap());
//!     let mut catalog = RotorCatalog::new();
//!     catalog
//!         .add(Rotor::reflector("R", Permutation::new("(AC) (BD)", alpha.clone()).unwrap())
//!             .unwrap())
//!         .unwrap();
//!     catalog
//!         .add(Rotor::moving("M", Permutation::new("(ABCD)", alpha.clone()).unwrap(), "C")
//!             .unwrap())
//!         .unwrap();
//!     let mut machine = Machine::new(alpha, 2, 1, catalog).unwrap();
//!     machine.insert_rotors(&["R", "M"]).unwrap();
//!     machine.set_rotors("A").unwrap();
//!     machine
//! }
//!
//! let mut encoder = build();
//! let mut decoder = build();
//!
//! let cipher = encoder.convert_text("ABBA").unwrap();
//! assert_ne!(cipher, "ABBA");
//! assert_eq!(decoder.convert_text(&cipher).unwrap(), "ABBA");
//! ```
//!
//! Configuration text and session lines are handled by the [`config`]
//! module; the `enigma` binary wraps it with file and stream I/O.

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;

pub use alphabet::Alphabet;
pub use error::EnigmaError;
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorCatalog, RotorId, RotorKind};
