//! Configuration text parsing and session handling.
//!
//! A configuration describes one machine: the alphabet, the slot and pawl
//! counts, and the rotor catalog. The format is whitespace-tokenized:
//!
//! ```text
//! A-Z
//! 5 3
//! I    MQ   (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B    R    (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
//! ```
//!
//! The first token is the alphabet — a three-character range form `X-Y`
//! or an explicit symbol list. Rotor type codes: `M` followed by notch
//! symbols for a moving rotor, `N` for a fixed rotor, `R` for a reflector.
//!
//! Sessions are driven by `*`-prefixed settings lines naming the rotor
//! sequence, the initial positions, and optionally a plugboard; message
//! lines are converted and windowed into five-character display groups.
//!
//! Everything here operates on in-memory text. File and stream I/O belong
//! to the binary.

use std::rc::Rc;

use itertools::Itertools;
use log::debug;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorCatalog};

/// A parsed machine configuration, ready to build.
///
/// # Examples
///
/// ```
/// use enigma::config::MachineConfig;
///
/// let source = "\
/// A-D
/// 2 1
/// R  R  (AC) (BD)
/// M1 MC (ABCD)";
/// let machine = MachineConfig::parse(source).unwrap().build().unwrap();
/// assert_eq!(machine.num_rotors(), 2);
/// assert_eq!(machine.num_pawls(), 1);
/// ```
#[derive(Debug)]
pub struct MachineConfig {
    alphabet: Rc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    catalog: RotorCatalog,
}

impl MachineConfig {
    /// Parses a configuration from text.
    ///
    /// # Errors
    /// Returns [`EnigmaError::MalformedConfig`] for a truncated or
    /// unreadable source, or the underlying alphabet / permutation / rotor
    /// construction error.
    pub fn parse(source: &str) -> Result<MachineConfig, EnigmaError> {
        let mut cursor = TokenCursor::new(source);

        let alphabet = Rc::new(parse_alphabet(cursor.next_token("alphabet")?)?);
        let num_rotors = cursor.next_count("rotor count")?;
        let num_pawls = cursor.next_count("pawl count")?;

        let mut catalog = RotorCatalog::new();
        while cursor.peek().is_some() {
            catalog.add(read_rotor(&mut cursor, &alphabet)?)?;
        }
        if catalog.is_empty() {
            return Err(EnigmaError::MalformedConfig(
                "no rotors defined".to_string(),
            ));
        }
        debug!(
            "parsed configuration: alphabet size {}, {} slots / {} pawls, {} rotors in catalog",
            alphabet.size(),
            num_rotors,
            num_pawls,
            catalog.len()
        );

        Ok(MachineConfig {
            alphabet,
            num_rotors,
            num_pawls,
            catalog,
        })
    }

    /// Returns the configured alphabet.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        &self.alphabet
    }

    /// Returns the configured slot count.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the configured pawl count.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Consumes the configuration and builds the machine.
    ///
    /// # Errors
    /// Returns [`EnigmaError::RotorCountMismatch`] if the pawl count is not
    /// below the rotor count.
    pub fn build(self) -> Result<Machine, EnigmaError> {
        Machine::new(self.alphabet, self.num_rotors, self.num_pawls, self.catalog)
    }
}

/// Explicit scan state over whitespace-separated tokens.
///
/// Carries the one-token lookahead that rotor parsing needs (a rotor's
/// cycle list ends where the next rotor's name begins).
struct TokenCursor<'a> {
    tokens: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
}

impl<'a> TokenCursor<'a> {
    fn new(source: &'a str) -> Self {
        TokenCursor {
            tokens: source.split_whitespace().peekable(),
        }
    }

    /// Returns the next token, or a [`EnigmaError::MalformedConfig`] naming
    /// what was expected.
    fn next_token(&mut self, expected: &str) -> Result<&'a str, EnigmaError> {
        self.tokens.next().ok_or_else(|| {
            EnigmaError::MalformedConfig(format!("missing {}", expected))
        })
    }

    /// Returns the next token parsed as a count.
    fn next_count(&mut self, expected: &str) -> Result<usize, EnigmaError> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| {
            EnigmaError::MalformedConfig(format!("{} must be a number, got '{}'", expected, token))
        })
    }

    fn peek(&mut self) -> Option<&&'a str> {
        self.tokens.peek()
    }
}

/// Parses the alphabet header token: `X-Y` range form or explicit list.
fn parse_alphabet(token: &str) -> Result<Alphabet, EnigmaError> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() == 3 && chars[1] == '-' {
        Alphabet::range(chars[0], chars[2])
    } else {
        Alphabet::new(token)
    }
}

/// Reads one rotor description: name, type code, cycle groups.
fn read_rotor(cursor: &mut TokenCursor, alphabet: &Rc<Alphabet>) -> Result<Rotor, EnigmaError> {
    let name = cursor.next_token("rotor name")?;
    let type_code = cursor.next_token("rotor type")?;

    let mut cycles = String::new();
    while let Some(token) = cursor.peek() {
        if !token.starts_with('(') {
            break;
        }
        cycles.push_str(cursor.next_token("cycles")?);
        cycles.push(' ');
    }
    let permutation = Permutation::new(&cycles, alphabet.clone())?;

    let mut code = type_code.chars();
    match code.next() {
        Some('M') => {
            let notches: String = code.collect();
            if notches.is_empty() {
                return Err(EnigmaError::MalformedConfig(format!(
                    "moving rotor '{}' has no notches",
                    name
                )));
            }
            Rotor::moving(name, permutation, &notches)
        }
        Some('N') => Ok(Rotor::fixed(name, permutation)),
        Some('R') => Rotor::reflector(name, permutation),
        _ => Err(EnigmaError::MalformedConfig(format!(
            "unknown rotor type '{}' for '{}'",
            type_code, name
        ))),
    }
}

/// Applies one `*`-prefixed settings line to the machine: installs the
/// named rotors, sets initial positions, and replaces the plugboard when
/// cycle groups are present.
///
/// A settings line without plugboard groups keeps the plugboard of the
/// previous session.
///
/// # Errors
/// Returns [`EnigmaError::MalformedConfig`] for a structurally unreadable
/// line, or the underlying assembly error (unknown name, slot ordering,
/// count mismatch, bad position symbol, malformed plugboard).
pub fn apply_settings(machine: &mut Machine, line: &str) -> Result<(), EnigmaError> {
    let body = line.trim_start().strip_prefix('*').ok_or_else(|| {
        EnigmaError::MalformedConfig("settings line must start with '*'".to_string())
    })?;

    let mut tokens = body.split_whitespace();
    let names: Vec<&str> = tokens.by_ref().take(machine.num_rotors()).collect();
    if names.len() < machine.num_rotors() {
        return Err(EnigmaError::RotorCountMismatch {
            expected: machine.num_rotors(),
            actual: names.len(),
        });
    }

    machine.start_over();
    machine.insert_rotors(&names)?;

    let setting = tokens.next().ok_or_else(|| {
        EnigmaError::MalformedConfig("missing initial positions".to_string())
    })?;
    machine.set_rotors(setting)?;

    let plugboard = tokens.join(" ");
    if !plugboard.is_empty() {
        let alphabet = machine.alphabet().clone();
        machine.set_plugboard(Permutation::new(&plugboard, alphabet)?);
    }
    debug!("session: rotors {:?}, setting {}", names, setting);
    Ok(())
}

/// Windows a converted message into five-character display groups.
pub fn group_five(msg: &str) -> String {
    msg.chars()
        .chunks(5)
        .into_iter()
        .map(|chunk| chunk.collect::<String>())
        .join(" ")
}

/// Processes a whole message stream against the machine.
///
/// The first non-blank content must be a settings line. Each subsequent
/// line is either another settings line (starting a new session), a blank
/// line (preserved in the output), or a message line (converted and
/// grouped). Returns the full output text, one line per input line after
/// the first settings line.
///
/// # Errors
/// Returns [`EnigmaError::MalformedConfig`] if the input does not begin
/// with a settings line, or any error from the session and conversion
/// steps.
pub fn process_lines(machine: &mut Machine, input: &str) -> Result<String, EnigmaError> {
    let mut output = String::new();
    let mut configured = false;

    for line in input.lines() {
        if line.trim_start().starts_with('*') {
            apply_settings(machine, line)?;
            configured = true;
        } else if !configured {
            return Err(EnigmaError::MalformedConfig(
                "input must begin with a settings line".to_string(),
            ));
        } else if line.trim().is_empty() {
            output.push('\n');
        } else {
            let converted = machine.convert_text(line)?;
            output.push_str(&group_five(&converted));
            output.push('\n');
        }
    }
    Ok(output)
}
