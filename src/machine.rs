//! Machine: rotor slot assembly, the stepping pass, and the conversion
//! pipeline.
//!
//! The machine owns the rotor catalog and an ordered list of installed
//! slot handles. Slot 0 holds the reflector; increasing slot index moves
//! rightward toward the fastest rotor. Exactly the rightmost `num_pawls`
//! slots hold rotating rotors.
//!
//! Converting one symbol performs one stepping pass and then threads the
//! index through the plugboard, the rotor stack forward into the
//! reflector, back out, and through the plugboard's inverse — a bijection
//! for any fixed rotor state.

use std::rc::Rc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorCatalog, RotorId};

/// A complete Enigma machine: catalog, installed slots, plugboard, and
/// slot/pawl counts.
///
/// A session replaces the installed slot list and positions via
/// [`insert_rotors`](Machine::insert_rotors) /
/// [`set_rotors`](Machine::set_rotors); the plugboard persists until
/// explicitly replaced.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use enigma::{Alphabet, Machine, Permutation, Rotor, RotorCatalog};
///
/// let alpha = Rc::new(Alphabet::range('A', 'D').unwrap());
/// let mut catalog = RotorCatalog::new();
/// catalog
///     .add(Rotor::reflector("R", Permutation::new("(AC) (BD)", alpha.clone()).unwrap()).unwrap())
///     .unwrap();
/// catalog
///     .add(Rotor::moving("M", Permutation::new("(ABCD)", alpha.clone()).unwrap(), "C").unwrap())
///     .unwrap();
///
/// let mut machine = Machine::new(alpha, 2, 1, catalog).unwrap();
/// machine.insert_rotors(&["R", "M"]).unwrap();
/// machine.set_rotors("A").unwrap();
/// let cipher = machine.convert_text("ABBA").unwrap();
/// assert_eq!(cipher.len(), 4);
/// ```
#[derive(Debug)]
pub struct Machine {
    alphabet: Rc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    catalog: RotorCatalog,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots, of which the rightmost
    /// `num_pawls` rotate, drawing rotors from `catalog`.
    ///
    /// The plugboard starts as the identity permutation; no rotors are
    /// installed until [`insert_rotors`](Machine::insert_rotors).
    ///
    /// # Errors
    /// Returns [`EnigmaError::RotorCountMismatch`] if `num_rotors == 0` or
    /// `num_pawls >= num_rotors`.
    pub fn new(
        alphabet: Rc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        catalog: RotorCatalog,
    ) -> Result<Machine, EnigmaError> {
        if num_rotors == 0 || num_pawls >= num_rotors {
            return Err(EnigmaError::RotorCountMismatch {
                expected: num_pawls + 1,
                actual: num_rotors,
            });
        }
        Ok(Machine {
            plugboard: Permutation::identity(alphabet.clone()),
            alphabet,
            num_rotors,
            num_pawls,
            catalog,
            slots: Vec::with_capacity(num_rotors),
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, and thus of rotating slots.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the alphabet shared by all rotors.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotors currently installed.
    pub fn rotors_installed(&self) -> usize {
        self.slots.len()
    }

    /// Fills the slots with the catalog rotors named in `names`, leftmost
    /// (reflector) first, and resets every installed position to 0.
    ///
    /// # Errors
    /// - [`EnigmaError::RotorCountMismatch`] if `names.len() != num_rotors`.
    /// - [`EnigmaError::UnknownRotorName`] if a name is not in the catalog.
    /// - [`EnigmaError::SlotOrderingViolation`] if a name repeats, slot 0
    ///   is not a reflector, a reflector sits outside slot 0, or a rotor's
    ///   rotating capability does not match its slot's side of the pawl
    ///   boundary.
    pub fn insert_rotors(&mut self, names: &[&str]) -> Result<(), EnigmaError> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::RotorCountMismatch {
                expected: self.num_rotors,
                actual: names.len(),
            });
        }

        let mut chosen = Vec::with_capacity(names.len());
        for (slot, name) in names.iter().enumerate() {
            if names[..slot].contains(name) {
                return Err(EnigmaError::SlotOrderingViolation(format!(
                    "rotor '{}' used twice",
                    name
                )));
            }
            let id = self
                .catalog
                .id_of(name)
                .ok_or_else(|| EnigmaError::UnknownRotorName(name.to_string()))?;
            self.check_slot(slot, id, name)?;
            chosen.push(id);
        }

        self.slots = chosen;
        for &id in &self.slots {
            self.catalog.get_mut(id).set(0)?;
        }
        Ok(())
    }

    /// Validates that the rotor behind `id` may occupy `slot`.
    fn check_slot(&self, slot: usize, id: RotorId, name: &str) -> Result<(), EnigmaError> {
        let rotor = self.catalog.get(id);
        let first_pawl_slot = self.num_rotors - self.num_pawls;
        if slot == 0 {
            if !rotor.reflects() {
                return Err(EnigmaError::SlotOrderingViolation(format!(
                    "slot 0 requires a reflector, got '{}'",
                    name
                )));
            }
        } else if rotor.reflects() {
            return Err(EnigmaError::SlotOrderingViolation(format!(
                "reflector '{}' outside slot 0",
                name
            )));
        } else if slot < first_pawl_slot && rotor.rotates() {
            return Err(EnigmaError::SlotOrderingViolation(format!(
                "rotating rotor '{}' left of the pawl boundary",
                name
            )));
        } else if slot >= first_pawl_slot && !rotor.rotates() {
            return Err(EnigmaError::SlotOrderingViolation(format!(
                "non-rotating rotor '{}' in a pawl slot",
                name
            )));
        }
        Ok(())
    }

    /// Sets the installed rotors' positions from `setting`, one symbol per
    /// slot after the reflector, leftmost first.
    ///
    /// # Errors
    /// - [`EnigmaError::RotorCountMismatch`] if `setting` does not hold
    ///   exactly `num_rotors - 1` symbols.
    /// - [`EnigmaError::InvalidSymbol`] if a symbol is not in the alphabet.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), EnigmaError> {
        if self.slots.len() != self.num_rotors {
            return Err(EnigmaError::SlotOrderingViolation(
                "no rotors installed".to_string(),
            ));
        }
        let symbols: Vec<char> = setting.chars().collect();
        if symbols.len() != self.num_rotors - 1 {
            return Err(EnigmaError::RotorCountMismatch {
                expected: self.num_rotors - 1,
                actual: symbols.len(),
            });
        }
        for (i, &ch) in symbols.iter().enumerate() {
            let id = self.slots[i + 1];
            self.catalog.get_mut(id).set_symbol(ch)?;
        }
        Ok(())
    }

    /// Replaces the plugboard permutation.
    pub fn set_plugboard(&mut self, plugboard: Permutation) {
        self.plugboard = plugboard;
    }

    /// Clears the installed slot list for a new session.
    ///
    /// The catalog, alphabet, and plugboard persist; only the slot
    /// assignment is discarded.
    pub fn start_over(&mut self) {
        self.slots.clear();
    }

    /// Performs one stepping pass over the installed rotors.
    ///
    /// Notch states are sampled once, before any rotor advances; this
    /// ordering is what produces the historical double-step anomaly, where
    /// a rotor at its notch advances together with its left neighbor and
    /// so moves on two consecutive passes.
    pub fn step(&mut self) {
        let n = self.slots.len();
        if self.num_pawls == 0 || n == 0 {
            return;
        }
        let first_pawl_slot = n - self.num_pawls;

        let mut advances = vec![false; n];
        advances[n - 1] = true;
        for slot in first_pawl_slot..n {
            if slot + 1 < n && self.rotor_at(slot + 1).at_notch() {
                advances[slot] = true;
            }
            if slot > first_pawl_slot && self.rotor_at(slot).at_notch() {
                advances[slot] = true;
            }
        }

        for (slot, &advance) in advances.iter().enumerate() {
            if advance {
                self.catalog.get_mut(self.slots[slot]).advance();
            }
        }
    }

    /// Converts one symbol index, advancing the machine first.
    ///
    /// For a fixed rotor state the composed map is a bijection on
    /// `[0, size)`; across calls it is not idempotent, because every call
    /// steps the rotors before converting.
    pub fn convert(&mut self, index: usize) -> usize {
        debug_assert!(index < self.alphabet.size());
        self.step();

        let mut result = self.plugboard.permute(index as i64);
        for &id in self.slots.iter().rev() {
            result = self.catalog.get(id).convert_forward(result);
        }
        for &id in self.slots.iter().skip(1) {
            result = self.catalog.get(id).convert_backward(result);
        }
        self.plugboard.invert(result as i64)
    }

    /// Converts a message symbol-by-symbol, preserving order.
    ///
    /// Whitespace is stripped before processing. A symbol not found in the
    /// alphabet verbatim is retried in its uppercase form, so lowercase
    /// message text works against an upper-case alphabet. The returned
    /// string is ungrouped; display windowing belongs to the session layer.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if a non-whitespace symbol is
    /// in the alphabet under neither form.
    pub fn convert_text(&mut self, msg: &str) -> Result<String, EnigmaError> {
        let mut out = String::with_capacity(msg.len());
        for ch in msg.chars() {
            if ch.is_whitespace() {
                continue;
            }
            let index = match self.alphabet.index_of(ch) {
                Ok(index) => index,
                Err(_) => self.alphabet.index_of(ch.to_ascii_uppercase())?,
            };
            let converted = self.convert(index);
            out.push(self.alphabet.symbol_at(converted)?);
        }
        Ok(out)
    }

    /// Returns the current setting string: one position symbol per
    /// installed rotor, reflector first.
    pub fn setting(&self) -> String {
        self.slots
            .iter()
            .map(|&id| {
                let rotor = self.catalog.get(id);
                self.alphabet
                    .symbol_at(rotor.position())
                    .expect("rotor position within alphabet")
            })
            .collect()
    }

    fn rotor_at(&self, slot: usize) -> &Rotor {
        self.catalog.get(self.slots[slot])
    }
}
