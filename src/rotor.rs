//! Rotor: a permutation behind a rotational offset, plus the catalog arena.
//!
//! A rotor converts indices through its wiring adjusted by its current
//! position in both directions. Three kinds exist: the reflector (never
//! rotates, wiring must be a derangement, slot 0 only), fixed rotors
//! (static slots), and moving rotors (carry notches that drive the
//! machine's stepping pass). Kind-specific behavior dispatches over a
//! tagged enum.
//!
//! Uses an arena-based catalog: all rotors of a run are stored in a
//! [`RotorCatalog`] and referenced by [`RotorId`], so the machine's slot
//! list is a cheap list of handles it can discard and rebuild between
//! sessions without reconstructing any rotor.

use std::collections::HashMap;
use std::rc::Rc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::permutation::Permutation;

/// Unique identifier for a rotor within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotorId(pub(crate) usize);

/// Capability tag distinguishing the three rotor kinds.
///
/// Only the moving kind carries state beyond the shared fields: the notch
/// positions that permit the neighboring (leftward) rotor to advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Sits only in slot 0; folds the signal back. Never rotates.
    Reflector,
    /// Occupies a static slot between reflector and pawl region.
    Fixed,
    /// Rotates under its pawl; `notches` are positions, not symbols.
    Moving { notches: Vec<usize> },
}

/// A wired disk with a mutable rotational offset.
///
/// Constructed once per run from configuration and reused across every
/// session; the position changes only through [`set`](Rotor::set),
/// [`set_symbol`](Rotor::set_symbol), and [`advance`](Rotor::advance).
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    kind: RotorKind,
    position: usize,
}

impl Rotor {
    /// Creates a reflector named `name` with wiring `permutation`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidReflectorWiring`] if the wiring has a
    /// fixed point — a reflector must map every symbol away from itself.
    pub fn reflector(name: &str, permutation: Permutation) -> Result<Rotor, EnigmaError> {
        if !permutation.is_derangement() {
            return Err(EnigmaError::InvalidReflectorWiring(name.to_string()));
        }
        Ok(Rotor {
            name: name.to_string(),
            permutation,
            kind: RotorKind::Reflector,
            position: 0,
        })
    }

    /// Creates a non-rotating rotor for a static slot.
    pub fn fixed(name: &str, permutation: Permutation) -> Rotor {
        Rotor {
            name: name.to_string(),
            permutation,
            kind: RotorKind::Fixed,
            position: 0,
        }
    }

    /// Creates a rotating rotor whose notches sit at the given symbols.
    ///
    /// # Parameters
    /// - `notches`: One character per notch, e.g. `"Q"` or `"ZM"`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if a notch symbol is not in
    /// the rotor's alphabet.
    pub fn moving(
        name: &str,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Rotor, EnigmaError> {
        let notches = notches
            .chars()
            .map(|ch| permutation.alphabet().index_of(ch))
            .collect::<Result<Vec<usize>, EnigmaError>>()?;
        Ok(Rotor {
            name: name.to_string(),
            permutation,
            kind: RotorKind::Moving { notches },
            position: 0,
        })
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the alphabet this rotor's wiring is built against.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns true iff this rotor advances under a pawl.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns true iff this rotor is a reflector.
    pub fn reflects(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the current rotational offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Sets the rotational offset to `position`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `position` is not below
    /// the alphabet size.
    pub fn set(&mut self, position: usize) -> Result<(), EnigmaError> {
        if position >= self.permutation.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: position,
                size: self.permutation.size(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Sets the rotational offset to the position of symbol `ch`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidSymbol`] if `ch` is not in the
    /// alphabet.
    pub fn set_symbol(&mut self, ch: char) -> Result<(), EnigmaError> {
        self.position = self.permutation.alphabet().index_of(ch)?;
        Ok(())
    }

    /// Converts `index` through the wiring in the forward direction,
    /// adjusted for the current position.
    ///
    /// Computes `wrap(permute(index + position) - position)`: the offset
    /// models the rotor's rotation relative to its fixed wiring, and the
    /// result is shifted back into the frame of the neighboring rotor.
    pub fn convert_forward(&self, index: usize) -> usize {
        let p = &self.permutation;
        let contact = p.permute(index as i64 + self.position as i64);
        p.wrap(contact as i64 - self.position as i64)
    }

    /// Converts `index` through the wiring in the backward direction; the
    /// mirror of [`convert_forward`](Self::convert_forward) using the
    /// inverse mapping.
    pub fn convert_backward(&self, index: usize) -> usize {
        let p = &self.permutation;
        let contact = p.invert(index as i64 + self.position as i64);
        p.wrap(contact as i64 - self.position as i64)
    }

    /// Returns true iff the rotor currently sits at one of its notches.
    ///
    /// Always false for the reflector and fixed kinds.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.position),
            _ => false,
        }
    }

    /// Advances the position by one, wrapping at the alphabet size.
    ///
    /// # Panics
    /// Panics if called on a non-rotating rotor. The machine's stepping
    /// pass only ever advances rotors in rotating slots, so this is
    /// unreachable through the public API.
    pub fn advance(&mut self) {
        assert!(self.rotates(), "advance() on a non-rotating rotor");
        self.position = self.permutation.wrap(self.position as i64 + 1);
    }
}

/// Arena owning every rotor of a run, addressed by name or [`RotorId`].
///
/// The catalog outlives every session: the machine installs rotors by
/// handle and `start_over` discards only the handle list.
#[derive(Debug, Default)]
pub struct RotorCatalog {
    rotors: Vec<Rotor>,
    by_name: HashMap<String, RotorId>,
}

impl RotorCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        RotorCatalog::default()
    }

    /// Creates a new empty catalog with room for `capacity` rotors.
    pub fn with_capacity(capacity: usize) -> Self {
        RotorCatalog {
            rotors: Vec::with_capacity(capacity),
            by_name: HashMap::with_capacity(capacity),
        }
    }

    /// Adds a rotor and returns its handle.
    ///
    /// # Errors
    /// Returns [`EnigmaError::MalformedConfig`] if a rotor with the same
    /// name is already present.
    pub fn add(&mut self, rotor: Rotor) -> Result<RotorId, EnigmaError> {
        if self.by_name.contains_key(rotor.name()) {
            return Err(EnigmaError::MalformedConfig(format!(
                "rotor '{}' defined twice",
                rotor.name()
            )));
        }
        let id = RotorId(self.rotors.len());
        self.by_name.insert(rotor.name().to_string(), id);
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Looks up a rotor handle by name.
    pub fn id_of(&self, name: &str) -> Option<RotorId> {
        self.by_name.get(name).copied()
    }

    /// Returns the rotor behind `id`.
    pub fn get(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    /// Returns the rotor behind `id`, mutably.
    pub fn get_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    /// Returns the number of rotors in the catalog.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true iff the catalog holds no rotors.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }
}
