//! Permutation: invertible index mapping built from cycle notation.
//!
//! A permutation is specified as whitespace-separated parenthesized groups
//! of symbols, e.g. `"(AELTPHQXRU) (BKNW) (S)"`. Each group denotes a
//! cyclic mapping: every symbol maps to the next in its group, the last
//! wrapping to the first. Symbols absent from every group map to
//! themselves, which is what makes a partial plugboard specification such
//! as `"(HQ) (EX)"` legal over a 26-letter alphabet.
//!
//! The forward and inverse index tables are materialized at construction;
//! application is a table lookup after reducing the argument into range
//! with a mathematical (non-negative) modulo, since rotor stepping math
//! hands in values offset past either end of the range.

use std::rc::Rc;

use itertools::Itertools;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;

/// A total bijection on `[0, size)` of an alphabet, built from disjoint
/// cycles.
///
/// Immutable after construction. The central invariant of the whole
/// cipher: `invert(permute(i)) == i` and `permute(invert(i)) == i` for
/// every index.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use enigma::{Alphabet, Permutation};
///
/// let alpha = Rc::new(Alphabet::range('A', 'D').unwrap());
/// let p = Permutation::new("(ABC)", alpha).unwrap();
/// assert_eq!(p.permute(0), 1); // A -> B
/// assert_eq!(p.permute(2), 0); // C -> A
/// assert_eq!(p.permute(3), 3); // D not in any cycle: identity
/// assert_eq!(p.invert(1), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Rc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Builds a permutation from a cycle specification.
    ///
    /// The empty specification (or one containing only whitespace) is the
    /// identity permutation.
    ///
    /// # Parameters
    /// - `cycles`: Whitespace-separated parenthesized symbol groups.
    /// - `alphabet`: The alphabet the indices refer to.
    ///
    /// # Errors
    /// Returns [`EnigmaError::MalformedPermutation`] if the specification
    /// has unbalanced or nested parentheses, text outside a group, an empty
    /// group, a symbol not in the alphabet, or a symbol appearing twice.
    pub fn new(cycles: &str, alphabet: Rc<Alphabet>) -> Result<Permutation, EnigmaError> {
        let parsed = parse_cycles(cycles, &alphabet)?;

        // Start from the identity, then wire each cycle over it.
        let mut forward: Vec<usize> = (0..alphabet.size()).collect();
        for cycle in &parsed {
            for (&from, &to) in cycle.iter().cycle().tuple_windows().take(cycle.len()) {
                forward[from] = to;
            }
        }

        let mut inverse = vec![0usize; forward.len()];
        for (i, &mapped) in forward.iter().enumerate() {
            inverse[mapped] = i;
        }

        Ok(Permutation {
            alphabet,
            forward,
            inverse,
        })
    }

    /// Builds the identity permutation over `alphabet`.
    ///
    /// Equivalent to `Permutation::new("", alphabet)` but infallible; this
    /// is the machine's default plugboard.
    pub fn identity(alphabet: Rc<Alphabet>) -> Permutation {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Permutation {
            inverse: forward.clone(),
            forward,
            alphabet,
        }
    }

    /// Returns the number of indices the permutation acts on.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns the alphabet this permutation is built against.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        &self.alphabet
    }

    /// Reduces an arbitrary integer into `[0, size)`.
    ///
    /// Uses mathematical modulo, never truncating division: stepping math
    /// produces negative intermediates and `wrap(-1)` must be `size - 1`.
    pub fn wrap(&self, value: i64) -> usize {
        value.rem_euclid(self.forward.len() as i64) as usize
    }

    /// Maps `index` forward through its cycle.
    ///
    /// The argument is wrapped into range first, so callers that pre-add a
    /// rotor offset may pass values outside `[0, size)`.
    pub fn permute(&self, index: i64) -> usize {
        self.forward[self.wrap(index)]
    }

    /// Maps `index` backward through its cycle; the exact inverse of
    /// [`permute`](Self::permute).
    pub fn invert(&self, index: i64) -> usize {
        self.inverse[self.wrap(index)]
    }

    /// Returns true iff no index maps to itself.
    ///
    /// A reflector's wiring must satisfy this: a fixed point would encode a
    /// symbol to itself, which the machine geometry cannot do.
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &mapped)| i != mapped)
    }
}

/// Parses a cycle specification into index cycles, validating structure.
fn parse_cycles(spec: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>, EnigmaError> {
    let malformed = |detail: &str| EnigmaError::MalformedPermutation(detail.to_string());

    let mut cycles: Vec<Vec<usize>> = Vec::new();
    let mut current: Option<Vec<usize>> = None;
    let mut seen = vec![false; alphabet.size()];

    for ch in spec.chars() {
        match ch {
            '(' => {
                if current.is_some() {
                    return Err(malformed("nested '('"));
                }
                current = Some(Vec::new());
            }
            ')' => {
                let cycle = current.take().ok_or_else(|| malformed("unmatched ')'"))?;
                if cycle.is_empty() {
                    return Err(malformed("empty cycle"));
                }
                cycles.push(cycle);
            }
            ch if ch.is_whitespace() => {
                if current.is_some() {
                    return Err(malformed("whitespace inside a cycle"));
                }
            }
            ch => {
                let cycle = current
                    .as_mut()
                    .ok_or_else(|| malformed("symbol outside parentheses"))?;
                let index = alphabet
                    .index_of(ch)
                    .map_err(|_| malformed(&format!("symbol '{}' not in alphabet", ch)))?;
                if seen[index] {
                    return Err(malformed(&format!("symbol '{}' appears twice", ch)));
                }
                seen[index] = true;
                cycle.push(index);
            }
        }
    }
    if current.is_some() {
        return Err(malformed("unclosed '('"));
    }

    Ok(cycles)
}
