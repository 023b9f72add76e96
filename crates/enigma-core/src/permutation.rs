// Permutation: cycle-notation substitution table over alphabet indices.

use hashbrown::HashMap;

use crate::{Alphabet, EnigmaError};

/// A permutation of alphabet indices given in cycle notation.
///
/// Built from a string of cycle groups such as `"(AELTPHQXRU) (BKNW) (S)"`:
/// each group maps `c0 -> c1 -> ... -> cm -> c0`. Symbols absent from every
/// cycle map to themselves, so a permutation with no cycles is the
/// identity. Forward and inverse tables are kept in lockstep, and further
/// cycles may be added after construction -- rotor wirings are sometimes
/// specified across several configuration lines.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Alphabet,
    forward: HashMap<usize, usize>,
    inverse: HashMap<usize, usize>,
}

impl Permutation {
    /// Build a permutation over `alphabet` from the cycle groups in
    /// `cycles`. An empty string yields the identity.
    pub fn new(cycles: &str, alphabet: Alphabet) -> Result<Self, EnigmaError> {
        let mut perm = Self {
            alphabet,
            forward: HashMap::new(),
            inverse: HashMap::new(),
        };
        perm.add_cycles(cycles)?;
        Ok(perm)
    }

    /// Install every cycle group found in `cycles` into the forward and
    /// inverse tables. Symbols not mentioned keep their current mapping.
    ///
    /// A cycle token is a maximal run of characters that are not
    /// whitespace, `(`, `)` or `*`. Symbols outside the alphabet fail with
    /// [`EnigmaError::UnknownSymbol`].
    pub fn add_cycles(&mut self, cycles: &str) -> Result<(), EnigmaError> {
        for token in cycle_tokens(cycles) {
            let indices = token
                .chars()
                .map(|c| self.alphabet.to_index(c))
                .collect::<Result<Vec<_>, _>>()?;
            for (k, &cur) in indices.iter().enumerate() {
                let next = indices[(k + 1) % indices.len()];
                self.forward.insert(cur, next);
                self.inverse.insert(next, cur);
            }
        }
        Ok(())
    }

    /// Size of the alphabet being permuted.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// The alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// `value` reduced modulo the alphabet size, always non-negative.
    pub fn wrap(&self, value: isize) -> usize {
        value.rem_euclid(self.alphabet.size() as isize) as usize
    }

    /// Forward substitution of index `p`. Unmapped indices are returned
    /// unchanged; cycles need not cover the whole alphabet.
    pub fn apply(&self, p: usize) -> usize {
        let p = self.wrap(p as isize);
        self.forward.get(&p).copied().unwrap_or(p)
    }

    /// Inverse substitution of index `c`.
    pub fn invert(&self, c: usize) -> usize {
        let c = self.wrap(c as isize);
        self.inverse.get(&c).copied().unwrap_or(c)
    }

    /// Forward substitution at the symbol level.
    pub fn apply_char(&self, symbol: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_index(symbol)?;
        self.alphabet.to_char(self.apply(index))
    }

    /// Inverse substitution at the symbol level.
    pub fn invert_char(&self, symbol: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_index(symbol)?;
        self.alphabet.to_char(self.invert(index))
    }

    /// True iff every index has an explicit mapping distinct from itself.
    /// Reflector wirings must satisfy this: every symbol substitutes.
    pub fn is_derangement(&self) -> bool {
        (0..self.size()).all(|i| self.forward.get(&i).is_some_and(|&j| j != i))
    }

    /// The explicitly mapped `(from, to)` index pairs, in no particular
    /// order. Used to derive plugboard pairings.
    pub(crate) fn mappings(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.forward.iter().map(|(&from, &to)| (from, to))
    }
}

/// Split a cycle string into its symbol runs, dropping whitespace and the
/// `(`, `)`, `*` delimiters.
fn cycle_tokens(cycles: &str) -> impl Iterator<Item = &str> {
    cycles
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == '*')
        .filter(|token| !token.is_empty())
}
