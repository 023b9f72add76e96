// Rotor: a named substitution unit with a position and a ring setting.

use crate::{EnigmaError, Permutation};

/// What a rotor is allowed to do, beyond substituting.
///
/// The three variants differ only in a handful of branches (`advance`,
/// `at_notch`, `pawl_count`, setting validation), so they are one concrete
/// type dispatching on this enum rather than a type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Fixed in the leftmost slot; position 0, default ring, never moves.
    /// Its wiring routes the signal back toward the plugboard.
    Reflector,
    /// Position and ring are settable, but the rotor never advances.
    Fixed,
    /// Advances under its pawl; `notches` are the positions (as alphabet
    /// indices) at which it pushes its left neighbor.
    Moving { notches: Vec<usize> },
}

/// One rotor: a permutation plus mutable `(position, ring)` state.
///
/// `Clone` so that a read-only inventory can hand independently-owned
/// copies to each machine; two machines must never share rotor state.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    kind: RotorKind,
    position: usize,
    ring: usize,
}

impl Rotor {
    /// A reflector named `name`. The wiring must substitute every symbol
    /// (be a derangement); the real device's reflectors connect every
    /// contact pairwise.
    pub fn reflector(name: &str, permutation: Permutation) -> Result<Self, EnigmaError> {
        if !permutation.is_derangement() {
            return Err(EnigmaError::IncompleteReflector(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            permutation,
            kind: RotorKind::Reflector,
            position: 0,
            ring: 0,
        })
    }

    /// A non-moving rotor named `name`.
    pub fn fixed(name: &str, permutation: Permutation) -> Self {
        Self {
            name: name.to_string(),
            permutation,
            kind: RotorKind::Fixed,
            position: 0,
            ring: 0,
        }
    }

    /// A moving rotor named `name` with a notch at every symbol of
    /// `notches`.
    pub fn moving(name: &str, permutation: Permutation, notches: &str) -> Result<Self, EnigmaError> {
        let notches = notches
            .chars()
            .map(|c| permutation.alphabet().to_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.to_string(),
            permutation,
            kind: RotorKind::Moving { notches },
            position: 0,
            ring: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rotor's capability set.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Alphabet size; also the number of rotor positions.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Current position as an alphabet index.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True iff this rotor occupies the reflecting role.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// True iff this rotor has a pawl and can move.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Number of pawls this rotor contributes to the assembly: 0 or 1.
    pub fn pawl_count(&self) -> usize {
        usize::from(self.rotates())
    }

    /// True iff the symbol at the current position is one of this rotor's
    /// notches. Non-moving rotors are never at a notch.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.position),
            _ => false,
        }
    }

    /// Advance one position, wrapping at the alphabet size. No-op unless
    /// this is a moving rotor.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.position = self.permutation.wrap(self.position as isize + 1);
        }
    }

    /// Set the position to the index `posn`. A reflector accepts only 0.
    pub fn set_position_index(&mut self, posn: usize) -> Result<(), EnigmaError> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::ReflectorPosition(self.name.clone()));
        }
        self.position = posn;
        Ok(())
    }

    /// Set the position to the index of `symbol`.
    pub fn set_position(&mut self, symbol: char) -> Result<(), EnigmaError> {
        let posn = self.permutation.alphabet().to_index(symbol)?;
        self.set_position_index(posn)
    }

    /// Set the ring to `symbol`. A reflector accepts only the alphabet's
    /// first symbol, its default.
    pub fn set_ring(&mut self, symbol: char) -> Result<(), EnigmaError> {
        let ring = self.permutation.alphabet().to_index(symbol)?;
        if self.reflecting() && ring != 0 {
            return Err(EnigmaError::ReflectorRing(self.name.clone()));
        }
        self.ring = ring;
        Ok(())
    }

    /// Ring setting shifts the internal wiring relative to the external
    /// contacts; with the default ring the offset is just the position.
    fn offset(&self) -> isize {
        self.permutation
            .wrap(self.position as isize - self.ring as isize) as isize
    }

    /// Substitute index `p` on the plugboard-to-reflector pass.
    ///
    /// The offset is added before the wiring lookup and subtracted back
    /// out, so position 0 with the default ring behaves as the unshifted
    /// wiring.
    pub fn convert_forward(&self, p: usize) -> usize {
        let offset = self.offset();
        let contact = self.permutation.wrap(p as isize + offset);
        self.permutation
            .wrap(self.permutation.apply(contact) as isize - offset)
    }

    /// Substitute index `e` on the reflector-to-plugboard pass, through
    /// the inverse wiring.
    pub fn convert_backward(&self, e: usize) -> usize {
        let offset = self.offset();
        let contact = self.permutation.wrap(e as isize + offset);
        self.permutation
            .wrap(self.permutation.invert(contact) as isize - offset)
    }
}
