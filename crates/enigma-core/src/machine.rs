// Machine: rotor slot assembly, stepping mechanism and symbol conversion.

use hashbrown::HashMap;

use crate::{Alphabet, EnigmaError, Permutation, Plugboard, Rotor};

/// A complete machine: an alphabet, `num_slots` rotor slots with
/// `num_pawls` pawls, a named rotor inventory, and a plugboard.
///
/// The inventory is fixed at construction; rotors are inserted into slots
/// per message group and are cloned out of the inventory, so the same
/// inventory can back any number of machines without sharing position
/// state. Slot 0 always holds the reflector. Conversion advances rotor
/// positions in place, which is what makes the cipher polyalphabetic.
#[derive(Debug)]
pub struct Machine {
    alphabet: Alphabet,
    num_slots: usize,
    num_pawls: usize,
    inventory: HashMap<String, Rotor>,
    slots: Vec<Rotor>,
    plugboard: Plugboard,
}

impl Machine {
    /// A machine with `num_slots > 1` rotor slots, `num_pawls < num_slots`
    /// pawls and the given rotor inventory. Rotor names must be unique.
    pub fn new(
        alphabet: Alphabet,
        num_slots: usize,
        num_pawls: usize,
        rotors: Vec<Rotor>,
    ) -> Result<Self, EnigmaError> {
        if num_slots < 2 || num_pawls >= num_slots {
            return Err(EnigmaError::InvalidLayout {
                slots: num_slots,
                pawls: num_pawls,
            });
        }
        let mut inventory = HashMap::with_capacity(rotors.len());
        for rotor in rotors {
            let name = rotor.name().to_string();
            if inventory.insert(name.clone(), rotor).is_some() {
                return Err(EnigmaError::DuplicateRotor(name));
            }
        }
        Ok(Self {
            alphabet,
            num_slots,
            num_pawls,
            inventory,
            slots: Vec::new(),
            plugboard: Plugboard::identity(),
        })
    }

    /// Number of rotor slots.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Number of pawls, and thus of rotating rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// The machine's alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Replace the slot assembly with the rotors named in `names`, in
    /// order. `names[0]` must name a reflector, and one name is required
    /// per slot. Each rotor is cloned out of the inventory at its default
    /// position and ring.
    pub fn insert_rotors(&mut self, names: &[&str]) -> Result<(), EnigmaError> {
        if names.len() != self.num_slots {
            return Err(EnigmaError::WrongRotorCount {
                expected: self.num_slots,
                actual: names.len(),
            });
        }
        let mut slots = Vec::with_capacity(names.len());
        for (i, &name) in names.iter().enumerate() {
            let rotor = self
                .inventory
                .get(name)
                .cloned()
                .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))?;
            if i == 0 && !rotor.reflecting() {
                return Err(EnigmaError::WrongReflector(name.to_string()));
            }
            slots.push(rotor);
        }
        self.slots = slots;
        Ok(())
    }

    /// Set rotor positions from `setting`: exactly `num_slots - 1`
    /// symbols, symbol `i` setting slot `i + 1` (the reflector keeps
    /// position 0).
    pub fn set_positions(&mut self, setting: &str) -> Result<(), EnigmaError> {
        let symbols = self.checked_setting(setting)?;
        for (i, symbol) in symbols.into_iter().enumerate() {
            self.slots[i + 1].set_position(symbol)?;
        }
        Ok(())
    }

    /// Set ring settings from `rings`, under the same length contract as
    /// [`set_positions`](Self::set_positions).
    pub fn set_rings(&mut self, rings: &str) -> Result<(), EnigmaError> {
        let symbols = self.checked_setting(rings)?;
        for (i, symbol) in symbols.into_iter().enumerate() {
            self.slots[i + 1].set_ring(symbol)?;
        }
        Ok(())
    }

    /// Install the plugboard pairing described by `permutation`'s cycles.
    /// Every cycle must be a symmetric pair.
    pub fn set_plugboard(&mut self, permutation: &Permutation) -> Result<(), EnigmaError> {
        self.plugboard = Plugboard::from_permutation(permutation)?;
        Ok(())
    }

    /// Current position symbols of slots `1..num_slots`, leftmost first.
    pub fn rotor_positions(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .filter_map(|rotor| self.alphabet.to_char(rotor.position()).ok())
            .collect()
    }

    /// Validate the slot assembly and the length of a setting string,
    /// returning its symbols.
    fn checked_setting(&self, setting: &str) -> Result<Vec<char>, EnigmaError> {
        if self.slots.len() != self.num_slots {
            return Err(EnigmaError::RotorsNotInserted);
        }
        let symbols: Vec<char> = setting.chars().collect();
        let expected = self.num_slots - 1;
        if symbols.len() < expected {
            return Err(EnigmaError::SettingsTooShort {
                expected,
                actual: symbols.len(),
            });
        }
        if symbols.len() > expected {
            return Err(EnigmaError::SettingsTooLong {
                expected,
                actual: symbols.len(),
            });
        }
        Ok(symbols)
    }

    /// Advance the assembly one tick.
    ///
    /// The advance set is computed from pre-tick notch state and each slot
    /// moves at most once: every pawl-bearing slot whose right neighbor is
    /// at its notch advances together with that neighbor, and the
    /// rightmost pawl-bearing slot advances unconditionally. A middle
    /// rotor sitting on its own notch is therefore pushed and pushes its
    /// left neighbor in the same tick -- the double-step anomaly.
    fn step(&mut self) -> Result<(), EnigmaError> {
        match self.slots.first() {
            Some(rotor) if rotor.reflecting() => {}
            Some(rotor) => return Err(EnigmaError::WrongReflector(rotor.name().to_string())),
            None => return Err(EnigmaError::RotorsNotInserted),
        }

        let last = self.slots.len() - 1;
        let mut advance = vec![false; self.slots.len()];
        for i in 1..last {
            if self.slots[i].rotates() && self.slots[i + 1].at_notch() {
                advance[i] = true;
                advance[i + 1] = true;
            }
        }
        if self.slots[last].rotates() {
            advance[last] = true;
        }
        for (rotor, &go) in self.slots.iter_mut().zip(&advance) {
            if go {
                rotor.advance();
            }
        }

        let pawls: usize = self.slots.iter().map(Rotor::pawl_count).sum();
        if pawls != self.num_pawls {
            return Err(EnigmaError::PawlMismatch {
                expected: self.num_pawls,
                actual: pawls,
            });
        }
        Ok(())
    }

    /// Convert one symbol index, advancing the machine first.
    ///
    /// The signal path is plugboard, then every slot right-to-left through
    /// the forward wirings (the reflector last), then slots 1 to the
    /// rightmost through the inverse wirings, then the plugboard again.
    pub fn convert_index(&mut self, c: usize) -> Result<usize, EnigmaError> {
        if c >= self.alphabet.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        self.step()?;

        let mut signal = self.plugboard.swap(c);
        for rotor in self.slots.iter().rev() {
            signal = rotor.convert_forward(signal);
        }
        for rotor in self.slots.iter().skip(1) {
            signal = rotor.convert_backward(signal);
        }
        Ok(self.plugboard.swap(signal))
    }

    /// Convert a whole message, symbol by symbol. Rotor state evolves
    /// across the call.
    pub fn convert(&mut self, msg: &str) -> Result<String, EnigmaError> {
        let mut out = String::with_capacity(msg.len());
        for symbol in msg.chars() {
            let index = self.alphabet.to_index(symbol)?;
            let converted = self.convert_index(index)?;
            out.push(self.alphabet.to_char(converted)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A four-symbol machine with identity rotor wirings: conversion is
    // then the reflector pairing alone, and stepping is easy to follow.
    fn tiny_machine() -> Machine {
        let alpha = Alphabet::new("ABCD").unwrap();
        let identity = |a: &Alphabet| Permutation::new("", a.clone()).unwrap();
        let rotors = vec![
            Rotor::reflector("R", Permutation::new("(AB) (CD)", alpha.clone()).unwrap()).unwrap(),
            Rotor::moving("M1", identity(&alpha), "D").unwrap(),
            Rotor::moving("M2", identity(&alpha), "B").unwrap(),
            Rotor::moving("M3", identity(&alpha), "C").unwrap(),
            Rotor::fixed("F", identity(&alpha)),
        ];
        Machine::new(alpha, 4, 3, rotors).unwrap()
    }

    #[test]
    fn rightmost_rotor_always_steps() {
        let mut m = tiny_machine();
        m.insert_rotors(&["R", "M1", "M2", "M3"]).unwrap();
        m.set_positions("AAA").unwrap();
        m.convert("A").unwrap();
        assert_eq!(m.rotor_positions(), "AAB");
    }

    #[test]
    fn double_step_pushes_notch_target_and_its_neighbor() {
        let mut m = tiny_machine();
        m.insert_rotors(&["R", "M1", "M2", "M3"]).unwrap();
        m.set_positions("AAA").unwrap();

        // M3 notches at C, M2 at B. When M3 reaches C it drags M2 along;
        // the next tick M2 sits on its own notch and both M1 and M2 step.
        let expected = ["AAB", "AAC", "ABD", "BCA"];
        for want in expected {
            m.convert("A").unwrap();
            assert_eq!(m.rotor_positions(), want);
        }
    }

    #[test]
    fn identity_rotors_leave_only_the_reflector() {
        let mut m = tiny_machine();
        m.insert_rotors(&["R", "M1", "M2", "M3"]).unwrap();
        m.set_positions("AAA").unwrap();
        // Positions do not matter for identity wirings: (AB)(CD) shows
        // through unchanged.
        assert_eq!(m.convert("ABCD").unwrap(), "BADC");
    }

    #[test]
    fn plugboard_applies_on_both_ends() {
        let mut m = tiny_machine();
        m.insert_rotors(&["R", "M1", "M2", "M3"]).unwrap();
        m.set_positions("AAA").unwrap();
        let pairs = Permutation::new("(AC)", m.alphabet().clone()).unwrap();
        m.set_plugboard(&pairs).unwrap();
        // A -> C on the way in, reflector C -> D, nothing plugged on D.
        assert_eq!(m.convert("A").unwrap(), "D");
    }

    #[test]
    fn insert_requires_a_reflector_in_slot_zero() {
        let mut m = tiny_machine();
        assert!(matches!(
            m.insert_rotors(&["M1", "R", "M2", "M3"]),
            Err(EnigmaError::WrongReflector(_))
        ));
    }

    #[test]
    fn insert_rejects_unknown_names_and_bad_arity() {
        let mut m = tiny_machine();
        assert!(matches!(
            m.insert_rotors(&["R", "M1", "M2", "M9"]),
            Err(EnigmaError::UnknownRotor(_))
        ));
        assert!(matches!(
            m.insert_rotors(&["R", "M1", "M2"]),
            Err(EnigmaError::WrongRotorCount {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn settings_length_is_checked_both_ways() {
        let mut m = tiny_machine();
        m.insert_rotors(&["R", "M1", "M2", "M3"]).unwrap();
        assert!(matches!(
            m.set_positions("AA"),
            Err(EnigmaError::SettingsTooShort {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            m.set_positions("AAAA"),
            Err(EnigmaError::SettingsTooLong {
                expected: 3,
                actual: 4
            })
        ));
        assert!(matches!(
            m.set_rings("A"),
            Err(EnigmaError::SettingsTooShort { .. })
        ));
    }

    #[test]
    fn settings_before_insertion_fail() {
        let mut m = tiny_machine();
        assert!(matches!(
            m.set_positions("AAA"),
            Err(EnigmaError::RotorsNotInserted)
        ));
    }

    #[test]
    fn pawl_count_mismatch_is_fatal() {
        let mut m = tiny_machine();
        // F does not rotate: only two pawls inserted on a three-pawl
        // machine.
        m.insert_rotors(&["R", "F", "M2", "M3"]).unwrap();
        m.set_positions("AAA").unwrap();
        assert!(matches!(
            m.convert("A"),
            Err(EnigmaError::PawlMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn layout_validation() {
        let alpha = Alphabet::new("AB").unwrap();
        assert!(matches!(
            Machine::new(alpha.clone(), 1, 0, Vec::new()),
            Err(EnigmaError::InvalidLayout { .. })
        ));
        assert!(matches!(
            Machine::new(alpha, 3, 3, Vec::new()),
            Err(EnigmaError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn duplicate_rotor_names_rejected() {
        let alpha = Alphabet::new("ABCD").unwrap();
        let identity = Permutation::new("", alpha.clone()).unwrap();
        let rotors = vec![
            Rotor::fixed("X", identity.clone()),
            Rotor::fixed("X", identity),
        ];
        assert!(matches!(
            Machine::new(alpha, 4, 3, rotors),
            Err(EnigmaError::DuplicateRotor(_))
        ));
    }

    #[test]
    fn symbols_outside_the_alphabet_fail() {
        let mut m = tiny_machine();
        m.insert_rotors(&["R", "M1", "M2", "M3"]).unwrap();
        m.set_positions("AAA").unwrap();
        assert!(matches!(
            m.convert("AXE"),
            Err(EnigmaError::UnknownSymbol('X'))
        ));
        assert!(matches!(
            m.convert_index(4),
            Err(EnigmaError::IndexOutOfRange { index: 4, size: 4 })
        ));
    }
}
