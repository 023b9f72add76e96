// Configuration text: alphabet, slot/pawl counts, rotor inventory.

use enigma_core::{Alphabet, Machine, Permutation, Rotor};

use crate::ConfError;

/// Build a [`Machine`] from a configuration text.
///
/// The format is line-oriented:
///
/// ```text
/// ABCDEFGHIJKLMNOPQRSTUVWXYZ
/// 5 3
/// B    R      (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN)
///             (MO) (TZ) (VW)
/// Beta N      (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
/// I    MQ     (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
/// ```
///
/// Line 1 is the alphabet; line 2 the slot count then the pawl count; each
/// further line describes one rotor as `NAME TYPE CYCLES...`, where TYPE
/// is `R` (reflector), `N` (fixed) or `M` followed by the notch symbols.
/// A line beginning with `(` continues the previous rotor's cycle list.
pub fn parse_config(text: &str) -> Result<Machine, ConfError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let alphabet_line = lines.next().ok_or(ConfError::Truncated)?;
    let symbols = alphabet_line
        .split_whitespace()
        .next()
        .ok_or(ConfError::Truncated)?;
    let alphabet = Alphabet::new(symbols)?;

    let counts_line = lines.next().ok_or(ConfError::Truncated)?;
    let (num_slots, num_pawls) = parse_counts(counts_line)?;

    let descriptions = parse_rotor_lines(lines)?;
    let mut rotors = Vec::with_capacity(descriptions.len());
    for desc in descriptions {
        rotors.push(desc.build(&alphabet)?);
    }

    Ok(Machine::new(alphabet, num_slots, num_pawls, rotors)?)
}

/// One rotor description with its cycle list fully accumulated. Built
/// before the rotor itself so that wirings spanning several lines are
/// complete when validated.
struct RotorDesc {
    name: String,
    kind: char,
    notches: String,
    cycles: String,
}

impl RotorDesc {
    fn build(self, alphabet: &Alphabet) -> Result<Rotor, ConfError> {
        let permutation = Permutation::new(&self.cycles, alphabet.clone())?;
        let rotor = match self.kind {
            'R' => Rotor::reflector(&self.name, permutation)?,
            'N' => Rotor::fixed(&self.name, permutation),
            'M' => Rotor::moving(&self.name, permutation, &self.notches)?,
            _ => unreachable!("kind is checked during parsing"),
        };
        Ok(rotor)
    }
}

fn parse_counts(line: &str) -> Result<(usize, usize), ConfError> {
    let bad = || ConfError::BadCounts(line.trim().to_string());
    let mut tokens = line.split_whitespace();
    let slots = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(bad)?;
    let pawls = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(bad)?;
    if tokens.next().is_some() {
        return Err(bad());
    }
    Ok((slots, pawls))
}

fn parse_rotor_lines<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<Vec<RotorDesc>, ConfError> {
    let mut descriptions: Vec<RotorDesc> = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.starts_with('(') {
            // Continuation of the previous rotor's wiring.
            let last = descriptions.last_mut().ok_or(ConfError::DanglingCycles)?;
            last.cycles.push(' ');
            last.cycles.push_str(trimmed);
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| ConfError::BadRotorDescription(trimmed.to_string()))?;
        let type_token = tokens
            .next()
            .ok_or_else(|| ConfError::BadRotorDescription(trimmed.to_string()))?;
        let cycles = tokens.collect::<Vec<_>>().join(" ");

        let mut type_chars = type_token.chars();
        let (kind, notches) = match (type_chars.next(), type_chars.as_str()) {
            (Some('R'), "") => ('R', String::new()),
            (Some('N'), "") => ('N', String::new()),
            (Some('M'), notches) => ('M', notches.to_string()),
            _ => return Err(ConfError::BadRotorDescription(trimmed.to_string())),
        };
        descriptions.push(RotorDesc {
            name: name.to_string(),
            kind,
            notches,
            cycles,
        });
    }
    Ok(descriptions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD: &str = "\
ABCDEFGHIJKLMNOPQRSTUVWXYZ
4 3
B   R  (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
I   MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
II  ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
";

    #[test]
    fn parse_standard_inventory() {
        let mut machine = parse_config(STANDARD).unwrap();
        assert_eq!(machine.num_slots(), 4);
        assert_eq!(machine.num_pawls(), 3);
        assert_eq!(machine.alphabet().size(), 26);
        machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        machine.set_positions("AAA").unwrap();
        assert_eq!(machine.convert("AAAAA").unwrap(), "BDZGO");
    }

    #[test]
    fn wiring_may_span_lines() {
        let config = "\
ABCDEFGHIJKLMNOPQRSTUVWXYZ
2 1
B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL)
    (IP) (JX) (KN) (MO) (TZ) (VW)
I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
";
        let mut machine = parse_config(config).unwrap();
        machine.insert_rotors(&["B", "I"]).unwrap();
        machine.set_positions("A").unwrap();
        // A continuation-complete reflector passes the derangement check
        // and the machine converts.
        machine.convert("HELLO").unwrap();
    }

    #[test]
    fn truncated_file() {
        assert!(matches!(parse_config(""), Err(ConfError::Truncated)));
        assert!(matches!(parse_config("ABC\n"), Err(ConfError::Truncated)));
    }

    #[test]
    fn malformed_counts() {
        assert!(matches!(
            parse_config("ABC\nfour 3\n"),
            Err(ConfError::BadCounts(_))
        ));
        assert!(matches!(
            parse_config("ABC\n4\n"),
            Err(ConfError::BadCounts(_))
        ));
        assert!(matches!(
            parse_config("ABC\n4 3 2\n"),
            Err(ConfError::BadCounts(_))
        ));
    }

    #[test]
    fn malformed_rotor_description() {
        assert!(matches!(
            parse_config("ABC\n2 1\nB X (AB)\n"),
            Err(ConfError::BadRotorDescription(_))
        ));
        assert!(matches!(
            parse_config("ABC\n2 1\nB\n"),
            Err(ConfError::BadRotorDescription(_))
        ));
    }

    #[test]
    fn continuation_before_any_rotor() {
        assert!(matches!(
            parse_config("ABC\n2 1\n(AB)\n"),
            Err(ConfError::DanglingCycles)
        ));
    }

    #[test]
    fn incomplete_reflector_is_rejected() {
        let config = "ABCD\n2 1\nR R (AB)\nI MA\n";
        assert!(matches!(parse_config(config), Err(ConfError::Engine(_))));
    }

    #[test]
    fn moving_rotor_without_cycles_is_identity() {
        let config = "ABCD\n2 1\nR R (AB) (CD)\nM1 MC\n";
        let mut machine = parse_config(config).unwrap();
        machine.insert_rotors(&["R", "M1"]).unwrap();
        machine.set_positions("A").unwrap();
        assert_eq!(machine.convert("A").unwrap(), "B");
    }
}
