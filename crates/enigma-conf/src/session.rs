// Message sessions: settings lines, conversion, five-symbol grouping.

use enigma_core::{Machine, Permutation};

use crate::ConfError;

/// Process a whole input stream against `machine`.
///
/// The stream is a sequence of lines. A line whose first non-blank
/// character is `*` reconfigures the machine; a blank line is echoed; any
/// other line is a message whose whitespace is stripped and whose symbols
/// are converted and regrouped. The first non-blank line must be a
/// settings line. Rotor positions persist across message lines, so a
/// multi-line message enciphers exactly like the same text on one line.
pub fn run_session(machine: &mut Machine, input: &str) -> Result<String, ConfError> {
    let mut out = String::new();
    let mut configured = false;
    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push('\n');
            continue;
        }
        if trimmed.starts_with('*') {
            apply_settings(machine, trimmed)?;
            configured = true;
            continue;
        }
        if !configured {
            return Err(ConfError::MissingSettings);
        }
        let message: String = line.split_whitespace().collect();
        let converted = machine.convert(&message)?;
        out.push_str(&format_groups(&converted));
    }
    Ok(out)
}

/// Apply one `*` settings line:
///
/// ```text
/// * B Beta I II III AXLE (YF) (ZH)
/// ```
///
/// One rotor name per slot (the reflector first), then the position
/// symbols, then optionally the ring symbols, then optionally plugboard
/// pairs. The plugboard is replaced on every settings line; with no pairs
/// given it reverts to the identity.
pub fn apply_settings(machine: &mut Machine, line: &str) -> Result<(), ConfError> {
    let bad = || ConfError::BadSettingLine(line.trim().to_string());
    let rest = line.trim_start().strip_prefix('*').ok_or_else(bad)?;
    let tokens: Vec<&str> = rest.split_whitespace().collect();

    let slots = machine.num_slots();
    if tokens.len() < slots + 1 {
        return Err(bad());
    }
    machine.insert_rotors(&tokens[..slots])?;
    machine.set_positions(tokens[slots])?;

    let mut rings: Option<&str> = None;
    let mut plug = String::new();
    for token in &tokens[slots + 1..] {
        if token.starts_with('(') {
            plug.push(' ');
            plug.push_str(token);
        } else if rings.is_none() && plug.is_empty() {
            rings = Some(token);
        } else {
            return Err(bad());
        }
    }
    if let Some(rings) = rings {
        machine.set_rings(rings)?;
    }
    let pairs = Permutation::new(&plug, machine.alphabet().clone())?;
    machine.set_plugboard(&pairs)?;
    Ok(())
}

/// Regroup converted text into five-symbol blocks separated by single
/// spaces, with a trailing newline. The last block may be shorter.
pub fn format_groups(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 5 + 1);
    for (i, block) in chars.chunks(5).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.extend(block);
    }
    out.push('\n');
    out
}
