// enigma: rotor cipher machine simulator.
//
// Reads a machine configuration file, then processes an input stream of
// settings lines (starting with `*`) and message lines, writing the
// converted messages in five-letter groups.
//
// Usage:
//   enigma CONFIG [INPUT [OUTPUT]]
//
// CONFIG names the configuration file (alphabet, slot and pawl counts,
// rotor wirings). INPUT defaults to standard input, OUTPUT to standard
// output.

use std::fs;
use std::io::{self, Read, Write};

use enigma_conf::{parse_config, run_session};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if enigma_cli::wants_help(&args) {
        println!("enigma: rotor cipher machine simulator.");
        println!();
        println!("Usage: enigma CONFIG [INPUT [OUTPUT]]");
        println!();
        println!("Processes the messages in INPUT (default: stdin) on the machine");
        println!("described by CONFIG, writing five-letter groups to OUTPUT");
        println!("(default: stdout). Lines starting with '*' select rotors,");
        println!("positions, ring settings and plugboard pairs.");
        println!();
        println!("Options:");
        println!("  -h, --help    Print this help");
        return;
    }

    let args = enigma_cli::positionals(&args);
    if args.is_empty() || args.len() > 3 {
        enigma_cli::fatal("expected 1 to 3 arguments: CONFIG [INPUT [OUTPUT]]");
    }

    let config_text = match fs::read_to_string(&args[0]) {
        Ok(text) => text,
        Err(e) => enigma_cli::fatal(&format!("could not open {}: {e}", args[0])),
    };
    let mut machine = match parse_config(&config_text) {
        Ok(machine) => machine,
        Err(e) => enigma_cli::fatal(&e.to_string()),
    };

    let input = match args.get(1) {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => enigma_cli::fatal(&format!("could not open {path}: {e}")),
        },
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                enigma_cli::fatal(&format!("error reading stdin: {e}"));
            }
            buf
        }
    };

    let output = match run_session(&mut machine, &input) {
        Ok(output) => output,
        Err(e) => enigma_cli::fatal(&e.to_string()),
    };

    match args.get(2) {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                enigma_cli::fatal(&format!("could not write {path}: {e}"));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            if let Err(e) = out.write_all(output.as_bytes()) {
                enigma_cli::fatal(&format!("error writing stdout: {e}"));
            }
        }
    }
}
