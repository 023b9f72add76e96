// enigma-cli: shared utilities for the command-line front end.

use std::process;

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

/// Split args into positional arguments, rejecting unknown flags.
pub fn positionals(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for arg in args {
        if arg.starts_with('-') && arg != "-" {
            fatal(&format!("unknown option: {arg}"));
        }
        out.push(arg.clone());
    }
    out
}
