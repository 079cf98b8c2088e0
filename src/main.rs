//! Command-line driver for the Enigma simulator.
//!
//! Reads a machine configuration file, then processes message lines from
//! an input file (or standard input), writing converted output to a file
//! (or standard output). Any configuration or input error prints a single
//! `Error: <message>` line on standard error and exits with code 1.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::debug;

use enigma::config::{self, MachineConfig};

/// Simulator for the historical Enigma rotor cipher machine.
#[derive(Parser)]
#[command(name = "enigma", version, about)]
struct Args {
    /// Machine configuration file
    config: PathBuf,
    /// Message input file; standard input when omitted
    input: Option<PathBuf>,
    /// Output file; standard output when omitted
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let source = read_file(&args.config)?;
    let mut machine = MachineConfig::parse(&source)
        .and_then(MachineConfig::build)
        .map_err(|err| err.to_string())?;
    debug!(
        "machine ready: {} slots, {} pawls",
        machine.num_rotors(),
        machine.num_pawls()
    );

    let input = match &args.input {
        Some(path) => read_file(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("can't read standard input: {}", err))?;
            buffer
        }
    };

    let output = config::process_lines(&mut machine, &input).map_err(|err| err.to_string())?;

    match &args.output {
        Some(path) => fs::write(path, &output)
            .map_err(|err| format!("can't write {}: {}", path.display(), err))?,
        None => print!("{}", output),
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("can't open {}: {}", path.display(), err))
}
