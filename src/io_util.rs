// SPDX-License-Identifier: Apache-2.0

//! Stream plumbing shared by the command-line tools.
//!
//! Every tool reads one model, writes one result and optionally writes a
//! log; a missing path selects the corresponding standard stream.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use crate::error::SweepError;

/// Opens `path` for reading, or stdin when absent.
pub fn open_input(path: Option<&str>) -> Result<Box<dyn Read>, SweepError> {
    match path {
        Some(p) => {
            let f = File::open(p).map_err(|e| SweepError::Io {
                path: p.to_string(),
                dir: "reading",
                source: e,
            })?;
            Ok(Box::new(BufReader::new(f)))
        }
        None => Ok(Box::new(io::stdin())),
    }
}

/// Opens `path` for writing, or stdout when absent.
pub fn open_output(path: Option<&str>) -> Result<Box<dyn Write>, SweepError> {
    match path {
        Some(p) => {
            let f = File::create(p).map_err(|e| SweepError::Io {
                path: p.to_string(),
                dir: "writing",
                source: e,
            })?;
            Ok(Box::new(BufWriter::new(f)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Opens `path` for writing, or stderr when absent. Used for the per-round
/// simulation trace log.
pub fn open_log(path: Option<&str>) -> Result<Box<dyn Write>, SweepError> {
    match path {
        Some(p) => {
            let f = File::create(p).map_err(|e| SweepError::Io {
                path: p.to_string(),
                dir: "writing",
                source: e,
            })?;
            Ok(Box::new(BufWriter::new(f)))
        }
        None => Ok(Box::new(io::stderr())),
    }
}

/// Parses the command line, mapping clap's failure onto the pipeline's
/// uniform "diagnostic on stderr, exit 1" contract.
pub fn parse_cli<T: clap::Parser>() -> T {
    match T::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders --help/--version through the same error path;
            // those still exit 1 like the original tools' usage dumps.
            eprint!("{}", e.render());
            std::process::exit(1);
        }
    }
}

/// Reports a fatal error for tool `name` and exits 1.
pub fn die(name: &str, err: &dyn std::fmt::Display) -> ! {
    eprintln!("*** '{}' error: {}", name, err);
    std::process::exit(1);
}
