// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the sweeping pipeline.
//!
//! Every fatal condition a tool can hit maps onto one of these variants;
//! binaries print the rendered message to stderr and exit 1. Per-round
//! constraint violations during simulation are *not* errors (they are
//! counted and the round's fingerprint contribution is discarded), and a
//! reached bad property in the AIG simulator is a reported success.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// Bad command line: unknown flag, missing argument, out-of-range value.
    #[error("{0}")]
    Usage(String),

    /// An input/output path could not be opened.
    #[error("failed to open '{path}' for {dir}: {source}")]
    Io {
        path: String,
        dir: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The model file was rejected by the reader.
    #[error("parse error in '{path}' at line {line}: {msg}")]
    Parse {
        path: String,
        line: u64,
        msg: String,
    },

    /// A construct the pipeline refuses to process (latches, outputs where
    /// forbidden, liveness properties, unknown operators).
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// 2-SAT preprocessing placed some literal and its negation in the same
    /// strongly connected component.
    #[error("constraints unsatisfiable: literal {literal} and its negation are in one implication cycle")]
    ConstraintsUnsatisfiable { literal: u32 },

    /// An operand had an unexpected sort mid-simulation. Internal bug.
    #[error("simulation assertion violated: {0}")]
    SimulationAssertion(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;

impl SweepError {
    pub fn parse(path: &str, line: u64, msg: impl Into<String>) -> SweepError {
        SweepError::Parse {
            path: path.to_string(),
            line,
            msg: msg.into(),
        }
    }
}
