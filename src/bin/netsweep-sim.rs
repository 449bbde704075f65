// SPDX-License-Identifier: Apache-2.0

//! Randomized constrained simulation of a word-level netlist; emits
//! candidate-equivalent node pairs discovered by fingerprint grouping.

use std::io::Write;

use clap::Parser;

use netsweep::io_util::{die, open_input, open_log, open_output, parse_cli};
use netsweep::word::parse::parse_netlist;
use netsweep::word::sim::{simulate, SimOptions};

#[derive(Parser, Debug)]
#[command(name = "netsweep-sim", disable_help_flag = true)]
#[command(about = "Propose equivalent word-level signals via random simulation")]
struct Cli {
    /// Random seed for state and input values.
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,
    /// Random seed for the fingerprint hash bases.
    #[arg(short = 'h', long = "hash-seed", default_value_t = 0)]
    hash_seed: u64,
    /// Discard fingerprint groups larger than this.
    #[arg(short = 'c', long = "capacity", default_value_t = 4)]
    capacity: usize,
    /// Number of random rounds to run.
    #[arg(short = 'r', long = "rounds", default_value_t = 10000)]
    rounds: i64,
    /// Print state values to the log on every successful round.
    #[arg(long = "states")]
    states: bool,
    /// Print per-node fingerprints to the log after the run.
    #[arg(long = "hash")]
    hash: bool,
    /// Check all nodes for equivalence instead of unrolled states only.
    #[arg(long = "check-all")]
    check_all: bool,
    /// Load the model from this path instead of stdin.
    #[arg(long = "model", value_name = "PATH")]
    model: Option<String>,
    /// Write candidate pairs to this path instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<String>,
    /// Write the simulation trace log to this path instead of stderr.
    #[arg(long = "log", value_name = "PATH")]
    log: Option<String>,
    /// Print this command line option summary.
    #[arg(long = "help", action = clap::ArgAction::Help)]
    help: Option<bool>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let input = open_input(cli.model.as_deref())?;
    let netlist = parse_netlist(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    let mut log = open_log(cli.log.as_deref())?;
    let opts = SimOptions {
        seed: cli.seed,
        hash_seed: cli.hash_seed,
        rounds: cli.rounds,
        capacity: cli.capacity,
        check_all: cli.check_all,
        print_states: cli.states,
        print_hash: cli.hash,
    };
    let outcome = simulate(&netlist, &opts, &mut log)?;
    let mut out = open_output(cli.output.as_deref())?;
    for (x, y) in &outcome.candidates {
        writeln!(out, "{x} {y}")?;
    }
    println!(
        "candidate: {}\ngroup: {}",
        outcome.candidates.len(),
        outcome.groups
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-sim", &e);
    }
}
