// SPDX-License-Identifier: Apache-2.0

//! Randomized constrained simulation of an AIG; emits candidate-equivalent
//! variable pairs. Exits successfully as soon as a bad property fires.

use std::io::Write;

use clap::Parser;

use netsweep::aig::model::read_auto;
use netsweep::aig::sim::{simulate, AigSimOptions, AigSimResult};
use netsweep::io_util::{die, open_input, open_log, open_output, parse_cli};

#[derive(Parser, Debug)]
#[command(name = "netsweep-aig-sim", disable_help_flag = true)]
#[command(about = "Propose equivalent AIG variables via random simulation")]
struct Cli {
    /// Random seed for input values.
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
    /// Print literal values to the log on every successful round.
    #[arg(long = "var")]
    var: bool,
    /// Print per-variable fingerprints to the log after the run.
    #[arg(long = "hash")]
    hash: bool,
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
    let mut model = read_auto(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    model.reencode()?;
    let mut log = open_log(cli.log.as_deref())?;
    let opts = AigSimOptions {
        seed: cli.seed,
        hash_seed: cli.hash_seed,
        rounds: cli.rounds,
        capacity: cli.capacity,
        print_var: cli.var,
        print_hash: cli.hash,
    };
    match simulate(&model, &opts, &mut log)? {
        AigSimResult::BadReached { .. } => {}
        AigSimResult::Completed {
            candidates, groups, ..
        } => {
            let mut out = open_output(cli.output.as_deref())?;
            for (x, y) in &candidates {
                writeln!(out, "{x} {y}")?;
            }
            println!(
                "candidate: {}/{} ({:.3})\ngroup: {}",
                candidates.len(),
                model.maxvar,
                candidates.len() as f64 / model.maxvar.max(1) as f64,
                groups
            );
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-aig-sim", &e);
    }
}
