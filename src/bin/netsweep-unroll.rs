// SPDX-License-Identifier: Apache-2.0

//! Unrolls a sequential word-level model into a combinational one covering
//! time steps 0..=depth.

use clap::Parser;

use netsweep::io_util::{die, open_input, open_output, parse_cli};
use netsweep::word::parse::parse_netlist;
use netsweep::word::unroll::unroll;

#[derive(Parser, Debug)]
#[command(name = "netsweep-unroll")]
#[command(about = "Expand a sequential model over a fixed number of time steps")]
struct Cli {
    /// Number of expansion layers beyond time step 0.
    #[arg(short = 'e', long = "expand", value_name = "N", default_value_t = 20)]
    expand: i64,
    /// Load the model from this path instead of stdin.
    #[arg(long = "model", value_name = "PATH")]
    model: Option<String>,
    /// Write the unrolled model to this path instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let input = open_input(cli.model.as_deref())?;
    let netlist = parse_netlist(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    let mut out = open_output(cli.output.as_deref())?;
    unroll(&mut out, &netlist, cli.expand)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-unroll", &e);
    }
}
