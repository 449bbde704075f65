// SPDX-License-Identifier: Apache-2.0

//! Removes constraints whose cones involve sequential state, together with
//! the nodes that existed only to feed them.

use clap::Parser;

use netsweep::io_util::{die, open_input, open_output, parse_cli};
use netsweep::word::eliminate::eliminate;
use netsweep::word::netlist::write_netlist;
use netsweep::word::parse::parse_netlist;

#[derive(Parser, Debug)]
#[command(name = "netsweep-eliminate")]
#[command(about = "Eliminate state-dependent constraints from a netlist")]
struct Cli {
    /// Load the model from this path instead of stdin.
    #[arg(long = "model", value_name = "PATH")]
    model: Option<String>,
    /// Write the reduced model to this path instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let input = open_input(cli.model.as_deref())?;
    let mut netlist = parse_netlist(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    let stats = eliminate(&mut netlist);
    let mut out = open_output(cli.output.as_deref())?;
    write_netlist(&mut out, &netlist)?;
    println!(
        "eliminated state: {}/{}",
        stats.eliminated_states, stats.total_states
    );
    println!(
        "eliminated node: {}/{}",
        stats.eliminated_nodes, stats.total_nodes
    );
    println!(
        "eliminated constraints: {}/{}",
        stats.eliminated_constraints, stats.total_constraints
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-eliminate", &e);
    }
}
