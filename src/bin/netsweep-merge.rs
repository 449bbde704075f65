// SPDX-License-Identifier: Apache-2.0

//! Applies an equivalence list to a word-level netlist, collapsing merged
//! nodes onto their smallest representative.

use clap::Parser;

use netsweep::io_util::{die, open_input, open_output, parse_cli};
use netsweep::word::merge::{merge, parse_equiv_list};
use netsweep::word::netlist::write_netlist;
use netsweep::word::parse::parse_netlist;

#[derive(Parser, Debug)]
#[command(name = "netsweep-merge")]
#[command(about = "Merge word-level nodes asserted equivalent by a list")]
struct Cli {
    /// Equivalence list: whitespace-separated node id pairs.
    #[arg(long = "list", value_name = "PATH")]
    list: String,
    /// Load the model from this path instead of stdin.
    #[arg(long = "model", value_name = "PATH")]
    model: Option<String>,
    /// Write the merged model to this path instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let list_input = open_input(Some(&cli.list))?;
    let pairs = parse_equiv_list(list_input, &cli.list)?;
    let input = open_input(cli.model.as_deref())?;
    let mut netlist = parse_netlist(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    let stats = merge(&mut netlist, &pairs)?;
    let mut out = open_output(cli.output.as_deref())?;
    write_netlist(&mut out, &netlist)?;
    println!(
        "node: {}, state: {}, bad: {}, constraint: {}",
        stats.nodes, stats.states, stats.bads, stats.constraints
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-merge", &e);
    }
}
