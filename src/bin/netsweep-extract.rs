// SPDX-License-Identifier: Apache-2.0

//! Cone-of-influence extraction from designated key nodes of a word-level
//! netlist, appending pairwise "differ" bad properties.

use clap::Parser;

use netsweep::error::SweepError;
use netsweep::io_util::{die, open_input, open_output, parse_cli};
use netsweep::word::extract::extract;
use netsweep::word::netlist::write_netlist;
use netsweep::word::parse::parse_netlist;

#[derive(Parser, Debug)]
#[command(name = "netsweep-extract")]
#[command(about = "Extract the cone of influence of the given key nodes")]
struct Cli {
    /// Key node ids, terminated by the sentinel 0.
    #[arg(long = "node", value_name = "ID", num_args = 1.., allow_negative_numbers = false)]
    node: Vec<i64>,
    /// Load the model from this path instead of stdin.
    #[arg(long = "model", value_name = "PATH")]
    model: Option<String>,
    /// Write the extracted model to this path instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if !cli.node.contains(&0) {
        return Err(SweepError::Usage(
            "argument to '--node' must end with the sentinel 0".to_string(),
        )
        .into());
    }
    let keys: Vec<i64> = cli.node.iter().take_while(|&&v| v != 0).copied().collect();
    let input = open_input(cli.model.as_deref())?;
    let mut netlist = parse_netlist(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    let stats = extract(&mut netlist, &keys)?;
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
        die("netsweep-extract", &e);
    }
}
