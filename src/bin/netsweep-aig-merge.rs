// SPDX-License-Identifier: Apache-2.0

//! Applies an equivalence list to an AIG, collapsing merged variables onto
//! their smallest representative; writes reencoded binary AIGER.

use clap::Parser;

use netsweep::aig::merge::merge;
use netsweep::aig::model::{read_auto, write_binary};
use netsweep::error::SweepError;
use netsweep::io_util::{die, open_input, open_output, parse_cli};
use netsweep::word::merge::parse_equiv_list;

#[derive(Parser, Debug)]
#[command(name = "netsweep-aig-merge")]
#[command(about = "Merge AIG variables asserted equivalent by a list")]
struct Cli {
    /// Equivalence list: whitespace-separated variable pairs.
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
    let pairs: Vec<(u32, u32)> = parse_equiv_list(list_input, &cli.list)?
        .into_iter()
        .map(|(x, y)| {
            if x < 0 || y < 0 {
                Err(SweepError::Usage(format!(
                    "negative variable in equivalence pair ({x}, {y})"
                )))
            } else {
                Ok((x as u32, y as u32))
            }
        })
        .collect::<Result<_, _>>()?;
    let input = open_input(cli.model.as_deref())?;
    let mut model = read_auto(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    model.reencode()?;
    let merged = merge(&model, &pairs)?;
    let mut out = open_output(cli.output.as_deref())?;
    write_binary(&mut out, &merged)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-aig-merge", &e);
    }
}
