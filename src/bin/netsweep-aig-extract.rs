// SPDX-License-Identifier: Apache-2.0

//! AIG variant of key-node extraction: builds pairwise "differ" miters as
//! new bad properties and writes the reencoded model in binary AIGER.

use clap::Parser;

use netsweep::aig::extract::extract;
use netsweep::aig::model::{read_auto, write_binary};
use netsweep::error::SweepError;
use netsweep::io_util::{die, open_input, open_output, parse_cli};

#[derive(Parser, Debug)]
#[command(name = "netsweep-aig-extract")]
#[command(about = "Extract an AIG around the given key variables")]
struct Cli {
    /// Key variables, terminated by the sentinel 0.
    #[arg(long = "node", value_name = "VAR", num_args = 1..)]
    node: Vec<u32>,
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
    let keys: Vec<u32> = cli.node.iter().take_while(|&&v| v != 0).copied().collect();
    let input = open_input(cli.model.as_deref())?;
    let mut model = read_auto(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    model.reencode()?;
    let extracted = extract(&model, &keys)?;
    let mut out = open_output(cli.output.as_deref())?;
    write_binary(&mut out, &extracted)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-aig-extract", &e);
    }
}
