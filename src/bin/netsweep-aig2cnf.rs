// SPDX-License-Identifier: Apache-2.0

//! Tseitin-encodes an AIG into DIMACS CNF.

use clap::Parser;

use netsweep::aig::cnf::{encode, write_dimacs};
use netsweep::aig::model::read_auto;
use netsweep::io_util::{die, open_input, open_output, parse_cli};

#[derive(Parser, Debug)]
#[command(name = "netsweep-aig2cnf")]
#[command(about = "Convert an AIG into CNF in DIMACS format")]
struct Cli {
    /// Emit `c <aig-lit> -> <cnf-var>` mapping comments before the header.
    #[arg(short = 'm', long = "map")]
    map: bool,
    /// Emit the simplified encoding (clauses only for referenced phases).
    #[arg(short = 'g', long = "simplified")]
    simplified: bool,
    /// Load the model from this path instead of stdin.
    #[arg(long = "model", value_name = "PATH")]
    model: Option<String>,
    /// Write the CNF to this path instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let input = open_input(cli.model.as_deref())?;
    let mut model = read_auto(input, cli.model.as_deref().unwrap_or("<stdin>"))?;
    model.reencode()?;
    let cnf = encode(&model, cli.simplified);
    let mut out = open_output(cli.output.as_deref())?;
    write_dimacs(&mut out, &cnf, cli.map)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let cli: Cli = parse_cli();
    if let Err(e) = run(&cli) {
        die("netsweep-aig2cnf", &e);
    }
}
