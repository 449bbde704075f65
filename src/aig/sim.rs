// SPDX-License-Identifier: Apache-2.0

//! Three-valued randomized simulation of an AIG under constraints.
//!
//! Before any round runs, constraint literals are propagated backward
//! through the AND array: a gate asserted true asserts both operands, and a
//! gate asserted false over two input literals becomes a 2-SAT clause. The
//! solved 2-SAT fixes input polarities; its residual implication edges are
//! replayed whenever a random assignment turns an input literal true.
//!
//! Rounds then evaluate every gate with the Kleene table (a gate with an
//! unknown operand stays unknown), discard rounds that violate a
//! constraint, and XOR a fresh 64-bit base into the accumulator of every
//! variable whose literal evaluated to 1. The run stops early when a bad
//! property fires; that is a reported success, not an error.

use std::io::Write;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::aig::model::{AigModel, Literal};
use crate::aig::twosat::TwoSat;
use crate::error::{Result, SweepError};

#[derive(Debug, Clone)]
pub struct AigSimOptions {
    pub seed: u64,
    pub hash_seed: u64,
    pub rounds: i64,
    pub capacity: usize,
    /// Dump every literal's value to the log on successful rounds.
    pub print_var: bool,
    /// Dump per-variable fingerprints to the log after the run.
    pub print_hash: bool,
}

impl Default for AigSimOptions {
    fn default() -> Self {
        AigSimOptions {
            seed: 0,
            hash_seed: 0,
            rounds: 10000,
            capacity: 4,
            print_var: false,
            print_hash: false,
        }
    }
}

#[derive(Debug)]
pub enum AigSimResult {
    Completed {
        successful_rounds: i64,
        candidates: Vec<(u32, u32)>,
        groups: usize,
    },
    /// A bad property fired; the run ends immediately and successfully.
    BadReached { literal: Literal, round: i64 },
}

/// Three-valued per-literal table. Unknown is -1, matching the Kleene
/// semantics: an AND with any unknown operand stays unknown.
struct Table(Vec<i8>);

impl Table {
    fn new(len: usize) -> Table {
        Table(vec![-1; len])
    }

    fn reset(&mut self) {
        self.0.fill(-1);
    }

    fn get(&self, lit: Literal) -> i8 {
        self.0[lit.index()]
    }

    /// Assigns `lit = value` and replays the implication closure: every
    /// 2-SAT edge out of a literal that just became true forces its target
    /// true as well.
    fn assign(&mut self, lit: Literal, value: i8, sat: &TwoSat) -> Result<()> {
        let mut worklist = vec![(lit, value)];
        while let Some((lit, value)) = worklist.pop() {
            if self.0[lit.index()] == value {
                continue;
            }
            if self.0[lit.index()] != -1 {
                return Err(SweepError::SimulationAssertion(format!(
                    "conflicting assignment to literal {lit}"
                )));
            }
            self.0[lit.index()] = value;
            self.0[lit.negate().index()] = value ^ 1;
            let true_lit = if value == 1 { lit } else { lit.negate() };
            for &target in sat.implications(true_lit) {
                worklist.push((Literal(target), 1));
            }
        }
        Ok(())
    }
}

pub struct Preprocessed {
    /// Forced value per literal index, if any.
    pub forced: Vec<Option<bool>>,
    pub sat: TwoSat,
}

/// Backward unit propagation of the constraint literals, then 2-SAT.
pub fn preprocess(model: &AigModel, log: &mut dyn Write) -> Result<Preprocessed> {
    let nlits = model.literal_count();
    let mut tag: Vec<i8> = vec![-1; nlits];
    let mut is_input = vec![false; nlits];
    for input in &model.inputs {
        is_input[input.literal.index()] = true;
        is_input[input.literal.negate().index()] = true;
    }

    let tagged = |tag: &mut Vec<i8>, lit: Literal| -> Result<()> {
        if tag[lit.index()] == 0 {
            return Err(SweepError::ConstraintsUnsatisfiable { literal: lit.0 });
        }
        tag[lit.index()] = 1;
        tag[lit.negate().index()] = 0;
        Ok(())
    };

    for constraint in &model.constraints {
        tagged(&mut tag, constraint.literal)?;
    }

    let mut sat = TwoSat::new(nlits);
    for and in model.ands.iter().rev() {
        match tag[and.lhs.index()] {
            1 => {
                tagged(&mut tag, and.rhs0)?;
                tagged(&mut tag, and.rhs1)?;
            }
            0 if is_input[and.rhs0.index()] && is_input[and.rhs1.index()] => {
                sat.add_clause_not_both(and.rhs0, and.rhs1, log);
            }
            _ => {}
        }
    }

    for input in &model.inputs {
        let lit = input.literal;
        let t = tag[lit.index()];
        if t != -1 {
            // The literal that must stay false gets the self-collapsing
            // edge so the SCC choice pins the other polarity.
            let forbidden = Literal(lit.0 ^ t as u32);
            sat.add_clause_not_both(forbidden, forbidden.negate(), log);
        }
    }

    let chosen = sat.solve()?;
    let mut forced: Vec<Option<bool>> = vec![None; nlits];
    for lit in chosen {
        if forced[lit.index()].is_none() {
            writeln!(
                log,
                "[netsweep-aig-sim] preprocessing: assign var ({}) to 1",
                lit
            )
            .ok();
        }
        forced[lit.index()] = Some(true);
        forced[lit.negate().index()] = Some(false);
    }
    Ok(Preprocessed { forced, sat })
}

pub fn simulate(
    model: &AigModel,
    opts: &AigSimOptions,
    log: &mut dyn Write,
) -> Result<AigSimResult> {
    if !model.outputs.is_empty() {
        return Err(SweepError::UnsupportedConstruct(
            "can not handle outputs".to_string(),
        ));
    }
    let pre = preprocess(model, log)?;
    let mut rng = Xoshiro256StarStar::seed_from_u64(opts.seed);
    let mut hash_rng = Xoshiro256StarStar::seed_from_u64(opts.hash_seed);
    let mut table = Table::new(model.literal_count());
    let mut hvalue = vec![0u64; model.maxvar as usize + 1];
    let mut entropy_warned = false;

    let mut succ = 0i64;
    for round in 1..=opts.rounds {
        table.reset();
        table.assign(Literal::FALSE, 0, &pre.sat)?;
        let mut free_inputs = 0usize;
        for input in &model.inputs {
            let lit = input.literal;
            match pre.forced[lit.index()] {
                Some(value) => table.assign(lit, value as i8, &pre.sat)?,
                None => {
                    free_inputs += 1;
                    table.assign(lit, (rng.next_u32() & 1) as i8, &pre.sat)?;
                }
            }
        }
        if free_inputs <= 32 && !entropy_warned {
            log::warn!(
                "only {free_inputs} free inputs after constraint forcing; traces carry little entropy"
            );
            entropy_warned = true;
        }

        match run_step(model, &mut table)? {
            StepOutcome::Violated => {
                writeln!(log, "[netsweep-aig-sim] constraints violated at time {round}").ok();
                continue;
            }
            StepOutcome::BadReached(literal) => {
                writeln!(log, "[netsweep-aig-sim] reach bad property ({literal})").ok();
                return Ok(AigSimResult::BadReached { literal, round });
            }
            StepOutcome::Ok => {}
        }

        succ += 1;
        let base = (hash_rng.next_u32() as u64) << 32 | hash_rng.next_u32() as u64;
        for var in 1..=model.maxvar {
            let lit = Literal::from_var(var, false);
            if table.get(lit) == 1 {
                hvalue[var as usize] ^= base;
            }
        }
        if opts.print_var {
            writeln!(log, "@{succ}").ok();
            for input in &model.inputs {
                let lit = input.literal;
                writeln!(log, "({}) {} input@{}", lit, table.get(lit), succ).ok();
            }
            writeln!(log, "@{succ}").ok();
            for var in 1..=model.maxvar {
                let lit = Literal::from_var(var, false);
                writeln!(log, "({}) {} var@{}", lit, table.get(lit), succ).ok();
            }
        }
    }

    if opts.print_hash {
        writeln!(log, "$hash value").ok();
        for var in 1..=model.maxvar {
            let lit = Literal::from_var(var, false);
            writeln!(log, "{} ({}) {:X}", var, lit, hvalue[var as usize]).ok();
        }
    }
    writeln!(
        log,
        "[netsweep-aig-sim] successful simulation: {}/{}",
        succ, opts.rounds
    )
    .ok();

    let (candidates, groups) = collect_candidates(model, &hvalue, opts.capacity);
    Ok(AigSimResult::Completed {
        successful_rounds: succ,
        candidates,
        groups,
    })
}

enum StepOutcome {
    Ok,
    Violated,
    BadReached(Literal),
}

/// One forward pass over the AND array plus the property checks.
fn run_step(model: &AigModel, table: &mut Table) -> Result<StepOutcome> {
    for and in &model.ands {
        let v0 = table.get(and.rhs0);
        let v1 = table.get(and.rhs1);
        if v0 == -1 || v1 == -1 {
            continue;
        }
        let res = v0 & v1;
        for (lit, value) in [(and.lhs, res), (and.lhs.negate(), res ^ 1)] {
            let existing = table.0[lit.index()];
            if existing != -1 && existing != value {
                return Err(SweepError::SimulationAssertion(format!(
                    "gate {} evaluated inconsistently",
                    lit
                )));
            }
            table.0[lit.index()] = value;
        }
    }
    for constraint in &model.constraints {
        let value = table.get(constraint.literal);
        if value == -1 {
            return Err(SweepError::SimulationAssertion(format!(
                "constraint literal {} undefined after evaluation",
                constraint.literal
            )));
        }
        if value == 0 {
            return Ok(StepOutcome::Violated);
        }
    }
    for bad in &model.bads {
        let value = table.get(bad.literal);
        if value == -1 {
            return Err(SweepError::SimulationAssertion(format!(
                "bad literal {} undefined after evaluation",
                bad.literal
            )));
        }
        if value == 1 {
            return Ok(StepOutcome::BadReached(bad.literal));
        }
    }
    Ok(StepOutcome::Ok)
}

/// Sorts (fingerprint, variable) entries and emits every pair inside a
/// group of size in (1, capacity].
fn collect_candidates(
    model: &AigModel,
    hvalue: &[u64],
    capacity: usize,
) -> (Vec<(u32, u32)>, usize) {
    let mut entries: Vec<(u64, u32)> = (1..=model.maxvar)
        .map(|v| (hvalue[v as usize], v))
        .collect();
    entries.sort_unstable();

    let mut groups = 0usize;
    let mut candidates = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let mut j = i;
        while j + 1 < entries.len() && entries[j + 1].0 == entries[i].0 {
            j += 1;
        }
        let size = j - i + 1;
        if size > 1 && size <= capacity {
            for x in i..=j {
                for y in x + 1..=j {
                    candidates.push((entries[x].1, entries[y].1));
                }
            }
            groups += 1;
        }
        i = j + 1;
    }
    (candidates, groups)
}
