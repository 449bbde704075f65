// SPDX-License-Identifier: Apache-2.0

//! Randomized simulation of a word-level netlist under constraints.
//!
//! The engine runs independent rounds. Each round initializes states (init
//! expression or fresh randomness), initializes inputs (fixed slot or fresh
//! randomness), evaluates every remaining node in id order, checks the
//! constraints, then folds every defined bit-vector value into a 128-bit
//! per-node fingerprint accumulator. Rounds that violate a constraint are
//! reported and contribute nothing. Round 0 is a warm-up: it only produces
//! the concrete values constraint resolution needs to pin inputs.

use std::collections::{BTreeSet, HashMap};
use std::io::Write;

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::bv::BitVec;
use crate::error::{Result, SweepError};
use crate::value::{ArrayModel, SimValue};
use crate::word::netlist::{parse_unrolled_symbol, Netlist, Node, Tag, UnrollRole};

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub seed: u64,
    pub hash_seed: u64,
    pub rounds: i64,
    pub capacity: usize,
    /// Key every node by fingerprint instead of only unrolled states.
    pub check_all: bool,
    /// Dump unrolled-state values to the log on every successful round.
    pub print_states: bool,
    /// Dump per-node fingerprints to the log after the run.
    pub print_hash: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions {
            seed: 0,
            hash_seed: 0,
            rounds: 10000,
            capacity: 4,
            check_all: false,
            print_states: false,
            print_hash: false,
        }
    }
}

#[derive(Debug)]
pub struct SimOutcome {
    pub successful_rounds: i64,
    /// Per bad property: the first round it fired, or -1.
    pub reached_bads: Vec<i64>,
    /// Candidate equivalent pairs, ascending.
    pub candidates: Vec<(i64, i64)>,
    /// Number of non-singleton fingerprint groups within capacity.
    pub groups: usize,
}

struct SimContext<'a> {
    netlist: &'a Netlist,
    values: Vec<Option<SimValue>>,
    hash: Vec<(u64, u64)>,
    fixed_inputs: HashMap<i64, BitVec>,
    rng: Xoshiro256StarStar,
    base_rng: Xoshiro256StarStar,
    inputs: Vec<i64>,
    states: Vec<i64>,
    bads: Vec<i64>,
    constraints: Vec<i64>,
    reached_bads: Vec<i64>,
    num_unreached_bads: usize,
    /// Nodes carrying an unrolled-state symbol: (node id, original id).
    unrolled_states: Vec<(i64, i64)>,
}

/// Simulates `netlist` and returns the discovered candidate pairs. The
/// structured per-round trace goes to `log`.
pub fn simulate(
    netlist: &Netlist,
    opts: &SimOptions,
    log: &mut dyn Write,
) -> Result<SimOutcome> {
    let n = netlist.max_id() as usize + 1;
    let mut ctx = SimContext {
        netlist,
        values: vec![None; n],
        hash: vec![(0, 0); n],
        fixed_inputs: HashMap::new(),
        rng: Xoshiro256StarStar::seed_from_u64(opts.seed),
        base_rng: Xoshiro256StarStar::seed_from_u64(opts.hash_seed),
        inputs: Vec::new(),
        states: Vec::new(),
        bads: Vec::new(),
        constraints: Vec::new(),
        reached_bads: Vec::new(),
        num_unreached_bads: 0,
        unrolled_states: Vec::new(),
    };
    for node in netlist.iter() {
        match node.tag {
            Tag::Input => ctx.inputs.push(node.id),
            Tag::State => ctx.states.push(node.id),
            Tag::Bad => {
                ctx.bads.push(node.id);
                ctx.reached_bads.push(-1);
                ctx.num_unreached_bads += 1;
            }
            Tag::Constraint => ctx.constraints.push(node.id),
            _ => {}
        }
        if let Some(symbol) = &node.symbol {
            if let Some((UnrollRole::State, orig_id, _time)) = parse_unrolled_symbol(symbol) {
                ctx.unrolled_states.push((node.id, orig_id));
            }
        }
    }

    // Warm-up round: evaluate once under randomization so constraint
    // resolution can read concrete values; no checks, no fingerprints.
    ctx.run_round(0, log)?;
    ctx.resolve_constraints(log)?;
    ctx.reset_values();

    let mut succ = 0i64;
    for step in 1..=opts.rounds {
        if !ctx.bads.is_empty() && ctx.num_unreached_bads == 0 {
            break;
        }
        let base1 = ctx.base_rng.next_u32() as u64;
        let base2 = ctx.base_rng.next_u32() as u64;
        if ctx.run_round(step, log)? {
            succ += 1;
            writeln!(log, "[netsweep-sim] constraints satisfied at time {step}").ok();
            ctx.fold_fingerprints(base1, base2);
            writeln!(log, "@{succ}").ok();
            for (pos, &input) in ctx.inputs.iter().enumerate() {
                ctx.log_value(log, input, pos as i64, succ, true);
            }
            if opts.print_states {
                writeln!(log, "#{succ}").ok();
                for (pos, &(node_id, _)) in ctx.unrolled_states.iter().enumerate() {
                    ctx.log_value(log, node_id, pos as i64, succ, false);
                }
            }
        } else {
            writeln!(log, "[netsweep-sim] constraints violated at time {step}").ok();
        }
        if step < opts.rounds {
            ctx.reset_values();
        }
    }

    if opts.print_hash {
        writeln!(log, "$hash value").ok();
        for id in 1..=netlist.max_id() {
            if !matches!(ctx.values[id as usize], Some(SimValue::BitVec(_))) {
                continue;
            }
            let (h1, h2) = ctx.hash[id as usize];
            match netlist.get(id).and_then(|n| n.symbol.as_deref()) {
                Some(sym) => writeln!(log, "{id} {sym} {h1:X},{h2:X}").ok(),
                None => writeln!(log, "{id} {h1:X},{h2:X}").ok(),
            };
        }
    }
    ctx.report(log);
    writeln!(
        log,
        "[netsweep-sim] successful simulation: {}/{}",
        succ, opts.rounds
    )
    .ok();

    let (candidates, groups) = ctx.collect_candidates(opts);
    Ok(SimOutcome {
        successful_rounds: succ,
        reached_bads: ctx.reached_bads,
        candidates,
        groups,
    })
}

impl<'a> SimContext<'a> {
    fn reset_values(&mut self) {
        for slot in self.values.iter_mut() {
            *slot = None;
        }
    }

    fn node(&self, id: i64) -> Result<&'a Node> {
        self.netlist.get(id).ok_or_else(|| {
            SweepError::SimulationAssertion(format!("reference to missing node {id}"))
        })
    }

    fn width_of(&self, node: &Node) -> Result<u32> {
        self.netlist.bitvec_width(node.sort).ok_or_else(|| {
            SweepError::SimulationAssertion(format!(
                "node {} expected a bit-vector sort",
                node.id
            ))
        })
    }

    /// Evaluates `id` (signed reference) with memoization, iteratively.
    fn eval(&mut self, id: i64) -> Result<SimValue> {
        let target = id.unsigned_abs() as i64;
        let mut stack = vec![target];
        while let Some(&top) = stack.last() {
            if self.values[top as usize].is_some() {
                stack.pop();
                continue;
            }
            let node = self.node(top)?;
            let mut missing = false;
            for &arg in &node.args {
                let a = arg.unsigned_abs() as i64;
                if self.values[a as usize].is_none() {
                    // Inputs and states must have been initialized; anything
                    // else undefined here is an operand to compute first.
                    if matches!(self.node(a)?.tag, Tag::Input | Tag::State) {
                        return Err(SweepError::SimulationAssertion(format!(
                            "uninitialized {} {} referenced by node {}",
                            self.node(a)?.tag.name(),
                            a,
                            top
                        )));
                    }
                    stack.push(a);
                    missing = true;
                }
            }
            if missing {
                continue;
            }
            let value = self.eval_node(node)?;
            self.values[top as usize] = Some(value);
            stack.pop();
        }
        let value = self.values[target as usize]
            .clone()
            .expect("evaluation loop filled the target slot");
        if id < 0 {
            match value {
                SimValue::BitVec(bv) => Ok(SimValue::BitVec(bv.not())),
                SimValue::Array(_) => Err(SweepError::SimulationAssertion(format!(
                    "negated reference to array node {target}"
                ))),
            }
        } else {
            Ok(value)
        }
    }

    /// Signed-reference bit-vector lookup; all operands must be evaluated.
    fn arg_bv(&self, node: &Node, i: usize) -> Result<BitVec> {
        let arg = node.args[i];
        let slot = self.values[arg.unsigned_abs() as usize].as_ref();
        match slot.and_then(|v| v.as_bv()) {
            Some(bv) => Ok(if arg < 0 { bv.not() } else { bv.clone() }),
            None => Err(SweepError::SimulationAssertion(format!(
                "operand {} of node {} is not a bit-vector",
                arg, node.id
            ))),
        }
    }

    fn arg_array(&self, node: &Node, i: usize) -> Result<ArrayModel> {
        let arg = node.args[i];
        if arg < 0 {
            return Err(SweepError::SimulationAssertion(format!(
                "negated array operand {} of node {}",
                arg, node.id
            )));
        }
        let slot = self.values[arg as usize].as_ref();
        match slot.and_then(|v| v.as_array()) {
            Some(am) => Ok(am.clone()),
            None => Err(SweepError::SimulationAssertion(format!(
                "operand {} of node {} is not an array",
                arg, node.id
            ))),
        }
    }

    fn eval_node(&self, node: &Node) -> Result<SimValue> {
        use Tag::*;
        let bv = |value: BitVec| Ok(SimValue::BitVec(value));
        match node.tag {
            Const | Constd | Consth => {
                let width = self.width_of(node)?;
                let payload = node.constant.as_deref().unwrap_or("0");
                let parsed = match node.tag {
                    Const => BitVec::from_binary_str(payload, width),
                    Constd => BitVec::from_decimal_str(payload, width),
                    _ => BitVec::from_hex_str(payload, width),
                };
                parsed.map(SimValue::BitVec).ok_or_else(|| {
                    SweepError::SimulationAssertion(format!(
                        "constant payload of node {} does not fit",
                        node.id
                    ))
                })
            }
            Zero => Ok(SimValue::BitVec(BitVec::zero(self.width_of(node)?))),
            One => Ok(SimValue::BitVec(BitVec::one(self.width_of(node)?))),
            Ones => Ok(SimValue::BitVec(BitVec::ones(self.width_of(node)?))),
            Not => bv(self.arg_bv(node, 0)?.not()),
            Inc => bv(self.arg_bv(node, 0)?.inc()),
            Dec => bv(self.arg_bv(node, 0)?.dec()),
            Neg => bv(self.arg_bv(node, 0)?.neg()),
            Redand => bv(self.arg_bv(node, 0)?.redand()),
            Redor => bv(self.arg_bv(node, 0)?.redor()),
            Redxor => bv(self.arg_bv(node, 0)?.redxor()),
            Add => bv(self.arg_bv(node, 0)?.add(&self.arg_bv(node, 1)?)),
            Sub => bv(self.arg_bv(node, 0)?.sub(&self.arg_bv(node, 1)?)),
            Mul => bv(self.arg_bv(node, 0)?.mul(&self.arg_bv(node, 1)?)),
            Udiv => bv(self.arg_bv(node, 0)?.udiv(&self.arg_bv(node, 1)?)),
            Sdiv => bv(self.arg_bv(node, 0)?.sdiv(&self.arg_bv(node, 1)?)),
            Urem => bv(self.arg_bv(node, 0)?.urem(&self.arg_bv(node, 1)?)),
            Srem => bv(self.arg_bv(node, 0)?.srem(&self.arg_bv(node, 1)?)),
            And => bv(self.arg_bv(node, 0)?.and(&self.arg_bv(node, 1)?)),
            Or => bv(self.arg_bv(node, 0)?.or(&self.arg_bv(node, 1)?)),
            Xor => bv(self.arg_bv(node, 0)?.xor(&self.arg_bv(node, 1)?)),
            Nand => bv(self.arg_bv(node, 0)?.nand(&self.arg_bv(node, 1)?)),
            Nor => bv(self.arg_bv(node, 0)?.nor(&self.arg_bv(node, 1)?)),
            Xnor | Iff => bv(self.arg_bv(node, 0)?.xnor(&self.arg_bv(node, 1)?)),
            Implies => bv(self.arg_bv(node, 0)?.implies(&self.arg_bv(node, 1)?)),
            Concat => bv(self.arg_bv(node, 0)?.concat(&self.arg_bv(node, 1)?)),
            Sll => bv(self.arg_bv(node, 0)?.sll(&self.arg_bv(node, 1)?)),
            Srl => bv(self.arg_bv(node, 0)?.srl(&self.arg_bv(node, 1)?)),
            Sra => bv(self.arg_bv(node, 0)?.sra(&self.arg_bv(node, 1)?)),
            Ult => bv(self.arg_bv(node, 0)?.ult(&self.arg_bv(node, 1)?)),
            Ulte => bv(self.arg_bv(node, 0)?.ulte(&self.arg_bv(node, 1)?)),
            Slt => bv(self.arg_bv(node, 0)?.slt(&self.arg_bv(node, 1)?)),
            Slte => bv(self.arg_bv(node, 0)?.slte(&self.arg_bv(node, 1)?)),
            // Greater-than duals evaluate by operand swap.
            Ugt => bv(self.arg_bv(node, 1)?.ult(&self.arg_bv(node, 0)?)),
            Ugte => bv(self.arg_bv(node, 1)?.ulte(&self.arg_bv(node, 0)?)),
            Sgt => bv(self.arg_bv(node, 1)?.slt(&self.arg_bv(node, 0)?)),
            Sgte => bv(self.arg_bv(node, 1)?.slte(&self.arg_bv(node, 0)?)),
            Slice => {
                let a = self.arg_bv(node, 0)?;
                bv(a.slice(node.imm[0] as u32, node.imm[1] as u32))
            }
            Uext | Sext => {
                let a = self.arg_bv(node, 0)?;
                let width = self.width_of(node)?;
                let padding = width - a.width();
                bv(if node.tag == Uext {
                    a.uext(padding)
                } else {
                    a.sext(padding)
                })
            }
            Eq | Neq => {
                let lhs = node.args[0].unsigned_abs() as i64;
                let value = if self.values[lhs as usize]
                    .as_ref()
                    .is_some_and(|v| v.as_array().is_some())
                {
                    let a = self.arg_array(node, 0)?;
                    let b = self.arg_array(node, 1)?;
                    if node.tag == Eq {
                        a.eq(&b)
                    } else {
                        a.neq(&b)
                    }
                } else {
                    let a = self.arg_bv(node, 0)?;
                    let b = self.arg_bv(node, 1)?;
                    if node.tag == Eq {
                        a.eq(&b)
                    } else {
                        a.neq(&b)
                    }
                };
                Ok(SimValue::BitVec(value))
            }
            Ite => {
                let cond = self.arg_bv(node, 0)?;
                if self.netlist.array_sort(node.sort).is_some() {
                    let t = self.arg_array(node, 1)?;
                    let e = self.arg_array(node, 2)?;
                    Ok(SimValue::Array(ArrayModel::ite(&cond, &t, &e)))
                } else {
                    let t = self.arg_bv(node, 1)?;
                    let e = self.arg_bv(node, 2)?;
                    Ok(SimValue::BitVec(BitVec::ite(&cond, &t, &e)))
                }
            }
            Read => {
                let am = self.arg_array(node, 0)?;
                let index = self.arg_bv(node, 1)?;
                Ok(SimValue::BitVec(am.read(&index)))
            }
            Write => {
                let am = self.arg_array(node, 0)?;
                let index = self.arg_bv(node, 1)?;
                let element = self.arg_bv(node, 2)?;
                Ok(SimValue::Array(am.write(&index, &element)))
            }
            Sort | Input | State | Init | Next | Bad | Constraint | Output => {
                Err(SweepError::SimulationAssertion(format!(
                    "cannot randomly simulate operator '{}' at node {}",
                    node.tag.name(),
                    node.id
                )))
            }
        }
    }

    fn fresh_array(&mut self, sort_id: i64, randomize: bool) -> Result<ArrayModel> {
        let (index_sid, element_sid) =
            self.netlist.array_sort(sort_id).ok_or_else(|| {
                SweepError::SimulationAssertion(format!("sort {sort_id} is not an array sort"))
            })?;
        let iw = self.netlist.bitvec_width(index_sid).unwrap_or(1);
        let ew = self.netlist.bitvec_width(element_sid).unwrap_or(1);
        let mut am = ArrayModel::new(iw, ew);
        if randomize {
            am.random_seed = Some(self.rng.gen());
        }
        Ok(am)
    }

    fn initialize_states(&mut self) -> Result<()> {
        for i in 0..self.states.len() {
            let state_id = self.states[i];
            let state = self.node(state_id)?;
            let init = state.init;
            if self.netlist.array_sort(state.sort).is_some() {
                let value = match init {
                    Some(init_ref) => match self.eval(init_ref)? {
                        SimValue::Array(am) => am,
                        SimValue::BitVec(bv) => {
                            // A scalar init fills the whole array.
                            let mut am = self.fresh_array(state.sort, false)?;
                            am.const_init = Some(bv);
                            am
                        }
                    },
                    None => self.fresh_array(state.sort, true)?,
                };
                self.values[state_id as usize] = Some(SimValue::Array(value));
            } else {
                let value = match init {
                    Some(init_ref) => match self.eval(init_ref)? {
                        SimValue::BitVec(bv) => bv,
                        SimValue::Array(_) => {
                            return Err(SweepError::SimulationAssertion(format!(
                                "init of bit-vector state {state_id} produced an array"
                            )))
                        }
                    },
                    None => {
                        let width = self.width_of(state)?;
                        BitVec::random(&mut self.rng, width)
                    }
                };
                self.values[state_id as usize] = Some(SimValue::BitVec(value));
            }
        }
        Ok(())
    }

    fn initialize_inputs(&mut self) -> Result<()> {
        for i in 0..self.inputs.len() {
            let input_id = self.inputs[i];
            let input = self.node(input_id)?;
            if self.netlist.array_sort(input.sort).is_some() {
                let am = self.fresh_array(input.sort, true)?;
                self.values[input_id as usize] = Some(SimValue::Array(am));
            } else {
                let width = self.width_of(input)?;
                let value = match self.fixed_inputs.get(&input_id) {
                    Some(fixed) => fixed.clone(),
                    None => BitVec::random(&mut self.rng, width),
                };
                self.values[input_id as usize] = Some(SimValue::BitVec(value));
            }
        }
        Ok(())
    }

    /// One round: initialize, evaluate everything, check properties.
    /// Returns whether the round satisfied all constraints (round 0 never
    /// counts).
    fn run_round(&mut self, round: i64, log: &mut dyn Write) -> Result<bool> {
        self.initialize_states()?;
        self.initialize_inputs()?;
        for id in 1..=self.netlist.max_id() {
            let Some(node) = self.netlist.get(id) else {
                continue;
            };
            if node.deleted
                || matches!(
                    node.tag,
                    Tag::Sort | Tag::Init | Tag::Next | Tag::Bad | Tag::Constraint | Tag::Output
                )
            {
                continue;
            }
            self.eval(id)?;
        }
        if round == 0 {
            return Ok(false);
        }

        for i in 0..self.constraints.len() {
            let constraint = self.node(self.constraints[i])?;
            let value = self.signed_value(constraint.args[0])?;
            if value.is_zero() {
                return Ok(false);
            }
        }

        for i in 0..self.bads.len() {
            if self.reached_bads[i] >= 0 {
                continue;
            }
            let bad = self.node(self.bads[i])?;
            let value = self.signed_value(bad.args[0])?;
            if value.is_zero() {
                continue;
            }
            self.reached_bads[i] = round;
            self.num_unreached_bads -= 1;
            if self.num_unreached_bads == 0 {
                writeln!(
                    log,
                    "[netsweep-sim] all {} bad state properties reached",
                    self.bads.len()
                )
                .ok();
            }
        }
        Ok(true)
    }

    fn signed_value(&self, arg: i64) -> Result<BitVec> {
        let slot = self.values[arg.unsigned_abs() as usize].as_ref();
        match slot.and_then(|v| v.as_bv()) {
            Some(bv) => Ok(if arg < 0 { bv.not() } else { bv.clone() }),
            None => Err(SweepError::SimulationAssertion(format!(
                "property argument {arg} has no bit-vector value"
            ))),
        }
    }

    /// Backward constraint propagation over the warm-up values: pins inputs
    /// that a satisfied constraint forces to equal a concrete expression.
    fn resolve_constraints(&mut self, log: &mut dyn Write) -> Result<()> {
        let n = self.netlist.max_id() as usize + 1;
        let mut cons = vec![0i8; n];
        for id in (1..=self.netlist.max_id()).rev() {
            let Some(node) = self.netlist.get(id) else {
                continue;
            };
            match node.tag {
                Tag::Constraint => {
                    let arg = node.args[0];
                    cons[arg.unsigned_abs() as usize] = if arg < 0 { -1 } else { 1 };
                }
                Tag::And => {
                    if cons[id as usize] <= 0 {
                        continue;
                    }
                    for &arg in &node.args {
                        cons[arg.unsigned_abs() as usize] = if arg < 0 { -1 } else { 1 };
                    }
                }
                Tag::Or => {
                    if cons[id as usize] >= 0 {
                        continue;
                    }
                    for &arg in &node.args {
                        cons[arg.unsigned_abs() as usize] = if arg < 0 { 1 } else { -1 };
                    }
                }
                Tag::Eq => {
                    if cons[id as usize] <= 0 {
                        continue;
                    }
                    let (mut p, mut q) = (node.args[0], node.args[1]);
                    let is_input = |r: i64| {
                        self.netlist
                            .get(r.unsigned_abs() as i64)
                            .map(|n| n.tag == Tag::Input)
                            .unwrap_or(false)
                    };
                    if is_input(q) {
                        std::mem::swap(&mut p, &mut q);
                    }
                    if !is_input(p) || is_input(q) {
                        continue;
                    }
                    let q_id = q.unsigned_abs() as i64;
                    let Some(SimValue::BitVec(q_value)) = &self.values[q_id as usize] else {
                        continue;
                    };
                    let negate = (p < 0) != (q < 0);
                    let fixed = if negate { q_value.not() } else { q_value.clone() };
                    let p_id = p.unsigned_abs() as i64;
                    let shown = self
                        .node(p_id)?
                        .symbol
                        .clone()
                        .unwrap_or_else(|| p_id.to_string());
                    writeln!(
                        log,
                        "[netsweep-sim] parse constraints: {} must equal to {}",
                        shown,
                        fixed.to_binary_string()
                    )
                    .ok();
                    self.fixed_inputs.insert(p_id, fixed);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// XORs this round's polynomial hash of every defined bit-vector value
    /// into the per-node accumulators. XOR makes the fingerprint independent
    /// of round order.
    fn fold_fingerprints(&mut self, base1: u64, base2: u64) {
        for id in 1..=self.netlist.max_id() {
            let Some(SimValue::BitVec(bv)) = &self.values[id as usize] else {
                continue;
            };
            let mut val1 = 0u64;
            let mut val2 = 0u64;
            for j in (0..bv.width()).rev() {
                let bit = bv.get_bit(j) as u64 + 1;
                val1 = val1.wrapping_mul(base1).wrapping_add(bit);
                val2 = val2.wrapping_mul(base2).wrapping_add(bit);
            }
            val1 = val1.wrapping_mul(base1);
            val2 = val2.wrapping_mul(base2);
            let slot = &mut self.hash[id as usize];
            slot.0 ^= val1;
            slot.1 ^= val2;
        }
    }

    fn log_value(&self, log: &mut dyn Write, id: i64, pos: i64, step: i64, is_input: bool) {
        let marker = if is_input { "@" } else { "#" };
        let symbol = self.netlist.get(id).and_then(|n| n.symbol.as_deref());
        match &self.values[id as usize] {
            Some(SimValue::BitVec(bv)) => {
                let bits = bv.to_binary_string();
                match symbol {
                    Some(sym) => writeln!(log, "{pos} {bits} {sym}{marker}{step}").ok(),
                    None => writeln!(log, "{pos} {bits}").ok(),
                };
            }
            Some(SimValue::Array(am)) => {
                for (index, element) in &am.data {
                    let bits = element.to_binary_string();
                    match symbol {
                        Some(sym) => {
                            writeln!(log, "{pos} [{index}]{bits} {sym}{marker}{step}").ok()
                        }
                        None => writeln!(log, "{pos} [{index}]{bits}").ok(),
                    };
                }
            }
            None => {}
        }
    }

    fn report(&self, log: &mut dyn Write) {
        if self.num_unreached_bads < self.bads.len() {
            write!(log, "[netsweep-sim] reached bad state properties {{").ok();
            for (i, &r) in self.reached_bads.iter().enumerate() {
                if r >= 0 {
                    write!(log, " b{i}@{r}").ok();
                }
            }
            writeln!(log, " }}").ok();
        } else if !self.bads.is_empty() {
            writeln!(log, "[netsweep-sim] no bad state property reached").ok();
        }
    }

    /// Groups fingerprints and emits candidate pairs for every group whose
    /// member-id set has size in (1, capacity].
    fn collect_candidates(&self, opts: &SimOptions) -> (Vec<(i64, i64)>, usize) {
        let mut entries: Vec<(u64, u64, u32, i64)> = Vec::new();
        if opts.check_all {
            for id in 1..=self.netlist.max_id() {
                if !matches!(self.values[id as usize], Some(SimValue::BitVec(_))) {
                    continue;
                }
                let Some(node) = self.netlist.get(id) else {
                    continue;
                };
                let Some(width) = self.netlist.bitvec_width(node.sort) else {
                    continue;
                };
                let (h1, h2) = self.hash[id as usize];
                entries.push((h1, h2, width, id));
            }
        } else {
            for &(node_id, orig_id) in &self.unrolled_states {
                let Some(node) = self.netlist.get(node_id) else {
                    continue;
                };
                let Some(width) = self.netlist.bitvec_width(node.sort) else {
                    continue;
                };
                let (h1, h2) = self.hash[node_id as usize];
                entries.push((h1, h2, width, orig_id));
            }
        }
        entries.sort_unstable();

        let mut groups = 0usize;
        let mut candidates: BTreeSet<(i64, i64)> = BTreeSet::new();
        let mut i = 0;
        while i < entries.len() {
            let mut j = i;
            while j + 1 < entries.len()
                && entries[j + 1].0 == entries[i].0
                && entries[j + 1].1 == entries[i].1
                && entries[j + 1].2 == entries[i].2
            {
                j += 1;
            }
            let ids: BTreeSet<i64> = entries[i..=j].iter().map(|e| e.3).collect();
            if ids.len() > 1 && ids.len() <= opts.capacity {
                for &x in &ids {
                    for &y in &ids {
                        if x < y {
                            candidates.insert((x, y));
                        }
                    }
                }
                groups += 1;
            }
            i = j + 1;
        }
        (candidates.into_iter().collect(), groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::parse::parse_netlist_str;

    fn run(text: &str, opts: &SimOptions) -> SimOutcome {
        let netlist = parse_netlist_str(text).unwrap();
        let mut log = Vec::new();
        simulate(&netlist, opts, &mut log).unwrap()
    }

    #[test]
    fn redundant_pair_is_discovered() {
        // y = a & b twice, under different node ids; z = a | b as a decoy.
        // The bad property is the pairwise "differ" check the extractor
        // would emit; it never fires for a true redundancy.
        let text = "\
1 sort bitvec 8
2 input 1 a
3 input 1 b
4 and 1 2 3
5 and 1 2 3
6 or 1 2 3
7 sort bitvec 1
8 neq 7 4 5
9 bad 8
";
        let outcome = run(
            text,
            &SimOptions {
                rounds: 64,
                check_all: true,
                ..Default::default()
            },
        );
        assert_eq!(outcome.successful_rounds, 64);
        assert_eq!(outcome.reached_bads, vec![-1]);
        assert!(outcome.candidates.contains(&(4, 5)));
        assert!(!outcome.candidates.contains(&(4, 6)));
        assert!(!outcome.candidates.contains(&(5, 6)));
    }

    #[test]
    fn constraint_violations_do_not_count() {
        // Constraint forces the single input bit to 1; about half of all
        // random rounds violate it.
        let text = "\
1 sort bitvec 1
2 input 1 en
3 constraint 2
4 not 1 2
5 bad 4
";
        let outcome = run(
            text,
            &SimOptions {
                rounds: 200,
                check_all: true,
                ..Default::default()
            },
        );
        assert!(outcome.successful_rounds < 200);
        assert!(outcome.successful_rounds > 0);
        // bad = !en can never fire in a counted round.
        assert_eq!(outcome.reached_bads, vec![-1]);
    }

    #[test]
    fn eq_constraint_fixes_input() {
        // constraint (x == c) pins input x to the constant c in every round:
        // x then fingerprints identically to the constant node.
        let text = "\
1 sort bitvec 8
2 input 1 x
3 constd 1 165
4 sort bitvec 1
5 eq 4 2 3
6 constraint 5
7 ones 1
8 eq 4 2 7
9 bad 8
";
        let outcome = run(
            text,
            &SimOptions {
                rounds: 50,
                check_all: true,
                ..Default::default()
            },
        );
        // Every round satisfies the constraint because x is pinned.
        assert_eq!(outcome.successful_rounds, 50);
        assert!(outcome.candidates.contains(&(2, 3)));
    }

    #[test]
    fn bad_reached_is_recorded() {
        let text = "\
1 sort bitvec 4
2 input 1 x
3 constd 1 7
4 sort bitvec 1
5 ulte 4 2 3
6 bad 5
";
        let outcome = run(
            text,
            &SimOptions {
                rounds: 100,
                check_all: true,
                ..Default::default()
            },
        );
        assert!(outcome.reached_bads[0] >= 1);
    }

    #[test]
    fn capacity_discards_super_groups() {
        // Four copies of the same AND exceed a capacity of 3, so the group
        // is discarded wholesale.
        let text = "\
1 sort bitvec 8
2 input 1 a
3 input 1 b
4 and 1 2 3
5 and 1 2 3
6 and 1 2 3
7 and 1 2 3
8 sort bitvec 1
9 neq 8 4 5
10 bad 9
";
        let outcome = run(
            text,
            &SimOptions {
                rounds: 32,
                capacity: 3,
                check_all: true,
                ..Default::default()
            },
        );
        assert_eq!(outcome.groups, 0);
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn unrolled_state_mode_keys_by_original_id() {
        // Two copies of one original state (id 3) at different times carry
        // the same value; candidates collapse to original ids, so an
        // identical pair from one original id yields no candidate.
        let text = "\
1 sort bitvec 4
2 zero 1
3 input 1 x
4 add 1 2 3 regA.state.id_3.time_0
5 add 1 2 3 regA.state.id_3.time_1
6 sort bitvec 1
7 redor 6 4
8 bad 7
";
        let outcome = run(
            text,
            &SimOptions {
                rounds: 16,
                ..Default::default()
            },
        );
        assert!(outcome.candidates.is_empty());
    }
}
