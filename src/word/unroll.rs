// SPDX-License-Identifier: Apache-2.0

//! Time-frame expansion of a sequential model into a combinational one.
//!
//! The unrolled model contains one copy of every combinational line per time
//! step 0..=depth. Sorts and constants are emitted once and shared; each
//! sort brings a companion `zero` used as the left operand of the no-op
//! `add` that anchors a state copy to its value (init at step 0, the
//! previous step's next-value afterwards). States without an anchor become
//! fresh inputs. State and input copies carry symbols in the
//! `<original>.<role>.id_<N>.time_<T>` convention the downstream stages
//! recognize.

use std::io::Write;

use crate::error::{Result, SweepError};
use crate::word::netlist::{Netlist, Node, SortKind, Tag};

struct Unroller<'a, W: Write> {
    netlist: &'a Netlist,
    out: &'a mut W,
    line_id: i64,
    /// Original id -> emitted id of its current-step copy (0 = none yet).
    cur: Vec<i64>,
    /// Sort id -> emitted id of its companion zero.
    zero_of_sort: Vec<i64>,
    /// State id -> emitted id anchoring its value at the upcoming step.
    state_val: Vec<i64>,
}

pub fn unroll<W: Write>(out: &mut W, netlist: &Netlist, depth: i64) -> Result<()> {
    let n = netlist.max_id() as usize + 1;
    let mut unroller = Unroller {
        netlist,
        out,
        line_id: 0,
        cur: vec![0; n],
        zero_of_sort: vec![0; n],
        state_val: vec![0; n],
    };
    for time in 0..=depth {
        unroller.emit_step(time)?;
        for node in netlist.iter() {
            if node.tag == Tag::State {
                if let Some(next_ref) = node.next {
                    unroller.state_val[node.id as usize] = unroller.resolve(next_ref);
                }
            }
        }
    }
    Ok(())
}

impl<'a, W: Write> Unroller<'a, W> {
    fn resolve(&self, reference: i64) -> i64 {
        let copy = self.cur[reference.unsigned_abs() as usize];
        if reference < 0 {
            -copy
        } else {
            copy
        }
    }

    fn io(e: std::io::Error) -> SweepError {
        SweepError::Io {
            path: "<output>".to_string(),
            dir: "writing",
            source: e,
        }
    }

    fn emit_step(&mut self, time: i64) -> Result<()> {
        writeln!(self.out, ";\n; timestamp {time}\n;").map_err(Self::io)?;
        let netlist = self.netlist;
        for node in netlist.iter() {
            self.emit_line(node, time, time == 0)?;
        }
        Ok(())
    }

    fn emit_line(&mut self, node: &Node, time: i64, first: bool) -> Result<()> {
        match node.tag {
            Tag::Sort => {
                if first {
                    self.line_id += 1;
                    let sort_id = self.line_id;
                    match node.sort_kind {
                        Some(SortKind::BitVec { width }) => {
                            writeln!(self.out, "{sort_id} sort bitvec {width}")
                                .map_err(Self::io)?;
                        }
                        Some(SortKind::Array { index, element }) => {
                            let (i, e) = (self.resolve(index), self.resolve(element));
                            writeln!(self.out, "{sort_id} sort array {i} {e}")
                                .map_err(Self::io)?;
                        }
                        None => {
                            return Err(SweepError::SimulationAssertion(format!(
                                "sort node {} without payload",
                                node.id
                            )))
                        }
                    }
                    self.cur[node.id as usize] = sort_id;
                    self.line_id += 1;
                    writeln!(self.out, "{} zero {}", self.line_id, sort_id).map_err(Self::io)?;
                    self.zero_of_sort[node.id as usize] = self.line_id;
                }
            }
            Tag::State => {
                let value = if first {
                    match node.init {
                        Some(init_ref) => self.resolve(init_ref),
                        None => 0,
                    }
                } else if node.next.is_some() {
                    self.state_val[node.id as usize]
                } else {
                    0
                };
                self.emit_state_copy(node, time, value)?;
            }
            Tag::Input => {
                self.line_id += 1;
                let sort = self.resolve(node.sort);
                let symbol = Self::stamp(node, "input", time);
                writeln!(self.out, "{} input {} {}", self.line_id, sort, symbol)
                    .map_err(Self::io)?;
                self.cur[node.id as usize] = self.line_id;
            }
            Tag::Slice => {
                self.line_id += 1;
                let sort = self.resolve(node.sort);
                let arg = self.resolve(node.args[0]);
                writeln!(
                    self.out,
                    "{} slice {} {} {} {}",
                    self.line_id, sort, arg, node.imm[0], node.imm[1]
                )
                .map_err(Self::io)?;
                self.cur[node.id as usize] = self.line_id;
            }
            Tag::Init | Tag::Next => {}
            t if t.is_const() => {
                if first {
                    self.emit_default(node)?;
                }
            }
            _ => {
                // Properties and plain operators get one copy per step.
                self.emit_default(node)?;
            }
        }
        Ok(())
    }

    /// `add(zero, value)` anchor when a value id exists, fresh input
    /// otherwise.
    fn emit_state_copy(&mut self, node: &Node, time: i64, value: i64) -> Result<()> {
        self.line_id += 1;
        let sort = self.resolve(node.sort);
        let symbol = Self::stamp(node, "state", time);
        if value != 0 {
            let zero = self.zero_of_sort[node.sort as usize];
            writeln!(
                self.out,
                "{} add {} {} {} {}",
                self.line_id, sort, zero, value, symbol
            )
            .map_err(Self::io)?;
        } else {
            writeln!(self.out, "{} input {} {}", self.line_id, sort, symbol)
                .map_err(Self::io)?;
        }
        self.cur[node.id as usize] = self.line_id;
        Ok(())
    }

    fn emit_default(&mut self, node: &Node) -> Result<()> {
        self.line_id += 1;
        let mut line = format!("{} {}", self.line_id, node.tag.name());
        if node.sort != 0 {
            line.push_str(&format!(" {}", self.resolve(node.sort)));
        }
        for &arg in &node.args {
            line.push_str(&format!(" {}", self.resolve(arg)));
        }
        for &imm in &node.imm {
            line.push_str(&format!(" {imm}"));
        }
        if let Some(constant) = &node.constant {
            line.push_str(&format!(" {constant}"));
        }
        writeln!(self.out, "{line}").map_err(Self::io)?;
        self.cur[node.id as usize] = self.line_id;
        Ok(())
    }

    fn stamp(node: &Node, role: &str, time: i64) -> String {
        match &node.symbol {
            Some(symbol) => format!("{}.{}.id_{}.time_{}", symbol, role, node.id, time),
            None => format!("{}.id_{}.time_{}", role, node.id, time),
        }
    }
}
