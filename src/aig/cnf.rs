// SPDX-License-Identifier: Apache-2.0

//! Tseitin encoding of an AIG into DIMACS CNF.
//!
//! A reference set over literals decides which clauses each AND needs: a
//! positively referenced gate emits the two clauses binding its output down
//! to the operands, a negatively referenced gate emits the one clause
//! binding the operands up. CNF variables are allocated densely, only for
//! variables with any referenced literal. The formula ends with unit
//! clauses for the constraints and one disjunction asserting that some bad
//! or output fires.

use std::io::Write;

use bitvec::prelude::*;

use crate::aig::model::AigModel;

#[derive(Debug)]
pub struct Cnf {
    pub num_vars: i32,
    pub clauses: Vec<Vec<i32>>,
    /// (AIG literal, CNF variable) pairs for the mapping comments.
    pub var_map: Vec<(u32, i32)>,
}

/// Encodes `model`. With `simplified` false every literal counts as
/// referenced and each AND emits all three clauses.
pub fn encode(model: &AigModel, simplified: bool) -> Cnf {
    let nlits = model.literal_count();
    let mut refs = if simplified {
        bitvec![0; nlits]
    } else {
        bitvec![1; nlits]
    };
    for signal in model
        .bads
        .iter()
        .chain(&model.outputs)
        .chain(&model.constraints)
    {
        refs.set(signal.literal.index(), true);
    }
    for and in model.ands.iter().rev() {
        if refs[and.lhs.index()] {
            refs.set(and.rhs0.index(), true);
            refs.set(and.rhs1.index(), true);
        }
        if refs[and.lhs.negate().index()] {
            refs.set(and.rhs0.negate().index(), true);
            refs.set(and.rhs1.negate().index(), true);
        }
    }

    let mut num_vars = 0i32;
    let mut map = vec![0i32; nlits];
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut var_map = Vec::new();
    if refs[0] || refs[1] {
        num_vars += 1;
        map[0] = num_vars;
        map[1] = -num_vars;
        clauses.push(vec![map[1]]);
    }
    for lit in (2..=2 * model.maxvar as usize).step_by(2) {
        if !refs[lit] && !refs[lit ^ 1] {
            continue;
        }
        num_vars += 1;
        map[lit] = num_vars;
        map[lit ^ 1] = -num_vars;
        var_map.push((lit as u32, num_vars));
    }

    for and in &model.ands {
        let (lhs, rhs0, rhs1) = (and.lhs.index(), and.rhs0.index(), and.rhs1.index());
        if refs[lhs] {
            clauses.push(vec![map[lhs ^ 1], map[rhs0]]);
            clauses.push(vec![map[lhs ^ 1], map[rhs1]]);
        }
        if refs[lhs ^ 1] {
            clauses.push(vec![map[rhs0 ^ 1], map[rhs1 ^ 1], map[lhs]]);
        }
    }

    for constraint in &model.constraints {
        clauses.push(vec![map[constraint.literal.index()]]);
    }
    let mut disjunction = Vec::new();
    for signal in model.bads.iter().chain(&model.outputs) {
        disjunction.push(map[signal.literal.index()]);
    }
    clauses.push(disjunction);

    Cnf {
        num_vars,
        clauses,
        var_map,
    }
}

/// Writes DIMACS, optionally preceded by `c <aig-lit> -> <cnf-var>`
/// mapping comments.
pub fn write_dimacs<W: Write>(w: &mut W, cnf: &Cnf, map_comments: bool) -> std::io::Result<()> {
    if map_comments {
        for &(lit, var) in &cnf.var_map {
            writeln!(w, "c {lit} -> {var}")?;
        }
    }
    writeln!(w, "p cnf {} {}", cnf.num_vars, cnf.clauses.len())?;
    for clause in &cnf.clauses {
        for lit in clause {
            write!(w, "{lit} ")?;
        }
        writeln!(w, "0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::model::{AigAnd, AigSignal, Literal};

    // Inputs 2, 4; 6 = 2 & 4; bad 6.
    fn and_bad_model() -> AigModel {
        AigModel {
            maxvar: 3,
            inputs: vec![AigSignal::new(Literal(2)), AigSignal::new(Literal(4))],
            outputs: vec![],
            bads: vec![AigSignal::new(Literal(6))],
            constraints: vec![],
            ands: vec![AigAnd {
                lhs: Literal(6),
                rhs0: Literal(4),
                rhs1: Literal(2),
            }],
        }
    }

    #[test]
    fn unsimplified_emits_all_three_clauses() {
        let cnf = encode(&and_bad_model(), false);
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(
            cnf.clauses,
            vec![
                vec![-3, 2],
                vec![-3, 1],
                vec![-2, -1, 3],
                vec![3],
            ]
        );
    }

    #[test]
    fn simplified_skips_unreferenced_phase() {
        let cnf = encode(&and_bad_model(), true);
        // Only the positive phase of the AND is referenced by the bad.
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.clauses, vec![vec![-3, 2], vec![-3, 1], vec![3]]);
    }

    #[test]
    fn constraints_become_units() {
        let mut model = and_bad_model();
        model.constraints.push(AigSignal::new(Literal(5)));
        let cnf = encode(&model, true);
        assert!(cnf.clauses.contains(&vec![-2]));
    }

    #[test]
    fn dimacs_shape() {
        let cnf = encode(&and_bad_model(), false);
        let mut out = Vec::new();
        write_dimacs(&mut out, &cnf, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // Three mapping comments precede the header.
        assert_eq!(lines[0], "c 2 -> 1");
        assert_eq!(lines[1], "c 4 -> 2");
        assert_eq!(lines[2], "c 6 -> 3");
        assert_eq!(lines[3], "p cnf 3 4");
        assert_eq!(lines[4], "-3 2 0");
        assert!(text.ends_with("3 0\n"));
    }

    #[test]
    fn no_properties_gives_empty_disjunction() {
        let mut model = and_bad_model();
        model.bads.clear();
        let cnf = encode(&model, true);
        assert_eq!(cnf.clauses.last().unwrap(), &Vec::<i32>::new());
    }
}
