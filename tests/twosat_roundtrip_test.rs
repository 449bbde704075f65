// SPDX-License-Identifier: Apache-2.0

//! Round-trip check of the constraint preprocessing: every literal it
//! forces must hold in every admissible input assignment, verified with a
//! brute-force enumerator over small AIGs.

use netsweep::aig::model::{AigAnd, AigModel, AigSignal, Literal};
use netsweep::aig::sim::{preprocess, simulate, AigSimOptions};
use netsweep::error::SweepError;

fn model(
    maxvar: u32,
    inputs: &[u32],
    ands: &[(u32, u32, u32)],
    constraints: &[u32],
) -> AigModel {
    AigModel {
        maxvar,
        inputs: inputs.iter().map(|&l| AigSignal::new(Literal(l))).collect(),
        outputs: vec![],
        bads: vec![],
        constraints: constraints
            .iter()
            .map(|&l| AigSignal::new(Literal(l)))
            .collect(),
        ands: ands
            .iter()
            .map(|&(lhs, rhs0, rhs1)| AigAnd {
                lhs: Literal(lhs),
                rhs0: Literal(rhs0),
                rhs1: Literal(rhs1),
            })
            .collect(),
    }
}

/// Evaluates every variable under the given input bits (bit i of `assign`
/// drives the i-th input).
fn eval(m: &AigModel, assign: u32) -> Vec<bool> {
    let mut values = vec![false; m.maxvar as usize + 1];
    for (i, input) in m.inputs.iter().enumerate() {
        values[input.literal.var() as usize] = assign >> i & 1 == 1;
    }
    let lit_value = |values: &[bool], lit: Literal| {
        if lit.is_const() {
            lit == Literal::TRUE
        } else {
            values[lit.var() as usize] ^ lit.sign()
        }
    };
    for and in &m.ands {
        values[and.lhs.var() as usize] =
            lit_value(&values, and.rhs0) && lit_value(&values, and.rhs1);
    }
    values
}

fn lit_holds(values: &[bool], lit: Literal) -> bool {
    values[lit.var() as usize] ^ lit.sign()
}

/// Checks that every literal `preprocess` forces to 1 holds in every input
/// assignment satisfying the constraints.
fn assert_forced_literals_sound(m: &AigModel) {
    let mut log = Vec::new();
    let pre = preprocess(m, &mut log).unwrap();
    let mut admissible = 0;
    for assign in 0..1u32 << m.inputs.len() {
        let values = eval(m, assign);
        if !m
            .constraints
            .iter()
            .all(|c| lit_holds(&values, c.literal))
        {
            continue;
        }
        admissible += 1;
        for lit in 0..2 * (m.maxvar + 1) {
            if pre.forced[lit as usize] == Some(true) {
                assert!(
                    lit_holds(&values, Literal(lit)),
                    "forced literal {lit} violated by admissible assignment {assign:#b}"
                );
            }
        }
    }
    assert!(admissible > 0, "constraints admit no assignment at all");
}

#[test]
fn conjunction_constraint_forces_both_inputs() {
    // constraint 6 = a & b.
    let m = model(3, &[2, 4], &[(6, 2, 4)], &[6]);
    let mut log = Vec::new();
    let pre = preprocess(&m, &mut log).unwrap();
    assert_eq!(pre.forced[2], Some(true));
    assert_eq!(pre.forced[4], Some(true));
    assert_forced_literals_sound(&m);
}

#[test]
fn nested_conjunction_propagates() {
    // constraint 10 = (a & b) & c: all three inputs forced.
    let m = model(5, &[2, 4, 6], &[(8, 2, 4), (10, 8, 6)], &[10]);
    let mut log = Vec::new();
    let pre = preprocess(&m, &mut log).unwrap();
    for lit in [2, 4, 6] {
        assert_eq!(pre.forced[lit], Some(true), "input literal {lit}");
    }
    assert_forced_literals_sound(&m);
}

#[test]
fn exclusion_plus_unit_forces_the_other_side() {
    // constraints: a, and !(a & b): admissible assignments all have b = 0.
    let m = model(3, &[2, 4], &[(6, 2, 4)], &[2, 7]);
    let mut log = Vec::new();
    let pre = preprocess(&m, &mut log).unwrap();
    assert_eq!(pre.forced[2], Some(true));
    assert_eq!(pre.forced[5], Some(true));
    assert_forced_literals_sound(&m);
}

#[test]
fn infeasible_constraints_are_detected() {
    // (p & q) == 0 while p == 1 and q == 1: the implication graph puts a
    // literal and its negation into one component.
    let m = model(3, &[2, 4], &[(6, 2, 4)], &[2, 4, 7]);
    let mut log = Vec::new();
    assert!(matches!(
        preprocess(&m, &mut log),
        Err(SweepError::ConstraintsUnsatisfiable { .. })
    ));
    // The full simulation entry point surfaces the same failure.
    assert!(matches!(
        simulate(&m, &AigSimOptions::default(), &mut log),
        Err(SweepError::ConstraintsUnsatisfiable { .. })
    ));
}

#[test]
fn unconstrained_model_forces_nothing() {
    let m = model(3, &[2, 4], &[(6, 2, 4)], &[]);
    let mut log = Vec::new();
    let pre = preprocess(&m, &mut log).unwrap();
    assert!(pre.forced.iter().all(|f| f.is_none()));
}
