// SPDX-License-Identifier: Apache-2.0

//! Union merging over AIG variables.
//!
//! Variables asserted equivalent collapse onto the smaller index; operand
//! literals are substituted with the canonical variable, inversion bit
//! preserved, and the AIGER `rhs0 >= rhs1` operand order restored. Gates
//! inside a constraint cone are fixed (their operands keep the original
//! wires); bad literals are substituted like operands. Reencoding drops
//! whatever the merge unhooked.

use bitvec::prelude::*;

use crate::aig::model::{AigAnd, AigModel, AigSignal, Literal};
use crate::error::{Result, SweepError};
use crate::union_find::UnionFind;

pub fn merge(model: &AigModel, pairs: &[(u32, u32)]) -> Result<AigModel> {
    if !model.outputs.is_empty() {
        return Err(SweepError::UnsupportedConstruct(
            "can not handle outputs".to_string(),
        ));
    }
    let nvars = model.maxvar as usize + 1;
    let mut union_set = UnionFind::new(nvars);
    for &(x, y) in pairs {
        if x > model.maxvar || y > model.maxvar {
            return Err(SweepError::Usage(format!(
                "equivalence pair ({x}, {y}) out of range"
            )));
        }
        union_set.union(x as usize, y as usize);
    }

    // Constraint cones keep their wiring.
    let mut fixed = bitvec![0; nvars];
    for constraint in &model.constraints {
        fixed.set(constraint.literal.var() as usize, true);
    }
    for and in model.ands.iter().rev() {
        if fixed[and.lhs.var() as usize] {
            fixed.set(and.rhs0.var() as usize, true);
            fixed.set(and.rhs1.var() as usize, true);
        }
    }

    let mut convert = |lit: Literal| -> Literal {
        Literal::from_var(union_set.find(lit.var() as usize) as u32, lit.sign())
    };

    let mut new_model = AigModel {
        maxvar: model.maxvar,
        inputs: model.inputs.clone(),
        outputs: Vec::new(),
        bads: Vec::new(),
        constraints: model.constraints.clone(),
        ands: Vec::with_capacity(model.ands.len()),
    };
    for and in &model.ands {
        let (mut rhs0, mut rhs1) = if fixed[and.lhs.var() as usize] {
            (and.rhs0, and.rhs1)
        } else {
            (convert(and.rhs0), convert(and.rhs1))
        };
        if rhs0 < rhs1 {
            std::mem::swap(&mut rhs0, &mut rhs1);
        }
        new_model.ands.push(AigAnd {
            lhs: and.lhs,
            rhs0,
            rhs1,
        });
    }
    for bad in &model.bads {
        new_model.bads.push(AigSignal {
            literal: convert(bad.literal),
            name: bad.name.clone(),
        });
    }

    new_model.reencode()?;
    Ok(new_model)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Inputs 2, 4; 6 = 2 & 4; 8 = 2 & 4 (duplicate); 10 = 8 & 4;
    // bad !10, constraint 6.
    fn sample() -> AigModel {
        AigModel {
            maxvar: 5,
            inputs: vec![AigSignal::new(Literal(2)), AigSignal::new(Literal(4))],
            outputs: vec![],
            bads: vec![AigSignal::new(Literal(11))],
            constraints: vec![AigSignal::new(Literal(6))],
            ands: vec![
                AigAnd {
                    lhs: Literal(6),
                    rhs0: Literal(4),
                    rhs1: Literal(2),
                },
                AigAnd {
                    lhs: Literal(8),
                    rhs0: Literal(4),
                    rhs1: Literal(2),
                },
                AigAnd {
                    lhs: Literal(10),
                    rhs0: Literal(8),
                    rhs1: Literal(4),
                },
            ],
        }
    }

    #[test]
    fn merges_duplicate_onto_smaller_var() {
        let model = sample();
        let merged = merge(&model, &[(3, 4)]).unwrap();
        // Var 4's gate rewires to var 3's gate; the duplicate AND becomes
        // unreachable and reencoding drops it.
        assert_eq!(merged.ands.len(), 2);
        // The surviving top gate references the constraint-side AND.
        let top = merged.ands.last().unwrap();
        assert_eq!(top.rhs0.var(), merged.ands[0].lhs.var());
    }

    #[test]
    fn constraint_gate_is_not_rewritten() {
        let model = sample();
        // Merging the constraint AND's own variable with var 2 must leave
        // the constraint cone intact.
        let merged = merge(&model, &[(2, 3)]).unwrap();
        assert_eq!(merged.constraints.len(), 1);
        let c_var = merged.constraints[0].literal.var();
        let c_and = merged
            .ands
            .iter()
            .find(|a| a.lhs.var() == c_var)
            .expect("constraint AND survives");
        // Operands are still the two inputs.
        assert!(c_and.rhs0.var() <= 2 && c_and.rhs1.var() <= 2);
    }

    #[test]
    fn operand_order_restored() {
        let model = sample();
        let merged = merge(&model, &[(3, 4)]).unwrap();
        for and in &merged.ands {
            assert!(and.rhs0 >= and.rhs1);
        }
    }

    #[test]
    fn out_of_range_pair_rejected() {
        let model = sample();
        assert!(merge(&model, &[(3, 9)]).is_err());
    }
}
