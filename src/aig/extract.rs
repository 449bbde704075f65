// SPDX-License-Identifier: Apache-2.0

//! Key-variable extraction for AIGs: keeps the model's constraints and
//! replaces its properties with pairwise "differ" bads between the first
//! key variable and each further one, encoded with three fresh AND gates
//! per pair. Reencoding afterwards drops everything the new properties and
//! the constraints do not reach.

use crate::aig::model::{AigAnd, AigModel, AigSignal, Literal};
use crate::error::{Result, SweepError};

pub fn extract(model: &AigModel, key_vars: &[u32]) -> Result<AigModel> {
    if key_vars.is_empty() {
        return Err(SweepError::Usage(
            "key node set is not allowed to be empty".to_string(),
        ));
    }
    if !model.outputs.is_empty() {
        return Err(SweepError::UnsupportedConstruct(
            "can not handle outputs".to_string(),
        ));
    }
    for &key in key_vars {
        if key == 0 || key > model.maxvar {
            return Err(SweepError::Usage(format!("key node {key} out of range")));
        }
    }

    let mut new_model = AigModel {
        maxvar: model.maxvar,
        inputs: model.inputs.clone(),
        outputs: Vec::new(),
        bads: Vec::new(),
        constraints: model.constraints.clone(),
        ands: model.ands.clone(),
    };

    // (u & !v) | (!u & v) via three ANDs; the negation of the final AND is
    // the "u and v differ" bad.
    for &key in &key_vars[1..] {
        let mut u = Literal::from_var(key_vars[0], false);
        let mut v = Literal::from_var(key, false);
        if u < v {
            std::mem::swap(&mut u, &mut v);
        }
        new_model.maxvar += 1;
        let p1 = Literal::from_var(new_model.maxvar, false);
        new_model.ands.push(AigAnd {
            lhs: p1,
            rhs0: u.negate(),
            rhs1: v,
        });
        new_model.maxvar += 1;
        let p2 = Literal::from_var(new_model.maxvar, false);
        new_model.ands.push(AigAnd {
            lhs: p2,
            rhs0: u,
            rhs1: v.negate(),
        });
        new_model.maxvar += 1;
        let p3 = Literal::from_var(new_model.maxvar, false);
        new_model.ands.push(AigAnd {
            lhs: p3,
            rhs0: p2.negate(),
            rhs1: p1.negate(),
        });
        new_model.bads.push(AigSignal::new(p3.negate()));
    }

    new_model.reencode()?;
    Ok(new_model)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Inputs 2 and 4; 6 = 2 & 4; 8 = !2 & !4; constraint on 6.
    fn sample() -> AigModel {
        AigModel {
            maxvar: 4,
            inputs: vec![AigSignal::new(Literal(2)), AigSignal::new(Literal(4))],
            outputs: vec![],
            bads: vec![AigSignal::new(Literal(8))],
            constraints: vec![AigSignal::new(Literal(6))],
            ands: vec![
                AigAnd {
                    lhs: Literal(6),
                    rhs0: Literal(2),
                    rhs1: Literal(4),
                },
                AigAnd {
                    lhs: Literal(8),
                    rhs0: Literal(3),
                    rhs1: Literal(5),
                },
            ],
        }
    }

    #[test]
    fn builds_differ_bad_and_drops_old_properties() {
        let model = sample();
        let extracted = extract(&model, &[1, 2]).unwrap();
        // One bad per extra key; the original bad is gone with its cone.
        assert_eq!(extracted.bads.len(), 1);
        assert_eq!(extracted.constraints.len(), 1);
        // Inputs plus constraint AND plus three miter ANDs.
        assert_eq!(extracted.ands.len(), 4);
        assert_eq!(extracted.maxvar, 6);
        // The bad literal is the negation of the final miter AND, whose
        // operands are in turn negations of the two one-sided ANDs.
        let bad = extracted.bads[0].literal;
        assert!(bad.sign());
        let miter = extracted
            .ands
            .iter()
            .find(|a| a.lhs.var() == bad.var())
            .unwrap();
        assert!(miter.rhs0.sign() && miter.rhs1.sign());
    }

    #[test]
    fn single_key_keeps_only_constraint_cone() {
        let model = sample();
        let extracted = extract(&model, &[3]).unwrap();
        assert!(extracted.bads.is_empty());
        // Constraint AND survives; the old bad's AND does not.
        assert_eq!(extracted.ands.len(), 1);
    }

    #[test]
    fn bad_keys_rejected() {
        let model = sample();
        assert!(extract(&model, &[]).is_err());
        assert!(extract(&model, &[9]).is_err());
        assert!(extract(&model, &[0]).is_err());
    }
}
