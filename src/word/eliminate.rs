// SPDX-License-Identifier: Apache-2.0

//! Constraint elimination for unrolled models.
//!
//! Constraints whose cone reads sequential state (recognized through the
//! unrolled-symbol protocol) cannot be enforced by pinning inputs, so they
//! are dropped together with every state and operator that existed only to
//! feed them.

use crate::word::netlist::{Netlist, NodeClass, Tag};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EliminateStats {
    pub eliminated_nodes: i64,
    pub eliminated_states: i64,
    pub eliminated_constraints: i64,
    pub total_nodes: i64,
    pub total_states: i64,
    pub total_constraints: i64,
}

pub fn eliminate(netlist: &mut Netlist) -> EliminateStats {
    let max_id = netlist.max_id();
    let n = max_id as usize + 1;
    let mut stats = EliminateStats::default();
    let mut elim = vec![false; n];

    for node in netlist.iter() {
        if node.tag == Tag::Constraint {
            stats.total_constraints += 1;
        }
        if node.symbol.is_some() && node.tag != Tag::Input {
            stats.total_states += 1;
        }
        if node.class() == NodeClass::State {
            elim[node.id as usize] = true;
        }
    }
    stats.total_nodes = max_id;

    // Which constraints see a state...
    netlist.transition(&mut elim);
    for node in netlist.iter() {
        if node.tag != Tag::Constraint {
            elim[node.id as usize] = false;
        }
    }
    // ...which states feed those constraints...
    for id in (1..=max_id).rev() {
        let Some(node) = netlist.get(id) else {
            continue;
        };
        if matches!(node.class(), NodeClass::ConstraintFamily | NodeClass::Op) {
            for &arg in &node.args {
                let a = arg.unsigned_abs() as usize;
                elim[a] = elim[a] || elim[id as usize];
            }
        }
    }
    for node in netlist.iter() {
        if node.class() != NodeClass::State {
            elim[node.id as usize] = false;
        }
    }
    // ...and everything those states drive goes with them.
    netlist.transition(&mut elim);

    for id in 1..=max_id {
        let Some(node) = netlist.get_mut(id) else {
            continue;
        };
        if elim[id as usize] {
            node.deleted = true;
            stats.eliminated_nodes += 1;
            if node.tag == Tag::Constraint {
                stats.eliminated_constraints += 1;
            }
            if node.symbol.is_some() && node.tag != Tag::Input {
                stats.eliminated_states += 1;
            }
        }
    }
    stats
}
