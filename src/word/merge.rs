// SPDX-License-Identifier: Apache-2.0

//! Applies an externally supplied node-equivalence list to the netlist.
//!
//! Equivalent nodes collapse onto the smaller id through a union-find;
//! every operand reference is substituted with its canonical representative,
//! sign preserved. Nodes transitively driving a `constraint` are *fixed*:
//! their operands are left untouched so the environment assumptions keep
//! their original meaning. Afterwards only the fan-in of the property lines
//! survives; everything else is flagged deleted.

use std::io::{BufRead, BufReader, Read};

use crate::error::{Result, SweepError};
use crate::union_find::UnionFind;
use crate::word::netlist::{Netlist, NodeClass, SortKind, Tag};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub nodes: i64,
    pub states: i64,
    pub bads: i64,
    pub constraints: i64,
}

/// Reads whitespace-separated unsigned id pairs until EOF.
pub fn parse_equiv_list<R: Read>(reader: R, path: &str) -> Result<Vec<(i64, i64)>> {
    let mut pairs = Vec::new();
    let mut pending: Option<i64> = None;
    for (lineno, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| SweepError::parse(path, lineno as u64 + 1, e.to_string()))?;
        for token in line.split_whitespace() {
            let id: i64 = token.parse().map_err(|_| {
                SweepError::parse(
                    path,
                    lineno as u64 + 1,
                    format!("invalid node id '{token}' in equivalence list"),
                )
            })?;
            match pending.take() {
                Some(first) => pairs.push((first, id)),
                None => pending = Some(id),
            }
        }
    }
    if pending.is_some() {
        return Err(SweepError::parse(
            path,
            0,
            "odd number of ids in equivalence list".to_string(),
        ));
    }
    Ok(pairs)
}

pub fn merge(netlist: &mut Netlist, pairs: &[(i64, i64)]) -> Result<MergeStats> {
    let max_id = netlist.max_id();
    let n = max_id as usize + 1;
    let mut union_set = UnionFind::new(n);
    for &(x, y) in pairs {
        if x <= 0 || y <= 0 || x > max_id || y > max_id {
            return Err(SweepError::Usage(format!(
                "equivalence pair ({x}, {y}) out of range"
            )));
        }
        union_set.union(x as usize, y as usize);
    }

    // Constraint cones are fixed: substituting inside them would change
    // what the environment assumption says.
    let mut fixed = vec![false; n];
    for node in netlist.iter() {
        if node.tag == Tag::Constraint {
            fixed[node.id as usize] = true;
        }
    }
    for id in (1..=max_id).rev() {
        let Some(node) = netlist.get(id) else {
            continue;
        };
        if fixed[id as usize] {
            for &arg in &node.args {
                fixed[arg.unsigned_abs() as usize] = true;
            }
        }
    }

    for id in 1..=max_id {
        if fixed[id as usize] {
            continue;
        }
        let Some(node) = netlist.get_mut(id) else {
            continue;
        };
        for arg in node.args.iter_mut() {
            let canonical = union_set.find(arg.unsigned_abs() as usize) as i64;
            *arg = if *arg < 0 { -canonical } else { canonical };
        }
    }

    // Reachability from the property lines decides what survives.
    let mut keep = vec![false; n];
    for node in netlist.iter() {
        if node.class() == NodeClass::ConstraintFamily {
            keep[node.id as usize] = true;
        }
    }
    for id in (1..=max_id).rev() {
        let Some(node) = netlist.get(id) else {
            continue;
        };
        if keep[id as usize] {
            if node.sort != 0 {
                keep[node.sort as usize] = true;
            }
            if let Some(SortKind::Array { index, element }) = node.sort_kind {
                keep[index as usize] = true;
                keep[element as usize] = true;
            }
        }
        for &arg in &node.args {
            let a = arg.unsigned_abs() as usize;
            keep[a] = keep[a] || keep[id as usize];
        }
    }

    let mut stats = MergeStats::default();
    for id in 1..=max_id {
        let Some(node) = netlist.get_mut(id) else {
            continue;
        };
        if !keep[id as usize] {
            node.deleted = true;
        } else {
            match node.tag {
                Tag::State => stats.states += 1,
                Tag::Bad => stats.bads += 1,
                Tag::Constraint => stats.constraints += 1,
                _ => {}
            }
            stats.nodes += 1;
        }
    }
    Ok(stats)
}
