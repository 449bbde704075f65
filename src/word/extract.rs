// SPDX-License-Identifier: Apache-2.0

//! Cone-of-influence extraction around a set of key nodes.
//!
//! The kept set is the transitive fan-in of the key nodes together with the
//! property lines (bads/constraints) their fan-out reaches; every sort a
//! kept node mentions is retained. When more than one key node is given,
//! synthetic bad properties are appended that fire whenever two consecutive
//! key nodes differ, so a downstream solver can search for a distinguishing
//! input.

use crate::error::{Result, SweepError};
use crate::word::netlist::{Netlist, Node, NodeClass, SortKind, Tag};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub nodes: i64,
    pub states: i64,
    pub bads: i64,
    pub constraints: i64,
}

pub fn extract(netlist: &mut Netlist, key_nodes: &[i64]) -> Result<ExtractStats> {
    if key_nodes.is_empty() {
        return Err(SweepError::Usage(
            "key node set is not allowed to be empty".to_string(),
        ));
    }
    let max_id = netlist.max_id();
    for &key in key_nodes {
        if key <= 0 || key > max_id || netlist.get(key).is_none() {
            return Err(SweepError::Usage(format!(
                "key node {key} out of range"
            )));
        }
    }

    let n = max_id as usize + 1;
    let mut keep = vec![false; n];
    for &key in key_nodes {
        keep[key as usize] = true;
    }

    // Fan-out: which property lines can see a key node.
    netlist.transition(&mut keep);
    for node in netlist.iter() {
        if node.class() != NodeClass::ConstraintFamily {
            keep[node.id as usize] = false;
        }
    }
    for &key in key_nodes {
        keep[key as usize] = true;
    }

    // Fan-in of the keys and the retained properties, sorts included.
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

    let mut stats = ExtractStats::default();
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

    if key_nodes.len() > 1 {
        append_differ_bads(netlist, key_nodes)?;
    }
    Ok(stats)
}

/// For consecutive key nodes (p, q) appends `bad(neq(xor(p, q), 0))`.
fn append_differ_bads(netlist: &mut Netlist, key_nodes: &[i64]) -> Result<()> {
    let mut line_id = netlist.max_id();
    line_id += 1;
    let bit_sort = line_id;
    let mut sort1 = Node::new(bit_sort, Tag::Sort);
    sort1.sort_kind = Some(SortKind::BitVec { width: 1 });
    netlist.insert(sort1);

    for pair in key_nodes.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        let sid = netlist
            .get(prev)
            .map(|n| n.sort)
            .filter(|&s| s != 0)
            .ok_or_else(|| {
                SweepError::UnsupportedConstruct(format!(
                    "key node {prev} carries no sort"
                ))
            })?;

        line_id += 1;
        let zero_id = line_id;
        let mut zero = Node::new(zero_id, Tag::Zero);
        zero.sort = sid;
        netlist.insert(zero);

        line_id += 1;
        let xor_id = line_id;
        let mut xor = Node::new(xor_id, Tag::Xor);
        xor.sort = sid;
        xor.args = vec![prev, cur];
        netlist.insert(xor);

        line_id += 1;
        let neq_id = line_id;
        let mut neq = Node::new(neq_id, Tag::Neq);
        neq.sort = bit_sort;
        neq.args = vec![zero_id, xor_id];
        netlist.insert(neq);

        line_id += 1;
        let mut bad = Node::new(line_id, Tag::Bad);
        bad.args = vec![neq_id];
        netlist.insert(bad);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::netlist::write_netlist;
    use crate::word::parse::parse_netlist_str;

    // 4/5: two AND cones over the inputs; 7: unrelated OR; 9: a constraint
    // watching node 4; 11: a constraint watching only node 7.
    const MODEL: &str = "\
1 sort bitvec 8
2 input 1 a
3 input 1 b
4 and 1 2 3
5 and 1 2 3
6 input 1 c
7 or 1 6 2
8 redor 1 4
9 constraint 8
10 redor 1 7
11 constraint 10
";

    #[test]
    fn keeps_fanin_and_touched_constraints() {
        let mut netlist = parse_netlist_str(MODEL).unwrap();
        extract(&mut netlist, &[4, 5]).unwrap();
        let kept: Vec<i64> = netlist
            .iter()
            .filter(|n| !n.deleted)
            .map(|n| n.id)
            .collect();
        // Fan-in of {4, 5} plus constraint 9 (it watches 4) and its cone;
        // constraint 11 sees neither key, so it and nodes 6/7/10 go.
        assert!(kept.contains(&1) && kept.contains(&2) && kept.contains(&3));
        assert!(kept.contains(&4) && kept.contains(&5));
        assert!(kept.contains(&8) && kept.contains(&9));
        assert!(!kept.contains(&6) && !kept.contains(&7));
        assert!(!kept.contains(&10) && !kept.contains(&11));
    }

    #[test]
    fn appends_differ_bad_for_key_pair() {
        let mut netlist = parse_netlist_str(MODEL).unwrap();
        extract(&mut netlist, &[4, 5]).unwrap();
        // Appended: sort(12), zero(13), xor(14), neq(15), bad(16).
        assert_eq!(netlist.max_id(), 16);
        let xor = netlist.get(14).unwrap();
        assert_eq!(xor.tag, Tag::Xor);
        assert_eq!(xor.args, vec![4, 5]);
        let neq = netlist.get(15).unwrap();
        assert_eq!(neq.tag, Tag::Neq);
        assert_eq!(neq.args, vec![13, 14]);
        let bad = netlist.get(16).unwrap();
        assert_eq!(bad.tag, Tag::Bad);
        assert_eq!(bad.args, vec![15]);

        // The extracted model must round-trip through the parser.
        let mut out = Vec::new();
        write_netlist(&mut out, &netlist).unwrap();
        parse_netlist_str(std::str::from_utf8(&out).unwrap()).unwrap();
    }

    #[test]
    fn single_key_appends_nothing() {
        let mut netlist = parse_netlist_str(MODEL).unwrap();
        let stats = extract(&mut netlist, &[7]).unwrap();
        assert_eq!(netlist.max_id(), 11);
        // Fan-in of 7 is {1, 2, 6, 7}, plus constraint 11's cone {10, 11}.
        assert_eq!(stats.nodes, 6);
        assert_eq!(stats.constraints, 1);
    }

    #[test]
    fn rejects_bad_keys() {
        let mut netlist = parse_netlist_str(MODEL).unwrap();
        assert!(extract(&mut netlist, &[]).is_err());
        assert!(extract(&mut netlist, &[99]).is_err());
    }
}
