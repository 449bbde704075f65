// SPDX-License-Identifier: Apache-2.0

//! Unrolling semantics: the value of a state copy at time t must equal the
//! t-step reference simulation of the sequential original.

use std::collections::HashMap;

use netsweep::word::netlist::{parse_unrolled_symbol, Netlist, Tag, UnrollRole};
use netsweep::word::parse::parse_netlist_str;
use netsweep::word::unroll::unroll;

fn unroll_to_netlist(text: &str, depth: i64) -> Netlist {
    let netlist = parse_netlist_str(text).unwrap();
    let mut out = Vec::new();
    unroll(&mut out, &netlist, depth).unwrap();
    parse_netlist_str(std::str::from_utf8(&out).unwrap()).unwrap()
}

/// Evaluates a fully-determined (input-free) 1-bit netlist.
fn eval_bits(netlist: &Netlist) -> HashMap<i64, bool> {
    let mut values: HashMap<i64, bool> = HashMap::new();
    let arg = |values: &HashMap<i64, bool>, r: i64| -> bool {
        let v = values[&(r.unsigned_abs() as i64)];
        if r < 0 {
            !v
        } else {
            v
        }
    };
    for node in netlist.iter() {
        let value = match node.tag {
            Tag::Zero => false,
            Tag::One | Tag::Ones => true,
            Tag::Not => !arg(&values, node.args[0]),
            Tag::Add => arg(&values, node.args[0]) ^ arg(&values, node.args[1]),
            Tag::Xor => arg(&values, node.args[0]) ^ arg(&values, node.args[1]),
            Tag::And => arg(&values, node.args[0]) && arg(&values, node.args[1]),
            Tag::Or => arg(&values, node.args[0]) || arg(&values, node.args[1]),
            _ => continue,
        };
        values.insert(node.id, value);
    }
    values
}

const TOGGLE: &str = "\
1 sort bitvec 1
2 zero 1
3 state 1 s
4 not 1 3
5 init 1 3 2
6 next 1 3 4
7 bad 3
";

#[test]
fn toggle_states_follow_reference_simulation() {
    let depth = 4;
    let unrolled = unroll_to_netlist(TOGGLE, depth);
    let values = eval_bits(&unrolled);

    // Reference: s(0) = 0, s(t+1) = !s(t).
    let mut reference = Vec::new();
    let mut s = false;
    for _ in 0..=depth {
        reference.push(s);
        s = !s;
    }

    for node in unrolled.iter() {
        let Some((UnrollRole::State, orig, time)) =
            node.symbol.as_deref().and_then(parse_unrolled_symbol)
        else {
            continue;
        };
        assert_eq!(orig, 3);
        assert_eq!(
            values[&node.id], reference[time as usize],
            "state copy at time {time}"
        );
    }
}

#[test]
fn bad_copies_track_state_values() {
    let unrolled = unroll_to_netlist(TOGGLE, 2);
    let values = eval_bits(&unrolled);
    let bad_values: Vec<bool> = unrolled
        .iter()
        .filter(|n| n.tag == Tag::Bad)
        .map(|n| {
            let r = n.args[0];
            values[&(r.unsigned_abs() as i64)] ^ (r < 0)
        })
        .collect();
    // s@0 = 0, s@1 = 1, s@2 = 0: the property is violable exactly at t=1.
    assert_eq!(bad_values, vec![false, true, false]);
}

#[test]
fn every_operand_points_backward() {
    // Topological closure of the unrolled output: all references resolve
    // to earlier lines (the strict parser would reject anything else, so
    // parsing is the check; assert the shape explicitly anyway).
    let unrolled = unroll_to_netlist(TOGGLE, 3);
    for node in unrolled.iter() {
        for &arg in &node.args {
            assert!((arg.unsigned_abs() as i64) < node.id);
        }
    }
}
