// SPDX-License-Identifier: Apache-2.0

//! Reader for the line-oriented word-level netlist format.
//!
//! The reader is intentionally strict: ids must be strictly increasing,
//! every reference must resolve to an already-defined node of the right
//! kind, and constant payloads must fit their sort. Failing fast here lets
//! every later stage rely on the IR invariants instead of re-checking them.

use std::io::{BufRead, BufReader, Read};

use crate::bv::BitVec;
use crate::error::{Result, SweepError};
use crate::word::netlist::{Netlist, Node, SortKind, Tag};

const UNSUPPORTED_OPS: &[&str] = &[
    "fair", "justice", "rol", "ror", "saddo", "sdivo", "smod", "smulo", "ssubo", "uaddo", "umulo",
    "usubo",
];

pub fn parse_netlist<R: Read>(reader: R, path: &str) -> Result<Netlist> {
    let mut netlist = Netlist::new();
    let mut last_id = 0i64;
    for (lineno, line) in BufReader::new(reader).lines().enumerate() {
        let lineno = lineno as u64 + 1;
        let line = line.map_err(|e| SweepError::parse(path, lineno, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        let node = parse_line(&netlist, trimmed, path, lineno)?;
        if node.id <= last_id {
            return Err(SweepError::parse(
                path,
                lineno,
                format!("id {} is not increasing (previous {})", node.id, last_id),
            ));
        }
        last_id = node.id;
        let (tag, args) = (node.tag, node.args.clone());
        netlist.insert(node);
        // Fill init/next back-references on the defined state.
        if matches!(tag, Tag::Init | Tag::Next) {
            let state = netlist.get_mut(args[0]).unwrap();
            match tag {
                Tag::Init => state.init = Some(args[1]),
                Tag::Next => state.next = Some(args[1]),
                _ => unreachable!(),
            }
        }
    }
    for node in netlist.iter() {
        if node.tag == Tag::State && node.next.is_none() {
            log::warn!("state {} without next function", node.id);
        }
    }
    Ok(netlist)
}

pub fn parse_netlist_str(text: &str) -> Result<Netlist> {
    parse_netlist(text.as_bytes(), "<string>")
}

fn parse_line(netlist: &Netlist, line: &str, path: &str, lineno: u64) -> Result<Node> {
    let err = |msg: String| SweepError::parse(path, lineno, msg);
    let mut tokens = line.split_whitespace();

    let id_tok = tokens.next().ok_or_else(|| err("empty line".to_string()))?;
    let id: i64 = id_tok
        .parse()
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| err(format!("invalid node id '{id_tok}'")))?;

    let op = tokens
        .next()
        .ok_or_else(|| err(format!("missing operator after id {id}")))?;
    if UNSUPPORTED_OPS.contains(&op) {
        return Err(SweepError::UnsupportedConstruct(format!(
            "'{op}' at line {lineno} of '{path}'"
        )));
    }
    let tag = Tag::from_name(op).ok_or_else(|| err(format!("unknown operator '{op}'")))?;

    let mut node = Node::new(id, tag);

    let next_int = |what: &str, tokens: &mut std::str::SplitWhitespace<'_>| -> Result<i64> {
        let tok = tokens
            .next()
            .ok_or_else(|| err(format!("missing {what} in '{op}' line {id}")))?;
        tok.parse::<i64>()
            .map_err(|_| err(format!("invalid {what} '{tok}' in '{op}' line {id}")))
    };

    if tag == Tag::Sort {
        let kind = tokens
            .next()
            .ok_or_else(|| err(format!("missing sort kind in line {id}")))?;
        node.sort_kind = Some(match kind {
            "bitvec" => {
                let width = next_int("width", &mut tokens)?;
                if width <= 0 || width > u32::MAX as i64 {
                    return Err(err(format!("invalid bitvec width {width}")));
                }
                SortKind::BitVec {
                    width: width as u32,
                }
            }
            "array" => {
                let index = next_int("index sort", &mut tokens)?;
                let element = next_int("element sort", &mut tokens)?;
                for sid in [index, element] {
                    if netlist.bitvec_width(sid).is_none() {
                        return Err(err(format!(
                            "array sort {id} references non-bitvec sort {sid}"
                        )));
                    }
                }
                SortKind::Array { index, element }
            }
            other => return Err(err(format!("unsupported sort '{other}'"))),
        });
    } else {
        if tag.has_sort() {
            let sid = next_int("sort id", &mut tokens)?;
            if netlist.get(sid).map(|n| n.tag) != Some(Tag::Sort) {
                return Err(err(format!("line {id} references non-sort id {sid}")));
            }
            node.sort = sid;
        }
        for i in 0..tag.arity() {
            let arg = next_int("argument", &mut tokens)?;
            let target = arg.unsigned_abs() as i64;
            if netlist.get(target).is_none() {
                return Err(err(format!(
                    "line {id} argument {i} references undefined node {arg}"
                )));
            }
            node.args.push(arg);
        }
        for _ in 0..tag.imm_count() {
            node.imm.push(next_int("immediate", &mut tokens)?);
        }
    }

    match tag {
        Tag::Const | Tag::Constd | Tag::Consth => {
            let payload = tokens
                .next()
                .ok_or_else(|| err(format!("missing constant payload in line {id}")))?;
            let width = netlist
                .bitvec_width(node.sort)
                .ok_or_else(|| err(format!("constant {id} has non-bitvec sort")))?;
            let parsed = match tag {
                Tag::Const => BitVec::from_binary_str(payload, width),
                Tag::Constd => BitVec::from_decimal_str(payload, width),
                Tag::Consth => BitVec::from_hex_str(payload, width),
                _ => unreachable!(),
            };
            if parsed.is_none() {
                return Err(err(format!(
                    "constant payload '{payload}' does not fit sort of width {width}"
                )));
            }
            node.constant = Some(payload.to_string());
        }
        Tag::Init | Tag::Next => {
            let state_id = node.args[0];
            if state_id <= 0 || netlist.get(state_id).map(|n| n.tag) != Some(Tag::State) {
                return Err(err(format!(
                    "'{op}' line {id} does not target a state node ({state_id})"
                )));
            }
        }
        Tag::Slice => {
            let (hi, lo) = (node.imm[0], node.imm[1]);
            let arg_width = netlist
                .get(node.args[0].unsigned_abs() as i64)
                .and_then(|n| netlist.bitvec_width(n.sort));
            let own_width = netlist.bitvec_width(node.sort);
            match (arg_width, own_width) {
                (Some(aw), Some(ow))
                    if lo >= 0 && hi >= lo && hi < aw as i64 && ow as i64 == hi - lo + 1 => {}
                _ => {
                    return Err(err(format!(
                        "slice {id} indices [{hi}:{lo}] inconsistent with sorts"
                    )))
                }
            }
        }
        Tag::Sext | Tag::Uext => {
            let pad = node.imm[0];
            let arg_width = netlist
                .get(node.args[0].unsigned_abs() as i64)
                .and_then(|n| netlist.bitvec_width(n.sort));
            let own_width = netlist.bitvec_width(node.sort);
            match (arg_width, own_width) {
                (Some(aw), Some(ow)) if pad >= 0 && aw as i64 + pad == ow as i64 => {}
                _ => {
                    return Err(err(format!(
                        "extension {id} padding {pad} inconsistent with sorts"
                    )))
                }
            }
        }
        _ => {}
    }

    if let Some(symbol) = tokens.next() {
        node.symbol = Some(symbol.to_string());
    }
    if let Some(extra) = tokens.next() {
        return Err(err(format!("trailing token '{extra}' in line {id}")));
    }

    Ok(node)
}
