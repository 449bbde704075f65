// SPDX-License-Identifier: Apache-2.0

//! And–Inverter Graph model with AIGER reading and writing.
//!
//! Wires are addressed by `Literal`: variable v owns literals 2v (plain)
//! and 2v+1 (inverted); literal 0 is constant false, literal 1 constant
//! true. The model mirrors the AIGER 1.9 sections this pipeline consumes:
//! inputs, outputs, bad properties, environment constraints and AND gates.
//! Latches are rejected at load; justice and fairness sections are read,
//! warned about and dropped. `reencode` must run before any processing so
//! downstream stages can rely on dense, topologically ordered literals.

use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};

use crate::error::{Result, SweepError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(pub u32);

impl Literal {
    pub const FALSE: Literal = Literal(0);
    pub const TRUE: Literal = Literal(1);

    pub fn from_var(var: u32, negated: bool) -> Literal {
        Literal(var << 1 | negated as u32)
    }

    pub fn var(self) -> u32 {
        self.0 >> 1
    }

    pub fn sign(self) -> bool {
        self.0 & 1 == 1
    }

    #[must_use]
    pub fn negate(self) -> Literal {
        Literal(self.0 ^ 1)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_const(self) -> bool {
        self.0 < 2
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AigAnd {
    pub lhs: Literal,
    pub rhs0: Literal,
    pub rhs1: Literal,
}

/// A named wire in one of the model's interface sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AigSignal {
    pub literal: Literal,
    pub name: Option<String>,
}

impl AigSignal {
    pub fn new(literal: Literal) -> AigSignal {
        AigSignal {
            literal,
            name: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AigModel {
    pub maxvar: u32,
    pub inputs: Vec<AigSignal>,
    pub outputs: Vec<AigSignal>,
    pub bads: Vec<AigSignal>,
    pub constraints: Vec<AigSignal>,
    pub ands: Vec<AigAnd>,
}

impl AigModel {
    pub fn literal_count(&self) -> usize {
        2 * (self.maxvar as usize + 1)
    }

    fn validate(&self, path: &str) -> Result<()> {
        let nvars = self.maxvar as usize + 1;
        let mut defined = vec![false; nvars];
        defined[0] = true;
        for input in &self.inputs {
            if input.literal.sign() || input.literal.is_const() {
                return Err(SweepError::parse(
                    path,
                    0,
                    format!("input literal {} must be a positive variable", input.literal),
                ));
            }
            if std::mem::replace(&mut defined[input.literal.var() as usize], true) {
                return Err(SweepError::parse(
                    path,
                    0,
                    format!("variable {} defined twice", input.literal.var()),
                ));
            }
        }
        for and in &self.ands {
            if and.lhs.sign() || and.lhs.is_const() {
                return Err(SweepError::parse(
                    path,
                    0,
                    format!("AND lhs literal {} must be even and non-constant", and.lhs),
                ));
            }
            if std::mem::replace(&mut defined[and.lhs.var() as usize], true) {
                return Err(SweepError::parse(
                    path,
                    0,
                    format!("variable {} defined twice", and.lhs.var()),
                ));
            }
        }
        let check = |lit: Literal| -> Result<()> {
            if lit.var() > self.maxvar {
                return Err(SweepError::parse(
                    path,
                    0,
                    format!("literal {lit} exceeds maxvar {}", self.maxvar),
                ));
            }
            Ok(())
        };
        for and in &self.ands {
            check(and.rhs0)?;
            check(and.rhs1)?;
        }
        for signal in self
            .inputs
            .iter()
            .chain(&self.outputs)
            .chain(&self.bads)
            .chain(&self.constraints)
        {
            check(signal.literal)?;
        }
        for lit in self
            .ands
            .iter()
            .flat_map(|a| [a.rhs0, a.rhs1])
            .chain(
                self.outputs
                    .iter()
                    .chain(&self.bads)
                    .chain(&self.constraints)
                    .map(|s| s.literal),
            )
        {
            if !lit.is_const() && !defined[lit.var() as usize] {
                return Err(SweepError::parse(
                    path,
                    0,
                    format!("literal {lit} references undefined variable"),
                ));
            }
        }
        Ok(())
    }

    /// Renumbers variables densely and topologically: inputs keep their
    /// order as variables 1..=I, then every AND reachable from an output,
    /// bad or constraint follows in dependency order. Unreachable ANDs are
    /// dropped.
    pub fn reencode(&mut self) -> Result<()> {
        let mut and_of_var: Vec<Option<usize>> = vec![None; self.maxvar as usize + 1];
        for (i, and) in self.ands.iter().enumerate() {
            and_of_var[and.lhs.var() as usize] = Some(i);
        }

        let mut new_var: Vec<Option<u32>> = vec![None; self.maxvar as usize + 1];
        new_var[0] = Some(0);
        for (i, input) in self.inputs.iter().enumerate() {
            new_var[input.literal.var() as usize] = Some(i as u32 + 1);
        }

        let mut next_var = self.inputs.len() as u32;
        let mut new_ands: Vec<AigAnd> = Vec::with_capacity(self.ands.len());
        // Iterative post-order over the AND DAG; an on-stack marker catches
        // combinational cycles.
        let mut on_stack = vec![false; self.maxvar as usize + 1];
        let roots: Vec<Literal> = self
            .outputs
            .iter()
            .chain(&self.bads)
            .chain(&self.constraints)
            .map(|s| s.literal)
            .collect();
        let map_lit = |lit: Literal, new_var: &[Option<u32>]| -> Literal {
            Literal::from_var(
                new_var[lit.var() as usize].expect("operand mapped before user"),
                lit.sign(),
            )
        };
        for root in roots {
            let mut stack: Vec<(u32, bool)> = vec![(root.var(), false)];
            while let Some((var, expanded)) = stack.pop() {
                if new_var[var as usize].is_some() {
                    continue;
                }
                let Some(and_idx) = and_of_var[var as usize] else {
                    return Err(SweepError::parse(
                        "<aig>",
                        0,
                        format!("variable {var} is neither an input nor an AND"),
                    ));
                };
                let and = self.ands[and_idx];
                if expanded {
                    on_stack[var as usize] = false;
                    next_var += 1;
                    new_var[var as usize] = Some(next_var);
                    let mut rhs0 = map_lit(and.rhs0, &new_var);
                    let mut rhs1 = map_lit(and.rhs1, &new_var);
                    if rhs0 < rhs1 {
                        std::mem::swap(&mut rhs0, &mut rhs1);
                    }
                    new_ands.push(AigAnd {
                        lhs: Literal::from_var(next_var, false),
                        rhs0,
                        rhs1,
                    });
                } else {
                    if on_stack[var as usize] {
                        return Err(SweepError::UnsupportedConstruct(format!(
                            "cyclic AND definition through variable {var}"
                        )));
                    }
                    on_stack[var as usize] = true;
                    stack.push((var, true));
                    for rhs in [and.rhs0, and.rhs1] {
                        if !rhs.is_const() && new_var[rhs.var() as usize].is_none() {
                            stack.push((rhs.var(), false));
                        }
                    }
                }
            }
        }

        let remap_signal = |signal: &mut AigSignal| {
            signal.literal = Literal::from_var(
                new_var[signal.literal.var() as usize].expect("interface literal reachable"),
                signal.literal.sign(),
            );
        };
        for input in self.inputs.iter_mut() {
            remap_signal(input);
        }
        for signal in self
            .outputs
            .iter_mut()
            .chain(self.bads.iter_mut())
            .chain(self.constraints.iter_mut())
        {
            remap_signal(signal);
        }
        self.ands = new_ands;
        self.maxvar = next_var;
        Ok(())
    }
}

fn warn_liveness(justice: u64, fairness: u64) {
    if justice > 0 {
        log::warn!("ignoring {justice} justice properties");
    }
    if fairness > 0 {
        log::warn!("ignoring {fairness} fairness constraints");
    }
}

struct Header {
    maxvar: u32,
    inputs: u64,
    latches: u64,
    outputs: u64,
    ands: u64,
    bads: u64,
    constraints: u64,
    justice: u64,
    fairness: u64,
}

fn parse_header(line: &str, path: &str, binary: bool) -> Result<Header> {
    let mut tokens = line.split_whitespace();
    let magic = tokens.next().unwrap_or("");
    let expected = if binary { "aig" } else { "aag" };
    if magic != expected {
        return Err(SweepError::parse(
            path,
            1,
            format!("expected '{expected}' header, got '{magic}'"),
        ));
    }
    let mut numbers = Vec::new();
    for tok in tokens {
        let v: u64 = tok
            .parse()
            .map_err(|_| SweepError::parse(path, 1, format!("invalid header field '{tok}'")))?;
        numbers.push(v);
    }
    if numbers.len() < 5 || numbers.len() > 9 {
        return Err(SweepError::parse(
            path,
            1,
            format!("header has {} fields, expected 5 to 9", numbers.len()),
        ));
    }
    numbers.resize(9, 0);
    let header = Header {
        maxvar: numbers[0] as u32,
        inputs: numbers[1],
        latches: numbers[2],
        outputs: numbers[3],
        ands: numbers[4],
        bads: numbers[5],
        constraints: numbers[6],
        justice: numbers[7],
        fairness: numbers[8],
    };
    if header.latches != 0 {
        return Err(SweepError::UnsupportedConstruct(
            "can not handle latches".to_string(),
        ));
    }
    Ok(header)
}

fn read_lines_into_model(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    header: &Header,
    path: &str,
    binary: bool,
) -> Result<AigModel> {
    let mut model = AigModel {
        maxvar: header.maxvar,
        ..Default::default()
    };
    let mut next_line = |what: &str| -> Result<String> {
        loop {
            match lines.next() {
                Some(Ok(line)) => {
                    if !line.trim().is_empty() {
                        return Ok(line);
                    }
                }
                Some(Err(e)) => return Err(SweepError::parse(path, 0, e.to_string())),
                None => {
                    return Err(SweepError::parse(
                        path,
                        0,
                        format!("unexpected EOF while reading {what}"),
                    ))
                }
            }
        }
    };
    let parse_lit = |line: &str, what: &str| -> Result<Literal> {
        let v: u32 = line
            .trim()
            .parse()
            .map_err(|_| SweepError::parse(path, 0, format!("invalid {what} literal '{line}'")))?;
        Ok(Literal(v))
    };

    if binary {
        for i in 0..header.inputs {
            model
                .inputs
                .push(AigSignal::new(Literal::from_var(i as u32 + 1, false)));
        }
    } else {
        for _ in 0..header.inputs {
            let line = next_line("inputs")?;
            model
                .inputs
                .push(AigSignal::new(parse_lit(&line, "input")?));
        }
    }
    for _ in 0..header.outputs {
        let line = next_line("outputs")?;
        model
            .outputs
            .push(AigSignal::new(parse_lit(&line, "output")?));
    }
    for _ in 0..header.bads {
        let line = next_line("bad properties")?;
        model.bads.push(AigSignal::new(parse_lit(&line, "bad")?));
    }
    for _ in 0..header.constraints {
        let line = next_line("constraints")?;
        model
            .constraints
            .push(AigSignal::new(parse_lit(&line, "constraint")?));
    }
    // Justice and fairness records are consumed and dropped.
    let mut justice_sizes = Vec::new();
    for _ in 0..header.justice {
        let line = next_line("justice sizes")?;
        let v: u64 = line.trim().parse().map_err(|_| {
            SweepError::parse(path, 0, format!("invalid justice size '{line}'"))
        })?;
        justice_sizes.push(v);
    }
    for size in justice_sizes {
        for _ in 0..size {
            next_line("justice literals")?;
        }
    }
    for _ in 0..header.fairness {
        next_line("fairness literals")?;
    }
    warn_liveness(header.justice, header.fairness);

    if !binary {
        for _ in 0..header.ands {
            let line = next_line("AND definitions")?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(SweepError::parse(
                    path,
                    0,
                    format!("AND line should have 3 fields, got '{line}'"),
                ));
            }
            model.ands.push(AigAnd {
                lhs: parse_lit(fields[0], "AND lhs")?,
                rhs0: parse_lit(fields[1], "AND rhs0")?,
                rhs1: parse_lit(fields[2], "AND rhs1")?,
            });
        }
    }
    Ok(model)
}

fn apply_symbol_table(
    model: &mut AigModel,
    lines: impl Iterator<Item = std::io::Result<String>>,
    path: &str,
) -> Result<()> {
    for line in lines {
        let line = line.map_err(|e| SweepError::parse(path, 0, e.to_string()))?;
        // A bare "c" opens the comment section; "c<idx> <name>" is a
        // constraint symbol.
        if line.trim_end() == "c" {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let (kind, rest) = line.split_at(1);
        let mut parts = rest.splitn(2, ' ');
        let (Some(idx), Some(name)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(idx) = idx.parse::<usize>() else {
            continue;
        };
        let section = match kind {
            "i" => &mut model.inputs,
            "o" => &mut model.outputs,
            "b" => &mut model.bads,
            "c" => &mut model.constraints,
            _ => continue,
        };
        if let Some(signal) = section.get_mut(idx) {
            signal.name = Some(name.to_string());
        }
    }
    Ok(())
}

/// Reads an ASCII AIGER ("aag") model.
pub fn read_ascii<R: Read>(reader: R, path: &str) -> Result<AigModel> {
    let mut lines = BufReader::new(reader).lines();
    let first = match lines.next() {
        Some(Ok(line)) => line,
        Some(Err(e)) => return Err(SweepError::parse(path, 1, e.to_string())),
        None => return Err(SweepError::parse(path, 1, "empty AIGER input".to_string())),
    };
    let header = parse_header(&first, path, false)?;
    let mut model = read_lines_into_model(&mut lines, &header, path, false)?;
    apply_symbol_table(&mut model, lines, path)?;
    model.validate(path)?;
    Ok(model)
}

/// Reads a binary AIGER ("aig") model.
pub fn read_binary<R: Read>(mut reader: R, path: &str) -> Result<AigModel> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| SweepError::parse(path, 0, e.to_string()))?;
    let header_end = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| SweepError::parse(path, 1, "missing header line".to_string()))?;
    let header_line = std::str::from_utf8(&bytes[..header_end])
        .map_err(|e| SweepError::parse(path, 1, e.to_string()))?;
    let header = parse_header(header_line, path, true)?;

    // The sections between header and AND block are ASCII lines.
    let mut pos = header_end + 1;
    let ascii_line_count = header.outputs
        + header.bads
        + header.constraints
        + header.justice
        + header.fairness;
    let mut ascii_end = pos;
    let mut seen = 0u64;
    let mut justice_extra = 0u64;
    while seen < ascii_line_count + justice_extra {
        let nl = bytes[ascii_end..]
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| {
                SweepError::parse(path, 0, "unexpected EOF in section lines".to_string())
            })?;
        // Justice size lines announce extra literal lines.
        let line_index = seen;
        let justice_begin = header.outputs + header.bads + header.constraints;
        if line_index >= justice_begin && line_index < justice_begin + header.justice {
            let line = std::str::from_utf8(&bytes[ascii_end..ascii_end + nl])
                .map_err(|e| SweepError::parse(path, 0, e.to_string()))?;
            let v: u64 = line.trim().parse().map_err(|_| {
                SweepError::parse(path, 0, format!("invalid justice size '{line}'"))
            })?;
            justice_extra += v;
        }
        ascii_end += nl + 1;
        seen += 1;
    }
    let section_text = std::str::from_utf8(&bytes[pos..ascii_end])
        .map_err(|e| SweepError::parse(path, 0, e.to_string()))?;
    let mut section_lines = section_text
        .lines()
        .map(|l| Ok(l.to_string()))
        .collect::<Vec<std::io::Result<String>>>()
        .into_iter();
    let mut model = read_lines_into_model(&mut section_lines, &header, path, true)?;
    pos = ascii_end;

    // Delta-coded AND section.
    let mut take_varint = || -> Result<u32> {
        let mut shift = 0u32;
        let mut value = 0u32;
        loop {
            let byte = *bytes.get(pos).ok_or_else(|| {
                SweepError::parse(path, 0, "unexpected EOF in AND section".to_string())
            })?;
            pos += 1;
            value |= ((byte & 0x7f) as u32) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    };
    for i in 0..header.ands {
        let lhs = Literal::from_var(header.inputs as u32 + i as u32 + 1, false);
        let delta0 = take_varint()?;
        let delta1 = take_varint()?;
        let rhs0 = Literal(lhs.0.checked_sub(delta0).ok_or_else(|| {
            SweepError::parse(path, 0, format!("invalid delta {delta0} at AND {i}"))
        })?);
        let rhs1 = Literal(rhs0.0.checked_sub(delta1).ok_or_else(|| {
            SweepError::parse(path, 0, format!("invalid delta {delta1} at AND {i}"))
        })?);
        model.ands.push(AigAnd { lhs, rhs0, rhs1 });
    }

    let tail = std::str::from_utf8(&bytes[pos..]).unwrap_or("");
    apply_symbol_table(
        &mut model,
        tail.lines().map(|l| Ok(l.to_string())),
        path,
    )?;
    model.validate(path)?;
    Ok(model)
}

/// Reads either AIGER flavor, keyed on the magic bytes.
pub fn read_auto<R: Read>(mut reader: R, path: &str) -> Result<AigModel> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| SweepError::parse(path, 0, e.to_string()))?;
    if bytes.starts_with(b"aig ") {
        read_binary(&bytes[..], path)
    } else {
        read_ascii(&bytes[..], path)
    }
}

fn write_symbols_and_sections<W: Write>(w: &mut W, model: &AigModel) -> std::io::Result<()> {
    for (section, signals) in [
        ("i", &model.inputs),
        ("o", &model.outputs),
        ("b", &model.bads),
        ("c", &model.constraints),
    ] {
        for (i, signal) in signals.iter().enumerate() {
            if let Some(name) = &signal.name {
                writeln!(w, "{section}{i} {name}")?;
            }
        }
    }
    Ok(())
}

fn header_counts(model: &AigModel) -> String {
    let mut s = format!(
        "{} {} 0 {} {}",
        model.maxvar,
        model.inputs.len(),
        model.outputs.len(),
        model.ands.len()
    );
    if !model.bads.is_empty() || !model.constraints.is_empty() {
        s.push_str(&format!(" {}", model.bads.len()));
        if !model.constraints.is_empty() {
            s.push_str(&format!(" {}", model.constraints.len()));
        }
    }
    s
}

/// Writes the model in ASCII AIGER form.
pub fn write_ascii<W: Write>(w: &mut W, model: &AigModel) -> std::io::Result<()> {
    writeln!(w, "aag {}", header_counts(model))?;
    for input in &model.inputs {
        writeln!(w, "{}", input.literal)?;
    }
    for section in [&model.outputs, &model.bads, &model.constraints] {
        for signal in section {
            writeln!(w, "{}", signal.literal)?;
        }
    }
    for and in &model.ands {
        writeln!(w, "{} {} {}", and.lhs, and.rhs0, and.rhs1)?;
    }
    write_symbols_and_sections(w, model)
}

fn push_varint(mut value: u32, out: &mut Vec<u8>) {
    while value & !0x7f != 0 {
        out.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.push((value & 0x7f) as u8);
}

/// Writes the model in binary AIGER form. The model must be reencoded:
/// inputs occupy variables 1..=I and AND lhs variables follow densely.
pub fn write_binary<W: Write>(w: &mut W, model: &AigModel) -> std::io::Result<()> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(format!("aig {}\n", header_counts(model)).as_bytes());
    for section in [&model.outputs, &model.bads, &model.constraints] {
        for signal in section {
            bytes.extend_from_slice(format!("{}\n", signal.literal).as_bytes());
        }
    }
    for (i, and) in model.ands.iter().enumerate() {
        let expected = Literal::from_var(model.inputs.len() as u32 + i as u32 + 1, false);
        debug_assert!(
            and.lhs == expected,
            "binary AIGER requires reencoded lhs order ({} vs {})",
            and.lhs,
            expected
        );
        let (rhs0, rhs1) = if and.rhs0 >= and.rhs1 {
            (and.rhs0, and.rhs1)
        } else {
            (and.rhs1, and.rhs0)
        };
        push_varint(and.lhs.0 - rhs0.0, &mut bytes);
        push_varint(rhs0.0 - rhs1.0, &mut bytes);
    }
    w.write_all(&bytes)?;
    write_symbols_and_sections(w, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_and_model() -> AigModel {
        // 6 = 2 & 4, 8 = !6 & 4, bad 8, constraint 2.
        AigModel {
            maxvar: 4,
            inputs: vec![
                AigSignal::new(Literal(2)),
                AigSignal::new(Literal(4)),
            ],
            outputs: vec![],
            bads: vec![AigSignal::new(Literal(8))],
            constraints: vec![AigSignal::new(Literal(2))],
            ands: vec![
                AigAnd {
                    lhs: Literal(6),
                    rhs0: Literal(2),
                    rhs1: Literal(4),
                },
                AigAnd {
                    lhs: Literal(8),
                    rhs0: Literal(7),
                    rhs1: Literal(4),
                },
            ],
        }
    }

    #[test]
    fn literal_encoding() {
        let lit = Literal::from_var(5, true);
        assert_eq!(lit.0, 11);
        assert_eq!(lit.var(), 5);
        assert!(lit.sign());
        assert_eq!(lit.negate().0, 10);
        assert!(Literal::FALSE.is_const() && Literal::TRUE.is_const());
    }

    #[test]
    fn ascii_roundtrip() {
        let model = two_and_model();
        let mut out = Vec::new();
        write_ascii(&mut out, &model).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("aag 4 2 0 0 2 1 1\n"));
        let loaded = read_ascii(&out[..], "<t>").unwrap();
        assert_eq!(loaded.ands, model.ands);
        assert_eq!(loaded.bads[0].literal, Literal(8));
        assert_eq!(loaded.constraints[0].literal, Literal(2));
    }

    #[test]
    fn binary_roundtrip_after_reencode() {
        let mut model = two_and_model();
        model.reencode().unwrap();
        let mut out = Vec::new();
        write_binary(&mut out, &model).unwrap();
        let loaded = read_binary(&out[..], "<t>").unwrap();
        assert_eq!(loaded.ands, model.ands);
        assert_eq!(loaded.maxvar, model.maxvar);
        assert_eq!(loaded.bads[0].literal, model.bads[0].literal);
    }

    #[test]
    fn reencode_drops_unreachable_and_orders() {
        let mut model = two_and_model();
        // An extra AND nobody references.
        model.maxvar = 5;
        model.ands.push(AigAnd {
            lhs: Literal(10),
            rhs0: Literal(3),
            rhs1: Literal(5),
        });
        model.reencode().unwrap();
        assert_eq!(model.ands.len(), 2);
        assert_eq!(model.maxvar, 4);
        for (i, and) in model.ands.iter().enumerate() {
            assert_eq!(and.lhs.var() as usize, model.inputs.len() + i + 1);
            assert!(and.rhs0 >= and.rhs1);
            assert!(and.rhs0 < and.lhs);
        }
    }

    #[test]
    fn latches_rejected() {
        let text = "aag 1 0 1 0 0\n2 3\n";
        assert!(matches!(
            read_ascii(text.as_bytes(), "<t>"),
            Err(SweepError::UnsupportedConstruct(_))
        ));
    }

    #[test]
    fn undefined_reference_rejected() {
        let text = "aag 3 1 0 1 1\n2\n6\n6 2 4\n";
        assert!(read_ascii(text.as_bytes(), "<t>").is_err());
    }

    #[test]
    fn symbols_survive_roundtrip() {
        let mut model = two_and_model();
        model.inputs[0].name = Some("clk_en".to_string());
        model.bads[0].name = Some("overflow".to_string());
        let mut out = Vec::new();
        write_ascii(&mut out, &model).unwrap();
        let loaded = read_ascii(&out[..], "<t>").unwrap();
        assert_eq!(loaded.inputs[0].name.as_deref(), Some("clk_en"));
        assert_eq!(loaded.bads[0].name.as_deref(), Some("overflow"));
    }
}
