// SPDX-License-Identifier: Apache-2.0

//! Bit-level (And–Inverter Graph) support.

pub mod cnf;
pub mod extract;
pub mod merge;
pub mod model;
pub mod sim;
pub mod twosat;
