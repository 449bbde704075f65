// SPDX-License-Identifier: Apache-2.0

//! Simulation values: bit-vectors and array models.
//!
//! An array model is a sparse store map over index bit-strings. Indices
//! absent from the map read as the constant-init scalar when one is set, as
//! a per-index pseudo-random value derived from the model's random seed when
//! one is set, and as zero otherwise. Writes are functional (copy + insert)
//! so one round's intermediate arrays never alias another's.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::bv::BitVec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayModel {
    pub index_width: u32,
    pub element_width: u32,
    pub data: BTreeMap<String, BitVec>,
    pub const_init: Option<BitVec>,
    pub random_seed: Option<u64>,
}

impl ArrayModel {
    pub fn new(index_width: u32, element_width: u32) -> Self {
        ArrayModel {
            index_width,
            element_width,
            data: BTreeMap::new(),
            const_init: None,
            random_seed: None,
        }
    }

    fn default_element(&self, key: &str) -> BitVec {
        if let Some(init) = &self.const_init {
            return init.clone();
        }
        if let Some(seed) = self.random_seed {
            // Per-index deterministic randomness: the seed and the index
            // bits select the element, so repeated reads agree.
            let mut h = seed ^ 0xcbf2_9ce4_8422_2325;
            for b in key.bytes() {
                h = h.wrapping_mul(0x0000_0100_0000_01b3) ^ (b as u64);
            }
            let mut rng = Xoshiro256StarStar::seed_from_u64(h);
            return BitVec::random(&mut rng, self.element_width);
        }
        BitVec::zero(self.element_width)
    }

    pub fn read(&self, index: &BitVec) -> BitVec {
        assert!(
            index.width() == self.index_width,
            "array index width mismatch: {} vs {}",
            index.width(),
            self.index_width
        );
        let key = index.to_binary_string();
        match self.data.get(&key) {
            Some(element) => element.clone(),
            None => self.default_element(&key),
        }
    }

    pub fn write(&self, index: &BitVec, element: &BitVec) -> ArrayModel {
        assert!(index.width() == self.index_width);
        assert!(element.width() == self.element_width);
        let mut next = self.clone();
        next.data.insert(index.to_binary_string(), element.clone());
        next
    }

    /// Extensional equality: the default sources must agree and every index
    /// either model pins must read equal through both.
    pub fn eq(&self, other: &ArrayModel) -> BitVec {
        if self.index_width != other.index_width
            || self.element_width != other.element_width
            || self.const_init != other.const_init
            || self.random_seed != other.random_seed
        {
            return BitVec::zero(1);
        }
        for key in self.data.keys().chain(other.data.keys()) {
            let a = self
                .data
                .get(key)
                .cloned()
                .unwrap_or_else(|| self.default_element(key));
            let b = other
                .data
                .get(key)
                .cloned()
                .unwrap_or_else(|| other.default_element(key));
            if a != b {
                return BitVec::zero(1);
            }
        }
        BitVec::one(1)
    }

    pub fn neq(&self, other: &ArrayModel) -> BitVec {
        self.eq(other).not()
    }

    pub fn ite(cond: &BitVec, then_m: &ArrayModel, else_m: &ArrayModel) -> ArrayModel {
        if cond.is_zero() {
            else_m.clone()
        } else {
            then_m.clone()
        }
    }
}

/// Tagged union of the two value kinds flowing through simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimValue {
    BitVec(BitVec),
    Array(ArrayModel),
}

impl SimValue {
    pub fn as_bv(&self) -> Option<&BitVec> {
        match self {
            SimValue::BitVec(bv) => Some(bv),
            SimValue::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayModel> {
        match self {
            SimValue::Array(am) => Some(am),
            SimValue::BitVec(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let am = ArrayModel::new(4, 8);
        let idx = BitVec::from_u64(4, 3);
        let val = BitVec::from_u64(8, 0xab);
        let am2 = am.write(&idx, &val);
        assert_eq!(am2.read(&idx), val);
        // Original untouched.
        assert!(am.read(&idx).is_zero());
    }

    #[test]
    fn const_init_fills_unwritten() {
        let mut am = ArrayModel::new(4, 8);
        am.const_init = Some(BitVec::from_u64(8, 0x5a));
        assert_eq!(am.read(&BitVec::from_u64(4, 9)).to_u64_lossy(), 0x5a);
    }

    #[test]
    fn random_seed_reads_are_stable() {
        let mut am = ArrayModel::new(8, 16);
        am.random_seed = Some(42);
        let idx = BitVec::from_u64(8, 200);
        assert_eq!(am.read(&idx), am.read(&idx));
        // Different seeds give (almost surely) different contents.
        let mut bm = ArrayModel::new(8, 16);
        bm.random_seed = Some(43);
        assert!(am.eq(&bm).is_zero());
    }

    #[test]
    fn extensional_eq() {
        let am = ArrayModel::new(4, 8);
        let idx = BitVec::from_u64(4, 1);
        let a = am.write(&idx, &BitVec::from_u64(8, 7));
        let b = am.write(&idx, &BitVec::from_u64(8, 7));
        assert!(!a.eq(&b).is_zero());
        let c = am.write(&idx, &BitVec::from_u64(8, 8));
        assert!(a.eq(&c).is_zero());
        // A written-back default is still equal to the empty model.
        let d = am.write(&idx, &BitVec::zero(8));
        assert!(!d.eq(&am).is_zero());
    }
}
