//! Deterministic content hashing.
//!
//! A container's hash is a polynomial accumulation (multiplier 31) over its
//! keys and children, seeded by its type tag and finished with murmur3's
//! `fmix32`. Text and field names go through 32-bit FNV-1a. Nothing here
//! depends on pointer values, platform width or process state.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::container::ContainerKind;
use crate::metrics::inc_metric;

const RECORD_SEED: u32 = 0x5265_6364;
const SEQUENCE_SEED: u32 = 0x5365_7175;
const MULTIPLIER: u32 = 31;

pub(crate) const NULL_HASH: u32 = 0x6e75_6c6c;
pub(crate) const TRUE_HASH: u32 = 1231;
pub(crate) const FALSE_HASH: u32 = 1237;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Marks the cache slot as filled; the low 32 bits hold the hash.
const COMPUTED: u64 = 1 << 32;

/// Lazily filled per-container hash slot.
///
/// Concurrent first readers may each compute the hash. The computation is
/// deterministic, so every store writes the same bits and no lock is needed.
#[derive(Debug, Default)]
pub(crate) struct HashCell(AtomicU64);

impl HashCell {
    pub(crate) const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> u32) -> u32 {
        let cached = self.0.load(Ordering::Relaxed);
        if cached & COMPUTED != 0 {
            return cached as u32;
        }
        let hash = compute();
        inc_metric!(HASHES_COMPUTED);
        self.0.store(COMPUTED | u64::from(hash), Ordering::Relaxed);
        hash
    }

    #[cfg(test)]
    pub(crate) fn is_computed(&self) -> bool {
        self.0.load(Ordering::Relaxed) & COMPUTED != 0
    }
}

/// Order-sensitive combiner for one container's parts.
pub(crate) struct Accumulator(u32);

impl Accumulator {
    pub(crate) fn new(kind: ContainerKind) -> Self {
        Self(match kind {
            ContainerKind::Record => RECORD_SEED,
            ContainerKind::Sequence => SEQUENCE_SEED,
        })
    }

    pub(crate) fn push(&mut self, part: u32) {
        self.0 = self.0.wrapping_mul(MULTIPLIER).wrapping_add(part);
    }

    pub(crate) fn finish(self, len: usize) -> u32 {
        fmix32(self.0 ^ len as u32)
    }
}

pub(crate) fn text_hash(text: &str) -> u32 {
    text.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// `0.0` and `-0.0` hash alike, as do all NaNs, matching `Number`'s
/// equality.
pub(crate) fn number_hash(number: f64) -> u32 {
    let bits = if number == 0.0 {
        0
    } else if number.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        number.to_bits()
    };
    fmix32((bits as u32) ^ ((bits >> 32) as u32))
}

/// For integers no double represents exactly; every other integer hashes
/// through [`number_hash`].
pub(crate) fn integer_hash(integer: i128) -> u32 {
    let bits = integer as u128;
    fmix32((bits as u32) ^ ((bits >> 32) as u32) ^ ((bits >> 64) as u32))
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_computes_once() {
        let cell = HashCell::new();
        assert!(!cell.is_computed());

        let mut calls = 0;
        assert_eq!(cell.get_or_compute(|| { calls += 1; 0 }), 0);
        assert_eq!(cell.get_or_compute(|| { calls += 1; 99 }), 0);
        assert_eq!(calls, 1);
        assert!(cell.is_computed());
    }

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(text_hash(""), 0x811c_9dc5);
        assert_eq!(text_hash("a"), 0xe40c_292c);
        assert_eq!(text_hash("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn signed_zero_and_nan_are_canonical() {
        assert_eq!(number_hash(0.0), number_hash(-0.0));
        assert_eq!(number_hash(f64::NAN), number_hash(-f64::NAN));
        assert_ne!(number_hash(1.0), number_hash(2.0));
    }

    #[test]
    fn wide_integers_keep_their_low_bits() {
        let max = i128::from(u64::MAX);
        assert_ne!(integer_hash(max), integer_hash(max - 1));
    }

    #[test]
    fn seeds_separate_the_type_tags() {
        let record = Accumulator::new(ContainerKind::Record).finish(0);
        let sequence = Accumulator::new(ContainerKind::Sequence).finish(0);
        assert_ne!(record, sequence);
    }

    #[test]
    fn accumulation_is_order_sensitive() {
        let mut ab = Accumulator::new(ContainerKind::Sequence);
        ab.push(1);
        ab.push(2);
        let mut ba = Accumulator::new(ContainerKind::Sequence);
        ba.push(2);
        ba.push(1);
        assert_ne!(ab.finish(2), ba.finish(2));
    }
}
