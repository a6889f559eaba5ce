//! Per-cell wall nibble and the per-cell weight field produced by solves.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geom::Dir;

/// The four wall bits of a single cell. A set bit means a wall on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Walls(u8);

impl Walls {
    /// No walls at all.
    pub const OPEN: Self = Self(0);
    /// All four sides walled.
    pub const FULL: Self = Self(0b1111);

    /// Build from a raw value; bits above the low nibble are dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, dir: Dir) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub const fn with(self, dir: Dir) -> Self {
        Self(self.0 | dir.bit())
    }

    #[inline]
    pub const fn without(self, dir: Dir) -> Self {
        Self(self.0 & !dir.bit())
    }

    #[inline]
    pub const fn toggled(self, dir: Dir) -> Self {
        Self(self.0 ^ dir.bit())
    }

    /// Number of walled sides.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// A dead end has exactly one opening.
    #[inline]
    pub const fn is_dead_end(self) -> bool {
        self.count() == 3
    }

    /// Uppercase hex digit used by the persisted format.
    pub fn hex(self) -> char {
        char::from_digit(self.0 as u32, 16)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('F')
    }
}

impl fmt::Display for Walls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Sentinel meaning "not reached" in a [`WeightField`].
pub const UNREACHABLE: i32 = i32::MAX;

/// One scalar per cell, indexed like the wall array.
///
/// Serialized as a JSON array with `null` for unreached cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeightField {
    values: Vec<i32>,
}

impl WeightField {
    /// A field of `len` unreached cells.
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![UNREACHABLE; len],
        }
    }

    /// Build from raw values, using [`UNREACHABLE`] for unreached cells.
    pub fn from_values(values: Vec<i32>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a flat index; [`UNREACHABLE`] when out of bounds.
    #[inline]
    pub fn get(&self, idx: usize) -> i32 {
        self.values.get(idx).copied().unwrap_or(UNREACHABLE)
    }

    /// Value at a flat index, `None` if unreached or out of bounds.
    #[inline]
    pub fn reached(&self, idx: usize) -> Option<i32> {
        match self.get(idx) {
            UNREACHABLE => None,
            v => Some(v),
        }
    }

    #[inline]
    pub fn set(&mut self, idx: usize, v: i32) {
        if let Some(slot) = self.values.get_mut(idx) {
            *slot = v;
        }
    }

    /// Number of reached cells.
    pub fn reached_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != UNREACHABLE).count()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }
}

impl Serialize for WeightField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.values
                .iter()
                .map(|&v| if v == UNREACHABLE { None } else { Some(v) }),
        )
    }
}

impl<'de> Deserialize<'de> for WeightField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Vec<Option<i32>> = Vec::deserialize(deserializer)?;
        Ok(Self {
            values: raw.into_iter().map(|v| v.unwrap_or(UNREACHABLE)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_end_has_three_walls() {
        let w = Walls::FULL.without(Dir::North);
        assert_eq!(w.bits(), 14);
        assert!(w.is_dead_end());
        assert!(!Walls::FULL.is_dead_end());
        assert!(!w.without(Dir::East).is_dead_end());
    }

    #[test]
    fn toggle_is_involution() {
        let w = Walls::from_bits(5);
        for d in Dir::ALL {
            assert_eq!(w.toggled(d).toggled(d), w);
        }
        assert!(w.contains(Dir::North));
        assert!(w.contains(Dir::South));
        assert!(!w.contains(Dir::East));
    }

    #[test]
    fn high_bits_are_masked() {
        assert_eq!(Walls::from_bits(0xF3).bits(), 3);
    }

    #[test]
    fn hex_digits_are_uppercase() {
        assert_eq!(Walls::from_bits(14).hex(), 'E');
        assert_eq!(Walls::from_bits(9).hex(), '9');
    }

    #[test]
    fn weight_field_json_uses_null_for_unreached() {
        let mut f = WeightField::new(3);
        f.set(0, 0);
        f.set(2, 5);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, "[0,null,5]");
        let back: WeightField = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert_eq!(back.reached(1), None);
        assert_eq!(back.reached_count(), 2);
    }

    #[test]
    fn weight_field_out_of_bounds_is_unreached() {
        let f = WeightField::new(2);
        assert_eq!(f.get(10), UNREACHABLE);
    }
}
