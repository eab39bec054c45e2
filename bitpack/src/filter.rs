//! Comparisons expressed in the value domain and folded onto packed offsets.
//!
//! A packed block only stores offsets `0..=2^w - 1` above its minimum. A
//! comparand below the minimum or beyond the largest storable value often
//! decides the whole block, so it is resolved before any kernel runs.

use crate::cmp::CompareOp;
use crate::{BitWidth, PackedInt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    Equal(T),
    NotEqual(T),
    Less(T),
    LessEqual(T),
    Greater(T),
    GreaterEqual(T),
    /// Inclusive on both ends.
    Between(T, T),
}

/// Outcome of folding a [`Filter`] onto one packed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// Every row matches.
    All,
    /// No row matches.
    Nothing,
    /// Rows must be scanned with this offset comparison.
    Kernel(CompareOp),
}

#[derive(Debug, Clone, Copy)]
enum Pos {
    Below,
    In(u64),
    Above,
}

fn locate<T: PackedInt>(v: T, minv: T, max: u64) -> Pos {
    if v < minv {
        return Pos::Below;
    }
    match v.delta(minv) {
        d if d > max => Pos::Above,
        d => Pos::In(d),
    }
}

impl<T: PackedInt> Filter<T> {
    /// Whether an unpacked value matches.
    pub fn test(&self, v: T) -> bool {
        match *self {
            Filter::Equal(x) => v == x,
            Filter::NotEqual(x) => v != x,
            Filter::Less(x) => v < x,
            Filter::LessEqual(x) => v <= x,
            Filter::Greater(x) => v > x,
            Filter::GreaterEqual(x) => v >= x,
            Filter::Between(lo, hi) => lo <= v && v <= hi,
        }
    }

    /// Folds the filter onto a block of offsets from `minv` packed at `width`.
    ///
    /// ```
    /// use bitpack::{BitWidth, CompareOp, Filter, Resolved};
    ///
    /// let w = BitWidth::new(4).unwrap();
    /// assert_eq!(Filter::Less(100u32).resolve(50, w), Resolved::All);
    /// assert_eq!(Filter::Equal(49u32).resolve(50, w), Resolved::Nothing);
    /// assert_eq!(
    ///     Filter::Between(40u32, 55).resolve(50, w),
    ///     Resolved::Kernel(CompareOp::Between(0, 5))
    /// );
    /// ```
    pub fn resolve(self, minv: T, width: BitWidth) -> Resolved {
        let max = width.mask();
        let pos = |v| locate(v, minv, max);
        let resolved = match self {
            Filter::Equal(v) => match pos(v) {
                Pos::In(d) => Resolved::Kernel(CompareOp::Equal(d)),
                _ => Resolved::Nothing,
            },
            Filter::NotEqual(v) => match pos(v) {
                Pos::In(d) => Resolved::Kernel(CompareOp::NotEqual(d)),
                _ => Resolved::All,
            },
            Filter::Less(v) => match pos(v) {
                Pos::Below | Pos::In(0) => Resolved::Nothing,
                Pos::In(d) => Resolved::Kernel(CompareOp::Less(d)),
                Pos::Above => Resolved::All,
            },
            Filter::LessEqual(v) => match pos(v) {
                Pos::Below => Resolved::Nothing,
                Pos::In(d) if d == max => Resolved::All,
                Pos::In(d) => Resolved::Kernel(CompareOp::LessEqual(d)),
                Pos::Above => Resolved::All,
            },
            Filter::Greater(v) => match pos(v) {
                Pos::Below => Resolved::All,
                Pos::In(d) if d == max => Resolved::Nothing,
                Pos::In(d) => Resolved::Kernel(CompareOp::Greater(d)),
                Pos::Above => Resolved::Nothing,
            },
            Filter::GreaterEqual(v) => match pos(v) {
                Pos::Below | Pos::In(0) => Resolved::All,
                Pos::In(d) => Resolved::Kernel(CompareOp::GreaterEqual(d)),
                Pos::Above => Resolved::Nothing,
            },
            Filter::Between(lo, hi) => between(pos(lo), pos(hi), lo > hi, max),
        };
        if !matches!(resolved, Resolved::Kernel(_)) {
            log::debug!(
                "{:?} over {}-bit offsets from {:?} folds to {:?}",
                self,
                width,
                minv,
                resolved
            );
        }
        resolved
    }
}

fn between(lo: Pos, hi: Pos, inverted: bool, max: u64) -> Resolved {
    if inverted {
        return Resolved::Nothing;
    }
    let lo = match lo {
        Pos::Below => 0,
        Pos::In(d) => d,
        Pos::Above => return Resolved::Nothing,
    };
    let hi = match hi {
        Pos::Below => return Resolved::Nothing,
        Pos::In(d) => d,
        Pos::Above => max,
    };
    if lo == 0 && hi == max {
        Resolved::All
    } else {
        Resolved::Kernel(CompareOp::Between(lo, hi))
    }
}
