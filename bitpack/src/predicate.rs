//! Comparison predicates evaluated against unpacked offsets.
//!
//! Each predicate is a zero-sized type so the kernels can be monomorphised
//! per comparison. Operands are full `u64` values and are never truncated to
//! the packed width, which keeps out-of-range comparands correct.

use core::fmt::Debug;

pub trait Predicate: 'static {
    type Operand: Copy + Debug;

    fn test(value: u64, operand: Self::Operand) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotEqual;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Less;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessEqual;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Greater;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreaterEqual;

/// Inclusive range `lo..=hi`. An inverted range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Between;

impl Predicate for Equal {
    type Operand = u64;

    #[inline(always)]
    fn test(value: u64, operand: u64) -> bool {
        value == operand
    }
}

impl Predicate for NotEqual {
    type Operand = u64;

    #[inline(always)]
    fn test(value: u64, operand: u64) -> bool {
        value != operand
    }
}

impl Predicate for Less {
    type Operand = u64;

    #[inline(always)]
    fn test(value: u64, operand: u64) -> bool {
        value < operand
    }
}

impl Predicate for LessEqual {
    type Operand = u64;

    #[inline(always)]
    fn test(value: u64, operand: u64) -> bool {
        value <= operand
    }
}

impl Predicate for Greater {
    type Operand = u64;

    #[inline(always)]
    fn test(value: u64, operand: u64) -> bool {
        value > operand
    }
}

impl Predicate for GreaterEqual {
    type Operand = u64;

    #[inline(always)]
    fn test(value: u64, operand: u64) -> bool {
        value >= operand
    }
}

impl Predicate for Between {
    type Operand = (u64, u64);

    #[inline(always)]
    fn test(value: u64, (lo, hi): (u64, u64)) -> bool {
        lo <= value && value <= hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_predicates() {
        assert!(Less::test(3, 4));
        assert!(!Less::test(4, 4));
        assert!(LessEqual::test(4, 4));
        assert!(Greater::test(5, 4));
        assert!(!Greater::test(4, 4));
        assert!(GreaterEqual::test(4, 4));
        assert!(Equal::test(u64::MAX, u64::MAX));
        assert!(NotEqual::test(0, u64::MAX));
    }

    #[test]
    fn between_is_inclusive() {
        assert!(Between::test(3, (3, 9)));
        assert!(Between::test(9, (3, 9)));
        assert!(!Between::test(10, (3, 9)));
        assert!(!Between::test(5, (9, 3)));
    }
}
