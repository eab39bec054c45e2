//! Property-based tests for Bitset.

use bitset::Bitset;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Strategy for a bitset length plus a set of rows inside it
fn rows_strategy() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..300).prop_flat_map(|len| (Just(len), prop::collection::vec(0..len, 0..64)))
}

proptest! {
    // -------------------------------------------------------------
    // 1. Every set row is reported, nothing else is.
    // -------------------------------------------------------------
    #[test]
    fn prop_set_and_iter((len, rows) in rows_strategy()) {
        let mut bits = Bitset::new(len);
        for &r in &rows {
            bits.set(r);
        }

        let expected: BTreeSet<usize> = rows.iter().copied().collect();
        let got: Vec<usize> = bits.iter().collect();

        prop_assert_eq!(got, expected.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(bits.count(), expected.len());
        for i in 0..len {
            prop_assert_eq!(bits.is_set(i), expected.contains(&i));
        }
    }

    // -------------------------------------------------------------
    // 2. Negation is an involution and complements the count.
    // -------------------------------------------------------------
    #[test]
    fn prop_neg_twice((len, rows) in rows_strategy()) {
        let mut bits = Bitset::new(len);
        for &r in &rows {
            bits.set(r);
        }
        let original = bits.clone();
        let before = bits.count();

        bits.neg();
        prop_assert_eq!(bits.count(), len - before);
        prop_assert_eq!(bits.recount(), len - before);

        bits.neg();
        prop_assert_eq!(bits, original);
    }

    // -------------------------------------------------------------
    // 3. Copying bytes then reading rows matches MSB-first order.
    // -------------------------------------------------------------
    #[test]
    fn prop_from_bytes_matches_bits(buf in prop::collection::vec(any::<u8>(), 1..40), cut in 0usize..8) {
        let len = buf.len() * 8 - cut;
        let bits = Bitset::from_bytes(&buf, len).unwrap();

        for i in 0..len {
            let expected = buf[i / 8] & (0x80 >> (i % 8)) != 0;
            prop_assert_eq!(bits.is_set(i), expected);
        }
        // rows past the end stay clear
        prop_assert_eq!(bits.count(), bits.iter().count());
    }

    // -------------------------------------------------------------
    // 4. set_range agrees with setting rows one by one.
    // -------------------------------------------------------------
    #[test]
    fn prop_set_range(len in 1usize..200, a in 0usize..200, b in 0usize..200) {
        let (start, end) = (a.min(b) % (len + 1), a.max(b) % (len + 1));
        let (start, end) = (start.min(end), start.max(end));

        let mut ranged = Bitset::new(len);
        ranged.set_range(start, end);

        let mut single = Bitset::new(len);
        for i in start..end {
            single.set(i);
        }

        prop_assert_eq!(ranged.count(), end - start);
        prop_assert_eq!(ranged, single);
    }
}
