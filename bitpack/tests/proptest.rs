use bitpack::block::{self, BLOCK_LEN};
use bitpack::cmp::{self, CompareOp};
use bitpack::{BitWidth, Bitset, Filter, PackedBlocks, PackedStream, stream};
use proptest::prelude::*;

//
// -----------------------------------------------------------------------------
// Helper Functions
// -----------------------------------------------------------------------------

/// A width, a minimum that leaves room for it, and offsets that fit it.
fn packed_input(max_len: usize) -> impl Strategy<Value = (usize, u64, Vec<u64>)> {
    (0usize..=63).prop_flat_map(move |w| {
        let m = BitWidth::new(w).unwrap().mask();
        (
            Just(w),
            0..=u64::MAX - m,
            prop::collection::vec(any::<u64>().prop_map(move |d| d & m), 0..max_len),
        )
    })
}

fn row_count() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(0usize),
        Just(1usize),
        Just(7usize),
        Just(8usize),
        Just(9usize),
        Just(63usize),
        Just(64usize),
        Just(65usize),
        0usize..300,
    ]
}

fn compare_op(max: u64) -> impl Strategy<Value = CompareOp> {
    let operand = prop_oneof![
        0..=max,
        Just(0u64),
        Just(max),
        Just(max.wrapping_add(1)),
        Just(u64::MAX),
        any::<u64>(),
    ];
    (0usize..7, operand.clone(), operand).prop_map(|(kind, a, b)| match kind {
        0 => CompareOp::Equal(a),
        1 => CompareOp::NotEqual(a),
        2 => CompareOp::Less(a),
        3 => CompareOp::LessEqual(a),
        4 => CompareOp::Greater(a),
        5 => CompareOp::GreaterEqual(a),
        _ => CompareOp::Between(a.min(b), a.max(b)),
    })
}

fn filter_i32() -> impl Strategy<Value = Filter<i32>> {
    let operand = prop_oneof![any::<i32>(), -600i32..600];
    (0usize..7, operand.clone(), operand).prop_map(|(kind, a, b)| match kind {
        0 => Filter::Equal(a),
        1 => Filter::NotEqual(a),
        2 => Filter::Less(a),
        3 => Filter::LessEqual(a),
        4 => Filter::Greater(a),
        5 => Filter::GreaterEqual(a),
        _ => Filter::Between(a, b),
    })
}

//
// -----------------------------------------------------------------------------
// Word Layout
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_block_roundtrip((w, minv, deltas) in packed_input(BLOCK_LEN + 1)) {
        let mut vals = [minv; BLOCK_LEN];
        for (v, d) in vals.iter_mut().zip(&deltas) {
            *v = minv + d;
        }

        let mut words = vec![0u64; w];
        block::bitpack(minv, &vals, &mut words, w);
        let mut out = [0u64; BLOCK_LEN];
        block::bitread(&mut out, &words, w, minv);
        prop_assert_eq!(out, vals);
    }
}

proptest! {
    #[test]
    fn prop_block_runs_roundtrip((w, minv, deltas) in packed_input(400)) {
        let width = BitWidth::new(w).unwrap();
        let vals: Vec<u64> = deltas.iter().map(|d| minv + d).collect();
        let mut words = vec![0u64; width.block_words(vals.len())];
        prop_assert_eq!(block::encode_blocks(&vals, minv, width, &mut words), words.len());

        let mut out = vec![0u64; vals.len()];
        block::decode_blocks(&mut out, &words, width, minv);
        prop_assert_eq!(&out, &vals);

        let view = PackedBlocks::new(&words, width, vals.len(), minv).unwrap();
        for (i, v) in vals.iter().enumerate() {
            prop_assert_eq!(view.get(i), Some(*v));
        }
    }
}

proptest! {
    #[test]
    fn prop_signed_block_roundtrip(
        vals in prop::collection::vec(-1000i16..1000, BLOCK_LEN),
    ) {
        let minv = *vals.iter().min().unwrap();
        let maxv = *vals.iter().max().unwrap();
        let width = BitWidth::for_range(minv, maxv).unwrap();
        let block: [i16; BLOCK_LEN] = vals.clone().try_into().unwrap();

        let mut words = [0u64; 15];
        block::try_bitpack(minv, &block, &mut words, width).unwrap();
        let mut out = [0i16; BLOCK_LEN];
        block::bitread(&mut out, &words, width.get(), minv);
        prop_assert_eq!(&out[..], &vals[..]);
    }
}

//
// -----------------------------------------------------------------------------
// Streaming Layout
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_stream_roundtrip((w, minv, deltas) in packed_input(300)) {
        let width = BitWidth::new(w).unwrap();
        let vals: Vec<u64> = deltas.iter().map(|d| minv + d).collect();
        let mut buf = vec![0u8; width.stream_len(vals.len()) + 3];
        let len = stream::encode_with(&mut buf, &vals, minv, width);
        prop_assert_eq!(len, (vals.len() * w).div_ceil(8));

        let mut out = vec![0u64; vals.len()];
        stream::decode(&mut out, &buf[..len], width, minv);
        prop_assert_eq!(&out, &vals);
    }
}

proptest! {
    #[test]
    fn prop_stream_width_is_minimal(vals in prop::collection::vec(any::<i64>(), 1..100)) {
        let minv = *vals.iter().min().unwrap();
        let maxv = *vals.iter().max().unwrap();
        let span = (maxv as i128 - minv as i128) as u128;
        let mut buf = vec![0u8; 8 * vals.len()];
        match stream::encode(&mut buf, &vals, minv, maxv) {
            Ok((_, width)) => {
                prop_assert!(span <= width.mask() as u128);
                prop_assert!(width.get() == 0 || span > (width.mask() >> 1) as u128);
            }
            Err(_) => prop_assert!(span > (u64::MAX >> 1) as u128),
        }
    }
}

//
// -----------------------------------------------------------------------------
// Predicate Kernels
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_kernels_match_reference(
        (w, op, n, deltas) in (0usize..=63, row_count()).prop_flat_map(|(w, n)| {
            let m = BitWidth::new(w).unwrap().mask();
            (
                Just(w),
                compare_op(m),
                Just(n),
                prop::collection::vec(any::<u64>().prop_map(move |d| d & m), n),
            )
        }),
    ) {
        let width = BitWidth::new(w).unwrap();
        let mut buf = vec![0u8; width.stream_len(n)];
        stream::encode_with(&mut buf, &deltas, 0, width);

        let mut fast = Bitset::new(n);
        let mut slow = Bitset::new(n);
        op.run(&buf, width, n, &mut fast);
        op.run_reference(&buf, width, n, &mut slow);
        prop_assert_eq!(&fast, &slow);

        let expected: Vec<usize> = (0..n).filter(|i| op.test(deltas[*i])).collect();
        prop_assert_eq!(fast.iter().collect::<Vec<_>>(), expected);

        // same input, fresh bitset, same answer
        let mut again = Bitset::new(n);
        op.run(&buf, width, n, &mut again);
        prop_assert_eq!(&again, &fast);
    }
}

proptest! {
    #[test]
    fn prop_block_kernels_match_values((w, _, deltas) in packed_input(BLOCK_LEN + 1), pick in any::<usize>()) {
        let m = BitWidth::new(w).unwrap().mask();
        let mut vals = [0u64; BLOCK_LEN];
        vals[..deltas.len()].copy_from_slice(&deltas);
        let mut words = vec![0u64; w];
        block::bitpack(0, &vals, &mut words, w);

        let probe = vals[pick % BLOCK_LEN];
        for op in [
            CompareOp::Equal(probe),
            CompareOp::Less(probe),
            CompareOp::GreaterEqual(probe),
            CompareOp::Between(probe / 2, probe),
            CompareOp::Greater(m.wrapping_add(1)),
        ] {
            let hits = op.run_block(&words, BitWidth::new(w).unwrap());
            for (i, v) in vals.iter().enumerate() {
                prop_assert_eq!(hits >> i & 1 == 1, op.test(*v), "{:?} row {}", op, i);
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_filters_match_values(
        vals in prop::collection::vec(-500i32..500, 0..300),
        filter in filter_i32(),
    ) {
        let expected: Vec<usize> = (0..vals.len()).filter(|i| filter.test(vals[*i])).collect();
        let minv = vals.iter().copied().min().unwrap_or(0);
        let maxv = vals.iter().copied().max().unwrap_or(0);

        let mut buf = vec![0u8; 8 * vals.len()];
        let (len, width) = stream::encode(&mut buf, &vals, minv, maxv).unwrap();
        let s = PackedStream::new(&buf[..len], width, vals.len(), minv).unwrap();
        let mut bits = Bitset::new(vals.len());
        s.filter(filter, &mut bits).unwrap();
        prop_assert_eq!(bits.iter().collect::<Vec<_>>(), expected.clone());

        let mut words = vec![0u64; width.block_words(vals.len())];
        block::encode_blocks(&vals, minv, width, &mut words);
        let b = PackedBlocks::new(&words, width, vals.len(), minv).unwrap();
        let mut bits = Bitset::new(vals.len());
        b.filter(filter, &mut bits).unwrap();
        prop_assert_eq!(bits.iter().collect::<Vec<_>>(), expected);
    }
}

proptest! {
    #[test]
    fn prop_tables_leave_rows_past_n_alone(
        w in 0usize..=63,
        n in 0usize..100,
        extra in 1usize..20,
    ) {
        let width = BitWidth::new(w).unwrap();
        let buf = vec![0xFFu8; width.stream_len(n)];
        let mut bits = Bitset::new(n + extra);
        cmp::NOT_EQUAL[w](&buf, u64::MAX, n, &mut bits);
        prop_assert_eq!(bits.count(), n);
        prop_assert!(bits.iter().all(|i| i < n));
    }
}
