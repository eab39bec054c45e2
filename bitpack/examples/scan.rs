use bitpack::block;
use bitpack::{BitWidth, BitpackError, Bitset, Filter, PackedBlocks, PackedStream, stream};

fn main() {
    println!("=== Bit-packed Scan Examples ===\n");

    if let Err(e) = example_stream_scan() {
        println!("  stream scan failed: {}", e);
    }

    if let Err(e) = example_block_storage() {
        println!("  block storage failed: {}", e);
    }

    example_memory_savings();
}

fn example_stream_scan() -> Result<(), BitpackError> {
    println!("Example 1: Filtering sensor readings without decoding");

    let readings: Vec<i32> = (0..1000).map(|i| -40 + (i * 7919) % 120).collect();
    let minv = *readings.iter().min().unwrap_or(&0);
    let maxv = *readings.iter().max().unwrap_or(&0);

    let mut buf = vec![0u8; 8 * readings.len()];
    let (len, width) = stream::encode(&mut buf, &readings, minv, maxv)?;
    let packed = PackedStream::new(&buf[..len], width, readings.len(), minv)?;

    let mut hot = Bitset::new(packed.len());
    packed.filter(Filter::GreaterEqual(60), &mut hot)?;

    let mut freezing = Bitset::new(packed.len());
    packed.filter(Filter::Between(-40, 0), &mut freezing)?;

    println!("  Range [{}, {}] packed at {} bits", minv, maxv, width);
    println!("  Readings >= 60:      {}", hot.count());
    println!("  Readings in [-40,0]: {}", freezing.count());
    println!(
        "  First hot rows: {:?}",
        hot.iter().take(5).collect::<Vec<_>>()
    );
    println!();

    Ok(())
}

fn example_block_storage() -> Result<(), BitpackError> {
    println!("Example 2: Word blocks for storage");

    let ids: Vec<u64> = (0..200).map(|i| 5_000_000 + i * i).collect();
    let width = BitWidth::for_range(ids[0], ids[199])?;
    let mut words = vec![0u64; width.block_words(ids.len())];
    block::encode_blocks(&ids, ids[0], width, &mut words);

    let packed = PackedBlocks::new(&words, width, ids.len(), ids[0])?;
    println!(
        "  {} ids in {} blocks of {} words",
        packed.len(),
        packed.num_blocks(),
        width
    );
    println!("  id[150] = {:?}", packed.get(150));

    let mut bits = Bitset::new(packed.len());
    packed.filter(Filter::Less(5_010_000), &mut bits)?;
    println!("  ids below 5010000: {}", bits.count());
    println!();

    Ok(())
}

fn example_memory_savings() {
    println!("Example 3: Memory comparison");

    let n = 100_000;
    let width = BitWidth::new(12).unwrap_or(BitWidth::MAX);
    let raw = n * core::mem::size_of::<u64>();
    let packed = width.stream_len(n);

    println!("  {} u64 values: {} bytes", n, raw);
    println!("  Same values at {} bits: {} bytes", width, packed);
    println!(
        "  Savings: {:.1}%",
        (1.0 - packed as f64 / raw as f64) * 100.0
    );
}
