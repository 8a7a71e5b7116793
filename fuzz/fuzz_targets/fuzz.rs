#![no_main]

use libfuzzer_sys::fuzz_target;
use zframe::{
    Chunk, Level, compress_dynamic, compress_fixed, compress_frame, decompress_dynamic,
    decompress_fixed, decompress_frame,
};

/// Feeds arbitrary bytes to both decoders as if they were a stored frame.
///
/// # Invariant
/// Decoding returns `Ok(_)` or `Err(_)` and never panics, whatever the input.
fn verify_decompression_robustness(data: &[u8]) {
    let chunks = [Chunk::Compressed(data.to_vec())];
    let _ = decompress_fixed(&chunks, 256);
    let _ = decompress_dynamic(&chunks, 256);
    let _ = decompress_frame(&chunks[0], data.len());
}

/// # Invariant
/// Every flavour restores its input, and dynamic chunks stay under the budget.
///
/// # Panics
/// On any mismatch or on a decoder rejecting freshly compressed chunks.
fn verify_round_trip(data: &[u8]) {
    // The first byte picks the block size so small and odd budgets get covered.
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let block_size = usize::from(selector) * 8 + 1;

    let fixed = compress_fixed(payload, block_size, Level::Fast).expect("fixed compression failed");
    let restored = decompress_fixed(&fixed, block_size).expect("fixed chunks rejected");
    assert_eq!(restored, payload, "fixed round-trip mismatch");

    let dynamic =
        compress_dynamic(payload, block_size, Level::Fast).expect("dynamic compression failed");
    for chunk in &dynamic {
        if let Chunk::Compressed(frame) = chunk {
            assert!(frame.len() < block_size, "dynamic chunk over budget");
        }
    }
    let restored = decompress_dynamic(&dynamic, block_size).expect("dynamic chunks rejected");
    assert_eq!(restored, payload, "dynamic round-trip mismatch");

    let frame = compress_frame(payload, Level::Fast).expect("frame compression failed");
    let restored = decompress_frame(&frame, payload.len()).expect("frame rejected");
    assert_eq!(restored, payload, "frame round-trip mismatch");
}

fuzz_target!(|data: &[u8]| {
    verify_decompression_robustness(data);
    verify_round_trip(data);
});
