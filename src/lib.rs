//! # zframe
//!
//! Block framing on top of the zstd streaming engine. The source is either
//! packed into one frame ([`Mode::Block`]) or cut into chunks that each become
//! an independent frame ([`Mode::Streaming`]). Two compressors are provided:
//!
//! - [`FixedBlockCompressor`] cuts chunks of exactly `block_size` bytes.
//! - [`DynamicBlockCompressor`] searches, for every chunk, the longest source
//!   span whose frame still fits strictly below `block_size`.
//!
//! A chunk the engine cannot shrink is reported as [`Status::Incompressible`]
//! and must be stored as is. The [`chunks`] helpers take care of that.
//!
//! ## Example
//!
//! ```rust
//! use zframe::{Chunk, Level, compress_dynamic, decompress_dynamic};
//!
//! let source = b"zframe zframe zframe zframe zframe zframe ".repeat(50);
//! let chunks = compress_dynamic(&source, 128, Level::Fast).expect("compression failed");
//!
//! for chunk in &chunks {
//!     if let Chunk::Compressed(frame) = chunk {
//!         assert!(frame.len() < 128);
//!     }
//! }
//!
//! let restored = decompress_dynamic(&chunks, 128).expect("decompression failed");
//! assert_eq!(restored, source);
//! ```

#![forbid(unsafe_code)]

pub mod chunks;
pub mod compress;
pub mod decompress;
pub mod dynamic;
mod engine;
pub mod error;
pub mod outcome;
pub mod params;
pub mod search;

pub use chunks::{
    Chunk, compress_dynamic, compress_fixed, compress_frame, decompress_dynamic, decompress_fixed,
    decompress_frame,
};
pub use compress::{FixedBlockCompressor, Packer};
pub use decompress::{DynamicBlockDecompressor, FixedBlockDecompressor, Unpacker};
pub use dynamic::DynamicBlockCompressor;
pub use error::Error;
pub use outcome::{Outcome, OutcomeExt, Packed, State, Status, Unpacked};
pub use params::{Level, Mode};
