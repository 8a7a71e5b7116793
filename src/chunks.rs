//! Whole-buffer helpers that drive a session to completion.
//!
//! Compression yields a list of [`Chunk`]s. Chunks the engine could not shrink
//! are kept verbatim as [`Chunk::Raw`], so the list always holds enough to
//! rebuild the source. The list lives in memory only; it has no on-disk form.

use tracing::debug;

use crate::compress::{FixedBlockCompressor, Packer};
use crate::decompress::{DynamicBlockDecompressor, FixedBlockDecompressor, Unpacker};
use crate::dynamic::DynamicBlockCompressor;
use crate::error::Error;
use crate::outcome::Status;
use crate::params::{Level, Mode};

/// One stored piece of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Engine frame bytes.
    Compressed(Vec<u8>),
    /// Source bytes stored as they are.
    Raw(Vec<u8>),
}

impl Chunk {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Compressed(bytes) | Self::Raw(bytes) => bytes,
        }
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

/// Total bytes the chunks occupy when stored.
#[must_use]
pub fn stored_size(chunks: &[Chunk]) -> usize {
    chunks.iter().map(|chunk| chunk.as_bytes().len()).sum()
}

/// Calls `pack` until the session reports [`Status::Ok`].
///
/// `window` is the destination size handed to every call.
pub fn collect_chunks<P: Packer>(packer: &mut P, source: &[u8], window: usize) -> Result<Vec<Chunk>, Error> {
    let mut destination = vec![0u8; window.max(1)];
    let mut chunks = Vec::new();

    loop {
        let start = packer.position();
        let packed = packer.pack(&mut destination)?;
        if packed.status == Status::Incompressible {
            chunks.push(Chunk::Raw(source[start..packer.position()].to_vec()));
            continue;
        }
        if packed.size > 0 {
            chunks.push(Chunk::Compressed(destination[..packed.size].to_vec()));
        }
        if packed.status == Status::Ok {
            break;
        }
    }

    debug!(
        chunks = chunks.len(),
        source_len = source.len(),
        stored = stored_size(&chunks),
        "source packed"
    );
    Ok(chunks)
}

/// Rebuilds the source from `chunks`, decoding compressed ones through a
/// reusable window of `window` bytes.
///
/// # Errors
/// [`Error::IncompleteFrame`] if the compressed bytes end inside a frame.
pub fn expand_chunks<U: Unpacker>(unpacker: &mut U, chunks: &[Chunk], window: usize) -> Result<Vec<u8>, Error> {
    let mut buffer = vec![0u8; window];
    let mut output = Vec::new();
    let mut open = false;

    for chunk in chunks {
        match chunk {
            Chunk::Raw(bytes) => {
                if open {
                    return Err(Error::IncompleteFrame);
                }
                output.extend_from_slice(bytes);
            }
            Chunk::Compressed(bytes) => {
                open = inflate_into(unpacker, &mut buffer, bytes, &mut output)?;
            }
        }
    }
    if open {
        return Err(Error::IncompleteFrame);
    }

    debug!(chunks = chunks.len(), output_len = output.len(), "chunks expanded");
    Ok(output)
}

/// Feeds `input` until it is used up. Returns whether a frame is still open.
fn inflate_into<U: Unpacker>(
    unpacker: &mut U,
    buffer: &mut [u8],
    mut input: &[u8],
    output: &mut Vec<u8>,
) -> Result<bool, Error> {
    loop {
        let unpacked = unpacker.unpack(buffer, input)?;
        output.extend_from_slice(&buffer[..unpacked.size]);
        input = &input[unpacked.consumed..];

        if unpacked.status == Status::Ok && input.is_empty() {
            return Ok(false);
        }
        if unpacked.consumed == 0 && unpacked.size == 0 {
            if input.is_empty() {
                return Ok(true);
            }
            return Err(Error::Decompression("decoder made no progress"));
        }
    }
}

/// Streams `source` through a [`FixedBlockCompressor`].
pub fn compress_fixed(source: &[u8], block_size: usize, level: Level) -> Result<Vec<Chunk>, Error> {
    let mut compressor = FixedBlockCompressor::new(Mode::Streaming, block_size, source, level)?;
    collect_chunks(&mut compressor, source, block_size.min(source.len()))
}

/// Streams `source` through a [`DynamicBlockCompressor`]. Every compressed
/// chunk is strictly shorter than `block_size`.
pub fn compress_dynamic(source: &[u8], block_size: usize, level: Level) -> Result<Vec<Chunk>, Error> {
    let mut compressor = DynamicBlockCompressor::new(Mode::Streaming, block_size, source, level)?;
    collect_chunks(&mut compressor, source, block_size.min(source.len()))
}

/// Inverse of [`compress_fixed`].
pub fn decompress_fixed(chunks: &[Chunk], block_size: usize) -> Result<Vec<u8>, Error> {
    let mut decompressor = FixedBlockDecompressor::new(Mode::Streaming, block_size)?;
    expand_chunks(&mut decompressor, chunks, block_size)
}

/// Inverse of [`compress_dynamic`].
pub fn decompress_dynamic(chunks: &[Chunk], block_size: usize) -> Result<Vec<u8>, Error> {
    let mut decompressor = DynamicBlockDecompressor::new(Mode::Streaming, block_size)?;
    expand_chunks(&mut decompressor, chunks, block_size)
}

/// Packs the whole of `source` into a single frame, or keeps it raw when the
/// frame would not be smaller.
pub fn compress_frame(source: &[u8], level: Level) -> Result<Chunk, Error> {
    let block_size = source.len().max(1);
    let mut compressor = FixedBlockCompressor::new(Mode::Block, block_size, source, level)?;
    let chunks = collect_chunks(&mut compressor, source, block_size)?;
    if chunks.iter().any(Chunk::is_raw) {
        return Ok(Chunk::Raw(source.to_vec()));
    }
    // A frame the destination could not take at once arrives in several pieces.
    let frame = chunks.iter().flat_map(Chunk::as_bytes).copied().collect();
    Ok(Chunk::Compressed(frame))
}

/// Inverse of [`compress_frame`]. `len` is the length of the original source.
pub fn decompress_frame(chunk: &Chunk, len: usize) -> Result<Vec<u8>, Error> {
    let bytes = match chunk {
        Chunk::Raw(bytes) => return Ok(bytes.clone()),
        Chunk::Compressed(bytes) => bytes,
    };
    let mut decompressor = FixedBlockDecompressor::new(Mode::Block, len.max(1))?;
    let mut output = vec![0u8; len.max(1)];
    let unpacked = decompressor.unpack(&mut output, bytes)?;
    output.truncate(unpacked.size);
    Ok(output)
}
