use tracing::{debug, trace};
use zstd_safe::DParameter;

use crate::engine::Decoder;
use crate::error::Error;
use crate::outcome::{Outcome, Status, Unpacked};
use crate::params::{self, Mode};
use crate::search::SEARCH_SPAN;

/// A decompression session that can be driven chunk by chunk.
pub trait Unpacker {
    /// Decodes from `compressed` into `destination`.
    ///
    /// In streaming mode the caller re-invokes with the unconsumed tail of the
    /// input (possibly empty) until the status is [`Status::Ok`].
    fn unpack(&mut self, destination: &mut [u8], compressed: &[u8]) -> Outcome<Unpacked>;

    /// Compressed bytes consumed so far.
    fn position(&self) -> usize;

    /// Decompressed bytes produced so far.
    fn output_position(&self) -> usize;
}

struct Inflater {
    decoder: Decoder,
    mode: Mode,
    block_size: usize,
    position: usize,
    output_position: usize,
}

impl Inflater {
    fn open(mode: Mode, block_size: usize, window_log: u32, ignore_checksum: bool) -> Result<Self, Error> {
        if block_size == 0 {
            return Err(Error::ZeroBlockSize);
        }

        let mut decoder = Decoder::new()?;
        decoder.set("window log max", DParameter::WindowLogMax(window_log))?;
        if ignore_checksum {
            decoder.set("checksum validation", DParameter::ForceIgnoreChecksum(true))?;
        }

        debug!(?mode, block_size, window_log, "decompression session ready");

        Ok(Self {
            decoder,
            mode,
            block_size,
            position: 0,
            output_position: 0,
        })
    }

    fn inflate(&mut self, destination: &mut [u8], compressed: &[u8]) -> Outcome<Unpacked> {
        let unpacked = match self.mode {
            Mode::Block => {
                let size = self.decoder.decode_all(destination, compressed)?;
                Unpacked {
                    status: Status::Ok,
                    size,
                    consumed: compressed.len(),
                }
            }
            Mode::Streaming => {
                let step = self.decoder.step(destination, compressed)?;
                let status = if step.consumed < compressed.len() || !step.frame_done {
                    Status::NotDone
                } else {
                    Status::Ok
                };
                Unpacked {
                    status,
                    size: step.produced,
                    consumed: step.consumed,
                }
            }
        };

        self.position += unpacked.consumed;
        self.output_position += unpacked.size;
        trace!(
            consumed = unpacked.consumed,
            produced = unpacked.size,
            status = ?unpacked.status,
            "inflate step"
        );
        Ok(unpacked)
    }
}

/// Decoder for the output of [`FixedBlockCompressor`](crate::FixedBlockCompressor).
///
/// Every call writes into a window of exactly `block_size` bytes.
pub struct FixedBlockDecompressor {
    inner: Inflater,
}

impl FixedBlockDecompressor {
    /// # Errors
    /// Returns an error if `block_size` is zero or the engine rejects any setting.
    pub fn new(mode: Mode, block_size: usize) -> Result<Self, Error> {
        let window_log = params::window_log_for(block_size);
        Inflater::open(mode, block_size, window_log, false).map(|inner| Self { inner })
    }

    pub fn unpack(&mut self, destination: &mut [u8], compressed: &[u8]) -> Outcome<Unpacked> {
        if destination.len() != self.inner.block_size {
            return Err(Error::OutputSizeMismatch {
                expected: self.inner.block_size,
                actual: destination.len(),
            });
        }
        self.inner.inflate(destination, compressed)
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.inner.position
    }

    #[must_use]
    pub fn output_position(&self) -> usize {
        self.inner.output_position
    }
}

/// Decoder for the output of [`DynamicBlockCompressor`](crate::DynamicBlockCompressor).
///
/// A single chunk may expand to several budgets, so the window limit covers
/// the widest chunk the search can pick and checksums are not verified.
pub struct DynamicBlockDecompressor {
    inner: Inflater,
}

impl DynamicBlockDecompressor {
    /// # Errors
    /// Returns an error if `block_size` is zero or the engine rejects any setting.
    pub fn new(mode: Mode, block_size: usize) -> Result<Self, Error> {
        let window_log = params::window_log_for(block_size.saturating_mul(SEARCH_SPAN));
        Inflater::open(mode, block_size, window_log, true).map(|inner| Self { inner })
    }

    /// `destination` must hold at least `block_size` bytes.
    pub fn unpack(&mut self, destination: &mut [u8], compressed: &[u8]) -> Outcome<Unpacked> {
        if destination.len() < self.inner.block_size {
            return Err(Error::OutputTooSmall {
                needed: self.inner.block_size,
                available: destination.len(),
            });
        }
        self.inner.inflate(destination, compressed)
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.inner.position
    }

    #[must_use]
    pub fn output_position(&self) -> usize {
        self.inner.output_position
    }
}

impl Unpacker for FixedBlockDecompressor {
    fn unpack(&mut self, destination: &mut [u8], compressed: &[u8]) -> Outcome<Unpacked> {
        FixedBlockDecompressor::unpack(self, destination, compressed)
    }

    fn position(&self) -> usize {
        FixedBlockDecompressor::position(self)
    }

    fn output_position(&self) -> usize {
        FixedBlockDecompressor::output_position(self)
    }
}

impl Unpacker for DynamicBlockDecompressor {
    fn unpack(&mut self, destination: &mut [u8], compressed: &[u8]) -> Outcome<Unpacked> {
        DynamicBlockDecompressor::unpack(self, destination, compressed)
    }

    fn position(&self) -> usize {
        DynamicBlockDecompressor::position(self)
    }

    fn output_position(&self) -> usize {
        DynamicBlockDecompressor::output_position(self)
    }
}
