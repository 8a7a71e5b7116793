use tracing::{debug, trace};
use zstd_safe::CParameter;

use crate::engine::Encoder;
use crate::error::Error;
use crate::outcome::{Outcome, Packed, Status};
use crate::params::{self, Level, Mode};

/// A compression session that can be driven chunk by chunk.
pub trait Packer {
    /// Compresses the next piece of the source into `destination`.
    fn pack(&mut self, destination: &mut [u8]) -> Outcome<Packed>;

    /// Source bytes already accounted for, compressed or declared incompressible.
    fn position(&self) -> usize;
}

/// State shared by the fixed and the dynamic compressor.
pub(crate) struct Session<'a> {
    pub encoder: Encoder,
    pub source: &'a [u8],
    pub position: usize,
    pub block_size: usize,
    pub mode: Mode,
    /// The engine still holds bytes of a frame the last destination could not take.
    pending: bool,
    /// Block mode already compressed the source.
    framed: bool,
}

impl<'a> Session<'a> {
    pub fn open(
        mode: Mode,
        block_size: usize,
        source: &'a [u8],
        level: Level,
        checksum: bool,
    ) -> Result<Self, Error> {
        if block_size == 0 {
            return Err(Error::ZeroBlockSize);
        }

        let mut encoder = Encoder::new()?;
        encoder.set(
            "compression level",
            CParameter::CompressionLevel(level.engine_level()),
        )?;
        if mode == Mode::Block {
            encoder.set(
                "target block size",
                CParameter::TargetCBlockSize(params::target_block_size(block_size)),
            )?;
        }
        encoder.set(
            "source size hint",
            CParameter::SrcSizeHint(params::size_hint(source.len())),
        )?;
        if !checksum {
            encoder.set("checksum flag", CParameter::ChecksumFlag(false))?;
        }

        debug!(?mode, ?level, block_size, source_len = source.len(), "compression session ready");

        Ok(Self {
            encoder,
            source,
            position: 0,
            block_size,
            mode,
            pending: false,
            framed: false,
        })
    }

    pub fn remaining(&self) -> usize {
        self.source.len() - self.position
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Status once the source is consumed up to `position`.
    fn settle(&self) -> Status {
        if self.pending || self.position < self.source.len() {
            Status::NotDone
        } else {
            Status::Ok
        }
    }

    /// Abandons the current frame and moves the cursor past `len` source bytes.
    pub fn skip_raw(&mut self, len: usize) -> Outcome<Packed> {
        self.encoder.restart()?;
        self.pending = false;
        self.position += len;
        trace!(position = self.position, len, "chunk stored raw");
        Ok(Packed::incompressible())
    }

    /// Whole source as one frame.
    pub fn pack_block(&mut self, destination: &mut [u8]) -> Outcome<Packed> {
        if self.pending || self.framed {
            return self.drain(destination);
        }
        if destination.len() < self.source.len() {
            return Err(Error::OutputTooSmall {
                needed: self.source.len(),
                available: destination.len(),
            });
        }

        self.framed = true;
        let pass = self.encoder.end_frame(self.source, destination)?;
        if pass.produced >= self.source.len() {
            return self.skip_raw(self.source.len());
        }

        self.position = self.source.len();
        self.pending = !pass.finished;
        Ok(Packed::new(self.settle(), pass.produced))
    }

    /// Pushes out what the engine still holds for the current frame.
    pub fn drain(&mut self, destination: &mut [u8]) -> Outcome<Packed> {
        if !self.pending {
            return Ok(Packed::new(self.settle(), 0));
        }
        let pass = self.encoder.end_frame(&[], destination)?;
        self.pending = !pass.finished;
        Ok(Packed::new(self.settle(), pass.produced))
    }
}

/// Compressor that cuts the source into chunks of at most `block_size` bytes,
/// or packs it into a single frame in [`Mode::Block`].
///
/// Each streamed chunk is an independent frame. A chunk that does not shrink
/// is reported as [`Status::Incompressible`] and must be stored raw.
pub struct FixedBlockCompressor<'a> {
    session: Session<'a>,
}

impl<'a> FixedBlockCompressor<'a> {
    /// Creates the engine context and applies the session parameters.
    ///
    /// # Errors
    /// Returns an error if `block_size` is zero or the engine rejects any setting.
    pub fn new(mode: Mode, block_size: usize, source: &'a [u8], level: Level) -> Result<Self, Error> {
        Session::open(mode, block_size, source, level, true).map(|session| Self { session })
    }

    /// Compresses the next chunk, or the whole source in block mode.
    ///
    /// `destination` must hold at least the source length in block mode, and at
    /// least the next chunk length in streaming mode.
    pub fn pack(&mut self, destination: &mut [u8]) -> Outcome<Packed> {
        let session = &mut self.session;
        if session.mode == Mode::Block {
            return session.pack_block(destination);
        }
        if session.is_pending() || session.remaining() == 0 {
            return session.drain(destination);
        }

        let chunk_len = session.remaining().min(session.block_size);
        if destination.len() < chunk_len {
            return Err(Error::OutputTooSmall {
                needed: chunk_len,
                available: destination.len(),
            });
        }

        let start = session.position;
        let source = session.source;
        let chunk = &source[start..start + chunk_len];
        session.encoder.restart()?;
        let pass = session.encoder.end_frame(chunk, destination)?;
        if pass.produced >= chunk_len {
            return session.skip_raw(chunk_len);
        }

        session.position += pass.consumed;
        session.pending = !pass.finished;
        trace!(start, chunk_len, produced = pass.produced, "chunk compressed");
        Ok(Packed::new(session.settle(), pass.produced))
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.session.position
    }
}

impl Packer for FixedBlockCompressor<'_> {
    fn pack(&mut self, destination: &mut [u8]) -> Outcome<Packed> {
        FixedBlockCompressor::pack(self, destination)
    }

    fn position(&self) -> usize {
        FixedBlockCompressor::position(self)
    }
}
