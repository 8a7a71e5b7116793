use tracing::trace;

use crate::compress::{Packer, Session};
use crate::error::Error;
use crate::outcome::{Outcome, Packed, Status};
use crate::params::{Level, Mode};
use crate::search::{self, Probe};

/// Compressor whose streamed chunks always compress strictly below `block_size`.
///
/// For every chunk it searches how much source, between one and four budgets
/// worth, still fits under the budget once compressed. Frames carry no
/// checksum so their size depends only on the data. Block mode behaves exactly
/// like [`FixedBlockCompressor`](crate::FixedBlockCompressor).
pub struct DynamicBlockCompressor<'a> {
    session: Session<'a>,
    /// Probes and the confirming pass write here, never into the caller's buffer.
    scratch: Vec<u8>,
}

impl<'a> DynamicBlockCompressor<'a> {
    /// # Errors
    /// Returns an error if `block_size` is zero or the engine rejects any setting.
    pub fn new(mode: Mode, block_size: usize, source: &'a [u8], level: Level) -> Result<Self, Error> {
        let session = Session::open(mode, block_size, source, level, false)?;
        Ok(Self {
            session,
            scratch: Vec::new(),
        })
    }

    /// Compresses the next budget-fitted chunk, or the whole source in block mode.
    ///
    /// In streaming mode `destination` must hold at least
    /// `min(block_size, remaining)` bytes.
    pub fn pack(&mut self, destination: &mut [u8]) -> Outcome<Packed> {
        let session = &mut self.session;
        if session.mode == Mode::Block {
            return session.pack_block(destination);
        }
        let remaining = session.remaining();
        if remaining == 0 {
            return Ok(Packed::new(Status::Ok, 0));
        }

        let budget = remaining.min(session.block_size);
        if destination.len() < budget {
            return Err(Error::OutputTooSmall {
                needed: budget,
                available: destination.len(),
            });
        }

        let source = session.source;
        let source = &source[session.position..];
        self.scratch.resize(budget, 0);
        let scratch = &mut self.scratch[..];
        let encoder = &mut session.encoder;

        let fit = search::fit_chunk(budget, remaining, |len| {
            let pass = encoder.probe(&source[..len], scratch)?;
            Ok::<_, Error>(Probe {
                consumed: pass.consumed,
                produced: pass.produced,
                finished: pass.finished,
            })
        })?;

        let Some(fit) = fit else {
            return session.skip_raw(budget);
        };
        if fit.length == budget {
            return session.skip_raw(budget);
        }

        let produced = if fit.last_probed {
            fit.produced
        } else {
            let pass = encoder.probe(&source[..fit.length], scratch)?;
            let confirmed = Probe {
                consumed: pass.consumed,
                produced: pass.produced,
                finished: pass.finished,
            };
            if !confirmed.fits(fit.length, budget) {
                return Err(Error::Compression("confirming pass exceeded the block budget"));
            }
            confirmed.produced
        };

        destination[..produced].copy_from_slice(&scratch[..produced]);
        session.position += fit.length;
        trace!(
            position = session.position,
            length = fit.length,
            produced,
            budget,
            "chunk fitted"
        );

        let status = if session.remaining() == 0 {
            Status::Ok
        } else {
            Status::NotDone
        };
        Ok(Packed::new(status, produced))
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.session.position
    }
}

impl Packer for DynamicBlockCompressor<'_> {
    fn pack(&mut self, destination: &mut [u8]) -> Outcome<Packed> {
        DynamicBlockCompressor::pack(self, destination)
    }

    fn position(&self) -> usize {
        DynamicBlockCompressor::position(self)
    }
}
