//! Owned engine contexts and the few passes the sessions need.
//!
//! Both wrappers release their context on drop, so every early return during
//! setup frees it exactly once.

use tracing::debug;
use zstd_safe::zstd_sys::ZSTD_EndDirective;
use zstd_safe::{CCtx, CParameter, DCtx, DParameter, InBuffer, OutBuffer, ResetDirective};

use crate::error::Error;

/// Engine error code to its static name, logged at debug level.
fn error_name(code: usize) -> &'static str {
    let name = zstd_safe::get_error_name(code);
    debug!(code, name, "zstd error");
    name
}

/// Progress of one terminating compression pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pass {
    pub consumed: usize,
    pub produced: usize,
    /// The engine reported the frame complete with nothing left to flush.
    pub finished: bool,
}

pub(crate) struct Encoder {
    cctx: CCtx<'static>,
}

impl Encoder {
    /// Creates a context and resets both session and parameters.
    pub fn new() -> Result<Self, Error> {
        let mut cctx = CCtx::try_create().ok_or(Error::ContextCreation("compression"))?;
        cctx.reset(ResetDirective::SessionAndParameters)
            .map_err(|code| Error::Parameter {
                setting: "context reset",
                reason: error_name(code),
            })?;
        Ok(Self { cctx })
    }

    pub fn set(&mut self, setting: &'static str, param: CParameter) -> Result<(), Error> {
        self.cctx
            .set_parameter(param)
            .map(drop)
            .map_err(|code| Error::Parameter {
                setting,
                reason: error_name(code),
            })
    }

    /// Drops any frame in progress but keeps the tuned parameters.
    pub fn restart(&mut self) -> Result<(), Error> {
        self.cctx
            .reset(ResetDirective::SessionOnly)
            .map(drop)
            .map_err(|code| Error::Compression(error_name(code)))
    }

    /// Feeds `input` with the end directive until the frame is complete or
    /// `output` is full. Called with empty input, it keeps draining a frame that
    /// an earlier pass could not finish.
    pub fn end_frame(&mut self, input: &[u8], output: &mut [u8]) -> Result<Pass, Error> {
        let capacity = output.len();
        let mut input = InBuffer::around(input);
        let mut output = OutBuffer::around(output);

        loop {
            let before = (input.pos(), output.pos());
            let remaining = self
                .cctx
                .compress_stream2(&mut output, &mut input, ZSTD_EndDirective::ZSTD_e_end)
                .map_err(|code| Error::Compression(error_name(code)))?;

            let stalled = before == (input.pos(), output.pos());
            if remaining == 0 || output.pos() == capacity || stalled {
                return Ok(Pass {
                    consumed: input.pos(),
                    produced: output.pos(),
                    finished: remaining == 0,
                });
            }
        }
    }

    /// One isolated probe: a fresh frame of exactly `input` into `scratch`.
    pub fn probe(&mut self, input: &[u8], scratch: &mut [u8]) -> Result<Pass, Error> {
        self.restart()?;
        self.end_frame(input, scratch)
    }
}

/// Progress of one incremental decompression step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub consumed: usize,
    pub produced: usize,
    /// The current frame is complete and fully flushed.
    pub frame_done: bool,
}

pub(crate) struct Decoder {
    dctx: DCtx<'static>,
}

impl Decoder {
    pub fn new() -> Result<Self, Error> {
        let mut dctx = DCtx::try_create().ok_or(Error::ContextCreation("decompression"))?;
        dctx.reset(ResetDirective::SessionAndParameters)
            .map_err(|code| Error::Parameter {
                setting: "context reset",
                reason: error_name(code),
            })?;
        Ok(Self { dctx })
    }

    pub fn set(&mut self, setting: &'static str, param: DParameter) -> Result<(), Error> {
        self.dctx
            .set_parameter(param)
            .map(drop)
            .map_err(|code| Error::Parameter {
                setting,
                reason: error_name(code),
            })
    }

    /// Decodes complete frames from `input` in one call. Returns the decoded size.
    pub fn decode_all(&mut self, output: &mut [u8], input: &[u8]) -> Result<usize, Error> {
        self.dctx
            .decompress(output, input)
            .map_err(|code| Error::Decompression(error_name(code)))
    }

    pub fn step(&mut self, output: &mut [u8], input: &[u8]) -> Result<Step, Error> {
        let mut input = InBuffer::around(input);
        let mut output = OutBuffer::around(output);
        let hint = self
            .dctx
            .decompress_stream(&mut output, &mut input)
            .map_err(|code| Error::Decompression(error_name(code)))?;
        Ok(Step {
            consumed: input.pos(),
            produced: output.pos(),
            frame_done: hint == 0,
        })
    }
}
