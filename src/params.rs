//! Configuration types and the numeric helpers that map them onto engine parameters.

/// Smallest window log the engine accepts.
pub const WINDOW_LOG_MIN: u32 = 10;

/// Largest window log the engine accepts on this target.
pub const WINDOW_LOG_MAX: u32 = if cfg!(target_pointer_width = "64") {
    31
} else {
    30
};

/// Accepted range of the target compressed block size hint.
const TARGET_BLOCK_MIN: usize = 1340;
const TARGET_BLOCK_MAX: usize = 128 * 1024;

/// Largest source size hint the engine accepts (it is stored as a C `int`).
const SIZE_HINT_MAX: usize = i32::MAX as usize;

/// How a session cuts the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The whole source becomes one frame aimed at `block_size`.
    Block,
    /// The source is cut into chunks of at most `block_size`, one frame per chunk.
    #[default]
    Streaming,
}

/// Compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    Fast,
    Medium,
    #[default]
    High,
}

impl Level {
    /// The engine's numeric level for this setting.
    #[must_use]
    pub fn engine_level(self) -> i32 {
        match self {
            Self::Fast => 1,
            Self::Medium => zstd_safe::CLEVEL_DEFAULT,
            Self::High => zstd_safe::max_c_level(),
        }
    }
}

/// Number of bits needed to address `size` bytes, i.e. `ceil(log2(size))`.
#[must_use]
pub const fn log2_round_up(size: usize) -> u32 {
    if size <= 1 {
        0
    } else {
        usize::BITS - (size - 1).leading_zeros()
    }
}

/// Decoder window log for frames of up to `size` bytes, clamped to the engine range.
#[must_use]
pub const fn window_log_for(size: usize) -> u32 {
    let log = log2_round_up(size);
    if log < WINDOW_LOG_MIN {
        WINDOW_LOG_MIN
    } else if log > WINDOW_LOG_MAX {
        WINDOW_LOG_MAX
    } else {
        log
    }
}

/// Target compressed block size hint for `block_size`, clamped to the engine range.
#[must_use]
pub fn target_block_size(block_size: usize) -> u32 {
    block_size.clamp(TARGET_BLOCK_MIN, TARGET_BLOCK_MAX) as u32
}

/// Source size hint for a source of `len` bytes.
#[must_use]
pub fn size_hint(len: usize) -> u32 {
    len.min(SIZE_HINT_MAX) as u32
}
