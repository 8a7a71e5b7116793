use thiserror::Error;

/// Fatal failure of a session operation.
///
/// Every variant carries only static text or sizes, so errors are cheap to
/// clone and log. A session that returned an `Error` should be dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Block size must be greater than zero")]
    ZeroBlockSize,

    #[error("Error creating {0} context")]
    ContextCreation(&'static str),

    #[error("Error setting {setting}: {reason}")]
    Parameter {
        setting: &'static str,
        reason: &'static str,
    },

    #[error("Output buffer too small: need {needed} bytes, got {available}")]
    OutputTooSmall { needed: usize, available: usize },

    #[error("Output buffer size must equal block size {expected}, got {actual}")]
    OutputSizeMismatch { expected: usize, actual: usize },

    #[error("Compression failed: {0}")]
    Compression(&'static str),

    #[error("Decompression failed: {0}")]
    Decompression(&'static str),

    #[error("Compressed input ended inside a frame")]
    IncompleteFrame,
}
