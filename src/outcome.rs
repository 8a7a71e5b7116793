use std::borrow::Cow;

use crate::error::Error;

/// Result of every `pack`/`unpack` call. The `Err` arm is the fatal case.
pub type Outcome<T> = Result<T, Error>;

/// Non-fatal completion status of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Fully done, nothing pending.
    Ok,
    /// Call again; input or output is still pending.
    NotDone,
    /// The chunk did not shrink. Store the raw bytes; the cursor already moved past them.
    Incompressible,
}

impl Status {
    /// Short description for logs. `Ok` has none.
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::Ok => None,
            Self::NotDone => Some("More data to process"),
            Self::Incompressible => Some("Data incompressible"),
        }
    }
}

/// The flattened four-way discriminant of an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ok,
    Failure,
    NotDone,
    Incompressible,
}

impl From<Status> for State {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => Self::Ok,
            Status::NotDone => Self::NotDone,
            Status::Incompressible => Self::Incompressible,
        }
    }
}

/// Output of one compression call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packed {
    pub status: Status,
    /// Compressed bytes written to the front of the destination. Always 0 when incompressible.
    pub size: usize,
}

impl Packed {
    pub(crate) const fn new(status: Status, size: usize) -> Self {
        Self { status, size }
    }

    pub(crate) const fn incompressible() -> Self {
        Self::new(Status::Incompressible, 0)
    }
}

/// Output of one decompression call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unpacked {
    pub status: Status,
    /// Decompressed bytes written to the front of the destination.
    pub size: usize,
    /// Compressed bytes consumed from the input of this call.
    pub consumed: usize,
}

/// Anything that reports a [`Status`].
pub trait Progress {
    fn status(&self) -> Status;
}

impl Progress for Packed {
    fn status(&self) -> Status {
        self.status
    }
}

impl Progress for Unpacked {
    fn status(&self) -> Status {
        self.status
    }
}

/// Four-state view over an [`Outcome`], plus its optional diagnostic text.
pub trait OutcomeExt {
    fn state(&self) -> State;
    fn text(&self) -> Option<Cow<'static, str>>;
}

impl<T: Progress> OutcomeExt for Outcome<T> {
    fn state(&self) -> State {
        match self {
            Ok(progress) => progress.status().into(),
            Err(_) => State::Failure,
        }
    }

    fn text(&self) -> Option<Cow<'static, str>> {
        match self {
            Ok(progress) => progress.status().message().map(Cow::Borrowed),
            Err(err) => Some(Cow::Owned(err.to_string())),
        }
    }
}
