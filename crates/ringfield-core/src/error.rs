use thiserror::Error;

/// Errors reported by field, blob, and loop construction.
///
/// Steady-state ticking never fails; everything here surfaces synchronously
/// from a constructor, from starting the frame loop, or from calling into the
/// loop while it is mid-frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    /// A count, range, or constant was outside its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A colour string was not of the form `#rrggbb`.
    #[error("invalid colour {0:?}: expected #rrggbb")]
    InvalidColor(String),

    /// The host could not provide a drawable surface.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The host refused to schedule a frame.
    #[error("frame scheduler failed: {0}")]
    Scheduler(String),

    /// The frame loop was re-entered while a frame held its state, e.g. from
    /// inside the render callback.
    #[error("frame loop busy: {0}")]
    Busy(String),
}

impl FieldError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FieldError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FieldError>;
