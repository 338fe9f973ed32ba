use thiserror::Error;

use crate::model::cursor::Span;
use crate::model::unit::Unit;

/// Contract violations raised while cutting and moving text.
///
/// None of these are expected at runtime; an edit that hits one is rolled back
/// by [`Buffer::transaction`](crate::model::buffer::Buffer::transaction).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveError {
    /// The unit cannot be used for the requested operation.
    #[error("unit `{unit}` is not valid for {operation}")]
    InvalidUnit { unit: Unit, operation: &'static str },

    /// An argument is outside what the unit supports.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lifecycle step was called out of order, or layout metrics are degenerate.
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    /// A sibling region reported an edit that does not precede this region.
    #[error("edit at {edit:?} does not precede pending region at {pending:?}")]
    OrderingViolation { edit: Span, pending: Span },
}

pub type Result<T, E = MoveError> = std::result::Result<T, E>;
