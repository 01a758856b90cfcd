use thiserror::Error;

/// The mutually exclusive flag pairs a prioritised collection refuses.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagConflict {
    #[error("cannot be ordered both descending as ascending")]
    Order,
    #[error("cannot have no priority items at the start and end")]
    NoPriorityPlacement,
    #[error("cannot have null items at the start and end")]
    NullPlacement,
}

/// Errors raised by prioritised collections.
///
/// Both variants are caller errors: nothing is retried or suppressed inside the
/// collection. Flag errors are raised before any element is touched, null
/// errors are raised per element.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Invalid PrioritisedCollection flags, {0}")]
    InvalidFlags(#[from] FlagConflict),
    #[error("Null value passed to a collection that does not accept null values")]
    NullNotAllowed,
}
