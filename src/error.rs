use thiserror::Error;

/// Reasons an allocation call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The requested student count is missing, non-numeric, zero or negative.
    #[error("invalid requested count: {0}")]
    InvalidRequest(String),

    /// Demand exceeds the combined capacity of the whole inventory.
    #[error(
        "not enough seats available: requested {requested}, total capacity {total_available_capacity}"
    )]
    InsufficientCapacity {
        requested: u64,
        total_available_capacity: u64,
    },
}

/// Errors raised by the classroom inventory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(String),

    #[error("Room ID \"{0}\" already exists. Please use a different ID.")]
    DuplicateRoom(String),
}
