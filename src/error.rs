use thiserror::Error;
use uuid::Uuid;

/// Failures detected by a single aggregate operation. All of these are
/// synchronous and final: the caller reports them, it does not retry.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("seat map {0} not found")]
    SeatMapNotFound(Uuid),

    #[error("seat {0} not found")]
    SeatNotFound(Uuid),

    #[error("category '{0}' is not registered in this seat map")]
    CategoryNotFound(String),

    #[error("category '{0}' already exists in this seat map")]
    DuplicateCategory(String),

    #[error("seat at row {row} number {number} already exists")]
    DuplicateSeatPosition { row: u32, number: u32 },

    #[error("seat {0} is not available")]
    SeatNotAvailable(Uuid),

    #[error("seat {0} is not reserved by this holder")]
    SeatNotReservedByHolder(Uuid),

    #[error("row and number must be positive")]
    InvalidPosition,
}

/// Coarse classification used at the API boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::SeatMapNotFound(_)
            | DomainError::SeatNotFound(_)
            | DomainError::CategoryNotFound(_) => ErrorKind::NotFound,
            DomainError::DuplicateCategory(_)
            | DomainError::DuplicateSeatPosition { .. }
            | DomainError::SeatNotAvailable(_)
            | DomainError::SeatNotReservedByHolder(_) => ErrorKind::Conflict,
            DomainError::InvalidPosition => ErrorKind::Validation,
        }
    }
}

/// Failures at the persistence boundary. `VersionConflict` is the optimistic
/// write losing a race; the command layer retries it, it never reaches the
/// aggregate.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("seat map {0} not found in store")]
    NotFound(Uuid),

    #[error("seat map {0} was modified concurrently")]
    VersionConflict(Uuid),

    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// What a command handler surfaces to its caller.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Domain(e) => e.kind(),
            CommandError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            CommandError::Store(_) => ErrorKind::Conflict,
        }
    }
}
