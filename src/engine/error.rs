use crate::collections::SequenceError;
use crate::model::{ConfirmationNumber, Location};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidRequest(&'static str),
    OutOfService(Location),
    InvalidDateRange(&'static str),
    InsufficientCapacity { requested: u32, available: u32 },
    LeaseNotFound(ConfirmationNumber),
    UnitNotFound(String),
    ClientNotFound(String),
    LocationConflict(Location),
    DuplicateClient(String),
    Sequence(SequenceError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            EngineError::OutOfService(loc) => write!(f, "unit {loc} is not in service"),
            EngineError::InvalidDateRange(msg) => write!(f, "invalid dates: {msg}"),
            EngineError::InsufficientCapacity {
                requested,
                available,
            } => {
                write!(
                    f,
                    "insufficient capacity: {requested} occupants requested, {available} available"
                )
            }
            EngineError::LeaseNotFound(conf) => write!(f, "no lease with confirmation number {conf}"),
            EngineError::UnitNotFound(loc) => write!(f, "no rental unit at {loc}"),
            EngineError::ClientNotFound(id) => write!(f, "no client with id {id}"),
            EngineError::LocationConflict(loc) => {
                write!(f, "a rental unit already exists at {loc}")
            }
            EngineError::DuplicateClient(id) => write!(f, "a client with id {id} already exists"),
            EngineError::Sequence(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<SequenceError> for EngineError {
    fn from(e: SequenceError) -> Self {
        EngineError::Sequence(e)
    }
}
