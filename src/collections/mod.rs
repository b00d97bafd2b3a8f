//! Hand-built containers used by the reservation engine.
//!
//! [`OrderedSequence`] keeps units and their reservations sorted;
//! [`UnorderedList`] tracks each client's own leases in booking order.

mod sorted;
mod unordered;

pub use sorted::{Cursor, OrderedSequence};
pub use unordered::UnorderedList;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// An equal element is already present.
    DuplicateElement,
    IndexOutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceError::DuplicateElement => write!(f, "element already contained in the list"),
            SequenceError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is outside of list of length {len}")
            }
        }
    }
}

impl std::error::Error for SequenceError {}
