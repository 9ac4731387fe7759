//! Error types for the reconciliation engine
//!
//! The taxonomy distinguishes non-fatal conditions (absent artifacts, dates
//! without a mapping) that are counted and skipped, from fatal conditions
//! that abort the whole run. Only the fatal conditions appear here; the
//! non-fatal ones are represented as `Option`/counter outcomes.

use crate::area::AreaId;
use crate::document::TracingLocation;

/// Errors raised while building or traversing the area hierarchy
#[derive(Debug, thiserror::Error)]
pub enum AreaError {
    /// An area name appeared more than once in the hierarchy rows
    #[error("duplicate area name: {0}")]
    DuplicateName(String),

    /// An area name contains the reserved `,` separator
    #[error("area name contains reserved separator ',': {0}")]
    ReservedSeparator(String),

    /// Ancestor traversal revisited a node
    #[error("cyclic area hierarchy detected at area {0}")]
    CyclicHierarchy(AreaId),

    /// A node references a parent id that is not in the index
    #[error("area {id} references missing parent {parent}")]
    DanglingParent {
        /// The node holding the reference
        id: AreaId,
        /// The missing parent id
        parent: AreaId,
    },

    /// Lookup of an id that is not in the index
    #[error("unknown area id: {0}")]
    UnknownId(AreaId),
}

/// Object store transport failure
///
/// An absent key is not an error (readers return `Ok(None)`); this type
/// covers the cases where the store itself could not be reached or refused
/// the operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O or transport failure for a specific key or prefix
    #[error("object store failure for {key}: {message}")]
    Io {
        /// Offending key or prefix
        key: String,
        /// Underlying failure description
        message: String,
    },
}

impl StoreError {
    /// Wrap an underlying failure for `key`
    #[inline]
    pub fn io(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Fatal reconciliation failures
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The store advertises a date with no neuron sub-prefixes
    ///
    /// This signals a structural break between the store and the metadata
    /// service and halts processing rather than publishing an empty page.
    #[error("{location}/{date} has no neuron prefixes in the object store")]
    EmptyDatePrefix {
        /// Tracing location being reconciled
        location: TracingLocation,
        /// Date prefix as discovered in the store
        date: String,
    },

    /// Object store transport failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Area hierarchy traversal failure
    #[error(transparent)]
    Area(#[from] AreaError),
}

/// Fatal emission failures
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// Document could not be serialized
    #[error("failed to serialize document for {date}: {source}")]
    Serialize {
        /// Date of the offending document
        date: String,
        /// Underlying serializer error
        source: serde_json::Error,
    },

    /// A write failed; no partial-success policy, the run aborts
    #[error("write failed for {key}: {source}")]
    WriteFailed {
        /// Destination key
        key: String,
        /// Underlying store failure
        source: StoreError,
    },
}
