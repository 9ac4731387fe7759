//! mlight-core — reconciliation engine for the MouseLight tracing archive
//!
//! Reconciles neuron tracing artifacts in an object store against the
//! identity and anatomical-area metadata of the NeuronBrowser service:
//! - [`AreaIndex`] / [`NeuronMapIndex`] — read-only indices built once from
//!   the remote service
//! - [`Reconciler`] — matches discovered artifacts against the expected
//!   mapping and assembles one [`MetadataDocument`] per date
//! - [`Emitter`] — persists documents, gated by a write-enable flag
//! - [`RunReport`] — end-of-run accounting
//!
//! The object-store boundary is three trait seams ([`PrefixWalker`],
//! [`ArtifactReader`], [`DocumentSink`]); [`MemoryStore`] implements them
//! in memory for tests.

pub mod area;
pub mod document;
pub mod emit;
pub mod error;
pub mod mapping;
pub mod reconcile;
pub mod report;
pub mod store;

pub use area::{AreaId, AreaIndex, AreaNode, AreaRow};
pub use document::{MetadataDocument, NeuronRecord, ReconciledDocument, TracingLocation};
pub use emit::Emitter;
pub use error::{AreaError, EmitError, ReconcileError, StoreError};
pub use mapping::{InjectionRecord, InjectionRow, NeuronMapIndex, NeuronRef};
pub use reconcile::{Reconciler, PUBLISHED_TAG_MARKER};
pub use report::RunReport;
pub use store::{ArtifactReader, DocumentSink, MemoryStore, PrefixWalker};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a reconciliation run
    pub use crate::{
        AreaIndex, Emitter, MetadataDocument, NeuronMapIndex, ReconciledDocument, Reconciler,
        RunReport, TracingLocation,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
