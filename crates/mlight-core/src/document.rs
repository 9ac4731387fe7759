//! Output data model
//!
//! [`MetadataDocument`] is the write-once artifact published per
//! (tracing location, date) pair, keyed by published neuron identifier.
//! `BTreeMap` keys keep serialization deterministic so repeat runs over the
//! same snapshot produce byte-identical documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Top-level category of neuron reconstruction data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TracingLocation {
    /// Finished neuron reconstructions
    FinishedNeurons,
    /// Fully-processed tracings; also feeds the viewer's images tree
    TracingComplete,
}

impl TracingLocation {
    /// Both locations, in processing order
    pub const ALL: [Self; 2] = [Self::FinishedNeurons, Self::TracingComplete];

    /// Object-store prefix segment for this location
    #[inline]
    #[must_use]
    pub fn prefix_name(self) -> &'static str {
        match self {
            Self::FinishedNeurons => "Finished_Neurons",
            Self::TracingComplete => "tracing_complete",
        }
    }

    /// Root prefix of this location's tracing artifacts
    #[inline]
    #[must_use]
    pub fn tracings_prefix(self) -> String {
        format!("tracings/{}", self.prefix_name())
    }

    /// Whether this location also publishes the images-tree document
    #[inline]
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::TracingComplete)
    }
}

impl Display for TracingLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix_name())
    }
}

/// Published record for one neuron
///
/// Populated only for tags present in both the store listing and the neuron
/// mapping, and carrying the published `G-` marker. Optional fields are
/// omitted from the serialized document when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeuronRecord {
    /// Internal working tag the artifacts were stored under
    pub original_name: String,
    /// Contents of `soma.txt`, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soma_location: Option<String>,
    /// Injection area recorded for the neuron's sample date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injection_location: Option<String>,
    /// Relative path to `consensus.swc`, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<String>,
    /// Relative path to `dendrite.swc`, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dendrite: Option<String>,
}

impl NeuronRecord {
    /// Create a record holding only the original tag
    #[inline]
    #[must_use]
    pub fn new(original_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            soma_location: None,
            injection_location: None,
            consensus: None,
            dendrite: None,
        }
    }
}

/// Consolidated per-date metadata document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    /// Human-readable document title
    pub title: String,
    /// Published identifier → neuron record
    pub neurons: BTreeMap<String, NeuronRecord>,
}

impl MetadataDocument {
    /// Create an empty document for `date`
    #[inline]
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: format!("{date} MouseLight published neurons"),
            neurons: BTreeMap::new(),
        }
    }

    /// Number of neuron records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Whether the document holds no neuron records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Serialize to the canonical JSON form
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A document together with its provenance, ready for emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledDocument {
    /// Tracing location the document was reconciled from
    pub location: TracingLocation,
    /// Sample date the document covers
    pub date: NaiveDate,
    /// The assembled document
    pub document: MetadataDocument,
}

impl ReconciledDocument {
    /// Object-store keys this document is published under
    ///
    /// Always the canonical metadata key; the fully-processed location also
    /// gets the images-tree convenience key.
    #[must_use]
    pub fn output_keys(&self) -> Vec<String> {
        let mut keys = vec![format!(
            "neurons/{}/{}/metadata.json",
            self.location.prefix_name(),
            self.date
        )];
        if self.location.is_complete() {
            keys.push(format!("images/{}/neurons.json", self.date));
        }
        keys
    }
}
