//! The reconciliation algorithm
//!
//! For one tracing location the [`Reconciler`] enumerates date prefixes,
//! matches the neuron tags present in the store against the expected
//! mapping, reads the per-neuron artifacts, and assembles one
//! [`MetadataDocument`] per date that yields at least one populated record.
//!
//! The object store is ground truth for *existence*, the metadata service is
//! ground truth for *identity*: a tag absent from either side is dropped
//! silently, except a date with zero tag prefixes, which signals a
//! structural break between the two systems and aborts the run.

use crate::area::AreaIndex;
use crate::document::{MetadataDocument, NeuronRecord, ReconciledDocument, TracingLocation};
use crate::error::{ReconcileError, StoreError};
use crate::mapping::NeuronMapIndex;
use crate::report::RunReport;
use crate::store::{ArtifactReader, PrefixWalker};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Marker carried by externally-published neuron tags
///
/// Internal/working tags lack it and are excluded by convention.
pub const PUBLISHED_TAG_MARKER: &str = "G-";

/// What the store actually holds for one (date, tag); never persisted
#[derive(Debug, Default)]
struct DiscoveredArtifact {
    soma_location: Option<String>,
    consensus: bool,
    dendrite: bool,
}

/// Drives reconciliation of one tracing location at a time
///
/// Holds shared references to the read-only indices; safe to reuse across
/// locations.
#[derive(Debug)]
pub struct Reconciler<'a, S> {
    store: &'a S,
    mapping: &'a NeuronMapIndex,
    areas: &'a AreaIndex,
}

impl<'a, S> Reconciler<'a, S>
where
    S: PrefixWalker + ArtifactReader,
{
    /// Create a reconciler over `store` with the given indices
    #[inline]
    #[must_use]
    pub fn new(store: &'a S, mapping: &'a NeuronMapIndex, areas: &'a AreaIndex) -> Self {
        Self {
            store,
            mapping,
            areas,
        }
    }

    /// Reconcile every date under `location`
    ///
    /// Dates without a mapping are counted and skipped. A date prefix with
    /// zero tag sub-prefixes is fatal.
    ///
    /// # Errors
    /// [`ReconcileError::EmptyDatePrefix`] on a structurally inconsistent
    /// date, store or area-hierarchy failures otherwise.
    pub async fn reconcile_location(
        &self,
        location: TracingLocation,
        report: &mut RunReport,
    ) -> Result<Vec<ReconciledDocument>, ReconcileError> {
        let root = location.tracings_prefix();
        let dates = self.store.children(&root).await?;
        tracing::info!(%location, count = dates.len(), "discovered date prefixes");

        let mut documents = Vec::new();
        for date_name in dates {
            report.date_seen();
            let Some(date) = parse_date_prefix(&date_name) else {
                tracing::warn!(%location, prefix = %date_name, "prefix is not a date; skipping");
                report.missing_mapping();
                continue;
            };
            if !self.mapping.has_date(date) {
                tracing::warn!(%date, "date has no neuron mappings");
                report.missing_mapping();
                continue;
            }

            let date_prefix = format!("{root}/{date_name}");
            let tags = self.store.children(&date_prefix).await?;
            if tags.is_empty() {
                return Err(ReconcileError::EmptyDatePrefix {
                    location,
                    date: date_name,
                });
            }

            self.check_injection_area(date, report)?;

            let mut neurons = BTreeMap::new();
            for tag in tags {
                let Some(published_id) = self.mapping.lookup(date, &tag) else {
                    tracing::debug!(%date, %tag, "tag not in mapping; dropped");
                    continue;
                };
                if !tag.starts_with(PUBLISHED_TAG_MARKER) {
                    tracing::debug!(%date, %tag, "tag is not published; dropped");
                    continue;
                }
                let discovered = self.discover(&date_prefix, &tag).await?;
                let record =
                    assemble_record(&tag, discovered, self.mapping.area_of(date), &date_prefix);
                neurons.insert(published_id.to_string(), record);
            }

            if neurons.is_empty() {
                tracing::debug!(%date, "no populated tags; no document");
                continue;
            }
            let mut document = MetadataDocument::new(date);
            document.neurons = neurons;
            documents.push(ReconciledDocument {
                location,
                date,
                document,
            });
        }
        Ok(documents)
    }

    /// Read the three per-neuron artifacts under `date_prefix/tag/`
    async fn discover(
        &self,
        date_prefix: &str,
        tag: &str,
    ) -> Result<DiscoveredArtifact, StoreError> {
        let soma_location = self
            .store
            .read(&format!("{date_prefix}/{tag}/soma.txt"))
            .await?;
        let consensus = self
            .store
            .read(&format!("{date_prefix}/{tag}/consensus.swc"))
            .await?
            .is_some();
        let dendrite = self
            .store
            .read(&format!("{date_prefix}/{tag}/dendrite.swc"))
            .await?
            .is_some();
        Ok(DiscoveredArtifact {
            soma_location,
            consensus,
            dendrite,
        })
    }

    /// Resolve the date's injection area through the hierarchy
    ///
    /// A name absent from the hierarchy only feeds the report; a cycle or
    /// dangling parent inside the hierarchy is fatal.
    fn check_injection_area(
        &self,
        date: NaiveDate,
        report: &mut RunReport,
    ) -> Result<(), ReconcileError> {
        let Some(name) = self.mapping.area_of(date) else {
            return Ok(());
        };
        match self.areas.lookup_id_by_name(name) {
            Some(id) => {
                let ancestors = self.areas.resolve_ancestors(id)?;
                tracing::debug!(%date, area = %name, ?ancestors, "resolved injection area");
            }
            None => {
                tracing::warn!(%date, area = %name, "injection area not in hierarchy");
                report.area_unresolved();
            }
        }
        Ok(())
    }
}

/// Assemble the output record for one populated tag
fn assemble_record(
    tag: &str,
    discovered: DiscoveredArtifact,
    area_name: Option<&str>,
    date_prefix: &str,
) -> NeuronRecord {
    let mut record = NeuronRecord::new(tag);
    if let Some(soma) = discovered.soma_location {
        record.soma_location = Some(soma);
        record.injection_location = area_name.map(str::to_string);
    }
    // paths are relative to a sibling images tree, two levels up
    if discovered.consensus {
        record.consensus = Some(format!("../../{date_prefix}/{tag}/consensus.swc"));
    }
    if discovered.dendrite {
        record.dendrite = Some(format!("../../{date_prefix}/{tag}/dendrite.swc"));
    }
    record
}

/// Parse a date-level prefix name; listing junk is not a date
fn parse_date_prefix(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name, "%Y-%m-%d").ok()
}
