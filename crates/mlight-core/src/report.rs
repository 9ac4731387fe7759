//! End-of-run accounting
//!
//! Pure counters; the report never gates control flow.

use std::fmt::{self, Display, Formatter};

/// Counters accumulated over one reconciliation run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    dates_seen: u64,
    missing_mappings: u64,
    documents_written: u64,
    unresolved_areas: u64,
}

impl RunReport {
    /// Create a zeroed report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A date prefix was discovered in the store
    #[inline]
    pub fn date_seen(&mut self) {
        self.dates_seen += 1;
    }

    /// A discovered date had no neuron mapping
    #[inline]
    pub fn missing_mapping(&mut self) {
        self.missing_mappings += 1;
    }

    /// A document was emitted (dry-run writes count too)
    #[inline]
    pub fn document_written(&mut self) {
        self.documents_written += 1;
    }

    /// An injection area name did not resolve in the hierarchy
    #[inline]
    pub fn area_unresolved(&mut self) {
        self.unresolved_areas += 1;
    }

    /// Dates discovered in the store
    #[inline]
    #[must_use]
    pub fn dates_seen(&self) -> u64 {
        self.dates_seen
    }

    /// Dates skipped for lack of a neuron mapping
    #[inline]
    #[must_use]
    pub fn missing_mappings(&self) -> u64 {
        self.missing_mappings
    }

    /// Documents emitted
    #[inline]
    #[must_use]
    pub fn documents_written(&self) -> u64 {
        self.documents_written
    }

    /// Area names that did not resolve
    #[inline]
    #[must_use]
    pub fn unresolved_areas(&self) -> u64 {
        self.unresolved_areas
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dates in object store:   {}", self.dates_seen)?;
        writeln!(f, "Missing neuron mappings: {}", self.missing_mappings)?;
        writeln!(f, "Metadata files written:  {}", self.documents_written)?;
        write!(f, "Unresolved area names:   {}", self.unresolved_areas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut report = RunReport::new();
        report.date_seen();
        report.date_seen();
        report.missing_mapping();
        report.document_written();

        assert_eq!(report.dates_seen(), 2);
        assert_eq!(report.missing_mappings(), 1);
        assert_eq!(report.documents_written(), 1);
        assert_eq!(report.unresolved_areas(), 0);
    }

    #[test]
    fn summary_lines() {
        let mut report = RunReport::new();
        report.date_seen();
        let text = report.to_string();
        assert!(text.contains("Dates in object store:   1"));
        assert!(text.contains("Metadata files written:  0"));
    }
}
