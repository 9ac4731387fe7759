//! Neuron identity index
//!
//! Maps each sample date to its neuron tag → published identifier table and
//! the injection area recorded for that date. Built once from the injections
//! query; read-only afterward.

use chrono::{DateTime, NaiveDate};
use std::collections::HashMap;

/// One neuron reference inside an injection row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeuronRef {
    /// Internal working tag (object-store sub-prefix)
    pub tag: String,
    /// Externally published identifier
    pub id_string: String,
}

/// One row of the injections query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionRow {
    /// Sample timestamp in epoch milliseconds, `None` when the row has no
    /// sample attached
    pub sample_date: Option<i64>,
    /// Neurons recorded for the injection
    pub neurons: Vec<NeuronRef>,
    /// Injection brain-area name, when recorded
    pub area_name: Option<String>,
}

/// Per-date record of neuron mappings and the injection area
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InjectionRecord {
    area_name: Option<String>,
    neurons: HashMap<String, String>,
}

impl InjectionRecord {
    /// Injection area name for this date, when recorded
    #[inline]
    #[must_use]
    pub fn area_name(&self) -> Option<&str> {
        self.area_name.as_deref()
    }

    /// Number of tag mappings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Whether this record holds no tag mappings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }
}

/// date → neuron tag → published identifier index
///
/// Rows missing a sample or carrying no neurons are skipped, so a date being
/// present implies at least one tag mapping exists for it. When multiple
/// injections share a date the merge is last-write-wins for both the tag map
/// and the area name; a conflicting area name is logged at WARN.
#[derive(Debug, Default)]
pub struct NeuronMapIndex {
    by_date: HashMap<NaiveDate, InjectionRecord>,
}

impl NeuronMapIndex {
    /// Build the index from injection rows
    #[must_use]
    pub fn build(rows: impl IntoIterator<Item = InjectionRow>) -> Self {
        let mut by_date: HashMap<NaiveDate, InjectionRecord> = HashMap::new();
        for row in rows {
            let Some(millis) = row.sample_date else {
                continue;
            };
            if row.neurons.is_empty() {
                continue;
            }
            let Some(date) = floor_to_day_utc(millis) else {
                tracing::warn!(millis, "injection row has an out-of-range sample date");
                continue;
            };
            let record = by_date.entry(date).or_default();
            for neuron in row.neurons {
                record.neurons.insert(neuron.tag, neuron.id_string);
            }
            if let Some(name) = row.area_name {
                if let Some(previous) = record.area_name.as_deref() {
                    if previous != name {
                        tracing::warn!(
                            %date,
                            previous,
                            replacement = %name,
                            "injections disagree on the area for this date; keeping the last seen"
                        );
                    }
                }
                record.area_name = Some(name);
            }
        }
        Self { by_date }
    }

    /// Whether any mapping exists for `date`
    #[inline]
    #[must_use]
    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    /// Look up the published identifier for `(date, tag)`
    #[inline]
    #[must_use]
    pub fn lookup(&self, date: NaiveDate, tag: &str) -> Option<&str> {
        self.by_date
            .get(&date)?
            .neurons
            .get(tag)
            .map(String::as_str)
    }

    /// Injection area name recorded for `date`
    #[inline]
    #[must_use]
    pub fn area_of(&self, date: NaiveDate) -> Option<&str> {
        self.by_date.get(&date)?.area_name()
    }

    /// Number of dates in the index
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    /// Whether the index holds no dates
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// Floor an epoch-millisecond timestamp to its UTC calendar day
#[inline]
#[must_use]
pub fn floor_to_day_utc(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}
