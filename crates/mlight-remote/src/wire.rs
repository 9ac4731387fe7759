//! Wire structs for the two query shapes
//!
//! Decoded with serde and converted into the engine's row types; the wire
//! layer never leaks past this crate's fetch methods.

use mlight_core::{AreaId, AreaRow, InjectionRow, NeuronRef};
use serde::Deserialize;

/// GraphQL-style `{"data": ...}` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InjectionsData {
    pub(crate) injections: Vec<InjectionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BrainAreasData {
    pub(crate) brain_areas: Vec<AreaWire>,
}

/// One injections-query row
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InjectionWire {
    pub(crate) sample: Option<SampleWire>,
    #[serde(default)]
    pub(crate) neurons: Vec<NeuronWire>,
    pub(crate) brain_area: Option<BrainAreaWire>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SampleWire {
    pub(crate) sample_date: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NeuronWire {
    pub(crate) id_string: String,
    pub(crate) tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BrainAreaWire {
    pub(crate) name: String,
}

/// One brain-area-query row
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AreaWire {
    pub(crate) structure_id: i64,
    pub(crate) name: String,
    pub(crate) parent_structure_id: Option<i64>,
}

impl From<InjectionWire> for InjectionRow {
    fn from(wire: InjectionWire) -> Self {
        Self {
            sample_date: wire.sample.map(|s| s.sample_date),
            neurons: wire
                .neurons
                .into_iter()
                .map(|n| NeuronRef {
                    tag: n.tag,
                    id_string: n.id_string,
                })
                .collect(),
            area_name: wire.brain_area.map(|a| a.name),
        }
    }
}

impl From<AreaWire> for AreaRow {
    fn from(wire: AreaWire) -> Self {
        Self {
            id: AreaId(wire.structure_id),
            name: wire.name,
            parent_id: wire.parent_structure_id.map(AreaId),
        }
    }
}
