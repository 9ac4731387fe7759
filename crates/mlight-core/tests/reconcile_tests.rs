//! End-to-end reconciliation over the in-memory store

use chrono::NaiveDate;
use mlight_core::prelude::*;
use mlight_core::{AreaId, AreaRow, InjectionRow, MemoryStore, NeuronRef, ReconcileError};
use pretty_assertions::assert_eq;

fn millis(date: &str) -> i64 {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

fn neuron(tag: &str, id: &str) -> NeuronRef {
    NeuronRef {
        tag: tag.to_string(),
        id_string: id.to_string(),
    }
}

fn area_row(id: i64, name: &str, parent: Option<i64>) -> AreaRow {
    AreaRow {
        id: AreaId(id),
        name: name.to_string(),
        parent_id: parent.map(AreaId),
    }
}

fn motor_cortex_areas() -> AreaIndex {
    AreaIndex::build([
        area_row(1, "root", None),
        area_row(2, "Isocortex", Some(1)),
        area_row(3, "Motor cortex", Some(2)),
    ])
    .unwrap()
}

/// Scenario 1: mapped published tag with a soma; unmapped and internal tags
/// are dropped.
#[tokio::test]
async fn mapped_published_tag_yields_one_record() {
    let store = MemoryStore::new();
    store.insert("tracings/Finished_Neurons/2020-01-15/G-001/soma.txt", "12,34,56");
    store.insert("tracings/Finished_Neurons/2020-01-15/G-002/soma.txt", "1,2,3");
    store.insert("tracings/Finished_Neurons/2020-01-15/internal-x/soma.txt", "9,9,9");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-01-15")),
        neurons: vec![neuron("G-001", "N100"), neuron("internal-x", "N999")],
        area_name: Some("Motor cortex".to_string()),
    }]);
    let areas = motor_cortex_areas();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let mut report = RunReport::new();
    let docs = reconciler
        .reconcile_location(TracingLocation::FinishedNeurons, &mut report)
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    let doc = &docs[0].document;
    assert_eq!(doc.title, "2020-01-15 MouseLight published neurons");
    assert_eq!(doc.len(), 1);

    let record = &doc.neurons["N100"];
    assert_eq!(record.original_name, "G-001");
    assert_eq!(record.soma_location.as_deref(), Some("12,34,56"));
    assert_eq!(record.injection_location.as_deref(), Some("Motor cortex"));
    assert_eq!(record.consensus, None);
    assert_eq!(record.dendrite, None);

    assert_eq!(report.dates_seen(), 1);
    assert_eq!(report.missing_mappings(), 0);
    assert_eq!(report.unresolved_areas(), 0);
}

/// Scenario 2: a date prefix with zero tag sub-prefixes aborts the run.
#[tokio::test]
async fn empty_date_prefix_is_fatal() {
    let store = MemoryStore::new();
    // an object directly under the date prefix advertises the date without
    // giving it any neuron sub-prefixes
    store.insert("tracings/Finished_Neurons/2020-02-01/stray.txt", "junk");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-02-01")),
        neurons: vec![neuron("G-010", "N200")],
        area_name: None,
    }]);
    let areas = AreaIndex::build([]).unwrap();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let mut report = RunReport::new();
    let err = reconciler
        .reconcile_location(TracingLocation::FinishedNeurons, &mut report)
        .await
        .unwrap_err();

    match err {
        ReconcileError::EmptyDatePrefix { location, date } => {
            assert_eq!(location, TracingLocation::FinishedNeurons);
            assert_eq!(date, "2020-02-01");
        }
        other => panic!("expected EmptyDatePrefix, got {other}"),
    }
}

/// Scenario 4: dry run performs zero writes but the document still counts.
#[tokio::test]
async fn dry_run_counts_documents_without_writes() {
    let store = MemoryStore::new();
    store.insert("tracings/tracing_complete/2020-01-15/G-001/soma.txt", "12,34,56");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-01-15")),
        neurons: vec![neuron("G-001", "N100")],
        area_name: Some("Motor cortex".to_string()),
    }]);
    let areas = motor_cortex_areas();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let emitter = Emitter::new(&store, false);
    let mut report = RunReport::new();

    let docs = reconciler
        .reconcile_location(TracingLocation::TracingComplete, &mut report)
        .await
        .unwrap();
    for doc in &docs {
        emitter.emit(doc, &mut report).await.unwrap();
    }

    assert_eq!(report.documents_written(), 1);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn dates_without_mapping_are_counted_and_skipped() {
    let store = MemoryStore::new();
    store.insert("tracings/Finished_Neurons/2019-06-01/G-001/soma.txt", "1,1,1");
    store.insert("tracings/Finished_Neurons/2020-01-15/G-001/soma.txt", "12,34,56");
    store.insert("tracings/Finished_Neurons/notes/G-000/soma.txt", "junk");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-01-15")),
        neurons: vec![neuron("G-001", "N100")],
        area_name: None,
    }]);
    let areas = AreaIndex::build([]).unwrap();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let mut report = RunReport::new();
    let docs = reconciler
        .reconcile_location(TracingLocation::FinishedNeurons, &mut report)
        .await
        .unwrap();

    // 2019-06-01 has no mapping, "notes" is not a date; only one document
    assert_eq!(docs.len(), 1);
    assert_eq!(report.dates_seen(), 3);
    assert_eq!(report.missing_mappings(), 2);
}

#[tokio::test]
async fn document_keys_are_published_ids_never_tags() {
    let store = MemoryStore::new();
    store.insert("tracings/Finished_Neurons/2020-01-15/G-001/soma.txt", "1,2,3");
    store.insert("tracings/Finished_Neurons/2020-01-15/G-002/consensus.swc", "swc");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-01-15")),
        neurons: vec![neuron("G-001", "N100"), neuron("G-002", "N101")],
        area_name: None,
    }]);
    let areas = AreaIndex::build([]).unwrap();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let mut report = RunReport::new();
    let docs = reconciler
        .reconcile_location(TracingLocation::FinishedNeurons, &mut report)
        .await
        .unwrap();

    let keys: Vec<&str> = docs[0].document.neurons.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["N100", "N101"]);
    assert_eq!(
        docs[0].document.neurons["N101"].consensus.as_deref(),
        Some("../../tracings/Finished_Neurons/2020-01-15/G-002/consensus.swc")
    );
}

#[tokio::test]
async fn repeat_runs_are_byte_identical() {
    let store = MemoryStore::new();
    store.insert("tracings/tracing_complete/2020-01-15/G-001/soma.txt", "12,34,56");
    store.insert("tracings/tracing_complete/2020-01-15/G-001/consensus.swc", "swc");
    store.insert("tracings/tracing_complete/2020-01-15/G-002/dendrite.swc", "swc");
    store.insert("tracings/tracing_complete/2020-03-02/G-010/soma.txt", "7,8,9");

    let mapping = NeuronMapIndex::build([
        InjectionRow {
            sample_date: Some(millis("2020-01-15")),
            neurons: vec![neuron("G-001", "N100"), neuron("G-002", "N101")],
            area_name: Some("Motor cortex".to_string()),
        },
        InjectionRow {
            sample_date: Some(millis("2020-03-02")),
            neurons: vec![neuron("G-010", "N200")],
            area_name: None,
        },
    ]);
    let areas = motor_cortex_areas();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let mut first_report = RunReport::new();
    let first = reconciler
        .reconcile_location(TracingLocation::TracingComplete, &mut first_report)
        .await
        .unwrap();
    let mut second_report = RunReport::new();
    let second = reconciler
        .reconcile_location(TracingLocation::TracingComplete, &mut second_report)
        .await
        .unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first_report, second_report);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.document.to_json().unwrap(), b.document.to_json().unwrap());
    }
}

#[tokio::test]
async fn unresolved_area_is_counted_not_fatal() {
    let store = MemoryStore::new();
    store.insert("tracings/Finished_Neurons/2020-01-15/G-001/soma.txt", "1,2,3");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-01-15")),
        neurons: vec![neuron("G-001", "N100")],
        area_name: Some("Unknown region".to_string()),
    }]);
    // hierarchy does not know the recorded area
    let areas = AreaIndex::build([area_row(1, "root", None)]).unwrap();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let mut report = RunReport::new();
    let docs = reconciler
        .reconcile_location(TracingLocation::FinishedNeurons, &mut report)
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(report.unresolved_areas(), 1);
    // the record still carries the recorded name
    assert_eq!(
        docs[0].document.neurons["N100"].injection_location.as_deref(),
        Some("Unknown region")
    );
}

#[tokio::test]
async fn cyclic_hierarchy_aborts_reconciliation() {
    let store = MemoryStore::new();
    store.insert("tracings/Finished_Neurons/2020-01-15/G-001/soma.txt", "1,2,3");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-01-15")),
        neurons: vec![neuron("G-001", "N100")],
        area_name: Some("a".to_string()),
    }]);
    let areas = AreaIndex::build([area_row(1, "a", Some(2)), area_row(2, "b", Some(1))]).unwrap();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let mut report = RunReport::new();
    let err = reconciler
        .reconcile_location(TracingLocation::FinishedNeurons, &mut report)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Area(_)));
}

#[tokio::test]
async fn written_documents_round_trip() {
    let store = MemoryStore::new();
    store.insert("tracings/tracing_complete/2020-01-15/G-001/soma.txt", "12,34,56");

    let mapping = NeuronMapIndex::build([InjectionRow {
        sample_date: Some(millis("2020-01-15")),
        neurons: vec![neuron("G-001", "N100")],
        area_name: Some("Motor cortex".to_string()),
    }]);
    let areas = motor_cortex_areas();

    let reconciler = Reconciler::new(&store, &mapping, &areas);
    let emitter = Emitter::new(&store, true);
    let mut report = RunReport::new();

    let docs = reconciler
        .reconcile_location(TracingLocation::TracingComplete, &mut report)
        .await
        .unwrap();
    for doc in &docs {
        emitter.emit(doc, &mut report).await.unwrap();
    }

    let body = store
        .get("neurons/tracing_complete/2020-01-15/metadata.json")
        .unwrap();
    let parsed: MetadataDocument = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed, docs[0].document);
    assert_eq!(
        store.get("images/2020-01-15/neurons.json").as_deref(),
        Some(body.as_str())
    );
}
