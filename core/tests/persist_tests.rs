use docgraph_core::persist::{
    load_frequency_summary, load_graph, load_meta, load_store, save_document_counts, save_frequency_summary, save_graph,
    save_meta, save_store, save_total_counts, ArtifactPaths, MetaFile,
};
use docgraph_core::{
    run, CorpusStatus, DocumentId, FrequencySummary, GraphError, PipelineConfig, TermCountMap, TermCountStore,
};
use std::fs;
use tempfile::tempdir;

fn counts(pairs: &[(&str, u64)]) -> TermCountMap {
    pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
}

fn sample_store() -> TermCountStore {
    TermCountStore::from_documents(vec![
        ("Alzheimer's_disease", counts(&[("memory", 5), ("brain", 4)])),
        ("Parkinson's_disease", counts(&[("tremor", 3), ("brain", 5)])),
        ("Gout", counts(&[("joint", 4), ("uric", 2)])),
    ])
    .unwrap()
}

#[test]
fn store_survives_a_write_and_reload() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    let store = sample_store();
    save_store(&paths, &store).unwrap();

    assert!(paths.docs_dir().join("Alzheimer%27s_disease.json").is_file());

    let loaded = load_store(&paths).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.aggregate(), store.aggregate());
    let keys: Vec<&str> = loaded.aggregate().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["memory", "brain", "tremor", "joint", "uric"]);
    assert_eq!(
        loaded.document(&DocumentId::from("Parkinson's_disease")),
        store.document(&DocumentId::from("Parkinson's_disease"))
    );
}

#[test]
fn missing_aggregate_is_reported() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    save_document_counts(&paths, &DocumentId::from("Gout"), &counts(&[("joint", 1)])).unwrap();
    let err = load_store(&paths).unwrap_err();
    match err {
        GraphError::MissingInput { id, .. } => assert!(id.ends_with("total_count.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_records_directory_is_missing_input() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    save_total_counts(&paths, &counts(&[("joint", 1)])).unwrap();
    fs::create_dir_all(paths.docs_dir()).unwrap();
    assert!(matches!(load_store(&paths), Err(GraphError::MissingInput { .. })));
}

#[test]
fn non_json_files_are_ignored() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    save_store(&paths, &sample_store()).unwrap();
    fs::write(paths.docs_dir().join("notes.txt"), "not a record").unwrap();
    assert_eq!(load_store(&paths).unwrap().len(), 3);
}

#[test]
fn rewriting_the_store_drops_records_of_the_previous_corpus() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    save_store(&paths, &sample_store()).unwrap();

    let next = TermCountStore::from_documents(vec![
        ("Gout", counts(&[("joint", 2)])),
        ("Scurvy", counts(&[("vitamin", 3)])),
    ])
    .unwrap();
    save_store(&paths, &next).unwrap();

    let loaded = load_store(&paths).unwrap();
    let ids: Vec<&str> = loaded.documents().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["Gout", "Scurvy"]);
    assert_eq!(loaded.aggregate(), next.aggregate());
}

#[test]
fn frequency_summary_sits_next_to_the_aggregate() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    let store = sample_store();
    let summary = FrequencySummary::from_counts(store.aggregate(), 2);
    save_frequency_summary(&paths, &summary).unwrap();

    assert_eq!(paths.summary().parent(), paths.total_count().parent());
    let loaded = load_frequency_summary(&paths).unwrap();
    assert_eq!(loaded, summary);
    assert_eq!(loaded.top[0].term, "brain");
    assert_eq!(loaded.total, 23);
}

#[test]
fn graph_and_meta_round_trip() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    let out = run(&sample_store(), &PipelineConfig::default()).unwrap();
    save_graph(&paths, &out.graph).unwrap();
    save_meta(&paths, &MetaFile::now(out.report.clone())).unwrap();

    assert_eq!(load_graph(&paths).unwrap(), out.graph);
    let meta = load_meta(&paths).unwrap();
    assert_eq!(meta.report, out.report);
    assert_eq!(meta.report.status, CorpusStatus::Complete);
    assert!(!meta.created_at.is_empty());

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(paths.graph()).unwrap()).unwrap();
    assert_eq!(raw["Gout"]["names"].as_array().unwrap().len(), 2);
}
