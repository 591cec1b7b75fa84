//! Configuration files change engine behaviour

use context_relations::{
    CodeSnippet, Corpus, FunctionCategory, FunctionDescriptor, MatchMode, RelationConfig,
    RelationshipEngine, SnippetSource,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn toml_file_narrows_prerequisite_window() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("relations.toml");
    fs::write(
        &path,
        "schema_version = 1\nprerequisite_window = 1\nmatch_mode = \"word_boundary\"\n",
    )
    .unwrap();

    let config = RelationConfig::from_file(&path).unwrap();
    assert_eq!(config.prerequisite_window, 1);
    assert_eq!(config.match_mode, MatchMode::WordBoundary);

    let fns = vec![
        FunctionDescriptor::new("open", FunctionCategory::Factory, "Handle"),
        FunctionDescriptor::new("read", FunctionCategory::Action, "Buffer"),
    ];
    let corpus = Corpus::new(vec![CodeSnippet::new(
        "const h = open(path);\nlog(h);\nconst buf = read(h);",
        SnippetSource::Documentation,
    )]);

    let narrow = RelationshipEngine::new(config).analyze(&fns, &corpus).unwrap();
    assert!(narrow.maps[1].contextual_info.prerequisite_chain.is_none());

    let wide = RelationshipEngine::default().analyze(&fns, &corpus).unwrap();
    assert_eq!(
        wide.maps[1]
            .contextual_info
            .prerequisite_chain
            .as_ref()
            .map(|c| c.prerequisites.clone()),
        Some(vec!["open".to_string()])
    );
}

#[test]
fn json_file_is_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("relations.json");
    fs::write(&path, r#"{"schema_version": 1, "isolate_failures": true}"#).unwrap();

    let config = RelationConfig::from_file(&path).unwrap();
    assert!(config.isolate_failures);
    assert_eq!(config.prerequisite_window, RelationConfig::default().prerequisite_window);
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let err = RelationConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), context_relations::ErrorKind::Config);
}
