//! Tests for RelationshipGraph operations

use context_relations::{
    build_relationships, CodeSnippet, Corpus, FunctionCategory, FunctionDescriptor,
    RelationshipGraph, RelationshipType, SnippetSource,
};
use pretty_assertions::assert_eq;

fn make_graph() -> RelationshipGraph {
    let fns = vec![
        FunctionDescriptor::new("connect", FunctionCategory::Factory, "Client"),
        FunctionDescriptor::new("query", FunctionCategory::Action, "Rows")
            .param("client", "Client"),
        FunctionDescriptor::new("queryOne", FunctionCategory::Action, "Rows")
            .param("client", "Client"),
        FunctionDescriptor::new("close", FunctionCategory::Setter, "boolean"),
    ];
    let corpus = Corpus::new(vec![CodeSnippet::new(
        "const c = connect(url);\nconst rows = query(c, sql);",
        SnippetSource::UsageExample,
    )]);
    let report = build_relationships(&fns, &corpus);
    RelationshipGraph::from_maps(report.data.as_deref().unwrap_or_default())
}

#[test]
fn test_nodes_for_every_function() {
    let graph = make_graph();

    for name in ["connect", "query", "queryOne", "close"] {
        assert!(graph.find_node(name).is_some(), "missing node {name}");
    }
    assert!(graph.find_node("missing").is_none());

    let (nodes, edges) = graph.stats();
    assert_eq!(nodes, 4);
    assert!(edges > 0);
}

#[test]
fn test_related_by_type() {
    let graph = make_graph();

    assert_eq!(
        graph
            .related("query", RelationshipType::PrerequisiteFor)
            .unwrap(),
        vec!["connect".to_string()]
    );
    assert!(graph
        .related("query", RelationshipType::AlternativeTo)
        .unwrap()
        .contains(&"queryOne".to_string()));
    assert!(graph
        .related("unknown", RelationshipType::AlternativeTo)
        .is_err());
}

#[test]
fn test_referenced_by() {
    let graph = make_graph();

    let refs = graph.referenced_by("connect").unwrap();
    assert!(refs.contains(&("query".to_string(), RelationshipType::PrerequisiteFor)));
    assert!(refs.contains(&("queryOne".to_string(), RelationshipType::TransformsOutputOf)));
}

#[test]
fn test_neighbors_within_depth() {
    let graph = make_graph();

    let one_hop = graph.neighbors_within("queryOne", 1).unwrap();
    assert!(one_hop.iter().all(|(_, depth, path)| *depth == 1 && path.len() == 1));
    assert!(one_hop.iter().any(|(name, _, _)| name == "connect"));
    assert!(one_hop.iter().all(|(name, _, _)| name != "queryOne"));

    let isolated = graph.neighbors_within("close", 3).unwrap();
    assert!(isolated.is_empty());
}

#[test]
fn test_find_path() {
    let graph = make_graph();

    let path = graph.find_path("query", "connect").unwrap();
    assert_eq!(path.first().map(String::as_str), Some("query"));
    assert_eq!(path.last().map(String::as_str), Some("connect"));

    assert!(graph.find_path("close", "connect").is_none());
    assert!(graph.find_path("query", "missing").is_none());
}

#[test]
fn test_hubs_ranked_by_degree() {
    let graph = make_graph();

    let hubs = graph.hubs(2);
    assert_eq!(hubs.len(), 2);
    assert!(hubs[0].1 >= hubs[1].1);
    assert!(hubs.iter().all(|(name, _)| name != "close"));
}
