//! End-to-end behaviour of the relationship engine

use context_relations::{
    build_relationships, build_relationships_from_value, merge_relationships, CodeSnippet,
    Corpus, CorpusSources, DocSection, ErrorKind, FunctionCategory, FunctionDescriptor,
    MatchMode, RelationConfig, RelationshipEngine, RelationshipMap, RelationshipType,
    SnippetSource, MAX_RELATIONSHIPS,
};
use pretty_assertions::assert_eq;

fn func(name: &str, category: FunctionCategory, return_type: &str) -> FunctionDescriptor {
    FunctionDescriptor::new(name, category, return_type)
}

fn usage(code: &str) -> CodeSnippet {
    CodeSnippet::new(code, SnippetSource::UsageExample)
}

fn run(functions: &[FunctionDescriptor], snippets: Vec<CodeSnippet>) -> Vec<RelationshipMap> {
    let report = build_relationships(functions, &Corpus::new(snippets));
    assert!(report.success, "unexpected failure: {:?}", report.error);
    report.data.unwrap_or_default()
}

fn map_for<'a>(maps: &'a [RelationshipMap], name: &str) -> &'a RelationshipMap {
    maps.iter()
        .find(|m| m.function_name == name)
        .unwrap_or_else(|| panic!("no map for {name}"))
}

#[test]
fn empty_functions_and_corpus_succeed_with_no_maps() {
    let report = build_relationships(&[], &Corpus::default());

    assert!(report.success);
    assert_eq!(report.data, Some(Vec::new()));
    assert!(report.error.is_none());
}

#[test]
fn nested_calls_are_commonly_used_together() {
    let fns = vec![
        func("map", FunctionCategory::ArrayManipulation, "Array"),
        func("filter", FunctionCategory::Filtering, "Array"),
    ];
    let maps = run(&fns, vec![usage("map(filter(data, p), f)")]);

    for (owner, other) in [("map", "filter"), ("filter", "map")] {
        let rel = map_for(&maps, owner)
            .find(other, RelationshipType::CommonlyUsedWith)
            .unwrap_or_else(|| panic!("{owner} should list {other}"));
        assert!(rel.strength > 0.0 && rel.strength <= 1.0);
        assert!(rel.evidence_count >= 1);
    }
}

#[test]
fn same_shape_functions_are_alternatives() {
    let fns = vec![
        func("map", FunctionCategory::ArrayManipulation, "Array")
            .param("list", "Array")
            .param("fn", "Function"),
        func("transform", FunctionCategory::ArrayManipulation, "Array").param("list", "Array"),
    ];
    let maps = run(&fns, Vec::new());
    let map = map_for(&maps, "map");

    let listed = map.find("transform", RelationshipType::AlternativeTo).is_some();
    let grouped = map
        .contextual_info
        .alternative_group
        .as_ref()
        .is_some_and(|g| g.contains("transform"));
    assert!(listed || grouped);
    assert!(grouped);
}

#[test]
fn preceding_call_becomes_prerequisite() {
    let fns = vec![
        func("validateEmail", FunctionCategory::Validation, "boolean"),
        func("map", FunctionCategory::ArrayManipulation, "Array"),
    ];
    let snippet = usage(
        "const ok = validateEmail(email);\nif (!ok) return;\nconst out = map(items, f);",
    );
    let maps = run(&fns, vec![snippet]);
    let map = map_for(&maps, "map");

    let chain = map.contextual_info.prerequisite_chain.as_ref().unwrap();
    assert_eq!(chain.target, "map");
    assert_eq!(chain.prerequisites, vec!["validateEmail".to_string()]);
    assert!(map
        .find("validateEmail", RelationshipType::PrerequisiteFor)
        .is_some());
    assert!(map_for(&maps, "validateEmail")
        .contextual_info
        .prerequisite_chain
        .is_none());
}

#[test]
fn call_outside_window_is_not_a_prerequisite() {
    let fns = vec![
        func("validateEmail", FunctionCategory::Validation, "boolean"),
        func("map", FunctionCategory::ArrayManipulation, "Array"),
    ];
    let snippet = usage("validateEmail(email);\na();\nb();\nc();\nmap(items, f);");
    let maps = run(&fns, vec![snippet]);

    assert!(map_for(&maps, "map")
        .contextual_info
        .prerequisite_chain
        .is_none());
}

#[test]
fn null_function_collection_is_a_processing_failure() {
    let report = build_relationships_from_value(
        &serde_json::Value::Null,
        &serde_json::json!([]),
        &RelationConfig::default(),
    );

    assert!(!report.success);
    assert!(report.data.is_none());
    assert_eq!(report.error.map(|e| e.kind), Some(ErrorKind::Processing));
}

#[test]
fn descriptor_missing_required_field_is_a_processing_failure() {
    let functions = serde_json::json!([{"name": "map"}]);
    let config = RelationConfig::default();
    let report = build_relationships_from_value(&functions, &serde_json::Value::Null, &config);

    assert!(!report.success);
    let error = report.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Processing);
    assert!(error.message.contains("index 0"));
}

#[test]
fn relationship_lists_are_capped_sorted_and_bounded() {
    let names: Vec<String> = (0..15).map(|i| format!("step{i:02}x")).collect();
    let fns: Vec<FunctionDescriptor> = names
        .iter()
        .map(|n| func(n, FunctionCategory::Action, "void"))
        .collect();
    let code = names
        .iter()
        .map(|n| format!("{n}();"))
        .collect::<Vec<_>>()
        .join("\n");
    let maps = run(&fns, vec![usage(&code), usage(&code)]);

    assert_eq!(maps.len(), 15);
    for map in &maps {
        assert!(map.relationships.len() <= MAX_RELATIONSHIPS);
        assert!(!map.relationships.is_empty());
        for pair in map.relationships.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
        for rel in &map.relationships {
            assert!((0.0..=1.0).contains(&rel.strength));
            assert!((0.0..=1.0).contains(&rel.confidence));
            assert!(rel.evidence_count >= 1);
            assert_ne!(rel.function_name, map.function_name);
        }
        assert!((0.0..=1.0).contains(&map.relationship_score));
    }
}

#[test]
fn merging_engine_output_again_changes_nothing() {
    let fns = vec![
        func("connect", FunctionCategory::Factory, "Client"),
        func("query", FunctionCategory::Action, "Rows").param("client", "Client"),
        func("queryOne", FunctionCategory::Action, "Rows").param("client", "Client"),
    ];
    let maps = run(
        &fns,
        vec![
            usage("const c = connect(url);\nquery(c, sql);"),
            usage("const c = connect(url);\nqueryOne(c, sql);"),
        ],
    );

    for map in &maps {
        let again = merge_relationships(map.relationships.clone());
        assert_eq!(again, map.relationships);
    }
}

#[test]
fn output_follows_input_order_and_keeps_use_cases() {
    let fns = vec![
        func("zeta", FunctionCategory::Utility, "void").use_case("Last letter"),
        func("alpha", FunctionCategory::Getter, "string"),
    ];
    let maps = run(&fns, Vec::new());

    let names: Vec<&str> = maps.iter().map(|m| m.function_name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
    assert_eq!(maps[0].contextual_info.use_cases, vec!["Last letter"]);
    assert_eq!(maps[1].relationship_score, 0.0);
}

#[test]
fn consumer_lists_producer_it_transforms() {
    let fns = vec![
        func("connect", FunctionCategory::Factory, "Promise<Client>"),
        func("query", FunctionCategory::Action, "Rows").param("client", "Client"),
    ];
    let maps = run(&fns, Vec::new());

    assert!(map_for(&maps, "query")
        .find("connect", RelationshipType::TransformsOutputOf)
        .is_some());
    assert!(map_for(&maps, "connect")
        .find("query", RelationshipType::TransformsOutputOf)
        .is_none());
}

#[test]
fn sequential_lines_form_workflow_steps() {
    let fns = vec![
        func("parse", FunctionCategory::Transformation, "Ast"),
        func("render", FunctionCategory::Action, "string"),
    ];
    let maps = run(
        &fns,
        vec![usage("const ast = parse(src);\nconst html = render(ast);")],
    );
    let parse = map_for(&maps, "parse");

    let steps = &parse.contextual_info.workflow_steps;
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].step, 1);
    assert!(parse.find("render", RelationshipType::ComposesWith).is_some());
}

#[test]
fn word_boundary_mode_ignores_embedded_names() {
    let fns = vec![
        func("map", FunctionCategory::ArrayManipulation, "Array"),
        func("flatmap", FunctionCategory::Aggregation, "Value"),
        func("reduce", FunctionCategory::Aggregation, "Value"),
    ];
    let corpus = Corpus::new(vec![usage("reduce(flatmap(xs, g), h)")]);

    let loose = RelationshipEngine::default().analyze(&fns, &corpus).unwrap();
    assert!(loose.maps[0]
        .find("reduce", RelationshipType::CommonlyUsedWith)
        .is_some());

    let engine = RelationshipEngine::new(RelationConfig {
        match_mode: MatchMode::WordBoundary,
        ..RelationConfig::default()
    });
    let bounded = engine.analyze(&fns, &corpus).unwrap();
    assert!(bounded.maps[0]
        .find("reduce", RelationshipType::CommonlyUsedWith)
        .is_none());
    assert!(bounded.maps[1]
        .find("reduce", RelationshipType::CommonlyUsedWith)
        .is_some());
}

#[test]
fn corpus_sources_are_flattened_into_snippets() {
    let sources = CorpusSources {
        sections: vec![DocSection {
            title: "Usage".to_string(),
            content: String::new(),
            code_blocks: vec!["open(path);\nread(handle);".to_string()],
            language: "javascript".to_string(),
        }],
        usage_examples: vec!["read(open(path))".to_string()],
        ..CorpusSources::default()
    };
    let corpus: Corpus = sources.into();
    assert_eq!(corpus.len(), 2);

    let fns = vec![
        func("open", FunctionCategory::Factory, "Handle"),
        func("read", FunctionCategory::Action, "Buffer"),
    ];
    let analysis = RelationshipEngine::default().analyze(&fns, &corpus).unwrap();
    let rel = analysis.maps[0]
        .find("read", RelationshipType::CommonlyUsedWith)
        .unwrap();

    assert_eq!(rel.evidence_count, 2);
    assert_eq!(analysis.stats.snippets, 2);
    assert_eq!(analysis.stats.cooccurrence_pairs, 1);
}
