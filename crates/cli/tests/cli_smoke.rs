use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const REQUEST: &str = r#"
{
  "functions": [
    {"name": "connect", "category": "factory", "complexity": "beginner", "returnType": "Client",
     "useCases": ["Open a database connection"]},
    {"name": "query", "category": "action", "complexity": "intermediate", "returnType": "Rows",
     "parameters": [{"name": "client", "type": "Client"}, {"name": "sql", "type": "string"}]},
    {"name": "queryOne", "category": "action", "complexity": "intermediate", "returnType": "Rows"}
  ],
  "corpus": [
    "const client = connect(url);\nconst rows = query(client, sql);",
    {"code": "const c = connect(url);\nquery(c, 'select 1');", "language": "javascript",
     "source": "documentation", "title": "Quick start"}
  ]
}
"#;

#[allow(deprecated)]
fn run_cli(workdir: &Path, args: &[&str]) -> (bool, Value) {
    let output = Command::cargo_bin("context-relations")
        .expect("binary")
        .current_dir(workdir)
        .arg("--quiet")
        .args(args)
        .output()
        .expect("command run");

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

#[test]
fn build_prints_report_with_relationships() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("request.json"), REQUEST).unwrap();

    let (ok, body) = run_cli(temp.path(), &["build", "--input", "request.json", "--stats"]);
    assert!(ok);
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["functions"], 3);

    let maps = body["data"].as_array().unwrap();
    assert_eq!(maps.len(), 3);
    assert_eq!(maps[1]["functionName"], "query");
    let rels = maps[1]["relationships"].as_array().unwrap();
    assert!(rels.iter().any(|r| r["functionName"] == "connect"
        && r["relationshipType"] == "prerequisite-for"));
    assert!(rels.iter().any(|r| r["functionName"] == "queryOne"
        && r["relationshipType"] == "alternative-to"));
}

#[test]
fn build_reports_processing_failure_in_json() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("bad.json"), r#"{"functions": null}"#).unwrap();

    let (ok, body) = run_cli(temp.path(), &["build", "--input", "bad.json"]);
    assert!(ok);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["kind"], "PROCESSING_ERROR");
    assert!(body.get("data").is_none());
}

#[test]
fn build_honours_config_file() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("request.json"), REQUEST).unwrap();
    fs::write(
        temp.path().join("relations.toml"),
        "schema_version = 1\nprerequisite_window = 1\n",
    )
    .unwrap();

    let (ok, body) = run_cli(
        temp.path(),
        &["build", "--input", "request.json", "--config", "relations.toml"],
    );
    assert!(ok);
    assert_eq!(body["success"], true);
    assert!(body.get("stats").is_none());
}

#[test]
fn docs_are_sorted_by_function_name() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("request.json"), REQUEST).unwrap();

    let (ok, body) = run_cli(temp.path(), &["docs", "--input", "request.json"]);
    assert!(ok);
    let docs = body.as_array().unwrap();
    let names: Vec<&str> = docs
        .iter()
        .map(|d| d["functionName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["connect", "query", "queryOne"]);
    assert!(docs[1]["doc"]
        .as_str()
        .unwrap()
        .contains("prerequisites: connect"));
}

#[test]
fn missing_input_file_is_an_error() {
    let temp = tempdir().unwrap();
    #[allow(deprecated)]
    let output = Command::cargo_bin("context-relations")
        .unwrap()
        .current_dir(temp.path())
        .args(["build", "--input", "nope.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
