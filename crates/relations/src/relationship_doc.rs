use crate::types::{RelationshipMap, RelationshipType};

pub const RELATIONSHIP_DOC_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct RelationshipDoc {
    pub function_name: String,
    pub doc: String,
    pub doc_hash: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct RelationshipDocConfig {
    pub max_neighbors_per_relation: usize,
    pub max_workflow_steps: usize,
}

impl Default for RelationshipDocConfig {
    fn default() -> Self {
        Self {
            max_neighbors_per_relation: 12,
            max_workflow_steps: 5,
        }
    }
}

/// Build deterministic text documents for the capability-search index.
///
/// Design goals:
/// - stable ordering (diff-friendly),
/// - bounded size (neighbor caps),
/// - tokens for "related", "alternative" and "workflow" queries.
#[must_use]
pub fn build_relationship_docs(
    maps: &[RelationshipMap],
    config: RelationshipDocConfig,
) -> Vec<RelationshipDoc> {
    let mut docs: Vec<RelationshipDoc> = maps
        .iter()
        .map(|map| {
            let doc = render_doc(map, config);
            RelationshipDoc {
                function_name: map.function_name.clone(),
                doc_hash: fnv1a64(doc.as_bytes()),
                doc,
            }
        })
        .collect();

    docs.sort_by(|a, b| a.function_name.cmp(&b.function_name));
    docs
}

fn render_doc(map: &RelationshipMap, config: RelationshipDocConfig) -> String {
    let mut out = String::new();
    let info = &map.contextual_info;

    out.push_str("kind: function_relationships\n");
    out.push_str(&format!("function: {}\n", map.function_name));
    out.push_str(&format!("relationship_score: {:.3}\n", map.relationship_score));
    out.push_str(&format!("doc_version: {RELATIONSHIP_DOC_VERSION}\n"));

    out.push_str(&format!("use_cases({}):\n", info.use_cases.len()));
    for use_case in &info.use_cases {
        out.push_str(&format!("- {use_case}\n"));
    }

    for rel in RelationshipType::ALL {
        let mut neighbors: Vec<String> = map
            .relationships
            .iter()
            .filter(|r| r.relationship_type == rel)
            .map(|r| format!("{} | {:.2}", r.function_name, r.score()))
            .collect();
        if neighbors.is_empty() {
            continue;
        }
        neighbors.sort();
        neighbors.dedup();
        neighbors.truncate(config.max_neighbors_per_relation);

        out.push_str(&format!("{}({}):\n", rel.as_str(), neighbors.len()));
        for neighbor in neighbors {
            out.push_str(&format!("- {neighbor}\n"));
        }
    }

    if !info.workflow_steps.is_empty() {
        out.push_str("workflow:\n");
        for step in info.workflow_steps.iter().take(config.max_workflow_steps) {
            out.push_str(&format!("- {}. {}\n", step.step, step.description));
        }
    }

    if let Some(chain) = &info.prerequisite_chain {
        out.push_str(&format!("prerequisites: {}\n", chain.prerequisites.join(", ")));
    }

    if let Some(group) = &info.alternative_group {
        let names: Vec<&str> = group
            .options
            .iter()
            .map(|o| o.function_name.as_str())
            .filter(|n| *n != map.function_name)
            .collect();
        out.push_str(&format!("alternatives: {}\n", names.join(", ")));
        out.push_str(&format!("alternative_purpose: {}\n", group.purpose));
    }

    out
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 14_695_981_039_346_656_037;
    const PRIME: u64 = 1_099_511_628_211;
    let mut hash = OFFSET;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
