use crate::config::RelationConfig;
use crate::lexical::truncate_example;
use crate::snippet_index::SnippetIndex;
use crate::types::{
    ContextExample, Corpus, FactorKind, RelationshipCandidate, RelationshipType, StrengthFactor,
    PrerequisiteChain,
};

const PREREQUISITE_STRENGTH: f32 = 0.8;
const MAX_PREREQUISITE_CONFIDENCE: f32 = 0.9;

#[derive(Debug, Clone, PartialEq)]
struct ChainEntry {
    chain: PrerequisiteChain,
    /// Times each prerequisite was seen inside the window, parallel to `chain.prerequisites`
    occurrences: Vec<usize>,
    snippet: usize,
}

/// "Called before" relations inferred from line windows above a function's first call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrerequisiteIndex {
    entries: Vec<ChainEntry>,
}

impl PrerequisiteIndex {
    pub fn build(index: &SnippetIndex, corpus: &Corpus, config: &RelationConfig) -> Self {
        let matcher = index.matcher();
        let mut entries = Vec::new();

        for target in 0..matcher.len() {
            let target_name = matcher.name(target);
            let mut prerequisites: Vec<(usize, usize)> = Vec::new();
            let mut example_snippet = None;

            for snippet_idx in index.snippets_with(target) {
                let Some(snippet) = corpus.snippets.get(snippet_idx) else {
                    continue;
                };
                let lines: Vec<&str> = snippet.code.lines().collect();
                let Some(first) = lines.iter().position(|l| matcher.contains(target, l)) else {
                    continue;
                };
                let window = &lines[first.saturating_sub(config.prerequisite_window)..first];

                for other in (0..matcher.len()).filter(|&o| o != target) {
                    if !window.iter().any(|l| matcher.contains(other, l)) {
                        continue;
                    }
                    match prerequisites.iter_mut().find(|(p, _)| *p == other) {
                        Some((_, count)) => *count += 1,
                        None => prerequisites.push((other, 1)),
                    }
                    example_snippet.get_or_insert(snippet_idx);
                }
            }

            let Some(snippet) = example_snippet else {
                continue;
            };

            let names: Vec<String> = prerequisites
                .iter()
                .map(|(p, _)| matcher.name(*p).to_string())
                .collect();
            let reason = names
                .iter()
                .map(|p| format!("{p} is typically called before {target_name}"))
                .collect::<Vec<_>>()
                .join("; ");
            let example = corpus
                .snippets
                .get(snippet)
                .map(|s| truncate_example(&s.code, config.example_char_limit))
                .unwrap_or_default();

            entries.push(ChainEntry {
                chain: PrerequisiteChain {
                    target: target_name.to_string(),
                    prerequisites: names,
                    reason,
                    example,
                },
                occurrences: prerequisites.iter().map(|(_, c)| *c).collect(),
                snippet,
            });
        }

        log::debug!("Prerequisite chains: {}", entries.len());
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn chain_for(&self, name: &str) -> Option<&PrerequisiteChain> {
        self.entries
            .iter()
            .find(|e| e.chain.target == name)
            .map(|e| &e.chain)
    }

    /// `prerequisite-for` candidates on `name`'s map, one per prerequisite
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn candidates(&self, name: &str, corpus: &Corpus) -> Vec<RelationshipCandidate> {
        let Some(entry) = self.entries.iter().find(|e| e.chain.target == name) else {
            return Vec::new();
        };

        let source = corpus
            .snippets
            .get(entry.snippet)
            .map_or("unknown", |s| s.source.as_str());

        entry
            .chain
            .prerequisites
            .iter()
            .zip(&entry.occurrences)
            .map(|(prerequisite, &count)| {
                let reason = format!("{prerequisite} is typically called before {name}");
                RelationshipCandidate {
                    source: name.to_string(),
                    target: prerequisite.clone(),
                    relationship: RelationshipType::PrerequisiteFor,
                    strength: PREREQUISITE_STRENGTH,
                    confidence: (0.5 + 0.1 * count as f32).min(MAX_PREREQUISITE_CONFIDENCE),
                    evidence_count: count,
                    factor: StrengthFactor {
                        factor: FactorKind::PrerequisiteChain,
                        weight: PREREQUISITE_STRENGTH,
                        evidence: format!("seen before {name} in {count} snippet(s)"),
                    },
                    examples: vec![ContextExample {
                        title: format!("{prerequisite} before {name}"),
                        code: entry.chain.example.clone(),
                        explanation: reason.clone(),
                        source: source.to_string(),
                    }],
                    reasons: vec![reason],
                }
            })
            .collect()
    }
}
