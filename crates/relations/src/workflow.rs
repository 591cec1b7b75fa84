use crate::config::RelationConfig;
use crate::snippet_index::SnippetIndex;
use crate::types::{
    ContextExample, Corpus, FactorKind, RelationshipCandidate, RelationshipType, StrengthFactor,
    WorkflowStep,
};
use std::collections::HashMap;

const SAME_STEP_STRENGTH: f32 = 0.7;
const SAME_STEP_CONFIDENCE: f32 = 0.6;
const SAME_SEQUENCE_STRENGTH: f32 = 0.5;
const SAME_SEQUENCE_CONFIDENCE: f32 = 0.5;

/// Ordered calls detected in one snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSequence {
    pub snippet: usize,
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowSequence {
    fn involves(&self, name: &str) -> bool {
        self.steps.iter().any(|s| s.involves(name))
    }
}

/// Raw sequences plus the consolidated step list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowExtraction {
    pub sequences: Vec<WorkflowSequence>,
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowExtraction {
    pub fn extract(index: &SnippetIndex, corpus: &Corpus, config: &RelationConfig) -> Self {
        let matcher = index.matcher();
        let mut sequences = Vec::new();

        for (snippet_idx, snippet) in corpus.snippets.iter().enumerate() {
            // nothing on any line if the snippet mentions no function at all
            if index.occurrences(snippet_idx).is_empty() {
                continue;
            }

            let mut steps = Vec::new();
            for line in snippet.code.lines().filter(|l| !l.trim().is_empty()) {
                let present = matcher.present_in(line);
                if present.is_empty() {
                    continue;
                }
                let functions: Vec<String> = present
                    .iter()
                    .map(|&f| matcher.name(f).to_string())
                    .collect();
                steps.push(WorkflowStep {
                    step: steps.len() + 1,
                    description: describe(&functions),
                    functions,
                    example: line.to_string(),
                });
            }

            if steps.len() > 1 {
                sequences.push(WorkflowSequence {
                    snippet: snippet_idx,
                    steps,
                });
            }
        }

        let steps = consolidate(&sequences, config.max_alternative_examples);
        log::debug!(
            "Workflow extraction: {} sequences, {} consolidated steps",
            sequences.len(),
            steps.len()
        );

        Self { sequences, steps }
    }

    /// Consolidated steps involving `name`
    #[must_use]
    pub fn steps_for(&self, name: &str) -> Vec<WorkflowStep> {
        self.steps
            .iter()
            .filter(|s| s.involves(name))
            .cloned()
            .collect()
    }

    /// `composes-with` candidates for `name`
    #[must_use]
    pub fn candidates(&self, name: &str, corpus: &Corpus) -> Vec<RelationshipCandidate> {
        let mut partners: Vec<Partner> = Vec::new();

        for sequence in self.sequences.iter().filter(|s| s.involves(name)) {
            let mut seen_in_sequence: Vec<String> = Vec::new();
            for step in &sequence.steps {
                let with_name = step.involves(name);
                for other in step.functions.iter().filter(|f| *f != name) {
                    let pos = partner_slot(&mut partners, other);
                    if with_name {
                        partners[pos].shared_steps += 1;
                        if partners[pos].example.is_none() {
                            partners[pos].example = Some((step.example.clone(), sequence.snippet));
                        }
                    }
                    if !seen_in_sequence.contains(other) {
                        seen_in_sequence.push(other.clone());
                        partners[pos].shared_sequences += 1;
                    }
                }
            }
        }

        partners
            .into_iter()
            .map(|partner| {
                let same_step = partner.shared_steps > 0;
                let (strength, confidence, evidence_count, evidence) = if same_step {
                    (
                        SAME_STEP_STRENGTH,
                        SAME_STEP_CONFIDENCE,
                        partner.shared_steps,
                        format!("applied together in {} step(s)", partner.shared_steps),
                    )
                } else {
                    (
                        SAME_SEQUENCE_STRENGTH,
                        SAME_SEQUENCE_CONFIDENCE,
                        partner.shared_sequences,
                        format!("used in the same {} workflow(s)", partner.shared_sequences),
                    )
                };

                let examples = partner
                    .example
                    .iter()
                    .map(|(line, snippet)| ContextExample {
                        title: "Workflow step".to_string(),
                        code: line.clone(),
                        explanation: format!("{name} and {} are applied in one step", partner.name),
                        source: corpus
                            .snippets
                            .get(*snippet)
                            .map_or("unknown", |s| s.source.as_str())
                            .to_string(),
                    })
                    .collect();

                RelationshipCandidate {
                    source: name.to_string(),
                    target: partner.name.clone(),
                    relationship: RelationshipType::ComposesWith,
                    strength,
                    confidence,
                    evidence_count,
                    factor: StrengthFactor {
                        factor: FactorKind::WorkflowPattern,
                        weight: strength,
                        evidence,
                    },
                    examples,
                    reasons: vec![format!("{name} composes with {} in a workflow", partner.name)],
                }
            })
            .collect()
    }
}

struct Partner {
    name: String,
    shared_steps: usize,
    shared_sequences: usize,
    example: Option<(String, usize)>,
}

fn partner_slot(partners: &mut Vec<Partner>, other: &str) -> usize {
    if let Some(pos) = partners.iter().position(|p| p.name == other) {
        return pos;
    }
    partners.push(Partner {
        name: other.to_string(),
        shared_steps: 0,
        shared_sequences: 0,
        example: None,
    });
    partners.len() - 1
}

fn describe(functions: &[String]) -> String {
    match functions {
        [single] => format!("Use {single}"),
        many => format!("Apply {} in sequence", many.join(", ")),
    }
}

/// Merge steps with identical function sets; repeats become annotation lines
fn consolidate(sequences: &[WorkflowSequence], max_alternatives: usize) -> Vec<WorkflowStep> {
    let mut groups: HashMap<Vec<String>, usize> = HashMap::new();
    let mut steps: Vec<WorkflowStep> = Vec::new();
    let mut alternatives: Vec<Vec<String>> = Vec::new();

    for step in sequences.iter().flat_map(|s| s.steps.iter()) {
        let mut key = step.functions.clone();
        key.sort();

        match groups.get(&key) {
            Some(&pos) => {
                let seen = &mut alternatives[pos];
                if step.example != steps[pos].example
                    && !seen.contains(&step.example)
                    && seen.len() < max_alternatives
                {
                    seen.push(step.example.clone());
                }
            }
            None => {
                groups.insert(key, steps.len());
                steps.push(step.clone());
                alternatives.push(Vec::new());
            }
        }
    }

    for (idx, (step, extra)) in steps.iter_mut().zip(alternatives).enumerate() {
        step.step = idx + 1;
        for line in extra {
            step.example.push_str("\n// also: ");
            step.example.push_str(&line);
        }
    }

    steps
}
