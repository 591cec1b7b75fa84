use crate::alternatives::AlternativeGroups;
use crate::assembler::ContextAssembler;
use crate::config::RelationConfig;
use crate::cooccurrence::CooccurrenceIndex;
use crate::error::{ErrorKind, RelationError, Result};
use crate::merger::{merge_candidates, relationship_score};
use crate::prerequisite::PrerequisiteIndex;
use crate::semantic::SemanticIndex;
use crate::snippet_index::SnippetIndex;
use crate::types::{
    CodeSnippet, ContextualInfo, Corpus, CorpusSources, FunctionDescriptor, RelationshipMap,
    SnippetSource,
};
use crate::workflow::WorkflowExtraction;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

/// Counters describing one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub functions: usize,
    pub snippets: usize,
    pub cooccurrence_pairs: usize,
    pub workflow_sequences: usize,
    pub workflow_steps: usize,
    pub prerequisite_chains: usize,
    pub alternative_groups: usize,
    pub relationships: usize,
}

/// Successful run output
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipAnalysis {
    /// One map per input function, in input order
    pub maps: Vec<RelationshipMap>,
    pub stats: EngineStats,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&RelationError> for ProcessingFailure {
    fn from(err: &RelationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result wrapper handed to downstream collaborators.
///
/// Exactly one of `data` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<RelationshipMap>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProcessingFailure>,

    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<EngineStats>,
}

impl From<Result<RelationshipAnalysis>> for BuildReport {
    fn from(result: Result<RelationshipAnalysis>) -> Self {
        match result {
            Ok(analysis) => Self {
                success: true,
                data: Some(analysis.maps),
                error: None,
                warnings: analysis.warnings,
                stats: Some(analysis.stats),
            },
            Err(err) => Self::failure(&err, Vec::new()),
        }
    }
}

impl BuildReport {
    /// Failed report keeping the warnings gathered before the failure
    #[must_use]
    pub fn failure(err: &RelationError, warnings: Vec<String>) -> Self {
        log::error!("Relationship build failed: {err}");
        Self {
            success: false,
            data: None,
            error: Some(ProcessingFailure::from(err)),
            warnings,
            stats: None,
        }
    }
}

/// Function-relationship inference engine.
///
/// Stateless between runs: every call rebuilds all indices from its inputs.
/// Cost is dominated by the co-occurrence scan, `O(S·n + S·k²)` for `S`
/// snippets, `n` functions and `k` functions per snippet, and by semantic
/// scoring, `O(n²·(p + L²))` for `p` parameters and names of length `L`.
#[derive(Debug, Clone, Default)]
pub struct RelationshipEngine {
    config: RelationConfig,
}

impl RelationshipEngine {
    #[must_use]
    pub const fn new(config: RelationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RelationConfig {
        &self.config
    }

    /// Infer relationship maps for `functions` from `corpus`
    pub fn analyze(
        &self,
        functions: &[FunctionDescriptor],
        corpus: &Corpus,
    ) -> Result<RelationshipAnalysis> {
        let mut warnings = Vec::new();
        let (maps, stats) = self.run(functions, corpus, &mut warnings)?;
        Ok(RelationshipAnalysis {
            maps,
            stats,
            warnings,
        })
    }

    /// Run and wrap the outcome in a [`BuildReport`]
    #[must_use]
    pub fn build(&self, functions: &[FunctionDescriptor], corpus: &Corpus) -> BuildReport {
        let mut warnings = Vec::new();
        match self.run(functions, corpus, &mut warnings) {
            Ok((maps, stats)) => BuildReport::from(Ok(RelationshipAnalysis {
                maps,
                stats,
                warnings,
            })),
            Err(err) => BuildReport::failure(&err, warnings),
        }
    }

    fn run(
        &self,
        functions: &[FunctionDescriptor],
        corpus: &Corpus,
        warnings: &mut Vec<String>,
    ) -> Result<(Vec<RelationshipMap>, EngineStats)> {
        self.config.validate().map_err(config_as_processing)?;

        let invalid = validate_functions(functions, warnings);
        if !invalid.is_empty() && !self.config.isolate_failures {
            return Err(RelationError::processing(invalid[0].1.clone()));
        }
        let active: Cow<'_, [FunctionDescriptor]> = if invalid.is_empty() {
            Cow::Borrowed(functions)
        } else {
            for (_, message) in &invalid {
                warnings.push(format!("{message}; emitting an empty relationship map"));
            }
            Cow::Owned(
                functions
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| !invalid.iter().any(|(bad, _)| bad == idx))
                    .map(|(_, f)| f.clone())
                    .collect(),
            )
        };

        let snippet_index = SnippetIndex::build(&active, corpus, self.config.match_mode)?;
        if snippet_index.blank_snippets() > 0 {
            let warning = format!(
                "{} snippet(s) contain no text and were ignored",
                snippet_index.blank_snippets()
            );
            log::warn!("{warning}");
            warnings.push(warning);
        }

        let cooccurrence =
            CooccurrenceIndex::build(&snippet_index, active.len(), corpus, &self.config);
        let semantic = SemanticIndex::build(&active, &self.config);
        let workflows = WorkflowExtraction::extract(&snippet_index, corpus, &self.config);
        let prerequisites = PrerequisiteIndex::build(&snippet_index, corpus, &self.config);
        let alternatives = AlternativeGroups::build(&active);
        let assembler = ContextAssembler::new(&workflows, &prerequisites, &alternatives);

        let mut active_maps = active
            .iter()
            .enumerate()
            .map(|(idx, function)| {
                let mut candidates = cooccurrence.candidates(idx, &active, corpus, &self.config);
                candidates.extend(semantic.candidates(idx).iter().cloned());
                candidates.extend(workflows.candidates(&function.name, corpus));
                candidates.extend(prerequisites.candidates(&function.name, corpus));
                candidates.extend(alternatives.candidates(&function.name));
                candidates.retain(|c| c.target != function.name);

                let relationships = merge_candidates(candidates);
                RelationshipMap {
                    function_name: function.name.clone(),
                    relationship_score: relationship_score(&relationships),
                    relationships,
                    contextual_info: assembler.assemble(function),
                }
            })
            .collect::<Vec<_>>()
            .into_iter();

        let maps: Vec<RelationshipMap> = functions
            .iter()
            .enumerate()
            .map(|(idx, function)| {
                if invalid.iter().any(|(bad, _)| *bad == idx) {
                    empty_map(function)
                } else {
                    active_maps.next().unwrap_or_else(|| empty_map(function))
                }
            })
            .collect();

        let stats = EngineStats {
            functions: functions.len(),
            snippets: corpus.len(),
            cooccurrence_pairs: cooccurrence.pair_count(),
            workflow_sequences: workflows.sequences.len(),
            workflow_steps: workflows.steps.len(),
            prerequisite_chains: prerequisites.len(),
            alternative_groups: alternatives.groups().len(),
            relationships: maps.iter().map(|m| m.relationships.len()).sum(),
        };

        log::info!(
            "Built relationships: {} functions, {} snippets, {} co-occurring pairs, {} workflow steps, {} prerequisite chains, {} alternative groups",
            stats.functions,
            stats.snippets,
            stats.cooccurrence_pairs,
            stats.workflow_steps,
            stats.prerequisite_chains,
            stats.alternative_groups
        );

        Ok((maps, stats))
    }
}

/// Single entry point over typed input with default configuration
#[must_use]
pub fn build_relationships(functions: &[FunctionDescriptor], corpus: &Corpus) -> BuildReport {
    RelationshipEngine::default().build(functions, corpus)
}

/// Entry point over untyped JSON input.
///
/// `functions` must be an array of descriptors. `corpus` may be `null`, an
/// array of snippets (objects or plain strings) or a [`CorpusSources`] object.
#[must_use]
pub fn build_relationships_from_value(
    functions: &serde_json::Value,
    corpus: &serde_json::Value,
    config: &RelationConfig,
) -> BuildReport {
    let engine = RelationshipEngine::new(config.clone());
    let decoded = decode_functions(functions).and_then(|f| Ok((f, decode_corpus(corpus)?)));
    match decoded {
        Ok((functions, corpus)) => engine.build(&functions, &corpus),
        Err(err) => BuildReport::from(Err(err)),
    }
}

fn decode_functions(value: &serde_json::Value) -> Result<Vec<FunctionDescriptor>> {
    let items = value.as_array().ok_or_else(|| {
        RelationError::processing(format!(
            "function collection must be an array, got {}",
            json_kind(value)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item.clone()).map_err(|e| {
                RelationError::processing(format!(
                    "invalid function descriptor at index {idx}: {e}"
                ))
            })
        })
        .collect()
}

fn decode_corpus(value: &serde_json::Value) -> Result<Corpus> {
    match value {
        serde_json::Value::Null => Ok(Corpus::default()),
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                serde_json::Value::String(code) => {
                    Ok(CodeSnippet::new(code.clone(), SnippetSource::UsageExample))
                }
                other => serde_json::from_value(other.clone()).map_err(|e| {
                    RelationError::processing(format!("invalid snippet at index {idx}: {e}"))
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Corpus::new),
        serde_json::Value::Object(_) => {
            let sources: CorpusSources = serde_json::from_value(value.clone())?;
            Ok(sources.into())
        }
        other => Err(RelationError::processing(format!(
            "corpus must be an object or array, got {}",
            json_kind(other)
        ))),
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A run only ever surfaces processing failures
fn config_as_processing(err: RelationError) -> RelationError {
    match err {
        RelationError::Config(message) => {
            RelationError::processing(format!("invalid engine configuration: {message}"))
        }
        other => other,
    }
}

/// Indices and messages of descriptors that would break text scanning
fn validate_functions(
    functions: &[FunctionDescriptor],
    warnings: &mut Vec<String>,
) -> Vec<(usize, String)> {
    let mut invalid = Vec::new();
    let mut seen = HashSet::new();

    for (idx, function) in functions.iter().enumerate() {
        if function.name.trim().is_empty() {
            invalid.push((idx, format!("function at index {idx} has an empty name")));
            continue;
        }
        if function.name.contains(['\n', '\r']) {
            invalid.push((
                idx,
                format!("function name at index {idx} contains a line break"),
            ));
            continue;
        }
        if !seen.insert(function.name.as_str()) {
            let warning = format!("duplicate function name '{}' at index {idx}", function.name);
            log::warn!("{warning}");
            warnings.push(warning);
        }
    }

    invalid
}

fn empty_map(function: &FunctionDescriptor) -> RelationshipMap {
    RelationshipMap {
        function_name: function.name.clone(),
        relationships: Vec::new(),
        relationship_score: 0.0,
        contextual_info: ContextualInfo {
            use_cases: function.use_cases.clone(),
            ..ContextualInfo::default()
        },
    }
}
