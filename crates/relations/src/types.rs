use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag assigned to a function by the declaration extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FunctionCategory {
    ArrayManipulation,
    ObjectManipulation,
    StringProcessing,
    Utility,
    Async,
    Validation,
    Transformation,
    Filtering,
    Aggregation,
    Factory,
    Predicate,
    Getter,
    Setter,
    Action,
}

impl FunctionCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ArrayManipulation => "array-manipulation",
            Self::ObjectManipulation => "object-manipulation",
            Self::StringProcessing => "string-processing",
            Self::Utility => "utility",
            Self::Async => "async",
            Self::Validation => "validation",
            Self::Transformation => "transformation",
            Self::Filtering => "filtering",
            Self::Aggregation => "aggregation",
            Self::Factory => "factory",
            Self::Predicate => "predicate",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Action => "action",
        }
    }
}

impl fmt::Display for FunctionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    Beginner,
    Intermediate,
    Advanced,
}

/// Single declared parameter of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type")]
    pub param_type: String,

    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            optional: false,
        }
    }
}

/// API function as produced by the declaration extractor.
///
/// `name` is the unique key within one run. The engine never mutates a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    pub name: String,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub return_type: String,

    #[serde(default)]
    pub description: String,

    pub category: FunctionCategory,

    pub complexity: Complexity,

    #[serde(default)]
    pub use_cases: Vec<String>,

    /// Usage examples attached by the extractor
    #[serde(default)]
    pub examples: Vec<String>,
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        category: FunctionCategory,
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: return_type.into(),
            description: String::new(),
            category,
            complexity: Complexity::Beginner,
            use_cases: Vec::new(),
            examples: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: &str, param_type: &str) -> Self {
        self.parameters.push(Parameter::new(name, param_type));
        self
    }

    #[must_use]
    pub const fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    #[must_use]
    pub fn use_case(mut self, use_case: &str) -> Self {
        self.use_cases.push(use_case.to_string());
        self
    }

    #[must_use]
    pub fn example(mut self, example: &str) -> Self {
        self.examples.push(example.to_string());
        self
    }
}

/// Where a snippet was mined from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnippetSource {
    Documentation,
    UsageExample,
    ExampleFile,
}

impl SnippetSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Documentation => "documentation",
            Self::UsageExample => "usage-example",
            Self::ExampleFile => "example-file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub code: String,

    #[serde(default)]
    pub language: String,

    pub source: SnippetSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CodeSnippet {
    pub fn new(code: impl Into<String>, source: SnippetSource) -> Self {
        Self {
            code: code.into(),
            language: String::new(),
            source,
            title: None,
        }
    }

    #[must_use]
    pub fn language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Title used when the snippet is cited as an example
    #[must_use]
    pub fn label(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} snippet", self.source.as_str()))
    }
}

/// Documentation section with its fenced code blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSection {
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub code_blocks: Vec<String>,

    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleFile {
    pub path: String,

    pub content: String,

    #[serde(default)]
    pub language: String,
}

/// Flattened textual corpus. Snippet order carries no meaning for scoring
/// but fixes the order in which evidence is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub snippets: Vec<CodeSnippet>,
}

impl Corpus {
    #[must_use]
    pub const fn new(snippets: Vec<CodeSnippet>) -> Self {
        Self { snippets }
    }

    /// Flatten documentation sections, usage examples and example files
    #[must_use]
    pub fn from_sources(
        sections: &[DocSection],
        usage_examples: &[String],
        files: &[ExampleFile],
    ) -> Self {
        let mut snippets = Vec::new();

        for section in sections {
            for block in &section.code_blocks {
                snippets.push(
                    CodeSnippet::new(block.clone(), SnippetSource::Documentation)
                        .language(&section.language)
                        .title(&section.title),
                );
            }
        }

        for example in usage_examples {
            snippets.push(CodeSnippet::new(example.clone(), SnippetSource::UsageExample));
        }

        for file in files {
            snippets.push(
                CodeSnippet::new(file.content.clone(), SnippetSource::ExampleFile)
                    .language(&file.language)
                    .title(&file.path),
            );
        }

        Self { snippets }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Corpus as handed over by the documentation and example extractors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSources {
    #[serde(default)]
    pub snippets: Vec<CodeSnippet>,

    #[serde(default)]
    pub sections: Vec<DocSection>,

    #[serde(default)]
    pub usage_examples: Vec<String>,

    #[serde(default)]
    pub example_files: Vec<ExampleFile>,
}

impl From<CorpusSources> for Corpus {
    fn from(sources: CorpusSources) -> Self {
        let mut corpus = Self::from_sources(
            &sources.sections,
            &sources.usage_examples,
            &sources.example_files,
        );
        let mut snippets = sources.snippets;
        snippets.append(&mut corpus.snippets);
        corpus.snippets = snippets;
        corpus
    }
}

/// Closed set of relationship kinds between two functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    CommonlyUsedWith,
    AlternativeTo,
    PrerequisiteFor,
    Extends,
    Replaces,
    ComposesWith,
    TransformsOutputOf,
    ValidatesInputFor,
    ErrorHandlerFor,
    ConfigurationFor,
}

impl RelationshipType {
    pub const ALL: [Self; 10] = [
        Self::CommonlyUsedWith,
        Self::AlternativeTo,
        Self::PrerequisiteFor,
        Self::Extends,
        Self::Replaces,
        Self::ComposesWith,
        Self::TransformsOutputOf,
        Self::ValidatesInputFor,
        Self::ErrorHandlerFor,
        Self::ConfigurationFor,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommonlyUsedWith => "commonly-used-with",
            Self::AlternativeTo => "alternative-to",
            Self::PrerequisiteFor => "prerequisite-for",
            Self::Extends => "extends",
            Self::Replaces => "replaces",
            Self::ComposesWith => "composes-with",
            Self::TransformsOutputOf => "transforms-output-of",
            Self::ValidatesInputFor => "validates-input-for",
            Self::ErrorHandlerFor => "error-handler-for",
            Self::ConfigurationFor => "configuration-for",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which scoring strategy produced a piece of evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactorKind {
    CoOccurrence,
    ParameterCompatibility,
    ReturnTypeCompatibility,
    SemanticSimilarity,
    WorkflowPattern,
    PrerequisiteChain,
    AlternativeGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthFactor {
    pub factor: FactorKind,
    pub weight: f32,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextExample {
    pub title: String,
    pub code: String,
    pub explanation: String,
    pub source: String,
}

/// Evidence for one relationship emitted by one scoring strategy
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipCandidate {
    pub source: String,
    pub target: String,
    pub relationship: RelationshipType,
    pub strength: f32,
    pub confidence: f32,
    pub evidence_count: usize,
    pub factor: StrengthFactor,
    pub examples: Vec<ContextExample>,
    pub reasons: Vec<String>,
}

/// Merged relationship from one function to `function_name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedRelationship {
    pub function_name: String,
    pub relationship_type: RelationshipType,
    pub strength: f32,
    pub confidence: f32,
    pub evidence_count: usize,
    pub strength_factors: Vec<StrengthFactor>,
    pub context_examples: Vec<ContextExample>,
    pub use_case_reasons: Vec<String>,
}

impl EnhancedRelationship {
    /// Ranking key used for ordering and for the aggregate score
    #[must_use]
    pub fn score(&self) -> f32 {
        self.strength * self.confidence
    }
}

impl From<RelationshipCandidate> for EnhancedRelationship {
    fn from(candidate: RelationshipCandidate) -> Self {
        Self {
            function_name: candidate.target,
            relationship_type: candidate.relationship,
            strength: clamp_unit(candidate.strength),
            confidence: clamp_unit(candidate.confidence),
            evidence_count: candidate.evidence_count.max(1),
            strength_factors: vec![candidate.factor],
            context_examples: candidate.examples,
            use_case_reasons: candidate.reasons,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub step: usize,
    pub description: String,
    pub functions: Vec<String>,
    pub example: String,
}

impl WorkflowStep {
    #[must_use]
    pub fn involves(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteChain {
    pub target: String,
    pub prerequisites: Vec<String>,
    pub reason: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeOption {
    pub function_name: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub best_for: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeGroup {
    pub purpose: String,
    pub options: Vec<AlternativeOption>,
    pub recommendation: String,
}

impl AlternativeGroup {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.function_name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualInfo {
    pub use_cases: Vec<String>,
    pub workflow_steps: Vec<WorkflowStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisite_chain: Option<PrerequisiteChain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_group: Option<AlternativeGroup>,
}

/// Per-function engine output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipMap {
    pub function_name: String,
    pub relationships: Vec<EnhancedRelationship>,
    pub relationship_score: f32,
    pub contextual_info: ContextualInfo,
}

impl RelationshipMap {
    #[must_use]
    pub fn find(&self, name: &str, rel: RelationshipType) -> Option<&EnhancedRelationship> {
        self.relationships
            .iter()
            .find(|r| r.function_name == name && r.relationship_type == rel)
    }
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
