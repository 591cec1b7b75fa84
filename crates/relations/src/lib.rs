//! # Context Relations
//!
//! Infers how the functions of an extracted API relate to each other, so that
//! downstream generators can write "see also", "use with" and "use instead"
//! guidance.
//!
//! ## Features
//!
//! - **Co-occurrence analysis** - functions appearing near each other in example code
//! - **Semantic pairing** - parameter/return compatibility, similar names, shared category
//! - **Workflow extraction** - ordered multi-function steps mined from snippets
//! - **Prerequisite chains** - functions that habitually run before another
//! - **Alternative groups** - interchangeable functions with pros/cons
//!
//! ## Architecture
//!
//! ```text
//! FunctionDescriptor[] + Corpus
//!     │
//!     ├──> Snippet Index (name occurrences per snippet)
//!     │      ├─ Co-occurrence graph (petgraph, proximity weighted)
//!     │      ├─ Workflow sequences (line order)
//!     │      └─ Prerequisite chains (preceding window)
//!     │
//!     ├──> Semantic Index (pairwise descriptor comparison)
//!     ├──> Alternative Groups (same category + return type)
//!     │
//!     └──> Merger + Context Assembler
//!            ├─ Dedupe by (target, type), keep strongest
//!            ├─ Rank by strength·confidence, cap at 10
//!            └─ RelationshipMap per input function
//! ```

mod alternatives;
mod assembler;
mod config;
mod cooccurrence;
mod engine;
mod error;
mod graph;
mod lexical;
mod merger;
mod prerequisite;
mod relationship_doc;
mod semantic;
mod snippet_index;
mod types;
mod workflow;

pub use alternatives::{are_alternatives, AlternativeGroups};
pub use assembler::ContextAssembler;
pub use config::{MatchMode, RelationConfig, CONFIG_SCHEMA_VERSION, MAX_RELATIONSHIPS};
pub use cooccurrence::{CooccurrenceEdge, CooccurrenceIndex};
pub use engine::{
    build_relationships, build_relationships_from_value, BuildReport, EngineStats,
    ProcessingFailure, RelationshipAnalysis, RelationshipEngine,
};
pub use error::{ErrorKind, RelationError, Result};
pub use graph::{RelationEdge, RelationshipGraph};
pub use lexical::{name_similarity, normalize_type, types_compatible};
pub use merger::{merge_candidates, merge_relationships, relationship_score};
pub use prerequisite::PrerequisiteIndex;
pub use relationship_doc::{
    build_relationship_docs, RelationshipDoc, RelationshipDocConfig, RELATIONSHIP_DOC_VERSION,
};
pub use semantic::SemanticIndex;
pub use snippet_index::{NameMatcher, Occurrence, SnippetIndex};
pub use types::{
    AlternativeGroup, AlternativeOption, CodeSnippet, Complexity, ContextExample, ContextualInfo,
    Corpus, CorpusSources, DocSection, EnhancedRelationship, ExampleFile, FactorKind,
    FunctionCategory, FunctionDescriptor, Parameter, PrerequisiteChain, RelationshipCandidate,
    RelationshipMap, RelationshipType, SnippetSource, StrengthFactor, WorkflowStep,
};
pub use workflow::{WorkflowExtraction, WorkflowSequence};
