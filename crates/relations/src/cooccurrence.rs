use crate::config::RelationConfig;
use crate::lexical::truncate_example;
use crate::snippet_index::SnippetIndex;
use crate::types::{
    ContextExample, Corpus, FactorKind, FunctionDescriptor, RelationshipCandidate,
    RelationshipType, StrengthFactor,
};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Snippets kept per pair for example rendering
const MAX_EVIDENCE_SNIPPETS: usize = 3;

/// Accumulated evidence for one unordered function pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooccurrenceEdge {
    /// Sum of proximity weights over all shared snippets
    pub weight: f32,

    /// Number of snippets containing both functions
    pub snippets: usize,

    /// First few shared snippet indices, in corpus order
    pub evidence: Vec<usize>,
}

/// Undirected adjacency of functions that appear in the same snippet.
///
/// Node `i` is function `i` of the run. Built in one pass, read-only afterwards.
pub struct CooccurrenceIndex {
    graph: UnGraph<usize, CooccurrenceEdge>,
    saturation: f32,
}

impl CooccurrenceIndex {
    #[allow(clippy::cast_precision_loss)]
    pub fn build(
        index: &SnippetIndex,
        function_count: usize,
        corpus: &Corpus,
        config: &RelationConfig,
    ) -> Self {
        let mut graph: UnGraph<usize, CooccurrenceEdge> = UnGraph::with_capacity(function_count, 0);
        for idx in 0..function_count {
            graph.add_node(idx);
        }

        for snippet in 0..corpus.len() {
            let present = index.occurrences(snippet);
            for (i, left) in present.iter().enumerate() {
                for right in &present[i + 1..] {
                    let distance = left.offset.abs_diff(right.offset) as f32;
                    let weight =
                        (config.proximity_base - distance / config.proximity_scale).max(1.0);

                    let a = NodeIndex::new(left.function);
                    let b = NodeIndex::new(right.function);
                    match graph.find_edge(a, b) {
                        Some(edge) => {
                            let data = &mut graph[edge];
                            data.weight += weight;
                            data.snippets += 1;
                            if data.evidence.len() < MAX_EVIDENCE_SNIPPETS {
                                data.evidence.push(snippet);
                            }
                        }
                        None => {
                            graph.add_edge(
                                a,
                                b,
                                CooccurrenceEdge {
                                    weight,
                                    snippets: 1,
                                    evidence: vec![snippet],
                                },
                            );
                        }
                    }
                }
            }
        }

        log::debug!(
            "Co-occurrence index: {} functions, {} pairs",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            graph,
            saturation: config.cooccurrence_saturation,
        }
    }

    #[must_use]
    pub fn edge(&self, a: usize, b: usize) -> Option<&CooccurrenceEdge> {
        if a >= self.graph.node_count() || b >= self.graph.node_count() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .map(|e| &self.graph[e])
    }

    /// Cumulative weighted co-occurrence, 0 when never seen together
    #[must_use]
    pub fn weight(&self, a: usize, b: usize) -> f32 {
        self.edge(a, b).map_or(0.0, |e| e.weight)
    }

    /// Weight normalised into [0, 1]
    #[must_use]
    pub fn strength(&self, a: usize, b: usize) -> f32 {
        (self.weight(a, b) / self.saturation).min(1.0)
    }

    /// Co-occurring functions of `function`, ordered by function index
    #[must_use]
    pub fn neighbors(&self, function: usize) -> Vec<(usize, &CooccurrenceEdge)> {
        if function >= self.graph.node_count() {
            return Vec::new();
        }
        let node = NodeIndex::new(function);
        let mut out: Vec<(usize, &CooccurrenceEdge)> = self
            .graph
            .edges(node)
            .map(|e| {
                let other = if e.source() == node { e.target() } else { e.source() };
                (other.index(), e.weight())
            })
            .collect();
        out.sort_by_key(|(other, _)| *other);
        out
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// `commonly-used-with` candidates for `function`
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn candidates(
        &self,
        function: usize,
        functions: &[FunctionDescriptor],
        corpus: &Corpus,
        config: &RelationConfig,
    ) -> Vec<RelationshipCandidate> {
        let source = &functions[function].name;

        self.neighbors(function)
            .into_iter()
            .map(|(other, edge)| {
                let target = &functions[other].name;
                let examples = edge
                    .evidence
                    .iter()
                    .filter_map(|&s| corpus.snippets.get(s))
                    .take(1)
                    .map(|snippet| ContextExample {
                        title: snippet.label(),
                        code: truncate_example(&snippet.code, config.example_char_limit),
                        explanation: format!("{source} and {target} appear in the same snippet"),
                        source: snippet.source.as_str().to_string(),
                    })
                    .collect();

                RelationshipCandidate {
                    source: source.clone(),
                    target: target.clone(),
                    relationship: RelationshipType::CommonlyUsedWith,
                    strength: (edge.weight / self.saturation).min(1.0),
                    confidence: (0.5 + 0.1 * edge.snippets as f32).min(0.95),
                    evidence_count: edge.snippets,
                    factor: StrengthFactor {
                        factor: FactorKind::CoOccurrence,
                        weight: edge.weight,
                        evidence: format!(
                            "co-occurs in {} snippet(s) with weight {:.2}",
                            edge.snippets, edge.weight
                        ),
                    },
                    examples,
                    reasons: vec![format!("{source} is frequently used together with {target}")],
                }
            })
            .collect()
    }
}
