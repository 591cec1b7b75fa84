use crate::error::{RelationError, Result};
use crate::types::{RelationshipMap, RelationshipType};
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Edge in the relationship graph
#[derive(Debug, Clone, PartialEq)]
pub struct RelationEdge {
    pub relationship: RelationshipType,
    pub strength: f32,
    pub confidence: f32,
    pub evidence_count: usize,
}

impl RelationEdge {
    /// Traversal cost; strong, well-evidenced edges are cheap
    #[must_use]
    pub fn cost(&self) -> f32 {
        1.0 - self.strength * self.confidence
    }
}

type Related = (String, usize, Vec<RelationshipType>);

/// Directed view over engine output for traversal by downstream generators.
///
/// Nodes are function names, edges are the kept relationships of each map.
pub struct RelationshipGraph {
    pub graph: DiGraph<String, RelationEdge>,
    name_index: HashMap<String, NodeIndex>,
}

impl RelationshipGraph {
    #[must_use]
    pub fn from_maps(maps: &[RelationshipMap]) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            name_index: HashMap::new(),
        };

        for map in maps {
            graph.ensure_node(&map.function_name);
        }

        for map in maps {
            let from = graph.ensure_node(&map.function_name);
            for rel in &map.relationships {
                let to = graph.ensure_node(&rel.function_name);
                graph.graph.add_edge(
                    from,
                    to,
                    RelationEdge {
                        relationship: rel.relationship_type,
                        strength: rel.strength,
                        confidence: rel.confidence,
                        evidence_count: rel.evidence_count,
                    },
                );
            }
        }

        log::debug!(
            "Relationship graph: {} nodes, {} edges",
            graph.graph.node_count(),
            graph.graph.edge_count()
        );
        graph
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.name_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.name_index.insert(name.to_string(), idx);
        idx
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Outgoing targets of `name` with the given relationship type, sorted by name
    pub fn related(&self, name: &str, rel: RelationshipType) -> Result<Vec<String>> {
        let node = self.require(name)?;
        let mut out: Vec<String> = self
            .graph
            .edges(node)
            .filter(|e| e.weight().relationship == rel)
            .filter_map(|e| self.name(e.target()).map(str::to_string))
            .collect();
        out.sort();
        out.dedup();
        Ok(out)
    }

    /// Functions whose maps point at `name` (incoming edges of any type)
    pub fn referenced_by(&self, name: &str) -> Result<Vec<(String, RelationshipType)>> {
        let node = self.require(name)?;
        let mut out: Vec<(String, RelationshipType)> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter_map(|e| {
                self.name(e.source())
                    .map(|n| (n.to_string(), e.weight().relationship))
            })
            .collect();
        out.sort();
        Ok(out)
    }

    /// Everything reachable from `name` within `max_depth` hops.
    /// Returns (name, distance, relationship path) in breadth-first order.
    pub fn neighbors_within(&self, name: &str, max_depth: usize) -> Result<Vec<Related>> {
        let start = self.require(name)?;
        let mut visited = HashSet::from([start]);
        let mut frontier = vec![(start, Vec::<RelationshipType>::new())];
        let mut result = Vec::new();

        for depth in 1..=max_depth {
            let mut next = Vec::new();
            for (current, path) in frontier {
                let mut edges: Vec<_> = self.graph.edges(current).collect();
                edges.sort_by_key(|e| e.target().index());
                for edge in edges {
                    let target = edge.target();
                    if !visited.insert(target) {
                        continue;
                    }
                    let mut new_path = path.clone();
                    new_path.push(edge.weight().relationship);
                    if let Some(target_name) = self.name(target) {
                        result.push((target_name.to_string(), depth, new_path.clone()));
                    }
                    next.push((target, new_path));
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        Ok(result)
    }

    /// Cheapest path between two functions, weighting edges by `1 - strength·confidence`
    #[must_use]
    pub fn find_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let start = self.find_node(from)?;
        let goal = self.find_node(to)?;
        let (_cost, path) = astar(
            &self.graph,
            start,
            |n| n == goal,
            |e| e.weight().cost(),
            |_| 0.0,
        )?;
        Some(
            path.into_iter()
                .filter_map(|n| self.name(n).map(str::to_string))
                .collect(),
        )
    }

    /// Functions ranked by total degree, highest first, ties by name
    #[must_use]
    pub fn hubs(&self, limit: usize) -> Vec<(String, usize)> {
        let mut scores: Vec<(String, usize)> = self
            .graph
            .node_indices()
            .filter_map(|n| {
                let degree = self.graph.edges(n).count()
                    + self.graph.edges_directed(n, Direction::Incoming).count();
                self.name(n).map(|name| (name.to_string(), degree))
            })
            .collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scores.truncate(limit);
        scores
    }

    /// (nodes, edges)
    #[must_use]
    pub fn stats(&self) -> (usize, usize) {
        (self.graph.node_count(), self.graph.edge_count())
    }

    fn require(&self, name: &str) -> Result<NodeIndex> {
        self.find_node(name)
            .ok_or_else(|| RelationError::processing(format!("function not found: {name}")))
    }
}
