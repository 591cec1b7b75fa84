use crate::config::MAX_RELATIONSHIPS;
use crate::types::{clamp_unit, EnhancedRelationship, RelationshipCandidate, RelationshipType};
use std::collections::HashMap;

/// Merge candidates by `(target, relationship type)`, rank, and cap.
///
/// Duplicates keep the max strength and confidence, sum evidence counts and
/// concatenate factors, examples and reasons. Entries are ordered by
/// `strength * confidence` descending; ties keep first-emission order.
#[must_use]
pub fn merge_candidates(candidates: Vec<RelationshipCandidate>) -> Vec<EnhancedRelationship> {
    merge_relationships(candidates.into_iter().map(EnhancedRelationship::from).collect())
}

/// Same contract as [`merge_candidates`] over already-merged entries; running it
/// on its own output returns the input unchanged.
#[must_use]
pub fn merge_relationships(entries: Vec<EnhancedRelationship>) -> Vec<EnhancedRelationship> {
    let mut slots: HashMap<(String, RelationshipType), usize> = HashMap::new();
    let mut merged: Vec<EnhancedRelationship> = Vec::new();

    for entry in entries {
        let key = (entry.function_name.clone(), entry.relationship_type);
        match slots.get(&key) {
            Some(&pos) => absorb(&mut merged[pos], entry),
            None => {
                slots.insert(key, merged.len());
                merged.push(normalize(entry));
            }
        }
    }

    // stable: equal scores keep emission order
    merged.sort_by(|a, b| b.score().total_cmp(&a.score()));
    merged.truncate(MAX_RELATIONSHIPS);
    merged
}

/// Mean of `strength * confidence` over kept entries, 0 for none
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn relationship_score(relationships: &[EnhancedRelationship]) -> f32 {
    if relationships.is_empty() {
        return 0.0;
    }
    let total: f32 = relationships.iter().map(EnhancedRelationship::score).sum();
    clamp_unit(total / relationships.len() as f32)
}

fn normalize(mut entry: EnhancedRelationship) -> EnhancedRelationship {
    entry.strength = clamp_unit(entry.strength);
    entry.confidence = clamp_unit(entry.confidence);
    entry.evidence_count = entry.evidence_count.max(1);
    entry
}

fn absorb(into: &mut EnhancedRelationship, other: EnhancedRelationship) {
    let other = normalize(other);
    into.strength = into.strength.max(other.strength);
    into.confidence = into.confidence.max(other.confidence);
    into.evidence_count += other.evidence_count;
    into.strength_factors.extend(other.strength_factors);
    into.context_examples.extend(other.context_examples);
    into.use_case_reasons.extend(other.use_case_reasons);
}
