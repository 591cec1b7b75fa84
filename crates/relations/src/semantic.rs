use crate::config::RelationConfig;
use crate::lexical::{name_similarity, normalize_type, types_compatible};
use crate::types::{
    FactorKind, FunctionDescriptor, RelationshipCandidate, RelationshipType, StrengthFactor,
};

const PARAMETER_STRENGTH: f32 = 0.8;
const PARAMETER_CONFIDENCE: f32 = 0.7;
const RETURN_STRENGTH: f32 = 0.6;
const RETURN_CONFIDENCE: f32 = 0.6;
const NAME_CONFIDENCE_FACTOR: f32 = 0.8;
const CATEGORY_STRENGTH: f32 = 0.7;
const CATEGORY_CONFIDENCE: f32 = 0.5;

/// Signature-level relationship candidates for every ordered function pair.
///
/// Four independent checks run per pair and each hit is its own candidate:
/// parameter compatibility, return compatibility, name similarity and shared category.
pub struct SemanticIndex {
    candidates: Vec<Vec<RelationshipCandidate>>,
}

impl SemanticIndex {
    #[must_use]
    pub fn build(functions: &[FunctionDescriptor], config: &RelationConfig) -> Self {
        let candidates: Vec<Vec<RelationshipCandidate>> = functions
            .iter()
            .enumerate()
            .map(|(idx, owner)| {
                functions
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != idx)
                    .flat_map(|(_, other)| score_pair(owner, other, config))
                    .collect()
            })
            .collect();

        log::debug!(
            "Semantic index: {} candidates across {} functions",
            candidates.iter().map(Vec::len).sum::<usize>(),
            functions.len()
        );

        Self { candidates }
    }

    #[must_use]
    pub fn candidates(&self, function: usize) -> &[RelationshipCandidate] {
        self.candidates.get(function).map_or(&[], Vec::as_slice)
    }
}

/// Candidates on `owner`'s map pointing at `other`
fn score_pair(
    owner: &FunctionDescriptor,
    other: &FunctionDescriptor,
    config: &RelationConfig,
) -> Vec<RelationshipCandidate> {
    if owner.name == other.name {
        return Vec::new();
    }

    let mut out = Vec::new();

    // owner consumes what other produces
    if let Some(param) = owner
        .parameters
        .iter()
        .find(|p| types_compatible(&other.return_type, &p.param_type))
    {
        out.push(candidate(
            owner,
            other,
            RelationshipType::TransformsOutputOf,
            PARAMETER_STRENGTH,
            PARAMETER_CONFIDENCE,
            FactorKind::ParameterCompatibility,
            format!(
                "{} returns {} which {} accepts as `{}`",
                other.name, other.return_type, owner.name, param.name
            ),
            format!("{} can process the result of {}", owner.name, other.name),
        ));
    }

    let owner_ret = normalize_type(&owner.return_type);
    if !owner_ret.is_empty() && owner_ret == normalize_type(&other.return_type) {
        out.push(candidate(
            owner,
            other,
            RelationshipType::AlternativeTo,
            RETURN_STRENGTH,
            RETURN_CONFIDENCE,
            FactorKind::ReturnTypeCompatibility,
            format!("both return {}", owner.return_type),
            format!("{} produces the same kind of result as {}", other.name, owner.name),
        ));
    }

    let similarity = name_similarity(&owner.name, &other.name);
    if similarity > config.name_similarity_threshold {
        out.push(candidate(
            owner,
            other,
            RelationshipType::AlternativeTo,
            similarity,
            similarity * NAME_CONFIDENCE_FACTOR,
            FactorKind::SemanticSimilarity,
            format!("name similarity {similarity:.2}"),
            format!("{} has a similar name to {}", other.name, owner.name),
        ));
    }

    if owner.category == other.category {
        out.push(candidate(
            owner,
            other,
            RelationshipType::CommonlyUsedWith,
            CATEGORY_STRENGTH,
            CATEGORY_CONFIDENCE,
            FactorKind::SemanticSimilarity,
            format!("both are {} functions", owner.category),
            format!("{} belongs to the same category as {}", other.name, owner.name),
        ));
    }

    out
}

#[allow(clippy::too_many_arguments)]
fn candidate(
    owner: &FunctionDescriptor,
    other: &FunctionDescriptor,
    relationship: RelationshipType,
    strength: f32,
    confidence: f32,
    factor: FactorKind,
    evidence: String,
    reason: String,
) -> RelationshipCandidate {
    RelationshipCandidate {
        source: owner.name.clone(),
        target: other.name.clone(),
        relationship,
        strength,
        confidence,
        evidence_count: 1,
        factor: StrengthFactor {
            factor,
            weight: strength,
            evidence,
        },
        examples: Vec::new(),
        reasons: vec![reason],
    }
}
