use crate::types::{
    AlternativeGroup, AlternativeOption, Complexity, FactorKind, FunctionDescriptor,
    RelationshipCandidate, RelationshipType, StrengthFactor,
};

const GROUP_STRENGTH: f32 = 0.75;
const GROUP_CONFIDENCE: f32 = 0.7;
const RECOMMENDATION: &str =
    "Choose based on your specific use case, preferring the simplest option that fits";

/// Same category, identical return type and parameter counts within one
#[must_use]
pub fn are_alternatives(a: &FunctionDescriptor, b: &FunctionDescriptor) -> bool {
    a.category == b.category
        && a.return_type == b.return_type
        && a.parameters.len().abs_diff(b.parameters.len()) <= 1
}

/// Greedy clustering of substitutable functions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlternativeGroups {
    groups: Vec<AlternativeGroup>,
}

impl AlternativeGroups {
    #[must_use]
    pub fn build(functions: &[FunctionDescriptor]) -> Self {
        let mut processed = vec![false; functions.len()];
        let mut groups = Vec::new();

        for (idx, current) in functions.iter().enumerate() {
            if processed[idx] {
                continue;
            }
            processed[idx] = true;

            let mut members = vec![current];
            for (other_idx, other) in functions.iter().enumerate() {
                if processed[other_idx] || !are_alternatives(current, other) {
                    continue;
                }
                processed[other_idx] = true;
                members.push(other);
            }

            if members.len() > 1 {
                groups.push(AlternativeGroup {
                    purpose: format!("Functions for {} operations", current.category),
                    options: members.into_iter().map(option_for).collect(),
                    recommendation: RECOMMENDATION.to_string(),
                });
            }
        }

        log::debug!("Alternative groups: {}", groups.len());
        Self { groups }
    }

    #[must_use]
    pub fn groups(&self) -> &[AlternativeGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group_for(&self, name: &str) -> Option<&AlternativeGroup> {
        self.groups.iter().find(|g| g.contains(name))
    }

    /// `alternative-to` candidates for every other member of `name`'s group
    #[must_use]
    pub fn candidates(&self, name: &str) -> Vec<RelationshipCandidate> {
        let Some(group) = self.group_for(name) else {
            return Vec::new();
        };

        group
            .options
            .iter()
            .filter(|o| o.function_name != name)
            .map(|o| RelationshipCandidate {
                source: name.to_string(),
                target: o.function_name.clone(),
                relationship: RelationshipType::AlternativeTo,
                strength: GROUP_STRENGTH,
                confidence: GROUP_CONFIDENCE,
                evidence_count: 1,
                factor: StrengthFactor {
                    factor: FactorKind::AlternativeGroup,
                    weight: GROUP_STRENGTH,
                    evidence: group.purpose.clone(),
                },
                examples: Vec::new(),
                reasons: vec![format!(
                    "{} can be used instead of {name}",
                    o.function_name
                )],
            })
            .collect()
    }
}

fn option_for(function: &FunctionDescriptor) -> AlternativeOption {
    let mut pros = Vec::new();
    match function.complexity {
        Complexity::Beginner => pros.push("Easy to use".to_string()),
        Complexity::Intermediate => pros.push("Balanced power and simplicity".to_string()),
        Complexity::Advanced => pros.push("Powerful and flexible".to_string()),
    }
    if function.parameters.len() <= 2 {
        pros.push("Simple interface".to_string());
    }
    if !function.examples.is_empty() {
        pros.push(format!(
            "Documented with {} example(s)",
            function.examples.len()
        ));
    }

    let mut cons = Vec::new();
    if function.complexity == Complexity::Advanced {
        cons.push("Steeper learning curve".to_string());
    }
    if function.parameters.len() > 3 {
        cons.push("Many parameters to configure".to_string());
    }

    let best_for = if function.use_cases.is_empty() {
        vec![if function.description.is_empty() {
            format!("General {} tasks", function.category)
        } else {
            function.description.clone()
        }]
    } else {
        function.use_cases.iter().take(3).cloned().collect()
    };

    AlternativeOption {
        function_name: function.name.clone(),
        pros,
        cons,
        best_for,
    }
}
