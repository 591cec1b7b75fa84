use crate::alternatives::AlternativeGroups;
use crate::prerequisite::PrerequisiteIndex;
use crate::types::{ContextualInfo, FunctionDescriptor};
use crate::workflow::WorkflowExtraction;

/// Packages per-function context from the globally extracted patterns.
///
/// Pure lookup: use-cases verbatim, every consolidated workflow step naming the
/// function, its prerequisite chain and its alternative group.
pub struct ContextAssembler<'a> {
    workflows: &'a WorkflowExtraction,
    prerequisites: &'a PrerequisiteIndex,
    alternatives: &'a AlternativeGroups,
}

impl<'a> ContextAssembler<'a> {
    #[must_use]
    pub const fn new(
        workflows: &'a WorkflowExtraction,
        prerequisites: &'a PrerequisiteIndex,
        alternatives: &'a AlternativeGroups,
    ) -> Self {
        Self {
            workflows,
            prerequisites,
            alternatives,
        }
    }

    #[must_use]
    pub fn assemble(&self, function: &FunctionDescriptor) -> ContextualInfo {
        ContextualInfo {
            use_cases: function.use_cases.clone(),
            workflow_steps: self.workflows.steps_for(&function.name),
            prerequisite_chain: self.prerequisites.chain_for(&function.name).cloned(),
            alternative_group: self.alternatives.group_for(&function.name).cloned(),
        }
    }
}
