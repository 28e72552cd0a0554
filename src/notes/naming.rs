/// Decides which branches are parent (integration) branches
pub trait BranchNaming: Send + Sync {
    fn is_parent_branch(&self, branch: &str) -> bool;
}

/// Parent branches are `<prefix><name>`; children of a parent are named
/// `<prefix><name>__<child>` and are never parents themselves.
#[derive(Debug, Clone)]
pub struct FeaturePrefix {
    pub prefix: String,
}

pub const CHILD_SEPARATOR: &str = "__";

impl FeaturePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl BranchNaming for FeaturePrefix {
    fn is_parent_branch(&self, branch: &str) -> bool {
        match branch.strip_prefix(&self.prefix) {
            Some(rest) => !rest.is_empty() && !rest.contains(CHILD_SEPARATOR),
            None => false,
        }
    }
}
