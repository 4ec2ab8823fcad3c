use serde::{Deserialize, Serialize};

/// One named subgroup and the segmented-region labels folded into it.
///
/// Matches the on-disk shape `{ "name": "...", "indices": [0, 3, 4] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgroupDefinition {
    pub name: String,
    pub indices: Vec<u32>,
}

impl SubgroupDefinition {
    pub fn new(name: impl Into<String>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            indices,
        }
    }
}

/// Total number of region labels referenced across all definitions
pub fn total_region_count(subgroups: &[SubgroupDefinition]) -> usize {
    subgroups.iter().map(|sg| sg.indices.len()).sum()
}
