//! Output classification record written next to the expanded parameter-set

use serde::Serialize;

/// `[dataset_outputs, generic_outputs]`
pub type OutputGroups = [Vec<String>; 2];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub outfiles: OutputGroups,
    /// `[is_lhe_source, declared_event_count]`
    pub lheinfo: (bool, i64),
}

impl ArtifactInfo {
    pub fn dataset_outputs(&self) -> &[String] {
        &self.outfiles[0]
    }

    pub fn generic_outputs(&self) -> &[String] {
        &self.outfiles[1]
    }
}
