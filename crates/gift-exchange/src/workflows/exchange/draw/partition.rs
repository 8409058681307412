use std::collections::BTreeMap;

use crate::workflows::exchange::domain::{DrawCandidate, GroupTag};

/// Split candidates into independent matching pools by group tag. Pools with
/// no members simply do not appear in the result.
pub(crate) fn partition_by_group(
    candidates: &[DrawCandidate],
) -> BTreeMap<GroupTag, Vec<DrawCandidate>> {
    let mut groups: BTreeMap<GroupTag, Vec<DrawCandidate>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(candidate.group)
            .or_default()
            .push(candidate.clone());
    }
    groups
}
