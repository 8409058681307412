//! Randomized draw engine: rejection sampling over per-group shuffles.
//!
//! Each attempt shuffles the receiver list and validates pairs incrementally,
//! aborting on the first violation. The loop is bounded by a configurable
//! retry budget and fails cleanly when the constraints cannot be satisfied.

mod constraints;
mod partition;

pub use constraints::is_valid_pair;
pub(crate) use partition::partition_by_group;

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::domain::{DrawCandidate, GroupTag, ParticipantId};

/// Giver id -> receiver id, built transiently and persisted only on success.
pub type AssignmentMapping = BTreeMap<ParticipantId, ParticipantId>;

const DEFAULT_MAX_ATTEMPTS: u32 = 5000;

/// Retry budget for the rejection-sampling loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    pub max_attempts: u32,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Generation-phase failures. Both variants are returned before any
/// persistence is attempted, so no state has changed when the caller sees
/// them.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("the {} group has {} participant(s); at least two are needed", .group.label(), .members)]
    InsufficientParticipants { group: GroupTag, members: usize },
    #[error("no valid assignment for the {} group after {} attempts", .group.label(), .attempts)]
    ConstraintUnsatisfiable { group: GroupTag, attempts: u32 },
}

/// Per-group audit entry describing how a pool was drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDrawReport {
    pub group: GroupTag,
    pub members: usize,
    pub attempts: u32,
}

/// Result of a full generation pass: the merged mapping plus one report per
/// non-empty group.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub assignments: AssignmentMapping,
    pub groups: Vec<GroupDrawReport>,
}

/// Stateless engine applying the retry budget to a candidate set.
pub struct DrawEngine {
    config: DrawConfig,
}

impl DrawEngine {
    pub fn new(config: DrawConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Partition the candidates, draw each pool independently, and merge the
    /// results. Any pool failing fails the whole draw; pools share no state,
    /// so nothing partial survives.
    pub fn draw<R: Rng>(
        &self,
        candidates: &[DrawCandidate],
        rng: &mut R,
    ) -> Result<DrawOutcome, DrawError> {
        let mut assignments = AssignmentMapping::new();
        let mut groups = Vec::new();

        for (tag, members) in partition_by_group(candidates) {
            let drawn = generate_group(&members, &self.config, rng)?;
            groups.push(GroupDrawReport {
                group: tag,
                members: members.len(),
                attempts: drawn.attempts,
            });
            assignments.extend(drawn.assignments);
        }

        Ok(DrawOutcome {
            assignments,
            groups,
        })
    }
}

struct GroupDraw {
    assignments: AssignmentMapping,
    attempts: u32,
}

/// Draw one homogeneous pool by rejection sampling: shuffle the receiver
/// list, validate pairs incrementally, abort the attempt on the first
/// violation, and retry until the budget runs out.
fn generate_group<R: Rng>(
    group: &[DrawCandidate],
    config: &DrawConfig,
    rng: &mut R,
) -> Result<GroupDraw, DrawError> {
    if group.is_empty() {
        return Ok(GroupDraw {
            assignments: AssignmentMapping::new(),
            attempts: 0,
        });
    }

    let tag = group[0].group;
    if group.len() < 2 {
        return Err(DrawError::InsufficientParticipants {
            group: tag,
            members: group.len(),
        });
    }

    let by_id: BTreeMap<&ParticipantId, &DrawCandidate> =
        group.iter().map(|candidate| (&candidate.id, candidate)).collect();
    let mut receivers: Vec<ParticipantId> =
        group.iter().map(|candidate| candidate.id.clone()).collect();

    for attempt in 1..=config.max_attempts {
        receivers.shuffle(rng);
        if let Some(assignments) = try_pairing(group, &receivers, &by_id) {
            return Ok(GroupDraw {
                assignments,
                attempts: attempt,
            });
        }
    }

    Err(DrawError::ConstraintUnsatisfiable {
        group: tag,
        attempts: config.max_attempts,
    })
}

fn try_pairing(
    group: &[DrawCandidate],
    receivers: &[ParticipantId],
    by_id: &BTreeMap<&ParticipantId, &DrawCandidate>,
) -> Option<AssignmentMapping> {
    let mut assignments = AssignmentMapping::new();

    for (giver, receiver_id) in group.iter().zip(receivers) {
        let receiver = by_id.get(receiver_id).copied()?;
        if !is_valid_pair(giver, receiver, &assignments, group.len()) {
            return None;
        }
        assignments.insert(giver.id.clone(), receiver_id.clone());
    }

    Some(assignments)
}
