use super::AssignmentMapping;
use crate::workflows::exchange::domain::DrawCandidate;

/// Decide whether `giver` may draw `receiver`, given the pairs fixed so far
/// in the current attempt.
///
/// Rules, in order: a participant never draws themselves; partners never draw
/// each other, in either direction, regardless of which record stores the
/// link; and a reciprocal A->B / B->A pair is rejected unless the group has
/// only two members, where no alternative exists.
pub fn is_valid_pair(
    giver: &DrawCandidate,
    receiver: &DrawCandidate,
    assignments_so_far: &AssignmentMapping,
    group_size: usize,
) -> bool {
    if giver.id == receiver.id {
        return false;
    }

    if giver.partner.as_ref() == Some(&receiver.id) {
        return false;
    }
    if receiver.partner.as_ref() == Some(&giver.id) {
        return false;
    }

    if group_size > 2 && assignments_so_far.get(&receiver.id) == Some(&giver.id) {
        return false;
    }

    true
}
