use serde::{Deserialize, Serialize};

use super::domain::{
    DrawCandidate, EventSettings, ParticipantId, ParticipantProfile, ParticipantView, RecipientView,
};

/// Repository record pairing the signup profile with the draw-owned state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub profile: ParticipantProfile,
    pub assigned_to: Option<ParticipantId>,
    pub revealed: bool,
}

impl ParticipantRecord {
    pub fn new(profile: ParticipantProfile) -> Self {
        Self {
            profile,
            assigned_to: None,
            revealed: false,
        }
    }

    /// Reduce the record to the fields the draw engine reads.
    pub fn draw_candidate(&self) -> DrawCandidate {
        DrawCandidate {
            id: self.profile.id.clone(),
            partner: self.profile.partner.clone(),
            group: self.profile.group,
        }
    }

    pub fn public_view(&self) -> ParticipantView {
        ParticipantView {
            id: self.profile.id.clone(),
            name: self.profile.name.clone(),
            group: self.profile.group.label(),
            revealed: self.revealed,
        }
    }

    pub fn recipient_view(&self) -> RecipientView {
        RecipientView {
            id: self.profile.id.clone(),
            name: self.profile.name.clone(),
            food_preference: self.profile.food_preference.clone(),
            fun_fact: self.profile.fun_fact.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Assignment and flag writes map one-to-one onto the backing store's row
/// update primitives; the committer sequences them itself.
pub trait ParticipantRepository: Send + Sync {
    fn insert(&self, record: ParticipantRecord) -> Result<ParticipantRecord, RepositoryError>;
    fn remove(&self, id: &ParticipantId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ParticipantId) -> Result<Option<ParticipantRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ParticipantRecord>, RepositoryError>;
    fn set_partner(
        &self,
        id: &ParticipantId,
        partner: Option<ParticipantId>,
    ) -> Result<(), RepositoryError>;
    fn set_assignment(
        &self,
        id: &ParticipantId,
        receiver: Option<ParticipantId>,
    ) -> Result<(), RepositoryError>;
    fn set_revealed(&self, id: &ParticipantId, revealed: bool) -> Result<(), RepositoryError>;
    fn settings(&self) -> Result<EventSettings, RepositoryError>;
    fn store_settings(&self, settings: EventSettings) -> Result<(), RepositoryError>;
    fn set_draw_complete(&self, complete: bool) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
