use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use super::domain::{
    DrawStatus, EventSettings, ExchangeStatusView, GroupTag, ParticipantId, ParticipantProfile,
    ParticipantView, RecipientView, SignupRequest,
};
use super::draw::{AssignmentMapping, DrawConfig, DrawEngine, DrawError, GroupDrawReport};
use super::repository::{ParticipantRecord, ParticipantRepository, RepositoryError};

/// Service composing the draw engine and the participant repository.
///
/// The draw is a single logical, non-reentrant operation: the service does no
/// internal locking, so the surrounding application must not start a second
/// draw while one is in flight.
pub struct GiftExchangeService<R> {
    repository: Arc<R>,
    engine: DrawEngine,
}

static PARTICIPANT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_participant_id() -> ParticipantId {
    let id = PARTICIPANT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ParticipantId(format!("elf-{id:06}"))
}

/// Summary handed back after a successful draw. Deliberately excludes the
/// mapping itself: who gives to whom stays secret until each giver reveals.
#[derive(Debug, Clone, Serialize)]
pub struct DrawSummary {
    pub assigned: usize,
    pub groups: Vec<GroupDrawReport>,
}

impl<R> GiftExchangeService<R>
where
    R: ParticipantRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: DrawConfig) -> Self {
        Self {
            repository,
            engine: DrawEngine::new(config),
        }
    }

    /// Register a new participant, returning the stored record.
    pub fn register(
        &self,
        signup: SignupRequest,
    ) -> Result<ParticipantRecord, ExchangeServiceError> {
        let profile = self.profile_from_signup(signup)?;
        let stored = self.repository.insert(ParticipantRecord::new(profile))?;
        Ok(stored)
    }

    fn profile_from_signup(
        &self,
        signup: SignupRequest,
    ) -> Result<ParticipantProfile, ExchangeServiceError> {
        if signup.name.trim().is_empty() {
            return Err(SignupError::MissingName.into());
        }
        if signup.pin.trim().is_empty() {
            return Err(SignupError::MissingPin.into());
        }
        if let Some(partner) = &signup.partner {
            self.require_participant(partner)?;
        }

        Ok(ParticipantProfile {
            id: next_participant_id(),
            name: signup.name,
            pin: signup.pin,
            group: signup.group,
            partner: signup.partner,
            food_preference: signup.food_preference,
            fun_fact: signup.fun_fact,
        })
    }

    fn require_participant(&self, id: &ParticipantId) -> Result<(), ExchangeServiceError> {
        match self.repository.fetch(id)? {
            Some(_) => Ok(()),
            None => Err(SignupError::UnknownPartner(id.clone()).into()),
        }
    }

    /// Point a participant at a new partner, or clear the link. Locked once
    /// the draw is complete.
    pub fn set_partner(
        &self,
        id: &ParticipantId,
        partner: Option<ParticipantId>,
    ) -> Result<(), ExchangeServiceError> {
        if self.repository.settings()?.draw_complete {
            return Err(ExchangeServiceError::DrawAlreadyComplete);
        }
        if self.repository.fetch(id)?.is_none() {
            return Err(RepositoryError::NotFound.into());
        }
        if let Some(partner) = &partner {
            if partner == id {
                return Err(SignupError::SelfPartner.into());
            }
            self.require_participant(partner)?;
        }

        self.repository.set_partner(id, partner)?;
        Ok(())
    }

    /// Remove a participant, first clearing any partner or assignment links
    /// other records hold to it.
    pub fn remove_participant(&self, id: &ParticipantId) -> Result<(), ExchangeServiceError> {
        for record in self.repository.list()? {
            if record.profile.id == *id {
                continue;
            }
            if record.profile.partner.as_ref() == Some(id) {
                self.repository.set_partner(&record.profile.id, None)?;
            }
            if record.assigned_to.as_ref() == Some(id) {
                self.repository.set_assignment(&record.profile.id, None)?;
            }
        }

        self.repository.remove(id)?;
        Ok(())
    }

    /// Public roster: no PINs, partner links, or assignments.
    pub fn roster(&self) -> Result<Vec<ParticipantView>, ExchangeServiceError> {
        let views = self
            .repository
            .list()?
            .iter()
            .map(ParticipantRecord::public_view)
            .collect();
        Ok(views)
    }

    pub fn status(&self) -> Result<ExchangeStatusView, ExchangeServiceError> {
        let settings = self.repository.settings()?;
        let participants = self.repository.list()?.len();
        Ok(ExchangeStatusView {
            status: DrawStatus::from_flag(settings.draw_complete).label(),
            draw_complete: settings.draw_complete,
            participants,
            deadline: settings.deadline,
            budget: settings.budget,
        })
    }

    pub fn settings(&self) -> Result<EventSettings, ExchangeServiceError> {
        Ok(self.repository.settings()?)
    }

    /// Update the admin-owned settings fields, leaving `draw_complete` alone.
    pub fn update_settings(
        &self,
        deadline: NaiveDate,
        budget: u32,
    ) -> Result<EventSettings, ExchangeServiceError> {
        let mut settings = self.repository.settings()?;
        settings.deadline = deadline;
        settings.budget = budget;
        self.repository.store_settings(settings.clone())?;
        Ok(settings)
    }

    /// Run the full draw and commit it, using the thread-local random source.
    pub fn run_draw(&self) -> Result<DrawSummary, ExchangeServiceError> {
        self.run_draw_with_rng(&mut rand::thread_rng())
    }

    /// Same as [`GiftExchangeService::run_draw`] with a caller-supplied
    /// random source, so a seeded generator yields a reproducible draw.
    pub fn run_draw_with_rng<G: Rng>(
        &self,
        rng: &mut G,
    ) -> Result<DrawSummary, ExchangeServiceError> {
        let candidates: Vec<_> = self
            .repository
            .list()?
            .iter()
            .map(ParticipantRecord::draw_candidate)
            .collect();

        // Nothing to draw when nobody has signed up.
        if candidates.is_empty() {
            return Err(DrawError::InsufficientParticipants {
                group: GroupTag::default(),
                members: 0,
            }
            .into());
        }

        let outcome = self.engine.draw(&candidates, rng)?;
        self.commit(&outcome.assignments)?;

        Ok(DrawSummary {
            assigned: outcome.assignments.len(),
            groups: outcome.groups,
        })
    }

    /// Persist every pair, then flip the completion flag, strictly in that
    /// order. Any write failure triggers a compensating rollback before the
    /// error is returned, so a reported success always means the stored state
    /// satisfies the draw invariants.
    fn commit(&self, assignments: &AssignmentMapping) -> Result<(), ExchangeServiceError> {
        for (giver, receiver) in assignments {
            if let Err(cause) = self.repository.set_assignment(giver, Some(receiver.clone())) {
                return Err(self.roll_back(cause));
            }
        }

        if let Err(cause) = self.repository.set_draw_complete(true) {
            return Err(self.roll_back(cause));
        }

        Ok(())
    }

    fn roll_back(&self, cause: RepositoryError) -> ExchangeServiceError {
        match self.clear_draw_state(false) {
            Ok(()) => ExchangeServiceError::PartialCommit(cause),
            Err(rollback) => ExchangeServiceError::RollbackFailed {
                commit: cause,
                rollback,
            },
        }
    }

    fn clear_draw_state(&self, clear_revealed: bool) -> Result<(), RepositoryError> {
        for record in self.repository.list()? {
            self.repository.set_assignment(&record.profile.id, None)?;
            if clear_revealed {
                self.repository.set_revealed(&record.profile.id, false)?;
            }
        }
        self.repository.set_draw_complete(false)
    }

    /// Clear every assignment and reveal flag and reopen the draw. Idempotent.
    pub fn reset_draw(&self) -> Result<(), ExchangeServiceError> {
        self.clear_draw_state(true)?;
        Ok(())
    }

    /// Verify a participant's PIN and look up their recipient. Marks the
    /// caller revealed once a recipient is returned; before a draw has
    /// completed there is nothing to reveal and `Ok(None)` comes back.
    pub fn reveal(
        &self,
        id: &ParticipantId,
        pin: &str,
    ) -> Result<Option<RecipientView>, ExchangeServiceError> {
        let caller = self
            .repository
            .fetch(id)?
            .filter(|record| record.profile.pin == pin)
            .ok_or(ExchangeServiceError::VerificationFailed)?;

        let Some(receiver_id) = caller.assigned_to else {
            return Ok(None);
        };

        let receiver = self
            .repository
            .fetch(&receiver_id)?
            .ok_or(RepositoryError::NotFound)?;
        self.repository.set_revealed(id, true)?;

        Ok(Some(receiver.recipient_view()))
    }
}

/// Signup validation failures.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("name is required")]
    MissingName,
    #[error("PIN is required")]
    MissingPin,
    #[error("unknown partner: {0:?}")]
    UnknownPartner(ParticipantId),
    #[error("a participant cannot partner with themselves")]
    SelfPartner,
}

/// Error raised by the exchange service.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeServiceError {
    #[error(transparent)]
    Signup(#[from] SignupError),
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("draw commit failed and was rolled back: {0}")]
    PartialCommit(#[source] RepositoryError),
    #[error(
        "draw rollback failed after commit error '{commit}'; stored assignments may be inconsistent: {rollback}"
    )]
    RollbackFailed {
        commit: RepositoryError,
        #[source]
        rollback: RepositoryError,
    },
    #[error("verification failed: wrong participant or PIN")]
    VerificationFailed,
    #[error("partner links are locked once the draw is complete")]
    DrawAlreadyComplete,
}
