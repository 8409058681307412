use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::workflows::exchange::domain::{
    DrawCandidate, EventSettings, GroupTag, ParticipantId, SignupRequest,
};
use crate::workflows::exchange::draw::DrawConfig;
use crate::workflows::exchange::repository::{
    ParticipantRecord, ParticipantRepository, RepositoryError,
};
use crate::workflows::exchange::service::GiftExchangeService;

pub(super) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub(super) fn event_settings() -> EventSettings {
    EventSettings {
        deadline: NaiveDate::from_ymd_opt(2026, 12, 20).expect("valid date"),
        budget: 400,
        draw_complete: false,
    }
}

pub(super) fn signup(name: &str) -> SignupRequest {
    SignupRequest {
        name: name.to_string(),
        pin: format!("{}-pin", name.to_lowercase()),
        group: GroupTag::Adult,
        partner: None,
        food_preference: None,
        fun_fact: None,
    }
}

pub(super) fn child_signup(name: &str) -> SignupRequest {
    SignupRequest {
        group: GroupTag::Child,
        ..signup(name)
    }
}

pub(super) fn candidate(id: &str, group: GroupTag) -> DrawCandidate {
    DrawCandidate {
        id: ParticipantId(id.to_string()),
        partner: None,
        group,
    }
}

pub(super) fn partnered_candidate(id: &str, partner: &str, group: GroupTag) -> DrawCandidate {
    DrawCandidate {
        partner: Some(ParticipantId(partner.to_string())),
        ..candidate(id, group)
    }
}

pub(super) fn build_service() -> (
    GiftExchangeService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = GiftExchangeService::new(repository.clone(), DrawConfig::default());
    (service, repository)
}

/// Register one adult per name and hand back the assigned ids in order.
pub(super) fn register_adults(
    service: &GiftExchangeService<MemoryRepository>,
    names: &[&str],
) -> Vec<ParticipantId> {
    names
        .iter()
        .map(|name| {
            service
                .register(signup(name))
                .expect("registration succeeds")
                .profile
                .id
        })
        .collect()
}

#[derive(Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<BTreeMap<ParticipantId, ParticipantRecord>>>,
    settings: Arc<Mutex<EventSettings>>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self {
            records: Arc::default(),
            settings: Arc::new(Mutex::new(event_settings())),
        }
    }
}

impl MemoryRepository {
    pub(super) fn record(&self, id: &ParticipantId) -> Option<ParticipantRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn records(&self) -> Vec<ParticipantRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }

    pub(super) fn draw_complete(&self) -> bool {
        self.settings
            .lock()
            .expect("settings mutex poisoned")
            .draw_complete
    }
}

impl ParticipantRepository for MemoryRepository {
    fn insert(&self, record: ParticipantRecord) -> Result<ParticipantRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile.id.clone(), record.clone());
        Ok(record)
    }

    fn remove(&self, id: &ParticipantId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &ParticipantId) -> Result<Option<ParticipantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ParticipantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn set_partner(
        &self,
        id: &ParticipantId,
        partner: Option<ParticipantId>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.profile.partner = partner;
        Ok(())
    }

    fn set_assignment(
        &self,
        id: &ParticipantId,
        receiver: Option<ParticipantId>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.assigned_to = receiver;
        Ok(())
    }

    fn set_revealed(&self, id: &ParticipantId, revealed: bool) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.revealed = revealed;
        Ok(())
    }

    fn settings(&self) -> Result<EventSettings, RepositoryError> {
        Ok(self.settings.lock().expect("settings mutex poisoned").clone())
    }

    fn store_settings(&self, settings: EventSettings) -> Result<(), RepositoryError> {
        *self.settings.lock().expect("settings mutex poisoned") = settings;
        Ok(())
    }

    fn set_draw_complete(&self, complete: bool) -> Result<(), RepositoryError> {
        self.settings
            .lock()
            .expect("settings mutex poisoned")
            .draw_complete = complete;
        Ok(())
    }
}

/// Wraps the memory repository and fails selected write paths so commit and
/// rollback behavior can be driven deterministically.
pub(super) struct FaultyRepository {
    pub(super) inner: MemoryRepository,
    allowed_assignment_writes: usize,
    fail_assignment_clears: bool,
    fail_flag_flip: bool,
    writes: Mutex<usize>,
}

impl FaultyRepository {
    /// Let `allowed` assignment writes through, then fail; rollback clears
    /// still succeed.
    pub(super) fn failing_after(allowed: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            allowed_assignment_writes: allowed,
            fail_assignment_clears: false,
            fail_flag_flip: false,
            writes: Mutex::new(0),
        }
    }

    /// Refuse every assignment write, including the rollback clears.
    pub(super) fn dead_writes() -> Self {
        Self {
            fail_assignment_clears: true,
            ..Self::failing_after(0)
        }
    }

    /// Accept assignment writes but refuse to flip the completion flag on.
    pub(super) fn stuck_flag() -> Self {
        Self {
            fail_flag_flip: true,
            allowed_assignment_writes: usize::MAX,
            ..Self::failing_after(0)
        }
    }

    fn unavailable() -> RepositoryError {
        RepositoryError::Unavailable("participant store offline".to_string())
    }
}

impl ParticipantRepository for FaultyRepository {
    fn insert(&self, record: ParticipantRecord) -> Result<ParticipantRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn remove(&self, id: &ParticipantId) -> Result<(), RepositoryError> {
        self.inner.remove(id)
    }

    fn fetch(&self, id: &ParticipantId) -> Result<Option<ParticipantRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<ParticipantRecord>, RepositoryError> {
        self.inner.list()
    }

    fn set_partner(
        &self,
        id: &ParticipantId,
        partner: Option<ParticipantId>,
    ) -> Result<(), RepositoryError> {
        self.inner.set_partner(id, partner)
    }

    fn set_assignment(
        &self,
        id: &ParticipantId,
        receiver: Option<ParticipantId>,
    ) -> Result<(), RepositoryError> {
        if receiver.is_some() {
            let mut writes = self.writes.lock().expect("write counter poisoned");
            if *writes >= self.allowed_assignment_writes {
                return Err(Self::unavailable());
            }
            *writes += 1;
        } else if self.fail_assignment_clears {
            return Err(Self::unavailable());
        }
        self.inner.set_assignment(id, receiver)
    }

    fn set_revealed(&self, id: &ParticipantId, revealed: bool) -> Result<(), RepositoryError> {
        self.inner.set_revealed(id, revealed)
    }

    fn settings(&self) -> Result<EventSettings, RepositoryError> {
        self.inner.settings()
    }

    fn store_settings(&self, settings: EventSettings) -> Result<(), RepositoryError> {
        self.inner.store_settings(settings)
    }

    fn set_draw_complete(&self, complete: bool) -> Result<(), RepositoryError> {
        if complete && self.fail_flag_flip {
            return Err(Self::unavailable());
        }
        self.inner.set_draw_complete(complete)
    }
}
