use chrono::NaiveDate;
use gift_exchange::workflows::exchange::{
    EventSettings, ParticipantId, ParticipantRecord, ParticipantRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn default_event_settings() -> EventSettings {
    EventSettings {
        deadline: NaiveDate::from_ymd_opt(2026, 12, 20).expect("valid date"),
        budget: 500,
        draw_complete: false,
    }
}

#[derive(Clone)]
pub(crate) struct InMemoryParticipantRepository {
    records: Arc<Mutex<BTreeMap<ParticipantId, ParticipantRecord>>>,
    settings: Arc<Mutex<EventSettings>>,
}

impl Default for InMemoryParticipantRepository {
    fn default() -> Self {
        Self {
            records: Arc::default(),
            settings: Arc::new(Mutex::new(default_event_settings())),
        }
    }
}

impl ParticipantRepository for InMemoryParticipantRepository {
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
        let guard = self.settings.lock().expect("settings mutex poisoned");
        Ok(guard.clone())
    }

    fn store_settings(&self, settings: EventSettings) -> Result<(), RepositoryError> {
        let mut guard = self.settings.lock().expect("settings mutex poisoned");
        *guard = settings;
        Ok(())
    }

    fn set_draw_complete(&self, complete: bool) -> Result<(), RepositoryError> {
        let mut guard = self.settings.lock().expect("settings mutex poisoned");
        guard.draw_complete = complete;
        Ok(())
    }
}
