use chrono::{NaiveDate, NaiveTime};
use metrics_exporter_prometheus::PrometheusHandle;
use move_estimate::estimate::pricing::MoveSizeCatalog;
use move_estimate::estimate::submission::{
    InboxError, SubmissionId, SubmissionInbox, SubmissionRecord,
};
use move_estimate::estimate::Coordinates;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<MoveSizeCatalog>,
}

/// Leads kept in process memory; lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionInbox {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl InMemorySubmissionInbox {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SubmissionId, SubmissionRecord>>, InboxError>
    {
        self.records
            .lock()
            .map_err(|_| InboxError::Unavailable("inbox lock poisoned".to_string()))
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl SubmissionInbox for InMemorySubmissionInbox {
    fn accept(&self, record: SubmissionRecord) -> Result<SubmissionRecord, InboxError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(InboxError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, InboxError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

/// `lat,lng` pair, e.g. `38.9072,-77.0369`.
pub(crate) fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lng' but found '{raw}'"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid latitude in '{raw}' ({err})"))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid longitude in '{raw}' ({err})"))?;
    Coordinates::new(lat, lng).map_err(|err| err.to_string())
}
