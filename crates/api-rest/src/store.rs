//! In-memory collaborator implementations.
//!
//! The decision core only knows the trait contracts in `anc_core::services`;
//! this module provides the reference implementation backing the demo server
//! and the integration tests. A deployment would swap these for adapters
//! over the real patient directory and scheduler.
//!
//! The store is cheap to clone (shared interior behind an `RwLock`), so the
//! same instance can serve as both the directory and the scheduler of one
//! facade.

use anc_core::{
    clinic_datetime, AdviceEntry, DecisionError, DecisionResult, PatientDirectory, PatientId,
    PatientRecord, PlannedVisit, PredictionRecord, ScheduleRequest, VisitScheduler, VisitStatus,
};
use anc_types::AdviceText;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
struct StoredPatient {
    id: i64,
    full_name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
}

impl StoredPatient {
    fn to_record(&self) -> PatientRecord {
        PatientRecord {
            id: PatientId(self.id),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }

    /// Sort key mirroring the directory listing order: name, else email.
    fn display_name(&self) -> String {
        self.full_name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct StoreState {
    patients: BTreeMap<i64, StoredPatient>,
    advice: Vec<AdviceEntry>,
    predictions: HashMap<i64, PredictionRecord>,
    visits: HashMap<i64, PlannedVisit>,
    next_patient_id: i64,
    next_advice_id: i64,
}

/// Shared in-memory patient directory, prediction store and visit scheduler.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a patient directly; used for seeding and tests.
    pub fn insert_patient(
        &self,
        full_name: Option<&str>,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> DecisionResult<PatientId> {
        let mut state = self.write()?;
        let id = state.next_patient_id + 1;
        state.next_patient_id = id;
        state.patients.insert(
            id,
            StoredPatient {
                id,
                full_name: full_name.map(str::to_owned),
                email: email.map(str::to_owned),
                phone_number: phone_number.map(str::to_owned),
            },
        );
        Ok(PatientId(id))
    }

    pub(crate) fn put_prediction(
        &self,
        patient: PatientId,
        record: PredictionRecord,
    ) -> DecisionResult<()> {
        let mut state = self.write()?;
        if !state.patients.contains_key(&patient.0) {
            return Err(DecisionError::NotFound(format!("patient {patient}")));
        }
        state.predictions.insert(patient.0, record);
        Ok(())
    }

    pub(crate) fn latest_prediction(
        &self,
        patient: PatientId,
    ) -> DecisionResult<Option<PredictionRecord>> {
        Ok(self.read()?.predictions.get(&patient.0).cloned())
    }

    fn read(&self) -> DecisionResult<std::sync::RwLockReadGuard<'_, StoreState>> {
        self.inner
            .read()
            .map_err(|_| DecisionError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> DecisionResult<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.inner
            .write()
            .map_err(|_| DecisionError::Unavailable("store lock poisoned".into()))
    }
}

fn email_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

impl PatientDirectory for InMemoryStore {
    fn resolve(&self, term: &str, allow_create: bool) -> DecisionResult<Option<PatientId>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(None);
        }

        // Numeric term: treat as a patient ID.
        if term.bytes().all(|b| b.is_ascii_digit()) {
            let Ok(id) = term.parse::<i64>() else {
                return Ok(None);
            };
            return Ok(self.read()?.patients.get(&id).map(|p| PatientId(p.id)));
        }

        // Email term: exact match, optionally creating a minimal record.
        if term.contains('@') {
            {
                let state = self.read()?;
                if let Some(p) = state
                    .patients
                    .values()
                    .find(|p| p.email.as_deref().is_some_and(|e| email_eq(e, term)))
                {
                    return Ok(Some(PatientId(p.id)));
                }
            }
            if allow_create {
                return self.insert_patient(None, Some(term), None).map(Some);
            }
            return Ok(None);
        }

        // Free-text term: best name match, ordered by display name.
        let state = self.read()?;
        let needle = term.to_lowercase();
        let mut candidates: Vec<&StoredPatient> = state
            .patients
            .values()
            .filter(|p| {
                p.full_name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect();
        candidates.sort_by_key(|p| p.display_name());
        Ok(candidates.first().map(|p| PatientId(p.id)))
    }

    fn get_by_id(&self, id: PatientId) -> DecisionResult<Option<PatientRecord>> {
        Ok(self.read()?.patients.get(&id.0).map(StoredPatient::to_record))
    }

    fn get_by_email(&self, email: &str) -> DecisionResult<Option<PatientRecord>> {
        Ok(self
            .read()?
            .patients
            .values()
            .find(|p| p.email.as_deref().is_some_and(|e| email_eq(e, email)))
            .map(StoredPatient::to_record))
    }

    fn list(&self, query: Option<&str>) -> DecisionResult<Vec<PatientRecord>> {
        let state = self.read()?;
        let needle = query.map(str::to_lowercase);
        let mut rows: Vec<&StoredPatient> = state
            .patients
            .values()
            .filter(|p| match &needle {
                None => true,
                Some(q) => {
                    p.email.as_deref().is_some_and(|e| e.to_lowercase().contains(q))
                        || p.full_name
                            .as_deref()
                            .is_some_and(|n| n.to_lowercase().contains(q))
                }
            })
            .collect();
        rows.sort_by_key(|p| p.display_name());
        Ok(rows.iter().map(|p| p.to_record()).collect())
    }

    fn add_advice(&self, id: PatientId, text: &AdviceText) -> DecisionResult<AdviceEntry> {
        let mut state = self.write()?;
        if !state.patients.contains_key(&id.0) {
            return Err(DecisionError::NotFound(format!("patient {id}")));
        }
        let entry_id = state.next_advice_id + 1;
        state.next_advice_id = entry_id;
        let entry = AdviceEntry {
            id: entry_id,
            patient_id: id,
            text: text.as_str().to_owned(),
            created_at: Utc::now(),
        };
        state.advice.push(entry.clone());
        Ok(entry)
    }

    fn list_advice(&self, id: PatientId) -> DecisionResult<Vec<AdviceEntry>> {
        let mut entries: Vec<AdviceEntry> = self
            .read()?
            .advice
            .iter()
            .filter(|a| a.patient_id == id)
            .cloned()
            .collect();
        // Latest first.
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(entries)
    }
}

impl VisitScheduler for InMemoryStore {
    fn schedule(&self, request: &ScheduleRequest, next: NaiveDate) -> DecisionResult<PlannedVisit> {
        let visit = PlannedVisit {
            next_visit: next,
            status: VisitStatus::Scheduled,
            scheduled_for: clinic_datetime(next),
        };
        self.write()?
            .visits
            .insert(request.patient_id.0, visit.clone());
        Ok(visit)
    }

    fn reschedule(&self, patient: PatientId, new_date: NaiveDate) -> DecisionResult<PlannedVisit> {
        let mut state = self.write()?;
        let Some(existing) = state.visits.get_mut(&patient.0) else {
            return Err(DecisionError::NotFound(format!(
                "no appointment for patient {patient}"
            )));
        };
        existing.next_visit = new_date;
        existing.status = VisitStatus::Rescheduled;
        existing.scheduled_for = clinic_datetime(new_date);
        Ok(existing.clone())
    }

    fn next_visit_for_patient(&self, patient: PatientId) -> DecisionResult<Option<PlannedVisit>> {
        Ok(self.read()?.visits.get(&patient.0).cloned())
    }

    fn next_visit_by_email(&self, email: &str) -> DecisionResult<Option<PlannedVisit>> {
        let record = self.get_by_email(email)?;
        match record {
            Some(r) => self.next_visit_for_patient(r.id),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn resolve_by_email_creates_at_most_one_record() {
        let store = InMemoryStore::new();
        let first = store
            .resolve("amina@example.org", true)
            .expect("resolve")
            .expect("created");
        let second = store
            .resolve("Amina@Example.org", true)
            .expect("resolve")
            .expect("found");
        assert_eq!(first, second);
        assert_eq!(store.list(None).expect("list").len(), 1);
    }

    #[test]
    fn resolve_without_create_does_not_invent_patients() {
        let store = InMemoryStore::new();
        assert_eq!(store.resolve("ghost@example.org", false).expect("resolve"), None);
        assert!(store.list(None).expect("list").is_empty());
    }

    #[test]
    fn free_text_resolves_to_best_name_match() {
        let store = InMemoryStore::new();
        store
            .insert_patient(Some("Beatrice Njoroge"), Some("b@example.org"), None)
            .expect("insert");
        let amina = store
            .insert_patient(Some("Amina Wanjiru"), Some("a@example.org"), None)
            .expect("insert");
        assert_eq!(store.resolve("amina", false).expect("resolve"), Some(amina));
        assert_eq!(store.resolve("nobody", false).expect("resolve"), None);
    }

    #[test]
    fn advice_is_listed_latest_first() {
        let store = InMemoryStore::new();
        let id = store
            .insert_patient(Some("Amina Wanjiru"), None, None)
            .expect("insert");
        let first = AdviceText::new("first note").expect("advice");
        let second = AdviceText::new("second note").expect("advice");
        store.add_advice(id, &first).expect("add");
        store.add_advice(id, &second).expect("add");
        let listed = store.list_advice(id).expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].text, "second note");
    }

    #[test]
    fn advice_for_unknown_patient_is_not_found() {
        let store = InMemoryStore::new();
        let note = AdviceText::new("note").expect("advice");
        let err = store
            .add_advice(PatientId(404), &note)
            .expect_err("unknown patient");
        assert!(matches!(err, DecisionError::NotFound(_)));
    }

    #[test]
    fn schedule_then_reschedule_updates_the_plan() {
        let store = InMemoryStore::new();
        let id = store
            .insert_patient(Some("Amina Wanjiru"), Some("amina@example.org"), None)
            .expect("insert");
        let request = ScheduleRequest {
            patient_id: id,
            last_visit: date(2024, 1, 1),
            requested_next: None,
        };
        let planned = store.schedule(&request, date(2024, 1, 22)).expect("schedule");
        assert_eq!(planned.status, VisitStatus::Scheduled);

        let moved = store.reschedule(id, date(2024, 1, 25)).expect("reschedule");
        assert_eq!(moved.status, VisitStatus::Rescheduled);
        assert_eq!(moved.next_visit, date(2024, 1, 25));

        let by_email = store
            .next_visit_by_email("amina@example.org")
            .expect("lookup")
            .expect("planned visit");
        assert_eq!(by_email.next_visit, date(2024, 1, 25));
    }
}
