//! In-memory registry of request records.
//!
//! The registry is the ordered collection a presentation layer works against:
//! newest records first, keyed by id, with every edit routed through the
//! [`UpdateCascade`]. Loading and saving the collection is left to the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::UpdateCascade;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, FieldChange, RequestRecord};

/// Sort order by request sequence number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Lowest sequence number first.
    Ascending,
    /// Highest sequence number first.
    #[default]
    Descending,
}

/// An ordered, id-keyed collection of request records.
///
/// # Example
///
/// ```
/// use foi_deadline_engine::models::{FieldChange, IntakeDetails, RequestRecord};
/// use foi_deadline_engine::registry::RequestRegistry;
///
/// let mut registry = RequestRegistry::default();
/// let record = RequestRecord::from_intake(IntakeDetails {
///     request_number: "AH010T0000001".to_string(),
///     applicant_name: "Ana Rojas".to_string(),
///     intake_date: "01/01/2025".to_string(),
///     initial_due_date: "29/01/2025".to_string(),
/// });
/// let id = record.id;
/// registry.insert(record)?;
///
/// registry.update(id, &[FieldChange::ClosureDate(Some("31/01/2025".to_string()))])?;
/// assert_eq!(registry.get(id).unwrap().elapsed_business_days, Some(22));
/// # Ok::<(), foi_deadline_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestRegistry {
    records: Vec<RequestRecord>,
    cascade: UpdateCascade,
}

impl RequestRegistry {
    /// Creates an empty registry deriving fields with `cascade`.
    pub fn new(cascade: UpdateCascade) -> Self {
        Self {
            records: Vec::new(),
            cascade,
        }
    }

    /// Builds a registry from a persisted collection, keeping its order.
    ///
    /// Referrals are routed to the records office, and when `refresh` is set
    /// every derived field is recomputed. Records whose id repeats an earlier
    /// one are dropped.
    pub fn load(records: Vec<RequestRecord>, cascade: UpdateCascade, refresh: bool) -> Self {
        let total = records.len();
        let mut registry = Self::new(cascade);

        for mut record in records {
            if registry.contains(record.id) {
                debug!(request_id = %record.id, "Skipping duplicate record on load");
                continue;
            }
            record.route_referral();
            if refresh {
                cascade.refresh(&mut record);
            }
            registry.records.push(record);
        }

        info!(
            loaded = registry.records.len(),
            skipped = total - registry.records.len(),
            refreshed = refresh,
            "Request registry loaded"
        );
        registry
    }

    /// Returns the records in insertion order (newest first).
    pub fn records(&self) -> &[RequestRecord] {
        &self.records
    }

    /// Consumes the registry, returning its records for persistence.
    pub fn into_records(self) -> Vec<RequestRecord> {
        self.records
    }

    /// Returns the number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if a record with `id` is held.
    pub fn contains(&self, id: Uuid) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Returns the record with `id`, if held.
    pub fn get(&self, id: Uuid) -> Option<&RequestRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Adds a new record at the front of the collection.
    pub fn insert(&mut self, record: RequestRecord) -> EngineResult<()> {
        if self.contains(record.id) {
            return Err(EngineError::DuplicateRequest { id: record.id });
        }
        debug!(request_id = %record.id, request_number = %record.request_number, "Request added");
        self.records.insert(0, record);
        Ok(())
    }

    /// Applies `changes` to the record with `id` through the update cascade.
    pub fn update(&mut self, id: Uuid, changes: &[FieldChange]) -> EngineResult<AuditTrace> {
        let cascade = self.cascade;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(EngineError::RequestNotFound { id })?;

        let (triggers, trace) = cascade.apply_in_place(record, changes);
        debug!(
            request_id = %id,
            changes = changes.len(),
            triggers = ?triggers,
            "Request updated"
        );
        Ok(trace)
    }

    /// Removes and returns the record with `id`.
    pub fn remove(&mut self, id: Uuid) -> EngineResult<RequestRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(EngineError::RequestNotFound { id })?;
        debug!(request_id = %id, "Request removed");
        Ok(self.records.remove(index))
    }

    /// Returns the records ordered by request sequence number.
    ///
    /// The sort is stable, so records sharing a sequence number keep their
    /// relative order.
    pub fn sorted(&self, direction: SortDirection) -> Vec<&RequestRecord> {
        let mut sorted: Vec<&RequestRecord> = self.records.iter().collect();
        match direction {
            SortDirection::Ascending => sorted.sort_by_key(|r| r.sequence_number()),
            SortDirection::Descending => {
                sorted.sort_by(|a, b| b.sequence_number().cmp(&a.sequence_number()))
            }
        }
        sorted
    }

    /// Returns the records whose displayed values contain `query`, in
    /// insertion order.
    ///
    /// Matching is case-insensitive; an empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&RequestRecord> {
        let needle = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| needle.is_empty() || matches_query(r, &needle))
            .collect()
    }

    /// Returns the records matching `query`, ordered by sequence number.
    pub fn view(&self, query: &str, direction: SortDirection) -> Vec<&RequestRecord> {
        let needle = query.trim().to_lowercase();
        self.sorted(direction)
            .into_iter()
            .filter(|r| needle.is_empty() || matches_query(r, &needle))
            .collect()
    }
}

fn matches_query(record: &RequestRecord, needle: &str) -> bool {
    searchable_values(record)
        .iter()
        .any(|value| value.to_lowercase().contains(needle))
}

fn searchable_values(record: &RequestRecord) -> Vec<String> {
    let mut values = vec![
        record.request_number.clone(),
        record.applicant_name.clone(),
        record.intake_date.clone(),
        record.initial_due_date.clone(),
        record.response_type.to_string(),
        record.label.clone(),
    ];
    values.extend(record.adjusted_due_date_label.clone());
    values.extend(record.department.map(|d| d.to_string()));
    values.extend(record.collaboration_dispatch_date.clone());
    values.extend(record.dispatch_date.clone());
    values.extend(record.status.map(|s| s.to_string()));
    values.extend(record.closure_date.clone());
    values.extend(record.elapsed_business_days.map(|d| d.to_string()));
    values.extend(record.compliance_verdict.map(|v| v.to_string()));
    values
}
