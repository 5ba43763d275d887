//! Date-keyed day records for one tracking domain.
//!
//! A [`DayStore`] owns exactly one storage slot. It loads the slot once when
//! opened and rewrites the full mapping after every merge. Missing days read
//! as the record's default and are only stored once something is merged into
//! them.

use crate::calendar::{self, DateKey};
use crate::catalog::{CatalogEntry, CatalogStore};
use crate::errors::{StoreError, StoreResult};
use crate::storage::Storage;
use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, warn};

/// Per-day record of one tracking domain. `Default` is the record shown for a
/// day nothing has been logged on.
pub trait DayRecord: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    /// Whether the calendar should mark the day as having data.
    fn has_activity(&self) -> bool {
        false
    }

    /// Rejects field values outside the domain's ranges.
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct DayStore<R> {
    storage: Storage,
    slot: String,
    days: BTreeMap<DateKey, R>,
}

impl<R: DayRecord> DayStore<R> {
    /// Unreadable or malformed slot content yields an empty store.
    pub async fn load(storage: Storage, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let days = match storage.read_slot(&slot).await {
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(days) => days,
                Err(err) => {
                    warn!(slot = %slot, "failed to parse slot, starting empty: {err}");
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                error!(slot = %slot, "failed to read slot, starting empty: {err}");
                BTreeMap::new()
            }
        };
        debug!(slot = %slot, days = days.len(), "day store loaded");

        Self {
            storage,
            slot,
            days,
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn days(&self) -> &BTreeMap<DateKey, R> {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, key: &DateKey) -> R {
        self.get_or(key, R::default())
    }

    pub fn get_or(&self, key: &DateKey, default: R) -> R {
        self.days.get(key).cloned().unwrap_or(default)
    }

    /// Overlays the top-level fields of `patch` onto the day's record and
    /// writes the whole store back to its slot.
    ///
    /// Nested values are replaced, not merged. On a failed write the
    /// in-memory record is restored and the error returned.
    pub async fn merge(&mut self, key: DateKey, patch: Value) -> StoreResult<R> {
        let merged = merge_record(self.get(&key), patch)?;
        let previous = self.days.insert(key, merged.clone());

        if let Err(err) = self.persist().await {
            match previous {
                Some(record) => self.days.insert(key, record),
                None => self.days.remove(&key),
            };
            error!(slot = %self.slot, date = %key, "failed to persist day store: {err}");
            return Err(err);
        }

        Ok(merged)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.days)?)
    }

    /// Days in `from..=to` whose record has activity.
    pub fn marked_dates(&self, from: DateKey, to: DateKey) -> BTreeSet<DateKey> {
        if from > to {
            return BTreeSet::new();
        }
        self.days
            .range(from..=to)
            .filter(|(_, record)| record.has_activity())
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn marked_in_month(&self, reference: NaiveDate) -> BTreeSet<DateKey> {
        let days = calendar::days_in_month(reference);
        match (days.first(), days.last()) {
            (Some(first), Some(last)) => self.marked_dates(DateKey::new(*first), DateKey::new(*last)),
            _ => BTreeSet::new(),
        }
    }

    async fn persist(&self) -> StoreResult<()> {
        let payload = self.to_json()?;
        self.storage.write_slot(&self.slot, &payload).await?;
        Ok(())
    }
}

/// Shallow merge of a JSON object over a record.
pub fn merge_record<R: DayRecord>(existing: R, patch: Value) -> StoreResult<R> {
    let Value::Object(fields) = patch else {
        return Err(StoreError::InvalidPatch("expected a JSON object".into()));
    };

    let Value::Object(mut base) = serde_json::to_value(existing)? else {
        return Err(StoreError::InvalidPatch("record does not serialize to an object".into()));
    };

    for (field, value) in fields {
        match base.get_mut(&field) {
            Some(slot) => *slot = value,
            None => return Err(StoreError::UnknownField(field)),
        }
    }

    let merged: R = serde_json::from_value(Value::Object(base))
        .map_err(|err| StoreError::InvalidPatch(err.to_string()))?;
    merged.validate()?;
    Ok(merged)
}

/// Opens isolated day stores, one slot per domain under a shared namespace.
#[derive(Clone, Debug)]
pub struct StoreFactory {
    storage: Storage,
    namespace: String,
}

impl StoreFactory {
    pub fn new(storage: Storage, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Prefix carried by every slot this factory opens.
    pub fn prefix(&self) -> String {
        format!("{}-", self.namespace)
    }

    pub fn slot_name(&self, domain: &str) -> String {
        format!("{}{domain}", self.prefix())
    }

    pub async fn open<R: DayRecord>(&self, domain: &str) -> DayStore<R> {
        DayStore::load(self.storage.clone(), self.slot_name(domain)).await
    }

    pub async fn open_catalog<T: CatalogEntry>(&self) -> CatalogStore<T> {
        CatalogStore::load(self.storage.clone(), self.slot_name(T::SLOT)).await
    }
}
