//! Per-domain catalogs of the items day records tick off by id.
//!
//! Supplements, study subjects and bodycare products each live in their own
//! slot as a JSON array. A missing or unreadable slot starts from the
//! domain's seed list; the slot is only written once the catalog changes.

use crate::errors::{StoreError, StoreResult};
use crate::models::Domain;
use crate::storage::Storage;
use crate::store::StoreFactory;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, error, warn};

pub const DEFAULT_DOSAGE: &str = "1x daily";

pub trait CatalogEntry: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Slot name under the namespace prefix.
    const SLOT: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    /// Trims user input and fills defaults; fails on entries that cannot be
    /// stored.
    fn normalize(&mut self) -> StoreResult<()>;

    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

fn required_name(name: &mut String) -> StoreResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidPatch("name must not be empty".into()));
    }
    *name = trimmed.to_string();
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Supplement {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub dosage: String,
}

impl CatalogEntry for Supplement {
    const SLOT: &'static str = "supplement-list";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn normalize(&mut self) -> StoreResult<()> {
        required_name(&mut self.name)?;
        let dosage = self.dosage.trim();
        self.dosage = if dosage.is_empty() {
            DEFAULT_DOSAGE.to_string()
        } else {
            dosage.to_string()
        };
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StudyCategory {
    #[default]
    #[serde(rename = "DSA")]
    Dsa,
    #[serde(rename = "Web Dev")]
    WebDev,
    Database,
    #[serde(rename = "System Design")]
    SystemDesign,
    Projects,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudySubject {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: StudyCategory,
}

impl CatalogEntry for StudySubject {
    const SLOT: &'static str = "study-subjects";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn normalize(&mut self) -> StoreResult<()> {
        required_name(&mut self.name)
    }

    fn seed() -> Vec<Self> {
        let subject = |id, name: &str, category| StudySubject {
            id,
            name: name.into(),
            category,
        };
        vec![
            subject(1, "Arrays", StudyCategory::Dsa),
            subject(2, "React", StudyCategory::WebDev),
            subject(3, "SQL", StudyCategory::Database),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodycareCategory {
    #[default]
    Skincare,
    #[serde(rename = "Hair Care")]
    HairCare,
    #[serde(rename = "Body Care")]
    BodyCare,
    Exercise,
    Wellness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Routine {
    #[default]
    Morning,
    Evening,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BodycareProduct {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: BodycareCategory,
    #[serde(default)]
    pub routine: Routine,
}

impl CatalogEntry for BodycareProduct {
    const SLOT: &'static str = "bodycare-products";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn normalize(&mut self) -> StoreResult<()> {
        required_name(&mut self.name)
    }

    fn seed() -> Vec<Self> {
        use BodycareCategory::{BodyCare, Exercise, Skincare};
        use Routine::{Both, Evening, Morning};

        let product = |id, name: &str, category, routine| BodycareProduct {
            id,
            name: name.into(),
            category,
            routine,
        };
        vec![
            product(1, "Cleanser", Skincare, Morning),
            product(2, "Moisturizer", Skincare, Both),
            product(3, "Sunscreen", Skincare, Morning),
            product(4, "Body Lotion", BodyCare, Evening),
            product(5, "Push-ups", Exercise, Morning),
            product(6, "Yoga", Exercise, Evening),
        ]
    }
}

/// Ordered list of catalog entries backed by one slot.
#[derive(Debug)]
pub struct CatalogStore<T> {
    storage: Storage,
    slot: String,
    items: Vec<T>,
}

impl<T: CatalogEntry> CatalogStore<T> {
    pub async fn load(storage: Storage, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let items = match storage.read_slot(&slot).await {
            Ok(Some(contents)) => match serde_json::from_str(&contents) {
                Ok(items) => items,
                Err(err) => {
                    warn!(slot = %slot, "failed to parse catalog, using defaults: {err}");
                    T::seed()
                }
            },
            Ok(None) => T::seed(),
            Err(err) => {
                error!(slot = %slot, "failed to read catalog, using defaults: {err}");
                T::seed()
            }
        };
        debug!(slot = %slot, items = items.len(), "catalog loaded");

        Self {
            storage,
            slot,
            items,
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Appends an entry parsed from `entry` under a fresh id. Any id the
    /// caller sent is replaced.
    pub async fn add(&mut self, entry: Value) -> StoreResult<T> {
        let mut item: T =
            serde_json::from_value(entry).map_err(|err| StoreError::InvalidPatch(err.to_string()))?;
        item.normalize()?;
        item.set_id(self.next_id());

        self.items.push(item.clone());
        if let Err(err) = self.persist().await {
            self.items.pop();
            error!(slot = %self.slot, "failed to persist catalog: {err}");
            return Err(err);
        }

        Ok(item)
    }

    pub async fn remove(&mut self, id: u64) -> StoreResult<T> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(StoreError::EntryNotFound(id))?;
        let removed = self.items.remove(index);

        if let Err(err) = self.persist().await {
            self.items.insert(index, removed);
            error!(slot = %self.slot, id, "failed to persist catalog: {err}");
            return Err(err);
        }

        Ok(removed)
    }

    fn next_id(&self) -> u64 {
        self.items.iter().map(T::id).max().unwrap_or(0) + 1
    }

    async fn persist(&self) -> StoreResult<()> {
        let payload = serde_json::to_string_pretty(&self.items)?;
        self.storage.write_slot(&self.slot, &payload).await?;
        Ok(())
    }
}

/// The catalogs of the domains that have one.
#[derive(Debug)]
pub struct Catalogs {
    pub supplements: CatalogStore<Supplement>,
    pub study: CatalogStore<StudySubject>,
    pub bodycare: CatalogStore<BodycareProduct>,
}

macro_rules! with_catalog {
    ($catalogs:expr, $domain:expr, $store:ident => $body:expr) => {{
        let Catalogs {
            supplements,
            study,
            bodycare,
        } = $catalogs;
        match $domain {
            Domain::Supplements => {
                let $store = supplements;
                $body
            }
            Domain::Study => {
                let $store = study;
                $body
            }
            Domain::Bodycare => {
                let $store = bodycare;
                $body
            }
            other => Err(StoreError::NoCatalog(other.to_string())),
        }
    }};
}

impl Catalogs {
    pub async fn open(factory: &StoreFactory) -> Self {
        Self {
            supplements: factory.open_catalog().await,
            study: factory.open_catalog().await,
            bodycare: factory.open_catalog().await,
        }
    }

    pub fn items(&self, domain: Domain) -> StoreResult<Value> {
        with_catalog!(self, domain, store => Ok(serde_json::to_value(store.items())?))
    }

    pub async fn add(&mut self, domain: Domain, entry: Value) -> StoreResult<Value> {
        with_catalog!(self, domain, store => Ok(serde_json::to_value(store.add(entry).await?)?))
    }

    pub async fn remove(&mut self, domain: Domain, id: u64) -> StoreResult<Value> {
        with_catalog!(self, domain, store => Ok(serde_json::to_value(store.remove(id).await?)?))
    }
}
