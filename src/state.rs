use crate::calendar::DateKey;
use crate::catalog::Catalogs;
use crate::errors::StoreResult;
use crate::models::{
    BodycareDay, Domain, ExerciseDay, HaircareDay, SkincareDay, StudyDay, SupplementsDay,
};
use crate::store::{DayStore, StoreFactory};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::Mutex;

/// One day store per tracking domain, plus the item catalogs.
#[derive(Debug)]
pub struct Trackers {
    pub skincare: DayStore<SkincareDay>,
    pub haircare: DayStore<HaircareDay>,
    pub supplements: DayStore<SupplementsDay>,
    pub study: DayStore<StudyDay>,
    pub bodycare: DayStore<BodycareDay>,
    pub exercise: DayStore<ExerciseDay>,
    pub catalogs: Catalogs,
}

// Binds `$store` to the typed store of `$domain`.
macro_rules! dispatch {
    ($trackers:expr, $domain:expr, $store:ident => $body:expr) => {{
        let Trackers {
            skincare,
            haircare,
            supplements,
            study,
            bodycare,
            exercise,
            ..
        } = $trackers;
        match $domain {
            Domain::Skincare => {
                let $store = skincare;
                $body
            }
            Domain::Haircare => {
                let $store = haircare;
                $body
            }
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
            Domain::Exercise => {
                let $store = exercise;
                $body
            }
        }
    }};
}

impl Trackers {
    pub async fn open(factory: &StoreFactory) -> Self {
        Self {
            skincare: factory.open(Domain::Skincare.as_str()).await,
            haircare: factory.open(Domain::Haircare.as_str()).await,
            supplements: factory.open(Domain::Supplements.as_str()).await,
            study: factory.open(Domain::Study.as_str()).await,
            bodycare: factory.open(Domain::Bodycare.as_str()).await,
            exercise: factory.open(Domain::Exercise.as_str()).await,
            catalogs: Catalogs::open(factory).await,
        }
    }

    /// The day's record as JSON, the domain default when nothing is stored.
    pub fn day(&self, domain: Domain, key: &DateKey) -> StoreResult<Value> {
        dispatch!(self, domain, store => to_value(store.get(key)))
    }

    pub async fn merge(&mut self, domain: Domain, key: DateKey, patch: Value) -> StoreResult<Value> {
        dispatch!(self, domain, store => to_value(store.merge(key, patch).await?))
    }

    pub fn marked_in_month(&self, domain: Domain, reference: NaiveDate) -> BTreeSet<DateKey> {
        dispatch!(self, domain, store => store.marked_in_month(reference))
    }

    pub fn logged_days(&self, domain: Domain) -> usize {
        dispatch!(self, domain, store => store.len())
    }
}

fn to_value(record: impl Serialize) -> StoreResult<Value> {
    Ok(serde_json::to_value(record)?)
}

#[derive(Clone)]
pub struct AppState {
    pub factory: StoreFactory,
    pub trackers: Arc<Mutex<Trackers>>,
}

impl AppState {
    pub fn new(factory: StoreFactory, trackers: Trackers) -> Self {
        Self {
            factory,
            trackers: Arc::new(Mutex::new(trackers)),
        }
    }

    pub async fn open(factory: StoreFactory) -> Self {
        let trackers = Trackers::open(&factory).await;
        Self::new(factory, trackers)
    }
}
