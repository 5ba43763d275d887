pub mod app;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use calendar::{CalendarState, DateKey, Direction};
pub use catalog::{CatalogEntry, CatalogStore, Catalogs};
pub use config::AppConfig;
pub use state::{AppState, Trackers};
pub use storage::Storage;
pub use store::{DayRecord, DayStore, StoreFactory};
