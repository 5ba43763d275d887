use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/domains", get(handlers::list_domains))
        .route(
            "/api/:domain/days/:date",
            get(handlers::get_day).patch(handlers::patch_day),
        )
        .route("/api/:domain/calendar", get(handlers::get_calendar))
        .route(
            "/api/:domain/catalog",
            get(handlers::get_catalog).post(handlers::add_catalog_entry),
        )
        .route("/api/:domain/catalog/:id", delete(handlers::remove_catalog_entry))
        .route("/api/export", get(handlers::export_data))
        .with_state(state)
}
