use crate::calendar::{self, CalendarState, DateKey, MonthGrid};
use crate::errors::AppError;
use crate::export::{self, ExportFormat};
use crate::models::{CalendarQuery, DayResponse, Domain, DomainSummary, ExportQuery, IndexQuery};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let domain = match query.domain.as_deref() {
        Some(name) => parse_domain(name)?,
        None => Domain::Skincare,
    };
    let calendar = calendar_state(query.month.as_deref(), query.date.as_deref())?;
    let selected = DateKey::new(calendar.selected());

    let trackers = state.trackers.lock().await;
    let marked = trackers.marked_in_month(domain, calendar.reference());
    let grid = calendar::month_grid(&calendar, today(), &marked);
    let record = trackers.day(domain, &selected)?;

    Ok(Html(render_index(domain, &grid, &record)))
}

pub async fn list_domains() -> Json<Vec<DomainSummary>> {
    Json(
        Domain::ALL
            .into_iter()
            .map(|domain| DomainSummary {
                name: domain.as_str(),
                label: domain.label(),
            })
            .collect(),
    )
}

pub async fn get_day(
    State(state): State<AppState>,
    Path((domain, date)): Path<(String, String)>,
) -> Result<Json<DayResponse<Value>>, AppError> {
    let domain = parse_domain(&domain)?;
    let date: DateKey = date.parse()?;

    let trackers = state.trackers.lock().await;
    let record = trackers.day(domain, &date)?;

    Ok(Json(DayResponse {
        domain,
        date,
        record,
    }))
}

pub async fn patch_day(
    State(state): State<AppState>,
    Path((domain, date)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Result<Json<DayResponse<Value>>, AppError> {
    let domain = parse_domain(&domain)?;
    let date: DateKey = date.parse()?;

    let mut trackers = state.trackers.lock().await;
    let record = trackers.merge(domain, date, patch).await?;
    info!(%domain, %date, "day record updated");

    Ok(Json(DayResponse {
        domain,
        date,
        record,
    }))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<MonthGrid>, AppError> {
    let domain = parse_domain(&domain)?;
    let calendar = calendar_state(query.month.as_deref(), query.selected.as_deref())?;

    let trackers = state.trackers.lock().await;
    let marked = trackers.marked_in_month(domain, calendar.reference());

    Ok(Json(calendar::month_grid(&calendar, today(), &marked)))
}

pub async fn get_catalog(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<Value>, AppError> {
    let domain = parse_domain(&domain)?;

    let trackers = state.trackers.lock().await;
    Ok(Json(trackers.catalogs.items(domain)?))
}

pub async fn add_catalog_entry(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Json(entry): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let domain = parse_domain(&domain)?;

    let mut trackers = state.trackers.lock().await;
    let added = trackers.catalogs.add(domain, entry).await?;
    let id = &added["id"];
    info!(%domain, %id, "catalog entry added");

    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn remove_catalog_entry(
    State(state): State<AppState>,
    Path((domain, id)): Path<(String, u64)>,
) -> Result<Json<Value>, AppError> {
    let domain = parse_domain(&domain)?;

    let mut trackers = state.trackers.lock().await;
    let removed = trackers.catalogs.remove(domain, id).await?;
    info!(%domain, id, "catalog entry removed");

    Ok(Json(removed))
}

pub async fn export_data(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format = ExportFormat::parse(query.format.as_deref())
        .ok_or_else(|| AppError::bad_request("format must be 'json' or 'text'"))?;

    // hold the lock so no merge rewrites a slot mid-export
    let _trackers = state.trackers.lock().await;
    let data = export::collect(state.factory.storage(), &state.factory.prefix()).await?;
    let body = match format {
        ExportFormat::Json => export::to_json(&data)?,
        ExportFormat::Text => export::to_text_report(&data),
    };
    info!(sections = data.len(), ?format, "export generated");

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        ),
    ];
    Ok((headers, body))
}

fn parse_domain(name: &str) -> Result<Domain, AppError> {
    name.parse().map_err(AppError::not_found)
}

/// Selection defaults to today; an explicit month only moves the display.
fn calendar_state(month: Option<&str>, selected: Option<&str>) -> Result<CalendarState, AppError> {
    let mut state = CalendarState::new(today());
    if let Some(selected) = selected {
        let date: DateKey = selected.parse()?;
        state.select(date.date());
    }
    if let Some(month) = month {
        state.show_month(calendar::parse_month(month)?);
    }
    Ok(state)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
