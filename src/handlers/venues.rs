use axum::extract::{Path, State};
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::handlers::parse_id;
use crate::models::{FormPage, SearchResults, VenueForm, VenueSummary};
use crate::services::booking;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::form::FormFields;
use crate::utils::response::{created, success};

#[derive(Debug, Serialize)]
struct DeleteOutcome {
    id: i32,
    deleted: bool,
}

pub async fn list_venues(State(state): State<AppState>) -> Result<Response, AppError> {
    let venues = state.store.list_venues().await?;
    let upcoming = state.store.upcoming_counts_by_venue(Utc::now()).await?;
    let areas = booking::group_by_location(venues, &upcoming);

    Ok(success(areas, "Venues loaded"))
}

pub async fn search_venues(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let term = fields.raw("search_term").unwrap_or_default().to_string();
    let venues = state.store.search_venues(&term).await?;
    let upcoming = state.store.upcoming_counts_by_venue(Utc::now()).await?;

    let data: Vec<VenueSummary> = venues
        .iter()
        .map(|venue| VenueSummary::new(venue, &upcoming))
        .collect();
    let results = SearchResults::new(term, data);
    let message = format!("{} venue(s) found", results.count);

    Ok(success(results, message))
}

pub async fn show_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&venue_id, "Venue")?;
    let venue = state
        .store
        .venue(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} was not found", id)))?;
    let shows = state.store.venue_shows(id).await?;

    Ok(success(
        booking::venue_detail(venue, shows, Utc::now()),
        "Venue loaded",
    ))
}

pub async fn create_venue_form() -> Response {
    success(FormPage::blank(VenueForm::default()), "New venue form")
}

pub async fn create_venue(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let form = VenueForm::from_fields(&fields);
    form.validate()?;

    let venue = state.store.create_venue(&form).await.map_err(|e| {
        AppError::transaction(
            e,
            format!("An error occurred. Venue {} could not be listed.", form.name),
        )
    })?;

    info!(venue_id = venue.id, name = %venue.name, "Venue created");
    let message = format!("Venue {} was successfully listed!", venue.name);
    Ok(created(venue, message))
}

/// Deleting an unknown venue is a no-op reported as `deleted: false`.
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&venue_id, "Venue")?;

    let deleted = state.store.delete_venue(id).await.map_err(|e| {
        AppError::transaction(
            e,
            format!("An error occurred. Venue {} could not be deleted.", id),
        )
    })?;

    match deleted {
        Some(venue) => {
            info!(venue_id = id, name = %venue.name, "Venue deleted");
            Ok(success(
                DeleteOutcome { id, deleted: true },
                format!("{} was successfully deleted", venue.name),
            ))
        }
        None => Ok(success(
            DeleteOutcome { id, deleted: false },
            format!("Venue {} does not exist; nothing was deleted", id),
        )),
    }
}

pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&venue_id, "Venue")?;
    let venue = state
        .store
        .venue(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} was not found", id)))?;

    Ok(success(
        FormPage::edit(id, VenueForm::from(&venue)),
        "Edit venue form",
    ))
}

pub async fn edit_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let id = parse_id(&venue_id, "Venue")?;
    let form = VenueForm::from_fields(&fields);
    form.validate()?;

    let venue = state
        .store
        .update_venue(id, &form)
        .await
        .map_err(|e| AppError::transaction(e, "Edit failed. Please try again."))?
        .ok_or_else(|| AppError::NotFound(format!("Venue {} was not found", id)))?;

    info!(venue_id = id, "Venue updated");
    let message = format!("{} was successfully edited!", venue.name);
    Ok(success(venue, message))
}
