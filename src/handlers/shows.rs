use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use tracing::info;

use crate::models::{EntityRef, ShowForm, ShowFormPage};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::form::FormFields;
use crate::utils::response::{created, success};

pub async fn list_shows(State(state): State<AppState>) -> Result<Response, AppError> {
    let shows = state.store.list_shows().await?;
    Ok(success(shows, "Shows loaded"))
}

pub async fn create_show_form(State(state): State<AppState>) -> Result<Response, AppError> {
    let venues = state.store.list_venues().await?;
    let artists = state.store.list_artists().await?;

    let page = ShowFormPage {
        venues: venues.iter().map(EntityRef::from).collect(),
        artists: artists.iter().map(EntityRef::from).collect(),
        start_time: Utc::now(),
    };
    Ok(success(page, "New show form"))
}

pub async fn create_show(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let form = ShowForm::parse(&fields, Utc::now())?;

    let show = state
        .store
        .create_show(&form)
        .await
        .map_err(|e| AppError::transaction(e, "An error occurred. Show could not be listed."))?;

    info!(
        show_id = show.id,
        venue_id = show.venue_id,
        artist_id = show.artist_id,
        "Show created"
    );
    Ok(created(show, "Show was successfully listed!"))
}
