use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Seat, Show};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/{id}/seats", get(show_seats))
}

#[derive(Debug, Deserialize)]
pub struct ShowsQuery {
    pub available: Option<bool>,
}

// GET /api/shows?available=true
async fn list_shows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShowsQuery>,
) -> Result<Json<Vec<Show>>> {
    let shows = state
        .shows
        .list_shows(params.available.unwrap_or(false))
        .await?;
    Ok(Json(shows))
}

// GET /api/shows/{id}/seats
async fn show_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Seat>>> {
    let seats = state.shows.seats_for_show(id).await?;
    Ok(Json(seats))
}
