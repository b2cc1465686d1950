use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::models::MenuNode;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/menu", get(get_menu))
}

// GET /api/menu
async fn get_menu(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MenuNode>>> {
    let forest = state.menu.get_menu_items().await?;
    Ok(Json(forest))
}
