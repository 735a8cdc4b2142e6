use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::api::rest::orders::DeleteResponse;
use crate::error::AppError;
use crate::models::driver::{Driver, DriverDraft};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(list_drivers).post(create_driver))
        .route(
            "/drivers/:id",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Driver>>, AppError> {
    let store = state.store()?;
    Ok(Json(store.drivers().to_vec()))
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<DriverDraft>,
) -> Result<Json<Driver>, AppError> {
    let driver = state.store()?.create::<Driver>(draft)?;
    Ok(Json(driver))
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let store = state.store()?;
    let driver = store
        .get::<Driver>(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", id)))?;

    Ok(Json(driver.clone()))
}

async fn update_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<DriverDraft>,
) -> Result<Json<Driver>, AppError> {
    let driver = state.store()?.update::<Driver>(&id, draft)?;
    Ok(Json(driver))
}

async fn delete_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let removed = state.store()?.remove::<Driver>(&id)?;
    Ok(Json(DeleteResponse { id, removed }))
}
