use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::filter::{filter_orders, status_counts, OrderQuery, StatusCounts};
use crate::models::geo::{CoordinateTarget, Coordinates};
use crate::models::order::{DeliveryOrder, OrderDraft, OrderStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/summary", get(summary))
        .route(
            "/orders/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/orders/:id/coordinates", put(set_coordinates))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<OrderQuery, AppError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<OrderStatus>().map_err(AppError::BadRequest)?),
        };

        Ok(OrderQuery::new(self.search.unwrap_or_default(), status))
    }
}

#[derive(Deserialize)]
pub struct PickedPointRequest {
    pub target: CoordinateTarget,
    pub location: Coordinates,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub removed: bool,
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DeliveryOrder>>, AppError> {
    let query = params.into_query()?;
    let store = state.store()?;

    Ok(Json(
        filter_orders(store.orders(), &query)
            .into_iter()
            .cloned()
            .collect(),
    ))
}

async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<StatusCounts>, AppError> {
    let store = state.store()?;
    Ok(Json(status_counts(store.orders())))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<OrderDraft>,
) -> Result<Json<DeliveryOrder>, AppError> {
    let order = state.store()?.create::<DeliveryOrder>(draft)?;
    Ok(Json(order))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeliveryOrder>, AppError> {
    let store = state.store()?;
    let order = store
        .get::<DeliveryOrder>(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?;

    Ok(Json(order.clone()))
}

async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<OrderDraft>,
) -> Result<Json<DeliveryOrder>, AppError> {
    let order = state.store()?.update::<DeliveryOrder>(&id, draft)?;
    Ok(Json(order))
}

async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let removed = state.store()?.remove::<DeliveryOrder>(&id)?;
    Ok(Json(DeleteResponse { id, removed }))
}

/// Stores a point picked on the map as the order's start or end.
async fn set_coordinates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<PickedPointRequest>,
) -> Result<Json<DeliveryOrder>, AppError> {
    let mut store = state.store()?;
    let draft = store
        .get::<DeliveryOrder>(&id)
        .map(OrderDraft::from)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?
        .with_picked_point(payload.target, payload.location);

    let order = store.update::<DeliveryOrder>(&id, draft)?;
    Ok(Json(order))
}
