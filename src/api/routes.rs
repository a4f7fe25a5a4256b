//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name         | Description                               | Return Type         |
// |--------------|-------------------------------------------|---------------------|
// | health       | Health check endpoint                     | Response            |
// | create_order | Submit an order to the engine             | ApiResult<Response> |
// | cancel_order | Cancel a resting order                    | ApiResult<Response> |
// | get_bbo      | Best bid/offer for a symbol               | ApiResult<Response> |
// | get_depth    | Aggregated depth for a symbol             | ApiResult<Response> |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::{ApiError, ApiResult, AppState, CancelResponse, CreateOrderRequest, OrderResponse};
use crate::types::OrderStatus;

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// Submit an order. Accepted submissions return 201 with the result body; a
/// validation rejection returns the same body with status 400.
pub async fn create_order(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<Response> {
    let result = state.engine.submit(req.into_request());
    let code = if result.status == OrderStatus::Rejected {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CREATED
    };
    Ok((code, Json(OrderResponse::from(result))).into_response())
}

/// Cancel a resting order. The owning symbol comes in as a query parameter.
pub async fn cancel_order(
    Extension(state): Extension<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let symbol = params
        .get("symbol")
        .ok_or_else(|| ApiError::BadRequest("symbol query parameter is required".to_string()))?;

    let result = state.engine.cancel(symbol, order_id)?;
    Ok((StatusCode::OK, Json(CancelResponse::from(result))).into_response())
}

/// Best bid and offer for a symbol. Sides are null when empty.
pub async fn get_bbo(
    Extension(state): Extension<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Response> {
    Ok((StatusCode::OK, Json(state.engine.bbo(&symbol))).into_response())
}

/// Aggregated depth for a symbol, capped by the `depth` query parameter.
pub async fn get_depth(
    Extension(state): Extension<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let depth = params
        .get("depth")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(state.default_depth);

    Ok((StatusCode::OK, Json(state.engine.l2(&symbol, depth))).into_response())
}
