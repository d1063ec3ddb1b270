use crate::service::payment_service::InitiateRequest;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct InitiateBody {
    pub component: String,
    pub paymentarea: String,
    pub itemid: i64,
    #[serde(default)]
    pub description: String,
}

pub async fn initiate_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<InitiateBody>,
) -> impl IntoResponse {
    let Some(user_id) = acting_user(&headers) else {
        return (
            axum::http::StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "X-User-Id header is required"})),
        )
            .into_response();
    };

    let req = InitiateRequest {
        user_id,
        component: body.component,
        payment_area: body.paymentarea,
        item_id: body.itemid,
        description: body.description,
    };

    match state.payment_service.initiate(req).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(authority): Path<String>,
) -> impl IntoResponse {
    match state.payment_service.transaction_by_authority(&authority).await {
        Ok(Some(tx)) => (
            axum::http::StatusCode::OK,
            Json(serde_json::json!({
                "id": tx.id,
                "authority": tx.authority,
                "component": tx.component,
                "payment_area": tx.payment_area,
                "item_id": tx.item_id,
                "amount": tx.amount,
                "currency": tx.currency,
                "status": tx.status,
                "ref_id": tx.ref_id,
                "created_at": tx.created_at,
                "updated_at": tx.updated_at,
            })),
        )
            .into_response(),
        Ok(None) => (
            axum::http::StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "transaction not found"})),
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}

pub fn acting_user(headers: &HeaderMap) -> Option<i64> {
    headers
        .get("X-User-Id")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
