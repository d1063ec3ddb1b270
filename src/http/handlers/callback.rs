use crate::http::handlers::payments::acting_user;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

// `id` is the local transaction id embedded in the callback URL at initiation;
// it is only used for the ownership check, the authority does the correlation.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub id: i64,
    #[serde(rename = "Authority")]
    pub authority: String,
    #[serde(rename = "Status")]
    pub status: String,
}

// Fatal rejections of the callback page itself; payment failures come back as
// a declined PaymentResponse instead.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("Payment information not found.")]
    NotFound,
    #[error("You are not authorized to access this payment.")]
    NotAllowed,
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        let status = match self {
            CallbackError::NotFound => axum::http::StatusCode::NOT_FOUND,
            CallbackError::NotAllowed => axum::http::StatusCode::FORBIDDEN,
        };

        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

pub async fn process_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    let Some(user_id) = acting_user(&headers) else {
        return CallbackError::NotAllowed.into_response();
    };

    let tx = match state.payment_service.transaction_by_authority(&params.authority).await {
        Ok(Some(tx)) => tx,
        Ok(None) => return CallbackError::NotFound.into_response(),
        Err(e) => {
            return (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    // Only the payer who initiated this attempt may land on its callback.
    if tx.user_id != user_id || tx.id != params.id {
        return CallbackError::NotAllowed.into_response();
    }

    match state.payment_service.verify(&params.authority, &params.status).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
