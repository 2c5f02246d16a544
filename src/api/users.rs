use crate::api::AppState;
use crate::api::schemas::users::{SignUpRequest, SignUpResponse};
use crate::error::{AppError, BAD_REQUEST_REASON, Result};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};

pub async fn sign_up(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected sign-up body");
        AppError::BadRequest(BAD_REQUEST_REASON.to_string())
    })?;

    let user_id = state.user_service.sign_up(payload.nickname, payload.username, payload.password).await?;

    Ok(Json(SignUpResponse { user_id }))
}
