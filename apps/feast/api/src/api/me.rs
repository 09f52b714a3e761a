use axum::{Json, Router, http::HeaderMap, http::header, routing::get};
use axum_helpers::errors::responses::{BadRequestResponse, UnauthorizedResponse};
use axum_helpers::{ApiResponse, AppError, AuthenticatedUser, Claims, RequestId, extract_claims};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub request_id: String,
}

/// Identity of the caller as verified by the auth provider.
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Verified caller", body = ApiResponse<MeResponse>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn me(
    user: AuthenticatedUser,
    RequestId(request_id): RequestId,
) -> ApiResponse<MeResponse> {
    ApiResponse::success(
        "Authenticated",
        MeResponse {
            user_id: user.user_id,
            email: user.email,
            request_id,
        },
    )
}

/// Claims of the caller's token, decoded without verification.
///
/// Only reachable after the middleware verified the token remotely.
#[utoipa::path(
    get,
    path = "/me/claims",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unverified claims of the bearer token"),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
pub async fn claims(
    _user: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<Json<Claims>, AppError> {
    let credential = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    extract_claims(credential)
        .map(Json)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

pub fn router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/me/claims", get(claims))
}
