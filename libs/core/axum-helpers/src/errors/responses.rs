//! OpenAPI response types shared by handlers.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Missing, invalid or expired bearer token",
    content_type = "application/json",
    example = json!({
        "status": "error",
        "message": "Invalid or expired token",
        "code": 401
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bearer token is not a structurally valid JWT",
    content_type = "application/json",
    example = json!({
        "status": "error",
        "message": "failed to parse token: InvalidToken",
        "code": 400
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);
