use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::account::application::use_cases::login::{LoginError, LoginRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::sign_up::SessionDto;

/// Request body for login. Documentation shape only; the handler validates
/// the incoming JSON while parsing it.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginBody {
    /// Email address
    #[schema(example = "jane@example.com")]
    pub email: String,

    /// Password
    #[schema(example = "SecurePass123")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Nickname, acting as the session principal
    #[schema(example = "jane_doe")]
    nickname: String,

    /// Whether the email address has been verified
    #[schema(example = true)]
    is_verified: bool,

    /// Session established for the account
    session: SessionDto,
}

fn map_login_error(err: LoginError, email: &str) -> HttpResponse {
    match &err {
        LoginError::InvalidCredentials => {
            warn!(email = %email, "Login rejected: invalid credentials");
            ApiResponse::unauthorized("INVALID_CREDENTIALS", "Invalid email or password")
        }

        other => {
            error!(email = %email, error = %other, "Unhandled login error");
            ApiResponse::internal_error()
        }
    }
}

/// Log in with email and password
///
/// Returns a session whose principal is the account nickname. Unknown email
/// and wrong password produce the same response.
#[utoipa::path(
    post,
    path = "/api/accounts/login",
    tag = "accounts",
    request_body = LoginBody,
    responses(
        (
            status = 200,
            description = "Login successful",
            body = inline(SuccessResponse<LoginResponse>),
            example = json!({
                "success": true,
                "data": {
                    "nickname": "jane_doe",
                    "is_verified": true,
                    "session": {
                        "token": "eyJhbGciOiJIUzI1NiJ9...",
                        "expires_at": "2026-01-02T12:00:00Z"
                    }
                }
            })
        ),
        (
            status = 400,
            description = "Validation error",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Invalid email format"
                }
            })
        ),
        (
            status = 401,
            description = "Invalid credentials",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_CREDENTIALS",
                    "message": "Invalid email or password"
                }
            })
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INTERNAL_ERROR",
                    "message": "An unexpected error occurred"
                }
            })
        ),
    )
)]
#[post("/api/accounts/login")]
pub async fn login_handler(
    req: web::Json<LoginRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let use_case = &data.login_use_case;

    let email = req.email().to_string();
    info!(email = %email, "Login attempt");

    match use_case.execute(req.into_inner()).await {
        Ok(output) => {
            info!(
                account_id = %output.account_id,
                nickname = %output.nickname,
                "Login successful"
            );

            ApiResponse::success(LoginResponse {
                nickname: output.nickname,
                is_verified: output.is_verified,
                session: output.session.into(),
            })
        }

        Err(e) => map_login_error(e, &email),
    }
}
