use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::account::application::use_cases::confirm_email::ConfirmEmailError;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

use super::sign_up::SessionDto;

/// Query parameters carried by the emailed confirmation link.
#[derive(Deserialize, IntoParams)]
pub struct ConfirmEmailQuery {
    /// Email address the token was issued for
    pub email: String,

    /// Verification token from the email
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct ConfirmEmailResponse {
    /// Success message
    #[schema(example = "Email verified successfully")]
    message: String,

    /// Nickname of the verified account
    #[schema(example = "jane_doe")]
    nickname: String,

    /// When the account was verified
    verified_at: DateTime<Utc>,

    /// Session established for the verified account
    session: SessionDto,
}

fn map_confirm_email_error(err: ConfirmEmailError, email: &str) -> HttpResponse {
    match &err {
        ConfirmEmailError::AccountNotFound => {
            warn!(email = %email, "Email confirmation for unknown account");
            ApiResponse::not_found("ACCOUNT_NOT_FOUND", "Account not found")
        }

        ConfirmEmailError::InvalidToken => {
            warn!(email = %email, "Email confirmation with invalid token");
            ApiResponse::bad_request("INVALID_TOKEN", "Invalid verification token")
        }

        other => {
            error!(email = %email, error = ?other, "Unhandled email confirmation error");
            ApiResponse::internal_error()
        }
    }
}

/// Confirm an email address
///
/// Consumes the link from the verification email. Replaying an already used
/// link succeeds again with the original verification timestamp.
#[utoipa::path(
    get,
    path = "/api/accounts/check-email-token",
    tag = "accounts",
    params(ConfirmEmailQuery),
    responses(
        (
            status = 200,
            description = "Email verified",
            body = inline(SuccessResponse<ConfirmEmailResponse>),
            example = json!({
                "success": true,
                "data": {
                    "message": "Email verified successfully",
                    "nickname": "jane_doe",
                    "verified_at": "2026-01-01T12:00:00Z",
                    "session": {
                        "token": "eyJhbGciOiJIUzI1NiJ9...",
                        "expires_at": "2026-01-02T12:00:00Z"
                    }
                }
            })
        ),
        (
            status = 400,
            description = "Invalid verification token",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_TOKEN",
                    "message": "Invalid verification token"
                }
            })
        ),
        (
            status = 404,
            description = "Account not found",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "ACCOUNT_NOT_FOUND",
                    "message": "Account not found"
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
#[get("/api/accounts/check-email-token")]
pub async fn confirm_email_handler(
    query: web::Query<ConfirmEmailQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let use_case = &data.confirm_email_use_case;

    info!(email = %query.email, "Email confirmation attempt");

    match use_case.execute(&query.email, &query.token).await {
        Ok(output) => {
            info!(
                account_id = %output.account_id,
                nickname = %output.nickname,
                "Email confirmed"
            );

            ApiResponse::success(ConfirmEmailResponse {
                message: "Email verified successfully".to_string(),
                nickname: output.nickname,
                verified_at: output.verified_at,
                session: output.session.into(),
            })
        }

        Err(e) => map_confirm_email_error(e, &query.email),
    }
}
