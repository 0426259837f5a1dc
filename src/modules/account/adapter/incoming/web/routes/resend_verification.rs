use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::account::adapter::incoming::web::extractors::SessionAccount;
use crate::modules::account::application::use_cases::resend_verification::ResendVerificationError;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, HttpResponse, Responder};
use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct ResendVerificationResponse {
    /// Success message
    #[schema(example = "A new verification email is on its way")]
    message: String,

    /// Address the mail was sent to
    #[schema(example = "jane@example.com")]
    email: String,

    /// False when the mail could not be handed off. The new token is
    /// active regardless.
    delivered: bool,
}

fn map_resend_error(err: ResendVerificationError, account_id: Uuid) -> HttpResponse {
    match &err {
        ResendVerificationError::AccountNotFound => {
            warn!(account_id = %account_id, "Resend requested for unknown account");
            ApiResponse::not_found("ACCOUNT_NOT_FOUND", "Account not found")
        }

        ResendVerificationError::CooldownActive => {
            warn!(account_id = %account_id, "Resend rejected by cooldown");
            ApiResponse::too_many_requests(
                "COOLDOWN_ACTIVE",
                "A verification email was sent recently. Please wait before requesting another.",
            )
        }

        ResendVerificationError::DatabaseError(msg) => {
            error!(account_id = %account_id, "Resend failed: {}", msg);
            ApiResponse::internal_error()
        }
    }
}

/// Resend the verification email
///
/// Issues a fresh verification token for the logged-in member and emails it.
/// At most one resend per hour is allowed.
#[utoipa::path(
    post,
    path = "/api/accounts/resend-verification",
    tag = "accounts",
    security(("BearerAuth" = [])),
    responses(
        (
            status = 200,
            description = "Verification email queued",
            body = inline(SuccessResponse<ResendVerificationResponse>),
            example = json!({
                "success": true,
                "data": {
                    "message": "A new verification email is on its way",
                    "email": "jane@example.com",
                    "delivered": true
                }
            })
        ),
        (
            status = 401,
            description = "Missing or invalid session",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_SESSION",
                    "message": "Invalid or expired session"
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
            status = 429,
            description = "Resend cooldown still active",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "COOLDOWN_ACTIVE",
                    "message": "A verification email was sent recently. Please wait before requesting another."
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
#[post("/api/accounts/resend-verification")]
pub async fn resend_verification_handler(
    session: SessionAccount,
    data: web::Data<AppState>,
) -> impl Responder {
    let use_case = &data.resend_verification_use_case;

    info!(
        account_id = %session.account_id,
        nickname = %session.nickname,
        "Verification resend requested"
    );

    match use_case.execute(session.account_id).await {
        Ok(output) => {
            if !output.delivered {
                warn!(
                    account_id = %session.account_id,
                    "Resend token stored but delivery failed"
                );
            }

            let message = if output.delivered {
                "A new verification email is on its way".to_string()
            } else {
                "A new verification token was issued, but the email could not be sent. Try again later.".to_string()
            };

            ApiResponse::success(ResendVerificationResponse {
                message,
                email: output.email,
                delivered: output.delivered,
            })
        }

        Err(e) => map_resend_error(e, session.account_id),
    }
}
