use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::account::application::orchestrator::sign_up_flow::SignUpFlowError;
use crate::modules::account::application::ports::outgoing::Session;
use crate::modules::account::application::use_cases::sign_up::{SignUpError, SignUpRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Request body for account sign-up. Documentation shape only; the handler
/// validates the incoming JSON while parsing it.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SignUpBody {
    /// Email address (stored lowercased)
    #[schema(example = "jane@example.com")]
    pub email: String,

    /// Nickname, 3-20 characters of a-z, 0-9, '-' or '_'
    #[schema(example = "jane_doe")]
    pub nickname: String,

    /// Password, 8-50 characters
    #[schema(example = "SecurePass123")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct SignUpResponse {
    /// Success message
    #[schema(example = "Account created. Please check your email to verify your address.")]
    message: String,

    /// Created account details
    account: SignedUpAccount,

    /// Session established for the new account
    session: SessionDto,
}

#[derive(Serialize, ToSchema)]
pub struct SignedUpAccount {
    /// Account ID (UUID)
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    id: String,

    /// Email address
    #[schema(example = "jane@example.com")]
    email: String,

    /// Nickname, acting as the session principal
    #[schema(example = "jane_doe")]
    nickname: String,
}

/// Session token handed out by sign-up, confirmation and login.
#[derive(Serialize, ToSchema)]
pub struct SessionDto {
    /// Bearer token for the Authorization header
    token: String,

    /// When the session expires
    expires_at: DateTime<Utc>,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

fn map_sign_up_error(err: SignUpError, email: &str, nickname: &str) -> HttpResponse {
    match &err {
        SignUpError::AlreadyInUse {
            email_taken,
            nickname_taken,
        } => {
            warn!(
                email = %email,
                nickname = %nickname,
                email_taken = email_taken,
                nickname_taken = nickname_taken,
                "Sign-up rejected: identifier already in use"
            );

            let mut fields = serde_json::Map::new();
            if *email_taken {
                fields.insert(
                    "email".to_string(),
                    serde_json::Value::String("Email is already in use".to_string()),
                );
            }
            if *nickname_taken {
                fields.insert(
                    "nickname".to_string(),
                    serde_json::Value::String("Nickname is already in use".to_string()),
                );
            }

            ApiResponse::conflict_with_fields(
                "ALREADY_IN_USE",
                "Email or nickname already in use",
                serde_json::Value::Object(fields),
            )
        }

        other => {
            error!(
                email = %email,
                nickname = %nickname,
                error = %other,
                "Unhandled sign-up error"
            );
            ApiResponse::internal_error()
        }
    }
}

/// Sign up a new member
///
/// Creates an account, sends a verification email in the background and
/// returns a live session. Conflicting email and nickname are both reported
/// in a single response.
#[utoipa::path(
    post,
    path = "/api/accounts/sign-up",
    tag = "accounts",
    request_body = SignUpBody,
    responses(
        (
            status = 201,
            description = "Account created",
            body = inline(SuccessResponse<SignUpResponse>),
            example = json!({
                "success": true,
                "data": {
                    "message": "Account created. Please check your email to verify your address.",
                    "account": {
                        "id": "123e4567-e89b-12d3-a456-426614174000",
                        "email": "jane@example.com",
                        "nickname": "jane_doe"
                    },
                    "session": {
                        "token": "eyJhbGciOiJIUzI1NiJ9...",
                        "expires_at": "2026-01-01T12:00:00Z"
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
                    "message": "Nickname must be 3-20 characters of a-z, 0-9, '-' or '_'"
                }
            })
        ),
        (
            status = 409,
            description = "Email or nickname already in use",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "ALREADY_IN_USE",
                    "message": "Email or nickname already in use",
                    "fields": {
                        "email": "Email is already in use",
                        "nickname": "Nickname is already in use"
                    }
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
#[post("/api/accounts/sign-up")]
pub async fn sign_up_handler(
    req: web::Json<SignUpRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let orchestrator = &data.sign_up_orchestrator;

    let email = req.email().to_string();
    let nickname = req.nickname().to_string();

    info!(email = %email, nickname = %nickname, "Sign-up attempt");

    match orchestrator.register(req.into_inner()).await {
        Ok(output) => {
            info!(
                account_id = %output.account_id,
                nickname = %output.nickname,
                "Account created"
            );

            ApiResponse::created(SignUpResponse {
                message: output.message,
                account: SignedUpAccount {
                    id: output.account_id.to_string(),
                    email: output.email,
                    nickname: output.nickname,
                },
                session: output.session.into(),
            })
        }

        Err(SignUpFlowError::SignUpFailed(e)) => map_sign_up_error(e, &email, &nickname),

        Err(e) => {
            error!(email = %email, nickname = %nickname, error = %e, "Sign-up failed");
            ApiResponse::internal_error()
        }
    }
}
