use crate::api::schemas::{ErrorDetail, ErrorResponse, SuccessResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::modules::account::adapter::incoming::web::routes::{
    ConfirmEmailResponse, LoginBody, LoginResponse, ResendVerificationResponse, SessionDto,
    SignUpBody, SignUpResponse, SignedUpAccount,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StudyHub Membership API",
        version = "1.0.0",
        description = "API documentation for StudyHub membership and accounts",
        contact(
            name = "API Support",
            email = "support@example.com"
        )
    ),
    paths(
        crate::modules::account::adapter::incoming::web::routes::sign_up_handler,
        crate::modules::account::adapter::incoming::web::routes::confirm_email_handler,
        crate::modules::account::adapter::incoming::web::routes::resend_verification_handler,
        crate::modules::account::adapter::incoming::web::routes::login_handler,
    ),
    components(
        schemas(
            // Response wrappers
            SuccessResponse<SignUpResponse>,
            ErrorResponse,
            ErrorDetail,

            // Account DTOs
            SignUpBody,
            SignUpResponse,
            SignedUpAccount,
            SessionDto,
            ConfirmEmailResponse,
            ResendVerificationResponse,
            LoginBody,
            LoginResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "accounts", description = "Membership and account endpoints"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your session token"))
                        .build(),
                ),
            )
        }
    }
}
