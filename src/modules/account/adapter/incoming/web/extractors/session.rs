use actix_web::{dev::Payload, Error as ActixError, FromRequest, HttpRequest, HttpResponse};
use std::{
    future::{ready, Ready},
    sync::Arc,
};
use uuid::Uuid;

use crate::modules::account::application::ports::outgoing::Authenticator;
use crate::shared::api::ApiResponse;

/// The member behind a verified session token.
#[derive(Debug, Clone)]
pub struct SessionAccount {
    pub account_id: Uuid,
    pub nickname: String,
}

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

impl FromRequest for SessionAccount {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let authenticator = match req
            .app_data::<actix_web::web::Data<Arc<dyn Authenticator + Send + Sync>>>()
        {
            Some(authenticator) => authenticator,
            None => {
                return ready(Err(create_api_error(ApiResponse::internal_error())));
            }
        };

        let token = match extract_token_from_header(req) {
            Some(t) => t,
            None => {
                return ready(Err(create_api_error(ApiResponse::unauthorized(
                    "MISSING_AUTH_HEADER",
                    "Missing or invalid authorization header",
                ))));
            }
        };

        match authenticator.verify_session(&token) {
            Ok(claims) => ready(Ok(SessionAccount {
                account_id: claims.account_id,
                nickname: claims.nickname,
            })),
            Err(_) => ready(Err(create_api_error(ApiResponse::unauthorized(
                "INVALID_SESSION",
                "Invalid or expired session",
            )))),
        }
    }
}

fn extract_token_from_header(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::account::application::ports::outgoing::{
        Session, SessionClaims, SessionError,
    };
    use actix_web::{test, web};
    use chrono::Utc;

    struct StubAuthenticator {
        claims: Option<SessionClaims>,
    }

    impl Authenticator for StubAuthenticator {
        fn establish_session(
            &self,
            _account_id: Uuid,
            nickname: &str,
        ) -> Result<Session, SessionError> {
            Ok(Session {
                token: "token".to_string(),
                principal: nickname.to_string(),
                expires_at: Utc::now(),
            })
        }

        fn verify_session(&self, _token: &str) -> Result<SessionClaims, SessionError> {
            self.claims.clone().ok_or(SessionError::InvalidSession)
        }
    }

    fn authenticator_data(claims: Option<SessionClaims>) -> web::Data<Arc<dyn Authenticator + Send + Sync>> {
        let authenticator: Arc<dyn Authenticator + Send + Sync> =
            Arc::new(StubAuthenticator { claims });
        web::Data::new(authenticator)
    }

    #[actix_web::test]
    async fn extracts_account_from_valid_session() {
        let account_id = Uuid::new_v4();
        let req = test::TestRequest::default()
            .app_data(authenticator_data(Some(SessionClaims {
                account_id,
                nickname: "member".to_string(),
            })))
            .insert_header(("Authorization", "Bearer some-token"))
            .to_http_request();

        let result = SessionAccount::from_request(&req, &mut Payload::None)
            .await
            .expect("extraction should succeed");

        assert_eq!(result.account_id, account_id);
        assert_eq!(result.nickname, "member");
    }

    #[actix_web::test]
    async fn rejects_missing_header() {
        let req = test::TestRequest::default()
            .app_data(authenticator_data(Some(SessionClaims {
                account_id: Uuid::new_v4(),
                nickname: "member".to_string(),
            })))
            .to_http_request();

        let result = SessionAccount::from_request(&req, &mut Payload::None).await;

        assert!(result.is_err());
    }

    #[actix_web::test]
    async fn rejects_invalid_session() {
        let req = test::TestRequest::default()
            .app_data(authenticator_data(None))
            .insert_header(("Authorization", "Bearer expired"))
            .to_http_request();

        let result = SessionAccount::from_request(&req, &mut Payload::None).await;

        assert!(result.is_err());
    }

    #[actix_web::test]
    async fn rejects_non_bearer_scheme() {
        let req = test::TestRequest::default()
            .app_data(authenticator_data(Some(SessionClaims {
                account_id: Uuid::new_v4(),
                nickname: "member".to_string(),
            })))
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();

        let result = SessionAccount::from_request(&req, &mut Payload::None).await;

        assert!(result.is_err());
    }
}
