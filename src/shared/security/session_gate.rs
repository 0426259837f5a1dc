// src/shared/security/session_gate.rs
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;

use crate::modules::account::application::ports::outgoing::Authenticator;
use crate::shared::api::ApiResponse;
use crate::shared::security::access_policy::AccessPolicy;

/// Middleware enforcing the access policy: requests to non-public paths must
/// carry a valid session token in the Authorization header.
pub struct SessionGate {
    policy: AccessPolicy,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
}

impl SessionGate {
    pub fn new(authenticator: Arc<dyn Authenticator + Send + Sync>) -> Self {
        Self {
            policy: AccessPolicy::default(),
            authenticator,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware {
            service: Rc::new(service),
            policy: self.policy.clone(),
            authenticator: self.authenticator.clone(),
        }))
    }
}

pub struct SessionGateMiddleware<S> {
    service: Rc<S>,
    policy: AccessPolicy,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.policy.is_public(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) });
        }

        let token = match bearer_token(&req) {
            Some(t) => t,
            None => {
                tracing::debug!(path = %req.path(), "Rejected request without session token");
                let response = ApiResponse::unauthorized(
                    "MISSING_AUTH_HEADER",
                    "Missing or invalid authorization header",
                );
                return Box::pin(async move {
                    Ok(req.into_response(response).map_into_right_body())
                });
            }
        };

        match self.authenticator.verify_session(&token) {
            Ok(_claims) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
            }
            Err(e) => {
                tracing::debug!(path = %req.path(), "Rejected invalid session: {}", e);
                let response =
                    ApiResponse::unauthorized("INVALID_SESSION", "Invalid or expired session");
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::account::application::ports::outgoing::{
        Session, SessionClaims, SessionError,
    };
    use actix_web::{get, test, App, HttpResponse, Responder};
    use chrono::Utc;
    use uuid::Uuid;

    struct FixedTokenAuthenticator;

    impl Authenticator for FixedTokenAuthenticator {
        fn establish_session(
            &self,
            _account_id: Uuid,
            nickname: &str,
        ) -> Result<Session, SessionError> {
            Ok(Session {
                token: "accepted".to_string(),
                principal: nickname.to_string(),
                expires_at: Utc::now() + chrono::Duration::hours(1),
            })
        }

        fn verify_session(&self, token: &str) -> Result<SessionClaims, SessionError> {
            if token == "accepted" {
                Ok(SessionClaims {
                    account_id: Uuid::new_v4(),
                    nickname: "member".to_string(),
                })
            } else {
                Err(SessionError::InvalidSession)
            }
        }
    }

    #[get("/health")]
    async fn public_probe() -> impl Responder {
        HttpResponse::Ok().body("ok")
    }

    #[get("/api/accounts/me")]
    async fn protected_route() -> impl Responder {
        HttpResponse::Ok().body("secret")
    }

    fn gate() -> SessionGate {
        SessionGate::new(Arc::new(FixedTokenAuthenticator))
    }

    #[actix_web::test]
    async fn public_path_passes_without_token() {
        let app = test::init_service(App::new().wrap(gate()).service(public_probe)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn protected_path_without_token_is_unauthorized() {
        let app = test::init_service(App::new().wrap(gate()).service(protected_route)).await;

        let req = test::TestRequest::get().uri("/api/accounts/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "MISSING_AUTH_HEADER");
    }

    #[actix_web::test]
    async fn protected_path_with_invalid_token_is_unauthorized() {
        let app = test::init_service(App::new().wrap(gate()).service(protected_route)).await;

        let req = test::TestRequest::get()
            .uri("/api/accounts/me")
            .insert_header(("Authorization", "Bearer forged"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_SESSION");
    }

    #[actix_web::test]
    async fn protected_path_with_valid_token_passes() {
        let app = test::init_service(App::new().wrap(gate()).service(protected_route)).await;

        let req = test::TestRequest::get()
            .uri("/api/accounts/me")
            .insert_header(("Authorization", "Bearer accepted"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
    }
}
