pub mod modules;
pub use modules::account;
pub use modules::email;
pub mod api;
pub mod health;
pub mod shared;

use crate::account::adapter::outgoing::security::Argon2Hasher;
use crate::account::adapter::outgoing::session::{JwtAuthenticator, SessionConfig};
use crate::account::adapter::outgoing::{AccountQueryPostgres, AccountRepositoryPostgres};
use crate::account::application::orchestrator::sign_up_flow::SignUpOrchestrator;
use crate::account::application::ports::outgoing::Authenticator;
use crate::account::application::use_cases::{
    confirm_email::{ConfirmEmailUseCase, IConfirmEmailUseCase},
    login::{ILoginUseCase, LoginUseCase},
    resend_verification::{IResendVerificationUseCase, ResendVerificationUseCase},
    sign_up::{ISignUpUseCase, SignUpUseCase},
};
use crate::email::adapter::outgoing::SmtpEmailSender;
use crate::email::application::services::VerificationMailer;
use crate::modules::email::application::ports::outgoing::VerificationNotifier;
use crate::shared::api::json_config::custom_json_config;
use crate::shared::security::SessionGate;

use actix_web::{web, App, HttpServer};
use sea_orm::{ConnectOptions, Database};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub sign_up_orchestrator: Arc<SignUpOrchestrator>,
    pub confirm_email_use_case: Arc<dyn IConfirmEmailUseCase + Send + Sync>,
    pub resend_verification_use_case: Arc<dyn IResendVerificationUseCase + Send + Sync>,
    pub login_use_case: Arc<dyn ILoginUseCase + Send + Sync>,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    // Environment variable loading
    let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());

    // Try .env.{environment} first, then fall back to .env
    let env_file = format!(".env.{}", env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
    let host = env::var("HOST").expect("HOST is not set in .env file");
    let port = env::var("PORT").expect("PORT is not set in .env file");

    // SMTP SETUP
    let from_email = std::env::var("EMAIL_FROM").expect("EMAIL_FROM not set");
    let smtp_sender = if std::env::var("RUST_ENV").as_deref() == Ok("test") {
        // Local Mailpit
        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .expect("Invalid SMTP_PORT");

        SmtpEmailSender::new_local(&host, port, &from_email)
    } else {
        // Production SMTP
        let smtp_server = std::env::var("SMTP_SERVER").expect("SMTP_SERVER not set");
        let smtp_user = std::env::var("SMTP_USERNAME").expect("SMTP_USERNAME not set");
        let smtp_pass = std::env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD not set");

        SmtpEmailSender::new(&smtp_server, &smtp_user, &smtp_pass, &from_email)
    };

    let server_url = format!("{host}:{port}");
    println!("Server run on: {}", server_url);

    // Verification links in emails point at this address
    let app_url = env::var("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}", server_url));

    // Database connection
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    let db_arc = Arc::new(conn);

    // Outgoing adapters
    let account_query = AccountQueryPostgres::new(Arc::clone(&db_arc));
    let account_repo = AccountRepositoryPostgres::new(Arc::clone(&db_arc));
    let password_hasher = Argon2Hasher::from_env();

    let authenticator_arc: Arc<dyn Authenticator + Send + Sync> =
        Arc::new(JwtAuthenticator::new(SessionConfig::from_env()));

    let verification_mailer = VerificationMailer::new(Arc::new(smtp_sender), app_url);
    let notifier_arc: Arc<dyn VerificationNotifier + Send + Sync> = Arc::new(verification_mailer);

    // Use cases
    let sign_up_use_case = SignUpUseCase::new(
        account_query.clone(),
        account_repo.clone(),
        password_hasher.clone(),
    );
    let sign_up_uc_arc: Arc<dyn ISignUpUseCase + Send + Sync> = Arc::new(sign_up_use_case);

    let sign_up_orchestrator = SignUpOrchestrator::new(
        sign_up_uc_arc,
        Arc::clone(&notifier_arc),
        Arc::clone(&authenticator_arc),
    );

    let confirm_email_use_case = ConfirmEmailUseCase::new(
        account_query.clone(),
        account_repo.clone(),
        Arc::clone(&authenticator_arc),
    );

    let resend_verification_use_case = ResendVerificationUseCase::new(
        account_query.clone(),
        account_repo,
        Arc::clone(&notifier_arc),
    );

    let login_use_case = LoginUseCase::new(
        account_query,
        password_hasher,
        Arc::clone(&authenticator_arc),
    );

    let state = AppState {
        sign_up_orchestrator: Arc::new(sign_up_orchestrator),
        confirm_email_use_case: Arc::new(confirm_email_use_case),
        resend_verification_use_case: Arc::new(resend_verification_use_case),
        login_use_case: Arc::new(login_use_case),
    };

    // Clone for use in HttpServer closure
    let db_for_server = Arc::clone(&db_arc);
    let authenticator_for_server = Arc::clone(&authenticator_arc);

    HttpServer::new(move || {
        App::new()
            .wrap(SessionGate::new(Arc::clone(&authenticator_for_server)))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&authenticator_for_server)))
            .app_data(web::Data::new(Arc::clone(&db_for_server)))
            .app_data(custom_json_config())
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Accounts
    cfg.service(crate::account::adapter::incoming::web::routes::sign_up_handler);
    cfg.service(crate::account::adapter::incoming::web::routes::confirm_email_handler);
    cfg.service(crate::account::adapter::incoming::web::routes::resend_verification_handler);
    cfg.service(crate::account::adapter::incoming::web::routes::login_handler);
    // API docs
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
            .url("/api-docs/openapi.json", crate::api::openapi::ApiDoc::openapi()),
    );
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
