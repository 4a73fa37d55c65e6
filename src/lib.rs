pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod meetings;
pub mod users;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

pub use auth::{AuthContext, AuthGate};
pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

use db::{MeetingStore, PgStore, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub gate: Arc<AuthGate>,
    pub users: Arc<dyn UserStore>,
    pub meetings: Arc<dyn MeetingStore>,
}

impl AppState {
    /// Production state: Postgres-backed stores.
    pub async fn new(config: Settings) -> Result<Self> {
        let store = Arc::new(PgStore::connect(&config.database).await?);
        Self::with_stores(config, store.clone(), store)
    }

    /// Builds the state around caller-supplied stores; the integration tests
    /// use this with `MemoryStore`. Fails when the gate cannot be built, so
    /// a misconfigured secret aborts startup instead of failing per request.
    pub fn with_stores(
        config: Settings,
        users: Arc<dyn UserStore>,
        meetings: Arc<dyn MeetingStore>,
    ) -> Result<Self> {
        let gate = Arc::new(AuthGate::from_settings(&config)?);
        Ok(Self {
            config: Arc::new(config),
            gate,
            users,
            meetings,
        })
    }
}

/// Mounts every route of the API. Shared between `main` and the test
/// harness so both always serve the same surface.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/user")
                .route("/login", web::post().to(auth::handlers::login))
                .route("/register", web::post().to(auth::handlers::register))
                .route("/admin-register", web::post().to(auth::handlers::admin_register))
                .route("/", web::get().to(users::handlers::index))
                .route("/view/{id}", web::get().to(users::handlers::view))
                .route("/edit/{id}", web::put().to(users::handlers::edit))
                .route("/delete/{id}", web::delete().to(users::handlers::delete_one))
                .route("/delete-many", web::post().to(users::handlers::delete_many))
                .route("/change-role/{id}", web::put().to(users::handlers::change_role)),
        )
        .service(
            web::scope("/api/meeting")
                .route("/add", web::post().to(meetings::handlers::add))
                .route("/", web::get().to(meetings::handlers::index))
                .route("/view/{id}", web::get().to(meetings::handlers::view))
                .route("/edit/{id}", web::put().to(meetings::handlers::edit))
                .route("/delete/{id}", web::delete().to(meetings::handlers::delete_one))
                .route("/delete-many", web::post().to(meetings::handlers::delete_many)),
        );
}
