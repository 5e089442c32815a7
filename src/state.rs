use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use bookstore_auth::{AuditSink, TokenIssuer, TracingAuditSink};
use bookstore_config::{CorsConfig, DatabaseConfig, JwtConfig, PasswordConfig};
use bookstore_core::PasswordHasher;
use bookstore_db::{
    BookRepository, InMemoryRepository, OrderRepository, PgRepository, UserRepository,
    init_db_pool, run_migrations,
};
use tracing::{info, warn};

use crate::modules::auth::service::AuthService;
use crate::modules::books::service::BookService;
use crate::modules::orders::service::OrderService;

/// The persistence gateway, split by record type.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    /// Serves all three record types from one store.
    pub fn from_store<R>(store: R) -> Self
    where
        R: UserRepository + BookRepository + OrderRepository + Clone + 'static,
    {
        Self {
            users: Arc::new(store.clone()),
            books: Arc::new(store.clone()),
            orders: Arc::new(store),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub books: BookService,
    pub orders: OrderService,
    pub tokens: Arc<TokenIssuer>,
    pub audit: Arc<dyn AuditSink>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
        audit: Arc<dyn AuditSink>,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            auth: AuthService::new(repositories.users, hasher, audit.clone()),
            books: BookService::new(repositories.books),
            orders: OrderService::new(repositories.orders),
            tokens: Arc::new(tokens),
            audit,
            cors_config,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("audit", &self.audit)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

/// Builds application state from the environment.
///
/// Connects to PostgreSQL when `DATABASE_URL` is set (running migrations
/// unless `RUN_MIGRATIONS` is off); otherwise falls back to the in-memory
/// store.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database_config = DatabaseConfig::from_env();
    let jwt_config = JwtConfig::from_env()?;
    let password_config = PasswordConfig::from_env();
    let cors_config = CorsConfig::from_env();

    let repositories = match database_config.url.as_deref() {
        Some(url) => {
            let pool = init_db_pool(url, database_config.max_connections)
                .await
                .context("Failed to connect to database")?;

            if database_config.run_migrations {
                run_migrations(&pool)
                    .await
                    .context("Failed to run database migrations")?;
                info!("Database migrations applied");
            }

            Repositories::from_store(PgRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set, using the in-memory store (data is lost on restart)");
            Repositories::from_store(InMemoryRepository::new())
        }
    };

    let hasher = PasswordHasher::new(password_config.bcrypt_cost)
        .map_err(|e| e.error.context("Invalid BCRYPT_COST"))?;

    info!(
        algorithm = ?jwt_config.algorithm,
        token_expiry = jwt_config.token_expiry,
        bcrypt_cost = hasher.cost(),
        "Auth configured"
    );

    Ok(AppState::new(
        repositories,
        hasher,
        TokenIssuer::new(&jwt_config),
        Arc::new(TracingAuditSink),
        cors_config,
    ))
}
