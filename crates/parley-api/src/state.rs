//! Application state wiring all services together.
//!
//! Services are generic over their ports; AppState pins them to the
//! concrete infra implementations.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use parley_core::chat::service::ChatService;
use parley_core::identity::service::IdentityService;
use parley_infra::config::AppConfig;
use parley_infra::crypto::password::Argon2PasswordHasher;
use parley_infra::crypto::token::HmacTokenIssuer;
use parley_infra::llm::gemini::GeminiGateway;
use parley_infra::sqlite::chat::SqliteChatRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_infra::sqlite::user::SqliteUserRepository;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository, GeminiGateway>;

pub type ConcreteIdentityService =
    IdentityService<SqliteUserRepository, Argon2PasswordHasher, HmacTokenIssuer>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub identity_service: Arc<ConcreteIdentityService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connect to the database (running migrations) and wire services.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url).await?;
        Self::with_pool(config, db_pool)
    }

    /// Wire services on top of an already open pool.
    pub fn with_pool(config: AppConfig, db_pool: DatabasePool) -> anyhow::Result<Self> {
        let gateway = GeminiGateway::new(
            SecretString::from(config.gemini_api_key.expose_secret()),
            config.gemini_model.clone(),
            config.gateway_timeout,
        )?
        .with_base_url(config.gemini_base_url.clone());

        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()), gateway);

        let tokens = HmacTokenIssuer::new(SecretString::from(config.jwt_secret.expose_secret()))
            .with_ttl(config.token_ttl_secs);
        let identity_service = IdentityService::new(
            SqliteUserRepository::new(db_pool),
            Argon2PasswordHasher::new(),
            tokens,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            identity_service: Arc::new(identity_service),
            config: Arc::new(config),
        })
    }
}
