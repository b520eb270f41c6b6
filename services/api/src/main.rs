use std::sync::Arc;

use anyhow::Result;
use aws_config::BehaviorVersion;
use tracing::info;

mod consumer;
mod error;
mod jwt;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod state;
mod transfer;
mod validation;

use common::database::{DatabaseConfig, init_pool};
use gateway::SocketRegistry;
use queue::{JobConsumer, JobProducer, QueueConfig};
use storage::{ObjectStorage, StorageConfig};
use tokio::net::TcpListener;

use crate::consumer::CompletionConsumer;
use crate::jwt::{JwtConfig, JwtService};
use crate::repositories::{
    UserRepository, media::MediaRepository, notification::NotificationRepository,
    style::StyleRepository,
};
use crate::state::AppState;
use crate::transfer::{TokenRegistry, TransferConfig, TransferCoordinator};

/// Server binding configuration
#[derive(Debug, Clone)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        Self { host, port }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting artisan API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(common::error::DatabaseError::Migration)?;
    info!("Database migrations applied");

    // AWS clients share one resolved configuration
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);
    let sqs_client = aws_sdk_sqs::Client::new(&aws_config);

    let storage_config = StorageConfig::from_env();
    let storage = ObjectStorage::new(s3_client, &storage_config);

    let queue_config = QueueConfig::from_env();
    let producer = JobProducer::new(sqs_client.clone(), &queue_config);
    let completion_consumer = JobConsumer::new(sqs_client, &queue_config);

    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    let hash_secret = std::env::var("PASSWORD_HASH_SECRET")
        .map_err(|_| anyhow::anyhow!("PASSWORD_HASH_SECRET environment variable not set"))?;

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone(), hash_secret);
    let media_repository = MediaRepository::new(pool.clone());
    let style_repository = StyleRepository::new(pool.clone());
    let notification_repository = NotificationRepository::new(pool.clone());

    let socket_registry = SocketRegistry::new();
    let transfer_config = TransferConfig::from_env();
    let tokens = Arc::new(TokenRegistry::new(transfer_config.token_ttl));

    let coordinator = TransferCoordinator::new(
        media_repository.clone(),
        style_repository.clone(),
        notification_repository.clone(),
        storage.clone(),
        producer.clone(),
        socket_registry.clone(),
        tokens,
    );

    // Queue-reported completions feed the same coordinator as the
    // HTTP callbacks.
    tokio::spawn(CompletionConsumer::new(completion_consumer, coordinator.clone()).run());

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        media_repository,
        style_repository,
        notification_repository,
        storage,
        producer,
        socket_registry,
        jwt_service,
        coordinator,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env();
    let address = format!("{}:{}", server_config.host, server_config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
