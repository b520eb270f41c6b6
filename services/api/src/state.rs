//! Application state shared across handlers

use gateway::SocketRegistry;
use queue::JobProducer;
use sqlx::PgPool;
use storage::ObjectStorage;

use crate::jwt::JwtService;
use crate::repositories::{
    UserRepository, media::MediaRepository, notification::NotificationRepository,
    style::StyleRepository,
};
use crate::transfer::TransferCoordinator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub media_repository: MediaRepository,
    pub style_repository: StyleRepository,
    pub notification_repository: NotificationRepository,
    pub storage: ObjectStorage,
    pub producer: JobProducer,
    pub socket_registry: SocketRegistry,
    pub jwt_service: JwtService,
    pub coordinator: TransferCoordinator,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Result;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    use common::database::{DatabaseConfig, init_pool};
    use gateway::SocketRegistry;
    use queue::{JobProducer, QueueConfig};
    use storage::{ObjectStorage, StorageConfig};

    use crate::jwt::{JwtConfig, JwtService};
    use crate::repositories::{
        UserRepository, media::MediaRepository, notification::NotificationRepository,
        style::StyleRepository,
    };
    use crate::transfer::{TokenRegistry, TransferCoordinator};

    use super::AppState;

    /// Assemble an [`AppState`] against the database named by the
    /// environment, running migrations first.
    ///
    /// The storage and queue clients are never expected to dispatch a
    /// request; callers stay on code paths that stop before the network.
    pub(crate) async fn state() -> Result<AppState> {
        let db_config = DatabaseConfig::from_env()?;
        let pool = init_pool(&db_config).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .region(Region::new("ap-southeast-1"))
            .build();
        let storage = ObjectStorage::new(
            aws_sdk_s3::Client::from_conf(s3_config),
            &StorageConfig {
                bucket: "artisan-photos".to_string(),
                cdn_url: "https://cdn.artisan.app".to_string(),
                signed_url_expiry: 60000,
            },
        );

        let sqs_config = aws_sdk_sqs::Config::builder()
            .behavior_version(aws_sdk_sqs::config::BehaviorVersion::latest())
            .build();
        let producer = JobProducer::new(
            aws_sdk_sqs::Client::from_conf(sqs_config),
            &QueueConfig {
                base_url: "http://localhost:4566/000000000000".to_string(),
                completion_queue: "transfer-finish".to_string(),
            },
        );

        let user_repository = UserRepository::new(pool.clone(), "test-hash-secret".to_string());
        let media_repository = MediaRepository::new(pool.clone());
        let style_repository = StyleRepository::new(pool.clone());
        let notification_repository = NotificationRepository::new(pool.clone());

        let socket_registry = SocketRegistry::new();
        let jwt_service = JwtService::new(&JwtConfig {
            secret: "test-jwt-secret".to_string(),
            token_expiry: 3600,
        });

        let tokens = Arc::new(TokenRegistry::new(Duration::from_secs(3600)));
        let coordinator = TransferCoordinator::new(
            media_repository.clone(),
            style_repository.clone(),
            notification_repository.clone(),
            storage.clone(),
            producer.clone(),
            socket_registry.clone(),
            tokens,
        );

        Ok(AppState {
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
        })
    }
}
