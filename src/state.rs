use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use staybook_config::{
    BookingCleanupConfig, CorsConfig, ImageProcessingConfig, JwtConfig, MediaStorageConfig,
};
use staybook_db::{
    AuthenticationRepository, BookingRepository, PgAuthenticationRepository, PgBookingRepository,
    init_db_pool, run_migrations,
};
use staybook_media::{FileStorage, ImageNormalizer, LocalFileStorage, RasterOptimizer};

#[derive(Clone)]
pub struct AppState {
    pub auth_repository: Arc<dyn AuthenticationRepository>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub cleanup_config: BookingCleanupConfig,
    pub media_config: MediaStorageConfig,
    pub image_normalizer: ImageNormalizer,
    pub storage: Arc<dyn FileStorage>,
    pub metrics_handle: Option<PrometheusHandle>,
}

pub async fn init_app_state(metrics_handle: Option<PrometheusHandle>) -> AppState {
    let pool = init_db_pool().await;

    if let Err(e) = run_migrations(&pool).await {
        tracing::warn!(error = %e, "Failed to apply database migrations");
    }

    let media_config = MediaStorageConfig::from_env();

    AppState {
        auth_repository: Arc::new(PgAuthenticationRepository::new(pool.clone())),
        booking_repository: Arc::new(PgBookingRepository::new(pool)),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        cleanup_config: BookingCleanupConfig::from_env(),
        image_normalizer: ImageNormalizer::new(
            Arc::new(RasterOptimizer),
            ImageProcessingConfig::from_env(),
        ),
        storage: Arc::new(LocalFileStorage::from_config(&media_config)),
        media_config,
        metrics_handle,
    }
}
