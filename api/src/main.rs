use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use log::{info, warn};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use mg_core::services::rate_limit::RateLimiterTrait;
use mg_core::services::verification::{
    CleanupConfig, CleanupService, VerificationService, VerificationServiceConfig,
};
use mg_infra::{InMemoryRateLimiter, MySqlVerificationRepository, RedisRateLimiter, SmtpCodeSender};
use mg_shared::config::AppConfig;

use mg_api::app::{configure_app, not_found};
use mg_api::middleware::{cors::create_cors, rate_limit::RateLimiter};
use mg_api::routes::verification::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting MailGuard API Server");

    let config = AppConfig::from_env();

    // Database pool for the verification record store
    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let repository = Arc::new(MySqlVerificationRepository::new(pool));

    // SMTP relay for code delivery
    let sender = Arc::new(
        SmtpCodeSender::new(&config.smtp)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
    );

    let verification_service = Arc::new(VerificationService::new(
        repository.clone(),
        sender,
        VerificationServiceConfig::from(&config.verification),
    ));

    // Out-of-band sweep for consumed and expired records
    let cleanup = Arc::new(CleanupService::new(
        repository.clone(),
        CleanupConfig::default(),
    ));
    cleanup.start_background_task();

    // Counter store for per-IP throttling: Redis when configured, an
    // in-process map otherwise
    let limiter: Arc<dyn RateLimiterTrait> = match std::env::var("REDIS_URL") {
        Ok(url) => {
            info!("Using Redis rate limiting backend");
            Arc::new(
                RedisRateLimiter::new(&url)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
            )
        }
        Err(_) => {
            warn!("REDIS_URL not set; using in-memory rate limiting (single instance only)");
            Arc::new(InMemoryRateLimiter::new())
        }
    };

    let state = web::Data::new(AppState {
        verification_service,
    });

    let rate_limit_config = config.rate_limit.clone();
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(RateLimiter::new(limiter.clone(), rate_limit_config.clone()))
            .configure(configure_app::<MySqlVerificationRepository, SmtpCodeSender>)
            .default_service(web::route().to(not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}
