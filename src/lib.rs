use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod api;
pub mod certificate;
pub mod common;
pub mod config;
pub mod directory;
pub mod metrics;
pub mod store;

pub use crate::api::AppState;

use crate::certificate::render::TypstRenderEngine;
use crate::certificate::{DocumentRenderer, RenderOptions, SessionOptions, SystemClock};
use crate::certificate::ValidationError;
use crate::config::AppConfig;
use crate::directory::PgDirectory;
use crate::store::PgCertificateStore;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
    /// Field-level problems, present on validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<ValidationError>) -> Self {
        self.details = details;
        self
    }
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(900))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to connect to database. Please check DATABASE_URL and ensure the database is running. Error: {}",
                e
            );
            e
        })?;

    let http_client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(900))
        .timeout(Duration::from_secs(10))
        .user_agent("barangay-certificates/0.3")
        .build()
        .context("failed to create HTTP client")?;

    let renderer = DocumentRenderer::new(
        RenderOptions::default(),
        TypstRenderEngine::new(config.typst_bin.clone()),
    );
    let session_options = SessionOptions {
        signatory_position: config.signatory_position.clone(),
        reset_on_commit: config.reset_on_commit,
        ..SessionOptions::default()
    };

    let app_state = web::Data::new(AppState::new(
        Arc::new(PgDirectory::new(pool.clone(), http_client)),
        Arc::new(PgCertificateStore::new(pool)),
        renderer,
        Arc::new(SystemClock),
        session_options,
        config.session_ttl,
    ));

    let prometheus = PrometheusMetricsBuilder::new("barangay_certificates")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!(
        "Starting server at http://{}:{} with {} templates",
        config.bind_addr,
        config.port,
        app_state.registry.len()
    );

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(api::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", api::ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
