//! Agency catalog server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use agency_catalog_lib::api::{self, ApiDoc};
use agency_catalog_lib::auth::AdminKey;
use agency_catalog_lib::config::{ADMIN_KEY_HEADER, Config};
use agency_catalog_lib::db::DbPool;
use agency_catalog_lib::middleware::RequestLogger;
use agency_catalog_lib::services::notification::build_transport;
use agency_catalog_lib::services::{Notifier, Storage, start_delivery_worker};

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::other(format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| std::io::Error::other(format!("Failed to set tracing subscriber: {}", e)))?;

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and AGENCY_ADMIN_KEY must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Agency Catalog Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL and AGENCY_ADMIN_KEY");
    }

    let pool = DbPool::new(&config.database)
        .await
        .map_err(|e| startup_error("Failed to initialize database", e))?;
    pool.run_migrations()
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;
    info!("Database migrations complete");

    let storage = Storage::new(&config.storage)
        .await
        .map_err(|e| startup_error("Failed to initialize picture storage", e))?;

    // Notification queue and its delivery worker
    let (notifier, queue) = Notifier::new(&config.mail);
    start_delivery_worker(queue, build_transport(&config.mail.transport));
    info!(
        "Contact requests go to {} (queue capacity {})",
        config.mail.contact_recipient, config.mail.queue_capacity
    );

    if config.admin_key.is_none() {
        warn!("AGENCY_ADMIN_KEY is not set - back-office routes will reject every request");
    }

    // Prepare shared state
    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let admin_key = web::Data::new(AdminKey::new(config.admin_key.clone()));
    let storage_root = config.storage.root.clone();
    let storage_url = config.storage.public_url.clone();
    let pool = web::Data::new(pool);
    let storage = web::Data::new(storage);
    let notifier = web::Data::new(notifier);
    let config = web::Data::new(config);
    let openapi = ApiDoc::openapi();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        let allowed_headers = vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-admin-key"),
        ];

        let cors = if is_development {
            // Front-end dev server
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(pool.clone())
            .app_data(storage.clone())
            .app_data(notifier.clone())
            .app_data(admin_key.clone())
            .app_data(config.clone())
            .service(Files::new(&storage_url, &storage_root).prefer_utf8(true))
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
            .configure(api::configure_routes)
    });

    info!("Admin requests authenticate with the {} header", ADMIN_KEY_HEADER);

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
