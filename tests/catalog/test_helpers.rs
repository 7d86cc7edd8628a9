//! Shared helpers for catalog integration tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use agency_catalog_lib::api;
use agency_catalog_lib::auth::AdminKey;
use agency_catalog_lib::config::{
    ApiSettings, Config, DatabaseSettings, Environment, MailSettings, MailTransportKind,
    StorageSettings,
};
use agency_catalog_lib::db::DbPool;
use agency_catalog_lib::entity::{option, property};
use agency_catalog_lib::models::PropertyForm;
use agency_catalog_lib::services::Storage;
use agency_catalog_lib::services::notification::{MailMessage, Notifier};
use rust_decimal::Decimal;
use std::sync::Mutex;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key-for-catalog";

/// Recipient of contact requests in tests.
pub const TEST_RECIPIENT: &str = "john@admin.fr";

/// Everything a test app needs, plus the receiving end of the mail queue.
pub struct TestContext {
    pub pool: DbPool,
    pub storage: Storage,
    pub notifier: Notifier,
    queue: Mutex<mpsc::Receiver<MailMessage>>,
    pub config: Config,
    _storage_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_api(ApiSettings::default()).await
    }

    /// Context whose JSON resource exposes the given settings.
    pub async fn with_api(api: ApiSettings) -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = Config {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 0,
            database: DatabaseSettings {
                url: "sqlite::memory:".to_string(),
                // One connection, so every query sees the same in-memory database
                max_connections: 1,
                min_connections: 1,
            },
            admin_key: Some(TEST_ADMIN_KEY.to_string()),
            storage: StorageSettings {
                root: storage_dir.path().to_path_buf(),
                public_url: "/storage".to_string(),
                max_upload_size: 1024 * 1024,
            },
            mail: MailSettings {
                contact_recipient: TEST_RECIPIENT.to_string(),
                from: "noreply@agence.local".to_string(),
                transport: MailTransportKind::Log,
                queue_capacity: 8,
            },
            api,
        };

        let pool = DbPool::new(&config.database)
            .await
            .expect("Failed to connect to database");
        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        let storage = Storage::new(&config.storage)
            .await
            .expect("Failed to create storage");
        let (notifier, queue) = Notifier::new(&config.mail);

        Self {
            pool,
            storage,
            notifier,
            queue: Mutex::new(queue),
            config,
            _storage_dir: storage_dir,
        }
    }

    /// Drain the mail queue.
    pub fn queued(&self) -> Vec<MailMessage> {
        let mut queue = self.queue.lock().unwrap();
        let mut messages = Vec::new();
        while let Ok(message) = queue.try_recv() {
            messages.push(message);
        }
        messages
    }
}

/// Create a test app wired like the server.
pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::new(ctx.storage.clone()))
            .app_data(web::Data::new(ctx.notifier.clone()))
            .app_data(web::Data::new(AdminKey::new(Some(TEST_ADMIN_KEY.to_string()))))
            .app_data(web::Data::new(ctx.config.clone()))
            .configure(api::configure_routes),
    )
    .await
}

/// Insert a property directly through the store.
pub async fn seed_property(
    ctx: &TestContext,
    title: &str,
    price: f64,
    surface: f64,
    rooms: i32,
) -> property::Model {
    let form = PropertyForm {
        title: title.to_string(),
        price: Decimal::try_from(price).expect("Invalid price"),
        surface: Decimal::try_from(surface).expect("Invalid surface"),
        rooms,
        ..Default::default()
    };
    ctx.pool
        .insert_property(&form)
        .await
        .expect("Failed to seed property")
}

/// Insert a property attached to the given options.
pub async fn seed_property_with_options(
    ctx: &TestContext,
    title: &str,
    options: Vec<i32>,
) -> property::Model {
    let form = PropertyForm {
        title: title.to_string(),
        price: Decimal::from(150_000),
        options,
        ..Default::default()
    };
    ctx.pool
        .insert_property(&form)
        .await
        .expect("Failed to seed property")
}

pub async fn seed_option(ctx: &TestContext, name: &str) -> option::Model {
    ctx.pool
        .insert_option(name)
        .await
        .expect("Failed to seed option")
}

/// Multipart body with one file part per `(filename, bytes)`.
pub fn multipart_body(files: &[(&str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----catalog-test-boundary";
    let mut body = Vec::new();
    for (filename, data) in files {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"pictures\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (format!("multipart/form-data; boundary={}", boundary), body)
}
