#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use fake::Fake;
use fake::faker::internet::en::{SafeEmail, Username};
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use staybook::router::init_router;
use staybook::state::AppState;
use staybook_config::{
    BookingCleanupConfig, CorsConfig, ImageProcessingConfig, JwtConfig, MediaStorageConfig,
};
use staybook_db::{AuthenticationRepository, BookingRepository};
use staybook_media::{ImageNormalizer, LocalFileStorage, RasterOptimizer};
use staybook_models::{Role, UserRecord};

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

pub fn token_for(email: &str) -> String {
    staybook_auth::create_access_token(email, &test_jwt_config()).unwrap()
}

/// A user record with generated profile data.
pub fn fake_user(role: &str) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        email: SafeEmail().fake(),
        email_verified: true,
        username: Username().fake(),
        preferred_language: "en".to_string(),
        preferred_currency: "USD".to_string(),
        role: role.to_string(),
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<String, UserRecord>>,
    failing: bool,
    lookups: AtomicUsize,
}

impl InMemoryUsers {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, user: UserRecord) {
        self.users
            .lock()
            .unwrap()
            .insert(user.email.to_lowercase(), user);
    }

    /// Insert a generated user with a valid role and return it.
    pub fn add(&self, role: Role) -> UserRecord {
        let user = fake_user(role.as_str());
        self.insert(user.clone());
        user
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthenticationRepository for InMemoryUsers {
    async fn find_user_by_email_for_auth(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            anyhow::bail!("connection refused");
        }
        Ok(self.users.lock().unwrap().get(&email.to_lowercase()).cloned())
    }
}

/// Booking repository answering with fixed counts, or failing.
#[derive(Default)]
pub struct ScriptedBookings {
    pub pending_payments: i64,
    pub checkouts: i64,
    pub failing: bool,
    pending_calls: AtomicUsize,
    checkout_calls: AtomicUsize,
}

impl ScriptedBookings {
    pub fn with_counts(pending_payments: i64, checkouts: i64) -> Self {
        Self {
            pending_payments,
            checkouts,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn pending_calls(&self) -> usize {
        self.pending_calls.load(Ordering::SeqCst)
    }

    pub fn checkout_calls(&self) -> usize {
        self.checkout_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.pending_calls() + self.checkout_calls()
    }
}

#[async_trait]
impl BookingRepository for ScriptedBookings {
    async fn process_expired_pending_payments(&self) -> anyhow::Result<i64> {
        self.pending_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            anyhow::bail!("deadlock detected");
        }
        Ok(self.pending_payments)
    }

    async fn process_expired_checkouts(&self) -> anyhow::Result<i64> {
        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            anyhow::bail!("deadlock detected");
        }
        Ok(self.checkouts)
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUsers>,
    pub bookings: Arc<ScriptedBookings>,
    pub storage_dir: PathBuf,
}

pub struct TestAppBuilder {
    users: Arc<InMemoryUsers>,
    bookings: Arc<ScriptedBookings>,
    image_config: ImageProcessingConfig,
    cleanup_config: BookingCleanupConfig,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUsers::default()),
            bookings: Arc::new(ScriptedBookings::default()),
            image_config: ImageProcessingConfig::default(),
            cleanup_config: BookingCleanupConfig::default(),
        }
    }

    pub fn users(mut self, users: InMemoryUsers) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub fn bookings(mut self, bookings: ScriptedBookings) -> Self {
        self.bookings = Arc::new(bookings);
        self
    }

    pub fn image_config(mut self, image_config: ImageProcessingConfig) -> Self {
        self.image_config = image_config;
        self
    }

    pub fn cleanup_config(mut self, cleanup_config: BookingCleanupConfig) -> Self {
        self.cleanup_config = cleanup_config;
        self
    }

    pub fn build(self) -> TestApp {
        let storage_dir = std::env::temp_dir().join(format!("staybook-test-{}", Uuid::new_v4()));
        let media_config = MediaStorageConfig {
            storage_dir: storage_dir.clone(),
            base_url: "http://localhost:3000/files".to_string(),
            max_file_size: 10 * 1024 * 1024,
        };

        let state = AppState {
            auth_repository: self.users.clone(),
            booking_repository: self.bookings.clone(),
            jwt_config: test_jwt_config(),
            cors_config: CorsConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            },
            cleanup_config: self.cleanup_config,
            image_normalizer: ImageNormalizer::new(Arc::new(RasterOptimizer), self.image_config),
            storage: Arc::new(LocalFileStorage::from_config(&media_config)),
            media_config,
            metrics_handle: None,
        };

        TestApp {
            router: init_router(state),
            users: self.users,
            bookings: self.bookings,
            storage_dir,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_app() -> TestApp {
    TestAppBuilder::new().build()
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub const BOUNDARY: &str = "staybook-test-boundary";

/// One file part of a multipart body.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: Vec<u8>,
}

pub fn multipart_request(uri: &str, token: &str, parts: Vec<FilePart<'_>>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, part.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    let image = RgbImage::from_pixel(width, height, Rgb([30, 144, 255]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Collects formatted tracing output for the current thread.
///
/// `#[tokio::test]` runs on a current-thread runtime, so every event emitted
/// while a request is driven through the router lands here.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Start capturing; events are recorded until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    /// Captured lines mentioning `needle`.
    pub fn lines_with(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
