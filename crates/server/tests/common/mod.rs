//! Common test utilities for E2E testing with mocks.
//!
//! Builds an in-process router with mock collaborators injected, so request
//! flows can be exercised end to end without external infrastructure.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use prometheus::Registry;
use serde_json::Value;
use tower::ServiceExt;

use cinefile_core::testing::{MockLibrary, MockMetadataProvider, MockNotifier};
use cinefile_core::{
    create_audit_system, AuditStore, AvailabilityService, CompletionReconciler, Config,
    DatabaseConfig, LibraryCatalog, MatchConfig, MatchEngine, MatchingConfig, MetadataProvider,
    Notifier, ReconcilerConfig, RequestStore, RequestsConfig, ServerConfig, SqliteAuditStore,
    SqliteRequestStore, TmdbConfig,
};
use cinefile_server::api::create_router;
use cinefile_server::state::AppState;

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use cinefile_core::testing::fixtures;

/// Test fixture with an in-process server and controllable mocks.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock metadata provider - configure search results and details
    pub metadata: Arc<MockMetadataProvider>,
    /// Mock library - configure existing files
    pub library: Arc<MockLibrary>,
    /// Mock notifier - inspect deliveries, inject failures
    pub notifier: Arc<MockNotifier>,
    /// Request store shared with the server
    pub requests: Arc<SqliteRequestStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub fn test_config() -> Config {
    Config {
        tmdb: TmdbConfig {
            api_key: "test-key".to_string(),
            base_url: None,
            image_base_url: None,
        },
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        matching: MatchingConfig::default(),
        requests: RequestsConfig::default(),
        telegram: None,
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(config: Config) -> Self {
        let metadata = Arc::new(MockMetadataProvider::new());
        let library = Arc::new(MockLibrary::new());
        let notifier = Arc::new(MockNotifier::new());
        let requests = Arc::new(SqliteRequestStore::in_memory().unwrap());

        let audit_store: Arc<dyn AuditStore> = Arc::new(SqliteAuditStore::in_memory().unwrap());
        let (audit_handle, audit_writer) = create_audit_system(Arc::clone(&audit_store), 100);
        tokio::spawn(audit_writer.run());

        let engine = MatchEngine::with_config(MatchConfig {
            threshold: config.matching.threshold,
            year_tolerance: config.matching.year_tolerance,
            ..MatchConfig::default()
        });
        let availability =
            AvailabilityService::new(library.clone() as Arc<dyn LibraryCatalog>, engine);

        let reconciler = CompletionReconciler::new(
            requests.clone() as Arc<dyn RequestStore>,
            notifier.clone() as Arc<dyn Notifier>,
            ReconcilerConfig {
                threshold: config.matching.threshold,
                year_tolerance: config.matching.year_tolerance,
                pending_scan_limit: config.requests.pending_scan_limit,
            },
        )
        .with_audit(audit_handle.clone());

        // Each fixture gets its own registry; the global collectors can only
        // register once per process, so a collision here is harmless.
        let registry = Registry::new();
        let _ = cinefile_core::metrics::register_metrics(&registry);

        let state = Arc::new(AppState::new(
            config,
            metadata.clone() as Arc<dyn MetadataProvider>,
            library.clone() as Arc<dyn LibraryCatalog>,
            requests.clone() as Arc<dyn RequestStore>,
            notifier.clone() as Arc<dyn Notifier>,
            availability,
            reconciler,
            audit_handle,
            audit_store,
            registry,
        ));

        Self {
            router: create_router(state),
            metadata,
            library,
            notifier,
            requests,
        }
    }

    /// GET a path and parse the JSON body.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// POST a JSON body to a path.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
