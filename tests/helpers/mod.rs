//! Test doubles and HTTP helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use virtual_tryon::app_state::AppState;
use virtual_tryon::db::{MemoryStore, RecordStore, StoreError};
use virtual_tryon::models::status::StatusCheck;
use virtual_tryon::models::tryon::{TryOnRecord, TryOnUpdate};
use virtual_tryon::routes;
use virtual_tryon::services::fal::{GenerationRequest, ImageGenerator, JobError};
use virtual_tryon::services::tryon::TryOnService;

/// Canned outcome for [`StubGenerator`].
#[derive(Clone)]
pub enum StubOutcome {
    Image(String),
    EmptyResult,
    ProviderError(u16, String),
}

/// Generator that records every prompt and answers with a fixed outcome.
pub struct StubGenerator {
    outcome: StubOutcome,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new(outcome: StubOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn returning(url: &str) -> Arc<Self> {
        Self::new(StubOutcome::Image(url.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, JobError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.outcome {
            StubOutcome::Image(url) => Ok(url.clone()),
            StubOutcome::EmptyResult => Err(JobError::NoImages),
            StubOutcome::ProviderError(status, body) => Err(JobError::Provider {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

/// How [`InterferingStore`] misbehaves on `Completed` writes.
#[derive(Clone, Copy)]
pub enum Interference {
    /// The write errors out as if the database were unreachable.
    FailCompletedWrites,
    /// Another writer settles the record as failed just before the write.
    SettledElsewhere,
}

/// In-memory store that disturbs the final `Completed` update.
pub struct InterferingStore {
    pub inner: MemoryStore,
    mode: Interference,
}

impl InterferingStore {
    pub fn new(mode: Interference) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            mode,
        })
    }
}

#[async_trait]
impl RecordStore for InterferingStore {
    async fn insert_tryon(&self, record: &TryOnRecord) -> Result<(), StoreError> {
        self.inner.insert_tryon(record).await
    }

    async fn update_tryon(&self, id: Uuid, update: &TryOnUpdate) -> Result<bool, StoreError> {
        if let TryOnUpdate::Completed { .. } = update {
            match self.mode {
                Interference::FailCompletedWrites => {
                    return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
                }
                Interference::SettledElsewhere => {
                    self.inner.update_tryon(id, &TryOnUpdate::Failed).await?;
                }
            }
        }
        self.inner.update_tryon(id, update).await
    }

    async fn find_tryon(&self, id: Uuid) -> Result<Option<TryOnRecord>, StoreError> {
        self.inner.find_tryon(id).await
    }

    async fn list_tryons(&self, limit: i64) -> Result<Vec<TryOnRecord>, StoreError> {
        self.inner.list_tryons(limit).await
    }

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreError> {
        self.inner.insert_status_check(check).await
    }

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>, StoreError> {
        self.inner.list_status_checks(limit).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

/// Lifecycle manager over a fresh in-memory store.
pub fn service_with(generator: Arc<StubGenerator>) -> (TryOnService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = TryOnService::new(store.clone(), generator);
    (service, store)
}

/// Full router over a fresh in-memory store.
pub fn build_test_app(generator: Arc<StubGenerator>) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn RecordStore> = store.clone();
    let state = AppState::new(dyn_store, generator);
    (routes::app(state, 20 * 1024 * 1024, None), store)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
