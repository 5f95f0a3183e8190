//! Shared test helpers for integration tests.
//!
//! [`TestServer`] serves the REST API the browser consumes, on a random
//! local port, backed by a [`MemoryItemStore`].

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;

use crm_browser::ItemBrowser;
use crm_browser::notify::RecordingNotifier;
use crm_client::credential::StaticToken;
use crm_client::{HttpItemStore, ItemStore, MemoryItemStore};
use crm_core::config::api::ApiConfig;
use crm_core::config::browser::BrowserConfig;
use crm_core::error::{AppError, ErrorKind};
use crm_core::types::ItemId;
use crm_entity::item::ItemStatus;
use crm_entity::request::{FilePatch, FolderPatch, NewFile, NewFolder};

/// The only bearer token the test server accepts.
pub const TEST_TOKEN: &str = "test-token";

/// Test server context
pub struct TestServer {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// The store behind the API, for direct inspection
    pub store: Arc<MemoryItemStore>,
    state: ServerState,
}

#[derive(Clone)]
struct ServerState {
    store: Arc<MemoryItemStore>,
    /// Status to answer the next request with, empty body.
    fail_next: Arc<Mutex<Option<StatusCode>>>,
    /// `METHOD /path?query` of every request received.
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Start a server on a random local port
    pub async fn start() -> Self {
        let store = Arc::new(MemoryItemStore::new());
        let state = ServerState {
            store: Arc::clone(&store),
            fail_next: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let api = Router::new()
            .route("/folders", get(list_folders).post(create_folder))
            .route("/folders/{id}", put(update_folder).delete(delete_folder))
            .route("/files", get(list_files).post(upload_file))
            .route("/files/{id}", put(update_file).delete(delete_file))
            .route("/files/{id}/download", get(download_file))
            .layer(middleware::from_fn_with_state(state.clone(), gatekeeper))
            .with_state(state.clone());
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            store,
            state,
        }
    }

    /// An HTTP store client using `token`
    pub fn client(&self, token: Option<&str>) -> HttpItemStore {
        let config = ApiConfig {
            base_url: self.base_url.clone(),
            ..ApiConfig::default()
        };
        let credentials = match token {
            Some(token) => StaticToken::new(token),
            None => StaticToken::none(),
        };
        HttpItemStore::new(&config, Arc::new(credentials)).expect("Failed to build client")
    }

    /// A browser talking to this server with the valid token
    pub fn browser(&self) -> (ItemBrowser, Arc<RecordingNotifier>) {
        browser_over(Arc::new(self.client(Some(TEST_TOKEN))))
    }

    /// Answer the next request with `status` and an empty body
    pub fn fail_next(&self, status: StatusCode) {
        *self.state.fail_next.lock().unwrap() = Some(status);
    }

    /// Every request line seen so far
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Forget recorded requests
    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }
}

/// A browser over any store, recording its notices
pub fn browser_over(store: Arc<dyn ItemStore>) -> (ItemBrowser, Arc<RecordingNotifier>) {
    let notices = Arc::new(RecordingNotifier::new());
    let browser = ItemBrowser::new(store, notices.clone(), &BrowserConfig::default())
        .expect("Failed to build browser");
    (browser, notices)
}

/// An address nothing listens on
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.0.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn gatekeeper(State(state): State<ServerState>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri());
    state.requests.lock().unwrap().push(line);

    if let Some(status) = state.fail_next.lock().unwrap().take() {
        return status.into_response();
    }

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing or invalid token" })),
        )
            .into_response();
    }

    next.run(request).await
}

async fn list_folders(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let parent = query.get("parent").map(|p| ItemId::new(p.as_str()));
    let folders = state.store.list_folders(parent.as_ref()).await?;
    Ok(Json(json!({ "data": folders })).into_response())
}

async fn list_files(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let files = state
        .store
        .list_files(query.get("category").map(String::as_str))
        .await?;
    Ok(Json(files).into_response())
}

async fn create_folder(
    State(state): State<ServerState>,
    Json(folder): Json<NewFolder>,
) -> ApiResult<Response> {
    let created = state.store.create_folder(&folder).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": created }))).into_response())
}

async fn upload_file(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut file = NewFile::default();
    let mut has_content = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Bad multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file.content_type = field.content_type().map(str::to_string);
            file.content = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Bad file part: {e}")))?;
            has_content = true;
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Bad text part: {e}")))?;
        match name.as_str() {
            "name" => file.name = value,
            "category" => file.category = value,
            "description" => file.description = Some(value),
            "contact" => file.contact = Some(value),
            "deal" => file.deal = Some(value),
            "folder_id" => file.folder_id = Some(ItemId::new(value)),
            "status" => file.status = value.parse::<ItemStatus>()?,
            "tags" => file.tags = serde_json::from_str(&value).map_err(AppError::from)?,
            _ => {}
        }
    }

    if !has_content {
        return Err(AppError::validation("Missing file part").into());
    }
    let created = state.store.upload_file(file).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn update_folder(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(patch): Json<FolderPatch>,
) -> ApiResult<Response> {
    let updated = state.store.update_folder(&ItemId::new(id), &patch).await?;
    Ok(Json(updated).into_response())
}

async fn update_file(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(patch): Json<FilePatch>,
) -> ApiResult<Response> {
    let updated = state.store.update_file(&ItemId::new(id), &patch).await?;
    Ok(Json(json!({ "data": updated })).into_response())
}

async fn delete_folder(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_folder(&ItemId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_file(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_file(&ItemId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn download_file(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let content = state.store.download_file_bytes(&ItemId::new(id)).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        content,
    )
        .into_response())
}
