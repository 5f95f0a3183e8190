//! REST client for the remote item store.
//!
//! Endpoints:
//!
//! | operation | request |
//! |---|---|
//! | list folders | `GET /folders?parent=<id>` |
//! | list files | `GET /files?category=<cat>` |
//! | create folder | `POST /folders` (JSON) |
//! | upload file | `POST /files` (multipart) |
//! | update | `PUT /folders/:id`, `PUT /files/:id` |
//! | delete | `DELETE /folders/:id`, `DELETE /files/:id` |
//! | download | `GET /files/:id/download` |
//!
//! Responses may be bare JSON or wrapped in `{"data": ...}`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crm_core::config::api::ApiConfig;
use crm_core::error::{AppError, ErrorKind};
use crm_core::result::AppResult;
use crm_core::traits::CredentialProvider;
use crm_core::types::ItemId;
use crm_entity::item::{File, Folder, ItemKind};
use crm_entity::request::{FilePatch, FolderPatch, NewFile, NewFolder};

use crate::store::{ByteStream, ItemStore};

/// Longest raw (non-JSON) error body surfaced as the server's message.
const MAX_PLAIN_ERROR_LEN: usize = 200;

/// Item store backed by the CRM REST API.
#[derive(Debug, Clone)]
pub struct HttpItemStore {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

/// Success bodies arrive either bare or inside a `data` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(value) => value,
        }
    }
}

impl HttpItemStore {
    /// Create a client for the API described by `config`.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialProvider>) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid api.base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "api.base_url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if config.request_timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
        }
        if config.connect_timeout_seconds > 0 {
            builder =
                builder.connect_timeout(Duration::from_secs(config.connect_timeout_seconds));
        }
        let client = builder.build().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to build HTTP client: {e}"),
                e,
            )
        })?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// The base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL, escaping each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of `kind`'s collection, or of an entry below it.
    fn kind_url(&self, kind: ItemKind, tail: &[&str]) -> Url {
        let mut url = self.url(&[kind.collection()]);
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(tail);
        }
        url
    }

    /// Build a request with the bearer credential attached, if there is one.
    fn request(&self, method: Method, url: Url) -> AppResult<RequestBuilder> {
        let builder = self.client.request(method, url);
        Ok(match self.credentials.bearer_token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request, mapping transport failures and non-success statuses.
    async fn send(&self, builder: RequestBuilder, op: &str) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| transport_error(op, e))?;
        let status = response.status();
        debug!(operation = op, status = status.as_u16(), "Store responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body)
            .unwrap_or_else(|| format!("{op} failed (HTTP {})", status.as_u16()));
        Err(AppError::new(kind_for_status(status), message))
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, op: &str) -> AppResult<T> {
        let response = self.send(builder, op).await?;
        let body = response.bytes().await.map_err(|e| transport_error(op, e))?;
        let envelope: Envelope<T> = serde_json::from_slice(&body).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("{op} returned an unexpected body: {e}"),
                e,
            )
        })?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl ItemStore for HttpItemStore {
    fn store_type(&self) -> &str {
        "http"
    }

    async fn list_folders(&self, parent: Option<&ItemId>) -> AppResult<Vec<Folder>> {
        let mut url = self.kind_url(ItemKind::Folder, &[]);
        if let Some(parent) = parent {
            url.query_pairs_mut().append_pair("parent", parent.as_str());
        }
        let request = self.request(Method::GET, url)?;
        self.send_json(request, "List folders").await
    }

    async fn list_files(&self, category: Option<&str>) -> AppResult<Vec<File>> {
        let mut url = self.kind_url(ItemKind::File, &[]);
        if let Some(category) = category {
            url.query_pairs_mut().append_pair("category", category);
        }
        let request = self.request(Method::GET, url)?;
        self.send_json(request, "List files").await
    }

    async fn create_folder(&self, folder: &NewFolder) -> AppResult<Folder> {
        let request = self
            .request(Method::POST, self.kind_url(ItemKind::Folder, &[]))?
            .json(folder);
        let created: Folder = self.send_json(request, "Create folder").await?;
        info!(folder_id = %created.id, name = %created.name, "Folder created");
        Ok(created)
    }

    async fn upload_file(&self, file: NewFile) -> AppResult<File> {
        let NewFile {
            name,
            category,
            description,
            tags,
            status,
            contact,
            deal,
            folder_id,
            content,
            content_type,
        } = file;

        let size = content.len();
        let mut part = Part::bytes(content.to_vec()).file_name(name.clone());
        if let Some(content_type) = content_type {
            part = part.mime_str(&content_type).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Validation,
                    format!("Invalid content type '{content_type}': {e}"),
                    e,
                )
            })?;
        }

        let mut form = Form::new()
            .text("name", name.clone())
            .text("category", category)
            .text("status", status.as_str())
            .text("tags", serde_json::to_string(&tags)?)
            .part("file", part);
        if let Some(folder_id) = folder_id {
            form = form.text("folder_id", folder_id.into_inner());
        }
        if let Some(description) = description {
            form = form.text("description", description);
        }
        if let Some(contact) = contact {
            form = form.text("contact", contact);
        }
        if let Some(deal) = deal {
            form = form.text("deal", deal);
        }

        let request = self
            .request(Method::POST, self.kind_url(ItemKind::File, &[]))?
            .multipart(form);
        let created: File = self.send_json(request, "Upload file").await?;
        info!(file_id = %created.id, name = %name, size, "File uploaded");
        Ok(created)
    }

    async fn update_folder(&self, id: &ItemId, patch: &FolderPatch) -> AppResult<Folder> {
        let request = self
            .request(Method::PUT, self.kind_url(ItemKind::Folder, &[id.as_str()]))?
            .json(patch);
        let updated: Folder = self.send_json(request, "Update folder").await?;
        info!(folder_id = %id, "Folder updated");
        Ok(updated)
    }

    async fn update_file(&self, id: &ItemId, patch: &FilePatch) -> AppResult<File> {
        let request = self
            .request(Method::PUT, self.kind_url(ItemKind::File, &[id.as_str()]))?
            .json(patch);
        let updated: File = self.send_json(request, "Update file").await?;
        info!(file_id = %id, "File updated");
        Ok(updated)
    }

    async fn delete_folder(&self, id: &ItemId) -> AppResult<()> {
        let request = self.request(
            Method::DELETE,
            self.kind_url(ItemKind::Folder, &[id.as_str()]),
        )?;
        self.send(request, "Delete folder").await?;
        info!(folder_id = %id, "Folder deleted");
        Ok(())
    }

    async fn delete_file(&self, id: &ItemId) -> AppResult<()> {
        let request = self.request(
            Method::DELETE,
            self.kind_url(ItemKind::File, &[id.as_str()]),
        )?;
        self.send(request, "Delete file").await?;
        info!(file_id = %id, "File deleted");
        Ok(())
    }

    async fn download_file(&self, id: &ItemId) -> AppResult<ByteStream> {
        let url = self.kind_url(ItemKind::File, &[id.as_str(), "download"]);
        let request = self.request(Method::GET, url)?;
        let response = self.send(request, "Download file").await?;
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| transport_error("Download file", e)));
        Ok(Box::pin(stream))
    }

    async fn download_file_bytes(&self, id: &ItemId) -> AppResult<Bytes> {
        let url = self.kind_url(ItemKind::File, &[id.as_str(), "download"]);
        let request = self.request(Method::GET, url)?;
        let response = self.send(request, "Download file").await?;
        response
            .bytes()
            .await
            .map_err(|e| transport_error("Download file", e))
    }
}

fn transport_error(op: &str, err: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::Network, format!("{op} request failed: {err}"), err)
}

fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        400 | 422 => ErrorKind::Validation,
        401 => ErrorKind::Authentication,
        403 => ErrorKind::Authorization,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        429 => ErrorKind::RateLimit,
        _ => ErrorKind::ExternalService,
    }
}

/// Pull a human-readable message out of an error body.
///
/// JSON bodies are searched for `message`, then `error` (string or
/// object with its own `message`). Short plain-text bodies are used
/// as-is; HTML error pages are ignored.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let from_key = |key: &str| {
            value.get(key).and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(_) => v
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string),
                _ => None,
            })
        };
        return from_key("message")
            .or_else(|| from_key("error"))
            .filter(|m| !m.trim().is_empty());
    }

    if body.starts_with('<') || body.len() > MAX_PLAIN_ERROR_LEN {
        return None;
    }
    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticToken;

    fn store(base: &str) -> HttpItemStore {
        let config = ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        };
        HttpItemStore::new(&config, Arc::new(StaticToken::none())).unwrap()
    }

    #[test]
    fn test_url_escapes_ids_and_keeps_base_path() {
        let store = store("http://crm.local/api/");
        let url = store.url(&["files", "a/b c", "download"]);
        assert_eq!(url.as_str(), "http://crm.local/api/files/a%2Fb%20c/download");
    }

    #[test]
    fn test_url_without_trailing_slash() {
        let store = store("http://crm.local/api");
        assert_eq!(store.url(&["folders"]).as_str(), "http://crm.local/api/folders");
    }

    #[test]
    fn test_kind_urls() {
        let store = store("http://crm.local/api/");
        assert_eq!(
            store.kind_url(ItemKind::Folder, &[]).as_str(),
            "http://crm.local/api/folders"
        );
        let id = ItemId::new("7");
        assert_eq!(
            store.kind_url(ItemKind::File, &[id.as_str(), "download"]).as_str(),
            "http://crm.local/api/files/7/download"
        );
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        let err = HttpItemStore::new(&config, Arc::new(StaticToken::none())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_server_message_prefers_message_key() {
        let body = r#"{"error":"CONFLICT","message":"Cannot move a folder into its own subfolder"}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("Cannot move a folder into its own subfolder")
        );
    }

    #[test]
    fn test_server_message_reads_nested_error() {
        let body = r#"{"error":{"message":"Folder not found"}}"#;
        assert_eq!(server_message(body).as_deref(), Some("Folder not found"));
    }

    #[test]
    fn test_server_message_ignores_html_and_empty() {
        assert_eq!(server_message("<html><body>502</body></html>"), None);
        assert_eq!(server_message("   "), None);
        assert_eq!(server_message(r#"{"status":500}"#), None);
        assert_eq!(server_message("Bad gateway").as_deref(), Some("Bad gateway"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(kind_for_status(StatusCode::UNPROCESSABLE_ENTITY), ErrorKind::Validation);
        assert_eq!(kind_for_status(StatusCode::UNAUTHORIZED), ErrorKind::Authentication);
        assert_eq!(kind_for_status(StatusCode::CONFLICT), ErrorKind::Conflict);
        assert_eq!(kind_for_status(StatusCode::BAD_GATEWAY), ErrorKind::ExternalService);
    }

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let wrapped: Envelope<Vec<Folder>> =
            serde_json::from_str(r#"{"success":true,"data":[{"id":"1","name":"A"}]}"#).unwrap();
        assert_eq!(wrapped.into_inner().len(), 1);
        let bare: Envelope<Vec<Folder>> =
            serde_json::from_str(r#"[{"id":"1","name":"A"},{"id":"2","name":"B"}]"#).unwrap();
        assert_eq!(bare.into_inner().len(), 2);
    }
}
