//! Google Drive backend for [`RemoteListing`]
//!
//! Talks to the Drive API v3 over REST. Drive addresses everything by file
//! ID and allows duplicate names among siblings; this backend accepts the
//! crate's slash-joined virtual locators and resolves them to IDs on every
//! call by walking name lookups from the `root` alias, first match winning.
//! No ID cache is kept across calls, matching the crate-wide policy of never
//! trusting state older than one operation.
//!
//! Authentication is a bearer token supplied via [`GoogleDriveConfig`];
//! acquiring and refreshing it is the caller's concern.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::info;

use crate::http_retry::{send_with_retry, RetryPolicy};
use crate::path::{join_locator, ROOT_LOCATOR};
use crate::types::{RemoteEntry, StoreError};
use crate::RemoteListing;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Drive file metadata as returned by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
    #[serde(default)]
    size: Option<String>,
    modified_time: Option<String>,
}

impl DriveFile {
    fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }

    fn to_entry(&self, parent_locator: &str) -> RemoteEntry {
        RemoteEntry {
            name: self.name.clone(),
            locator: join_locator(parent_locator, &self.name),
            is_dir: self.is_folder(),
            size: self.size.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0),
            modified: self.modified_time.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFileList {
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// Configuration for the Drive backend.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleDriveConfig {
    /// OAuth2 bearer token with Drive scope; refresh happens outside
    pub access_token: String,
}

/// Google Drive implementation of [`RemoteListing`].
pub struct GoogleDriveListing {
    client: reqwest::Client,
    token: SecretString,
    retry: RetryPolicy,
}

impl GoogleDriveListing {
    pub fn new(config: GoogleDriveConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: SecretString::from(config.access_token),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn auth_header(&self) -> Result<HeaderValue, StoreError> {
        HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
            .map_err(|e| StoreError::InvalidConfig(format!("malformed access token: {e}")))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let request = request
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        send_with_retry(&self.client, request, &self.retry)
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))
    }

    async fn expect_success(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(StoreError::Transport(format!("{context}: {status}: {text}")))
    }

    /// List every child of a folder ID, following pagination.
    async fn list_children(&self, folder_id: &str) -> Result<Vec<DriveFile>, StoreError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/files?q={}&fields=files(id,name,mimeType,size,modifiedTime),nextPageToken&pageSize=1000",
                DRIVE_API_BASE,
                urlencoding::encode(&format!("'{folder_id}' in parents and trashed=false")),
            );
            if let Some(ref token) = page_token {
                url.push_str(&format!("&pageToken={token}"));
            }

            let response = self
                .send(self.client.get(&url).header(AUTHORIZATION, self.auth_header()?))
                .await?;
            let response = self.expect_success(response, "list").await?;
            let list: DriveFileList = response
                .json()
                .await
                .map_err(|e| StoreError::Transport(format!("list parse: {e}")))?;

            files.extend(list.files);
            match list.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(files)
    }

    /// Find a child of `parent_id` by name. Drive may hold several entries
    /// with the same name; the first one returned wins.
    async fn find_child(&self, parent_id: &str, name: &str) -> Result<Option<DriveFile>, StoreError> {
        let query = format!(
            "name='{}' and '{}' in parents and trashed=false",
            name.replace('\'', "\\'"),
            parent_id
        );
        let url = format!(
            "{}/files?q={}&fields=files(id,name,mimeType,size,modifiedTime)",
            DRIVE_API_BASE,
            urlencoding::encode(&query)
        );

        let response = self
            .send(self.client.get(&url).header(AUTHORIZATION, self.auth_header()?))
            .await?;
        let response = self.expect_success(response, "lookup").await?;
        let list: DriveFileList = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("lookup parse: {e}")))?;

        Ok(list.files.into_iter().next())
    }

    /// Resolve a virtual folder locator to a Drive folder ID by walking name
    /// lookups from the root alias.
    async fn folder_id(&self, locator: &str) -> Result<String, StoreError> {
        let mut current = "root".to_string();

        for segment in locator.split('/').filter(|s| !s.is_empty()) {
            let child = self
                .find_child(&current, segment)
                .await?
                .filter(DriveFile::is_folder)
                .ok_or_else(|| StoreError::PathNotFound(locator.to_string()))?;
            current = child.id;
        }

        Ok(current)
    }

    /// Resolve a virtual file locator to its Drive metadata.
    async fn file_at(&self, locator: &str) -> Result<DriveFile, StoreError> {
        let (parent, name) = split_locator(locator);
        let parent_id = self.folder_id(parent).await?;
        self.find_child(&parent_id, name)
            .await?
            .ok_or_else(|| StoreError::FileNotFound(locator.to_string()))
    }
}

#[async_trait]
impl RemoteListing for GoogleDriveListing {
    async fn list(&self, locator: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        let folder_id = self.folder_id(locator).await?;
        let files = self.list_children(&folder_id).await?;
        let parent = if locator.is_empty() { ROOT_LOCATOR } else { locator };
        Ok(files.iter().map(|f| f.to_entry(parent)).collect())
    }

    async fn create_directory(&self, locator: &str) -> Result<(), StoreError> {
        let (parent, name) = split_locator(locator);
        let parent_id = self.folder_id(parent).await?;

        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": [parent_id],
        });
        let url = format!("{DRIVE_API_BASE}/files");
        let response = self
            .send(
                self.client
                    .post(&url)
                    .header(AUTHORIZATION, self.auth_header()?)
                    .header(CONTENT_TYPE, "application/json")
                    .body(metadata.to_string()),
            )
            .await?;
        self.expect_success(response, "mkdir").await?;

        info!("created Drive folder {}", locator);
        Ok(())
    }

    async fn get(&self, locator: &str) -> Result<Vec<u8>, StoreError> {
        let file = self.file_at(locator).await?;
        let url = format!("{}/files/{}?alt=media", DRIVE_API_BASE, file.id);

        let response = self
            .send(self.client.get(&url).header(AUTHORIZATION, self.auth_header()?))
            .await?;
        let response = self.expect_success(response, "download").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(format!("download read: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn put(&self, locator: &str, content: &[u8]) -> Result<(), StoreError> {
        let (parent, name) = split_locator(locator);
        let parent_id = self.folder_id(parent).await?;

        // Drive happily creates a same-named sibling on upload, so update in
        // place when the name already exists.
        if let Some(existing) = self.find_child(&parent_id, name).await? {
            let url = format!(
                "{}/files/{}?uploadType=media",
                UPLOAD_API_BASE, existing.id
            );
            let response = self
                .send(
                    self.client
                        .patch(&url)
                        .header(AUTHORIZATION, self.auth_header()?)
                        .header(CONTENT_TYPE, "application/octet-stream")
                        .body(content.to_vec()),
                )
                .await?;
            self.expect_success(response, "upload update").await?;
            return Ok(());
        }

        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent_id],
        });
        let body = multipart_related(&metadata.to_string(), content);
        let url = format!("{UPLOAD_API_BASE}/files?uploadType=multipart");
        let response = self
            .send(
                self.client
                    .post(&url)
                    .header(AUTHORIZATION, self.auth_header()?)
                    .header(
                        CONTENT_TYPE,
                        format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
                    )
                    .body(body),
            )
            .await?;
        self.expect_success(response, "upload").await?;

        info!("uploaded {} ({} bytes)", locator, content.len());
        Ok(())
    }

    async fn delete(&self, locator: &str) -> Result<(), StoreError> {
        let file = self.file_at(locator).await?;
        let url = format!("{}/files/{}", DRIVE_API_BASE, file.id);

        let response = self
            .send(self.client.delete(&url).header(AUTHORIZATION, self.auth_header()?))
            .await?;
        // A 404 means someone else already deleted it; treat as done.
        if response.status().as_u16() == 404 {
            return Ok(());
        }
        self.expect_success(response, "delete").await?;

        info!("deleted {}", locator);
        Ok(())
    }
}

const MULTIPART_BOUNDARY: &str = "cloudpath_boundary";

/// Build a multipart/related body: JSON metadata part plus content part.
fn multipart_related(metadata: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--").as_bytes());
    body
}

/// Split a virtual locator into (parent locator, entry name).
fn split_locator(locator: &str) -> (&str, &str) {
    let trimmed = locator.trim_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
        None => ("", trimmed),
    }
}
