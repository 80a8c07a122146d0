//! HTTP client for the external overlay/progress REST store
//!
//! Production implementation of [`OverlayStore`] and [`ProgressStore`]
//! against the REST layer. The engine treats the store as an opaque
//! collaborator: non-2xx responses map to `Error::Store`, transport
//! failures to `Error::Network`, and a 404 on the restore read means
//! "no record".

use crate::error::{Error, Result};
use crate::store::{OverlayStore, ProgressStore};
use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;
use wkvp_common::types::{OverlayEntry, OverlaySubmission, ProgressRecord, ProgressUpdate};

/// reqwest-backed store client
#[derive(Debug, Clone)]
pub struct HttpStoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Build with a preconfigured client (timeouts, proxies)
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-2xx responses to `Error::Store`
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Store {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl OverlayStore for HttpStoreClient {
    async fn fetch_for_media(&self, media_id: Uuid) -> Result<Vec<OverlayEntry>> {
        let response = self
            .client
            .get(self.url(&format!("/overlays/for-media/{}", media_id)))
            .send()
            .await?;
        let entries = Self::check(response).await?.json().await?;
        Ok(entries)
    }

    async fn submit(&self, submission: &OverlaySubmission) -> Result<OverlayEntry> {
        let response = self
            .client
            .post(self.url("/overlays"))
            .json(submission)
            .send()
            .await?;
        let entry = Self::check(response).await?.json().await?;
        Ok(entry)
    }
}

#[async_trait]
impl ProgressStore for HttpStoreClient {
    async fn save(&self, update: &ProgressUpdate) -> Result<()> {
        let response = self
            .client
            .post(self.url("/progress"))
            .json(update)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn load(&self, media_id: Uuid, user_id: Uuid) -> Result<Option<ProgressRecord>> {
        let response = self
            .client
            .get(self.url(&format!("/progress/{}/{}", media_id, user_id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record = Self::check(response).await?.json().await?;
        Ok(Some(record))
    }
}
