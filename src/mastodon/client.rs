// SPDX-License-Identifier: Apache-2.0

//! A client for posting statuses to a Mastodon instance.

use crate::http::{HTTPError, HTTPResult, HTTPService};
use crate::text::{MASTODON_CHAR_LIMIT, chunk_message};
use reqwest::header;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status to be posted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewStatus {
    status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    in_reply_to_id: Option<String>,
}

impl NewStatus {
    /// Creates a top-level status.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            in_reply_to_id: None,
        }
    }

    /// Threads the status as a reply to another status.
    pub fn in_reply_to(self, id: impl Into<String>) -> Self {
        Self {
            in_reply_to_id: Some(id.into()),
            ..self
        }
    }

    /// The status text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The ID of the status this one replies to, if any.
    pub fn in_reply_to_id(&self) -> Option<&str> {
        self.in_reply_to_id.as_deref()
    }
}

/// A status as the instance reports it back after posting.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Status {
    id: String,

    #[serde(default)]
    url: String,
}

impl Status {
    /// The posted status's ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The posted status's public URL, possibly empty.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A service for posting statuses.
///
/// [`MastodonService`] posts to a live instance; tests substitute a
/// recording implementation.
pub trait Service {
    /// Posts a status and returns the instance's raw JSON response.
    fn post_status(&self, status: &NewStatus) -> impl Future<Output = HTTPResult<String>> + Send;
}

impl<S: Service + Sync> Service for &S {
    async fn post_status(&self, status: &NewStatus) -> HTTPResult<String> {
        (**self).post_status(status).await
    }
}

/// A service that posts to a live Mastodon instance.
#[derive(Debug)]
pub struct MastodonService {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MastodonService {
    /// Creates a service for the instance at `base_url`.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Self::client(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    fn statuses_uri(&self) -> String {
        format!("{}/api/v1/statuses", self.base_url.trim_end_matches('/'))
    }
}

impl HTTPService for MastodonService {}

impl Service for MastodonService {
    async fn post_status(&self, status: &NewStatus) -> HTTPResult<String> {
        let response = self
            .client
            .post(self.statuses_uri())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.access_token),
            )
            .json(status)
            .send()
            .await
            .map_err(HTTPError::Request)?;

        if !response.status().is_success() {
            return Err(HTTPError::Http(response.status()));
        }

        response.text().await.map_err(HTTPError::Body)
    }
}

/// Posts messages of any length, splitting and threading as needed.
#[derive(Debug)]
pub struct Poster<T: Service> {
    service: T,
    limit: usize,
}

impl<T: Service> Poster<T> {
    /// Creates a poster that splits at the standard Mastodon limit.
    pub fn new(service: T) -> Self {
        Self {
            service,
            limit: MASTODON_CHAR_LIMIT,
        }
    }

    /// Posts `message`, splitting it into a reply thread if it exceeds
    /// the limit.
    ///
    /// Returns the posted statuses in thread order. Posting stops at
    /// the first failure; already-posted segments stay up.
    pub async fn post(&self, message: &str) -> Result<Vec<Status>, Error> {
        let segments = chunk_message(message, self.limit);
        let mut posted: Vec<Status> = Vec::with_capacity(segments.len());

        for segment in &segments {
            let mut status = NewStatus::new(segment.text());
            if let Some(previous) = posted.last() {
                status = status.in_reply_to(previous.id());
            }
            let body = self.service.post_status(&status).await?;
            posted.push(serde_json::from_str(&body)?);
        }

        Ok(posted)
    }
}

/// Indicates an error posting a message.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred while calling the instance.
    #[error("Service error: {0}")]
    Service(#[from] HTTPError),

    /// The instance's response could not be decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
