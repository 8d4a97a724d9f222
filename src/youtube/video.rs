// SPDX-License-Identifier: Apache-2.0

//! Typed decoding of YouTube Data API payloads.
//!
//! The API returns dynamically-shaped JSON; everything is decoded into
//! typed records here, once, at the boundary. Nothing downstream ever
//! sees a raw JSON document.

use crate::clock::{DateTime, HasAge, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata and statistics for a single YouTube video.
///
/// Records are immutable once decoded; derived scores live in
/// [`crate::study`], not here.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct VideoRecord {
    id: String,
    channel_id: String,
    title: String,
    published_at: DateTime<Utc>,
    view_count: u64,
    like_count: u64,
    dislike_count: u64,
    comment_count: u64,
    keywords: Vec<String>,
}

impl VideoRecord {
    /// Creates a record with zeroed statistics and no keywords.
    pub fn new(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        title: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            title: title.into(),
            published_at,
            view_count: 0,
            like_count: 0,
            dislike_count: 0,
            comment_count: 0,
            keywords: Vec::new(),
        }
    }

    /// Sets the record's statistics counts.
    pub fn with_counts(self, views: u64, likes: u64, dislikes: u64, comments: u64) -> Self {
        Self {
            view_count: views,
            like_count: likes,
            dislike_count: dislikes,
            comment_count: comments,
            ..self
        }
    }

    /// Sets the record's keywords.
    pub fn with_keywords(self, keywords: Vec<String>) -> Self {
        Self { keywords, ..self }
    }

    /// The video's ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The ID of the channel the video belongs to.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// The video's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The date the video was published.
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Number of times the video has been viewed.
    pub fn view_count(&self) -> u64 {
        self.view_count
    }

    /// Number of likes.
    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    /// Number of dislikes.
    pub fn dislike_count(&self) -> u64 {
        self.dislike_count
    }

    /// Number of comments.
    pub fn comment_count(&self) -> u64 {
        self.comment_count
    }

    /// Keywords ("tags") attached to the video.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.as_str())
    }
}

impl HasAge for VideoRecord {
    fn published_utc(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// Decodes a `videos.list` response into video records.
pub(crate) fn parse_video_list(data: &str) -> Result<Vec<VideoRecord>, Error> {
    let response: VideoListResponse = serde_json::from_str(data)?;
    response.items.into_iter().map(VideoItem::into_record).collect()
}

/// Decodes a `search.list` response into the IDs of the videos found.
pub(crate) fn parse_search_ids(data: &str) -> Result<Vec<String>, Error> {
    let response: SearchListResponse = serde_json::from_str(data)?;
    Ok(response
        .items
        .into_iter()
        .map(|item| item.id.video_id)
        .filter(|id| !id.is_empty())
        .collect())
}

/// Indicates an error decoding an API payload.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload was not the JSON document we expected.
    #[error("could not decode video payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A statistics count was not a base-ten integer.
    #[error("invalid {field} value: {value:?}")]
    InvalidCount {
        field: &'static str,
        value: String,
    },
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

impl VideoItem {
    fn into_record(self) -> Result<VideoRecord, Error> {
        Ok(VideoRecord {
            id: self.id,
            channel_id: self.snippet.channel_id,
            title: self.snippet.title,
            published_at: self.snippet.published_at,
            view_count: parse_count("viewCount", &self.statistics.view_count)?,
            like_count: parse_count("likeCount", &self.statistics.like_count)?,
            dislike_count: parse_count("dislikeCount", &self.statistics.dislike_count)?,
            comment_count: parse_count("commentCount", &self.statistics.comment_count)?,
            keywords: self.snippet.tags,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    channel_id: String,
    title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    tags: Vec<String>,
}

// The API encodes every count as a decimal string.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default)]
    view_count: String,
    #[serde(default)]
    like_count: String,
    #[serde(default)]
    dislike_count: String,
    #[serde(default)]
    comment_count: String,
}

#[derive(Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    #[serde(default)]
    video_id: String,
}

fn parse_count(field: &'static str, value: &str) -> Result<u64, Error> {
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| Error::InvalidCount {
        field,
        value: String::from(value),
    })
}
