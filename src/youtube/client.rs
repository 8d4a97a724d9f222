// SPDX-License-Identifier: Apache-2.0

//! A client for retrieving a channel's recent uploads.

use crate::study::VideoStudy;
use crate::youtube::service::Service;
use crate::youtube::video::{self, VideoRecord, parse_search_ids, parse_video_list};
use thiserror::Error;

/// A YouTube channel and its most recent uploads.
#[derive(Clone, Debug)]
pub struct Channel {
    id: String,
    videos: Vec<VideoRecord>,
}

impl Channel {
    /// Retrieves a channel's recent uploads through `service`.
    ///
    /// Two round trips: a search for the channel's latest video IDs,
    /// then a listing of those videos with their statistics. A channel
    /// with no uploads comes back empty rather than as an error.
    pub async fn new<T: Service>(id: impl Into<String>, service: &T) -> Result<Self, Error> {
        let id = id.into();
        let ids = parse_search_ids(&service.search_videos(&id).await?)?;
        let videos = if ids.is_empty() {
            Vec::new()
        } else {
            parse_video_list(&service.list_videos(&ids).await?)?
        };
        Ok(Self { id, videos })
    }

    /// The channel's ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The channel's retrieved videos, newest first.
    pub fn videos(&self) -> impl Iterator<Item = &VideoRecord> {
        self.videos.iter()
    }

    /// True if the channel has any retrieved videos.
    pub fn has_videos(&self) -> bool {
        !self.videos.is_empty()
    }

    /// Starts a scoring study over the channel's videos.
    pub fn study(&self) -> VideoStudy {
        VideoStudy::new(self.videos.clone())
    }
}

/// Indicates an error retrieving a channel's videos.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred while calling the API.
    #[error("Service error: {0}")]
    Service(#[from] crate::http::HTTPError),

    /// An API payload could not be decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] video::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HTTPResult;
    use crate::test_utils::load_data;
    use pretty_assertions::assert_eq;

    /// A service that replays recorded API payloads.
    struct TestService {
        search_file: &'static str,
    }

    impl TestService {
        fn new() -> Self {
            Self {
                search_file: "search_list",
            }
        }

        fn empty() -> Self {
            Self {
                search_file: "search_list_empty",
            }
        }
    }

    impl Service for TestService {
        async fn search_videos(&self, _channel_id: &str) -> HTTPResult<String> {
            Ok(load_data(self.search_file))
        }

        async fn list_videos(&self, ids: &[String]) -> HTTPResult<String> {
            assert_eq!(ids, ["alpha", "bravo", "charlie"]);
            Ok(load_data("videos_list"))
        }
    }

    #[tokio::test]
    async fn it_retrieves_a_channels_videos() {
        let channel = Channel::new("UC-kaveh", &TestService::new()).await.unwrap();
        assert_eq!(channel.id(), "UC-kaveh");
        assert!(channel.has_videos());
        let ids: Vec<_> = channel.videos().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["alpha", "bravo", "charlie"]);
    }

    #[tokio::test]
    async fn it_handles_a_channel_with_no_videos() {
        let channel = Channel::new("UC-empty", &TestService::empty()).await.unwrap();
        assert!(!channel.has_videos());
        assert_eq!(channel.videos().count(), 0);
    }
}
