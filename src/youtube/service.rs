// SPDX-License-Identifier: Apache-2.0

//! Services for retrieving data from the YouTube Data API.

use crate::http::{HTTPError, HTTPResult, HTTPService};
use reqwest::header;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// How many of a channel's most recent uploads to retrieve.
const MAX_RESULTS: u32 = 25;

/// A service for retrieving YouTube channel and video data.
///
/// In most cases, callers will use [`YouTubeService`] to get data from
/// the live API, but other implementations are possible, particularly
/// deterministic implementations for use in testing.
pub trait Service {
    /// Returns the raw search listing for a channel's most recent
    /// uploads.
    fn search_videos(&self, channel_id: &str) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Returns the raw video listing, statistics included, for the
    /// given video IDs.
    fn list_videos(&self, ids: &[String]) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that retrieves data from the live YouTube Data API.
#[derive(Debug)]
pub struct YouTubeService {
    client: reqwest::Client,
    api_key: String,
    bearer: String,
}

impl YouTubeService {
    /// Creates a new service using the given API key and
    /// `Authorization` header value.
    pub fn new(api_key: impl Into<String>, bearer: impl Into<String>) -> Self {
        Self {
            client: Self::client(),
            api_key: api_key.into(),
            bearer: bearer.into(),
        }
    }

    fn search_uri(&self, channel_id: &str) -> String {
        format!(
            "{SEARCH_URL}?part=snippet&channelId={channel_id}&type=video&order=date&maxResults={MAX_RESULTS}&key={}",
            self.api_key
        )
    }

    fn videos_uri(&self, ids: &[String]) -> String {
        format!(
            "{VIDEOS_URL}?part=snippet,statistics&id={}&key={}",
            ids.join(","),
            self.api_key
        )
    }

    async fn get(&self, uri: &str) -> HTTPResult<String> {
        let response = self
            .client
            .get(uri)
            .header(header::AUTHORIZATION, &self.bearer)
            .send()
            .await
            .map_err(HTTPError::Request)?;

        if !response.status().is_success() {
            return Err(HTTPError::Http(response.status()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .ok_or(HTTPError::MissingContentType)?
            .to_str()?;
        if !content_type.starts_with("application/json") {
            return Err(HTTPError::UnexpectedContentType(String::from(content_type)));
        }

        response.text().await.map_err(HTTPError::Body)
    }
}

impl HTTPService for YouTubeService {}

impl Service for YouTubeService {
    async fn search_videos(&self, channel_id: &str) -> HTTPResult<String> {
        self.get(&self.search_uri(channel_id)).await
    }

    async fn list_videos(&self, ids: &[String]) -> HTTPResult<String> {
        self.get(&self.videos_uri(ids)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> YouTubeService {
        YouTubeService::new("sekrit-key", "Bearer ya29.token")
    }

    mod search_uri {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_builds_a_search_uri_for_a_channel() {
            let uri = service().search_uri("UC-kaveh");
            let expected = "https://www.googleapis.com/youtube/v3/search\
                            ?part=snippet\
                            &channelId=UC-kaveh\
                            &type=video\
                            &order=date\
                            &maxResults=25\
                            &key=sekrit-key";
            assert_eq!(uri, expected);
        }
    }

    mod videos_uri {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_joins_video_ids_with_commas() {
            let ids = vec![
                String::from("alpha"),
                String::from("bravo"),
                String::from("charlie"),
            ];
            let uri = service().videos_uri(&ids);
            let expected = "https://www.googleapis.com/youtube/v3/videos\
                            ?part=snippet,statistics\
                            &id=alpha,bravo,charlie\
                            &key=sekrit-key";
            assert_eq!(uri, expected);
        }

        #[test]
        fn it_builds_a_uri_for_a_single_video() {
            let ids = vec![String::from("alpha")];
            let uri = service().videos_uri(&ids);
            assert!(uri.contains("&id=alpha&"));
        }
    }
}
