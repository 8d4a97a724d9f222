// SPDX-License-Identifier: Apache-2.0

//! tubescore is a command-line tool for studying the engagement a
//! YouTube channel's recent videos have earned. It retrieves a
//! channel's latest uploads, derives a handful of engagement scores
//! from their statistics, picks out the standout video for each
//! metric, and can post the results to a Mastodon account, splitting
//! long write-ups into a reply thread.
//!
//! # Examples
//!
//! (In all examples, replace `CHANNEL_ID` with an actual YouTube
//! channel ID.)
//!
//! Score a channel's recent uploads:
//!
//! ```bash
//! tubescore videos CHANNEL_ID
//! ```
//!
//! Compare several channels against each other:
//!
//! ```bash
//! tubescore compare CHANNEL_ID_1 CHANNEL_ID_2
//! ```
//!
//! Acquire and store a YouTube API access token:
//!
//! ```bash
//! tubescore auth
//! ```
//!
//! Post a message, threading it if it exceeds Mastodon's limit:
//!
//! ```bash
//! tubescore post "An unreasonably long write-up..."
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! tubescore --help
//! ```
//!
//! # API Setup
//!
//! tubescore reads its configuration from `TUBESCORE_*` environment
//! variables; see [`conf::Settings`] for the full list. At minimum you
//! will need `$TUBESCORE_USERNAME` and, for the YouTube commands, a
//! [Data API key] in `$TUBESCORE_API_KEY`. OAuth credentials for the
//! `auth` command go in `$TUBESCORE_CLIENT_ID`,
//! `$TUBESCORE_CLIENT_SECRET`, and `$TUBESCORE_REFRESH_TOKEN`.
//!
//! # License
//!
//! tubescore is licensed under the terms of the [Apache License 2.0].
//! Please see the LICENSE file accompanying this source code or visit
//! the previous link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [Data API key]: https://developers.google.com/youtube/v3/getting-started

pub mod cli;
pub mod clock;
pub mod conf;
pub mod http;
pub mod mastodon;
pub mod study;
pub mod text;
pub mod youtube;

#[cfg(test)]
mod test_utils;
