//! Clients and services for posting to Mastodon.

pub mod client;

pub use client::Poster;
