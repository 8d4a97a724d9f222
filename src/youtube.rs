//! Clients and services for working with the YouTube Data API.

pub mod auth;
pub mod client;
pub mod service;
pub mod video;

pub use client::Channel;
