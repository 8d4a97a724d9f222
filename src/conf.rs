//! Environment and configuration utilities.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const USERNAME_VAR: &str = "TUBESCORE_USERNAME";
const CLIENT_ID_VAR: &str = "TUBESCORE_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "TUBESCORE_CLIENT_SECRET";
const REFRESH_TOKEN_VAR: &str = "TUBESCORE_REFRESH_TOKEN";
const API_KEY_VAR: &str = "TUBESCORE_API_KEY";
const TOKEN_HELPER_VAR: &str = "TUBESCORE_TOKEN_HELPER";
const TOKENS_PATH_VAR: &str = "TUBESCORE_TOKENS_PATH";
const MASTODON_URL_VAR: &str = "TUBESCORE_MASTODON_URL";
const MASTODON_TOKEN_VAR: &str = "TUBESCORE_MASTODON_TOKEN";

const DEFAULT_TOKENS_PATH: &str = "tokens.json";
const DEFAULT_MASTODON_URL: &str = "https://mastodon.social";

/// Runtime settings for the program.
///
/// Everything that used to be ambient — API credentials, the token store
/// location, the Mastodon instance — lives here and is passed explicitly
/// to the constructors that need it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    /// Account name used to key entries in the token store.
    pub username: String,

    /// OAuth client ID for the refresh grant.
    pub client_id: String,

    /// OAuth client secret for the refresh grant.
    pub client_secret: String,

    /// Long-lived OAuth refresh token, if one has been issued.
    pub refresh_token: String,

    /// YouTube Data API key.
    pub api_key: String,

    /// Path to an executable that mints a fresh credential JSON on stdout.
    pub token_helper: Option<PathBuf>,

    /// Path to the persisted token store.
    pub tokens_path: PathBuf,

    /// Base URL of the Mastodon instance to post to.
    pub mastodon_url: String,

    /// Mastodon API access token.
    pub mastodon_token: String,
}

impl Settings {
    /// Builds settings from `TUBESCORE_*` environment variables.
    ///
    /// Only `$TUBESCORE_USERNAME` is required; every other variable falls
    /// back to an empty value or a sensible default, and the operations
    /// that need them will fail in their own ways if they are absent.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            username: require(USERNAME_VAR)?,
            client_id: optional(CLIENT_ID_VAR),
            client_secret: optional(CLIENT_SECRET_VAR),
            refresh_token: optional(REFRESH_TOKEN_VAR),
            api_key: optional(API_KEY_VAR),
            token_helper: env::var_os(TOKEN_HELPER_VAR).map(PathBuf::from),
            tokens_path: env::var_os(TOKENS_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKENS_PATH)),
            mastodon_url: env::var(MASTODON_URL_VAR)
                .unwrap_or_else(|_| String::from(DEFAULT_MASTODON_URL)),
            mastodon_token: optional(MASTODON_TOKEN_VAR),
        })
    }
}

fn require(var: &str) -> Result<String, Error> {
    env::var(var).map_err(|source| Error::Env {
        var: String::from(var),
        source,
    })
}

fn optional(var: &str) -> String {
    env::var(var).unwrap_or_default()
}

/// Indicates an error reading settings from the environment.
#[derive(Debug, Error)]
pub enum Error {
    /// A required environment variable could not be read.
    #[error("could not read ${var}: {source}")]
    Env {
        var: String,
        source: env::VarError,
    },
}
