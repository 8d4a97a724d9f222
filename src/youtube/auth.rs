//! OAuth credential management for the YouTube Data API.
//!
//! The [`Authenticator`] owns the credential lifecycle: it seeds itself
//! from the persisted token store, exchanges the refresh token for a new
//! access token when asked, falls back to an external token-minting
//! helper, and writes every successful update back to the store. Both
//! acquisition paths are best-effort; callers get a boolean and the
//! previous credentials survive any failure.

use crate::conf::Settings;
use crate::http::{HTTPError, HTTPResult, HTTPService};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Google's OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// The default upper bound on a token helper invocation.
const HELPER_TIMEOUT: Duration = Duration::from_secs(10);

/// An OAuth credential set for one account.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(default)]
    access_token: String,

    #[serde(default)]
    refresh_token: String,

    #[serde(default)]
    token_type: String,

    #[serde(default)]
    scope: String,

    // Arrives as `expires_in` or `expiry_date`, as a number or a
    // string; normalized to a string-encoded integer either way.
    #[serde(default, alias = "expiry_date", deserialize_with = "expiry_as_string")]
    expires_in: String,

    #[serde(default)]
    client_id: String,

    #[serde(default)]
    client_secret: String,

    #[serde(default, alias = "key")]
    api_key: String,
}

impl Credentials {
    /// Decodes a credential set from a JSON payload.
    ///
    /// Decoding succeeds for any JSON object; use [`Credentials::is_valid`]
    /// to find out whether the payload actually carried a usable token.
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// True if the credential set carries everything a bearer request needs.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.token_type.is_empty() && !self.scope.is_empty()
    }

    /// The access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The refresh token, possibly empty.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// The token's remaining lifetime in seconds, as reported by the
    /// provider, string-encoded. Empty if the provider did not say.
    pub fn expires_in(&self) -> &str {
        &self.expires_in
    }

    /// Overlays a freshly acquired credential set onto this one.
    ///
    /// The refresh token is only replaced when the fresh set actually
    /// carries one; refresh grants usually do not echo it back.
    fn accept(&mut self, fresh: Credentials) {
        self.access_token = fresh.access_token;
        self.token_type = fresh.token_type;
        self.scope = fresh.scope;
        self.expires_in = fresh.expires_in;
        if !fresh.refresh_token.is_empty() {
            self.refresh_token = fresh.refresh_token;
        }
    }
}

fn expiry_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Expiry {
        Seconds(u64),
        Text(String),
    }

    Ok(match Option::<Expiry>::deserialize(deserializer)? {
        Some(Expiry::Seconds(seconds)) => seconds.to_string(),
        Some(Expiry::Text(text)) => text,
        None => String::new(),
    })
}

/// The persisted credential store: a JSON file keyed by username.
///
/// The file is read once at startup and overwritten wholesale on every
/// successful credential update.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    entries: HashMap<String, Credentials>,
}

impl TokenStore {
    /// Loads the store at `path`. A store that does not exist yet is
    /// treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, entries })
    }

    /// The credentials stored for `username`, if any.
    pub fn get(&self, username: &str) -> Option<&Credentials> {
        self.entries.get(username)
    }

    /// Replaces the credentials stored for `username` and rewrites the
    /// whole store file.
    pub fn put(&mut self, username: &str, credentials: Credentials) -> Result<(), StoreError> {
        self.entries.insert(String::from(username), credentials);
        self.save()
    }

    fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Indicates an error reading or writing the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read or written.
    #[error("could not access token store: {0}")]
    Io(#[from] io::Error),

    /// The store file was not valid credential JSON.
    #[error("could not decode token store: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The form body of an OAuth2 refresh grant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RefreshRequest {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    grant_type: &'static str,
}

impl RefreshRequest {
    fn for_credentials(credentials: &Credentials) -> Self {
        Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            refresh_token: credentials.refresh_token.clone(),
            grant_type: "refresh_token",
        }
    }

    /// The refresh token being exchanged.
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

/// A service that exchanges a refresh token for a fresh credential payload.
///
/// Production code uses [`GoogleTokenService`]; tests substitute a
/// deterministic implementation.
pub trait TokenService {
    /// Performs the refresh grant and returns the provider's raw JSON
    /// response body.
    fn refresh(&self, request: &RefreshRequest) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A token service that contacts Google's OAuth2 endpoint directly.
#[derive(Debug)]
pub struct GoogleTokenService {
    client: reqwest::Client,
    token_url: String,
}

impl Default for GoogleTokenService {
    fn default() -> Self {
        Self {
            client: Self::client(),
            token_url: String::from(GOOGLE_TOKEN_URL),
        }
    }
}

impl HTTPService for GoogleTokenService {}

impl TokenService for GoogleTokenService {
    async fn refresh(&self, request: &RefreshRequest) -> HTTPResult<String> {
        let response = self
            .client
            .post(&self.token_url)
            .form(request)
            .send()
            .await
            .map_err(HTTPError::Request)?;

        if !response.status().is_success() {
            return Err(HTTPError::Http(response.status()));
        }

        response.text().await.map_err(HTTPError::Body)
    }
}

/// Manages the OAuth token lifecycle for one account.
#[derive(Debug)]
pub struct Authenticator<S: TokenService> {
    username: String,
    credentials: Credentials,
    store: TokenStore,
    helper: Option<PathBuf>,
    helper_timeout: Duration,
    service: S,
    authenticated: bool,
}

impl Authenticator<GoogleTokenService> {
    /// Creates an authenticator backed by Google's token endpoint.
    ///
    /// Client credentials come from `settings`; the access token, scope,
    /// and token type are seeded from the store entry for the settings'
    /// username, when a valid one exists.
    pub fn new(settings: &Settings, store: TokenStore) -> Self {
        Self::with_service(settings, store, GoogleTokenService::default())
    }
}

impl<S: TokenService> Authenticator<S> {
    /// Creates an authenticator that acquires tokens through `service`.
    pub fn with_service(settings: &Settings, store: TokenStore, service: S) -> Self {
        let mut credentials = Credentials {
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            refresh_token: settings.refresh_token.clone(),
            api_key: settings.api_key.clone(),
            ..Credentials::default()
        };

        if let Some(stored) = store.get(&settings.username) {
            if stored.is_valid() {
                credentials.access_token = stored.access_token.clone();
                credentials.scope = stored.scope.clone();
                credentials.token_type = stored.token_type.clone();
                if credentials.refresh_token.is_empty() {
                    credentials.refresh_token = stored.refresh_token.clone();
                }
            }
        }

        Self {
            username: settings.username.clone(),
            credentials,
            store,
            helper: settings.token_helper.clone(),
            helper_timeout: HELPER_TIMEOUT,
            service,
            authenticated: false,
        }
    }

    /// Sets the bound on token helper invocations.
    pub fn with_helper_timeout(self, helper_timeout: Duration) -> Self {
        Self {
            helper_timeout,
            ..self
        }
    }

    /// The `Authorization` header value for the current access token.
    ///
    /// No side effects: if no token has been acquired, the bare
    /// `"Bearer "` prefix comes back and the request will fail on its own.
    pub fn bearer_token(&self) -> String {
        format!("Bearer {}", self.credentials.access_token)
    }

    /// The configured API key.
    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    /// True if a token has been acquired during this run.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Makes sure a usable access token is on hand.
    ///
    /// Tries the refresh grant first (skipped when `force_refresh` is
    /// set or no refresh token is present), then the external token
    /// helper. Every failure along the way is logged and swallowed;
    /// `false` means both paths failed and the previous credentials are
    /// untouched.
    pub async fn ensure_token(&mut self, force_refresh: bool) -> bool {
        if !force_refresh
            && !self.credentials.refresh_token.is_empty()
            && self.refresh_grant().await
        {
            return true;
        }
        self.mint_fresh().await
    }

    async fn refresh_grant(&mut self) -> bool {
        let request = RefreshRequest::for_credentials(&self.credentials);
        let body = match self.service.refresh(&request).await {
            Ok(body) => body,
            Err(err) => {
                warn!("token refresh failed: {err}");
                return false;
            }
        };
        self.accept(&body)
    }

    async fn mint_fresh(&mut self) -> bool {
        let Some(helper) = &self.helper else {
            debug!("no token helper configured");
            return false;
        };

        let output = match timeout(self.helper_timeout, Command::new(helper).output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                warn!("could not run token helper {}: {err}", helper.display());
                return false;
            }
            Err(_) => {
                warn!("token helper {} timed out", helper.display());
                return false;
            }
        };

        if !output.status.success() {
            warn!("token helper {} exited with {}", helper.display(), output.status);
            return false;
        }

        let body = String::from_utf8_lossy(&output.stdout);
        self.accept(&body)
    }

    /// Applies a credential payload, persisting on success.
    fn accept(&mut self, body: &str) -> bool {
        let fresh = match Credentials::parse(body) {
            Ok(fresh) => fresh,
            Err(err) => {
                warn!("could not decode credential payload: {err}");
                return false;
            }
        };

        if !fresh.is_valid() {
            warn!("credential payload is missing required fields");
            return false;
        }

        self.credentials.accept(fresh);
        self.authenticated = true;

        if let Err(err) = self.store.put(&self.username, self.credentials.clone()) {
            // The in-memory token is still good for this run.
            warn!("could not persist credentials: {err}");
        }

        true
    }
}
