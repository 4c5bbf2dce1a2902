//! Quetz API session.
//!
//! Low-level HTTP client that owns the transport configuration and the
//! credential. Higher-level operations are implemented via traits and
//! functions on the record types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Client, ClientBuilder, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::decode::{decode_response, Record};
use crate::error::{QuetzError, Result};

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const USER_AGENT: &str = concat!("quetz-client/", env!("CARGO_PKG_VERSION"));
const LOGIN_PATH: &str = "api/login";

/// Header carrying a static API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// How the session authenticates its requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `X-API-Key: <key>`
    ApiKey,
    /// `Authorization: Bearer <token>` obtained from a login exchange.
    Bearer,
}

/// An authenticated Quetz session.
///
/// Every request sent through the session carries the credential it was
/// built with. The session is immutable after construction.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use quetz_client::QuetzClient;
///
/// # async fn example() -> quetz_client::Result<()> {
/// // Static API key, no network call
/// let client = QuetzClient::from_api_key("https://quetz.example.com", "my-key")?;
///
/// // Username/password exchanged for a token
/// let client =
///     QuetzClient::from_credentials("https://quetz.example.com", "alice", "secret").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QuetzClient {
    http: Client,
    base_url: Arc<Url>,
    auth: AuthScheme,
}

impl std::fmt::Debug for QuetzClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuetzClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

impl Record for LoginResponse {
    const KIND: &'static str = "login response";
}

impl QuetzClient {
    /// Create a session from environment variables.
    ///
    /// Uses `QUETZ_API_KEY` for authentication and optionally
    /// `QUETZ_SERVER_URL` for the base URL (defaults to
    /// `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns an error if `QUETZ_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("QUETZ_API_KEY").map_err(|_| {
            QuetzError::Config("QUETZ_API_KEY environment variable not set".to_string())
        })?;
        let base_url =
            env::var("QUETZ_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        Self::from_api_key(&base_url, &api_key)
    }

    /// Create a session that sends `X-API-Key: <api_key>` on every request.
    ///
    /// No request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the key is not a valid
    /// header value.
    pub fn from_api_key(base_url: &str, api_key: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Self::with_credential(
            base_url,
            HeaderName::from_static("x-api-key"),
            api_key,
            AuthScheme::ApiKey,
        )
    }

    /// Exchange a username and password for a session token.
    ///
    /// Performs exactly one `POST /api/login`; the returned session sends
    /// `Authorization: Bearer <token>` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`QuetzError::Authentication`] if the server rejects the
    /// credentials and [`QuetzError::Transport`] if no response arrives.
    #[tracing::instrument(skip(password))]
    pub async fn from_credentials(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = Self::builder().build()?;

        let response = http
            .post(base_url.join(LOGIN_PATH)?)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(QuetzError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        let login: LoginResponse = decode_response(response).await?;
        tracing::debug!("credential exchange succeeded");

        Self::with_credential(
            base_url,
            AUTHORIZATION,
            &format!("Bearer {}", login.token),
            AuthScheme::Bearer,
        )
    }

    fn builder() -> ClientBuilder {
        Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
    }

    fn with_credential(
        base_url: Url,
        header: HeaderName,
        value: &str,
        auth: AuthScheme,
    ) -> Result<Self> {
        let mut value = HeaderValue::from_str(value).map_err(|_| {
            QuetzError::Config(format!("credential is not a valid {header} header value"))
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header, value);

        let http = Self::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            auth,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the authentication scheme of this session.
    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self.http.get(url).send().await?;
        Self::check_response(response, path).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self.http.get(url).query(query).send().await?;
        Self::check_response(response, path).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self.http.put(url).json(body).send().await?;
        Self::check_response(response, path).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self.http.post(url).json(body).send().await?;
        Self::check_response(response, path).await
    }

    /// Make a POST request with a multipart body and query parameters.
    #[tracing::instrument(skip(self, query, form))]
    pub async fn post_multipart<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        form: Form,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self
            .http
            .post(url)
            .query(query)
            .multipart(form)
            .send()
            .await?;
        Self::check_response(response, path).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self.http.delete(url).send().await?;
        Self::check_response(response, path).await
    }

    /// Make a DELETE request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn delete_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self.http.delete(url).query(query).send().await?;
        Self::check_response(response, path).await
    }

    /// Check response status; a failure keeps the raw response body.
    async fn check_response(response: Response, path: &str) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        Err(QuetzError::Api {
            status: status.as_u16(),
            path: path.to_string(),
            body,
        })
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let base_url = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Ok(Url::parse(&base_url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug_hides_credential() {
        let client = QuetzClient::from_api_key("https://quetz.example.com", "secret-key").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("QuetzClient"));
        assert!(debug.contains("base_url"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = QuetzClient::from_api_key("https://quetz.example.com/quetz", "k").unwrap();
        let client2 = QuetzClient::from_api_key("https://quetz.example.com/quetz/", "k").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
        assert_eq!(
            client1.base_url().join("api/channels").unwrap().as_str(),
            "https://quetz.example.com/quetz/api/channels"
        );
    }

    #[test]
    fn test_from_api_key_scheme() {
        let client = QuetzClient::from_api_key("http://127.0.0.1:1", "abc").unwrap();
        assert_eq!(client.auth_scheme(), AuthScheme::ApiKey);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = QuetzClient::from_api_key("not a url", "abc").unwrap_err();
        assert!(matches!(err, QuetzError::InvalidUrl(_)));
    }

    #[test]
    fn test_invalid_api_key_header() {
        let err = QuetzClient::from_api_key("http://localhost:8000", "bad\nkey").unwrap_err();
        assert!(matches!(err, QuetzError::Config(_)));
    }
}
