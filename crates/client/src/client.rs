//! HTTP session shared by every resource method.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{ClientConfig, ClientError};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-n8n-api-key";

/// Typed client for the remote platform.
///
/// Holds one pooled HTTP session owned by this instance alone. The type is
/// not `Clone`; share it through an `Arc` if several tasks need it.
/// Dropping the client or calling [`Client::shutdown`] releases it.
///
/// ```compile_fail
/// fn requires_clone<T: Clone>() {}
/// requires_clone::<client::Client>();
/// ```
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base: Url,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Config(format!("'{}' cannot be used as a base URL", config.base_url)));
        }

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ClientError::Config("API key is not a valid header value".into()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Build)?;

        debug!(base_url = %base, "client created");
        Ok(Self { http, base })
    }

    /// Build a client from `N8N_*` environment variables and defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Release the HTTP session. Consuming `self` makes a second release
    /// impossible.
    pub fn shutdown(self) {
        debug!(base_url = %self.base, "client shut down");
    }

    // -----------------------------------------------------------------------
    //  Request plumbing
    // -----------------------------------------------------------------------

    /// Start a request to `base_url` joined with `segments`.
    ///
    /// Each segment is percent-encoded, so ids and emails are safe to pass.
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("'{}' cannot be used as a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(self.http.request(method, url))
    }

    /// Send the request and fail on any non-2xx status.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = request.build().map_err(ClientError::from_reqwest)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = response.status();
        if status.is_success() {
            debug!(%method, %path, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        warn!(%method, %path, status = status.as_u16(), "remote service rejected request");
        match response.text().await {
            Ok(body) => Err(ClientError::api(status, body)),
            Err(e) => Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("<unreadable body: {e}>"),
                body: String::new(),
            }),
        }
    }

    /// Send and decode a JSON success body into `T`.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(ClientError::from_reqwest)?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    /// Send and discard the success body.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<(), ClientError> {
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> Client {
        let cfg = ClientConfig::builder()
            .base_url(base_url)
            .build_with(|_| None)
            .unwrap();
        Client::new(cfg).unwrap()
    }

    #[test]
    fn segments_are_joined_and_encoded() {
        let c = client("http://localhost:5678/api/v1");
        let req = c
            .request(Method::GET, &["users", "a b/c@example.com"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(req.url().path(), "/api/v1/users/a%20b%2Fc@example.com");
    }

    #[test]
    fn root_base_url_has_no_empty_segment() {
        let c = client("http://localhost:5678");
        let req = c.request(Method::GET, &["tags"]).unwrap().build().unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:5678/tags");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let cfg = ClientConfig::builder()
            .base_url("not a url")
            .build_with(|_| None)
            .unwrap();
        assert!(matches!(Client::new(cfg), Err(ClientError::Config(_))));
    }

    #[test]
    fn rejects_api_key_with_control_characters() {
        let cfg = ClientConfig::builder()
            .api_key("bad\nkey")
            .build_with(|_| None)
            .unwrap();
        assert!(matches!(Client::new(cfg), Err(ClientError::Config(_))));
    }
}
