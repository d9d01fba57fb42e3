use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{ApiResponse, RequestDescriptor};
use crate::app::ConfigStore;
use crate::constants::{CONTENT_TYPE_JSON, UNREACHABLE_NOTICE};
use crate::session::SessionStore;
use crate::utils::{DormError, Result};

/// Join a base address and a request path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Session-aware HTTP client for the dormitory backend.
///
/// Every call resolves the current base address, attaches the stored session
/// cookie and stores any cookie the server sends back. Only transport
/// failures are errors; any HTTP response, whatever its status or envelope
/// code, is handed back to the caller.
pub struct ApiClient {
    http: Client,
    config: Arc<ConfigStore>,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client that relies on the transport's own timeouts
    pub fn new(config: Arc<ConfigStore>, session: Arc<SessionStore>) -> Result<Self> {
        Self::with_timeout(config, session, None)
    }

    pub fn with_timeout(
        config: Arc<ConfigStore>,
        session: Arc<SessionStore>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DormError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    /// Full URL for `path` under the current base address
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.base_address(), path)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    /// Issue a JSON call
    pub async fn call(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        let headers = self.outgoing_headers(true, &request.extra_headers)?;

        debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method, &url).headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        self.dispatch(builder, url).await
    }

    /// Upload a file as a multipart form with a single file field
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<ApiResponse> {
        let url = self.url_for(path);
        // multipart sets its own Content-Type with the boundary
        let headers = self.outgoing_headers(false, &BTreeMap::new())?;
        let form = Form::new().part(
            field.to_string(),
            Part::bytes(contents).file_name(file_name.to_string()),
        );

        debug!("POST {} (multipart field {})", url, field);

        let builder = self.http.post(&url).headers(headers).multipart(form);
        self.dispatch(builder, url).await
    }

    /// Default headers, then the stored cookie, then caller overrides
    fn outgoing_headers(&self, json: bool, extra: &BTreeMap<String, String>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if json {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        }
        if let Some(cookie) = self.session.cookie() {
            headers.insert(COOKIE, header_value(COOKIE.as_str(), &cookie)?);
        }
        for (name, value) in extra {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| DormError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value(name, value)?);
        }
        Ok(headers)
    }

    async fn dispatch(&self, builder: RequestBuilder, url: String) -> Result<ApiResponse> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Err(transport_failure(url, e)),
        };

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        self.capture_cookie(&headers);

        let body = response.bytes().await.map_err(|e| transport_failure(url.clone(), e))?;

        debug!("{} -> {} ({} bytes)", url, status, body.len());

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// Store the last Set-Cookie value, if any
    fn capture_cookie(&self, headers: &HeaderMap) {
        let Some(value) = headers.get_all(SET_COOKIE).iter().last() else {
            return;
        };

        match value.to_str() {
            Ok(cookie) => {
                if let Err(e) = self.session.set_cookie(cookie) {
                    warn!("Failed to persist session cookie: {}", e);
                }
            }
            Err(_) => warn!("Ignoring non-ASCII Set-Cookie header"),
        }
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| DormError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn transport_failure(url: String, err: reqwest::Error) -> DormError {
    warn!("{} ({}): {}", UNREACHABLE_NOTICE, url, err);
    DormError::Unreachable {
        url,
        reason: err.to_string(),
    }
}
