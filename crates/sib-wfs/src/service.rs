//! Transport seam between the WFS client and the publicWFS.
//!
//! [`FeatureService`] is the only place responses enter the crate; tests swap
//! the HTTP implementation for canned documents.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use sib_filter::CompiledFilter;

use crate::error::{Result, WfsError};
use crate::requests;

/// User agent string for publicWFS requests.
const USER_AGENT_VALUE: &str = concat!("sibtools/", env!("CARGO_PKG_VERSION"));

/// Raw request/response operations of the publicWFS.
///
/// Every method returns the undecoded response document.
pub trait FeatureService {
    /// DescribeFeatureType for one feature type.
    fn fetch_schema(&self, feature_type: &str) -> Result<String>;

    /// GetFeature for one feature type, optionally restricted by `filter`.
    fn fetch_features(&self, feature_type: &str, filter: Option<&CompiledFilter>)
    -> Result<String>;

    /// GetCapabilities.
    fn fetch_capabilities(&self) -> Result<String>;

    /// Post an arbitrary request document, such as a transaction.
    fn post(&self, body: &str) -> Result<String>;
}

impl<T: FeatureService + ?Sized> FeatureService for &T {
    fn fetch_schema(&self, feature_type: &str) -> Result<String> {
        (**self).fetch_schema(feature_type)
    }

    fn fetch_features(
        &self,
        feature_type: &str,
        filter: Option<&CompiledFilter>,
    ) -> Result<String> {
        (**self).fetch_features(feature_type, filter)
    }

    fn fetch_capabilities(&self) -> Result<String> {
        (**self).fetch_capabilities()
    }

    fn post(&self, body: &str) -> Result<String> {
        (**self).post(body)
    }
}

/// Where the publicWFS lives and how to log in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Blocking SOAP-over-HTTP implementation of [`FeatureService`].
#[derive(Debug, Clone)]
pub struct HttpService {
    client: reqwest::blocking::Client,
    config: ConnectionConfig,
}

impl HttpService {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(WfsError::Config("publicWFS URL is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| WfsError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn request(&self, operation: &str, body: String) -> Result<String> {
        debug!(operation, url = %self.config.url, bytes = body.len(), "publicWFS request");

        let mut request = self.client.post(&self.config.url).body(body);
        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(WfsError::Transport(format!(
                "{operation} failed ({status}): {}",
                crate::xml::excerpt(&body)
            )));
        }

        let text = response.text()?;
        debug!(operation, bytes = text.len(), "publicWFS response");
        Ok(text)
    }
}

impl FeatureService for HttpService {
    fn fetch_schema(&self, feature_type: &str) -> Result<String> {
        self.request(
            "DescribeFeatureType",
            requests::describe_feature_type(feature_type)?,
        )
    }

    fn fetch_features(
        &self,
        feature_type: &str,
        filter: Option<&CompiledFilter>,
    ) -> Result<String> {
        self.request("GetFeature", requests::get_feature(feature_type, filter)?)
    }

    fn fetch_capabilities(&self) -> Result<String> {
        self.request("GetCapabilities", requests::get_capabilities()?)
    }

    fn post(&self, body: &str) -> Result<String> {
        self.request("Post", body.to_string())
    }
}
