use crate::constants::*;
use crate::endpoint::{endpoint_for, service_of};
use crate::SignatureMethod;
use capisign_core::utils::Redact;
use capisign_core::Context;
use http::{HeaderMap, Method};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Config for Tencent Cloud API clients.
#[derive(Clone)]
pub struct Config {
    /// Endpoint host, like `cvm.tencentcloudapi.com`.
    pub endpoint: String,
    /// API version, like `2017-03-12`.
    pub version: String,
    /// Region of the product, omitted for products without regions.
    pub region: Option<String>,
    /// Language of messages returned by the API, `zh-CN` or `en-US`.
    pub language: Option<String>,
    /// Signature method, defaults to `HmacSHA256`.
    pub sign_method: SignatureMethod,
    /// HTTP method used to send requests, `GET` or `POST`.
    pub req_method: Method,
    /// Protocol prefix, defaults to `https://`.
    pub protocol: String,
    /// Request path, defaults to `/`.
    pub path: String,
    /// Request timeout, carried for the transport layer.
    pub timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: HeaderMap,
    /// Secret ID
    pub secret_id: Option<String>,
    /// Secret Key
    pub secret_key: Option<String>,
    /// Security token for temporary credentials
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_service(DEFAULT_SERVICE)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .field("region", &self.region)
            .field("language", &self.language)
            .field("sign_method", &self.sign_method)
            .field("req_method", &self.req_method)
            .field("protocol", &self.protocol)
            .field("path", &self.path)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers)
            .field("secret_id", &Redact::from(&self.secret_id))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("token", &Redact::from(&self.token))
            .finish()
    }
}

impl Config {
    /// Build the default config of a service.
    ///
    /// The endpoint is resolved from the service endpoint table.
    pub fn for_service(service: &str) -> Self {
        Self {
            endpoint: endpoint_for(service),
            version: DEFAULT_VERSION.to_string(),
            region: Some(DEFAULT_REGION.to_string()),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            sign_method: SignatureMethod::default(),
            req_method: Method::POST,
            protocol: DEFAULT_PROTOCOL.to_string(),
            path: DEFAULT_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            headers: HeaderMap::new(),
            secret_id: None,
            secret_key: None,
            token: None,
        }
    }

    /// Set the API version.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Set the signature method.
    pub fn with_sign_method(mut self, method: SignatureMethod) -> Self {
        self.sign_method = method;
        self
    }

    /// Set the HTTP method used to send requests.
    pub fn with_req_method(mut self, method: Method) -> Self {
        self.req_method = method;
        self
    }

    /// Load config from environment variables.
    ///
    /// Values already present on the config are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if self.secret_id.is_none() {
            self.secret_id = ctx
                .env_var(TENCENTCLOUD_SECRET_ID)
                .or_else(|| ctx.env_var(TKE_SECRET_ID));
        }
        if self.secret_key.is_none() {
            self.secret_key = ctx
                .env_var(TENCENTCLOUD_SECRET_KEY)
                .or_else(|| ctx.env_var(TKE_SECRET_KEY));
        }
        if self.token.is_none() {
            self.token = ctx
                .env_var(TENCENTCLOUD_TOKEN)
                .or_else(|| ctx.env_var(TENCENTCLOUD_SECURITY_TOKEN));
        }
        if self.region.is_none() {
            self.region = ctx
                .env_var(TENCENTCLOUD_REGION)
                .or_else(|| ctx.env_var(TKE_REGION));
        }
        self
    }

    /// Service name used in the TC3 credential scope.
    pub fn service(&self) -> &str {
        service_of(&self.endpoint)
    }

    /// Full url requests are sent to, without query.
    pub fn url(&self) -> String {
        format!("{}{}{}", self.protocol, self.endpoint, self.path)
    }
}
