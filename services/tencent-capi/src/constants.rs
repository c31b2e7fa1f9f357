// Headers used by the TC3 protocol.
pub const X_TC_ACTION: &str = "x-tc-action";
pub const X_TC_TIMESTAMP: &str = "x-tc-timestamp";
pub const X_TC_VERSION: &str = "x-tc-version";
pub const X_TC_TOKEN: &str = "x-tc-token";
pub const X_TC_REGION: &str = "x-tc-region";
pub const X_TC_LANGUAGE: &str = "x-tc-language";

// Content types.
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";

// TC3 signing constants.
pub const TC3_ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const TC3_REQUEST: &str = "tc3_request";
pub const TC3_KEY_PREFIX: &str = "TC3";
pub const TC3_SIGNED_HEADERS: &str = "content-type;host";

// Protocol fields injected by the legacy signer.
pub const PARAM_ACTION: &str = "Action";
pub const PARAM_NONCE: &str = "Nonce";
pub const PARAM_TIMESTAMP: &str = "Timestamp";
pub const PARAM_VERSION: &str = "Version";
pub const PARAM_SECRET_ID: &str = "SecretId";
pub const PARAM_REGION: &str = "Region";
pub const PARAM_TOKEN: &str = "Token";
pub const PARAM_LANGUAGE: &str = "Language";
pub const PARAM_SIGNATURE_METHOD: &str = "SignatureMethod";
pub const PARAM_SIGNATURE: &str = "Signature";

// Env values used in tencent cloud services.
pub const TENCENTCLOUD_REGION: &str = "TENCENTCLOUD_REGION";
pub const TKE_REGION: &str = "TKE_REGION";
pub const TENCENTCLOUD_SECRET_ID: &str = "TENCENTCLOUD_SECRET_ID";
pub const TKE_SECRET_ID: &str = "TKE_SECRET_ID";
pub const TENCENTCLOUD_SECRET_KEY: &str = "TENCENTCLOUD_SECRET_KEY";
pub const TKE_SECRET_KEY: &str = "TKE_SECRET_KEY";
pub const TENCENTCLOUD_TOKEN: &str = "TENCENTCLOUD_TOKEN";
pub const TENCENTCLOUD_SECURITY_TOKEN: &str = "TENCENTCLOUD_SECURITY_TOKEN";

// Defaults of the API client.
pub const DEFAULT_SERVICE: &str = "teo";
pub const DEFAULT_VERSION: &str = "2022-09-01";
pub const DEFAULT_REGION: &str = "ap-guangzhou";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_PROTOCOL: &str = "https://";
pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const ENDPOINT_SUFFIX: &str = "tencentcloudapi.com";
