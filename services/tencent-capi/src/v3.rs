//! TC3-HMAC-SHA256 signature.
//!
//! - [Signature v3](https://cloud.tencent.com/document/api/213/30654)

use crate::constants::*;
use crate::multipart::MultipartForm;
use crate::Credential;
use capisign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use capisign_core::time::{format_date, from_timestamp};
use capisign_core::{Error, Result, SigningStage};
use http::{Method, Uri};
use log::debug;
use std::fmt::Write;

/// Body of a TC3 request, as the bytes that are sent.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// No body, hashed as the empty string.
    Empty,
    /// Serialized JSON body.
    Json(&'a [u8]),
    /// `multipart/form-data` body.
    Multipart(&'a MultipartForm),
}

/// Everything a TC3 signature covers apart from the credential.
#[derive(Debug, Clone)]
pub struct SigningContext<'a> {
    /// Service name, like `cvm`.
    pub service: &'a str,
    /// HTTP method, `GET` or `POST`.
    pub method: Method,
    /// Request url, with the query exactly as sent.
    pub url: &'a Uri,
    /// Request body.
    pub payload: Payload<'a>,
    /// Epoch seconds, sent as `X-TC-Timestamp`.
    pub timestamp: i64,
}

impl SigningContext<'_> {
    /// UTC date of the timestamp: `2020-01-01`
    pub fn date(&self) -> Result<String> {
        Ok(format_date(from_timestamp(self.timestamp)?))
    }
}

/// Build the canonical header block, newline terminated.
///
/// Only `content-type` and `host` are signed, always in that order.
pub fn canonical_headers(method: &Method, payload: &Payload<'_>, host: &str) -> Result<String> {
    let content_type = match (method, payload) {
        (&Method::GET, Payload::Multipart(_)) => {
            return Err(Error::signing(
                SigningStage::Payload,
                "multipart payload requires POST",
            ))
        }
        (&Method::GET, _) => CONTENT_TYPE_FORM.to_string(),
        (&Method::POST, Payload::Multipart(form)) => form.content_type(),
        (&Method::POST, _) => CONTENT_TYPE_JSON.to_string(),
        (m, _) => {
            return Err(Error::signing(
                SigningStage::CanonicalRequest,
                format!("method {m} is not supported, only GET and POST can be signed"),
            ))
        }
    };

    Ok(format!("content-type:{content_type}\nhost:{host}\n"))
}

/// Hex encoded SHA256 of the payload.
pub fn payload_hash(payload: &Payload<'_>) -> String {
    match payload {
        Payload::Empty => hex_sha256(b""),
        Payload::Json(body) => hex_sha256(body),
        Payload::Multipart(form) => form.payload_hash(),
    }
}

/// Build the canonical request string:
///
/// ```text
/// POST
/// /
/// <query>
/// content-type:application/json
/// host:cvm.tencentcloudapi.com
///
/// content-type;host
/// <hashed_payload>
/// ```
pub fn canonical_request(ctx: &SigningContext<'_>) -> Result<String> {
    let host = ctx.url.host().ok_or_else(|| {
        Error::signing(SigningStage::CanonicalRequest, "url without host can't be signed")
    })?;
    let headers = canonical_headers(&ctx.method, &ctx.payload, host)?;

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);
    writeln!(f, "{}", ctx.method)?;
    writeln!(f, "{}", ctx.url.path())?;
    writeln!(f, "{}", ctx.url.query().unwrap_or_default())?;
    writeln!(f, "{headers}")?;
    writeln!(f, "{TC3_SIGNED_HEADERS}")?;
    write!(f, "{}", payload_hash(&ctx.payload))?;

    Ok(f)
}

/// Credential scope: `<date>/<service>/tc3_request`
pub fn credential_scope(date: &str, service: &str) -> String {
    format!("{date}/{service}/{TC3_REQUEST}")
}

/// Build the string to sign:
///
/// ```text
/// TC3-HMAC-SHA256
/// 1577836800
/// 2020-01-01/cvm/tc3_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(timestamp: i64, scope: &str, canonical_request: &str) -> String {
    format!(
        "{TC3_ALGORITHM}\n{timestamp}\n{scope}\n{}",
        hex_sha256(canonical_request.as_bytes())
    )
}

/// Derive the request scoped signing key.
///
/// `TC3<secret>` signs the date, each following stage takes the raw bytes
/// of the previous one as key.
pub fn signing_key(secret_key: &str, date: &str, service: &str) -> Result<Vec<u8>> {
    let derive = || -> Result<Vec<u8>> {
        let secret = format!("{TC3_KEY_PREFIX}{secret_key}");
        let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes())?;
        let sign_service = hmac_sha256(&sign_date, service.as_bytes())?;
        hmac_sha256(&sign_service, TC3_REQUEST.as_bytes())
    };

    derive().map_err(|e| {
        Error::signing(SigningStage::KeyDerivation, "failed to derive signing key").with_source(e)
    })
}

/// Sign the request, returning the value of the `Authorization` header.
///
/// Fails fast if the secret id or secret key is empty instead of emitting a
/// credential the service is bound to reject.
pub fn sign(ctx: &SigningContext<'_>, cred: &Credential) -> Result<String> {
    let secret_id = cred.require_secret_id()?;
    let secret_key = cred.require_secret_key()?;

    let creq = canonical_request(ctx)?;
    debug!("calculated canonical request: {creq}");

    let date = ctx.date()?;
    let scope = credential_scope(&date, ctx.service);
    debug!("calculated scope: {scope}");

    let string_to_sign = string_to_sign(ctx.timestamp, &scope, &creq);
    debug!("calculated string to sign: {string_to_sign}");

    let key = signing_key(secret_key, &date, ctx.service)?;
    let signature = hex_hmac_sha256(&key, string_to_sign.as_bytes()).map_err(|e| {
        Error::signing(SigningStage::Signature, "failed to compute signature").with_source(e)
    })?;

    Ok(format!(
        "{TC3_ALGORITHM} Credential={secret_id}/{scope}, SignedHeaders={TC3_SIGNED_HEADERS}, Signature={signature}"
    ))
}
