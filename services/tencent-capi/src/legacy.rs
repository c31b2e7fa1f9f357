//! Legacy signature: HMAC over the sorted query string.
//!
//! - [Signature](https://cloud.tencent.com/document/api/213/15693)

use crate::constants::*;
use crate::params::FlatParams;
use crate::{Credential, SignatureMethod};
use capisign_core::hash::base64_hmac;
use capisign_core::utils::Redact;
use capisign_core::{Error, Result, SigningStage};
use http::Method;
use log::debug;

/// Protocol fields the legacy signer injects into the parameter set.
#[derive(Debug, Clone)]
pub struct ProtocolFields<'a> {
    /// API action, like `DescribeInstances`.
    pub action: &'a str,
    /// Random nonce in `[0, 65535]`.
    pub nonce: u16,
    /// Epoch seconds.
    pub timestamp: i64,
    /// API version.
    pub version: &'a str,
    /// Region, skipped if absent or empty.
    pub region: Option<&'a str>,
    /// Language, skipped if absent or empty.
    pub language: Option<&'a str>,
    /// Signature method.
    pub sign_method: SignatureMethod,
}

impl ProtocolFields<'_> {
    /// Return a new parameter set with protocol fields added.
    ///
    /// `SecretId` and `Token` are taken from the credential and skipped when
    /// empty, so an anonymous credential never signs an empty `SecretId=`.
    pub fn apply(&self, params: &FlatParams, cred: &Credential) -> FlatParams {
        let mut params = params.clone();
        params.insert(PARAM_ACTION.to_string(), self.action.to_string());
        params.insert(PARAM_NONCE.to_string(), self.nonce.to_string());
        params.insert(PARAM_TIMESTAMP.to_string(), self.timestamp.to_string());
        params.insert(PARAM_VERSION.to_string(), self.version.to_string());

        let optional = [
            (PARAM_SECRET_ID, cred.secret_id()),
            (PARAM_REGION, self.region),
            (PARAM_TOKEN, cred.token()),
            (PARAM_LANGUAGE, self.language),
            (PARAM_SIGNATURE_METHOD, Some(self.sign_method.as_str())),
        ];
        for (k, v) in optional {
            if let Some(v) = v.filter(|v| !v.is_empty()) {
                params.insert(k.to_string(), v.to_string());
            }
        }

        params
    }
}

/// Generate a nonce for the legacy signer.
pub fn random_nonce() -> u16 {
    rand::random::<u16>()
}

/// Build the string to sign: `METHOD + HOST + PATH + "?" + sorted query`.
///
/// Values are used raw, the `Signature` key is never part of the string.
pub fn string_to_sign(method: &Method, host: &str, path: &str, params: &FlatParams) -> String {
    let query = params
        .iter()
        .filter(|(k, _)| !k.is_empty() && k.as_str() != PARAM_SIGNATURE)
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}{host}{path}?{query}", method.as_str())
}

/// String to sign with the `Token` value masked, safe to log.
fn redacted_string_to_sign(
    method: &Method,
    host: &str,
    path: &str,
    params: &FlatParams,
) -> String {
    let mut params = params.clone();
    if let Some(token) = params.get_mut(PARAM_TOKEN) {
        *token = format!("{:?}", Redact::from(token.as_str()));
    }
    string_to_sign(method, host, path, &params)
}

/// Compute the base64 signature of a string to sign.
pub fn signature(
    secret_key: &str,
    string_to_sign: &str,
    sign_method: SignatureMethod,
) -> Result<String> {
    let algorithm = sign_method.legacy_hash()?;
    if secret_key.is_empty() {
        return Err(Error::signing(SigningStage::Credential, "secret key is empty"));
    }

    base64_hmac(algorithm, secret_key.as_bytes(), string_to_sign.as_bytes()).map_err(|e| {
        Error::signing(
            SigningStage::Signature,
            format!("failed to compute {sign_method} signature"),
        )
        .with_source(e)
    })
}

/// Sign a parameter set, returning a new set with `Signature` added.
///
/// `params` must already carry the protocol fields, see [`ProtocolFields`].
pub fn sign(
    method: &Method,
    host: &str,
    path: &str,
    params: &FlatParams,
    cred: &Credential,
    sign_method: SignatureMethod,
) -> Result<FlatParams> {
    // Reject the algorithm before touching any secret material.
    sign_method.legacy_hash()?;
    let secret_key = cred.require_secret_key()?;

    let sign_str = string_to_sign(method, host, path, params);
    debug!(
        "calculated string to sign: {}",
        redacted_string_to_sign(method, host, path, params)
    );

    let signature = signature(secret_key, &sign_str, sign_method)?;

    let mut signed = params.clone();
    signed.insert(PARAM_SIGNATURE.to_string(), signature);
    Ok(signed)
}
