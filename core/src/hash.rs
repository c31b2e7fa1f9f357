//! Hash related utils.

use crate::Error;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::digest::KeyInit;
use hmac::Hmac;
use hmac::Mac;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;
use std::fmt;

/// Hash algorithms supported by the signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha1 => write!(f, "SHA-1"),
            HashAlgorithm::Sha256 => write!(f, "SHA-256"),
        }
    }
}

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 decode
pub fn base64_decode(content: &str) -> crate::Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(content)
        .map_err(|e| Error::unexpected("base64 decode failed").with_source(e))
}

/// Digest of content with given algorithm.
pub fn digest(algorithm: HashAlgorithm, content: &[u8]) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Sha1 => Sha1::digest(content).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(content).to_vec(),
    }
}

/// Hex encoded digest of content with given algorithm.
pub fn hex_digest(algorithm: HashAlgorithm, content: &[u8]) -> String {
    hex::encode(digest(algorithm, content))
}

/// Hex encoded SHA256 hash.
///
/// Use this function instead of `hex::encode(sha256(content))` can reduce
/// extra copy.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content).as_slice())
}

fn mac<M: Mac + KeyInit>(
    algorithm: HashAlgorithm,
    key: &[u8],
    content: &[u8],
) -> crate::Result<Vec<u8>> {
    let mut h = <M as KeyInit>::new_from_slice(key).map_err(|e| {
        Error::unexpected(format!("hmac {algorithm} rejected the signing key"))
            .with_source(anyhow::anyhow!("{e}"))
    })?;
    h.update(content);

    Ok(h.finalize().into_bytes().to_vec())
}

/// HMAC of content with given algorithm.
pub fn hmac(algorithm: HashAlgorithm, key: &[u8], content: &[u8]) -> crate::Result<Vec<u8>> {
    match algorithm {
        HashAlgorithm::Sha1 => mac::<Hmac<Sha1>>(algorithm, key, content),
        HashAlgorithm::Sha256 => mac::<Hmac<Sha256>>(algorithm, key, content),
    }
}

/// Hex encoded HMAC of content with given algorithm.
pub fn hex_hmac(algorithm: HashAlgorithm, key: &[u8], content: &[u8]) -> crate::Result<String> {
    hmac(algorithm, key, content).map(hex::encode)
}

/// Base64 encoded HMAC of content with given algorithm.
pub fn base64_hmac(algorithm: HashAlgorithm, key: &[u8], content: &[u8]) -> crate::Result<String> {
    hmac(algorithm, key, content).map(|v| base64_encode(&v))
}

/// HMAC with SHA256 hash.
pub fn hmac_sha256(key: &[u8], content: &[u8]) -> crate::Result<Vec<u8>> {
    hmac(HashAlgorithm::Sha256, key, content)
}

/// Hex encoded HMAC with SHA256 hash.
///
/// Use this function instead of `hex::encode(hmac_sha256(key, content))` can
/// reduce extra copy.
pub fn hex_hmac_sha256(key: &[u8], content: &[u8]) -> crate::Result<String> {
    hex_hmac(HashAlgorithm::Sha256, key, content)
}
