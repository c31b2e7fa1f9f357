use crate::constants::TC3_ALGORITHM;
use capisign_core::hash::HashAlgorithm;
use capisign_core::{Error, Result, SigningStage};
use std::fmt;
use std::str::FromStr;

/// Signature methods accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureMethod {
    /// Legacy signature, HMAC-SHA1 over the sorted query string.
    HmacSha1,
    /// Legacy signature, HMAC-SHA256 over the sorted query string.
    #[default]
    HmacSha256,
    /// Date-scoped TC3-HMAC-SHA256 signature.
    Tc3HmacSha256,
}

impl SignatureMethod {
    /// Name of the method on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HmacSHA1",
            SignatureMethod::HmacSha256 => "HmacSHA256",
            SignatureMethod::Tc3HmacSha256 => TC3_ALGORITHM,
        }
    }

    /// Returns true if this method is handled by the legacy signer.
    pub fn is_legacy(&self) -> bool {
        !matches!(self, SignatureMethod::Tc3HmacSha256)
    }

    /// Hash algorithm used by the legacy signer for this method.
    ///
    /// TC3 has no single legacy hash, asking for one is a signing error.
    pub fn legacy_hash(&self) -> Result<HashAlgorithm> {
        match self {
            SignatureMethod::HmacSha1 => Ok(HashAlgorithm::Sha1),
            SignatureMethod::HmacSha256 => Ok(HashAlgorithm::Sha256),
            SignatureMethod::Tc3HmacSha256 => Err(Error::signing(
                SigningStage::Algorithm,
                format!("{TC3_ALGORITHM} is not a legacy signature method"),
            )),
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "HmacSHA1" => Ok(SignatureMethod::HmacSha1),
            "HmacSHA256" => Ok(SignatureMethod::HmacSha256),
            TC3_ALGORITHM => Ok(SignatureMethod::Tc3HmacSha256),
            v => Err(Error::config_invalid(format!(
                "signature method {v} is not supported"
            ))),
        }
    }
}
