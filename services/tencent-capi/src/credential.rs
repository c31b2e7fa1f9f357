use crate::Config;
use capisign_core::utils::Redact;
use capisign_core::{Error, Result, SigningStage};
use std::fmt::{Debug, Formatter};

/// Credential for Tencent Cloud API.
#[derive(Default, Clone)]
pub struct Credential {
    /// Secret ID, may be absent when a bearer token is used.
    pub secret_id: Option<String>,
    /// Secret Key
    pub secret_key: String,
    /// Security token for temporary credentials
    pub token: Option<String>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &Redact::from(&self.secret_id))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("token", &Redact::from(&self.token))
            .finish()
    }
}

impl Credential {
    /// Create a new credential with secret id and secret key.
    pub fn new(secret_id: &str, secret_key: &str) -> Self {
        Self {
            secret_id: Some(secret_id.to_string()),
            secret_key: secret_key.to_string(),
            token: None,
        }
    }

    /// Attach a security token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Lift the secrets carried by config into a credential.
    ///
    /// Returns `None` if config carries no secret key.
    pub fn from_config(config: &Config) -> Option<Self> {
        let secret_key = config.secret_key.clone()?;
        Some(Self {
            secret_id: config.secret_id.clone(),
            secret_key,
            token: config.token.clone(),
        })
    }

    /// Secret id, with empty values treated as absent.
    pub fn secret_id(&self) -> Option<&str> {
        self.secret_id.as_deref().filter(|v| !v.is_empty())
    }

    /// Token, with empty values treated as absent.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|v| !v.is_empty())
    }

    /// Secret key, failing if it is empty.
    pub(crate) fn require_secret_key(&self) -> Result<&str> {
        if self.secret_key.is_empty() {
            return Err(Error::signing(
                SigningStage::Credential,
                "secret key is empty",
            ));
        }
        Ok(&self.secret_key)
    }

    /// Secret id, failing if it is absent or empty.
    pub(crate) fn require_secret_id(&self) -> Result<&str> {
        self.secret_id()
            .ok_or_else(|| Error::signing(SigningStage::Credential, "secret id is empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let cred = Credential::new(
            "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE",
            "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE",
        )
        .with_token("short");

        let output = format!("{cred:?}");
        assert!(!output.contains("Gu5t9xGARNpq86cd98joQYCN3EXAMPLE"));
        assert!(!output.contains("short"));
        assert!(output.contains("AKI***PLE"));
    }

    #[test]
    fn test_empty_values_treated_as_absent() {
        let cred = Credential {
            secret_id: Some(String::new()),
            secret_key: String::new(),
            token: Some(String::new()),
        };

        assert_eq!(cred.secret_id(), None);
        assert_eq!(cred.token(), None);
        assert!(cred.require_secret_id().is_err());
        assert!(cred.require_secret_key().is_err());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            secret_id: Some("id".to_string()),
            secret_key: Some("key".to_string()),
            token: Some("token".to_string()),
            ..Default::default()
        };

        let cred = Credential::from_config(&config).expect("credential must be loaded");
        assert_eq!(cred.secret_id(), Some("id"));
        assert_eq!(cred.secret_key, "key");
        assert_eq!(cred.token(), Some("token"));

        assert!(Credential::from_config(&Config::default()).is_none());
    }
}
