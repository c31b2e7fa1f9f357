//! Tencent Cloud API signer
//!
//! Both the legacy `HmacSHA1`/`HmacSHA256` signature and `TC3-HMAC-SHA256`
//! are supported.
//!
//! # Example
//!
//! ```
//! use capisign_tencent_capi::{Config, Credential, RequestOptions, RequestSigner, SignatureMethod};
//! use serde_json::json;
//!
//! # fn main() -> capisign_core::Result<()> {
//! let config = Config::for_service("cvm")
//!     .with_version("2017-03-12")
//!     .with_sign_method(SignatureMethod::Tc3HmacSha256);
//! let cred = Credential::new("AKIDEXAMPLE", "SECRETEXAMPLE");
//!
//! let req = RequestSigner::new(config).sign(
//!     "DescribeInstances",
//!     &json!({"Limit": 1}),
//!     &RequestOptions::default(),
//!     &cred,
//! )?;
//! assert!(req.headers().contains_key("authorization"));
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_method;
pub use sign_method::SignatureMethod;

mod sign_request;
pub use sign_request::{RequestOptions, RequestSigner};

pub mod endpoint;
pub mod legacy;
pub mod multipart;
pub mod params;
pub mod v3;

mod constants;
