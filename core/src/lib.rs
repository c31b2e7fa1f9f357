//! Core components for signing cloud API requests.
//!
//! This crate provides the foundational pieces shared by the capisign
//! service signers: the error taxonomy, hashing and HMAC primitives, time
//! helpers, secret redaction and an environment-access [`Context`].
//!
//! ## Example
//!
//! ```
//! use capisign_core::hash::{hex_hmac, HashAlgorithm};
//!
//! # fn main() -> capisign_core::Result<()> {
//! let mac = hex_hmac(HashAlgorithm::Sha256, b"key", b"content")?;
//! assert_eq!(mac.len(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::NoopEnv;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
pub use error::SigningStage;
