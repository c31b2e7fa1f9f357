//! `multipart/form-data` bodies for TC3 requests.

use crate::constants::CONTENT_TYPE_MULTIPART;
use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;
use sha2::{Digest, Sha256};

/// A single field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Text field.
    Text(String),
    /// Binary field, sent as `application/octet-stream`.
    Binary(Bytes),
}

/// A multipart form whose encoded body and payload hash always agree.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<(String, Part)>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Create an empty form with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(&random_boundary())
    }

    /// Create an empty form with given boundary.
    pub fn with_boundary(boundary: &str) -> Self {
        Self {
            boundary: boundary.to_string(),
            parts: Vec::new(),
        }
    }

    /// Append a text field.
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push((name.to_string(), Part::Text(value.into())));
        self
    }

    /// Append a binary field.
    pub fn binary(mut self, name: &str, value: impl Into<Bytes>) -> Self {
        self.parts.push((name.to_string(), Part::Binary(value.into())));
        self
    }

    /// Boundary of this form.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Fields of this form in insertion order.
    pub fn parts(&self) -> &[(String, Part)] {
        &self.parts
    }

    /// Value of the `Content-Type` header for this form.
    pub fn content_type(&self) -> String {
        format!("{CONTENT_TYPE_MULTIPART}; boundary={}", self.boundary)
    }

    /// Encode the form into the exact body bytes.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.write_to(|chunk| buf.put_slice(chunk));
        buf.freeze()
    }

    /// Hex encoded SHA256 of the encoded body, computed incrementally.
    pub fn payload_hash(&self) -> String {
        let mut hasher = Sha256::new();
        self.write_to(|chunk| hasher.update(chunk));
        hex::encode(hasher.finalize())
    }

    /// Feed every chunk of the body, in order, to `sink`.
    ///
    /// Layout:
    ///
    /// ```text
    /// --<boundary>
    /// \r\nContent-Disposition: form-data; name="<name>"\r\n
    /// [Content-Type: application/octet-stream\r\n]
    /// \r\n<content>\r\n--<boundary>
    /// ...
    /// --\r\n
    /// ```
    fn write_to(&self, mut sink: impl FnMut(&[u8])) {
        let delimiter = format!("--{}", self.boundary);

        sink(delimiter.as_bytes());
        for (name, part) in &self.parts {
            let disposition = format!("\r\nContent-Disposition: form-data; name=\"{name}\"\r\n");
            sink(disposition.as_bytes());
            match part {
                Part::Text(v) => {
                    sink(b"\r\n");
                    sink(v.as_bytes());
                }
                Part::Binary(v) => {
                    sink(b"Content-Type: application/octet-stream\r\n\r\n");
                    sink(&v[..]);
                }
            }
            sink(b"\r\n");
            sink(delimiter.as_bytes());
        }
        sink(b"--\r\n");
    }
}

/// Generate a boundary in the shape of `form-data` boundaries:
/// 26 dashes followed by 24 random digits.
pub fn random_boundary() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..24)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{}{digits}", "-".repeat(26))
}
