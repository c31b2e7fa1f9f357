//! Utility functions and types.

use std::fmt;

/// Redacts secret material when formatted with `{:?}`.
///
/// - Empty input prints `EMPTY`.
/// - Input shorter than 12 characters is fully masked.
/// - Longer input keeps the first and last three characters so different
///   secrets remain distinguishable in logs.
pub struct Redact<'a>(Option<&'a str>);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value.as_str()))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl fmt::Debug for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = self.0 else {
            return f.write_str("None");
        };

        let chars: Vec<char> = value.chars().collect();
        match chars.len() {
            0 => f.write_str("EMPTY"),
            n if n < 12 => f.write_str("***"),
            n => {
                let head: String = chars[..3].iter().collect();
                let tail: String = chars[n - 3..].iter().collect();
                write!(f, "{head}***{tail}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        let cases = vec![
            ("Short", "***"),
            ("AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE", "AKI***PLE"),
            ("Gu5t9xGARNpq86cd98joQYCN3EXAMPLE", "Gu5***PLE"),
            ("", "EMPTY"),
            ("HelloWorld", "***"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact::from(input)),
                expected,
                "Failed on input: {}",
                input
            );
        }
    }

    #[test]
    fn test_redact_option() {
        let none: Option<String> = None;
        assert_eq!(format!("{:?}", Redact::from(&none)), "None");

        let some = Some("temporary-session-token".to_string());
        assert_eq!(format!("{:?}", Redact::from(&some)), "tem***ken");
    }

    #[test]
    fn test_redact_multibyte() {
        assert_eq!(format!("{:?}", Redact::from("密钥密钥密钥密钥密钥密钥")), "密钥密***钥密钥");
    }
}
