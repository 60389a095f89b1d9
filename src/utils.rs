//! Small shared helpers used across services.

/// Pretty-prints a JSON body for log output and error messages.
///
/// Invalid JSON is returned as-is (lossily decoded), so this is always safe
/// to call on raw response bodies.
#[must_use]
pub fn indent_json(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned()),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

/// Summary of a signing operation.
///
/// Holds whether the operation succeeded and the SHA-256 checksum reported
/// by the server, when one was returned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sha256Summary {
    succeeded: bool,
    sha256: Option<String>,
}

impl Sha256Summary {
    /// Creates an empty summary (not succeeded, no checksum).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            succeeded: false,
            sha256: None,
        }
    }

    /// Returns whether the operation succeeded.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Returns the SHA-256 checksum, if the server reported one.
    #[must_use]
    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }

    /// Marks whether the operation succeeded.
    pub fn set_succeeded(&mut self, succeeded: bool) {
        self.succeeded = succeeded;
    }

    /// Records the SHA-256 checksum reported by the server.
    pub fn set_sha256(&mut self, sha256: impl Into<String>) {
        self.sha256 = Some(sha256.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_json_pretty_prints_objects() {
        let indented = indent_json(br#"{"id":123,"status":"Completed"}"#);
        assert!(indented.contains('\n'));
        assert!(indented.contains("\"id\": 123"));
    }

    #[test]
    fn test_indent_json_returns_invalid_json_as_is() {
        let indented = indent_json(b"not json at all");
        assert_eq!(indented, "not json at all");
    }

    #[test]
    fn test_sha256_summary_defaults() {
        let summary = Sha256Summary::new();
        assert!(!summary.succeeded());
        assert!(summary.sha256().is_none());
    }

    #[test]
    fn test_sha256_summary_setters() {
        let mut summary = Sha256Summary::new();
        summary.set_succeeded(true);
        summary.set_sha256("abc123");
        assert!(summary.succeeded());
        assert_eq!(summary.sha256(), Some("abc123"));
    }
}
