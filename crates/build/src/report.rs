//! The per-(theme, platform) build report.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tessera_core::TokenError;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Compose,
    Resolve,
    Emit,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compose => "compose",
            Stage::Resolve => "resolve",
            Stage::Emit => "emit",
            Stage::Write => "write",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: String,
    /// SHA-256 of the content, lowercase hex.
    pub etag: String,
    pub bytes: usize,
}

impl WrittenFile {
    pub fn new(path: String, content: &str) -> Self {
        WrittenFile {
            path,
            etag: compute_etag(content),
            bytes: content.len(),
        }
    }
}

/// SHA-256 etag of a generated document.
pub fn compute_etag(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        files: Vec<WrittenFile>,
    },
    Failure {
        stage: Stage,
        /// Error kind, e.g. `cyclic_reference`.
        kind: String,
        message: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    pub theme: String,
    pub platform: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    /// Per-file load errors collected before any theme was built.
    pub source_errors: Vec<TokenError>,
    pub entries: Vec<PairReport>,
}

impl BuildReport {
    /// True when no source file failed and every pair succeeded.
    pub fn is_success(&self) -> bool {
        self.source_errors.is_empty() && self.entries.iter().all(|e| e.outcome.is_success())
    }

    pub fn successes(&self) -> impl Iterator<Item = &PairReport> {
        self.entries.iter().filter(|e| e.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &PairReport> {
        self.entries.iter().filter(|e| !e.outcome.is_success())
    }

    pub fn entry(&self, theme: &str, platform: &str) -> Option<&PairReport> {
        self.entries
            .iter()
            .find(|e| e.theme == theme && e.platform == platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_is_sha256_hex() {
        assert_eq!(
            compute_etag(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn report_serializes_flat_entries() {
        let report = BuildReport {
            source_errors: vec![],
            entries: vec![PairReport {
                theme: "dark".into(),
                platform: "css".into(),
                outcome: Outcome::Failure {
                    stage: Stage::Resolve,
                    kind: "cyclic_reference".into(),
                    message: "cyclic reference: a \u{2192} b \u{2192} a".into(),
                },
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entries"][0]["status"], "failure");
        assert_eq!(json["entries"][0]["stage"], "resolve");
        assert_eq!(json["entries"][0]["theme"], "dark");
        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn source_errors_fail_the_build() {
        let report = BuildReport {
            source_errors: vec![TokenError::parse("a.json", "bad")],
            entries: vec![],
        };
        assert!(!report.is_success());
        assert!(BuildReport::default().is_success());
    }
}
