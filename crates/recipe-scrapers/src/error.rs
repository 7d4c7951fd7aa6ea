// ABOUTME: Error types for recipe scraping including ErrorCode enum and ScrapeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

use crate::extractors::operation::Operation;

/// Result alias used throughout the crate.
pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;

/// Error codes representing different categories of scrape failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidTarget,
    Fetch,
    NotImplemented,
    Lookup,
    FieldType,
    UnsupportedHost,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidTarget => "invalid target",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::NotImplemented => "not implemented",
            ErrorCode::Lookup => "lookup error",
            ErrorCode::FieldType => "unexpected field type",
            ErrorCode::UnsupportedHost => "unsupported host",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for scrape operations.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recipe-scrapers: {}", self.op)?;
        if !self.url.is_empty() {
            write!(f, " {}", self.url)?;
        }
        write!(f, ": {}", self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidTarget error (no URL and no raw content).
    pub fn invalid_target(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidTarget, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Lookup error for a base-contract default missing its DOM anchor.
    pub fn lookup(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Lookup, url, op, source)
    }

    /// Create an UnsupportedHost error.
    pub fn unsupported_host(url: impl Into<String>, host: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedHost,
            url,
            "Scrape",
            Some(anyhow::anyhow!("no extractor registered for {}", host)),
        )
    }

    /// Create a not-implemented error carrying the operation name.
    pub fn not_implemented(op: Operation) -> Self {
        Self::new(
            ErrorCode::NotImplemented,
            String::new(),
            op.name(),
            Some(anyhow::anyhow!("this should be implemented")),
        )
    }

    /// Create a FieldType error when a handler returned the wrong kind of value.
    pub fn field_type(op: Operation, expected: &str, found: &str) -> Self {
        Self::new(
            ErrorCode::FieldType,
            String::new(),
            op.name(),
            Some(anyhow::anyhow!("expected {}, found {}", expected, found)),
        )
    }

    /// Returns true if this is an InvalidTarget error.
    pub fn is_invalid_target(&self) -> bool {
        self.code == ErrorCode::InvalidTarget
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a NotImplemented error.
    pub fn is_not_implemented(&self) -> bool {
        self.code == ErrorCode::NotImplemented
    }

    /// Returns true if this is a Lookup error.
    pub fn is_lookup(&self) -> bool {
        self.code == ErrorCode::Lookup
    }

    /// Returns true if this is a FieldType error.
    pub fn is_field_type(&self) -> bool {
        self.code == ErrorCode::FieldType
    }

    /// Returns true if this is an UnsupportedHost error.
    pub fn is_unsupported_host(&self) -> bool {
        self.code == ErrorCode::UnsupportedHost
    }
}
