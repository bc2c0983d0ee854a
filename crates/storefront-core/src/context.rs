//! Request context with typed parameters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::lifecycle::TimingContext;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Unique page-invocation identifier for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    ///
    /// Combines wall-clock nanoseconds with a process-wide sequence so two
    /// IDs generated in the same instant still differ.
    pub fn generate() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{:x}-{:x}", nanos, seq))
    }

    /// Reuse an upstream ID, e.g. from an `x-request-id` header.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Route parameters extracted by the router, e.g. `handle` from `/products/:handle`.
pub type RouteParams = HashMap<String, String>;

/// Buyer locale used to localize commerce queries (`@inContext`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locale {
    /// ISO 3166 country code (e.g., "JP").
    pub country: Option<String>,
    /// ISO 639 language code (e.g., "JA").
    pub language: Option<String>,
}

impl Locale {
    /// Create a locale with both country and language.
    pub fn new(country: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            language: Some(language.into()),
        }
    }

    /// Parse a route locale segment such as `ja-JP` or `en-us`.
    ///
    /// Returns `None` for segments that are not `<language>-<country>`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        let (language, country) = segment.split_once('-')?;
        if language.len() != 2 || country.len() != 2 {
            return None;
        }
        if !language.chars().chain(country.chars()).all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self::new(country.to_ascii_uppercase(), language.to_ascii_uppercase()))
    }

    /// Query variable pairs for the `country` / `language` arguments.
    pub fn variable_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(country) = &self.country {
            pairs.push(("country", country.as_str()));
        }
        if let Some(language) = &self.language {
            pairs.push(("language", language.as_str()));
        }
        pairs
    }
}

/// Everything a page load knows about the incoming storefront request.
#[derive(Debug)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub params: RouteParams,
    /// Localizes every commerce query issued for this request.
    pub locale: Locale,
    /// Started when the request arrived; page loads mark their phases on it.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Context for a request to `path` with a fresh request ID.
    ///
    /// A leading `/<language>-<country>` segment sets the locale.
    pub fn new(path: &str) -> Self {
        let locale = path
            .trim_start_matches('/')
            .split('/')
            .next()
            .and_then(Locale::from_segment)
            .unwrap_or_default();
        Self {
            request_id: RequestId::generate(),
            params: HashMap::new(),
            locale,
            timing: TimingContext::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }
}
