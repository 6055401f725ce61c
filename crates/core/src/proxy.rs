//! # Proxy & Build Configuration
//!
//! Declares where the production bundle is written and which request paths
//! the development server forwards to the backend.
//!
//! ## Matching
//!
//! A rule key starting with `^` is a regular expression tested against the
//! request path. Any other key is a plain prefix (`/api/` matches
//! `/api/v1/skills`). Rules are tried in declaration order.

use regex::Regex;
use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

use crate::client::DEFAULT_BACKEND_URL;

/// Default location of the production bundle, served by the backend binary
pub const DEFAULT_OUT_DIR: &str = "cmd/server/web_dist";

#[derive(Debug, Error)]
pub enum ProxyConfigError {
    #[error("invalid proxy pattern '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid proxy target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
}

/// How a rule selects request paths
#[derive(Debug, Clone)]
pub enum PathMatcher {
    Prefix(String),
    Pattern(Regex),
}

impl PathMatcher {
    pub fn parse(key: &str) -> Result<Self, ProxyConfigError> {
        if key.starts_with('^') {
            let regex = Regex::new(key).map_err(|source| ProxyConfigError::InvalidPattern {
                key: key.to_string(),
                source,
            })?;
            Ok(PathMatcher::Pattern(regex))
        } else {
            Ok(PathMatcher::Prefix(key.to_string()))
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
            PathMatcher::Pattern(regex) => regex.is_match(path),
        }
    }

    /// The key this matcher was parsed from
    pub fn key(&self) -> &str {
        match self {
            PathMatcher::Prefix(prefix) => prefix,
            PathMatcher::Pattern(regex) => regex.as_str(),
        }
    }
}

/// One forwarding rule
#[derive(Debug, Clone)]
pub struct ProxyRule {
    pub matcher: PathMatcher,
    /// Origin the request is forwarded to
    pub target: Url,
    /// Rewrite the `Host` header to the target's authority
    pub change_origin: bool,
}

impl ProxyRule {
    pub fn new(key: &str, target: &str, change_origin: bool) -> Result<Self, ProxyConfigError> {
        let matcher = PathMatcher::parse(key)?;
        let parsed = Url::parse(target).map_err(|e| ProxyConfigError::InvalidTarget {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.host_str().is_none() {
            return Err(ProxyConfigError::InvalidTarget {
                target: target.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self {
            matcher,
            target: parsed,
            change_origin,
        })
    }

    /// Upstream URL for a request path with its original query string
    pub fn upstream_url(&self, path_and_query: &str) -> String {
        let origin = self.target.as_str().trim_end_matches('/');
        format!("{}{}", origin, path_and_query)
    }

    /// `host[:port]` of the target, used when rewriting `Host`
    pub fn target_authority(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

/// Ordered set of forwarding rules
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard rules for the skills backend, all with the Host rewritten
    ///
    /// - `/api/` - JSON API
    /// - `^/skill\.md$` - registry guide
    /// - `^/skill/[^/]+\.md$` - per-skill Markdown
    pub fn for_backend(backend: &str) -> Result<Self, ProxyConfigError> {
        Self::new()
            .with_rule("/api/", backend, true)?
            .with_rule(r"^/skill\.md$", backend, true)?
            .with_rule(r"^/skill/[^/]+\.md$", backend, true)
    }

    pub fn with_rule(
        mut self,
        key: &str,
        target: &str,
        change_origin: bool,
    ) -> Result<Self, ProxyConfigError> {
        self.rules.push(ProxyRule::new(key, target, change_origin)?);
        Ok(self)
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    /// First rule matching a request path
    pub fn find(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matcher.matches(path))
    }
}

/// Where and how the production bundle is emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub out_dir: PathBuf,
    /// Remove stale files from `out_dir` before writing
    pub empty_out_dir: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            empty_out_dir: true,
        }
    }
}

impl BuildConfig {
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }
}

/// Proxy table for the default local backend
pub fn default_proxy_table() -> ProxyTable {
    // The built-in origin and patterns are constants
    ProxyTable::for_backend(DEFAULT_BACKEND_URL).unwrap_or_default()
}
