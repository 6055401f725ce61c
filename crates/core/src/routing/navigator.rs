//! # Navigator
//!
//! In-memory navigation history over the route table. Either route can be
//! the entry point, and every transition can be undone with `back()`.

use thiserror::Error;

use super::router::{strip_query_and_fragment, Route, Router};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    NoMatch(String),
}

/// One history entry: the URL as navigated plus its resolved route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub url: String,
    pub route: Route,
}

impl Location {
    pub fn path(&self) -> &str {
        strip_query_and_fragment(&self.url)
    }

    /// Decoded value of a query parameter (`+` is read as a space)
    pub fn query(&self, key: &str) -> Option<String> {
        let without_fragment = self.url.split('#').next().unwrap_or_default();
        let (_, query) = without_fragment.split_once('?')?;

        query.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            if k != key {
                return None;
            }
            let v = v.replace('+', " ");
            urlencoding::decode(&v).ok().map(|v| v.into_owned())
        })
    }
}

/// Navigation history with back/forward traversal
#[derive(Debug, Clone)]
pub struct Navigator {
    router: Router,
    entries: Vec<Location>,
    index: usize,
}

impl Navigator {
    /// Start a history at the entry URL
    pub fn new(router: Router, entry_url: &str) -> Result<Self, NavigationError> {
        let location = Self::locate(&router, entry_url)?;
        Ok(Self {
            router,
            entries: vec![location],
            index: 0,
        })
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigate to a URL, discarding any forward history
    ///
    /// Navigating to the current URL again is a no-op. On an unmatched URL
    /// the history is left untouched.
    pub fn push(&mut self, url: &str) -> Result<&Location, NavigationError> {
        let location = Self::locate(&self.router, url)?;
        if *self.current() == location {
            return Ok(self.current());
        }

        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index += 1;
        tracing::debug!(url = %url, depth = self.entries.len(), "Navigated");
        Ok(self.current())
    }

    /// Navigate to a route by value
    pub fn push_route(&mut self, route: &Route) -> Result<&Location, NavigationError> {
        let url = self.router.href(route);
        self.push(&url)
    }

    /// Swap the current entry without growing the history
    pub fn replace(&mut self, url: &str) -> Result<&Location, NavigationError> {
        let location = Self::locate(&self.router, url)?;
        self.entries[self.index] = location;
        Ok(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&Location> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<&Location> {
        self.go(1)
    }

    /// Move `delta` entries through the history; out-of-range moves are ignored
    pub fn go(&mut self, delta: isize) -> Option<&Location> {
        let target = self.index.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.index = target;
        Some(self.current())
    }

    fn locate(router: &Router, url: &str) -> Result<Location, NavigationError> {
        let route = router
            .resolve(url)
            .ok_or_else(|| NavigationError::NoMatch(url.to_string()))?;
        Ok(Location {
            url: url.to_string(),
            route,
        })
    }
}
