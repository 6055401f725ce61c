//! # Route Table
//!
//! Pure mapping from a URL path to one of the two client views.

use std::fmt;

use crate::client::encode_segment;

/// A resolved client-side route
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` - skill listing
    Home,
    /// `/skill/:name` - one skill's detail page
    SkillDetail { name: String },
}

impl Route {
    pub fn skill(name: impl Into<String>) -> Self {
        Route::SkillDetail { name: name.into() }
    }

    /// Stable route name, matching the frontend's named routes
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::SkillDetail { .. } => "skill-detail",
        }
    }

    /// Value of a path parameter bound by this route
    pub fn param(&self, key: &str) -> Option<&str> {
        match (self, key) {
            (Route::SkillDetail { name }, "name") => Some(name),
            _ => None,
        }
    }

    /// Path of this route relative to the history base
    pub fn href(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SkillDetail { name } => format!("/skill/{}", encode_segment(name)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.href())
    }
}

/// Resolves URLs against the route table under a history base
///
/// Matching follows history-mode routing: static segments are
/// case-insensitive, one trailing slash is tolerated, and the query string
/// and fragment are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    base: String,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router mounted at `/`
    pub fn new() -> Self {
        Self {
            base: String::new(),
        }
    }

    /// Router mounted under a sub-path, e.g. `/catalog/`
    pub fn with_base(base: &str) -> Self {
        let trimmed = base.trim_matches('/');
        Self {
            base: if trimmed.is_empty() {
                String::new()
            } else {
                format!("/{}", trimmed)
            },
        }
    }

    pub fn base(&self) -> &str {
        if self.base.is_empty() {
            "/"
        } else {
            &self.base
        }
    }

    /// Resolve a URL (path plus optional query/fragment) to a route
    ///
    /// Returns `None` when no route matches.
    pub fn resolve(&self, url: &str) -> Option<Route> {
        let path = strip_query_and_fragment(url);
        let path = if path.is_empty() { "/" } else { path };
        let path = self.strip_base(path)?;

        if !path.starts_with('/') {
            return None;
        }

        // One trailing slash is tolerated, but never an empty segment
        let path = match path.strip_suffix('/') {
            Some(trimmed) if trimmed.ends_with('/') => return None,
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        if path == "/" {
            return Some(Route::Home);
        }

        let segments: Vec<&str> = path[1..].split('/').collect();
        match segments.as_slice() {
            [prefix, name] if prefix.eq_ignore_ascii_case("skill") && !name.is_empty() => {
                let name = urlencoding::decode(name).ok()?;
                Some(Route::SkillDetail {
                    name: name.into_owned(),
                })
            }
            _ => None,
        }
    }

    /// Full path of a route including the history base
    pub fn href(&self, route: &Route) -> String {
        match route {
            Route::Home if !self.base.is_empty() => format!("{}/", self.base),
            _ => format!("{}{}", self.base, route.href()),
        }
    }

    fn strip_base<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.base.is_empty() {
            return Some(path);
        }

        let rest = path.strip_prefix(self.base.as_str())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

pub(crate) fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_resolves_to_home() {
        let router = Router::new();
        assert_eq!(router.resolve("/"), Some(Route::Home));
        assert_eq!(router.resolve(""), Some(Route::Home));
        assert_eq!(router.resolve("/?q=python"), Some(Route::Home));
        assert_eq!(Route::Home.param("name"), None);
    }

    #[test]
    fn test_skill_path_binds_name() {
        let router = Router::new();
        let route = router.resolve("/skill/foo").unwrap();
        assert_eq!(route, Route::skill("foo"));
        assert_eq!(route.name(), "skill-detail");
        assert_eq!(route.param("name"), Some("foo"));

        assert_eq!(router.resolve("/skill/foo/"), Some(Route::skill("foo")));
        assert_eq!(router.resolve("/Skill/foo#readme"), Some(Route::skill("foo")));
    }

    #[test]
    fn test_name_is_percent_decoded() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/skill/my%20skill"),
            Some(Route::skill("my skill"))
        );
    }

    #[test]
    fn test_unmatched_paths() {
        let router = Router::new();
        assert_eq!(router.resolve("/skill"), None);
        assert_eq!(router.resolve("/skill/"), None);
        assert_eq!(router.resolve("/skill/a/b"), None);
        assert_eq!(router.resolve("/skills/foo"), None);
        assert_eq!(router.resolve("/about"), None);
        assert_eq!(router.resolve("skill/foo"), None);
        assert_eq!(router.resolve("//"), None);
        assert_eq!(router.resolve("/skill/foo//"), None);
    }

    #[test]
    fn test_href_round_trips_through_resolve() {
        let router = Router::new();
        for route in [Route::Home, Route::skill("pdf-toolkit"), Route::skill("a b/c")] {
            assert_eq!(router.resolve(&router.href(&route)), Some(route));
        }
    }

    #[test]
    fn test_base_path() {
        let router = Router::with_base("/catalog/");
        assert_eq!(router.base(), "/catalog");
        assert_eq!(router.resolve("/catalog"), Some(Route::Home));
        assert_eq!(router.resolve("/catalog/"), Some(Route::Home));
        assert_eq!(
            router.resolve("/catalog/skill/foo"),
            Some(Route::skill("foo"))
        );
        assert_eq!(router.resolve("/skill/foo"), None);
        assert_eq!(router.resolve("/catalogue/skill/foo"), None);
        assert_eq!(router.href(&Route::Home), "/catalog/");
        assert_eq!(router.href(&Route::skill("foo")), "/catalog/skill/foo");
    }
}
