//! Route classification tables.
//!
//! Each table is a list of path patterns. A pattern matches a path when
//! they are equal, when the path is nested under it (`pattern + "/"`), or,
//! for patterns ending in `*`, when the path sits at or under the part before
//! the wildcard. Tables are checked independently, so one path can fall into
//! several categories; precedence belongs to the decision engine.

use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Route category a path can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Protected,
    AuthOnly,
    Public,
    Api,
}

impl Category {
    const ALL: [Category; 4] = [
        Category::Protected,
        Category::AuthOnly,
        Category::Public,
        Category::Api,
    ];

    fn bit(self) -> u8 {
        match self {
            Category::Protected => 1,
            Category::AuthOnly => 1 << 1,
            Category::Public => 1 << 2,
            Category::Api => 1 << 3,
        }
    }
}

/// The set of categories a path matched. Empty means unclassified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySet(u8);

impl CategorySet {
    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = CategorySet::default();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

/// A single configured path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    /// Pattern with any trailing `*` (and the `/` before it) removed
    base: String,
    wildcard: bool,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteConfigError> {
        if !pattern.starts_with('/') {
            return Err(RouteConfigError::InvalidPattern(pattern.to_string()));
        }

        let (base, wildcard) = match pattern.strip_suffix('*') {
            Some(prefix) => (prefix.trim_end_matches('/'), true),
            None => (pattern, false),
        };

        if base.contains('*') {
            return Err(RouteConfigError::InvalidPattern(pattern.to_string()));
        }

        Ok(Self {
            base: base.to_string(),
            wildcard,
        })
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn matches(&self, path: &str) -> bool {
        // "/*"
        if self.base.is_empty() {
            return true;
        }

        if path == self.base {
            return true;
        }

        // The nested-route rule and the wildcard rule agree once the wildcard
        // prefix is anchored on a segment boundary.
        path.strip_prefix(self.base.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl<'de> Deserialize<'de> for RoutePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RoutePattern::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn patterns(raw: &[&str]) -> Vec<RoutePattern> {
    raw.iter()
        .filter_map(|p| RoutePattern::parse(p).ok())
        .collect()
}

/// The four static pattern tables.
#[derive(Debug, Clone)]
pub struct RouteTables {
    pub protected: Vec<RoutePattern>,
    pub auth_only: Vec<RoutePattern>,
    pub public: Vec<RoutePattern>,
    pub api: Vec<RoutePattern>,
}

impl Default for RouteTables {
    fn default() -> Self {
        Self {
            protected: patterns(&[
                "/dashboard",
                "/matches",
                "/players",
                "/news",
                "/advertisements",
                "/fans",
                "/rankings",
                "/votes",
                "/profile",
            ]),
            auth_only: patterns(&[
                "/auth/login",
                "/auth/register",
                "/auth/forgot-password",
                "/auth/verify-otp",
                "/auth/reset-password",
            ]),
            public: patterns(&["/about", "/_next/*", "/favicon.ico", "/images/*"]),
            api: patterns(&["/api/protected/*"]),
        }
    }
}

impl RouteTables {
    /// Load tables from a JSON file. Missing tables fall back to empty lists.
    pub fn from_file(path: &Path) -> Result<Self, RouteConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RouteConfigError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, RouteConfigError> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            #[serde(default)]
            protected: Vec<RoutePattern>,
            #[serde(default)]
            auth_only: Vec<RoutePattern>,
            #[serde(default)]
            public: Vec<RoutePattern>,
            #[serde(default)]
            api: Vec<RoutePattern>,
        }

        let raw: Raw =
            serde_json::from_str(json).map_err(|e| RouteConfigError::Parse(e.to_string()))?;
        Ok(Self {
            protected: raw.protected,
            auth_only: raw.auth_only,
            public: raw.public,
            api: raw.api,
        })
    }

    /// Label a path with every category whose table matches it.
    pub fn classify(&self, path: &str) -> CategorySet {
        let tables = [
            (Category::Protected, &self.protected),
            (Category::AuthOnly, &self.auth_only),
            (Category::Public, &self.public),
            (Category::Api, &self.api),
        ];

        tables
            .into_iter()
            .filter(|(_, table)| table.iter().any(|p| p.matches(path)))
            .map(|(category, _)| category)
            .collect()
    }
}

/// Errors loading route tables.
#[derive(Debug)]
pub enum RouteConfigError {
    /// Pattern does not start with '/' or has a '*' anywhere but the end
    InvalidPattern(String),
    Io(String),
    Parse(String),
}

impl std::fmt::Display for RouteConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteConfigError::InvalidPattern(p) => write!(f, "Invalid route pattern: {}", p),
            RouteConfigError::Io(e) => write!(f, "Failed to read routes file: {}", e),
            RouteConfigError::Parse(e) => write!(f, "Failed to parse routes file: {}", e),
        }
    }
}

impl std::error::Error for RouteConfigError {}
