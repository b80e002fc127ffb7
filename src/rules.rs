use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Category
///
/// The three classes a URL path prefix can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Only reachable by callers the user state reports as admin.
    Admin,
    /// Reserved for logged-in users. Not enforced: every principal has user rights.
    User,
    /// Reachable by anyone, including anonymous callers.
    Public,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Admin, Category::User, Category::Public];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Admin => "admin",
            Category::User => "user",
            Category::Public => "public",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Category::Admin),
            "user" => Ok(Category::User),
            "public" => Ok(Category::Public),
            other => Err(format!("unknown path category: {other}")),
        }
    }
}

/// PathMatch
///
/// Lock-free classification of a single request path against a `RuleTable`.
/// Produced under the table's read lock and consumed by the evaluator after
/// the lock has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch {
    /// The path is exactly "/" and the root is configured as public.
    pub root_exempt: bool,
    /// Number of Admin prefixes the path starts with.
    pub admin_hits: usize,
    /// The path starts with at least one Public prefix.
    pub public_hit: bool,
}

/// RuleTable
///
/// Ordered path-prefix lists per `Category`, plus the root-is-public flag.
///
/// Matching is literal, case-sensitive `starts_with`, except that a bare "/"
/// Public entry stands for the root page only (see `prefix_matches`).
/// Prefixes are not validated, de-duplicated or normalized; a path matching
/// several prefixes of one category behaves exactly like a path matching one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    admin: Vec<String>,
    user: Vec<String>,
    public: Vec<String>,
    root_is_public: bool,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            admin: strings(&["/admin"]),
            user: strings(&["/profiles", "/data"]),
            public: strings(&[
                "/",
                "/login",
                "/register",
                "/favicon.ico",
                "/style",
                "/img",
                "/js",
                "/favicon.ico",
                "/robots.txt",
                "/sitemap_index.xml",
            ]),
            root_is_public: true,
        }
    }
}

impl RuleTable {
    /// A table with every category empty. Nothing but the root (if public) is reachable.
    pub fn empty() -> Self {
        Self {
            admin: Vec::new(),
            user: Vec::new(),
            public: Vec::new(),
            root_is_public: true,
        }
    }

    pub fn prefixes(&self, category: Category) -> &[String] {
        match category {
            Category::Admin => &self.admin,
            Category::User => &self.user,
            Category::Public => &self.public,
        }
    }

    fn prefixes_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Admin => &mut self.admin,
            Category::User => &mut self.user,
            Category::Public => &mut self.public,
        }
    }

    pub fn add_prefix(&mut self, category: Category, prefix: impl Into<String>) {
        self.prefixes_mut(category).push(prefix.into());
    }

    /// Replaces the whole prefix list of `category`. The previous list is dropped.
    pub fn set_prefixes<I, S>(&mut self, category: Category, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.prefixes_mut(category) = prefixes.into_iter().map(Into::into).collect();
    }

    /// Clears the Admin and User lists. Public prefixes and the root flag are kept.
    pub fn reset(&mut self) {
        self.admin.clear();
        self.user.clear();
    }

    pub fn root_is_public(&self) -> bool {
        self.root_is_public
    }

    pub fn set_root_is_public(&mut self, value: bool) {
        self.root_is_public = value;
    }

    /// True when `path` starts with any prefix of `category`.
    pub fn matches(&self, category: Category, path: &str) -> bool {
        self.prefixes(category)
            .iter()
            .any(|prefix| prefix_matches(category, prefix, path))
    }

    pub fn snapshot(&self, path: &str) -> PathMatch {
        PathMatch {
            root_exempt: self.root_is_public && path == "/",
            admin_hits: self
                .admin
                .iter()
                .filter(|prefix| prefix_matches(Category::Admin, prefix, path))
                .count(),
            public_hit: self.matches(Category::Public, path),
        }
    }
}

/// prefix_matches
///
/// True when `path` falls under `prefix` of `category`.
///
/// A bare "/" Public entry matches the root path exactly; otherwise the seeded
/// Public "/" would make every path public. Admin and User entries are plain
/// prefixes, so an Admin "/" gates the whole site.
pub fn prefix_matches(category: Category, prefix: &str, path: &str) -> bool {
    match (category, prefix) {
        (Category::Public, "/") => path == "/",
        _ => path.starts_with(prefix),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
