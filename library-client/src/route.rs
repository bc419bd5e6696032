//! Route table
//!
//! Routes are declared as a tree of [`RouteRecord`]s. A location resolves to
//! the chain of records it matched, root first; the chain's requirements are
//! merged so that a flag declared anywhere along it is in effect.
//!
//! Pattern syntax per segment:
//!
//! - `books` - static segment
//! - `:id` - captures one segment
//! - `:pathMatch(.*)*` - captures the remainder, possibly empty

use std::collections::{BTreeMap, HashSet};
use std::ops::{BitOr, BitOrAssign};

use crate::error::{NavigationError, RouteConfigError};

const CATCH_ALL_SUFFIX: &str = "(.*)*";

/// Access requirement flags of a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RouteRequirement {
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub requires_admin: bool,
    pub requires_librarian: bool,
}

impl RouteRequirement {
    /// Open to everyone
    pub const NONE: Self = Self {
        requires_auth: false,
        requires_guest: false,
        requires_admin: false,
        requires_librarian: false,
    };
    /// Declares nothing of its own; ancestors' flags still apply
    pub const INHERIT: Self = Self::NONE;
    pub const AUTH: Self = Self::NONE.with_auth();
    pub const GUEST: Self = Self::NONE.with_guest();

    pub const fn with_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub const fn with_guest(mut self) -> Self {
        self.requires_guest = true;
        self
    }

    pub const fn with_admin(mut self) -> Self {
        self.requires_admin = true;
        self
    }

    pub const fn with_librarian(mut self) -> Self {
        self.requires_librarian = true;
        self
    }

    pub const fn union(self, other: Self) -> Self {
        Self {
            requires_auth: self.requires_auth || other.requires_auth,
            requires_guest: self.requires_guest || other.requires_guest,
            requires_admin: self.requires_admin || other.requires_admin,
            requires_librarian: self.requires_librarian || other.requires_librarian,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl BitOr for RouteRequirement {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for RouteRequirement {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, RouteConfigError> {
    let invalid = |reason: &str| RouteConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let parts = split_path(pattern);
    let mut segments = Vec::with_capacity(parts.len());
    for (i, part) in parts.iter().enumerate() {
        let Some(name) = part.strip_prefix(':') else {
            segments.push(Segment::Static((*part).to_string()));
            continue;
        };
        let (name, catch_all) = match name.strip_suffix(CATCH_ALL_SUFFIX) {
            Some(name) => (name, true),
            None => (name, false),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("parameter names must be alphanumeric"));
        }
        if catch_all {
            if i + 1 != parts.len() {
                return Err(invalid("catch-all must be the last segment"));
            }
            segments.push(Segment::CatchAll(name.to_string()));
        } else {
            segments.push(Segment::Param(name.to_string()));
        }
    }
    Ok(segments)
}

/// One node of the route tree
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pattern: String,
    segments: Vec<Segment>,
    name: Option<String>,
    requirement: RouteRequirement,
    redirect: Option<String>,
    children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn builder(path: impl Into<String>) -> RouteRecordBuilder {
        RouteRecordBuilder {
            path: path.into(),
            name: None,
            requirement: None,
            redirect: None,
            children: Vec::new(),
        }
    }

    /// Pattern as declared, relative to the parent
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn requirement(&self) -> RouteRequirement {
        self.requirement
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn children(&self) -> &[RouteRecord] {
        &self.children
    }

    /// Number of leading `segments` this record's pattern consumes
    fn match_prefix(&self, segments: &[&str], params: &mut BTreeMap<String, String>) -> Option<usize> {
        let mut consumed = 0;
        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    if segments.get(consumed) != Some(&expected.as_str()) {
                        return None;
                    }
                    consumed += 1;
                }
                Segment::Param(name) => {
                    let value = segments.get(consumed)?;
                    params.insert(name.clone(), (*value).to_string());
                    consumed += 1;
                }
                Segment::CatchAll(name) => {
                    params.insert(name.clone(), segments[consumed..].join("/"));
                    consumed = segments.len();
                }
            }
        }
        Some(consumed)
    }

    fn match_chain<'a>(
        &'a self,
        segments: &[&str],
        params: &mut BTreeMap<String, String>,
        chain: &mut Vec<&'a RouteRecord>,
    ) -> bool {
        let snapshot = params.clone();
        let Some(consumed) = self.match_prefix(segments, params) else {
            *params = snapshot;
            return false;
        };
        let rest = &segments[consumed..];

        chain.push(self);
        if self.children.iter().any(|child| child.match_chain(rest, params, chain)) {
            return true;
        }
        if rest.is_empty() {
            return true;
        }
        chain.pop();
        *params = snapshot;
        false
    }

    fn build_path(&self, params: &BTreeMap<String, String>, out: &mut Vec<String>) -> Result<(), NavigationError> {
        for segment in &self.segments {
            match segment {
                Segment::Static(s) => out.push(s.clone()),
                Segment::Param(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => out.push(value.clone()),
                    _ => {
                        return Err(NavigationError::MissingParam {
                            route: self.name.clone().unwrap_or_else(|| self.pattern.clone()),
                            param: name.clone(),
                        });
                    }
                },
                Segment::CatchAll(name) => {
                    if let Some(value) = params.get(name) {
                        out.extend(split_path(value).into_iter().map(str::to_string));
                    }
                }
            }
        }
        Ok(())
    }

    /// Ancestor chain (inclusive) of the record named `name`
    fn find_named<'a>(&'a self, name: &str, chain: &mut Vec<&'a RouteRecord>) -> bool {
        chain.push(self);
        if self.name.as_deref() == Some(name)
            || self.children.iter().any(|child| child.find_named(name, chain))
        {
            return true;
        }
        chain.pop();
        false
    }

    fn collect_names<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Result<(), RouteConfigError> {
        if let Some(name) = self.name.as_deref() {
            if !seen.insert(name) {
                return Err(RouteConfigError::DuplicateName(name.to_string()));
            }
        }
        self.children.iter().try_for_each(|child| child.collect_names(seen))
    }
}

/// Builder of [`RouteRecord`]
///
/// Every record must state its requirement, [`RouteRequirement::INHERIT`] or
/// [`RouteRequirement::NONE`] included, unless it only redirects.
#[derive(Debug)]
pub struct RouteRecordBuilder {
    path: String,
    name: Option<String>,
    requirement: Option<RouteRequirement>,
    redirect: Option<String>,
    children: Vec<RouteRecord>,
}

impl RouteRecordBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn requires(mut self, requirement: RouteRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    pub fn redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn child(mut self, child: RouteRecord) -> Self {
        self.children.push(child);
        self
    }

    pub fn build(self) -> Result<RouteRecord, RouteConfigError> {
        let requirement = match (self.requirement, &self.redirect) {
            (Some(requirement), _) => requirement,
            (None, Some(_)) => RouteRequirement::NONE,
            (None, None) => return Err(RouteConfigError::MissingRequirement(self.path)),
        };
        if let Some(to) = self.redirect.as_deref().filter(|to| !to.starts_with('/')) {
            return Err(RouteConfigError::InvalidPattern {
                reason: format!("redirect target '{to}' must be absolute"),
                pattern: self.path,
            });
        }
        Ok(RouteRecord {
            segments: parse_pattern(&self.path)?,
            pattern: self.path,
            name: self.name,
            requirement,
            redirect: self.redirect,
            children: self.children,
        })
    }
}

/// A location resolved against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Normalized path: leading slash, no trailing or empty segments
    pub path: String,
    /// Normalized path plus the original query and fragment
    pub full_path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
    /// Name of the deepest matched record
    pub name: Option<String>,
    pub params: BTreeMap<String, String>,
    /// Full patterns of the matched chain, root first
    pub matched: Vec<String>,
    /// Union of the chain's requirements
    pub requirement: RouteRequirement,
    /// Redirect declared by the deepest matched record
    pub redirect: Option<String>,
}

/// Ordered route tree
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteRecord>) -> Result<Self, RouteConfigError> {
        let mut seen = HashSet::new();
        routes.iter().try_for_each(|route| route.collect_names(&mut seen))?;
        Ok(Self { routes })
    }

    /// The library application's routes
    pub fn library() -> Result<Self, RouteConfigError> {
        use RouteRequirement as R;

        let auth = RouteRecord::builder("/auth")
            .requires(R::INHERIT)
            .child(RouteRecord::builder("login").name("Login").requires(R::GUEST).build()?)
            .child(RouteRecord::builder("register").name("Register").requires(R::GUEST).build()?)
            .build()?;

        let admin = RouteRecord::builder("/admin")
            .requires(R::AUTH.with_librarian())
            .child(RouteRecord::builder("").name("AdminDashboard").requires(R::INHERIT).build()?)
            .child(RouteRecord::builder("books").name("AdminBooks").requires(R::INHERIT).build()?)
            .child(
                RouteRecord::builder("users")
                    .name("AdminUsers")
                    .requires(R::NONE.with_admin())
                    .build()?,
            )
            .child(RouteRecord::builder("borrows").name("AdminBorrows").requires(R::INHERIT).build()?)
            .build()?;

        Self::new(vec![
            RouteRecord::builder("/").redirect("/dashboard").build()?,
            auth,
            RouteRecord::builder("/dashboard").name("Dashboard").requires(R::AUTH).build()?,
            RouteRecord::builder("/books").name("Books").requires(R::AUTH).build()?,
            RouteRecord::builder("/books/:id").name("BookDetail").requires(R::AUTH).build()?,
            RouteRecord::builder("/my-books").name("MyBooks").requires(R::AUTH).build()?,
            RouteRecord::builder("/profile").name("Profile").requires(R::AUTH).build()?,
            admin,
            RouteRecord::builder("/:pathMatch(.*)*").name("NotFound").requires(R::NONE).build()?,
        ])
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// Resolve a location; the first declared match wins
    pub fn resolve(&self, location: &str) -> Option<ResolvedRoute> {
        let (location, fragment) = match location.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (location, None),
        };
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (location, None),
        };
        let segments = split_path(path);

        let mut params = BTreeMap::new();
        let mut chain = Vec::new();
        if !self
            .routes
            .iter()
            .any(|route| route.match_chain(&segments, &mut params, &mut chain))
        {
            return None;
        }

        let path = format!("/{}", segments.join("/"));
        let mut full_path = path.clone();
        if let Some(query) = &query {
            full_path.push('?');
            full_path.push_str(query);
        }
        if let Some(fragment) = &fragment {
            full_path.push('#');
            full_path.push_str(fragment);
        }

        let deepest = chain.last().copied();
        Some(ResolvedRoute {
            path,
            full_path,
            query,
            fragment,
            name: deepest.and_then(|r| r.name.clone()),
            params,
            matched: full_patterns(&chain),
            requirement: chain
                .iter()
                .fold(RouteRequirement::NONE, |acc, r| acc | r.requirement),
            redirect: deepest.and_then(|r| r.redirect.clone()),
        })
    }

    /// Build the path of a named route
    pub fn path_for(&self, name: &str, params: &BTreeMap<String, String>) -> Result<String, NavigationError> {
        let mut chain = Vec::new();
        if !self.routes.iter().any(|route| route.find_named(name, &mut chain)) {
            return Err(NavigationError::UnknownRoute(name.to_string()));
        }
        let mut segments = Vec::new();
        for record in chain {
            record.build_path(params, &mut segments)?;
        }
        Ok(format!("/{}", segments.join("/")))
    }
}

fn full_patterns(chain: &[&RouteRecord]) -> Vec<String> {
    let mut prefix: Vec<&str> = Vec::new();
    chain
        .iter()
        .map(|record| {
            prefix.extend(split_path(&record.pattern));
            format!("/{}", prefix.join("/"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::library().unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_requirement_union() {
        let merged = RouteRequirement::AUTH.with_librarian() | RouteRequirement::NONE.with_admin();
        assert!(merged.requires_auth);
        assert!(merged.requires_librarian);
        assert!(merged.requires_admin);
        assert!(!merged.requires_guest);
        assert!(RouteRequirement::INHERIT.is_empty());
        assert!(!RouteRequirement::GUEST.is_empty());
    }

    #[test]
    fn test_build_requires_explicit_requirement() {
        let err = RouteRecord::builder("/orphan").name("Orphan").build().unwrap_err();
        assert_eq!(err, RouteConfigError::MissingRequirement("/orphan".into()));

        // redirect-only records need none
        let record = RouteRecord::builder("/").redirect("/dashboard").build().unwrap();
        assert!(record.requirement().is_empty());
        assert_eq!(record.redirect(), Some("/dashboard"));
    }

    #[test]
    fn test_invalid_patterns() {
        for pattern in ["/files/:rest(.*)*/tail", "/books/:", "/books/:id-x"] {
            let err = RouteRecord::builder(pattern)
                .requires(RouteRequirement::NONE)
                .build()
                .unwrap_err();
            assert!(matches!(err, RouteConfigError::InvalidPattern { .. }), "{pattern}");
        }
        let err = RouteRecord::builder("/")
            .redirect("dashboard")
            .build()
            .unwrap_err();
        assert!(matches!(err, RouteConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let a = RouteRecord::builder("/a").name("Same").requires(RouteRequirement::NONE).build().unwrap();
        let b = RouteRecord::builder("/b").name("Same").requires(RouteRequirement::NONE).build().unwrap();
        assert_eq!(
            RouteTable::new(vec![a, b]).unwrap_err(),
            RouteConfigError::DuplicateName("Same".into())
        );
    }

    #[test]
    fn test_resolve_static_routes() {
        let table = table();
        let route = table.resolve("/dashboard").unwrap();
        assert_eq!(route.name.as_deref(), Some("Dashboard"));
        assert_eq!(route.requirement, RouteRequirement::AUTH);
        assert_eq!(route.matched, vec!["/dashboard"]);

        let root = table.resolve("/").unwrap();
        assert_eq!(root.redirect.as_deref(), Some("/dashboard"));
        assert!(root.name.is_none());
    }

    #[test]
    fn test_resolve_params() {
        let route = table().resolve("/books/42").unwrap();
        assert_eq!(route.name.as_deref(), Some("BookDetail"));
        assert_eq!(route.params, params(&[("id", "42")]));
    }

    #[test]
    fn test_resolve_nested_guest_routes() {
        let route = table().resolve("/auth/login").unwrap();
        assert_eq!(route.name.as_deref(), Some("Login"));
        assert_eq!(route.matched, vec!["/auth", "/auth/login"]);
        assert_eq!(route.requirement, RouteRequirement::GUEST);
    }

    #[test]
    fn test_requirements_accumulate_over_chain() {
        let table = table();

        let users = table.resolve("/admin/users").unwrap();
        assert_eq!(users.name.as_deref(), Some("AdminUsers"));
        assert_eq!(users.matched, vec!["/admin", "/admin/users"]);
        assert_eq!(
            users.requirement,
            RouteRequirement::AUTH.with_librarian().with_admin()
        );

        let books = table.resolve("/admin/books").unwrap();
        assert_eq!(books.requirement, RouteRequirement::AUTH.with_librarian());

        let index = table.resolve("/admin").unwrap();
        assert_eq!(index.name.as_deref(), Some("AdminDashboard"));
        assert_eq!(index.matched, vec!["/admin", "/admin"]);
    }

    #[test]
    fn test_unknown_paths_hit_catch_all() {
        let table = table();
        let route = table.resolve("/no/such/page").unwrap();
        assert_eq!(route.name.as_deref(), Some("NotFound"));
        assert!(route.requirement.is_empty());
        assert_eq!(route.params, params(&[("pathMatch", "no/such/page")]));

        // an unknown admin child falls through to the catch-all too
        let route = table.resolve("/admin/nope").unwrap();
        assert_eq!(route.name.as_deref(), Some("NotFound"));
        assert!(route.params.get("pathMatch").is_some());
    }

    #[test]
    fn test_normalization_and_query() {
        let route = table().resolve("//books/7/?tab=reviews#top").unwrap();
        assert_eq!(route.path, "/books/7");
        assert_eq!(route.query.as_deref(), Some("tab=reviews"));
        assert_eq!(route.fragment.as_deref(), Some("top"));
        assert_eq!(route.full_path, "/books/7?tab=reviews#top");
        assert_eq!(route.name.as_deref(), Some("BookDetail"));
    }

    #[test]
    fn test_no_match_without_catch_all() {
        let table = RouteTable::new(vec![
            RouteRecord::builder("/only").requires(RouteRequirement::NONE).build().unwrap(),
        ])
        .unwrap();
        assert!(table.resolve("/other").is_none());
        assert!(table.resolve("/only/extra").is_none());
    }

    #[test]
    fn test_path_for_named_routes() {
        let table = table();
        assert_eq!(table.path_for("Profile", &BTreeMap::new()).unwrap(), "/profile");
        assert_eq!(table.path_for("AdminUsers", &BTreeMap::new()).unwrap(), "/admin/users");
        assert_eq!(table.path_for("AdminDashboard", &BTreeMap::new()).unwrap(), "/admin");
        assert_eq!(
            table.path_for("BookDetail", &params(&[("id", "3")])).unwrap(),
            "/books/3"
        );
        assert_eq!(
            table.path_for("BookDetail", &BTreeMap::new()).unwrap_err(),
            NavigationError::MissingParam {
                route: "BookDetail".into(),
                param: "id".into()
            }
        );
        assert_eq!(
            table.path_for("Nowhere", &BTreeMap::new()).unwrap_err(),
            NavigationError::UnknownRoute("Nowhere".into())
        );
    }
}
