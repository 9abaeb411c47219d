//! Route-level guards.
//!
//! A [`RouteGuards`] table maps route prefixes to requirements. The most
//! specific (longest) matching prefix wins, and prefixes only match on path
//! segment boundaries.
//!
//! Prefixes and requested paths are both reduced to a canonical form before
//! matching, so equivalent spellings of a guarded path hit the same guard:
//!
//! - query string and fragment are dropped
//! - `%2e`, `%2f` and `%5c` are decoded once
//! - `\` separates segments like `/`
//! - empty and `.` segments are dropped, `..` removes the previous segment
//!   and never climbs above the root
//! - `;parameters` are dropped from each segment
//! - ASCII case is folded
//! - a path without a leading `/` is resolved from the root

use crate::decision::Decision;
use crate::error::{ConfigurationError, ConfigurationErrorKind};
use crate::guard::Guard;
use crate::identity::Identity;
use crate::requirement::RoleRequirement;

/// A validated table of guarded route prefixes.
///
/// # Examples
///
/// ```
/// use role_guard::{Decision, Identity, Role, RoleRequirement, RouteGuards};
///
/// let routes = RouteGuards::builder()
///     .route("/dashboard", RoleRequirement::any_of([Role::Admin, Role::VenueManager]).unwrap())
///     .route("/dashboard/users", RoleRequirement::only(Role::Admin))
///     .build()
///     .unwrap();
///
/// let manager = Identity::new("m1", "Manager", Role::VenueManager);
/// assert_eq!(routes.authorize("/dashboard/analytics", Some(&manager)), Some(Decision::Allow));
/// assert_eq!(routes.authorize("/dashboard/users/7", Some(&manager)), Some(Decision::DenyForbidden));
/// assert_eq!(routes.authorize("/contacto", Some(&manager)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuards {
    // Sorted longest prefix first
    routes: Vec<(String, Guard)>,
}

impl RouteGuards {
    /// Starts an empty table.
    pub fn builder() -> RouteGuardsBuilder {
        RouteGuardsBuilder { routes: Vec::new() }
    }

    /// Returns the guard of the most specific prefix matching `path`.
    pub fn guard_for(&self, path: &str) -> Option<&Guard> {
        let path = canonical_path(path);
        self.routes
            .iter()
            .find(|(prefix, _)| matches_prefix(prefix, &path))
            .map(|(_, guard)| guard)
    }

    /// Evaluates the guard for `path`. Returns `None` for unguarded paths.
    ///
    /// `path` is canonicalized first, so `//dashboard/users`,
    /// `/dashboard/./users` and `dashboard/users` are all judged as
    /// `/dashboard/users`.
    pub fn authorize(&self, path: &str, identity: Option<&Identity>) -> Option<Decision> {
        self.guard_for(path).map(|guard| guard.check(identity))
    }

    /// Returns the number of guarded prefixes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no prefix is guarded.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Builder for [`RouteGuards`].
#[derive(Debug, Clone)]
pub struct RouteGuardsBuilder {
    routes: Vec<(String, RoleRequirement)>,
}

impl RouteGuardsBuilder {
    /// Guards `prefix` and everything below it with `requirement`.
    pub fn route(mut self, prefix: impl Into<String>, requirement: RoleRequirement) -> Self {
        self.routes.push((prefix.into(), requirement));
        self
    }

    /// Validates every prefix and builds the table.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a prefix does not start with `/`, or
    /// if two prefixes share the same canonical form.
    pub fn build(self) -> Result<RouteGuards, ConfigurationError> {
        let mut routes: Vec<(String, Guard)> = Vec::with_capacity(self.routes.len());

        for (prefix, requirement) in self.routes {
            if !prefix.starts_with('/') {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::InvalidRoute,
                    format!("route '{}' must start with '/'", prefix),
                ));
            }
            let normalized = canonical_path(&prefix);
            if routes.iter().any(|(p, _)| *p == normalized) {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::DuplicateRoute,
                    format!("route '{}' is guarded more than once", normalized),
                ));
            }
            let guard = Guard::new(normalized.clone(), requirement);
            routes.push((normalized, guard));
        }

        routes.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tracing::debug!(target: "role_guard", routes = routes.len(), "route guards built");

        Ok(RouteGuards { routes })
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Reduces `path` to "/seg/seg" form; the root is "/".
fn canonical_path(path: &str) -> String {
    let decoded = decode_separators(strip_query(path));
    let mut segments: Vec<String> = Vec::new();

    for raw in decoded.split(['/', '\\']) {
        let segment = raw.split(';').next().unwrap_or(raw);
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s.to_ascii_lowercase()),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Decodes percent-encoded dots and separators, leaving everything else.
fn decode_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = match tail.get(1..3).map(|hex| hex.to_ascii_lowercase()) {
            Some(hex) if hex == "2e" => Some('.'),
            Some(hex) if hex == "2f" => Some('/'),
            Some(hex) if hex == "5c" => Some('\\'),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn matches_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn dashboard_routes() -> RouteGuards {
        RouteGuards::builder()
            .route(
                "/dashboard",
                RoleRequirement::any_of([Role::Admin, Role::VenueManager]).unwrap(),
            )
            .route("/dashboard/users", RoleRequirement::only(Role::Admin))
            .route("/dashboard/venues", RoleRequirement::only(Role::Admin))
            .route(
                "/dashboard/venues/my-venue",
                RoleRequirement::any_of([Role::VenueManager, Role::Admin]).unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn longest_prefix_wins() {
        let routes = dashboard_routes();
        assert_eq!(routes.guard_for("/dashboard/users/42").unwrap().view(), "/dashboard/users");
        assert_eq!(
            routes.guard_for("/dashboard/venues/my-venue").unwrap().view(),
            "/dashboard/venues/my-venue"
        );
        assert_eq!(routes.guard_for("/dashboard/venues").unwrap().view(), "/dashboard/venues");
        assert_eq!(routes.guard_for("/dashboard").unwrap().view(), "/dashboard");
    }

    #[test]
    fn prefix_matches_on_segment_boundary() {
        let routes = dashboard_routes();
        assert_eq!(
            routes.guard_for("/dashboard/usersettings").unwrap().view(),
            "/dashboard"
        );
        assert!(routes.guard_for("/dashboards").is_none());
    }

    #[test]
    fn query_and_trailing_slash_are_ignored() {
        let routes = dashboard_routes();
        assert_eq!(
            routes.guard_for("/dashboard/users/?page=2").unwrap().view(),
            "/dashboard/users"
        );
        assert_eq!(routes.guard_for("/dashboard#top").unwrap().view(), "/dashboard");
    }

    #[test]
    fn unguarded_paths_return_none() {
        let routes = dashboard_routes();
        assert!(routes.guard_for("/").is_none());
        assert_eq!(routes.authorize("/nosotros", None), None);
    }

    #[test]
    fn manager_reaches_own_venue_but_not_catalog() {
        let routes = dashboard_routes();
        let manager = Identity::new("m1", "Manager", Role::VenueManager);
        assert_eq!(
            routes.authorize("/dashboard/venues/my-venue", Some(&manager)),
            Some(Decision::Allow)
        );
        assert_eq!(
            routes.authorize("/dashboard/venues", Some(&manager)),
            Some(Decision::DenyForbidden)
        );
        assert_eq!(
            routes.authorize("/dashboard/users", None),
            Some(Decision::DenyUnauthenticated)
        );
    }

    #[test]
    fn root_prefix_guards_everything() {
        let routes = RouteGuards::builder()
            .route("/", RoleRequirement::only(Role::Client))
            .build()
            .unwrap();
        assert_eq!(routes.guard_for("/anything/below").unwrap().view(), "/");
    }

    #[test]
    fn relative_route_is_rejected() {
        let err = RouteGuards::builder()
            .route("dashboard", RoleRequirement::only(Role::Admin))
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::InvalidRoute);
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let err = RouteGuards::builder()
            .route("/dashboard", RoleRequirement::only(Role::Admin))
            .route("/dashboard/", RoleRequirement::only(Role::Rp))
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::DuplicateRoute);
    }

    #[test]
    fn repeated_and_dot_segments_hit_the_same_guard() {
        let routes = dashboard_routes();
        let manager = Identity::new("m1", "Manager", Role::VenueManager);
        for path in [
            "/dashboard//users",
            "//dashboard/users",
            "/dashboard/./users",
            "/dashboard/venues/../users",
            "/./dashboard///users/",
        ] {
            assert_eq!(routes.guard_for(path).unwrap().view(), "/dashboard/users", "{}", path);
            assert_eq!(routes.authorize(path, Some(&manager)), Some(Decision::DenyForbidden));
            assert_eq!(routes.authorize(path, None), Some(Decision::DenyUnauthenticated));
        }
    }

    #[test]
    fn path_without_leading_slash_is_resolved_from_root() {
        let routes = dashboard_routes();
        let manager = Identity::new("m1", "Manager", Role::VenueManager);
        assert_eq!(
            routes.authorize("dashboard/users", Some(&manager)),
            Some(Decision::DenyForbidden)
        );
        assert_eq!(
            routes.authorize("dashboard", None),
            Some(Decision::DenyUnauthenticated)
        );
    }

    #[test]
    fn parent_segments_never_climb_above_root() {
        let routes = dashboard_routes();
        assert_eq!(
            routes.guard_for("/../../dashboard/users").unwrap().view(),
            "/dashboard/users"
        );
        assert!(routes.guard_for("/dashboard/..").is_none());
    }

    #[test]
    fn encoded_separators_and_case_are_folded() {
        let routes = dashboard_routes();
        for path in [
            "/DASHBOARD/Users",
            "/dashboard%2Fusers",
            "/dashboard/%2e/users",
            "/dashboard\\users",
            "/dashboard%5cusers",
            "/dashboard/users;jsessionid=1",
        ] {
            assert_eq!(routes.guard_for(path).unwrap().view(), "/dashboard/users", "{}", path);
        }
        // Unrelated escapes are left alone
        assert_eq!(routes.guard_for("/dashboard/caf%C3%A9").unwrap().view(), "/dashboard");
    }

    #[test]
    fn canonical_path_forms() {
        assert_eq!(canonical_path(""), "/");
        assert_eq!(canonical_path("/"), "/");
        assert_eq!(canonical_path("//"), "/");
        assert_eq!(canonical_path("/a/b/"), "/a/b");
        assert_eq!(canonical_path("a/./b/../c"), "/a/c");
        assert_eq!(canonical_path("/100%"), "/100%");
    }

    #[test]
    fn equivalent_prefixes_are_duplicates() {
        let err = RouteGuards::builder()
            .route("/dashboard/users", RoleRequirement::only(Role::Admin))
            .route("/Dashboard//users", RoleRequirement::only(Role::Rp))
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::DuplicateRoute);
    }

    #[test]
    fn len_counts_routes() {
        assert_eq!(dashboard_routes().len(), 4);
        assert!(!dashboard_routes().is_empty());
    }
}
