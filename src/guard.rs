use crate::{
    decision::Decision,
    error::{ConfigurationError, Error},
    identity::Identity,
    requirement::{RoleMatch, RoleRequirement},
    role::Role,
};

/// Decides whether `identity` may access a view guarded by `roles`.
///
/// This is a pure function: no logging, no state, same inputs give the same
/// output.
///
/// # Errors
///
/// Returns `Error::Configuration` if `roles` is empty, whatever the identity.
///
/// # Examples
///
/// ```
/// use role_guard::{authorize, Decision, Identity, Role};
///
/// let required = [Role::Admin, Role::VenueManager];
/// let admin = Identity::new("admin-1", "Admin", Role::Admin);
/// let guest = Identity::new("guest-1", "Guest", Role::Guest);
///
/// assert_eq!(authorize(&required, Some(&admin)).unwrap(), Decision::Allow);
/// assert_eq!(authorize(&required, Some(&guest)).unwrap(), Decision::DenyForbidden);
/// assert_eq!(authorize(&required, None).unwrap(), Decision::DenyUnauthenticated);
/// assert!(authorize(&[], Some(&admin)).is_err());
/// ```
pub fn authorize(roles: &[Role], identity: Option<&Identity>) -> Result<Decision, Error> {
    let requirement = RoleRequirement::any_of(roles.iter().copied())?;
    Ok(decide(&requirement, identity))
}

/// Evaluates an already validated requirement. Infallible and pure.
pub fn decide(requirement: &RoleRequirement, identity: Option<&Identity>) -> Decision {
    match identity {
        None => Decision::DenyUnauthenticated,
        Some(id) if requirement.is_satisfied_by(id) => Decision::Allow,
        Some(_) => Decision::DenyForbidden,
    }
}

/// Allows the owner of a resource, or an administrator.
///
/// # Examples
///
/// ```
/// use role_guard::{authorize_owner, Decision, Identity, Role};
///
/// let owner = Identity::new("u-7", "Uma", Role::Client);
/// assert_eq!(authorize_owner(Some(&owner), "u-7"), Decision::Allow);
/// assert_eq!(authorize_owner(Some(&owner), "u-8"), Decision::DenyForbidden);
/// ```
pub fn authorize_owner(identity: Option<&Identity>, owner_id: &str) -> Decision {
    match identity {
        None => Decision::DenyUnauthenticated,
        Some(id) if id.id() == owner_id || id.has_role(Role::Admin) => Decision::Allow,
        Some(_) => Decision::DenyForbidden,
    }
}

/// Allows identities holding a role that grants `permission`.
pub fn authorize_permission(identity: Option<&Identity>, permission: &str) -> Decision {
    match identity {
        None => Decision::DenyUnauthenticated,
        Some(id) if id.has_permission(permission) => Decision::Allow,
        Some(_) => Decision::DenyForbidden,
    }
}

/// Builder for a [`Guard`].
///
/// Roles are accumulated with [`require`](Self::require) and validated once
/// in [`build`](Self::build), so a guard with no roles fails at startup
/// rather than on the first request.
///
/// # Examples
///
/// ```
/// use role_guard::{AccessGuard, Decision, Identity, Role};
///
/// let guard = AccessGuard::new("dashboard")
///     .require(Role::Admin)
///     .require(Role::VenueManager)
///     .build()
///     .expect("non-empty requirement");
///
/// let manager = Identity::new("m-1", "Manager", Role::VenueManager);
/// assert_eq!(guard.check(Some(&manager)), Decision::Allow);
/// assert_eq!(guard.check(None), Decision::DenyUnauthenticated);
/// ```
#[derive(Debug, Clone)]
pub struct AccessGuard {
    view: String,
    roles: Vec<Role>,
    mode: RoleMatch,
}

impl AccessGuard {
    /// Starts a guard for the named view.
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            roles: Vec::new(),
            mode: RoleMatch::Any,
        }
    }

    /// Adds a permitted role, ignoring duplicates.
    pub fn require(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Adds several permitted roles.
    pub fn require_any(self, roles: impl IntoIterator<Item = Role>) -> Self {
        roles.into_iter().fold(self, |guard, role| guard.require(role))
    }

    /// Switches to requiring every listed role instead of any one of them.
    pub fn require_all(mut self) -> Self {
        self.mode = RoleMatch::All;
        self
    }

    /// Validates the accumulated roles and builds the guard.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if no role was required.
    pub fn build(self) -> Result<Guard, ConfigurationError> {
        let requirement = RoleRequirement::with_mode(self.roles, self.mode)?;
        Ok(Guard {
            view: self.view,
            requirement,
        })
    }
}

/// A validated, immutable guard for one protected view.
///
/// `Guard` holds no mutable state and is `Send + Sync`, so one instance can
/// be shared by every render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    view: String,
    requirement: RoleRequirement,
}

impl Guard {
    /// Creates a guard from an existing requirement.
    pub fn new(view: impl Into<String>, requirement: RoleRequirement) -> Self {
        Self {
            view: view.into(),
            requirement,
        }
    }

    /// Returns the guarded view's name.
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Returns the requirement enforced by this guard.
    pub fn requirement(&self) -> &RoleRequirement {
        &self.requirement
    }

    /// Evaluates the guard without emitting any log event.
    pub fn decide(&self, identity: Option<&Identity>) -> Decision {
        decide(&self.requirement, identity)
    }

    /// Evaluates the guard and emits a structured log event.
    pub fn check(&self, identity: Option<&Identity>) -> Decision {
        let decision = self.decide(identity);
        let principal = identity.map(Identity::id);

        if decision.is_allowed() {
            tracing::debug!(
                target: "role_guard",
                view = %self.view,
                principal = ?principal,
                decision = %decision,
                "access granted"
            );
        } else {
            tracing::info!(
                target: "role_guard",
                view = %self.view,
                principal = ?principal,
                required = %self.requirement,
                decision = %decision,
                "access denied"
            );
        }

        decision
    }

    /// Checks a single permission on behalf of this guard's view and emits a
    /// structured log event.
    ///
    /// Only the permission decides; the role requirement is not consulted.
    /// See [`authorize_permission`].
    pub fn check_permission(&self, identity: Option<&Identity>, permission: &str) -> Decision {
        let decision = authorize_permission(identity, permission);
        let principal = identity.map(Identity::id);

        if decision.is_allowed() {
            tracing::debug!(
                target: "role_guard",
                view = %self.view,
                principal = ?principal,
                permission,
                decision = %decision,
                "permission granted"
            );
        } else {
            tracing::info!(
                target: "role_guard",
                view = %self.view,
                principal = ?principal,
                permission,
                decision = %decision,
                "permission denied"
            );
        }

        decision
    }
}
