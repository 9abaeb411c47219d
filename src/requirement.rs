use std::collections::BTreeSet;
use std::fmt;

use crate::error::ConfigurationError;
use crate::identity::Identity;
use crate::role::Role;

/// How the roles of a requirement are matched against an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleMatch {
    /// The identity must hold at least one of the roles
    #[default]
    Any,
    /// The identity must hold every role
    All,
}

/// The set of roles authorized for a protected view.
///
/// A requirement is never empty: the constructors reject an empty role set
/// with a [`ConfigurationError`]. Duplicate roles collapse.
///
/// # Examples
///
/// ```
/// use role_guard::{Identity, Role, RoleRequirement};
///
/// let dashboard = RoleRequirement::any_of([Role::Admin, Role::VenueManager]).unwrap();
/// assert!(dashboard.is_satisfied_by(&Identity::new("a", "Ana", Role::Admin)));
/// assert!(!dashboard.is_satisfied_by(&Identity::new("g", "Gus", Role::Guest)));
///
/// assert!(RoleRequirement::any_of([]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: BTreeSet<Role>,
    mode: RoleMatch,
}

impl RoleRequirement {
    /// Requires any one of `roles`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if `roles` is empty.
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Result<Self, ConfigurationError> {
        Self::with_mode(roles, RoleMatch::Any)
    }

    /// Requires every one of `roles`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if `roles` is empty.
    pub fn all_of(roles: impl IntoIterator<Item = Role>) -> Result<Self, ConfigurationError> {
        Self::with_mode(roles, RoleMatch::All)
    }

    /// Requires exactly one role.
    pub fn only(role: Role) -> Self {
        Self {
            roles: BTreeSet::from([role]),
            mode: RoleMatch::Any,
        }
    }

    /// Builds a requirement with an explicit match mode.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if `roles` is empty.
    pub fn with_mode(
        roles: impl IntoIterator<Item = Role>,
        mode: RoleMatch,
    ) -> Result<Self, ConfigurationError> {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(ConfigurationError::empty_requirement());
        }
        Ok(Self { roles, mode })
    }

    /// Returns the match mode.
    pub fn mode(&self) -> RoleMatch {
        self.mode
    }

    /// Returns the required roles in privilege order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    /// Returns true if `role` is part of this requirement.
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if `identity` satisfies this requirement.
    pub fn is_satisfied_by(&self, identity: &Identity) -> bool {
        match self.mode {
            RoleMatch::Any => identity.roles().any(|role| self.roles.contains(&role)),
            RoleMatch::All => self.roles.iter().all(|role| identity.has_role(*role)),
        }
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = match self.mode {
            RoleMatch::Any => " | ",
            RoleMatch::All => " & ",
        };
        for (i, role) in self.roles.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", role)?;
        }
        Ok(())
    }
}
