use std::collections::BTreeSet;

use crate::role::{permissions_of, Role};

/// An authenticated caller, as supplied by an identity provider.
///
/// An identity always carries at least one role: the primary role given at
/// construction. Further roles can be attached with [`Identity::with_role`].
///
/// # Examples
///
/// ```
/// use role_guard::{Identity, Role};
///
/// let manager = Identity::new("manager-1", "Venue Manager", Role::VenueManager);
/// assert_eq!(manager.role(), Role::VenueManager);
/// assert!(manager.has_role(Role::VenueManager));
/// assert!(!manager.has_role(Role::Admin));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: String,
    display_name: String,
    role: Role,
    roles: BTreeSet<Role>,
}

impl Identity {
    /// Creates an identity holding a single role.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
            roles: BTreeSet::from([role]),
        }
    }

    /// Adds another role to this identity.
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Returns the identity's unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the primary role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns every role held, primary included.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    /// Returns true if the identity holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns the most privileged role held.
    pub fn highest_role(&self) -> Role {
        Role::highest(&self.roles).unwrap_or(self.role)
    }

    /// Returns the union of permissions of all held roles.
    pub fn permissions(&self) -> BTreeSet<&'static str> {
        permissions_of(&self.roles)
    }

    /// Returns true if any held role grants `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.roles.iter().any(|role| role.grants(permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_identity_holds_primary_role() {
        let id = Identity::new("admin-1", "Administrator", Role::Admin);
        assert_eq!(id.id(), "admin-1");
        assert_eq!(id.display_name(), "Administrator");
        assert_eq!(id.role(), Role::Admin);
        assert_eq!(id.roles().collect::<Vec<_>>(), vec![Role::Admin]);
    }

    #[test]
    fn with_role_adds_without_changing_primary() {
        let id = Identity::new("u-1", "Dana", Role::Client).with_role(Role::Rp);
        assert_eq!(id.role(), Role::Client);
        assert!(id.has_role(Role::Rp));
        assert_eq!(id.highest_role(), Role::Rp);
    }

    #[test]
    fn duplicate_roles_collapse() {
        let id = Identity::new("u-2", "Eve", Role::Client).with_role(Role::Client);
        assert_eq!(id.roles().count(), 1);
    }

    #[test]
    fn permissions_union_across_roles() {
        let id = Identity::new("u-3", "Finn", Role::Client).with_role(Role::Rp);
        assert!(id.has_permission("payment:process"));
        assert!(id.has_permission("guest:invite"));
        assert!(!id.has_permission("venue:write"));
        assert!(id.permissions().contains("qr:generate"));
    }
}
