use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseRoleError;

/// A role assigned to an identity.
///
/// Variants are declared from least to most privileged, so the derived
/// `Ord` doubles as the privilege rank.
///
/// # Examples
///
/// ```
/// use role_guard::Role;
///
/// let role: Role = "venue_manager".parse().unwrap();
/// assert_eq!(role, Role::VenueManager);
/// assert_eq!(role.to_string(), "venue_manager");
/// assert!(Role::Admin > Role::VenueManager);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Visitor without an account role
    Guest,
    /// Wallet holder
    Client,
    /// Public relations promoter
    Rp,
    /// Manager of one or more venues
    VenueManager,
    /// Platform administrator
    Admin,
}

impl Role {
    /// All roles, least privileged first.
    pub const ALL: [Role; 5] = [
        Role::Guest,
        Role::Client,
        Role::Rp,
        Role::VenueManager,
        Role::Admin,
    ];

    /// Returns the stable wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Client => "client",
            Role::Rp => "rp",
            Role::VenueManager => "venue_manager",
            Role::Admin => "admin",
        }
    }

    /// Returns the permissions granted by this role.
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Role::Guest => &[],
            Role::Client => &[
                "wallet:read",
                "wallet:own",
                "transaction:read",
                "transaction:own",
                "payment:process",
            ],
            Role::Rp => &[
                "wallet:read",
                "transaction:read",
                "qr:generate",
                "guest:invite",
            ],
            Role::VenueManager => &[
                "wallet:read",
                "wallet:write",
                "transaction:read",
                "transaction:write",
                "venue:read",
                "venue:write",
            ],
            Role::Admin => &[
                "wallet:read",
                "wallet:write",
                "wallet:admin",
                "transaction:read",
                "transaction:write",
                "transaction:admin",
                "user:read",
                "user:write",
                "user:admin",
                "venue:read",
                "venue:write",
                "venue:admin",
            ],
        }
    }

    /// Returns true if this role grants `permission`.
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    /// Returns the most privileged role in `roles`, if any.
    pub fn highest<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Option<Role> {
        roles.into_iter().copied().max()
    }
}

/// Collects the deduplicated permissions of several roles.
pub fn permissions_of<'a>(roles: impl IntoIterator<Item = &'a Role>) -> BTreeSet<&'static str> {
    roles
        .into_iter()
        .flat_map(|role| role.permissions().iter().copied())
        .collect()
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ParseRoleError::new(s))
    }
}
