//! Identity provider boundary.
//!
//! The guard never establishes identities itself. Session handling, token
//! validation and user lookup live behind [`IdentityProvider`]; the guard
//! only consumes the resolved state.

use crate::identity::Identity;

/// The identity state reported by a provider for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    /// Resolution has not finished yet (e.g. a session is being restored)
    Pending,
    /// Resolution finished and no caller is authenticated
    Anonymous,
    /// Resolution finished with an authenticated caller
    Authenticated(Identity),
}

impl IdentityState {
    /// Returns the identity if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            IdentityState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Returns true while resolution is pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, IdentityState::Pending)
    }
}

impl From<Option<Identity>> for IdentityState {
    fn from(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => IdentityState::Authenticated(identity),
            None => IdentityState::Anonymous,
        }
    }
}

/// Supplies the current caller to guards.
///
/// # Examples
///
/// ```
/// use role_guard::{Identity, IdentityProvider, IdentityState, Role};
///
/// struct Session {
///     user: Option<Identity>,
/// }
///
/// impl IdentityProvider for Session {
///     fn resolve(&self) -> IdentityState {
///         self.user.clone().into()
///     }
/// }
///
/// let session = Session { user: Some(Identity::new("u1", "Ana", Role::Admin)) };
/// assert!(session.resolve().identity().is_some());
/// ```
pub trait IdentityProvider {
    /// Resolves the identity for the current render pass.
    fn resolve(&self) -> IdentityState;
}

impl IdentityProvider for Option<Identity> {
    fn resolve(&self) -> IdentityState {
        self.clone().into()
    }
}

impl<P: IdentityProvider + ?Sized> IdentityProvider for &P {
    fn resolve(&self) -> IdentityState {
        (**self).resolve()
    }
}

/// A provider that always reports the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    state: IdentityState,
}

impl StaticIdentity {
    /// A provider reporting an authenticated identity.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            state: IdentityState::Authenticated(identity),
        }
    }

    /// A provider reporting no authenticated caller.
    pub fn anonymous() -> Self {
        Self {
            state: IdentityState::Anonymous,
        }
    }

    /// A provider that never finishes resolving.
    pub fn pending() -> Self {
        Self {
            state: IdentityState::Pending,
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn resolve(&self) -> IdentityState {
        self.state.clone()
    }
}
