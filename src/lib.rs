//! Role-gated access guards for protected views.
//!
//! This crate decides whether the current caller may see a protected view:
//! - **Roles**: a small, fixed set of [`Role`]s with a privilege order and permissions
//! - **Requirements**: non-empty [`RoleRequirement`]s, validated when guards are built
//! - **Decisions**: a pure [`authorize`] function returning a [`Decision`]
//! - **Views**: [`ProtectedView`] renders children only on `Allow` and resolves
//!   denials into a redirect or a message
//!
//! Session handling and token validation are not part of this crate; the
//! current caller is supplied through an [`IdentityProvider`].
//!
//! # Core Types
//!
//! - [`Identity`]: An authenticated caller holding one or more roles
//! - [`AccessGuard`] / [`Guard`]: Builder and validated guard for one view
//! - [`DenialPolicy`]: Maps each kind of denial to a [`Fallback`]
//! - [`RouteGuards`]: Longest-prefix table of guarded routes
//!
//! # Examples
//!
//! ```
//! use role_guard::{authorize, Decision, Identity, Role};
//!
//! let dashboard = [Role::Admin, Role::VenueManager];
//!
//! let admin = Identity::new("admin-1", "Administrator", Role::Admin);
//! assert_eq!(authorize(&dashboard, Some(&admin)).unwrap(), Decision::Allow);
//!
//! let guest = Identity::new("guest-1", "Guest", Role::Guest);
//! assert_eq!(authorize(&dashboard, Some(&guest)).unwrap(), Decision::DenyForbidden);
//!
//! assert_eq!(authorize(&dashboard, None).unwrap(), Decision::DenyUnauthenticated);
//!
//! // An empty requirement is a configuration error
//! assert!(authorize(&[], Some(&admin)).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod decision;
mod error;
mod guard;
mod identity;
mod navigation;
mod provider;
mod requirement;
mod role;
mod routes;
mod view;

pub use decision::Decision;
pub use error::{
    ConfigurationError, ConfigurationErrorKind, Error, ParseRoleError, Violation, ViolationKind,
};
pub use guard::{
    authorize, authorize_owner, authorize_permission, decide, AccessGuard, Guard,
};
pub use identity::Identity;
pub use navigation::{DenialPolicy, DenialPolicyBuilder, Fallback, Navigator, RecordingNavigator};
pub use provider::{IdentityProvider, IdentityState, StaticIdentity};
pub use requirement::{RoleMatch, RoleRequirement};
pub use role::{permissions_of, Role};
pub use routes::{RouteGuards, RouteGuardsBuilder};
pub use view::{ProtectedView, ViewOutcome};
