use std::fmt;

use crate::error::{Violation, ViolationKind};

/// The outcome of evaluating a guard.
///
/// Denials are ordinary values, not errors: callers are expected to turn
/// them into a visible effect (a redirect or a message).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Render the protected content
    Allow,
    /// No authenticated identity is present
    DenyUnauthenticated,
    /// The identity holds none of the required roles
    DenyForbidden,
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Returns true for either denial.
    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    /// Returns the conventional HTTP status for this decision.
    pub fn status_code(&self) -> u16 {
        match self {
            Decision::Allow => 200,
            Decision::DenyUnauthenticated => 401,
            Decision::DenyForbidden => 403,
        }
    }

    /// Converts a denial into a [`Violation`].
    ///
    /// # Errors
    ///
    /// Returns `Err(Violation)` for `DenyUnauthenticated` and `DenyForbidden`.
    ///
    /// # Examples
    ///
    /// ```
    /// use role_guard::{Decision, ViolationKind};
    ///
    /// assert!(Decision::Allow.into_result().is_ok());
    /// let err = Decision::DenyForbidden.into_result().unwrap_err();
    /// assert_eq!(err.kind, ViolationKind::Forbidden);
    /// ```
    pub fn into_result(self) -> Result<(), Violation> {
        match self {
            Decision::Allow => Ok(()),
            Decision::DenyUnauthenticated => Err(Violation::new(
                ViolationKind::Unauthenticated,
                "Authentication required",
            )),
            Decision::DenyForbidden => Err(Violation::new(
                ViolationKind::Forbidden,
                "Insufficient role for this view",
            )),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::DenyUnauthenticated => write!(f, "deny_unauthenticated"),
            Decision::DenyForbidden => write!(f, "deny_forbidden"),
        }
    }
}
