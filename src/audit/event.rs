//! Audit event schema.

use std::fmt;

use crate::decision::Decision;

/// A record of one guard decision.
///
/// # Example
///
/// ```
/// use role_guard::audit::AuditEvent;
/// use role_guard::Decision;
///
/// let event = AuditEvent::new(
///     "dashboard",
///     Some("manager-1"),
///     "admin | venue_manager",
///     Decision::Allow,
/// );
///
/// assert_eq!(event.view(), "dashboard");
/// assert_eq!(event.principal(), Some("manager-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Guarded view or route
    view: String,
    /// Identity id, None when unauthenticated
    principal: Option<String>,
    /// Rendered requirement, e.g. "admin | venue_manager"
    required: String,
    decision: Decision,
}

impl AuditEvent {
    /// Creates a new audit event.
    pub fn new(
        view: impl Into<String>,
        principal: Option<impl Into<String>>,
        required: impl Into<String>,
        decision: Decision,
    ) -> Self {
        Self {
            view: view.into(),
            principal: principal.map(Into::into),
            required: required.into(),
            decision,
        }
    }

    /// Returns the guarded view.
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Returns the identity id, if authenticated.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Returns the rendered requirement.
    pub fn required(&self) -> &str {
        &self.required
    }

    /// Returns the decision taken.
    pub fn decision(&self) -> Decision {
        self.decision
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[view={}, principal={}, required={}, decision={}]",
            self.view,
            self.principal.as_deref().unwrap_or("<none>"),
            self.required,
            self.decision
        )
    }
}
