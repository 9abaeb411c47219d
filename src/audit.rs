//! Audit trail for guard decisions.
//!
//! This module provides:
//! - `AuditEvent`: Structured record of one guard decision
//! - `AuditTrail`: In-memory recorder of decisions
//! - `emit`: Emits an event through `tracing`
//!
//! Events record only identifiers and role names. Display names and any
//! other profile data of the caller are never stored.

mod event;
mod trail;

pub use event::AuditEvent;
pub use trail::AuditTrail;

/// Emits an audit event as a structured `tracing` event.
///
/// Denials are emitted at `warn`, grants at `info`, both under the
/// `role_guard_audit` target.
pub fn emit(event: &AuditEvent) {
    if event.decision().is_allowed() {
        tracing::info!(
            target: "role_guard_audit",
            view = %event.view(),
            principal = ?event.principal(),
            required = %event.required(),
            decision = %event.decision(),
            "audit event"
        );
    } else {
        tracing::warn!(
            target: "role_guard_audit",
            view = %event.view(),
            principal = ?event.principal(),
            required = %event.required(),
            decision = %event.decision(),
            status = event.decision().status_code(),
            "audit event"
        );
    }
}

/// Emits an event and also records it to `trail`.
pub fn emit_and_record(event: AuditEvent, trail: &AuditTrail) {
    emit(&event);
    trail.record(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Decision;

    #[test]
    fn emit_does_not_panic() {
        emit(&AuditEvent::new(
            "dashboard",
            None::<String>,
            "admin",
            Decision::DenyUnauthenticated,
        ));
    }

    #[test]
    fn emit_and_record_stores_event() {
        let trail = AuditTrail::new();
        emit_and_record(
            AuditEvent::new("users", Some("admin-1"), "admin", Decision::Allow),
            &trail,
        );
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.events()[0].principal(), Some("admin-1"));
    }
}
