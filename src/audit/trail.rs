//! In-memory audit trail recorder.

use super::AuditEvent;
use std::cell::RefCell;

/// In-memory recorder for guard decisions.
///
/// Intended for tests and for per-request collection. Forward events to a
/// persistent sink if they must outlive the process.
///
/// # Example
///
/// ```
/// use role_guard::audit::{AuditEvent, AuditTrail};
/// use role_guard::Decision;
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new("dashboard", None::<String>, "admin", Decision::DenyUnauthenticated));
///
/// assert_eq!(trail.len(), 1);
/// assert_eq!(trail.denials().len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: RefCell<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    /// Records an event. Events keep insertion order.
    pub fn record(&self, event: AuditEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.borrow().clone()
    }

    /// Returns a snapshot of the recorded denials only.
    pub fn denials(&self) -> Vec<AuditEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.decision().is_denied())
            .cloned()
            .collect()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
