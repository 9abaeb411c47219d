//! Protected views: evaluate a guard once per render pass and either render
//! the protected children or resolve the denial into a visible effect.
//!
//! # Render flow
//!
//! ```text
//! IdentityProvider::resolve()
//!   ├─ Pending        → ViewOutcome::Pending (children not evaluated)
//!   └─ Anonymous / Authenticated
//!        ↓
//!      Guard::check()
//!        ├─ Allow     → ViewOutcome::Rendered(children())
//!        └─ Deny*     → DenialPolicy
//!                         ├─ Redirect → Navigator::navigate(), ViewOutcome::Redirected
//!                         └─ Message  → ViewOutcome::Denied
//! ```

use crate::audit::{self, AuditEvent, AuditTrail};
use crate::decision::Decision;
use crate::guard::Guard;
use crate::navigation::{DenialPolicy, Fallback, Navigator};
use crate::provider::{IdentityProvider, IdentityState};

/// The result of rendering a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome<T> {
    /// Identity resolution is still in progress; nothing was decided
    Pending,
    /// Access was allowed and the children were rendered
    Rendered(T),
    /// Access was denied and the navigator was sent to `to`
    Redirected {
        /// The denial that caused the redirect
        decision: Decision,
        /// Redirect target
        to: String,
    },
    /// Access was denied and a message is shown instead of the children
    Denied {
        /// The denial being explained
        decision: Decision,
        /// Short heading
        title: String,
        /// Explanation shown to the caller
        detail: String,
        /// Optional path offered as a way back
        back_to: Option<String>,
    },
}

impl<T> ViewOutcome<T> {
    /// Returns the rendered children, if access was allowed.
    pub fn rendered(self) -> Option<T> {
        match self {
            ViewOutcome::Rendered(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the decision taken, or `None` while pending.
    pub fn decision(&self) -> Option<Decision> {
        match self {
            ViewOutcome::Pending => None,
            ViewOutcome::Rendered(_) => Some(Decision::Allow),
            ViewOutcome::Redirected { decision, .. } | ViewOutcome::Denied { decision, .. } => {
                Some(*decision)
            }
        }
    }
}

/// A guard paired with the policy for handling its denials.
///
/// # Examples
///
/// ```
/// use role_guard::{
///     AccessGuard, Identity, ProtectedView, RecordingNavigator, Role, StaticIdentity,
///     ViewOutcome,
/// };
///
/// let guard = AccessGuard::new("dashboard")
///     .require_any([Role::Admin, Role::VenueManager])
///     .build()
///     .unwrap();
/// let view = ProtectedView::new(guard);
/// let navigator = RecordingNavigator::new();
///
/// let admin = StaticIdentity::authenticated(Identity::new("a1", "Admin", Role::Admin));
/// let outcome = view.render(&admin, &navigator, || "dashboard body");
/// assert_eq!(outcome, ViewOutcome::Rendered("dashboard body"));
///
/// let outcome = view.render(&StaticIdentity::anonymous(), &navigator, || "dashboard body");
/// assert!(matches!(outcome, ViewOutcome::Redirected { .. }));
/// assert_eq!(navigator.last().as_deref(), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedView {
    guard: Guard,
    denial: DenialPolicy,
}

impl ProtectedView {
    /// Wraps a guard with the default denial policy.
    pub fn new(guard: Guard) -> Self {
        Self {
            guard,
            denial: DenialPolicy::default(),
        }
    }

    /// Replaces the denial policy.
    pub fn with_denial_policy(mut self, denial: DenialPolicy) -> Self {
        self.denial = denial;
        self
    }

    /// Returns the guard.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// Returns the denial policy.
    pub fn denial_policy(&self) -> &DenialPolicy {
        &self.denial
    }

    /// Renders the view for the identity reported by `provider`.
    ///
    /// `children` is only called when the decision is `Allow`.
    pub fn render<P, N, F, T>(&self, provider: &P, navigator: &N, children: F) -> ViewOutcome<T>
    where
        P: IdentityProvider + ?Sized,
        N: Navigator + ?Sized,
        F: FnOnce() -> T,
    {
        self.render_inner(provider, navigator, None, children)
    }

    /// Like [`render`](Self::render), also recording the decision to `trail`.
    pub fn render_audited<P, N, F, T>(
        &self,
        provider: &P,
        navigator: &N,
        trail: &AuditTrail,
        children: F,
    ) -> ViewOutcome<T>
    where
        P: IdentityProvider + ?Sized,
        N: Navigator + ?Sized,
        F: FnOnce() -> T,
    {
        self.render_inner(provider, navigator, Some(trail), children)
    }

    fn render_inner<P, N, F, T>(
        &self,
        provider: &P,
        navigator: &N,
        trail: Option<&AuditTrail>,
        children: F,
    ) -> ViewOutcome<T>
    where
        P: IdentityProvider + ?Sized,
        N: Navigator + ?Sized,
        F: FnOnce() -> T,
    {
        let state = provider.resolve();
        if let IdentityState::Pending = state {
            tracing::trace!(target: "role_guard", view = %self.guard.view(), "identity pending");
            return ViewOutcome::Pending;
        }

        let identity = state.identity();
        let decision = self.guard.check(identity);

        if let Some(trail) = trail {
            audit::emit_and_record(
                AuditEvent::new(
                    self.guard.view(),
                    identity.map(|id| id.id().to_string()),
                    self.guard.requirement().to_string(),
                    decision,
                ),
                trail,
            );
        }

        match self.denial.fallback_for(decision) {
            None => ViewOutcome::Rendered(children()),
            Some(Fallback::Redirect { to }) => {
                navigator.navigate(to);
                ViewOutcome::Redirected {
                    decision,
                    to: to.clone(),
                }
            }
            Some(Fallback::Message {
                title,
                detail,
                back_to,
            }) => ViewOutcome::Denied {
                decision,
                title: title.clone(),
                detail: detail.clone(),
                back_to: back_to.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::AccessGuard;
    use crate::identity::Identity;
    use crate::navigation::RecordingNavigator;
    use crate::provider::StaticIdentity;
    use crate::role::Role;
    use std::cell::Cell;

    fn dashboard() -> ProtectedView {
        let guard = AccessGuard::new("dashboard")
            .require_any([Role::Admin, Role::VenueManager])
            .build()
            .unwrap();
        ProtectedView::new(guard)
    }

    #[test]
    fn allowed_identity_renders_children() {
        let nav = RecordingNavigator::new();
        let provider =
            StaticIdentity::authenticated(Identity::new("m1", "Manager", Role::VenueManager));

        let outcome = dashboard().render(&provider, &nav, || 42);

        assert_eq!(outcome, ViewOutcome::Rendered(42));
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn pending_identity_short_circuits() {
        let nav = RecordingNavigator::new();
        let called = Cell::new(false);

        let outcome = dashboard().render(&StaticIdentity::pending(), &nav, || called.set(true));

        assert_eq!(outcome, ViewOutcome::Pending);
        assert_eq!(outcome.decision(), None);
        assert!(!called.get());
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn anonymous_is_redirected_to_login() {
        let nav = RecordingNavigator::new();
        let called = Cell::new(false);

        let outcome = dashboard().render(&StaticIdentity::anonymous(), &nav, || called.set(true));

        assert_eq!(
            outcome,
            ViewOutcome::Redirected {
                decision: Decision::DenyUnauthenticated,
                to: "/login".to_string(),
            }
        );
        assert!(!called.get());
        assert_eq!(nav.visited(), vec!["/login"]);
    }

    #[test]
    fn forbidden_shows_message_without_navigating() {
        let nav = RecordingNavigator::new();
        let provider = StaticIdentity::authenticated(Identity::new("c1", "Client", Role::Client));

        let outcome = dashboard().render(&provider, &nav, || ());

        match outcome {
            ViewOutcome::Denied {
                decision, back_to, ..
            } => {
                assert_eq!(decision, Decision::DenyForbidden);
                assert_eq!(back_to.as_deref(), Some("/dashboard"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn custom_policy_redirects_forbidden() {
        let policy = DenialPolicy::builder()
            .on_forbidden(Fallback::redirect("/unauthorized"))
            .build()
            .unwrap();
        let view = dashboard().with_denial_policy(policy);
        let nav = RecordingNavigator::new();
        let provider = StaticIdentity::authenticated(Identity::new("g1", "Guest", Role::Guest));

        let outcome = view.render(&provider, &nav, || ());

        assert_eq!(outcome.decision(), Some(Decision::DenyForbidden));
        assert_eq!(nav.last().as_deref(), Some("/unauthorized"));
    }

    #[test]
    fn audited_render_records_each_decision() {
        let view = dashboard();
        let nav = RecordingNavigator::new();
        let trail = AuditTrail::new();
        let admin = StaticIdentity::authenticated(Identity::new("a1", "Admin", Role::Admin));

        view.render_audited(&admin, &nav, &trail, || ());
        view.render_audited(&StaticIdentity::anonymous(), &nav, &trail, || ());
        view.render_audited(&StaticIdentity::pending(), &nav, &trail, || ());

        let events = trail.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].principal(), Some("a1"));
        assert_eq!(events[0].decision(), Decision::Allow);
        assert_eq!(events[0].required(), "venue_manager | admin");
        assert_eq!(events[1].decision(), Decision::DenyUnauthenticated);
    }

    #[test]
    fn rendered_accessor() {
        assert_eq!(ViewOutcome::Rendered("x").rendered(), Some("x"));
        assert_eq!(ViewOutcome::<&str>::Pending.rendered(), None);
    }
}
