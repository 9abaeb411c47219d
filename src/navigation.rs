//! Denial handling: what a protected view shows or where it sends the caller
//! when the guard says no.

use std::cell::RefCell;

use crate::decision::Decision;
use crate::error::{ConfigurationError, ConfigurationErrorKind};

/// Performs navigation side effects on behalf of a protected view.
pub trait Navigator {
    /// Navigates to the in-app path `target`.
    fn navigate(&self, target: &str);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, target: &str) {
        (**self).navigate(target)
    }
}

/// A navigator that records targets instead of navigating.
///
/// Useful in tests and server-side rendering, where the redirect is issued
/// by the caller after the render pass.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator with no recorded targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded targets in order.
    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }

    /// Returns the most recent target.
    pub fn last(&self) -> Option<String> {
        self.visited.borrow().last().cloned()
    }

    /// Clears recorded targets.
    pub fn clear(&self) {
        self.visited.borrow_mut().clear();
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.visited.borrow_mut().push(target.to_string());
    }
}

/// What to do instead of rendering protected content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Navigate elsewhere
    Redirect {
        /// Absolute in-app path
        to: String,
    },
    /// Render an inline message in place of the content
    Message {
        /// Short heading
        title: String,
        /// Explanation shown to the caller
        detail: String,
        /// Optional path offered as a way back
        back_to: Option<String>,
    },
}

impl Fallback {
    /// A redirect fallback.
    pub fn redirect(to: impl Into<String>) -> Self {
        Fallback::Redirect { to: to.into() }
    }

    /// A message fallback with no way back.
    pub fn message(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Fallback::Message {
            title: title.into(),
            detail: detail.into(),
            back_to: None,
        }
    }

    /// Sets the way-back path of a message fallback. No effect on redirects.
    pub fn with_back_to(mut self, path: impl Into<String>) -> Self {
        if let Fallback::Message { back_to, .. } = &mut self {
            *back_to = Some(path.into());
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            Fallback::Redirect { to } => validate_path(to),
            Fallback::Message { back_to, .. } => match back_to {
                Some(path) => validate_path(path),
                None => Ok(()),
            },
        }
    }
}

fn validate_path(path: &str) -> Result<(), ConfigurationError> {
    // Absolute in-app paths only. Browsers read "//host" and "/\\host" as
    // another origin, and strip tabs and newlines before doing so.
    let leaves_app = path.starts_with("//")
        || path.contains('\\')
        || path.chars().any(char::is_control);
    if path.starts_with('/') && !leaves_app {
        Ok(())
    } else {
        Err(ConfigurationError::new(
            ConfigurationErrorKind::InvalidRedirect,
            format!("'{}' is not an absolute in-app path", path),
        ))
    }
}

/// Maps each kind of denial to a [`Fallback`].
///
/// Unauthenticated and forbidden callers are handled independently. The
/// defaults send unauthenticated callers to `/login` and show forbidden
/// callers an "Access denied" message with a way back to `/dashboard`.
///
/// # Examples
///
/// ```
/// use role_guard::{Decision, DenialPolicy, Fallback};
///
/// let policy = DenialPolicy::builder()
///     .on_forbidden(Fallback::redirect("/unauthorized"))
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     policy.fallback_for(Decision::DenyUnauthenticated),
///     Some(&Fallback::redirect("/login"))
/// );
/// assert_eq!(
///     policy.fallback_for(Decision::DenyForbidden),
///     Some(&Fallback::redirect("/unauthorized"))
/// );
/// assert_eq!(policy.fallback_for(Decision::Allow), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenialPolicy {
    unauthenticated: Fallback,
    forbidden: Fallback,
}

impl DenialPolicy {
    /// Starts a policy from the defaults.
    pub fn builder() -> DenialPolicyBuilder {
        DenialPolicyBuilder {
            policy: DenialPolicy::default(),
        }
    }

    /// Returns the fallback for a decision, or `None` for `Allow`.
    pub fn fallback_for(&self, decision: Decision) -> Option<&Fallback> {
        match decision {
            Decision::Allow => None,
            Decision::DenyUnauthenticated => Some(&self.unauthenticated),
            Decision::DenyForbidden => Some(&self.forbidden),
        }
    }
}

impl Default for DenialPolicy {
    fn default() -> Self {
        Self {
            unauthenticated: Fallback::redirect("/login"),
            forbidden: Fallback::message(
                "Access denied",
                "You do not have sufficient permissions to access this page",
            )
            .with_back_to("/dashboard"),
        }
    }
}

/// Builder for [`DenialPolicy`].
#[derive(Debug, Clone)]
pub struct DenialPolicyBuilder {
    policy: DenialPolicy,
}

impl DenialPolicyBuilder {
    /// Sets the fallback for callers without an identity.
    pub fn on_unauthenticated(mut self, fallback: Fallback) -> Self {
        self.policy.unauthenticated = fallback;
        self
    }

    /// Sets the fallback for callers lacking a required role.
    pub fn on_forbidden(mut self, fallback: Fallback) -> Self {
        self.policy.forbidden = fallback;
        self
    }

    /// Validates the configured paths and builds the policy.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a redirect or way-back path is not
    /// an absolute in-app path.
    pub fn build(self) -> Result<DenialPolicy, ConfigurationError> {
        self.policy.unauthenticated.validate()?;
        self.policy.forbidden.validate()?;
        Ok(self.policy)
    }
}
