use std::fmt;

/// Errors that can occur while configuring or using a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The guard was configured incorrectly (programmer error)
    Configuration(ConfigurationError),
    /// A role name could not be parsed
    UnknownRole(ParseRoleError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "Guard configuration error: {}", e),
            Error::UnknownRole(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Configuration(e) => Some(e),
            Error::UnknownRole(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Configuration(e)
    }
}

impl From<ParseRoleError> for Error {
    fn from(e: ParseRoleError) -> Self {
        Error::UnknownRole(e)
    }
}

/// A misconfigured guard, requirement, denial policy, or route table.
///
/// These are raised when guards are built, not when they are evaluated, so
/// that a broken configuration fails at startup instead of per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    /// What was wrong
    pub kind: ConfigurationErrorKind,
    /// Human-readable detail
    pub message: String,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    pub fn new(kind: ConfigurationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn empty_requirement() -> Self {
        Self::new(
            ConfigurationErrorKind::EmptyRequirement,
            "a role requirement must name at least one role",
        )
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigurationError {}

/// The kind of configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationErrorKind {
    /// A requirement with no roles
    EmptyRequirement,
    /// A redirect target that is not an absolute in-app path
    InvalidRedirect,
    /// A route pattern that is not an absolute path
    InvalidRoute,
    /// The same route was guarded twice
    DuplicateRoute,
}

impl fmt::Display for ConfigurationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationErrorKind::EmptyRequirement => write!(f, "empty requirement"),
            ConfigurationErrorKind::InvalidRedirect => write!(f, "invalid redirect"),
            ConfigurationErrorKind::InvalidRoute => write!(f, "invalid route"),
            ConfigurationErrorKind::DuplicateRoute => write!(f, "duplicate route"),
        }
    }
}

/// Returned when a string does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    input: String,
}

impl ParseRoleError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.input)
    }
}

impl std::error::Error for ParseRoleError {}

/// A denied access decision, for callers that prefer `?` over matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

/// The kind of access violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// No authenticated identity was present
    Unauthenticated,
    /// An identity was present but holds none of the required roles
    Forbidden,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unauthenticated => write!(f, "Unauthenticated"),
            ViolationKind::Forbidden => write!(f, "Forbidden"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_converts_into_error() {
        let err: Error = ConfigurationError::empty_requirement().into();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError {
                kind: ConfigurationErrorKind::EmptyRequirement,
                ..
            })
        ));
        assert!(err.to_string().starts_with("Guard configuration error"));
    }

    #[test]
    fn parse_role_error_keeps_input() {
        let err = ParseRoleError::new("superuser");
        assert_eq!(err.input(), "superuser");
        assert_eq!(err.to_string(), "unknown role 'superuser'");
    }

    #[test]
    fn violation_display() {
        let v = Violation::new(ViolationKind::Forbidden, "role 'client' not permitted");
        assert_eq!(v.to_string(), "Forbidden: role 'client' not permitted");
    }

    #[test]
    fn error_source_is_inner() {
        use std::error::Error as _;
        let err = Error::from(ParseRoleError::new("x"));
        assert!(err.source().is_some());
    }
}
