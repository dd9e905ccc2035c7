//! Error types for the dependency injection container.

use std::fmt;
use std::sync::Arc;

/// Dependency injection errors
///
/// Represents the error conditions that can occur during registration,
/// resolution, or container operations.
///
/// Registration lookups that miss (`unregister`, `has`, `service_names`)
/// are total and never produce an error; only `resolve` and `register`
/// calls can fail.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, DiError};
///
/// let container = Container::new();
/// match container.resolve::<String>("missing") {
///     Err(DiError::NotFound { service }) => {
///         assert_eq!(service, "missing#default");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No registration under the requested key and name
    NotFound {
        /// The `key#name` pair that missed
        service: String,
    },
    /// Register call targeted an already-occupied (key, name) without replace
    DuplicateRegistration {
        /// The `key#name` pair that collided
        service: String,
    },
    /// A registration carried neither a value nor a factory (or both)
    MisconfiguredRegistration {
        /// The `key#name` pair of the bad registration
        service: String,
    },
    /// Circular dependency declared by the detection algorithm
    CircularDependency {
        /// Resolution path at the point of detection, root first
        path: Vec<String>,
    },
    /// Typed accessor downcast failed at the call boundary
    TypeMismatch {
        /// The `key#name` pair that was resolved
        service: String,
        /// The type the caller asked for
        expected: &'static str,
    },
    /// Maximum resolution depth exceeded
    DepthExceeded {
        /// Stack depth at the point of failure
        depth: usize,
    },
    /// Failure produced by a user-supplied factory
    Factory {
        /// Human-readable description of the failure
        message: String,
    },
    /// A factory failed during resolution; wraps the causing error together
    /// with the (key, name) whose factory ran and the full resolution path
    /// at the point of failure. Never nested: an error already of this kind
    /// passes through enclosing frames unchanged.
    Resolution {
        /// The `key#name` whose factory failed
        service: String,
        /// Resolution path at the point of failure, root first
        stack: Vec<String>,
        /// The causing error
        source: Arc<DiError>,
    },
}

impl DiError {
    /// Convenience constructor for factory failures.
    ///
    /// ```rust
    /// use wirebox::{Container, DiError, Lifecycle};
    ///
    /// let container = Container::new();
    /// container.register_factory::<u32, _>("flaky", Lifecycle::Transient, |_| {
    ///     Err(DiError::factory("connection refused"))
    /// }).unwrap();
    /// assert!(container.resolve::<u32>("flaky").is_err());
    /// ```
    pub fn factory(message: impl Into<String>) -> Self {
        DiError::Factory { message: message.into() }
    }

    /// Walks through `Resolution` wrappers down to the originating error.
    pub fn root_cause(&self) -> &DiError {
        match self {
            DiError::Resolution { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound { service } => {
                write!(f, "Service not found: {}", service)
            }
            DiError::DuplicateRegistration { service } => {
                write!(f, "Service already registered: {}", service)
            }
            DiError::MisconfiguredRegistration { service } => {
                write!(f, "Registration for {} must hold exactly one of a value or a factory", service)
            }
            DiError::CircularDependency { path } => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::TypeMismatch { service, expected } => {
                write!(f, "Type mismatch resolving {}: not a {}", service, expected)
            }
            DiError::DepthExceeded { depth } => {
                write!(f, "Max resolution depth {} exceeded", depth)
            }
            DiError::Factory { message } => {
                write!(f, "Factory failed: {}", message)
            }
            DiError::Resolution { service, stack, source } => {
                write!(
                    f,
                    "Failed to resolve {} (path: {}): {}",
                    service,
                    stack.join(" -> "),
                    source
                )
            }
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::Resolution { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
