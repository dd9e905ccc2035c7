//! # wirebox
//!
//! Hierarchical, named-service dependency injection with request scoping and
//! circular reference breaking.
//!
//! ## Features
//!
//! - **Named registrations**: any number of named variants per service key,
//!   `"default"` when unnamed
//! - **Lifecycles**: Transient, Singleton, and Request (one instance per
//!   root resolution call)
//! - **Container hierarchy**: child containers transparently see and
//!   override their ancestors without mutating them
//! - **Snapshots**: LIFO backup/restore of a container's registrations,
//!   handy around test cases
//! - **Circular references**: a replay-based detection guard plus two
//!   opt-in breaking mechanisms (deferred stand-ins and delayed injection)
//!
//! ## Quick start
//!
//! ```rust
//! use wirebox::{Container, Lifecycle};
//!
//! struct Database { url: String }
//! struct UserService { db_url: String }
//!
//! let container = Container::new();
//! container.register_factory("database", Lifecycle::Singleton, |_| {
//!     Ok(Database { url: "postgres://localhost".to_string() })
//! }).unwrap();
//! container.register_factory("users", Lifecycle::Transient, |ctx| {
//!     let db = ctx.resolve::<Database>("database")?;
//!     Ok(UserService { db_url: db.url.clone() })
//! }).unwrap();
//!
//! let users = container.resolve::<UserService>("users").unwrap();
//! assert_eq!(users.db_url, "postgres://localhost");
//! ```
//!
//! ## Hierarchy
//!
//! ```rust
//! use wirebox::Container;
//!
//! let parent = Container::new();
//! parent.register_value("env", "production".to_string()).unwrap();
//!
//! let child = parent.create_child();
//! assert_eq!(&*child.resolve::<String>("env").unwrap(), "production");
//!
//! // The child's own registration wins without touching the parent.
//! child.register_value("env", "test".to_string()).unwrap();
//! assert_eq!(&*child.resolve::<String>("env").unwrap(), "test");
//! assert_eq!(&*parent.resolve::<String>("env").unwrap(), "production");
//! ```
//!
//! ## Request lifecycle
//!
//! ```rust
//! use wirebox::{Container, Dependency, Lifecycle};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! static NEXT: AtomicU64 = AtomicU64::new(1);
//! struct RequestId(u64);
//!
//! let container = Container::new();
//! container.register_factory("request-id", Lifecycle::Request, |_| {
//!     Ok(RequestId(NEXT.fetch_add(1, Ordering::SeqCst)))
//! }).unwrap();
//!
//! // Shared inside one root call...
//! let pair = container.resolve_tuple(&[
//!     Dependency::service("request-id"),
//!     Dependency::service("request-id"),
//! ]).unwrap();
//! assert!(Arc::ptr_eq(&pair[0], &pair[1]));
//!
//! // ...but never across root calls.
//! let again = container.resolve::<RequestId>("request-id").unwrap();
//! assert_ne!(again.0, 1);
//! ```

// Module declarations
pub mod container;
pub mod context;
pub mod deferred;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifecycle;

// Internal modules
mod internal;
mod registration;

/// Registration name used wherever a name is omitted.
pub const DEFAULT_NAME: &str = "default";

// Re-export core types
pub use container::{Container, Module};
pub use context::ResolutionContext;
pub use deferred::Deferred;
pub use descriptors::Dependency;
pub use error::{DiError, DiResult};
pub use key::ServiceKey;
pub use lifecycle::Lifecycle;
pub use registration::{downcast_arc, AnyArc, RegistrationOptions};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_singleton_resolution() {
        let container = Container::new();
        container.register_value("answer", 42usize).unwrap();

        let a = container.resolve::<usize>("answer").unwrap();
        let b = container.resolve::<usize>("answer").unwrap();

        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b)); // Same instance
    }

    #[test]
    fn test_transient_resolution() {
        let container = Container::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        container
            .register_factory("instance", Lifecycle::Transient, move |_| {
                Ok(format!(
                    "instance-{}",
                    counter_clone.fetch_add(1, Ordering::SeqCst) + 1
                ))
            })
            .unwrap();

        let a = container.resolve::<String>("instance").unwrap();
        let b = container.resolve::<String>("instance").unwrap();

        assert_eq!(a.as_str(), "instance-1");
        assert_eq!(b.as_str(), "instance-2");
        assert!(!Arc::ptr_eq(&a, &b)); // Different instances
    }

    #[test]
    fn test_not_found() {
        let container = Container::new();
        let result = container.resolve::<String>("missing");
        assert!(matches!(result, Err(DiError::NotFound { .. })));
    }

    #[test]
    fn test_child_override() {
        let parent = Container::new();
        parent.register_value("value", 1u32).unwrap();

        let child = parent.create_child();
        assert_eq!(*child.resolve::<u32>("value").unwrap(), 1);

        child.register_value("value", 2u32).unwrap();
        assert_eq!(*child.resolve::<u32>("value").unwrap(), 2);
        assert_eq!(*parent.resolve::<u32>("value").unwrap(), 1);
    }

    #[test]
    fn test_type_mismatch() {
        let container = Container::new();
        container.register_value("answer", 42usize).unwrap();
        let result = container.resolve::<String>("answer");
        assert!(matches!(result, Err(DiError::TypeMismatch { .. })));
    }
}
