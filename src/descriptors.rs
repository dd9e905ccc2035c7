//! Dependency descriptors for declarative construction.

use crate::key::ServiceKey;
use crate::registration::AnyArc;
use std::sync::Arc;

/// One positional dependency of a declaratively constructed service.
///
/// Used by [`register_constructed`](crate::Container::register_constructed)
/// and [`resolve_tuple`](crate::Container::resolve_tuple): each descriptor
/// either names a registration to resolve or carries a literal value that
/// passes through untouched.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, Dependency, Lifecycle, downcast_arc};
///
/// struct Greeter { name: String }
///
/// let container = Container::new();
/// container.register_constructed(
///     "greeter",
///     Lifecycle::Transient,
///     vec![Dependency::constant("Ada".to_string())],
///     |parts| {
///         let name = downcast_arc::<String>(parts[0].clone(), "greeter#default")?;
///         Ok(Greeter { name: name.as_str().to_string() })
///     },
/// ).unwrap();
///
/// let greeter = container.resolve::<Greeter>("greeter").unwrap();
/// assert_eq!(greeter.name, "Ada");
/// ```
#[derive(Clone)]
pub enum Dependency {
    /// Resolve the `"default"` registration under this key
    Service(ServiceKey),
    /// Resolve a specific named registration under this key
    Named(ServiceKey, Arc<str>),
    /// Pass this literal through without touching the registry
    Constant(AnyArc),
}

impl Dependency {
    /// Dependency on the `"default"` registration under `key`.
    pub fn service(key: impl Into<ServiceKey>) -> Self {
        Dependency::Service(key.into())
    }

    /// Dependency on the (`key`, `name`) registration.
    pub fn named(key: impl Into<ServiceKey>, name: &str) -> Self {
        Dependency::Named(key.into(), Arc::from(name))
    }

    /// Literal dependency; the value is handed to the constructor as-is.
    pub fn constant<T: Send + Sync + 'static>(value: T) -> Self {
        Dependency::Constant(Arc::new(value) as AnyArc)
    }
}
