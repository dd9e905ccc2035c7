//! Service key types for the dependency injection container.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Key identifying a family of registrations in a container.
///
/// A key selects a service *family*; the registration name (default
/// `"default"`) disambiguates between multiple registrations under the same
/// key. Keys come in two flavors:
///
/// - **Type**: the identity of a Rust type, carrying its `TypeId` plus the
///   type name for diagnostics.
/// - **Name**: an interned string, for services registered and looked up by
///   name rather than by type.
///
/// String literals and `String`s convert into name keys, so most call sites
/// just pass `"database"` where a key is expected.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, ServiceKey};
///
/// let container = Container::new();
/// container.register_value("port", 8080u16).unwrap();
/// container.register_value(ServiceKey::of::<String>(), "hello".to_string()).unwrap();
///
/// let port = container.resolve::<u16>("port").unwrap();
/// let greeting = container.resolve::<String>(ServiceKey::of::<String>()).unwrap();
///
/// assert_eq!(*port, 8080);
/// assert_eq!(&*greeting, "hello");
/// ```
#[derive(Debug, Clone)]
pub enum ServiceKey {
    /// Type identity key with `TypeId` and type name for diagnostics
    Type(TypeId, &'static str),
    /// Interned string key
    Name(Arc<str>),
}

impl ServiceKey {
    /// Builds the type-identity key for `T`.
    pub fn of<T: 'static>() -> Self {
        ServiceKey::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Human-readable form of this key, used in error messages.
    pub fn display_name(&self) -> &str {
        match self {
            ServiceKey::Type(_, name) => name,
            ServiceKey::Name(name) => name,
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        ServiceKey::Name(Arc::from(name))
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        ServiceKey::Name(Arc::from(name))
    }
}

impl From<Arc<str>> for ServiceKey {
    fn from(name: Arc<str>) -> Self {
        ServiceKey::Name(name)
    }
}

// TypeId-only comparison for type keys; the name string is diagnostics-only.
impl PartialEq for ServiceKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ServiceKey::Type(a, _), ServiceKey::Type(b, _)) => a == b,
            (ServiceKey::Name(a), ServiceKey::Name(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ServiceKey {}

impl std::hash::Hash for ServiceKey {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            ServiceKey::Type(id, _) => {
                0u8.hash(state); // Discriminant
                id.hash(state);
            }
            ServiceKey::Name(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_keys_compare_by_type_id() {
        assert_eq!(ServiceKey::of::<String>(), ServiceKey::of::<String>());
        assert_ne!(ServiceKey::of::<String>(), ServiceKey::of::<u32>());
    }

    #[test]
    fn name_keys_compare_by_content() {
        assert_eq!(ServiceKey::from("db"), ServiceKey::from("db".to_string()));
        assert_ne!(ServiceKey::from("db"), ServiceKey::from("cache"));
    }

    #[test]
    fn type_and_name_keys_never_equal() {
        assert_ne!(ServiceKey::of::<String>(), ServiceKey::from("string"));
    }
}
