//! Service lifecycle definitions.

/// Service lifecycles controlling instance caching behavior
///
/// Defines how service instances are created, cached, and shared by the
/// container. Constant-value registrations ignore this setting: a held value
/// is handed out as-is forever, an eternal singleton.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, Lifecycle};
/// use std::sync::Arc;
///
/// let container = Container::new();
///
/// // Singleton: one instance per container, shared forever
/// container.register_factory("config", Lifecycle::Singleton, |_| {
///     Ok(vec!["postgres://localhost".to_string()])
/// }).unwrap();
///
/// // Transient: fresh instance on every resolution
/// container.register_factory("buffer", Lifecycle::Transient, |_| {
///     Ok(Vec::<u8>::with_capacity(512))
/// }).unwrap();
///
/// let a = container.resolve::<Vec<String>>("config").unwrap();
/// let b = container.resolve::<Vec<String>>("config").unwrap();
/// assert!(Arc::ptr_eq(&a, &b)); // Same instance
///
/// let x = container.resolve::<Vec<u8>>("buffer").unwrap();
/// let y = container.resolve::<Vec<u8>>("buffer").unwrap();
/// assert!(!Arc::ptr_eq(&x, &y)); // Different instances
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// New instance per resolution, never cached
    Transient,
    /// Single instance per container, cached on the registration and shared
    /// across all future resolutions and all child containers that observe
    /// the registration through the hierarchy
    Singleton,
    /// Single instance per root resolution call; every reference within one
    /// dependency walk shares the instance, separate root calls get fresh
    /// ones
    Request,
}
