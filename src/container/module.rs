//! Module system for batched registration.
//!
//! A [`Module`] groups related registrations so a host can install them in
//! one call, keeping wiring for a subsystem in one place.

use crate::container::Container;
use crate::error::DiResult;

/// A batch of registrations installed into a container in one call.
///
/// The host invokes [`Container::install`] once per module; a module has no
/// lifecycle of its own beyond that call.
///
/// # Example
///
/// ```rust
/// use wirebox::{Container, DiResult, Lifecycle, Module};
///
/// struct Limits { max_connections: u32 }
///
/// struct StorageModule;
///
/// impl Module for StorageModule {
///     fn register(&self, container: &Container) -> DiResult<()> {
///         container.register_value("storage-root", "/var/lib/app".to_string())?;
///         container.register_factory("limits", Lifecycle::Singleton, |_| {
///             Ok(Limits { max_connections: 32 })
///         })?;
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container.install(StorageModule).unwrap();
/// assert_eq!(container.resolve::<Limits>("limits").unwrap().max_connections, 32);
/// ```
pub trait Module {
    /// Registers this module's services with the container.
    fn register(&self, container: &Container) -> DiResult<()>;
}
