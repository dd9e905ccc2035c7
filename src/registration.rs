//! Service registration records and the per-container registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::ResolutionContext;
use crate::error::{DiError, DiResult};
use crate::key::ServiceKey;
use crate::lifecycle::Lifecycle;

/// Type-erased shared handle to a resolved service instance.
///
/// The registry stores every service behind this alias; typed access happens
/// only at the call boundary via [`downcast_arc`] or the generic `resolve`
/// methods.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Factory signature stored in a registration.
pub(crate) type FactoryFn =
    Arc<dyn for<'a> Fn(&'a ResolutionContext) -> DiResult<AnyArc> + Send + Sync>;

/// Downcasts a type-erased service handle to a concrete type.
///
/// # Examples
///
/// ```rust
/// use wirebox::{downcast_arc, AnyArc};
/// use std::sync::Arc;
///
/// let any: AnyArc = Arc::new(7u32);
/// let n = downcast_arc::<u32>(any, "seven#default").unwrap();
/// assert_eq!(*n, 7);
/// ```
pub fn downcast_arc<T: Send + Sync + 'static>(value: AnyArc, service: &str) -> DiResult<Arc<T>> {
    value.downcast::<T>().map_err(|_| DiError::TypeMismatch {
        service: service.to_string(),
        expected: std::any::type_name::<T>(),
    })
}

/// What a registration produces: a held value or a factory.
#[derive(Clone)]
pub(crate) enum Provider {
    /// Already-produced instance; handed out as-is forever
    Value(AnyArc),
    /// Produces a value against the live resolution context
    Factory(FactoryFn),
}

/// One named registration under a service key.
///
/// Identity is (key, name), unique within one registry. The `cached` slot is
/// populated lazily the first time a singleton-lifecycle factory runs and is
/// owned by this record until it is replaced, unregistered, or swapped out by
/// a snapshot restore.
pub(crate) struct Registration {
    pub(crate) name: Arc<str>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) provider: Provider,
    pub(crate) cached: Mutex<Option<AnyArc>>,
}

impl Registration {
    pub(crate) fn new(name: Arc<str>, lifecycle: Lifecycle, provider: Provider) -> Self {
        Self {
            name,
            lifecycle,
            provider,
            cached: Mutex::new(None),
        }
    }

    /// Copies this record into a fresh one with an independent cache slot.
    ///
    /// The slot is seeded with the currently materialized instance (shared by
    /// handle); later cache writes on either record do not reach the other.
    pub(crate) fn deep_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            lifecycle: self.lifecycle,
            provider: self.provider.clone(),
            cached: Mutex::new(self.cached.lock().clone()),
        }
    }
}

/// Options describing one registration, consumed by
/// [`Container::register_with`](crate::Container::register_with).
///
/// Exactly one of a value or a factory must be supplied; supplying neither
/// (or both) fails with
/// [`DiError::MisconfiguredRegistration`](crate::DiError::MisconfiguredRegistration).
/// The convenience `register_*` methods on `Container` build these
/// internally; reach for the options form when you need `replace` or a
/// non-default name together with full control.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, RegistrationOptions};
///
/// let container = Container::new();
/// container.register_with("answer", RegistrationOptions::value(41u32)).unwrap();
///
/// // Overwrite requires replace
/// assert!(container.register_with("answer", RegistrationOptions::value(42u32)).is_err());
/// container.register_with("answer", RegistrationOptions::value(42u32).replace(true)).unwrap();
///
/// assert_eq!(*container.resolve::<u32>("answer").unwrap(), 42);
/// ```
pub struct RegistrationOptions {
    pub(crate) name: Arc<str>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) replace: bool,
    pub(crate) value: Option<AnyArc>,
    pub(crate) factory: Option<FactoryFn>,
}

impl RegistrationOptions {
    /// Empty options: name `"default"`, Transient, no provider. Useless
    /// until a value or factory is attached; registering them as-is fails
    /// with `MisconfiguredRegistration`.
    pub fn new() -> Self {
        Self {
            name: Arc::from(crate::DEFAULT_NAME),
            lifecycle: Lifecycle::Transient,
            replace: false,
            value: None,
            factory: None,
        }
    }

    /// Options holding an already-produced value (an eternal singleton).
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        let mut opts = Self::new();
        opts.lifecycle = Lifecycle::Singleton;
        opts.value = Some(Arc::new(value) as AnyArc);
        opts
    }

    /// Options holding a typed factory with the given lifecycle.
    pub fn factory<T, F>(lifecycle: Lifecycle, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&'a ResolutionContext) -> DiResult<T> + Send + Sync + 'static,
    {
        Self::factory_raw(
            lifecycle,
            Arc::new(move |ctx: &ResolutionContext| factory(ctx).map(|v| Arc::new(v) as AnyArc)),
        )
    }

    pub(crate) fn factory_raw(lifecycle: Lifecycle, factory: FactoryFn) -> Self {
        let mut opts = Self::new();
        opts.lifecycle = lifecycle;
        opts.factory = Some(factory);
        opts
    }

    /// Registers under `name` instead of `"default"`.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Arc::from(name);
        self
    }

    /// Allows overwriting an existing registration under the same (key, name).
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub(crate) fn into_registration(self, service: &str) -> DiResult<Registration> {
        let provider = match (self.value, self.factory) {
            (Some(value), None) => Provider::Value(value),
            (None, Some(factory)) => Provider::Factory(factory),
            _ => {
                return Err(DiError::MisconfiguredRegistration {
                    service: service.to_string(),
                })
            }
        };
        Ok(Registration::new(self.name, self.lifecycle, provider))
    }
}

/// Mapping from service key to the ordered list of named registrations.
///
/// List order is insertion order and observable through `service_names` and
/// `resolve_all`. Records are shared via `Arc` so a merged view resolves
/// against the same record the owning container holds, letting singleton
/// cache writes survive the view.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    map: HashMap<ServiceKey, Vec<Arc<Registration>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites; append if the name is new, replace in place if
    /// overwriting. Fails with `DuplicateRegistration` unless `replace`.
    pub(crate) fn insert(
        &mut self,
        key: ServiceKey,
        registration: Registration,
        replace: bool,
    ) -> DiResult<()> {
        let list = self.map.entry(key.clone()).or_default();
        if let Some(pos) = list.iter().position(|r| r.name == registration.name) {
            if !replace {
                return Err(DiError::DuplicateRegistration {
                    service: format!("{}#{}", key, registration.name),
                });
            }
            list[pos] = Arc::new(registration);
        } else {
            list.push(Arc::new(registration));
        }
        Ok(())
    }

    /// Drops one name, or every name when `name` is `None`. Total: absent
    /// keys and names are a no-op.
    pub(crate) fn remove(&mut self, key: &ServiceKey, name: Option<&str>) {
        match name {
            None => {
                self.map.remove(key);
            }
            Some(name) => {
                if let Some(list) = self.map.get_mut(key) {
                    list.retain(|r| &*r.name != name);
                    if list.is_empty() {
                        self.map.remove(key);
                    }
                }
            }
        }
    }

    pub(crate) fn get(&self, key: &ServiceKey, name: &str) -> Option<Arc<Registration>> {
        self.map
            .get(key)?
            .iter()
            .find(|r| &*r.name == name)
            .cloned()
    }

    pub(crate) fn contains(&self, key: &ServiceKey, name: Option<&str>) -> bool {
        match name {
            None => self.map.get(key).is_some_and(|list| !list.is_empty()),
            Some(name) => self.get(key, name).is_some(),
        }
    }

    /// Registration names under `key`, in list order.
    pub(crate) fn names(&self, key: &ServiceKey) -> Vec<Arc<str>> {
        self.map
            .get(key)
            .map(|list| list.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Copies every record into an independent registry (fresh cache slots).
    pub(crate) fn deep_copy(&self) -> Self {
        let map = self
            .map
            .iter()
            .map(|(key, list)| {
                let copied = list.iter().map(|r| Arc::new(r.deep_copy())).collect();
                (key.clone(), copied)
            })
            .collect();
        Self { map }
    }

    /// Merges this registry (the child's own) over an ancestor view.
    ///
    /// Per key: names that also exist in `base` are replaced in place,
    /// preserving the ancestor's positional order; child-only names are
    /// appended at the end.
    pub(crate) fn overlay_onto(&self, mut base: Registry) -> Registry {
        for (key, own) in &self.map {
            let list = base.map.entry(key.clone()).or_default();
            for registration in own {
                if let Some(pos) = list.iter().position(|r| r.name == registration.name) {
                    list[pos] = registration.clone();
                } else {
                    list.push(registration.clone());
                }
            }
        }
        base
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn iter(
        &self,
    ) -> impl Iterator<Item = (&ServiceKey, &Vec<Arc<Registration>>)> {
        self.map.iter()
    }
}
