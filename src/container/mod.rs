//! Hierarchical service container.
//!
//! A [`Container`] owns a registry of named registrations, an optional
//! parent link, and a stack of registry snapshots. Every root resolution
//! call computes the parent-merged view fresh, builds a
//! [`ResolutionContext`] over it, and discards the context when the call
//! returns.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::context::ResolutionContext;
use crate::deferred::Deferred;
use crate::descriptors::Dependency;
use crate::error::DiResult;
use crate::key::ServiceKey;
use crate::lifecycle::Lifecycle;
use crate::registration::{AnyArc, RegistrationOptions, Registry};
use crate::DEFAULT_NAME;

pub mod module;
pub use module::Module;

struct ContainerInner {
    registry: RwLock<Registry>,
    parent: Option<Container>,
    snapshots: Mutex<Vec<Registry>>,
}

/// Hierarchical, thread-safe service container.
///
/// Handles are cheap to clone (`Arc` internally) and share one registry.
/// A child container created with [`create_child`](Container::create_child)
/// transparently sees its ancestors' registrations until it registers its
/// own entry under the same key and name, which then wins for the child and
/// its descendants without touching the parent.
///
/// Registry mutation is internally synchronized but not linearizable under
/// concurrent writers; coordinate externally if registration and resolution
/// race across threads.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, Lifecycle};
///
/// struct Clock { started: u64 }
///
/// let container = Container::new();
/// container.register_value("app-name", "demo".to_string()).unwrap();
/// container.register_factory("clock", Lifecycle::Singleton, |_| {
///     Ok(Clock { started: 42 })
/// }).unwrap();
///
/// let clock = container.resolve::<Clock>("clock").unwrap();
/// assert_eq!(clock.started, 42);
///
/// let child = container.create_child();
/// assert!(child.has("app-name", None));
/// assert!(!child.has_own("app-name", None));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// Creates a new root container with no registrations.
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    fn with_parent(parent: Option<Container>) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::new()),
                parent,
                snapshots: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a child container with this one as parent.
    pub fn create_child(&self) -> Container {
        Self::with_parent(Some(self.clone()))
    }

    /// The parent container, if any.
    pub fn parent(&self) -> Option<Container> {
        self.inner.parent.clone()
    }

    // ----- Registration -----

    /// Registers an already-produced value under (`key`, `"default"`).
    ///
    /// Value registrations act as eternal singletons: every resolution
    /// returns the same handle.
    pub fn register_value<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
        value: T,
    ) -> DiResult<()> {
        self.register_with(key, RegistrationOptions::value(value))
    }

    /// Registers an already-produced value under (`key`, `name`).
    pub fn register_named_value<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
        name: &str,
        value: T,
    ) -> DiResult<()> {
        self.register_with(key, RegistrationOptions::value(value).named(name))
    }

    /// Registers a factory under (`key`, `"default"`) with the given
    /// lifecycle.
    pub fn register_factory<T, F>(
        &self,
        key: impl Into<ServiceKey>,
        lifecycle: Lifecycle,
        factory: F,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&'a ResolutionContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register_with(key, RegistrationOptions::factory(lifecycle, factory))
    }

    /// Registers a factory under (`key`, `name`) with the given lifecycle.
    pub fn register_named_factory<T, F>(
        &self,
        key: impl Into<ServiceKey>,
        name: &str,
        lifecycle: Lifecycle,
        factory: F,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&'a ResolutionContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register_with(key, RegistrationOptions::factory(lifecycle, factory).named(name))
    }

    /// Registers a factory wrapped in a [`Deferred`] stand-in under
    /// (`key`, `"default"`).
    ///
    /// Resolving the key yields `Arc<Deferred<T>>` immediately, without
    /// running `factory`; the first [`Deferred::get`] constructs the real
    /// instance. Meaningful with Singleton or Request lifecycle, where every
    /// party to a cycle observes the same stand-in.
    pub fn register_deferred_factory<T, F>(
        &self,
        key: impl Into<ServiceKey>,
        lifecycle: Lifecycle,
        factory: F,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&'a ResolutionContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let key = key.into();
        self.register_named_deferred_factory(key, DEFAULT_NAME, lifecycle, factory)
    }

    /// Named form of
    /// [`register_deferred_factory`](Container::register_deferred_factory).
    pub fn register_named_deferred_factory<T, F>(
        &self,
        key: impl Into<ServiceKey>,
        name: &str,
        lifecycle: Lifecycle,
        factory: F,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: for<'a> Fn(&'a ResolutionContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let inner: Arc<dyn for<'a> Fn(&'a ResolutionContext) -> DiResult<T> + Send + Sync> =
            Arc::new(factory);
        let options = RegistrationOptions::factory_raw(
            lifecycle,
            Arc::new(move |ctx: &ResolutionContext| {
                Ok(Arc::new(Deferred::new(ctx.clone(), inner.clone())) as AnyArc)
            }),
        )
        .named(name);
        self.register_with(key, options)
    }

    /// Registers a declaratively constructed service: `dependencies` are
    /// resolved in order inside the live context and handed positionally to
    /// `build`.
    pub fn register_constructed<T, F>(
        &self,
        key: impl Into<ServiceKey>,
        lifecycle: Lifecycle,
        dependencies: Vec<Dependency>,
        build: F,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&[AnyArc]) -> DiResult<T> + Send + Sync + 'static,
    {
        let key = key.into();
        self.register_named_constructed(key, DEFAULT_NAME, lifecycle, dependencies, build)
    }

    /// Named form of
    /// [`register_constructed`](Container::register_constructed).
    pub fn register_named_constructed<T, F>(
        &self,
        key: impl Into<ServiceKey>,
        name: &str,
        lifecycle: Lifecycle,
        dependencies: Vec<Dependency>,
        build: F,
    ) -> DiResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&[AnyArc]) -> DiResult<T> + Send + Sync + 'static,
    {
        self.register_named_factory(key, name, lifecycle, move |ctx| {
            let parts = ctx.resolve_tuple(&dependencies)?;
            build(&parts)
        })
    }

    /// Registers with full control over name, lifecycle, and replacement.
    ///
    /// Fails with `DuplicateRegistration` when (`key`, `name`) is occupied
    /// and `replace` was not requested; replacement atomically swaps the
    /// whole record, never merging old and new lifecycle or value.
    pub fn register_with(
        &self,
        key: impl Into<ServiceKey>,
        options: RegistrationOptions,
    ) -> DiResult<()> {
        let key = key.into();
        let service = format!("{}#{}", key, options.name);
        let replace = options.replace;
        let registration = options.into_registration(&service)?;
        self.inner.registry.write().insert(key, registration, replace)
    }

    /// Drops registrations under `key`: all names, or only `name` when
    /// given. Total: absent keys and names are a no-op. With `cascade`, the
    /// same removal runs on every ancestor up to the root.
    pub fn unregister(&self, key: impl Into<ServiceKey>, name: Option<&str>, cascade: bool) {
        let key = key.into();
        self.inner.registry.write().remove(&key, name);
        if cascade {
            if let Some(parent) = &self.inner.parent {
                parent.unregister(key, name, true);
            }
        }
    }

    // ----- Queries -----

    /// True if (`key`[, `name`]) is registered here or on any ancestor.
    pub fn has(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
        let key = key.into();
        if self.inner.registry.read().contains(&key, name) {
            return true;
        }
        self.inner
            .parent
            .as_ref()
            .map_or(false, |parent| parent.has(key, name))
    }

    /// True if (`key`[, `name`]) is registered on this container itself.
    pub fn has_own(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
        self.inner.registry.read().contains(&key.into(), name)
    }

    /// Registration names under `key` in the merged view, in merge order:
    /// ancestor names first (ancestor positions preserved), descendant-only
    /// names appended.
    pub fn service_names(&self, key: impl Into<ServiceKey>) -> Vec<String> {
        let key = key.into();
        self.merged_view()
            .names(&key)
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    // ----- Snapshots -----

    /// Pushes the current own registry onto the snapshot stack and swaps in
    /// a deep copy as the live registry, so later mutations (including
    /// singleton cache writes) never reach the snapshot. With `cascade`,
    /// every ancestor backs up too.
    ///
    /// Snapshots are LIFO; pair each `backup` with a `restore` and keep the
    /// `cascade` flags symmetric — the engine does not validate pairing.
    pub fn backup(&self, cascade: bool) {
        {
            let mut registry = self.inner.registry.write();
            let copy = registry.deep_copy();
            let original = std::mem::replace(&mut *registry, copy);
            self.inner.snapshots.lock().push(original);
        }
        if cascade {
            if let Some(parent) = &self.inner.parent {
                parent.backup(true);
            }
        }
    }

    /// Pops the most recent snapshot back in as the live registry,
    /// discarding the current one. A no-op when no snapshot exists. With
    /// `cascade`, every ancestor restores too.
    pub fn restore(&self, cascade: bool) {
        {
            let popped = self.inner.snapshots.lock().pop();
            if let Some(snapshot) = popped {
                *self.inner.registry.write() = snapshot;
            }
        }
        if cascade {
            if let Some(parent) = &self.inner.parent {
                parent.restore(true);
            }
        }
    }

    // ----- Resolution -----

    /// Resolves the `"default"` registration under `key` as `T`.
    ///
    /// This is a root resolution call: it computes the merged view and
    /// builds a fresh [`ResolutionContext`], so Request-lifecycle instances
    /// are never shared with any other root call.
    pub fn resolve<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
    ) -> DiResult<Arc<T>> {
        self.begin().resolve(key)
    }

    /// Resolves the (`key`, `name`) registration as `T`.
    pub fn resolve_named<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
        name: &str,
    ) -> DiResult<Arc<T>> {
        self.begin().resolve_named(key, name)
    }

    /// Resolves the (`key`, `name`) registration type-erased.
    pub fn resolve_dyn(&self, key: impl Into<ServiceKey>, name: &str) -> DiResult<AnyArc> {
        self.begin().resolve_dyn(key, name)
    }

    /// Resolves every registered name under `key` in order, as `T`. An
    /// unregistered key yields an empty list.
    pub fn resolve_all<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
    ) -> DiResult<Vec<Arc<T>>> {
        self.begin().resolve_all(key)
    }

    /// Type-erased form of [`resolve_all`](Container::resolve_all).
    pub fn resolve_all_dyn(&self, key: impl Into<ServiceKey>) -> DiResult<Vec<AnyArc>> {
        self.begin().resolve_all_dyn(key)
    }

    /// Resolves every descriptor within a single context, so
    /// Request-lifecycle sharing applies across the elements; result order
    /// matches input order.
    pub fn resolve_tuple(&self, dependencies: &[Dependency]) -> DiResult<Vec<AnyArc>> {
        self.begin().resolve_tuple(dependencies)
    }

    /// Runs a module's batch of registrations against this container.
    pub fn install<M: Module>(&self, module: M) -> DiResult<()> {
        module.register(self)
    }

    /// Computes the effective registry: the parent's merged view with this
    /// container's own entries replacing same-named ancestors in place and
    /// new names appended. Recomputed per root call; never cached, since
    /// registries may mutate between calls.
    fn merged_view(&self) -> Registry {
        let own = self.inner.registry.read();
        match &self.inner.parent {
            Some(parent) => own.overlay_onto(parent.merged_view()),
            None => own.clone(),
        }
    }

    fn begin(&self) -> ResolutionContext {
        ResolutionContext::new(self.merged_view())
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Registrations ===\n");
        let view = self.merged_view();
        for (key, list) in view.iter() {
            for registration in list {
                s.push_str(&format!(
                    "  {}#{}: {:?}\n",
                    key, registration.name, registration.lifecycle
                ));
            }
        }
        s
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
