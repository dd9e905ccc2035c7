//! Per-root-call resolution context.
//!
//! A [`ResolutionContext`] is created for every root `resolve` /
//! `resolve_all` / `resolve_tuple` call on a [`Container`](crate::Container)
//! and discarded when that call returns. It operates against a merged,
//! read-only view of the container hierarchy fixed at construction, and
//! carries the per-request instance cache, the live resolution-path stack,
//! and the queue of delayed callbacks.
//!
//! The handle is cheap to clone and shared with any
//! [`Deferred`](crate::Deferred) stand-ins created during the call, which is
//! how a stand-in forced after the root call still resolves against the same
//! request state.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::descriptors::Dependency;
use crate::error::{DiError, DiResult};
use crate::internal::{find_cycle, MAX_DEPTH};
use crate::key::ServiceKey;
use crate::lifecycle::Lifecycle;
use crate::registration::{downcast_arc, AnyArc, Provider, Registry};
use crate::DEFAULT_NAME;

/// One entry of the resolution-path stack.
#[derive(Clone)]
pub(crate) struct Frame {
    pub(crate) key: ServiceKey,
    pub(crate) name: Arc<str>,
    /// Stringified `key#name`, the comparison alphabet for cycle detection
    /// and the rendering used in error paths.
    pub(crate) tag: String,
}

impl Frame {
    pub(crate) fn new(key: ServiceKey, name: Arc<str>) -> Self {
        let tag = format!("{}#{}", key, name);
        Self { key, name, tag }
    }
}

type DelayedFn = Box<dyn FnOnce(&ResolutionContext) -> DiResult<()> + Send>;

struct ContextShared {
    view: Registry,
    cache: Mutex<HashMap<(ServiceKey, Arc<str>), AnyArc>>,
    stack: Mutex<Vec<Frame>>,
    delayed: Mutex<VecDeque<DelayedFn>>,
}

/// Live resolution state handed to factory functions.
///
/// Factories receive `&ResolutionContext` and read their dependencies
/// through it; they may also queue [`delay`](ResolutionContext::delay)
/// callbacks for post-construction injection. Request-lifecycle sharing only
/// holds within one context; separate root calls never share request state.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, Lifecycle};
///
/// struct Repo { url: String }
///
/// let container = Container::new();
/// container.register_value("db-url", "postgres://localhost".to_string()).unwrap();
/// container.register_factory("repo", Lifecycle::Singleton, |ctx| {
///     Ok(Repo { url: ctx.resolve::<String>("db-url")?.as_str().to_string() })
/// }).unwrap();
///
/// let repo = container.resolve::<Repo>("repo").unwrap();
/// assert_eq!(repo.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ResolutionContext {
    shared: Arc<ContextShared>,
}

impl ResolutionContext {
    pub(crate) fn new(view: Registry) -> Self {
        Self {
            shared: Arc::new(ContextShared {
                view,
                cache: Mutex::new(HashMap::new()),
                stack: Mutex::new(Vec::new()),
                delayed: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Resolves the `"default"` registration under `key` as `T`.
    pub fn resolve<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
    ) -> DiResult<Arc<T>> {
        self.resolve_named(key, DEFAULT_NAME)
    }

    /// Resolves the registration under (`key`, `name`) as `T`.
    pub fn resolve_named<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
        name: &str,
    ) -> DiResult<Arc<T>> {
        let key = key.into();
        let service = format!("{}#{}", key, name);
        downcast_arc::<T>(self.resolve_dyn(key, name)?, &service)
    }

    /// Resolves the registration under (`key`, `name`) type-erased.
    pub fn resolve_dyn(&self, key: impl Into<ServiceKey>, name: &str) -> DiResult<AnyArc> {
        let frame = Frame::new(key.into(), Arc::from(name));
        let _guard = StackGuard::push(&self.shared, frame.clone());
        self.resolve_frame(&frame)
    }

    /// Resolves every currently-registered name under `key`, in registration
    /// order, as `T`. An unregistered key yields an empty list, never an
    /// error.
    pub fn resolve_all<T: Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
    ) -> DiResult<Vec<Arc<T>>> {
        let key = key.into();
        self.resolve_all_dyn(key.clone())?
            .into_iter()
            .map(|value| downcast_arc::<T>(value, key.display_name()))
            .collect()
    }

    /// Type-erased form of [`resolve_all`](Self::resolve_all).
    pub fn resolve_all_dyn(&self, key: impl Into<ServiceKey>) -> DiResult<Vec<AnyArc>> {
        let key = key.into();
        self.shared
            .view
            .names(&key)
            .into_iter()
            .map(|name| self.resolve_dyn(key.clone(), &name))
            .collect()
    }

    /// Resolves every descriptor with plain `resolve` inside this context;
    /// result order matches input order. `Constant` descriptors pass their
    /// value through untouched.
    pub fn resolve_tuple(&self, dependencies: &[Dependency]) -> DiResult<Vec<AnyArc>> {
        dependencies
            .iter()
            .map(|dependency| self.resolve_dependency(dependency))
            .collect()
    }

    pub(crate) fn resolve_dependency(&self, dependency: &Dependency) -> DiResult<AnyArc> {
        match dependency {
            Dependency::Service(key) => self.resolve_dyn(key.clone(), DEFAULT_NAME),
            Dependency::Named(key, name) => self.resolve_dyn(key.clone(), name),
            Dependency::Constant(value) => Ok(value.clone()),
        }
    }

    /// True if at least one registration exists under `key` (and `name`, if
    /// given) in the merged view.
    pub fn has(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
        self.shared.view.contains(&key.into(), name)
    }

    /// Registration names under `key` in the merged view, in order.
    pub fn service_names(&self, key: impl Into<ServiceKey>) -> Vec<String> {
        self.shared
            .view
            .names(&key.into())
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Defensive snapshot of the resolution path, root first, rendered as
    /// `key#name` tags.
    pub fn stack(&self) -> Vec<String> {
        self.shared
            .stack
            .lock()
            .iter()
            .map(|frame| frame.tag.clone())
            .collect()
    }

    /// True if (`key`[, `name`]) appears anywhere on the resolution path.
    pub fn is_resolving(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
        let key = key.into();
        self.shared
            .stack
            .lock()
            .iter()
            .any(|frame| frame.key == key && name.map_or(true, |n| &*frame.name == n))
    }

    /// True only if (`key`[, `name`]) is the immediate parent of the entry
    /// currently under construction, i.e. the second-to-last stack entry.
    /// False whenever the stack holds fewer than two entries.
    pub fn is_directly_resolving(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
        let key = key.into();
        let stack = self.shared.stack.lock();
        if stack.len() < 2 {
            return false;
        }
        let frame = &stack[stack.len() - 2];
        frame.key == key && name.map_or(true, |n| &*frame.name == n)
    }

    /// Queues `callback` to run once the current `resolve` call's factory
    /// has returned, before that call returns to its own caller. This is the
    /// hook for setter-based circular injection: construct dependency-free,
    /// then resolve and assign the circular edge post-hoc.
    ///
    /// Callbacks run in FIFO order and only make sense for Singleton or
    /// Request lifecycles, where re-resolving yields the just-constructed
    /// instance.
    pub fn delay<F>(&self, callback: F)
    where
        F: FnOnce(&ResolutionContext) -> DiResult<()> + Send + 'static,
    {
        self.shared.delayed.lock().push_back(Box::new(callback));
    }

    fn resolve_frame(&self, frame: &Frame) -> DiResult<AnyArc> {
        let cache_key = (frame.key.clone(), frame.name.clone());
        let cached = self.shared.cache.lock().get(&cache_key).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }

        let registration = self
            .shared
            .view
            .get(&frame.key, &frame.name)
            .ok_or_else(|| DiError::NotFound {
                service: frame.tag.clone(),
            })?;

        let factory = match &registration.provider {
            Provider::Value(value) => return Ok(value.clone()),
            Provider::Factory(factory) => {
                let materialized = registration.cached.lock().clone();
                if let Some(value) = materialized {
                    return Ok(value);
                }
                factory.clone()
            }
        };

        self.check_guards()?;

        let value = factory(self).map_err(|e| self.wrap(e, frame))?;

        if matches!(
            registration.lifecycle,
            Lifecycle::Singleton | Lifecycle::Request
        ) {
            self.shared.cache.lock().insert(cache_key, value.clone());
        }
        if registration.lifecycle == Lifecycle::Singleton {
            *registration.cached.lock() = Some(value.clone());
        }

        self.drain_delayed().map_err(|e| self.wrap(e, frame))?;
        Ok(value)
    }

    /// Depth guard plus the cycle check, run just before a factory is
    /// invoked.
    fn check_guards(&self) -> DiResult<()> {
        let stack = self.shared.stack.lock();
        if stack.len() > MAX_DEPTH {
            return Err(DiError::DepthExceeded { depth: stack.len() });
        }
        if let Some(path) = find_cycle(&stack) {
            return Err(DiError::CircularDependency { path });
        }
        Ok(())
    }

    /// Wraps a failure escaping this frame's factory. Already-wrapped errors
    /// pass through unchanged so nested frames never double-wrap.
    fn wrap(&self, error: DiError, frame: &Frame) -> DiError {
        match error {
            wrapped @ DiError::Resolution { .. } => wrapped,
            source => DiError::Resolution {
                service: frame.tag.clone(),
                stack: self.stack(),
                source: Arc::new(source),
            },
        }
    }

    fn drain_delayed(&self) -> DiResult<()> {
        loop {
            let next = self.shared.delayed.lock().pop_front();
            match next {
                Some(callback) => callback(self)?,
                None => return Ok(()),
            }
        }
    }
}

/// Keeps the push/pop pair balanced on every exit path.
struct StackGuard {
    shared: Arc<ContextShared>,
}

impl StackGuard {
    fn push(shared: &Arc<ContextShared>, frame: Frame) -> Self {
        shared.stack.lock().push(frame);
        Self {
            shared: shared.clone(),
        }
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        self.shared.stack.lock().pop();
    }
}
