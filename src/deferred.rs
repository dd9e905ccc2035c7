//! Lazy stand-in used to break true construction cycles.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::context::ResolutionContext;
use crate::error::{DiError, DiResult};

type InitFn<T> = Box<dyn FnOnce() -> DiResult<Arc<T>> + Send>;

/// Stand-in that defers real construction until first use.
///
/// Registered through
/// [`register_deferred_factory`](crate::Container::register_deferred_factory),
/// a `Deferred<T>` is handed out immediately during the synchronous
/// dependency walk without running its inner factory. The first
/// [`get`](Deferred::get) runs the factory (through the resolution context
/// the stand-in closed over) and caches the result; every later call returns
/// the same `Arc<T>`.
///
/// Two factories can therefore hold each other's stand-ins and force them
/// only after both constructors have returned. Forcing a stand-in from
/// within its own construction is unsupported; the consumed surface of a
/// circular class must be known ahead of time.
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, Deferred, Lifecycle};
/// use std::sync::Arc;
///
/// struct Engine { starter: Arc<Deferred<Starter>> }
/// struct Starter { engine: Arc<Deferred<Engine>> }
///
/// let container = Container::new();
/// container.register_deferred_factory("engine", Lifecycle::Singleton, |ctx| {
///     Ok(Engine { starter: ctx.resolve::<Deferred<Starter>>("starter")? })
/// }).unwrap();
/// container.register_deferred_factory("starter", Lifecycle::Singleton, |ctx| {
///     Ok(Starter { engine: ctx.resolve::<Deferred<Engine>>("engine")? })
/// }).unwrap();
///
/// let engine_cell = container.resolve::<Deferred<Engine>>("engine").unwrap();
/// let engine = engine_cell.get().unwrap(); // real construction happens here
/// let starter = engine.starter.get().unwrap();
/// assert!(Arc::ptr_eq(&starter.engine.get().unwrap(), &engine));
/// ```
pub struct Deferred<T: Send + Sync + 'static> {
    cell: OnceCell<Arc<T>>,
    init: Mutex<Option<InitFn<T>>>,
}

impl<T: Send + Sync + 'static> Deferred<T> {
    pub(crate) fn new(
        context: ResolutionContext,
        factory: Arc<dyn for<'a> Fn(&'a ResolutionContext) -> DiResult<T> + Send + Sync>,
    ) -> Self {
        let init: InitFn<T> = Box::new(move || factory(&context).map(Arc::new));
        Self {
            cell: OnceCell::new(),
            init: Mutex::new(Some(init)),
        }
    }

    /// Returns the real instance, constructing it on first call.
    ///
    /// A failed construction consumes the factory; later calls keep
    /// returning an error.
    pub fn get(&self) -> DiResult<Arc<T>> {
        if let Some(value) = self.cell.get() {
            return Ok(value.clone());
        }
        let init = self.init.lock().take();
        match init {
            Some(init) => {
                let value = init()?;
                Ok(self.cell.get_or_init(|| value).clone())
            }
            None => self.cell.get().cloned().ok_or_else(|| {
                DiError::factory(format!(
                    "deferred {} is mid-construction or failed previously",
                    std::any::type_name::<T>()
                ))
            }),
        }
    }

    /// True once the real instance has been constructed.
    pub fn is_forced(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The real instance if already constructed, without forcing.
    pub fn try_get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }
}
