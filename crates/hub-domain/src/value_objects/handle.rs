//! Type-erased references offered to dependents

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A cheaply clonable, type-erased `Arc<T>`
///
/// `T` may be unsized, so a provider can offer `Arc<dyn Trait>` and a
/// dependent retrieves it with the same type:
///
/// ```
/// use hub_domain::value_objects::Handle;
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn ticks(&self) -> u64;
/// }
/// struct Fixed;
/// impl Clock for Fixed {
///     fn ticks(&self) -> u64 { 7 }
/// }
///
/// let clock: Arc<dyn Clock> = Arc::new(Fixed);
/// let handle = Handle::new(Arc::clone(&clock));
///
/// let back = handle.get::<dyn Clock>().expect("same type");
/// assert!(Arc::ptr_eq(&back, &clock));
/// assert!(handle.get::<Fixed>().is_none());
/// ```
#[derive(Clone)]
pub struct Handle {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Handle {
    /// Erase an `Arc<T>`
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Recover the `Arc<T>` if this handle was created from one
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Whether this handle holds an `Arc<T>`
    pub fn is<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
        self.value.is::<Arc<T>>()
    }

    /// Name of the erased type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type", &self.type_name)
            .finish()
    }
}
