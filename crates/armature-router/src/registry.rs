//! Named service registry built at startup.
//!
//! Every shared instance a handler needs is registered explicitly under a
//! name before the router starts serving. Lookups are by name and type;
//! nothing is discovered implicitly.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, RouterError};

/// An explicit name to instance map.
///
/// Values are stored behind `Arc`, so registered services are shared,
/// not cloned, and must be `Send + Sync`.
///
/// # Example
///
/// ```
/// use armature_router::Registry;
///
/// struct Greeter(&'static str);
///
/// let registry = Registry::new().register("greeter", Greeter("hello"));
/// let greeter = registry.require::<Greeter>("greeter").unwrap();
/// assert_eq!(greeter.0, "hello");
/// ```
#[derive(Default)]
pub struct Registry {
    services: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service under a name.
    ///
    /// Registering the same name twice replaces the earlier instance.
    #[must_use]
    pub fn register<T: Send + Sync + 'static>(mut self, name: &str, service: T) -> Self {
        self.services.insert(String::from(name), Arc::new(service));
        self
    }

    /// Looks up a service by name and type.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.services
            .get(name)
            .and_then(|s| Arc::clone(s).downcast::<T>().ok())
    }

    /// Looks up a service, distinguishing a missing name from a type
    /// mismatch.
    pub fn require<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let service = self
            .services
            .get(name)
            .ok_or_else(|| RouterError::ServiceMissing(String::from(name)))?;
        Arc::clone(service)
            .downcast::<T>()
            .map_err(|_| RouterError::ServiceTypeMismatch(String::from(name)))
    }
}
