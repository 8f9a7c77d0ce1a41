//! Service Container
//!
//! Explicit, reflection-free registry mapping string keys to factories.
//! Each key resolves to a lazily constructed singleton that lives as long
//! as the container. Factories receive the container so they can resolve
//! their own dependencies.
//!
//! Services are handed out by clone, so register shared handles
//! (`Arc<...>`, pools, clients) rather than plain values.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use crate::domain::errors::DomainError;

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&Container) -> Result<Instance, DomainError> + Send + Sync>;

/// A factory plus a per-key counter bumped on every registration
#[derive(Clone)]
struct Registration {
    generation: u64,
    factory: Factory,
}

/// Lazily-populated singleton registry
#[derive(Default)]
pub struct Container {
    factories: RwLock<HashMap<String, Registration>>,
    instances: RwLock<HashMap<String, Instance>>,
    constructing: Mutex<HashSet<(String, ThreadId)>>,
}

/// Clears a construction-in-progress marker when the factory returns
struct ConstructionGuard<'a> {
    container: &'a Container,
    marker: (String, ThreadId),
}

impl Drop for ConstructionGuard<'_> {
    fn drop(&mut self) {
        self.container
            .constructing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.marker);
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `key`.
    ///
    /// Re-registering a key replaces its factory and drops any instance
    /// already built from the previous one.
    pub fn register<T, F>(&self, key: &str, factory: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Container) -> Result<T, DomainError> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |container: &Container| {
            let instance: Instance = Arc::new(factory(container)?);
            Ok(instance)
        });

        let replaced = {
            let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
            let previous = factories.get(key).map(|r| r.generation);
            factories.insert(
                key.to_string(),
                Registration {
                    generation: previous.map_or(0, |g| g + 1),
                    factory,
                },
            );
            previous.is_some()
        };

        self.instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        if replaced {
            tracing::debug!(key, "Replaced service registration");
        } else {
            tracing::debug!(key, "Registered service");
        }
    }

    /// Register an already-built value as the singleton for `key`
    pub fn register_instance<T>(&self, key: &str, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.register(key, move |_| Ok(value.clone()));
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Resolve the singleton for `key`, building it on first use.
    ///
    /// A factory that re-enters its own key on the same thread fails with
    /// [`DomainError::CircularDependency`]. If two threads build the same
    /// key at once, the first instance stored wins and both callers get it.
    /// An instance built by a factory that was replaced mid-construction is
    /// discarded and the key is built again from the current factory.
    pub fn resolve<T>(&self, key: &str) -> Result<T, DomainError>
    where
        T: Clone + Send + Sync + 'static,
    {
        loop {
            if let Some(instance) = self.cached(key) {
                tracing::trace!(key, "Resolved cached service");
                return downcast(key, &instance);
            }

            let registration = self
                .registration(key)
                .ok_or_else(|| DomainError::unregistered(key))?;

            let built = {
                let _guard = self.begin_construction(key)?;
                tracing::debug!(key, "Constructing service");
                (registration.factory)(self)?
            };

            let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);

            // `register` swaps the factory before clearing the cache
            let current = self.registration(key).map(|r| r.generation);
            if current != Some(registration.generation) {
                drop(instances);
                tracing::debug!(key, "Service re-registered during construction, rebuilding");
                continue;
            }

            let instance = instances.entry(key.to_string()).or_insert(built).clone();

            return downcast(key, &instance);
        }
    }

    fn registration(&self, key: &str) -> Option<Registration> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn cached(&self, key: &str) -> Option<Instance> {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn begin_construction(&self, key: &str) -> Result<ConstructionGuard<'_>, DomainError> {
        let marker = (key.to_string(), thread::current().id());
        let mut constructing = self
            .constructing
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !constructing.insert(marker.clone()) {
            tracing::error!(key, "Circular dependency detected");
            return Err(DomainError::CircularDependency {
                key: key.to_string(),
            });
        }

        Ok(ConstructionGuard {
            container: self,
            marker,
        })
    }
}

fn downcast<T: Clone + 'static>(key: &str, instance: &Instance) -> Result<T, DomainError> {
    instance
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| DomainError::ServiceTypeMismatch {
            key: key.to_string(),
        })
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<&String> = factories.keys().collect();
        keys.sort();
        f.debug_struct("Container").field("services", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Greeter {
        greeting: String,
    }

    #[test]
    fn test_resolve_returns_cached_singleton() {
        let container = Container::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        container.register("greeter", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Greeter {
                greeting: "hello".to_string(),
            }))
        });

        let first: Arc<Greeter> = container.resolve("greeter").unwrap();
        let second: Arc<Greeter> = container.resolve("greeter").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.greeting, "hello");
    }

    #[test]
    fn test_unregistered_key_fails_with_key() {
        let container = Container::new();
        let err = container.resolve::<Arc<Greeter>>("missing").unwrap_err();
        match err {
            DomainError::UnregisteredService { key } => assert_eq!(key, "missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_factory_resolves_dependencies() {
        let container = Container::new();
        container.register_instance("greeting", "hi".to_string());
        container.register("greeter", |c| {
            let greeting: String = c.resolve("greeting")?;
            Ok(Arc::new(Greeter { greeting }))
        });

        let greeter: Arc<Greeter> = container.resolve("greeter").unwrap();
        assert_eq!(greeter.greeting, "hi");
    }

    #[test]
    fn test_reregistration_replaces_factory_and_instance() {
        let container = Container::new();
        container.register_instance("greeting", "first".to_string());
        assert_eq!(container.resolve::<String>("greeting").unwrap(), "first");

        container.register_instance("greeting", "second".to_string());
        assert_eq!(container.resolve::<String>("greeting").unwrap(), "second");
    }

    #[test]
    fn test_type_mismatch() {
        let container = Container::new();
        container.register_instance("count", 3_u32);
        assert!(matches!(
            container.resolve::<String>("count"),
            Err(DomainError::ServiceTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_circular_dependency_detected() {
        let container = Container::new();
        container.register("a", |c| c.resolve::<Arc<Greeter>>("b"));
        container.register("b", |c| c.resolve::<Arc<Greeter>>("a"));

        let err = container.resolve::<Arc<Greeter>>("a").unwrap_err();
        assert!(matches!(err, DomainError::CircularDependency { ref key } if key == "a"));

        // The failed attempt must not leave stale markers behind
        container.register_instance("b", Arc::new(Greeter { greeting: "ok".into() }));
        assert!(container.resolve::<Arc<Greeter>>("a").is_ok());
    }

    #[test]
    fn test_factory_error_is_not_cached() {
        let container = Container::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        container.register("flaky", move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(DomainError::Configuration("not yet".to_string()))
            } else {
                Ok(7_u32)
            }
        });

        assert!(container.resolve::<u32>("flaky").is_err());
        assert_eq!(container.resolve::<u32>("flaky").unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_resolves_share_one_instance() {
        let container = Arc::new(Container::new());
        container.register("greeter", |_| {
            Ok(Arc::new(Greeter {
                greeting: "hello".to_string(),
            }))
        });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let container = container.clone();
                thread::spawn(move || container.resolve::<Arc<Greeter>>("greeter").unwrap())
            })
            .collect();

        let resolved: Vec<Arc<Greeter>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(resolved.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_reregistration_during_construction_is_not_cached() {
        let container = Container::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();

        container.register("svc", move |c: &Container| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::scope(|s| {
                s.spawn(|| c.register_instance("svc", "new".to_string()));
            });
            Ok("old".to_string())
        });

        assert_eq!(container.resolve::<String>("svc").unwrap(), "new");
        assert_eq!(container.resolve::<String>("svc").unwrap(), "new");
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_is_registered() {
        let container = Container::new();
        assert!(!container.is_registered("x"));
        container.register_instance("x", 1_u8);
        assert!(container.is_registered("x"));
    }
}
