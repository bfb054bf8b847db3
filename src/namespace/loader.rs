//! Archive loading and namespace construction.
//!
//! Physically obtaining an archive is delegated to a [`ModuleLoader`]. The crate ships the
//! in-memory [`MemoryLoader`]; hosts with an on-disk package format implement the trait
//! themselves. [`NamespaceLoader`] drives a module loader to build an isolated [`Namespace`].

use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    config::OverloadPolicy,
    namespace::{Archive, Namespace},
    Error, Result,
};

/// Capability that turns an archive location into an [`Archive`].
///
/// # Errors
///
/// Implementations report [`Error::ModuleNotFound`] for unknown locations and
/// [`Error::ArchiveUnreadable`] for locations whose archive cannot be produced.
pub trait ModuleLoader: Send + Sync {
    /// Loads the archive at `location`.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn load(&self, location: &str) -> Result<Archive>;
}

type ArchiveSource = Arc<dyn Fn() -> Result<Archive> + Send + Sync>;

/// A [`ModuleLoader`] serving archives registered in memory.
///
/// Each location maps to a source that produces the archive on demand. Any error a source
/// returns is reported as [`Error::ArchiveUnreadable`] for its location.
///
/// ```rust,ignore
/// let loader = MemoryLoader::new();
/// loader.insert("plugins/counter.jar", Archive::new("counter").with_class(counter));
/// ```
#[derive(Default)]
pub struct MemoryLoader {
    sources: DashMap<String, ArchiveSource>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `archive` at `location`, replacing any earlier source.
    pub fn insert(&self, location: impl Into<String>, archive: Archive) {
        self.insert_with(location, move || Ok(archive.clone()));
    }

    /// Serves the archive produced by `source` at `location`, replacing any earlier source.
    pub fn insert_with<F>(&self, location: impl Into<String>, source: F)
    where
        F: Fn() -> Result<Archive> + Send + Sync + 'static,
    {
        self.sources.insert(location.into(), Arc::new(source));
    }

    /// True if the location is known
    #[must_use]
    pub fn contains(&self, location: &str) -> bool {
        self.sources.contains_key(location)
    }

    /// Number of known locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if no location is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, location: &str) -> Result<Archive> {
        let source = self
            .sources
            .get(location)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::ModuleNotFound(location.to_string()))?;

        source().map_err(|err| match err {
            unreadable @ Error::ArchiveUnreadable { .. } => unreadable,
            other => Error::ArchiveUnreadable {
                location: location.to_string(),
                message: other.to_string(),
            },
        })
    }
}

/// Builder for an isolated [`Namespace`].
///
/// # Usage Examples
///
/// ```rust,ignore
/// let namespace = NamespaceLoader::new(loader)
///     .archive("plugins/counter.jar")
///     .archive("plugins/shared.jar")
///     .load()?;
/// let counter = namespace.instantiate("plugin.Counter", vec![5.into()])?;
/// ```
///
/// # Search Order
///
/// Archives are fetched in parallel but registered in the order their locations were added.
/// When two archives define the same class name, the first location wins.
pub struct NamespaceLoader {
    /// Capability used to obtain archives
    loader: Arc<dyn ModuleLoader>,
    /// Archive locations in search order
    locations: Vec<String>,
    /// Overload policy of the resulting namespace
    policy: OverloadPolicy,
}

impl NamespaceLoader {
    /// Creates a builder with no locations and the default overload policy.
    #[must_use]
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        NamespaceLoader {
            loader,
            locations: Vec::new(),
            policy: OverloadPolicy::default(),
        }
    }

    /// Appends an archive location.
    #[must_use]
    pub fn archive(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    /// Appends several archive locations.
    #[must_use]
    pub fn archives<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations.extend(locations.into_iter().map(Into::into));
        self
    }

    /// Sets how overloads are selected when several candidates match.
    #[must_use]
    pub fn policy(mut self, policy: OverloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Loads every archive and builds the namespace.
    ///
    /// # Errors
    ///
    /// Returns a loader failure if any location fails, typically [`Error::ModuleNotFound`] or
    /// [`Error::ArchiveUnreadable`], or [`Error::TokensExhausted`] once the process has run out
    /// of type identities. No namespace is created in that case.
    pub fn load(self) -> Result<Arc<Namespace>> {
        let loader = &self.loader;
        let archives = self
            .locations
            .par_iter()
            .map(|location| loader.load(location))
            .collect::<Result<Vec<Archive>>>()?;

        let namespace = Namespace::new(self.locations, self.policy);
        for archive in &archives {
            for def in archive.classes() {
                if namespace.registry().register(def)?.is_none() {
                    debug!(
                        namespace = %namespace.id(),
                        archive = archive.name(),
                        class = %def.name,
                        "class shadowed by an earlier archive"
                    );
                }
            }
        }

        debug!(
            namespace = %namespace.id(),
            archives = archives.len(),
            classes = namespace.registry().loaded().count(),
            "namespace loaded"
        );

        Ok(Arc::new(namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesystem::ClassBuilder;

    fn loader() -> Arc<MemoryLoader> {
        let loader = MemoryLoader::new();
        loader.insert(
            "a.jar",
            Archive::new("a").with_class(ClassBuilder::new("plugin.Shared").default_constructor().build()),
        );
        loader.insert(
            "b.jar",
            Archive::new("b")
                .with_class(ClassBuilder::new("plugin.Shared").build())
                .with_class(ClassBuilder::new("plugin.Other").build()),
        );
        loader.insert_with("broken.jar", || Err(Error::Thrown("corrupt header".to_string())));
        Arc::new(loader)
    }

    #[test]
    fn test_memory_loader_unknown_location() {
        let result = loader().load("missing.jar");
        assert!(matches!(result, Err(Error::ModuleNotFound(ref l)) if l == "missing.jar"));
    }

    #[test]
    fn test_memory_loader_unreadable_archive() {
        let result = loader().load("broken.jar");
        assert!(matches!(
            result,
            Err(Error::ArchiveUnreadable { ref location, ref message })
                if location == "broken.jar" && message == "corrupt header"
        ));
    }

    #[test]
    fn test_first_location_wins() {
        let namespace = NamespaceLoader::new(loader())
            .archives(["a.jar", "b.jar"])
            .load()
            .unwrap();

        let shared = namespace.resolve("plugin.Shared").unwrap();
        assert_eq!(shared.constructors().count(), 1);
        assert!(namespace.resolve("plugin.Other").is_ok());
        assert_eq!(namespace.locations(), &["a.jar".to_string(), "b.jar".to_string()]);
    }

    #[test]
    fn test_load_fails_on_missing_archive() {
        let result = NamespaceLoader::new(loader())
            .archive("a.jar")
            .archive("missing.jar")
            .load();
        assert!(matches!(result, Err(Error::ModuleNotFound(_))));
    }
}
