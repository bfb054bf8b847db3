//! Bridging sessions.
//!
//! A [`Bridge`] is one session: one isolated namespace, one wrap registry and one configuration.
//! It is the entry point for callers that make several bridged objects talk to each other, since
//! proxies can only be passed back into the session that created them. The free function
//! [`bridge`] covers the one-shot case.
//!
//! # Examples
//!
//! ```rust,ignore
//! use isobridge::prelude::*;
//!
//! let session = Bridge::builder(loader)
//!     .archive("plugins/counter.jar")
//!     .config(BridgeConfig::lenient())
//!     .open()?;
//!
//! let counter = session.bridge(&counter_interface, "plugin.Counter", vec![5.into()])?;
//! counter.call("increment", vec![1.into()])?;
//!
//! session.release();
//! ```

use std::{fmt, sync::Arc};

use tracing::{debug, trace};

use crate::{
    adapter::{marshal_args, wrap, InterfaceRef, Proxy, WrapRegistry},
    config::BridgeConfig,
    factory,
    namespace::{ModuleLoader, Namespace, NamespaceLoader},
    value::{ObjectRef, Value},
    Error, Result,
};

/// State shared by a bridge and every proxy it produced.
pub(crate) struct Session {
    namespace: Arc<Namespace>,
    registry: WrapRegistry,
    config: BridgeConfig,
}

impl Session {
    pub(crate) fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    pub(crate) fn registry(&self) -> &WrapRegistry {
        &self.registry
    }

    pub(crate) fn config(&self) -> BridgeConfig {
        self.config
    }
}

/// A bridging session over one isolated namespace.
#[derive(Clone)]
pub struct Bridge {
    session: Arc<Session>,
}

impl Bridge {
    /// Starts building a session whose archives come from `loader`.
    #[must_use]
    pub fn builder(loader: Arc<dyn ModuleLoader>) -> BridgeBuilder {
        BridgeBuilder {
            loader,
            locations: Vec::new(),
            config: BridgeConfig::default(),
        }
    }

    /// The isolated namespace
    #[must_use]
    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.session.namespace
    }

    /// The session configuration
    #[must_use]
    pub fn config(&self) -> BridgeConfig {
        self.session.config()
    }

    /// Instantiates `type_name` inside the namespace and wraps the instance as `interface`.
    ///
    /// Constructor arguments are marshaled like call arguments: proxies of this session are
    /// unwrapped and interfaces passed as class-as-value are resolved in the namespace.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeNotFound`] if the namespace does not define `type_name`
    /// - [`Error::NoMatchingConstructor`] / [`Error::AmbiguousMatch`] if constructor selection
    ///   fails
    /// - [`Error::Construction`] if the constructor fails
    /// - [`Error::ForeignProxy`] if an argument is a proxy of another session
    /// - [`Error::NamespaceReleased`] after [`Bridge::release`]
    pub fn bridge(&self, interface: &InterfaceRef, type_name: &str, args: Vec<Value>) -> Result<Proxy> {
        self.session.namespace.ensure_live()?;
        let args = marshal_args(&self.session, &args)?;
        let raw = factory::construct(&self.session.namespace, type_name, args)?;
        wrap(interface, &self.session, raw)
    }

    /// Wraps an existing isolated instance as `interface`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NamespaceReleased`] after [`Bridge::release`].
    pub fn wrap(&self, interface: &InterfaceRef, raw: ObjectRef) -> Result<Proxy> {
        wrap(interface, &self.session, raw)
    }

    /// Returns the isolated instance behind a proxy of this session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ForeignProxy`] for proxies of other sessions, and for every proxy once
    /// the session was released.
    pub fn unwrap(&self, proxy: &Proxy) -> Result<ObjectRef> {
        let raw = self
            .session
            .registry
            .get(proxy.handle())
            .ok_or(Error::ForeignProxy(proxy.handle()))?;
        trace!(proxy = %proxy.handle(), object = %raw, "proxy unwrapped");
        Ok(raw)
    }

    /// Number of proxies handed out and still registered
    #[must_use]
    pub fn proxies(&self) -> usize {
        self.session.registry.len()
    }

    /// Ends the session.
    ///
    /// The namespace is released and the wrap registry cleared. Every proxy of the session fails
    /// from now on with [`Error::NamespaceReleased`].
    pub fn release(&self) {
        let proxies = self.session.registry.len();
        self.session.namespace.release();
        self.session.registry.clear();
        debug!(
            namespace = %self.session.namespace.id(),
            proxies,
            "session released"
        );
    }

    /// True once [`Bridge::release`] was called
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.session.namespace.is_released()
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("namespace", &self.session.namespace)
            .field("proxies", &self.session.registry.len())
            .field("config", &self.session.config)
            .finish()
    }
}

/// Builder for a [`Bridge`].
pub struct BridgeBuilder {
    loader: Arc<dyn ModuleLoader>,
    locations: Vec<String>,
    config: BridgeConfig,
}

impl BridgeBuilder {
    /// Appends an archive location to the namespace's search order.
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

    /// Replaces the session configuration.
    #[must_use]
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the namespace and opens the session.
    ///
    /// # Errors
    ///
    /// Fails like [`NamespaceLoader::load`].
    pub fn open(self) -> Result<Bridge> {
        let namespace = NamespaceLoader::new(self.loader)
            .archives(self.locations)
            .policy(self.config.overload_policy)
            .load()?;

        Ok(Bridge {
            session: Arc::new(Session {
                namespace,
                registry: WrapRegistry::new(),
                config: self.config,
            }),
        })
    }
}

/// Loads `locations` into a fresh namespace, instantiates `type_name` with `args` and returns the
/// instance wrapped as `interface`.
///
/// The session behind the proxy uses the default configuration and lives as long as the proxy
/// and the proxies derived from it.
///
/// # Errors
///
/// Fails like [`BridgeBuilder::open`] and [`Bridge::bridge`].
pub fn bridge<I, S>(
    loader: Arc<dyn ModuleLoader>,
    interface: &InterfaceRef,
    locations: I,
    type_name: &str,
    args: Vec<Value>,
) -> Result<Proxy>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Bridge::builder(loader)
        .archives(locations)
        .open()?
        .bridge(interface, type_name, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::OverloadPolicy,
        test::{child_interface, counter_interface, fixture_loader},
    };

    #[test]
    fn test_bridge_and_call() {
        let session = Bridge::builder(fixture_loader()).archive("counter.jar").open().unwrap();
        let proxy = session
            .bridge(&counter_interface(), "plugin.Counter", vec![Value::from(5)])
            .unwrap();

        assert_eq!(proxy.call("increment", vec![Value::from(2)]).unwrap(), Value::from(7));
        assert_eq!(proxy.call("value", vec![]).unwrap(), Value::from(7));
        assert_eq!(session.proxies(), 1);
    }

    #[test]
    fn test_config_reaches_namespace() {
        let session = Bridge::builder(fixture_loader())
            .archive("counter.jar")
            .config(BridgeConfig::lenient())
            .open()
            .unwrap();
        assert_eq!(session.namespace().policy(), OverloadPolicy::FirstMatch);
        assert_eq!(session.config(), BridgeConfig::lenient());
    }

    #[test]
    fn test_unwrap_and_foreign_proxies() {
        let ours = Bridge::builder(fixture_loader()).archive("counter.jar").open().unwrap();
        let theirs = Bridge::builder(fixture_loader()).archive("counter.jar").open().unwrap();

        let proxy = ours
            .bridge(&child_interface(), "plugin.Child", vec![Value::from(1)])
            .unwrap();
        assert_eq!(ours.unwrap(&proxy).unwrap().class().name(), "plugin.Child");
        assert!(matches!(theirs.unwrap(&proxy), Err(Error::ForeignProxy(h)) if h == proxy.handle()));
    }

    #[test]
    fn test_release_clears_registry() {
        let session = Bridge::builder(fixture_loader()).archive("counter.jar").open().unwrap();
        let proxy = session
            .bridge(&counter_interface(), "plugin.Counter", vec![])
            .unwrap();

        session.release();
        assert!(session.is_released());
        assert_eq!(session.proxies(), 0);
        assert!(matches!(proxy.call("value", vec![]), Err(Error::NamespaceReleased(_))));
        assert!(matches!(
            session.bridge(&counter_interface(), "plugin.Counter", vec![]),
            Err(Error::NamespaceReleased(_))
        ));
    }

    #[test]
    fn test_wrap_after_release_leaves_no_entry() {
        let session = Bridge::builder(fixture_loader()).archive("counter.jar").open().unwrap();
        let raw = session.namespace().instantiate("plugin.Counter", vec![]).unwrap();

        session.release();
        assert!(matches!(
            session.wrap(&counter_interface(), raw),
            Err(Error::NamespaceReleased(_))
        ));
        assert_eq!(session.proxies(), 0);
    }

    #[test]
    fn test_wrap_racing_release() {
        let session = Bridge::builder(fixture_loader()).archive("counter.jar").open().unwrap();
        let raw = session.namespace().instantiate("plugin.Counter", vec![]).unwrap();
        let interface = counter_interface();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let (session, raw, interface) = (&session, raw.clone(), interface.clone());
                scope.spawn(move || {
                    for _ in 0..500 {
                        let _ = session.wrap(&interface, raw.clone());
                    }
                });
            }
            session.release();
        });

        assert_eq!(session.proxies(), 0);
    }

    #[test]
    fn test_one_shot_bridge() {
        let proxy = bridge(
            fixture_loader(),
            &counter_interface(),
            ["counter.jar"],
            "plugin.Counter",
            vec![Value::from(1)],
        )
        .unwrap();
        assert_eq!(proxy.call("value", vec![]).unwrap(), Value::from(1));
    }

    #[test]
    fn test_missing_archive() {
        let result = Bridge::builder(fixture_loader()).archive("nope.jar").open();
        assert!(matches!(result, Err(Error::ModuleNotFound(_))));
    }
}
