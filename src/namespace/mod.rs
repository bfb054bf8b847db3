//! Isolated loading namespaces.
//!
//! A [`Namespace`] is an isolated universe of classes built from an ordered list of archive
//! locations. It has no parent: a name resolves only if one of its own archives defines it, or
//! if it names a built-in. Types of the caller, or of any other namespace, are invisible.
//!
//! # Key Components
//!
//! - [`ModuleLoader`] / [`MemoryLoader`] - capability producing archives from locations
//! - [`NamespaceLoader`] - builder that loads archives into a fresh namespace
//! - [`Archive`] - the class definitions of one location
//! - [`TypeRegistry`] - the namespace's class storage
//!
//! # Lifecycle
//!
//! Namespaces are shared through `Arc`: every instance and proxy derived from a namespace keeps
//! it alive. [`Namespace::release`] ends its usability; from then on every resolution,
//! instantiation and proxy call fails with [`Error::NamespaceReleased`].

mod archive;
mod loader;
mod registry;

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Weak,
    },
};

use dashmap::DashMap;
use tracing::debug;

pub use archive::Archive;
pub use loader::{MemoryLoader, ModuleLoader, NamespaceLoader};
pub use registry::TypeRegistry;

use crate::{
    adapter::{DispatchTable, InterfaceDef, InterfaceId, InterfaceRef},
    config::OverloadPolicy,
    factory,
    token::Token,
    typesystem::{BuiltinKind, ClassRc, TypeSig},
    value::{ObjectRef, Value},
    Error, Result,
};

static NEXT_NAMESPACE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(u64);

impl NamespaceId {
    pub(crate) fn new(value: u64) -> Self {
        NamespaceId(value)
    }

    fn next() -> Self {
        NamespaceId(NEXT_NAMESPACE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns#{}", self.0)
    }
}

/// An isolated universe of classes.
pub struct Namespace {
    id: NamespaceId,
    locations: Vec<String>,
    registry: TypeRegistry,
    /// Tables live as long as their interface has a strong reference
    dispatch: DashMap<(Token, InterfaceId), (Weak<InterfaceDef>, Arc<DispatchTable>)>,
    policy: OverloadPolicy,
    released: AtomicBool,
}

impl Namespace {
    pub(crate) fn new(locations: Vec<String>, policy: OverloadPolicy) -> Self {
        let id = NamespaceId::next();
        Namespace {
            id,
            locations,
            registry: TypeRegistry::new(id),
            dispatch: DashMap::new(),
            policy,
            released: AtomicBool::new(false),
        }
    }

    /// The namespace identifier
    #[must_use]
    pub fn id(&self) -> NamespaceId {
        self.id
    }

    /// Archive locations in search order
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Overload policy used by instantiation and dispatch
    #[must_use]
    pub fn policy(&self) -> OverloadPolicy {
        self.policy
    }

    /// The class storage
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Resolves a class by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeNotFound`] if no archive of this namespace defines the name, or
    /// [`Error::NamespaceReleased`] after [`Namespace::release`].
    pub fn resolve(&self, name: &str) -> Result<ClassRc> {
        self.ensure_live()?;
        self.registry
            .get_by_name(name)
            .ok_or_else(|| Error::TypeNotFound(name.to_string()))
    }

    /// Resolves a declared type to its identity in this namespace.
    ///
    /// `Type<X>` erases to the built-in `Type` and a free type parameter erases to `Object`.
    /// Returns `None` for class names this namespace does not know.
    #[must_use]
    pub fn resolve_sig(&self, sig: &TypeSig) -> Option<Token> {
        match sig {
            TypeSig::Builtin(kind) => Some(kind.token()),
            TypeSig::Class(name) => self.registry.token_of(name),
            TypeSig::TypeOf(_) => Some(BuiltinKind::Type.token()),
            TypeSig::Param(_) => Some(BuiltinKind::Object.token()),
        }
    }

    /// Creates an instance of `type_name` with the constructor matching `args`.
    ///
    /// # Errors
    ///
    /// See [`factory::construct`].
    pub fn instantiate(self: &Arc<Self>, type_name: &str, args: Vec<Value>) -> Result<ObjectRef> {
        factory::construct(self, type_name, args)
    }

    /// Ends the namespace's usability.
    ///
    /// Existing instances stay allocated until their last reference is dropped, but nothing can
    /// be resolved, instantiated or dispatched through this namespace anymore.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.dispatch.clear();
            debug!(namespace = %self.id, "namespace released");
        }
    }

    /// True once [`Namespace::release`] was called
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Fails with [`Error::NamespaceReleased`] once the namespace was released.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ensure_live(&self) -> Result<()> {
        if self.is_released() {
            return Err(Error::NamespaceReleased(self.id));
        }
        Ok(())
    }

    /// Returns the dispatch table of `class` for `interface`, building it on first use.
    ///
    /// Building a table first evicts the tables of interfaces that were dropped since.
    pub(crate) fn dispatch_table(&self, class: &ClassRc, interface: &InterfaceRef) -> Arc<DispatchTable> {
        let key = (class.token(), interface.id());
        if let Some(entry) = self.dispatch.get(&key) {
            return entry.value().1.clone();
        }

        let before = self.dispatch.len();
        self.dispatch.retain(|_, (owner, _)| owner.strong_count() > 0);
        let evicted = before.saturating_sub(self.dispatch.len());
        if evicted > 0 {
            debug!(namespace = %self.id, evicted, "dispatch tables of dropped interfaces evicted");
        }

        self.dispatch
            .entry(key)
            .or_insert_with(|| {
                (
                    Arc::downgrade(interface),
                    Arc::new(DispatchTable::build(self, class, interface)),
                )
            })
            .value()
            .1
            .clone()
    }

    /// Number of cached dispatch tables, one per class and live interface in use
    #[must_use]
    pub fn dispatch_tables(&self) -> usize {
        self.dispatch.len()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("id", &self.id)
            .field("locations", &self.locations)
            .field("types", &self.registry.len())
            .field("policy", &self.policy)
            .field("released", &self.is_released())
            .finish()
    }
}
