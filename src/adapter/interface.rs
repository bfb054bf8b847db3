//! Caller-side interface definitions.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{
    matcher,
    namespace::Namespace,
    typesystem::{Shape, TypeSig},
    value::Value,
};

static NEXT_INTERFACE_ID: AtomicU64 = AtomicU64::new(1);

/// A reference-counted interface definition
pub type InterfaceRef = Arc<InterfaceDef>;

/// Process-unique identifier of an interface definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(u64);

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if#{}", self.0)
    }
}

/// Reference from one interface to another, used for capability returns.
///
/// The lazy form lets interfaces name each other before either is built.
#[derive(Clone)]
pub enum InterfaceLink {
    /// An interface that already exists
    Static(InterfaceRef),
    /// An interface obtained on first use
    Lazy(fn() -> InterfaceRef),
}

impl InterfaceLink {
    /// Returns the linked interface.
    #[must_use]
    pub fn resolve(&self) -> InterfaceRef {
        match self {
            InterfaceLink::Static(interface) => interface.clone(),
            InterfaceLink::Lazy(get) => get(),
        }
    }
}

impl fmt::Debug for InterfaceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceLink::Static(interface) => write!(f, "Static({})", interface.name()),
            InterfaceLink::Lazy(_) => f.write_str("Lazy"),
        }
    }
}

/// What the caller declares an interface method returns.
#[derive(Debug, Clone)]
pub enum ReturnSig {
    /// A concrete type; objects are handed back raw
    Value(TypeSig),
    /// A capability contract; objects are wrapped as the linked interface
    Interface(InterfaceLink),
    /// A free type parameter bound by a `Type<T>` parameter; objects are wrapped as the
    /// interface the caller passed for it
    Generic(String),
}

impl ReturnSig {
    /// `void`
    #[must_use]
    pub fn void() -> Self {
        ReturnSig::Value(TypeSig::void())
    }

    /// A capability return wrapped as `interface`
    #[must_use]
    pub fn interface(interface: &InterfaceRef) -> Self {
        ReturnSig::Interface(InterfaceLink::Static(interface.clone()))
    }

    /// A return of the free type parameter `name`
    #[must_use]
    pub fn generic(name: impl Into<String>) -> Self {
        ReturnSig::Generic(name.into())
    }
}

impl From<TypeSig> for ReturnSig {
    fn from(sig: TypeSig) -> Self {
        ReturnSig::Value(sig)
    }
}

/// One method of a caller interface.
#[derive(Debug, Clone)]
pub struct InterfaceMethod {
    /// Method name, matched against isolated method names
    pub name: String,
    /// Declared parameter types, re-resolved inside the isolated namespace
    pub params: Vec<TypeSig>,
    /// Declared return
    pub returns: ReturnSig,
}

impl InterfaceMethod {
    /// Declared parameter shape
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape::declared(&self.params)
    }

    /// Index of the parameter declared `Type<name>`, if any.
    #[must_use]
    pub fn binding_param(&self, name: &str) -> Option<usize> {
        self.params
            .iter()
            .position(|param| param.bound_param() == Some(name))
    }
}

/// A caller-declared interface.
///
/// The isolated class never implements it; proxies satisfy it by structural matching. The
/// interface name doubles as the class name resolved in the isolated namespace when the interface
/// is passed as a class-as-value.
#[derive(Debug)]
pub struct InterfaceDef {
    id: InterfaceId,
    name: String,
    methods: Vec<InterfaceMethod>,
}

impl InterfaceDef {
    /// Starts a definition.
    ///
    /// Every built definition is a distinct interface, even when it declares the same methods as
    /// another. Namespaces cache one dispatch table per class and interface for as long as the
    /// interface is alive, so build an interface once and share the [`InterfaceRef`].
    #[must_use]
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Process-unique identity
    #[must_use]
    pub fn id(&self) -> InterfaceId {
        self.id
    }

    /// Interface name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods in declaration order
    #[must_use]
    pub fn methods(&self) -> &[InterfaceMethod] {
        &self.methods
    }

    /// Selects the interface method a call addresses.
    ///
    /// Candidates share the name and the argument count. A single candidate is taken as is;
    /// several are told apart by structurally matching the arguments against their declared
    /// shapes, the first match winning.
    #[must_use]
    pub fn select(&self, namespace: &Namespace, name: &str, args: &[Value]) -> Option<usize> {
        let mut candidates = self
            .methods
            .iter()
            .enumerate()
            .filter(|(_, method)| method.name == name && method.params.len() == args.len())
            .peekable();

        let (first, _) = *candidates.peek()?;
        let rest: Vec<(usize, &InterfaceMethod)> = candidates.collect();
        if rest.len() == 1 {
            return Some(first);
        }

        let shape = Shape::of_values(args);
        rest.into_iter()
            .find(|(_, method)| matcher::matches(namespace, &method.shape(), &shape))
            .map(|(index, _)| index)
    }
}

/// Builder for an [`InterfaceDef`].
#[derive(Debug)]
pub struct InterfaceBuilder {
    name: String,
    methods: Vec<InterfaceMethod>,
}

impl InterfaceBuilder {
    /// Adds a method.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        params: Vec<TypeSig>,
        returns: impl Into<ReturnSig>,
    ) -> Self {
        self.methods.push(InterfaceMethod {
            name: name.into(),
            params,
            returns: returns.into(),
        });
        self
    }

    /// Adds a generic factory method `<T> T name(params)`, where one parameter is `Type<T>`.
    #[must_use]
    pub fn generic_method(self, name: impl Into<String>, params: Vec<TypeSig>, type_param: &str) -> Self {
        self.method(name, params, ReturnSig::generic(type_param))
    }

    /// Finishes the definition with a fresh identity.
    #[must_use]
    pub fn build(self) -> InterfaceRef {
        Arc::new(InterfaceDef {
            id: InterfaceId(NEXT_INTERFACE_ID.fetch_add(1, Ordering::Relaxed)),
            name: self.name,
            methods: self.methods,
        })
    }
}
