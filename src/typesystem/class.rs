//! Class definitions and loaded classes.

use std::{collections::HashMap, fmt, sync::Arc};

use bitflags::bitflags;

use crate::{
    namespace::NamespaceId,
    token::Token,
    typesystem::{BuiltinKind, Constructor, ConstructorDef, ConstructorRc, Method, MethodDef, MethodRc},
    Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Attributes of a class
    pub struct ClassFlags: u32 {
        /// Class is visible outside its archive
        const PUBLIC = 0x0001;
        /// Class is an interface and cannot be instantiated
        const INTERFACE = 0x0020;
        /// Class is abstract and cannot be instantiated
        const ABSTRACT = 0x0080;
    }
}

/// A reference-counted loaded class
pub type ClassRc = Arc<Class>;

/// Archive-level definition of a class, produced by [`crate::ClassBuilder`].
///
/// Definitions carry no identity. Every namespace that loads one creates its own [`Class`].
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Fully qualified class name, e.g. `plugin.Counter`
    pub name: String,
    /// Class attributes
    pub flags: ClassFlags,
    /// Constructors in declaration order
    pub constructors: Vec<Arc<ConstructorDef>>,
    /// Methods in declaration order
    pub methods: Vec<Arc<MethodDef>>,
}

/// A class loaded into a namespace, with its member registry.
///
/// Members keep their declaration order, which is the candidate order of overload selection.
pub struct Class {
    token: Token,
    name: String,
    flags: ClassFlags,
    namespace: NamespaceId,
    builtin: Option<BuiltinKind>,
    constructors: boxcar::Vec<ConstructorRc>,
    methods: boxcar::Vec<MethodRc>,
    methods_by_name: HashMap<String, Vec<MethodRc>>,
}

impl Class {
    /// Loads a definition, assigning fresh tokens to the class and each of its members.
    pub(crate) fn load(def: &ClassDef, namespace: NamespaceId) -> Result<Self> {
        let constructors = boxcar::Vec::new();
        for ctor in &def.constructors {
            constructors.push(Arc::new(Constructor::load(&def.name, ctor.clone())?));
        }

        let methods = boxcar::Vec::new();
        let mut methods_by_name: HashMap<String, Vec<MethodRc>> = HashMap::new();
        for method_def in &def.methods {
            let method = Arc::new(Method::load(&def.name, method_def.clone())?);
            methods_by_name
                .entry(method_def.name.clone())
                .or_default()
                .push(method.clone());
            methods.push(method);
        }

        Ok(Class {
            token: Token::next_type()?,
            name: def.name.clone(),
            flags: def.flags,
            namespace,
            builtin: None,
            constructors,
            methods,
            methods_by_name,
        })
    }

    /// Creates the namespace-local descriptor of a built-in, carrying its shared token.
    pub(crate) fn new_builtin(kind: BuiltinKind, namespace: NamespaceId) -> Self {
        Class {
            token: kind.token(),
            name: kind.name().to_string(),
            flags: ClassFlags::PUBLIC,
            namespace,
            builtin: Some(kind),
            constructors: boxcar::Vec::new(),
            methods: boxcar::Vec::new(),
            methods_by_name: HashMap::new(),
        }
    }

    /// The class identity
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Fully qualified name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class attributes
    #[must_use]
    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    /// The namespace this class was loaded into
    #[must_use]
    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// The built-in this class stands for, if any
    #[must_use]
    pub fn builtin(&self) -> Option<BuiltinKind> {
        self.builtin
    }

    /// True if instances of the class can be constructed
    #[must_use]
    pub fn is_instantiable(&self) -> bool {
        self.builtin.is_none() && !self.flags.intersects(ClassFlags::ABSTRACT | ClassFlags::INTERFACE)
    }

    /// Constructors in declaration order
    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorRc> {
        self.constructors.iter().map(|(_, ctor)| ctor)
    }

    /// Methods in declaration order
    pub fn methods(&self) -> impl Iterator<Item = &MethodRc> {
        self.methods.iter().map(|(_, method)| method)
    }

    /// All overloads with the given name, in declaration order
    #[must_use]
    pub fn methods_named(&self, name: &str) -> &[MethodRc] {
        self.methods_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("namespace", &self.namespace)
            .field("constructors", &self.constructors.count())
            .field("methods", &self.methods.count())
            .finish()
    }
}
