//! Constructor and method descriptors.
//!
//! Archives carry token-less definitions ([`ConstructorDef`], [`MethodDef`]) that can be shared
//! between any number of namespaces. Loading a class into a namespace wraps every definition in
//! a [`Constructor`] or [`Method`] with a fresh [`Token`], which is the member's identity inside
//! that namespace.

use std::{fmt, sync::Arc};

use bitflags::bitflags;

use crate::{
    token::Token,
    typesystem::{CallContext, Shape, TypeSig},
    value::Value,
    Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Visibility and dispatch attributes of a constructor or method
    pub struct MemberFlags: u32 {
        /// Member is visible outside its class and takes part in dispatch
        const PUBLIC = 0x0001;
        /// Member is invoked without a receiver
        const STATIC = 0x0010;
    }
}

/// Body of a method. Receives the call context and produces the return value.
pub type MethodBody = Arc<dyn Fn(&CallContext<'_>) -> Result<Value> + Send + Sync>;

/// Body of a constructor. Receives the call context with the freshly allocated receiver.
pub type ConstructorBody = Arc<dyn Fn(&CallContext<'_>) -> Result<()> + Send + Sync>;

/// A reference-counted loaded method
pub type MethodRc = Arc<Method>;

/// A reference-counted loaded constructor
pub type ConstructorRc = Arc<Constructor>;

/// Archive-level definition of a constructor.
#[derive(Clone)]
pub struct ConstructorDef {
    /// Visibility flags
    pub flags: MemberFlags,
    /// Declared parameter types
    pub params: Vec<TypeSig>,
    /// Initialization code
    pub body: ConstructorBody,
}

impl fmt::Debug for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("flags", &self.flags)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Archive-level definition of a method.
#[derive(Clone)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Visibility and dispatch flags
    pub flags: MemberFlags,
    /// Names of the method's own type parameters, empty unless generic
    pub generic_params: Vec<String>,
    /// Declared parameter types
    pub params: Vec<TypeSig>,
    /// Declared return type
    pub returns: TypeSig,
    /// Implementation
    pub body: MethodBody,
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("generic_params", &self.generic_params)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// A constructor loaded into a namespace.
#[derive(Debug)]
pub struct Constructor {
    token: Token,
    owner: String,
    def: Arc<ConstructorDef>,
}

impl Constructor {
    pub(crate) fn load(owner: &str, def: Arc<ConstructorDef>) -> Result<Self> {
        Ok(Constructor {
            token: Token::next_method()?,
            owner: owner.to_string(),
            def,
        })
    }

    /// The constructor's identity
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Declared parameter types
    #[must_use]
    pub fn params(&self) -> &[TypeSig] {
        &self.def.params
    }

    /// Declared parameter shape
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape::declared(&self.def.params)
    }

    /// True if the constructor takes part in instantiation
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.def.flags.contains(MemberFlags::PUBLIC)
    }

    /// Name used in diagnostics, `Owner..ctor`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}..ctor", self.owner)
    }

    pub(crate) fn invoke(&self, ctx: &CallContext<'_>) -> Result<()> {
        (self.def.body)(ctx)
    }
}

/// A method loaded into a namespace.
#[derive(Debug)]
pub struct Method {
    token: Token,
    owner: String,
    def: Arc<MethodDef>,
}

impl Method {
    pub(crate) fn load(owner: &str, def: Arc<MethodDef>) -> Result<Self> {
        Ok(Method {
            token: Token::next_method()?,
            owner: owner.to_string(),
            def,
        })
    }

    /// The method's identity
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Method name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Name of the declaring class
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Name used in diagnostics, `Owner.name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.owner, self.def.name)
    }

    /// Visibility and dispatch flags
    #[must_use]
    pub fn flags(&self) -> MemberFlags {
        self.def.flags
    }

    /// Declared parameter types
    #[must_use]
    pub fn params(&self) -> &[TypeSig] {
        &self.def.params
    }

    /// Declared parameter shape
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape::declared(&self.def.params)
    }

    /// Declared return type
    #[must_use]
    pub fn returns(&self) -> &TypeSig {
        &self.def.returns
    }

    /// The method's own type parameters
    #[must_use]
    pub fn generic_params(&self) -> &[String] {
        &self.def.generic_params
    }

    /// True if the method takes part in dispatch
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.def.flags.contains(MemberFlags::PUBLIC)
    }

    /// True if the method runs without a receiver
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.def.flags.contains(MemberFlags::STATIC)
    }

    pub(crate) fn invoke(&self, ctx: &CallContext<'_>) -> Result<Value> {
        (self.def.body)(ctx)
    }
}
