//! Declared type signatures of parameters and returns.

use std::fmt;

use crate::typesystem::BuiltinKind;

/// A declared type, as written by an archive author or an interface declaration.
///
/// A signature carries no identity by itself. It becomes a type only once it is resolved inside a
/// namespace, see [`crate::Namespace::resolve_sig`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSig {
    /// One of the shared bootstrap types
    Builtin(BuiltinKind),
    /// A class looked up by name in the resolving namespace
    Class(String),
    /// A runtime type handle for the inner type, written `Type<X>`
    TypeOf(Box<TypeSig>),
    /// A free type parameter of a generic method
    Param(String),
}

impl TypeSig {
    /// `void`
    #[must_use]
    pub fn void() -> Self {
        TypeSig::Builtin(BuiltinKind::Void)
    }

    /// `bool`
    #[must_use]
    pub fn bool() -> Self {
        TypeSig::Builtin(BuiltinKind::Bool)
    }

    /// `char`
    #[must_use]
    pub fn char() -> Self {
        TypeSig::Builtin(BuiltinKind::Char)
    }

    /// `i32`
    #[must_use]
    pub fn i32() -> Self {
        TypeSig::Builtin(BuiltinKind::I32)
    }

    /// `i64`
    #[must_use]
    pub fn i64() -> Self {
        TypeSig::Builtin(BuiltinKind::I64)
    }

    /// `f32`
    #[must_use]
    pub fn f32() -> Self {
        TypeSig::Builtin(BuiltinKind::F32)
    }

    /// `f64`
    #[must_use]
    pub fn f64() -> Self {
        TypeSig::Builtin(BuiltinKind::F64)
    }

    /// `String`
    #[must_use]
    pub fn string() -> Self {
        TypeSig::Builtin(BuiltinKind::String)
    }

    /// `Object`
    #[must_use]
    pub fn object() -> Self {
        TypeSig::Builtin(BuiltinKind::Object)
    }

    /// A class reference. Built-in names map to their [`TypeSig::Builtin`] form.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        match BuiltinKind::from_name(&name) {
            Some(kind) => TypeSig::Builtin(kind),
            None => TypeSig::Class(name),
        }
    }

    /// `Type<inner>`
    #[must_use]
    pub fn type_of(inner: TypeSig) -> Self {
        TypeSig::TypeOf(Box::new(inner))
    }

    /// A free type parameter
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        TypeSig::Param(name.into())
    }

    /// Returns the type parameter bound by this signature if it is `Type<T>` for a free `T`.
    #[must_use]
    pub fn bound_param(&self) -> Option<&str> {
        match self {
            TypeSig::TypeOf(inner) => match inner.as_ref() {
                TypeSig::Param(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<BuiltinKind> for TypeSig {
    fn from(kind: BuiltinKind) -> Self {
        TypeSig::Builtin(kind)
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Builtin(kind) => write!(f, "{kind}"),
            TypeSig::Class(name) | TypeSig::Param(name) => f.write_str(name),
            TypeSig::TypeOf(inner) => write!(f, "Type<{inner}>"),
        }
    }
}
