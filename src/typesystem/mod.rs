//! Type descriptors of isolated code.
//!
//! This module holds everything needed to describe the types living in an archive and their
//! loaded counterparts inside a namespace:
//!
//! - [`BuiltinKind`] - the bootstrap scalars shared by every namespace
//! - [`TypeSig`] - declared parameter and return types, resolved by name
//! - [`Shape`] - ordered parameter or argument types used for structural matching
//! - [`ClassDef`], [`ConstructorDef`], [`MethodDef`] - token-less archive definitions
//! - [`Class`], [`Constructor`], [`Method`] - loaded descriptors carrying a [`crate::Token`]
//! - [`ClassBuilder`] - fluent authoring of class definitions
//! - [`CallContext`] - what a constructor or method body sees while it runs
//!
//! # Identity
//!
//! A [`ClassDef`] can be loaded into any number of namespaces. Each load produces a new [`Class`]
//! with a new token, so the same archive loaded twice yields two unrelated universes of types.

mod builder;
mod builtin;
mod class;
mod context;
mod member;
mod shape;
mod signature;

pub use builder::ClassBuilder;
pub use builtin::BuiltinKind;
pub use class::{Class, ClassDef, ClassFlags, ClassRc};
pub use context::CallContext;
pub use member::{
    Constructor, ConstructorBody, ConstructorDef, ConstructorRc, MemberFlags, Method, MethodBody,
    MethodDef, MethodRc,
};
pub use shape::{RuntimeType, Shape, ShapeEntry};
pub use signature::TypeSig;
