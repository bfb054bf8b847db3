//! Fluent construction of isolated class definitions.

use std::sync::Arc;

use crate::{
    typesystem::{
        CallContext, ClassDef, ClassFlags, ConstructorDef, MemberFlags, MethodDef, TypeSig,
    },
    value::Value,
    Result,
};

/// Builder for a [`ClassDef`].
///
/// Members are recorded in call order, which becomes their declaration order and therefore the
/// candidate order used by overload selection.
///
/// # Examples
///
/// ```rust,ignore
/// use isobridge::prelude::*;
///
/// let counter = ClassBuilder::new("plugin.Counter")
///     .constructor(vec![TypeSig::i32()], |ctx| {
///         ctx.this()?.set_field("value", ctx.arg(0)?.clone());
///         Ok(())
///     })
///     .method("value", vec![], TypeSig::i32(), |ctx| {
///         Ok(ctx.this()?.get_field("value").unwrap_or(Value::I32(0)))
///     })
///     .build();
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    flags: ClassFlags,
    constructors: Vec<Arc<ConstructorDef>>,
    methods: Vec<Arc<MethodDef>>,
}

impl ClassBuilder {
    /// Starts a public class with no members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ClassBuilder {
            name: name.into(),
            flags: ClassFlags::PUBLIC,
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Replaces the class attributes.
    #[must_use]
    pub fn flags(mut self, flags: ClassFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Adds a public constructor.
    #[must_use]
    pub fn constructor<F>(mut self, params: Vec<TypeSig>, body: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.constructors.push(Arc::new(ConstructorDef {
            flags: MemberFlags::PUBLIC,
            params,
            body: Arc::new(body),
        }));
        self
    }

    /// Adds a public constructor without parameters that leaves all fields unset.
    #[must_use]
    pub fn default_constructor(self) -> Self {
        self.constructor(Vec::new(), |_| Ok(()))
    }

    /// Adds a public instance method.
    #[must_use]
    pub fn method<F>(self, name: &str, params: Vec<TypeSig>, returns: TypeSig, body: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.push_method(name, MemberFlags::PUBLIC, Vec::new(), params, returns, body)
    }

    /// Adds a public instance method with its own type parameters.
    ///
    /// Parameters declared `Type<T>` bind `T`, and a return of `T` lets the bridge wrap the result
    /// as the interface the caller passed for it.
    #[must_use]
    pub fn generic_method<F>(
        self,
        name: &str,
        generic_params: &[&str],
        params: Vec<TypeSig>,
        returns: TypeSig,
        body: F,
    ) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        let generic_params = generic_params.iter().map(ToString::to_string).collect();
        self.push_method(name, MemberFlags::PUBLIC, generic_params, params, returns, body)
    }

    /// Adds a public method that runs without a receiver.
    #[must_use]
    pub fn static_method<F>(self, name: &str, params: Vec<TypeSig>, returns: TypeSig, body: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.push_method(
            name,
            MemberFlags::PUBLIC | MemberFlags::STATIC,
            Vec::new(),
            params,
            returns,
            body,
        )
    }

    /// Adds a method that is invisible to dispatch.
    #[must_use]
    pub fn private_method<F>(self, name: &str, params: Vec<TypeSig>, returns: TypeSig, body: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.push_method(name, MemberFlags::empty(), Vec::new(), params, returns, body)
    }

    /// Finishes the definition.
    #[must_use]
    pub fn build(self) -> ClassDef {
        ClassDef {
            name: self.name,
            flags: self.flags,
            constructors: self.constructors,
            methods: self.methods,
        }
    }

    fn push_method<F>(
        mut self,
        name: &str,
        flags: MemberFlags,
        generic_params: Vec<String>,
        params: Vec<TypeSig>,
        returns: TypeSig,
        body: F,
    ) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.push(Arc::new(MethodDef {
            name: name.to_string(),
            flags,
            generic_params,
            params,
            returns,
            body: Arc::new(body),
        }));
        self
    }
}
