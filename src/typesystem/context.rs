use std::sync::Arc;

use crate::{
    namespace::Namespace,
    typesystem::ClassRc,
    value::{ObjectRef, Value},
    Error, Result,
};

/// Everything a constructor or method body can see while it runs.
///
/// Bodies only reach other isolated types through [`CallContext::construct`] and
/// [`CallContext::resolve`], which go through the namespace the body was loaded into.
pub struct CallContext<'a> {
    namespace: &'a Arc<Namespace>,
    this: Option<&'a ObjectRef>,
    args: &'a [Value],
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        namespace: &'a Arc<Namespace>,
        this: Option<&'a ObjectRef>,
        args: &'a [Value],
    ) -> Self {
        CallContext {
            namespace,
            this,
            args,
        }
    }

    /// The namespace the running code was loaded into
    #[must_use]
    pub fn namespace(&self) -> &Arc<Namespace> {
        self.namespace
    }

    /// The receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingReceiver`] inside static methods.
    pub fn this(&self) -> Result<&'a ObjectRef> {
        self.this.ok_or(Error::MissingReceiver)
    }

    /// The argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] if fewer arguments were supplied.
    pub fn arg(&self, index: usize) -> Result<&'a Value> {
        self.args.get(index).ok_or(Error::MissingArgument(index))
    }

    /// All arguments
    #[must_use]
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Instantiates another type of the same namespace.
    ///
    /// # Errors
    ///
    /// Fails like [`Namespace::instantiate`].
    pub fn construct(&self, type_name: &str, args: Vec<Value>) -> Result<ObjectRef> {
        self.namespace.instantiate(type_name, args)
    }

    /// Resolves a type name in the running code's namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeNotFound`] for unknown names.
    pub fn resolve(&self, name: &str) -> Result<ClassRc> {
        self.namespace.resolve(name)
    }

    /// Builds the failure isolated code raises with `return Err(ctx.throw(..))`.
    #[must_use]
    pub fn throw(&self, message: impl Into<String>) -> Error {
        Error::Thrown(message.into())
    }
}
