use std::{fmt, sync::Arc};

use tracing::trace;

use crate::{
    adapter::{
        marshal::{classify, marshal_args},
        DispatchTable, InterfaceRef, ProxyHandle,
    },
    bridge::Session,
    typesystem::CallContext,
    value::{ObjectRef, Value},
    Error, Result,
};

/// Caller-side stand-in satisfying one interface for one isolated instance.
///
/// Cloning a proxy is cheap and yields the same proxy: same handle, same instance. Proxies are
/// compared by handle.
#[derive(Clone)]
pub struct Proxy {
    inner: Arc<ProxyInner>,
}

struct ProxyInner {
    handle: ProxyHandle,
    interface: InterfaceRef,
    raw: ObjectRef,
    table: Arc<DispatchTable>,
    session: Arc<Session>,
}

impl Proxy {
    pub(crate) fn new(
        handle: ProxyHandle,
        interface: InterfaceRef,
        raw: ObjectRef,
        table: Arc<DispatchTable>,
        session: Arc<Session>,
    ) -> Self {
        Proxy {
            inner: Arc::new(ProxyInner {
                handle,
                interface,
                raw,
                table,
                session,
            }),
        }
    }

    /// The proxy's identity in its session's wrap registry
    #[must_use]
    pub fn handle(&self) -> ProxyHandle {
        self.inner.handle
    }

    /// The interface this proxy satisfies
    #[must_use]
    pub fn interface(&self) -> &InterfaceRef {
        &self.inner.interface
    }

    /// Name of the isolated class behind the proxy
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.inner.raw.class().name()
    }

    pub(crate) fn raw(&self) -> &ObjectRef {
        &self.inner.raw
    }

    /// Calls an interface method on the isolated instance.
    ///
    /// The interface method is selected by name and argument count, and by argument shape when
    /// it is overloaded. The call then runs the isolated method resolved for it, with proxies
    /// among `args` unwrapped, and the result is classified by the interface method's declared
    /// return.
    ///
    /// A failing call leaves the proxy usable.
    ///
    /// # Errors
    ///
    /// - [`Error::NamespaceReleased`] once the session was released
    /// - [`Error::UnknownInterfaceMethod`] if the interface has no such method
    /// - [`Error::NoMatchingMethod`] / [`Error::AmbiguousMatch`] if no single isolated method
    ///   matches the interface method
    /// - [`Error::ForeignProxy`] / [`Error::TypeNotFound`] if an argument cannot be marshaled
    /// - [`Error::Invocation`] if the isolated method fails
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let inner = &self.inner;
        let session = &inner.session;
        session.namespace().ensure_live()?;

        let namespace = inner.raw.namespace();
        let index = inner
            .interface
            .select(namespace, method, &args)
            .ok_or_else(|| Error::UnknownInterfaceMethod {
                interface: inner.interface.name().to_string(),
                method: method.to_string(),
            })?;

        let target = inner.table.target(index)?;
        let marshaled = marshal_args(session, &args)?;

        let this = if target.is_static() {
            None
        } else {
            Some(&inner.raw)
        };
        let ctx = CallContext::new(namespace, this, &marshaled);
        let result = target.invoke(&ctx).map_err(|source| Error::Invocation {
            method: target.full_name(),
            source: Box::new(source),
        })?;

        trace!(
            proxy = %inner.handle,
            target = %target.token(),
            result = result.kind_name(),
            "call dispatched"
        );

        classify(session, &inner.interface.methods()[index], &args, result)
    }
}

impl PartialEq for Proxy {
    fn eq(&self, other: &Self) -> bool {
        self.inner.handle == other.inner.handle
    }
}

impl Eq for Proxy {}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("handle", &self.inner.handle)
            .field("interface", &self.inner.interface.name())
            .field("object", &self.inner.raw)
            .finish()
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} as {} ({})",
            self.inner.raw,
            self.inner.interface.name(),
            self.inner.handle
        )
    }
}
