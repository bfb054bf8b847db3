//! Translation of values crossing the bridge.
//!
//! Inbound, caller proxies become the instances they wrap. Caller interfaces and type handles of
//! other namespaces passed as class-as-value become type handles of the isolated namespace. Outbound, object results are
//! classified by the interface method's declared return and wrapped where a capability is
//! expected.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::{
    adapter::{wrap, InterfaceMethod, ReturnSig},
    bridge::Session,
    value::Value,
    Error, Result,
};

/// Prepares caller arguments for isolated code.
///
/// # Errors
///
/// - [`Error::ForeignProxy`] for a proxy this session did not create
/// - [`Error::TypeNotFound`] for a class-as-value the namespace cannot resolve, including a type
///   handle of another namespace whose name is unknown here
pub(crate) fn marshal_args(session: &Session, args: &[Value]) -> Result<Vec<Value>> {
    args.iter().map(|arg| marshal(session, arg)).collect()
}

fn marshal(session: &Session, arg: &Value) -> Result<Value> {
    match arg {
        Value::Proxy(proxy) => {
            let Some(raw) = session.registry().get(proxy.handle()) else {
                warn!(proxy = %proxy.handle(), "proxy of another session passed as argument");
                return Err(Error::ForeignProxy(proxy.handle()));
            };
            trace!(proxy = %proxy.handle(), object = %raw, "argument unwrapped");
            Ok(Value::Object(raw))
        }
        Value::Interface(interface) => {
            let class = session.namespace().resolve(interface.name())?;
            Ok(Value::Type(class))
        }
        Value::Type(class) if class.namespace() != session.namespace().id() => {
            let local = session.namespace().resolve(class.name())?;
            trace!(class = class.name(), from = %class.namespace(), "type handle resolved locally");
            Ok(Value::Type(local))
        }
        other => Ok(other.clone()),
    }
}

/// Turns the raw result of `method` into what the caller receives.
///
/// Only objects are touched. An object is wrapped when the declared return is an interface, or
/// when it is a type parameter bound by a `Type<T>` parameter for which the caller passed an
/// interface. Any other object is returned raw.
pub(crate) fn classify(
    session: &Arc<Session>,
    method: &InterfaceMethod,
    args: &[Value],
    result: Value,
) -> Result<Value> {
    let Value::Object(raw) = result else {
        return Ok(result);
    };

    let interface = match &method.returns {
        ReturnSig::Interface(link) => Some(link.resolve()),
        ReturnSig::Generic(param) => match method.binding_param(param).and_then(|index| args.get(index)) {
            Some(Value::Interface(interface)) => Some(interface.clone()),
            _ => None,
        },
        ReturnSig::Value(_) => None,
    };

    match interface {
        Some(interface) => Ok(Value::Proxy(wrap(&interface, session, raw)?)),
        None => Ok(Value::Object(raw)),
    }
}
