//! Caller-facing proxies over isolated instances.
//!
//! The adapter is the caller's view of the bridge. It wraps an isolated instance as a
//! caller-declared interface, forwards every interface call to a structurally matching isolated
//! method and translates values in both directions.
//!
//! # Key Components
//!
//! - [`InterfaceDef`] - caller interface, its methods and their declared returns
//! - [`Proxy`] - the wrapper handed to the caller
//! - [`WrapRegistry`] - session-wide map from proxy handle to wrapped instance
//! - [`DispatchTable`] - per (class, interface) resolution of target methods
//! - [`BridgeType`] - conversions used by typed adapters from [`crate::interface!`]
//!
//! # Call Pipeline
//!
//! 1. Select the interface method by name, arity and argument shape
//! 2. Look up its target in the dispatch table
//! 3. Unwrap proxy arguments and resolve class-as-value arguments
//! 4. Invoke the target on the instance
//! 5. Classify the result: scalars pass through, objects are wrapped when the declared return
//!    asks for a capability, otherwise they are returned raw

mod dispatch;
mod interface;
mod marshal;
mod proxy;
mod registry;
mod typed;

use std::sync::Arc;

use tracing::debug;

pub use dispatch::DispatchTable;
pub use interface::{
    InterfaceBuilder, InterfaceDef, InterfaceId, InterfaceLink, InterfaceMethod, InterfaceRef,
    ReturnSig,
};
pub(crate) use marshal::marshal_args;
pub use proxy::Proxy;
pub use registry::{ProxyHandle, WrapRegistry};
pub use typed::BridgeType;

use crate::{bridge::Session, value::ObjectRef, Result};

/// Wraps `raw` as `interface` within `session`.
///
/// Registers the instance under a fresh handle and attaches the dispatch table of the instance's
/// class for this interface, building it on first use.
///
/// # Errors
///
/// Returns [`crate::Error::NamespaceReleased`] once the session was released. No entry is left
/// in the wrap registry in that case.
pub(crate) fn wrap(interface: &InterfaceRef, session: &Arc<Session>, raw: ObjectRef) -> Result<Proxy> {
    // liveness is checked after registering, release clears the registry after flagging
    let handle = session.registry().register(raw.clone());
    if let Err(released) = session.namespace().ensure_live() {
        session.registry().remove(handle);
        return Err(released);
    }

    let table = raw.namespace().dispatch_table(raw.class(), interface);

    debug!(
        proxy = %handle,
        object = %raw,
        interface = interface.name(),
        "instance wrapped"
    );

    Ok(Proxy::new(handle, interface.clone(), raw, table, session.clone()))
}
