// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]

//! # isobridge
//!
//! Structural call bridging between a host and objects living in isolated, dynamically loaded
//! module namespaces.
//!
//! A plugin packaged in its own archive is loaded into a namespace of its own. Its classes never
//! implement the host's interfaces, and the host never sees the plugin's types. `isobridge` lets
//! the host call such an object anyway, through a host-declared interface: methods are matched
//! structurally by name and parameter shape, and every object crossing back over the boundary is
//! wrapped again so that further calls keep working.
//!
//! ## Features
//!
//! - **Isolated namespaces** - each session loads its archives into a universe of its own, with
//!   no fallback to the host's types
//! - **Structural dispatch** - constructors and methods are selected by parameter shape, with
//!   every position resolved to a type identity inside the isolated namespace
//! - **Recursive wrapping** - results are re-wrapped as capability interfaces, generic factories
//!   return the interface the caller asked for
//! - **Identity-preserving unwrapping** - proxies passed back as arguments become the exact
//!   instances they wrap
//! - **Typed adapters** - [`interface!`] generates a typed Rust facade over a proxy
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use isobridge::prelude::*;
//!
//! // Plugin side: a class that knows nothing about the host's interface
//! let counter = ClassBuilder::new("plugin.Counter")
//!     .constructor(vec![TypeSig::i32()], |ctx| {
//!         ctx.this()?.set_field("value", ctx.arg(0)?.clone());
//!         Ok(())
//!     })
//!     .method("increment", vec![TypeSig::i32()], TypeSig::i32(), |ctx| {
//!         let this = ctx.this()?;
//!         let current = this.get_field("value").unwrap_or(Value::I32(0)).as_i32()?;
//!         let value = current + ctx.arg(0)?.as_i32()?;
//!         this.set_field("value", Value::I32(value));
//!         Ok(Value::I32(value))
//!     })
//!     .build();
//!
//! let loader = MemoryLoader::new();
//! loader.insert("plugins/counter.jar", Archive::new("counter").with_class(counter));
//!
//! // Host side: an interface the class never implements
//! let interface = InterfaceDef::builder("plugin.Counter")
//!     .method("increment", vec![TypeSig::i32()], TypeSig::i32())
//!     .build();
//!
//! let proxy = isobridge::bridge(
//!     Arc::new(loader),
//!     &interface,
//!     ["plugins/counter.jar"],
//!     "plugin.Counter",
//!     vec![Value::from(40)],
//! )?;
//! assert_eq!(proxy.call("increment", vec![Value::from(2)])?, Value::from(42));
//! # Ok::<(), isobridge::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`namespace`] - archive loading and isolated type resolution
//! - [`matcher`] - structural comparison of parameter shapes and overload selection
//! - [`factory`] - instantiation through a structurally matching constructor
//! - [`adapter`] - proxies, the wrap registry, dispatch tables and value marshaling
//! - [`mod@bridge`] - sessions tying the above together
//! - [`typesystem`] / [`value`] - descriptors and runtime values of isolated code
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. Failures raised by isolated code surface as
//! [`Error::Construction`] or [`Error::Invocation`] with the original failure as source; see
//! [`Error::root_cause`].
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events at namespace loading, construction, wrapping, dispatch table
//! creation and release. It installs no subscriber.
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use isobridge::prelude::*;
///
/// let loader = std::sync::Arc::new(MemoryLoader::new());
/// let session = Bridge::builder(loader).open()?;
/// println!("{} types", session.namespace().registry().len());
/// # Ok::<(), isobridge::Error>(())
/// ```
pub mod prelude;

/// Proxies over isolated instances, interface definitions and the wrap registry.
pub mod adapter;
/// Bridging sessions.
pub mod bridge;
/// Session configuration.
pub mod config;
/// Instantiation of isolated classes.
pub mod factory;
/// Structural matching of parameter shapes.
pub mod matcher;
/// Isolated namespaces and archive loading.
pub mod namespace;
/// Identity tokens of loaded types and members.
pub mod token;
/// Type descriptors of isolated code.
pub mod typesystem;
/// Runtime values crossing the bridge.
pub mod value;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `isobridge` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

pub use adapter::{
    BridgeType, InterfaceBuilder, InterfaceDef, InterfaceId, InterfaceLink, InterfaceMethod,
    InterfaceRef, Proxy, ProxyHandle, ReturnSig, WrapRegistry,
};
pub use bridge::{bridge, Bridge, BridgeBuilder};
pub use config::{BridgeConfig, OverloadPolicy};
pub use namespace::{Archive, MemoryLoader, ModuleLoader, Namespace, NamespaceId, NamespaceLoader};
pub use token::Token;
pub use typesystem::{BuiltinKind, CallContext, ClassBuilder, ClassDef, ClassFlags, TypeSig};
pub use value::{ObjectRef, Value};
