//! # isobridge Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the isobridge library. Import this module to get quick access to everything needed to
//! author isolated archives and to call into them.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all isobridge operations
pub use crate::Error;

/// The result type used throughout isobridge
pub use crate::Result;

/// Session configuration and overload policies
pub use crate::config::{BridgeConfig, OverloadPolicy};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Bridging sessions and the one-shot entry point
pub use crate::bridge::{bridge, Bridge, BridgeBuilder};

/// Namespaces and archive loading
pub use crate::namespace::{Archive, MemoryLoader, ModuleLoader, Namespace, NamespaceLoader};

// ================================================================================================
// Caller Side
// ================================================================================================

/// Interfaces, proxies and typed adapter support
pub use crate::adapter::{
    BridgeType, InterfaceDef, InterfaceLink, InterfaceRef, Proxy, ProxyHandle, ReturnSig,
};

// ================================================================================================
// Isolated Side
// ================================================================================================

/// Class authoring and type signatures
pub use crate::typesystem::{BuiltinKind, CallContext, ClassBuilder, ClassDef, ClassFlags, TypeSig};

/// Runtime values
pub use crate::value::{ObjectRef, Value};

/// Identity tokens
pub use crate::token::Token;
