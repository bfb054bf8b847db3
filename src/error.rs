use thiserror::Error;

use crate::{adapter::ProxyHandle, namespace::NamespaceId};

/// Builds an [`Error::Thrown`] from a message or a format string.
///
/// Isolated code uses this to raise a failure from inside a constructor or method body,
/// the same way a plugin would throw.
///
/// ```rust,ignore
/// return Err(thrown!("counter overflow at {}", value));
/// ```
#[macro_export]
macro_rules! thrown {
    // Single string version
    ($msg:expr) => {
        $crate::Error::Thrown($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::Thrown(format!($fmt, $($arg)*))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Loading Errors
/// - [`Error::ModuleNotFound`] - The module loader does not know an archive location
/// - [`Error::ArchiveUnreadable`] - The module loader could not produce an archive
/// - [`Error::TypeNotFound`] - A name could not be resolved inside a namespace
/// - [`Error::NamespaceReleased`] - The namespace was released by its session
/// - [`Error::TokensExhausted`] - No identity is left for another class or member
///
/// ## Dispatch Errors
/// - [`Error::NoMatchingConstructor`] - No constructor structurally matches the arguments
/// - [`Error::NoMatchingMethod`] - No method structurally matches the interface method
/// - [`Error::AmbiguousMatch`] - More than one overload matches under the strict policy
/// - [`Error::UnknownInterfaceMethod`] - The proxy's interface has no such method
/// - [`Error::ForeignProxy`] - A proxy argument belongs to a different session
///
/// ## Execution Errors
/// - [`Error::Construction`] - A constructor body failed
/// - [`Error::Invocation`] - A method body failed
/// - [`Error::Thrown`] - Failure raised by isolated code
/// - [`Error::TypeMismatch`], [`Error::MissingArgument`], [`Error::MissingReceiver`] - A value
///   did not have the shape the code consuming it expected
///
/// # Examples
///
/// ```rust,ignore
/// use isobridge::Error;
///
/// match proxy.call("increment", vec![1.into()]) {
///     Ok(value) => println!("now {value}"),
///     Err(Error::NoMatchingMethod { type_name, method, .. }) => {
///         eprintln!("{type_name} has no compatible {method}");
///     }
///     Err(Error::Invocation { method, source }) => {
///         eprintln!("{method} failed: {source}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Loading Errors
    /// The module loader does not know the requested archive location.
    #[error("Module not found - {0}")]
    ModuleNotFound(String),

    /// The module loader knows the location but failed to produce its archive.
    ///
    /// # Fields
    ///
    /// * `location` - The archive location that failed
    /// * `message` - Description of the failure reported by the loader
    #[error("Archive unreadable - {location}: {message}")]
    ArchiveUnreadable {
        /// The archive location that failed
        location: String,
        /// The failure reported by the loader
        message: String,
    },

    /// A type name could not be resolved in the namespace.
    ///
    /// Namespaces have no parent, so a type that exists only in the caller's own types or in
    /// another namespace ends up here as well.
    #[error("Failed to find type in namespace - {0}")]
    TypeNotFound(String),

    /// The namespace was released and can no longer be used.
    #[error("Namespace {0} has been released")]
    NamespaceReleased(NamespaceId),

    /// Every row of a token table has been allocated in this process.
    #[error("Token table 0x{0:02x} is exhausted")]
    TokensExhausted(u8),

    // Dispatch Errors
    /// No constructor of the type structurally matches the supplied arguments.
    #[error("No constructor of {type_name} matches {shape}")]
    NoMatchingConstructor {
        /// The type that was instantiated
        type_name: String,
        /// Rendered shape of the arguments
        shape: String,
    },

    /// No method of the target type structurally matches the interface method.
    #[error("No method {type_name}.{method} matches {shape}")]
    NoMatchingMethod {
        /// The isolated type that was searched
        type_name: String,
        /// The method name
        method: String,
        /// Rendered shape of the interface method parameters
        shape: String,
    },

    /// More than one overload matched while the strict overload policy was active.
    #[error("{candidates} overloads of {member} match {shape}")]
    AmbiguousMatch {
        /// The member that was resolved (type name and member name)
        member: String,
        /// Rendered shape that was matched
        shape: String,
        /// Number of matching overloads
        candidates: usize,
    },

    /// The proxy's interface does not declare a method with this name and arity.
    #[error("Interface {interface} has no method {method}")]
    UnknownInterfaceMethod {
        /// The interface name
        interface: String,
        /// The requested method name
        method: String,
    },

    /// A proxy argument was not created by the session it is passed into.
    #[error("Proxy {0} does not belong to this session")]
    ForeignProxy(ProxyHandle),

    // Execution Errors
    /// The selected constructor failed.
    #[error("Failed to construct {type_name}: {source}")]
    Construction {
        /// The type that was instantiated
        type_name: String,
        /// The failure raised by the constructor body
        #[source]
        source: Box<Error>,
    },

    /// The selected method failed.
    #[error("Invocation of {method} failed: {source}")]
    Invocation {
        /// The invoked method (type name and member name)
        method: String,
        /// The failure raised by the method body
        #[source]
        source: Box<Error>,
    },

    /// Failure raised by isolated code.
    #[error("{0}")]
    Thrown(String),

    /// A value did not have the expected kind.
    #[error("Expected {expected}, found {found}")]
    TypeMismatch {
        /// The expected kind of value
        expected: String,
        /// The kind of value that was found
        found: String,
    },

    /// A body asked for an argument that was not supplied.
    #[error("Missing argument at position {0}")]
    MissingArgument(usize),

    /// A body asked for a receiver but was invoked without one.
    #[error("Member invoked without a receiver")]
    MissingReceiver,
}

impl Error {
    /// Returns the innermost error, following construction and invocation wrappers.
    ///
    /// Useful to inspect what isolated code actually raised when a failure crossed several
    /// proxies on its way out.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Construction { source, .. } | Error::Invocation { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}
