#![allow(unused_macros)]

/// Helper macro for reading locked items
///
/// ```rust, ignore
///  let data = read_lock!(my_arc_rwlock);
///  println!("{}", data.some_field);
/// ```
macro_rules! read_lock {
    ($arc_rwlock:expr) => {
        $arc_rwlock.read().expect("Failed to acquire read lock")
    };
}

/// Helper macro for writing to locked items
///
/// ```rust, ignore
///  let mut data = write_lock!(my_arc_rwlock);
///  data.some_field = 42;
/// ```
macro_rules! write_lock {
    ($arc_rwlock:expr) => {
        $arc_rwlock.write().expect("Failed to acquire write lock")
    };
}

/// Expands an optional return type to the type itself, or `()` when absent.
#[doc(hidden)]
#[macro_export]
macro_rules! __bridge_ty {
    () => { () };
    ($ret:ty) => { $ret };
}

/// Declares a typed adapter for a caller-side interface.
///
/// The generated struct wraps a [`crate::Proxy`] and exposes one method per interface method.
/// Arguments and results are converted through [`crate::BridgeType`], so parameters and
/// returns may be scalars, `String`, `()`, [`crate::Value`], `Option<T>` or another adapter
/// declared with this macro. Returning another adapter makes the bridge re-wrap the isolated
/// result as that interface.
///
/// The string after `as` is the interface name. It is also the name the isolated namespace
/// resolves when the adapter type is used as a parameter type or passed as a class-as-value,
/// so it normally equals the isolated class name.
///
/// ```rust,ignore
/// isobridge::interface! {
///     /// Counter living in a plugin archive
///     pub struct Counter as "plugin.Counter" {
///         fn increment(by: i32) -> i32;
///         fn reset();
///         fn child() -> Child;
///     }
/// }
///
/// let counter = Counter::from_proxy(bridge.bridge(&Counter::interface(), "plugin.Counter", vec![])?)?;
/// assert_eq!(counter.increment(2)?, 2);
/// ```
#[macro_export]
macro_rules! interface {
    (
        $(#[$attr:meta])*
        $vis:vis struct $adapter:ident as $name:literal {
            $(
                $(#[$mattr:meta])*
                fn $method:ident($($arg:ident : $pty:ty),* $(,)?) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug)]
        $vis struct $adapter {
            proxy: $crate::Proxy,
        }

        impl $adapter {
            /// Returns the interface definition of this adapter, built on first use.
            pub fn interface() -> $crate::InterfaceRef {
                static DEFINITION: ::std::sync::OnceLock<$crate::InterfaceRef> =
                    ::std::sync::OnceLock::new();
                DEFINITION
                    .get_or_init(|| {
                        $crate::InterfaceDef::builder($name)
                            $(
                                .method(
                                    stringify!($method),
                                    vec![$(<$pty as $crate::BridgeType>::param_sig()),*],
                                    <$crate::__bridge_ty!($($ret)?) as $crate::BridgeType>::return_sig(),
                                )
                            )*
                            .build()
                    })
                    .clone()
            }

            /// Adopts an untyped proxy, which must have been created for this interface.
            ///
            /// # Errors
            ///
            /// Returns [`crate::Error::TypeMismatch`] if the proxy satisfies another interface.
            pub fn from_proxy(proxy: $crate::Proxy) -> $crate::Result<Self> {
                let expected = Self::interface();
                if proxy.interface().id() != expected.id() {
                    return Err($crate::Error::TypeMismatch {
                        expected: expected.name().to_string(),
                        found: proxy.interface().name().to_string(),
                    });
                }
                Ok(Self { proxy })
            }

            /// Returns the untyped proxy behind this adapter.
            pub fn proxy(&self) -> &$crate::Proxy {
                &self.proxy
            }

            $(
                $(#[$mattr])*
                pub fn $method(&self, $($arg: $pty),*) -> $crate::Result<$crate::__bridge_ty!($($ret)?)> {
                    let result = self.proxy.call(
                        stringify!($method),
                        vec![$(<$pty as $crate::BridgeType>::into_value($arg)),*],
                    )?;
                    <$crate::__bridge_ty!($($ret)?) as $crate::BridgeType>::from_value(result)
                }
            )*
        }

        impl $crate::BridgeType for $adapter {
            fn param_sig() -> $crate::TypeSig {
                $crate::TypeSig::class($name)
            }

            fn return_sig() -> $crate::ReturnSig {
                $crate::ReturnSig::Interface($crate::InterfaceLink::Lazy(Self::interface))
            }

            fn into_value(self) -> $crate::Value {
                $crate::Value::Proxy(self.proxy)
            }

            fn from_value(value: $crate::Value) -> $crate::Result<Self> {
                match value {
                    $crate::Value::Proxy(proxy) => Self::from_proxy(proxy),
                    other => Err($crate::Error::TypeMismatch {
                        expected: $name.to_string(),
                        found: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}
