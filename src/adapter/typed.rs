//! Conversions between Rust types and bridge values, used by typed adapters.

use crate::{
    adapter::ReturnSig,
    typesystem::TypeSig,
    value::Value,
    Error, Result,
};

/// A Rust type that can appear in a typed adapter method.
///
/// Adapters declared with [`crate::interface!`] implement this trait themselves, so one adapter
/// can take or return another.
pub trait BridgeType: Sized {
    /// Declared type when used as a parameter
    fn param_sig() -> TypeSig;

    /// Declared return when used as a result
    fn return_sig() -> ReturnSig {
        ReturnSig::Value(Self::param_sig())
    }

    /// Converts an argument into a bridge value.
    fn into_value(self) -> Value;

    /// Converts a result back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value has another kind.
    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! scalar_bridge_type {
    ($ty:ty, $sig:ident, $accessor:ident) => {
        impl BridgeType for $ty {
            fn param_sig() -> TypeSig {
                TypeSig::$sig()
            }

            fn into_value(self) -> Value {
                Value::from(self)
            }

            fn from_value(value: Value) -> Result<Self> {
                value.$accessor()
            }
        }
    };
}

scalar_bridge_type!(bool, bool, as_bool);
scalar_bridge_type!(char, char, as_char);
scalar_bridge_type!(i32, i32, as_i32);
scalar_bridge_type!(i64, i64, as_i64);
scalar_bridge_type!(f32, f32, as_f32);
scalar_bridge_type!(f64, f64, as_f64);

impl BridgeType for String {
    fn param_sig() -> TypeSig {
        TypeSig::string()
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_str().map(ToString::to_string)
    }
}

impl BridgeType for () {
    fn param_sig() -> TypeSig {
        TypeSig::void()
    }

    fn into_value(self) -> Value {
        Value::Void
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Void | Value::Null => Ok(()),
            other => Err(Error::TypeMismatch {
                expected: "void".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }
}

/// Untyped passthrough, declared as `Object`.
impl BridgeType for Value {
    fn param_sig() -> TypeSig {
        TypeSig::object()
    }

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

/// `null` on the isolated side, `None` on the caller side.
impl<T: BridgeType> BridgeType for Option<T> {
    fn param_sig() -> TypeSig {
        T::param_sig()
    }

    fn return_sig() -> ReturnSig {
        T::return_sig()
    }

    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_signatures() {
        assert_eq!(i32::param_sig(), TypeSig::i32());
        assert_eq!(String::param_sig(), TypeSig::string());
        assert!(matches!(<()>::return_sig(), ReturnSig::Value(TypeSig::Builtin(_))));
        assert_eq!(Value::param_sig(), TypeSig::object());
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(i32::from_value(5i32.into_value()).unwrap(), 5);
        assert_eq!(String::from_value("x".to_string().into_value()).unwrap(), "x");
        assert!(<()>::from_value(Value::Void).is_ok());
        assert!(i64::from_value(Value::from("x")).is_err());
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(Value::from(3)).unwrap(), Some(3));
        assert_eq!(None::<String>.into_value(), Value::Null);
        assert_eq!(Option::<String>::param_sig(), TypeSig::string());
    }
}
