//! Runtime values exchanged between the caller and isolated code.
//!
//! A [`Value`] is what flows through constructor arguments, method arguments and results. The
//! caller side sees [`Value::Proxy`] and [`Value::Interface`], the isolated side sees
//! [`Value::Object`] and [`Value::Type`]; argument marshaling and result classification translate
//! between the two.

mod instance;

use std::{fmt, sync::Arc};

pub use instance::{Instance, ObjectRef};

use crate::{adapter::InterfaceRef, adapter::Proxy, typesystem::ClassRc, Error, Result};

/// A value crossing the bridge.
///
/// | Rust | Value |
/// |------|-------|
/// | `()` | [`Value::Void`] |
/// | `bool` | [`Value::Bool`] |
/// | `char` | [`Value::Char`] |
/// | `i32`, `i64` | [`Value::I32`], [`Value::I64`] |
/// | `f32`, `f64` | [`Value::F32`], [`Value::F64`] |
/// | `&str`, `String` | [`Value::String`] |
/// | isolated instance | [`Value::Object`] |
/// | caller proxy | [`Value::Proxy`] |
///
/// Equality compares scalars by value and everything else by identity.
#[derive(Clone, Debug)]
pub enum Value {
    /// No value, result of `void` methods
    Void,
    /// The null reference
    Null,
    /// Boolean
    Bool(bool),
    /// Unicode scalar
    Char(char),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// Immutable string
    String(Arc<str>),
    /// An instance living in a namespace
    Object(ObjectRef),
    /// A type handle of a namespace, the isolated form of a class-as-value
    Type(ClassRc),
    /// A caller-side proxy
    Proxy(Proxy),
    /// A caller interface passed as a class-as-value, e.g. to a generic factory
    Interface(InterfaceRef),
}

impl Value {
    /// Short description of the value's kind, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "String",
            Value::Object(_) => "object",
            Value::Type(_) => "Type",
            Value::Proxy(_) => "proxy",
            Value::Interface(_) => "interface",
        }
    }

    /// True for values that cross the bridge unchanged: scalars, strings, `void`, `null` and
    /// type handles.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Value::Object(_) | Value::Proxy(_) | Value::Interface(_)
        )
    }

    /// True for [`Value::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(value) => Ok(*value),
            other => Err(mismatch("bool", other)),
        }
    }

    /// Returns the char payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_char(&self) -> Result<char> {
        match self {
            Value::Char(value) => Ok(*value),
            other => Err(mismatch("char", other)),
        }
    }

    /// Returns the `i32` payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_i32(&self) -> Result<i32> {
        match self {
            Value::I32(value) => Ok(*value),
            other => Err(mismatch("i32", other)),
        }
    }

    /// Returns the `i64` payload, widening `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::I64(value) => Ok(*value),
            Value::I32(value) => Ok(i64::from(*value)),
            other => Err(mismatch("i64", other)),
        }
    }

    /// Returns the `f32` payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_f32(&self) -> Result<f32> {
        match self {
            Value::F32(value) => Ok(*value),
            other => Err(mismatch("f32", other)),
        }
    }

    /// Returns the `f64` payload, widening `f32`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::F64(value) => Ok(*value),
            Value::F32(value) => Ok(f64::from(*value)),
            other => Err(mismatch("f64", other)),
        }
    }

    /// Returns the string payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(value) => Ok(value),
            other => Err(mismatch("String", other)),
        }
    }

    /// Returns the isolated instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_object(&self) -> Result<&ObjectRef> {
        match self {
            Value::Object(object) => Ok(object),
            other => Err(mismatch("object", other)),
        }
    }

    /// Returns the type handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_type(&self) -> Result<&ClassRc> {
        match self {
            Value::Type(class) => Ok(class),
            other => Err(mismatch("Type", other)),
        }
    }

    /// Returns the proxy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_proxy(&self) -> Result<&Proxy> {
        match self {
            Value::Proxy(proxy) => Ok(proxy),
            other => Err(mismatch("proxy", other)),
        }
    }
}

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::TypeMismatch {
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a.token() == b.token(),
            (Value::Proxy(a), Value::Proxy(b)) => a == b,
            (Value::Interface(a), Value::Interface(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Char(value) => write!(f, "{value:?}"),
            Value::I32(value) => write!(f, "{value}"),
            Value::I64(value) => write!(f, "{value}L"),
            Value::F32(value) => write!(f, "{value}f"),
            Value::F64(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value:?}"),
            Value::Object(object) => write!(f, "{object}"),
            Value::Type(class) => write!(f, "Type<{}>", class.name()),
            Value::Proxy(proxy) => write!(f, "{proxy}"),
            Value::Interface(interface) => write!(f, "Type<{}>", interface.name()),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Void
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<Proxy> for Value {
    fn from(proxy: Proxy) -> Self {
        Value::Proxy(proxy)
    }
}

impl From<InterfaceRef> for Value {
    fn from(interface: InterfaceRef) -> Self {
        Value::Interface(interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(42).as_i32().unwrap(), 42);
        assert_eq!(Value::from(42).as_i64().unwrap(), 42);
        assert_eq!(Value::from(7i64).as_i64().unwrap(), 7);
        assert_eq!(Value::from(1.5f32).as_f64().unwrap(), 1.5);
        assert_eq!(Value::from("x").as_str().unwrap(), "x");
        assert!(Value::from(true).as_bool().unwrap());
        assert_eq!(Value::from('c').as_char().unwrap(), 'c');
        assert_eq!(Value::from(()), Value::Void);
    }

    #[test]
    fn test_mismatch_reports_kinds() {
        let err = Value::from("x").as_i32().unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { ref expected, ref found } if expected == "i32" && found == "String"
        ));
        assert!(Value::Null.as_object().is_err());
    }

    #[test]
    fn test_scalar_classification() {
        assert!(Value::Void.is_scalar());
        assert!(Value::Null.is_scalar());
        assert!(Value::from("x").is_scalar());
        assert!(Value::from(3.0f64).is_scalar());
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::from("a"), Value::from(String::from("a")));
        assert_ne!(Value::from(1), Value::from(1i64));
        assert_ne!(Value::Null, Value::Void);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
