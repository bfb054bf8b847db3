//! Parameter shapes: the ordered types of a parameter list or an argument list.

use std::fmt;

use crate::{
    typesystem::{BuiltinKind, ClassRc, TypeSig},
    value::Value,
};

/// The runtime type contributed by an argument value.
#[derive(Debug, Clone)]
pub enum RuntimeType {
    /// A scalar, a type handle or `void`
    Builtin(BuiltinKind),
    /// An object, carrying the class it was created from
    Object(ClassRc),
    /// The `null` reference
    Null,
}

impl RuntimeType {
    /// Returns the runtime type of a value.
    ///
    /// Proxies contribute the class of the instance they forward to. Class-as-value arguments are
    /// type handles.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Void => RuntimeType::Builtin(BuiltinKind::Void),
            Value::Null => RuntimeType::Null,
            Value::Bool(_) => RuntimeType::Builtin(BuiltinKind::Bool),
            Value::Char(_) => RuntimeType::Builtin(BuiltinKind::Char),
            Value::I32(_) => RuntimeType::Builtin(BuiltinKind::I32),
            Value::I64(_) => RuntimeType::Builtin(BuiltinKind::I64),
            Value::F32(_) => RuntimeType::Builtin(BuiltinKind::F32),
            Value::F64(_) => RuntimeType::Builtin(BuiltinKind::F64),
            Value::String(_) => RuntimeType::Builtin(BuiltinKind::String),
            Value::Type(_) | Value::Interface(_) => RuntimeType::Builtin(BuiltinKind::Type),
            Value::Object(object) => RuntimeType::Object(object.class().clone()),
            Value::Proxy(proxy) => RuntimeType::Object(proxy.raw().class().clone()),
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeType::Builtin(kind) => write!(f, "{kind}"),
            RuntimeType::Object(class) => f.write_str(class.name()),
            RuntimeType::Null => f.write_str("null"),
        }
    }
}

/// One position of a [`Shape`].
#[derive(Debug, Clone)]
pub enum ShapeEntry {
    /// A declared parameter type
    Declared(TypeSig),
    /// The runtime type of a supplied argument
    Runtime(RuntimeType),
}

impl fmt::Display for ShapeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeEntry::Declared(sig) => write!(f, "{sig}"),
            ShapeEntry::Runtime(runtime) => write!(f, "{runtime}"),
        }
    }
}

/// An ordered list of types used for structural matching, rendered as `(i32, String)`.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    entries: Vec<ShapeEntry>,
}

impl Shape {
    /// Shape of a declared parameter list.
    #[must_use]
    pub fn declared(params: &[TypeSig]) -> Self {
        Shape {
            entries: params.iter().cloned().map(ShapeEntry::Declared).collect(),
        }
    }

    /// Shape of a runtime argument list.
    #[must_use]
    pub fn of_values(values: &[Value]) -> Self {
        Shape {
            entries: values
                .iter()
                .map(|value| ShapeEntry::Runtime(RuntimeType::of(value)))
                .collect(),
        }
    }

    /// Number of positions
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the shape has no positions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The positions in order
    #[must_use]
    pub fn entries(&self) -> &[ShapeEntry] {
        &self.entries
    }

    /// True if the rendering fully describes the shape.
    ///
    /// Runtime objects render as their class name, which does not capture which namespace the
    /// class was loaded into. Shapes containing them cannot be compared as text.
    #[must_use]
    pub fn is_portable(&self) -> bool {
        !self
            .entries
            .iter()
            .any(|entry| matches!(entry, ShapeEntry::Runtime(RuntimeType::Object(_))))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_declared() {
        let shape = Shape::declared(&[TypeSig::i32(), TypeSig::string()]);
        assert_eq!(shape.to_string(), "(i32, String)");
        assert_eq!(shape.len(), 2);
        assert!(shape.is_portable());
    }

    #[test]
    fn test_render_values() {
        let shape = Shape::of_values(&[Value::from(42), Value::from("x"), Value::Null]);
        assert_eq!(shape.to_string(), "(i32, String, null)");
        assert!(shape.is_portable());
    }

    #[test]
    fn test_empty_shape() {
        let shape = Shape::of_values(&[]);
        assert!(shape.is_empty());
        assert_eq!(shape.to_string(), "()");
    }
}
