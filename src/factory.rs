//! Instantiation of isolated classes.

use std::sync::Arc;

use tracing::debug;

use crate::{
    matcher::{select_overload, Selection},
    namespace::Namespace,
    typesystem::{CallContext, Shape},
    value::{ObjectRef, Value},
    Error, Result,
};

/// Creates an instance of `type_name` inside `namespace`.
///
/// The constructor is chosen by structurally matching the runtime shape of `args` against every
/// public constructor, following the namespace's overload policy. Arguments are passed as given;
/// proxies must already be unwrapped by the caller.
///
/// # Errors
///
/// - [`Error::TypeNotFound`] if the namespace does not define `type_name`
/// - [`Error::NoMatchingConstructor`] if the class is abstract, an interface or a built-in, or if
///   no constructor matches
/// - [`Error::AmbiguousMatch`] if several constructors match under the strict policy
/// - [`Error::Construction`] if the constructor body fails
pub fn construct(namespace: &Arc<Namespace>, type_name: &str, args: Vec<Value>) -> Result<ObjectRef> {
    let class = namespace.resolve(type_name)?;
    let shape = Shape::of_values(&args);

    if !class.is_instantiable() {
        return Err(Error::NoMatchingConstructor {
            type_name: type_name.to_string(),
            shape: shape.to_string(),
        });
    }

    let selection = select_overload(
        namespace,
        namespace.policy(),
        &shape,
        class.constructors().filter(|ctor| ctor.is_public()),
        |ctor| ctor.shape(),
    );

    let ctor = match selection {
        Selection::Resolved(ctor) => ctor.clone(),
        Selection::NoMatch => {
            return Err(Error::NoMatchingConstructor {
                type_name: type_name.to_string(),
                shape: shape.to_string(),
            })
        }
        Selection::Ambiguous(candidates) => {
            return Err(Error::AmbiguousMatch {
                member: format!("{type_name}..ctor"),
                shape: shape.to_string(),
                candidates,
            })
        }
    };

    let object = ObjectRef::new(class, namespace.clone());
    let ctx = CallContext::new(namespace, Some(&object), &args);
    ctor.invoke(&ctx).map_err(|source| Error::Construction {
        type_name: type_name.to_string(),
        source: Box::new(source),
    })?;

    debug!(
        namespace = %namespace.id(),
        object = %object,
        ctor = %ctor.token(),
        "instance constructed"
    );

    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::OverloadPolicy, test::{fixture_namespace, fixture_namespace_with}};

    #[test]
    fn test_constructor_selected_by_shape() {
        let namespace = fixture_namespace();

        let by_int = construct(&namespace, "plugin.T", vec![Value::from(42)]).unwrap();
        assert_eq!(by_int.get_field("kind"), Some(Value::from("i32")));

        let by_string = construct(&namespace, "plugin.T", vec![Value::from("x")]).unwrap();
        assert_eq!(by_string.get_field("kind"), Some(Value::from("String")));

        let err = construct(&namespace, "plugin.T", vec![Value::from(42), Value::from("x")]).unwrap_err();
        assert!(matches!(
            err,
            Error::NoMatchingConstructor { ref type_name, ref shape }
                if type_name == "plugin.T" && shape == "(i32, String)"
        ));
    }

    #[test]
    fn test_unknown_type() {
        let namespace = fixture_namespace();
        let err = construct(&namespace, "host.Counter", vec![]).unwrap_err();
        assert!(matches!(err, Error::TypeNotFound(_)));
    }

    #[test]
    fn test_abstract_and_builtin_types_are_rejected() {
        let namespace = fixture_namespace();
        assert!(matches!(
            construct(&namespace, "plugin.Shape", vec![]),
            Err(Error::NoMatchingConstructor { .. })
        ));
        assert!(matches!(
            construct(&namespace, "String", vec![]),
            Err(Error::NoMatchingConstructor { .. })
        ));
    }

    #[test]
    fn test_constructor_failure_is_wrapped() {
        let namespace = fixture_namespace();
        let err = construct(&namespace, "plugin.Counter", vec![Value::from(-1)]).unwrap_err();
        match err {
            Error::Construction { type_name, source } => {
                assert_eq!(type_name, "plugin.Counter");
                assert!(matches!(*source, Error::Thrown(ref m) if m == "negative start"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_argument_policies() {
        let strict = fixture_namespace_with(OverloadPolicy::Strict);
        assert!(matches!(
            construct(&strict, "plugin.Ambiguous", vec![Value::Null]),
            Err(Error::AmbiguousMatch { candidates: 2, .. })
        ));

        let lenient = fixture_namespace_with(OverloadPolicy::FirstMatch);
        let object = construct(&lenient, "plugin.Ambiguous", vec![Value::Null]).unwrap();
        assert_eq!(object.get_field("picked"), Some(Value::from("String")));
    }
}
