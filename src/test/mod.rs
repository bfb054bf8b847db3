//! Shared fixtures for unit tests: a plugin archive and the caller interfaces used against it.

use std::sync::{Arc, OnceLock};

use crate::{
    adapter::{InterfaceDef, InterfaceLink, InterfaceRef, ReturnSig},
    config::OverloadPolicy,
    namespace::{Archive, MemoryLoader, Namespace, NamespaceLoader},
    typesystem::{ClassBuilder, ClassDef, ClassFlags, TypeSig},
    value::Value,
};

/// Location of [`fixture_archive`] in [`fixture_loader`]
pub const FIXTURE_LOCATION: &str = "counter.jar";

fn counter_value(ctx: &crate::typesystem::CallContext<'_>) -> crate::Result<i32> {
    ctx.this()?.get_field("value").unwrap_or(Value::I32(0)).as_i32()
}

fn counter_class() -> ClassDef {
    ClassBuilder::new("plugin.Counter")
        .default_constructor()
        .constructor(vec![TypeSig::i32()], |ctx| {
            let start = ctx.arg(0)?.as_i32()?;
            if start < 0 {
                return Err(ctx.throw("negative start"));
            }
            ctx.this()?.set_field("value", Value::I32(start));
            Ok(())
        })
        .method("increment", vec![TypeSig::i32()], TypeSig::i32(), |ctx| {
            let value = counter_value(ctx)? + ctx.arg(0)?.as_i32()?;
            ctx.this()?.set_field("value", Value::I32(value));
            Ok(Value::I32(value))
        })
        .method("value", vec![], TypeSig::i32(), |ctx| Ok(Value::I32(counter_value(ctx)?)))
        .method("reset", vec![], TypeSig::void(), |ctx| {
            ctx.this()?.set_field("value", Value::I32(0));
            Ok(Value::Void)
        })
        .method("self_ref", vec![], TypeSig::class("plugin.Counter"), |ctx| {
            Ok(Value::Object(ctx.this()?.clone()))
        })
        .method("child", vec![], TypeSig::class("plugin.Child"), |ctx| {
            let child = ctx.construct("plugin.Child", vec![Value::I32(counter_value(ctx)?)])?;
            Ok(Value::Object(child))
        })
        .method("spawn", vec![], TypeSig::class("plugin.Child"), |ctx| {
            Ok(Value::Object(ctx.construct("plugin.Child", vec![Value::I32(1)])?))
        })
        .method("fail", vec![], TypeSig::void(), |ctx| Err(ctx.throw("boom")))
        .method("absorb", vec![TypeSig::class("plugin.Counter")], TypeSig::i32(), |ctx| {
            let other = ctx.arg(0)?.as_object()?;
            let added = other.get_field("value").unwrap_or(Value::I32(0)).as_i32()?;
            let value = counter_value(ctx)? + added;
            ctx.this()?.set_field("value", Value::I32(value));
            Ok(Value::I32(value))
        })
        .method("adopt", vec![TypeSig::class("plugin.Child")], TypeSig::i32(), |ctx| {
            let child = ctx.arg(0)?.as_object()?;
            child.get_field("value").unwrap_or(Value::I32(0)).as_i32().map(Value::I32)
        })
        .method("pick", vec![TypeSig::i32()], TypeSig::string(), |_| Ok(Value::from("first")))
        .method("pick", vec![TypeSig::i32()], TypeSig::string(), |_| Ok(Value::from("second")))
        .private_method("secret", vec![], TypeSig::i32(), |_| Ok(Value::I32(42)))
        .static_method("describe", vec![], TypeSig::string(), |ctx| {
            Ok(Value::from(format!("counter in {}", ctx.namespace().id())))
        })
        .build()
}

fn child_class() -> ClassDef {
    ClassBuilder::new("plugin.Child")
        .constructor(vec![TypeSig::i32()], |ctx| {
            ctx.this()?.set_field("value", ctx.arg(0)?.clone());
            Ok(())
        })
        .method("value", vec![], TypeSig::i32(), |ctx| {
            Ok(ctx.this()?.get_field("value").unwrap_or(Value::I32(0)))
        })
        .method("twice", vec![], TypeSig::i32(), |ctx| {
            let value = ctx.this()?.get_field("value").unwrap_or(Value::I32(0)).as_i32()?;
            Ok(Value::I32(value * 2))
        })
        .build()
}

fn factory_class() -> ClassDef {
    ClassBuilder::new("plugin.Factory")
        .default_constructor()
        .generic_method(
            "create",
            &["T"],
            vec![TypeSig::type_of(TypeSig::param("T"))],
            TypeSig::param("T"),
            |ctx| {
                let class = ctx.arg(0)?.as_type()?;
                Ok(Value::Object(ctx.construct(class.name(), vec![])?))
            },
        )
        .build()
}

fn selection_classes() -> Vec<ClassDef> {
    vec![
        ClassBuilder::new("plugin.T")
            .constructor(vec![TypeSig::i32()], |ctx| {
                ctx.this()?.set_field("kind", Value::from("i32"));
                Ok(())
            })
            .constructor(vec![TypeSig::string()], |ctx| {
                ctx.this()?.set_field("kind", Value::from("String"));
                Ok(())
            })
            .build(),
        ClassBuilder::new("plugin.Ambiguous")
            .constructor(vec![TypeSig::string()], |ctx| {
                ctx.this()?.set_field("picked", Value::from("String"));
                Ok(())
            })
            .constructor(vec![TypeSig::object()], |ctx| {
                ctx.this()?.set_field("picked", Value::from("Object"));
                Ok(())
            })
            .build(),
        ClassBuilder::new("plugin.Shape")
            .flags(ClassFlags::PUBLIC | ClassFlags::ABSTRACT)
            .default_constructor()
            .build(),
    ]
}

/// The plugin archive every fixture namespace loads
pub fn fixture_archive() -> Archive {
    let mut archive = Archive::new("counter")
        .with_class(counter_class())
        .with_class(child_class())
        .with_class(factory_class());
    for class in selection_classes() {
        archive.add_class(class);
    }
    archive
}

/// A loader serving [`fixture_archive`] at [`FIXTURE_LOCATION`]
pub fn fixture_loader() -> Arc<MemoryLoader> {
    let loader = MemoryLoader::new();
    loader.insert(FIXTURE_LOCATION, fixture_archive());
    Arc::new(loader)
}

/// A fresh namespace over the fixture archive, strict overload policy
pub fn fixture_namespace() -> Arc<Namespace> {
    fixture_namespace_with(OverloadPolicy::Strict)
}

/// A fresh namespace over the fixture archive
pub fn fixture_namespace_with(policy: OverloadPolicy) -> Arc<Namespace> {
    NamespaceLoader::new(fixture_loader())
        .archive(FIXTURE_LOCATION)
        .policy(policy)
        .load()
        .unwrap()
}

/// Caller view of `plugin.Counter`
pub fn counter_interface() -> InterfaceRef {
    static DEFINITION: OnceLock<InterfaceRef> = OnceLock::new();
    DEFINITION
        .get_or_init(|| {
            InterfaceDef::builder("plugin.Counter")
                .method("increment", vec![TypeSig::i32()], TypeSig::i32())
                .method("value", vec![], TypeSig::i32())
                .method("reset", vec![], ReturnSig::void())
                .method("self_ref", vec![], ReturnSig::Interface(InterfaceLink::Lazy(counter_interface)))
                .method("child", vec![], ReturnSig::Interface(InterfaceLink::Lazy(child_interface)))
                .method("spawn", vec![], TypeSig::class("plugin.Child"))
                .method("fail", vec![], ReturnSig::void())
                .method("absorb", vec![TypeSig::class("plugin.Counter")], TypeSig::i32())
                .method("adopt", vec![TypeSig::class("plugin.Child")], TypeSig::i32())
                .method("describe", vec![], TypeSig::string())
                .method("secret", vec![], TypeSig::i32())
                .method("pick", vec![TypeSig::i32()], TypeSig::string())
                .build()
        })
        .clone()
}

/// Caller view of `plugin.Child`
pub fn child_interface() -> InterfaceRef {
    static DEFINITION: OnceLock<InterfaceRef> = OnceLock::new();
    DEFINITION
        .get_or_init(|| {
            InterfaceDef::builder("plugin.Child")
                .method("value", vec![], TypeSig::i32())
                .method("twice", vec![], TypeSig::i32())
                .build()
        })
        .clone()
}

/// Caller view of `plugin.Factory`
pub fn factory_interface() -> InterfaceRef {
    static DEFINITION: OnceLock<InterfaceRef> = OnceLock::new();
    DEFINITION
        .get_or_init(|| {
            InterfaceDef::builder("plugin.Factory")
                .generic_method("create", vec![TypeSig::type_of(TypeSig::param("T"))], "T")
                .build()
        })
        .clone()
}
