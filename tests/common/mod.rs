//! Plugin archives shared by the integration tests.
//!
//! The archives are authored the way a plugin would ship them: the classes know nothing about the
//! caller-side interfaces the tests declare.

#![allow(dead_code)]

use std::sync::Arc;

use isobridge::prelude::*;

pub const PLUGIN: &str = "plugins/counter.jar";
pub const EXTRAS: &str = "plugins/extras.jar";
pub const SHADOW: &str = "plugins/shadow.jar";

fn stored(ctx: &CallContext<'_>) -> Result<i32> {
    ctx.this()?.get_field("value").unwrap_or(Value::I32(0)).as_i32()
}

fn counter() -> ClassDef {
    ClassBuilder::new("plugin.Counter")
        .default_constructor()
        .constructor(vec![TypeSig::i32()], |ctx| {
            let start = ctx.arg(0)?.as_i32()?;
            if start < 0 {
                return Err(ctx.throw(format!("negative start {start}")));
            }
            ctx.this()?.set_field("value", Value::I32(start));
            Ok(())
        })
        .method("increment", vec![TypeSig::i32()], TypeSig::i32(), |ctx| {
            let value = stored(ctx)? + ctx.arg(0)?.as_i32()?;
            ctx.this()?.set_field("value", Value::I32(value));
            Ok(Value::I32(value))
        })
        .method("value", vec![], TypeSig::i32(), |ctx| Ok(Value::I32(stored(ctx)?)))
        .method("itself", vec![], TypeSig::class("plugin.Counter"), |ctx| {
            Ok(Value::Object(ctx.this()?.clone()))
        })
        .method("child", vec![], TypeSig::class("plugin.Child"), |ctx| {
            Ok(Value::Object(ctx.construct("plugin.Child", vec![Value::I32(stored(ctx)?)])?))
        })
        .method("find", vec![TypeSig::string()], TypeSig::class("plugin.Child"), |ctx| {
            if ctx.arg(0)?.as_str()? == "first" {
                Ok(Value::Object(ctx.construct("plugin.Child", vec![Value::I32(1)])?))
            } else {
                Ok(Value::Null)
            }
        })
        .method("merge", vec![TypeSig::class("plugin.Counter")], TypeSig::i32(), |ctx| {
            let other = ctx.arg(0)?.as_object()?;
            let value = stored(ctx)? + other.get_field("value").unwrap_or(Value::I32(0)).as_i32()?;
            ctx.this()?.set_field("value", Value::I32(value));
            Ok(Value::I32(value))
        })
        .method("same", vec![TypeSig::class("plugin.Counter")], TypeSig::bool(), |ctx| {
            Ok(Value::Bool(ctx.arg(0)?.as_object()?.ptr_eq(ctx.this()?)))
        })
        .method("explode", vec![], TypeSig::void(), |ctx| Err(ctx.throw("exploded")))
        .method("label", vec![TypeSig::i32()], TypeSig::string(), |_| Ok(Value::from("int label")))
        .method("label", vec![TypeSig::i32()], TypeSig::string(), |_| Ok(Value::from("other label")))
        .static_method("kind", vec![], TypeSig::string(), |_| Ok(Value::from("counter")))
        .build()
}

fn child() -> ClassDef {
    ClassBuilder::new("plugin.Child")
        .constructor(vec![TypeSig::i32()], |ctx| {
            ctx.this()?.set_field("value", ctx.arg(0)?.clone());
            Ok(())
        })
        .method("value", vec![], TypeSig::i32(), |ctx| Ok(Value::I32(stored(ctx)?)))
        .method("parent", vec![], TypeSig::class("plugin.Counter"), |ctx| {
            Ok(Value::Object(ctx.construct("plugin.Counter", vec![Value::I32(stored(ctx)?)])?))
        })
        .build()
}

fn factory() -> ClassDef {
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
        .method("local", vec![TypeSig::type_of(TypeSig::object())], TypeSig::bool(), |ctx| {
            let class = ctx.arg(0)?.as_type()?;
            Ok(Value::Bool(class.namespace() == ctx.namespace().id()))
        })
        .build()
}

fn selection() -> Vec<ClassDef> {
    vec![
        ClassBuilder::new("plugin.T")
            .constructor(vec![TypeSig::i32()], |ctx| {
                ctx.this()?.set_field("picked", Value::from("i32"));
                Ok(())
            })
            .constructor(vec![TypeSig::string()], |ctx| {
                ctx.this()?.set_field("picked", Value::from("String"));
                Ok(())
            })
            .method("picked", vec![], TypeSig::string(), |ctx| {
                Ok(ctx.this()?.get_field("picked").unwrap_or(Value::Null))
            })
            .build(),
        ClassBuilder::new("plugin.Pair")
            .constructor(vec![TypeSig::i32(), TypeSig::string()], |ctx| {
                ctx.this()?.set_field("first", ctx.arg(0)?.clone());
                ctx.this()?.set_field("second", ctx.arg(1)?.clone());
                Ok(())
            })
            .build(),
        ClassBuilder::new("plugin.Holder")
            .constructor(vec![TypeSig::class("plugin.Counter")], |ctx| {
                ctx.this()?.set_field("held", ctx.arg(0)?.clone());
                Ok(())
            })
            .method("held", vec![], TypeSig::i32(), |ctx| {
                let held = ctx.this()?.get_field("held").unwrap_or(Value::Null);
                held.as_object()?.get_field("value").unwrap_or(Value::I32(0)).as_i32().map(Value::I32)
            })
            .build(),
        ClassBuilder::new("plugin.Either")
            .constructor(vec![TypeSig::string()], |ctx| {
                ctx.this()?.set_field("picked", Value::from("String"));
                Ok(())
            })
            .constructor(vec![TypeSig::object()], |ctx| {
                ctx.this()?.set_field("picked", Value::from("Object"));
                Ok(())
            })
            .method("picked", vec![], TypeSig::string(), |ctx| {
                Ok(ctx.this()?.get_field("picked").unwrap_or(Value::Null))
            })
            .build(),
    ]
}

/// The main plugin archive
pub fn plugin_archive() -> Archive {
    let mut archive = Archive::new("counter")
        .with_class(counter())
        .with_class(child())
        .with_class(factory());
    for class in selection() {
        archive.add_class(class);
    }
    archive
}

/// An archive adding a class the main archive does not have
pub fn extras_archive() -> Archive {
    Archive::new("extras").with_class(
        ClassBuilder::new("extras.Greeter")
            .default_constructor()
            .method("greet", vec![TypeSig::string()], TypeSig::string(), |ctx| {
                Ok(Value::from(format!("hello {}", ctx.arg(0)?.as_str()?)))
            })
            .build(),
    )
}

/// An archive redefining `plugin.Counter` with different behavior
pub fn shadow_archive() -> Archive {
    Archive::new("shadow").with_class(
        ClassBuilder::new("plugin.Counter")
            .default_constructor()
            .method("value", vec![], TypeSig::i32(), |_| Ok(Value::I32(-1)))
            .build(),
    )
}

/// A loader serving all archives above
pub fn loader() -> Arc<MemoryLoader> {
    let loader = MemoryLoader::new();
    loader.insert(PLUGIN, plugin_archive());
    loader.insert(EXTRAS, extras_archive());
    loader.insert(SHADOW, shadow_archive());
    Arc::new(loader)
}

/// A session over the main plugin archive
pub fn session() -> Bridge {
    session_with(BridgeConfig::default())
}

/// A session over the main plugin archive with an explicit configuration
pub fn session_with(config: BridgeConfig) -> Bridge {
    Bridge::builder(loader())
        .archive(PLUGIN)
        .config(config)
        .open()
        .unwrap()
}
