//! Test fixtures - the enum types the test suites exercise
//!
//! Each function declares one type into the given namespace and panics if the
//! declaration fails, so tests can focus on behaviour of the finished type.

use renum_core::{
    Declaration, EnumError, EnumFactory, EnumType, FieldDef, Namespace, Value, ValueDecl,
};

pub const STATUS_NAMES: [&str; 3] = ["NOT_STARTED", "IN_PROGRESS", "COMPLETE"];

pub fn status(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    factory
        .create(ns, "Status", Declaration::names(STATUS_NAMES))
        .unwrap()
}

pub fn fuzzy(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    factory
        .create(ns, "Fuzzy", Declaration::names(["FooBar", "BarFoo"]))
        .unwrap()
}

/// Names plus a body defining a shared `abbr` method
pub fn color(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    factory
        .create(
            ns,
            "Color",
            Declaration::names_with_body(["RED", "GREEN", "BLUE"], |b| {
                b.method("abbr", |member, _| Ok(Value::from(&member.name()[..1])))
            }),
        )
        .unwrap()
}

/// `FooValue` inside `MyNamespace`; returns the namespace holding it
pub fn foo_value(factory: &EnumFactory) -> Namespace {
    let mut ns = Namespace::new("MyNamespace").unwrap();
    factory
        .create(&mut ns, "FooValue", Declaration::names(["Bar", "Baz", "Bat"]))
        .unwrap();
    ns
}

/// Values declared before the field they initialize
pub fn size(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    factory
        .create(
            ns,
            "Size",
            Declaration::body(|b| {
                b.value(ValueDecl::new("Small").arg("Really really tiny"))?;
                b.value(ValueDecl::new("Medium").arg("Sort of in the middle"))?;
                b.value(ValueDecl::new("Large").arg("Quite big"))?;
                b.value("Unknown")?;

                b.field(
                    FieldDef::new("description")
                        .with_default_fn(|_| Ok(Value::from("NO DESCRIPTION GIVEN"))),
                )
            }),
        )
        .unwrap()
}

pub fn hair_color(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    factory
        .create(
            ns,
            "HairColor",
            Declaration::body(|b| b.values(["BLONDE", "BRUNETTE", "RED"])),
        )
        .unwrap()
}

/// Per-value `description` overrides over a shared one that is not implemented
pub fn rating(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    factory
        .create(
            ns,
            "Rating",
            Declaration::body(|b| {
                b.value("NotRated")?;
                b.value(
                    ValueDecl::new("ThumbsDown")
                        .method("description", |_, _| Ok(Value::from("real real bad"))),
                )?;
                b.value(
                    ValueDecl::new("ThumbsUp")
                        .method("description", |_, _| Ok(Value::from("so so good")))
                        .method("thumbs_up_only_method", |_, _| {
                            Ok(Value::from("this method is only defined on ThumbsUp"))
                        }),
                )?;

                b.method("description", |member, _| {
                    Err(EnumError::NotImplemented {
                        receiver: member.to_string(),
                        method: "description".to_string(),
                    })
                })
            }),
        )
        .unwrap()
}

fn foo_fields(
    factory: &EnumFactory,
    ns: &mut Namespace,
    type_name: &str,
    with_init: bool,
) -> EnumType {
    factory
        .create(
            ns,
            type_name,
            Declaration::body(|b| {
                b.field("foo")?;
                b.field(FieldDef::new("bar").with_default("my bar"))?;
                b.field(
                    FieldDef::new("baz")
                        .with_default_fn(|owner| Ok(Value::from(owner.to_string()))),
                )?;

                b.value(ValueDecl::new("Baz").field("foo", "my foo"))?;

                if with_init {
                    b.init(|_| Ok(()));
                }
                Ok(())
            }),
        )
        .unwrap()
}

/// Fields with no default, a static default and a computed default
pub fn foo1(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    foo_fields(factory, ns, "Foo1", false)
}

/// Same fields as [`foo1`], plus an init hook that leaves them alone
pub fn foo2(factory: &EnumFactory, ns: &mut Namespace) -> EnumType {
    foo_fields(factory, ns, "Foo2", true)
}
