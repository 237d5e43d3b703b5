// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builtin types, shared by every registry.

use super::{Class, PrimitiveKind, Type, TypeKind, TypePtr};
use std::sync::{Arc, OnceLock};

struct Builtins {
    any: TypePtr,
    boolean: TypePtr,
    integer: TypePtr,
    positive_integer: TypePtr,
    double: TypePtr,
    probability: TypePtr,
    string: TypePtr,
    object: TypePtr,
}

static BUILTINS: OnceLock<Builtins> = OnceLock::new();

fn builtins() -> &'static Builtins {
    BUILTINS.get_or_init(|| {
        let any = Arc::new(Type::new_raw("Variable", None, Vec::new(), TypeKind::Any));
        let primitive = |name: &str, base: &TypePtr, kind| {
            Arc::new(Type::new_raw(
                name,
                Some(base.clone()),
                Vec::new(),
                TypeKind::Primitive(kind),
            ))
        };
        let boolean = primitive("Boolean", &any, PrimitiveKind::Boolean);
        let integer = primitive("Integer", &any, PrimitiveKind::Integer);
        let positive_integer = primitive("PositiveInteger", &integer, PrimitiveKind::Integer);
        let double = primitive("Double", &any, PrimitiveKind::Double);
        let probability = primitive("Probability", &double, PrimitiveKind::Double);
        let string = primitive("String", &any, PrimitiveKind::String);
        let object = Arc::new(Type::new_raw(
            "Object",
            Some(any.clone()),
            Vec::new(),
            TypeKind::Class(Class::empty()),
        ));
        Builtins {
            any,
            boolean,
            integer,
            positive_integer,
            double,
            probability,
            string,
            object,
        }
    })
}

/// Root of the type hierarchy.
pub fn any_type() -> TypePtr {
    builtins().any.clone()
}

pub fn boolean_type() -> TypePtr {
    builtins().boolean.clone()
}

pub fn integer_type() -> TypePtr {
    builtins().integer.clone()
}

pub fn positive_integer_type() -> TypePtr {
    builtins().positive_integer.clone()
}

pub fn double_type() -> TypePtr {
    builtins().double.clone()
}

pub fn probability_type() -> TypePtr {
    builtins().probability.clone()
}

pub fn string_type() -> TypePtr {
    builtins().string.clone()
}

/// Root class: no members.
pub fn object_type() -> TypePtr {
    builtins().object.clone()
}

/// All builtin types, root first.
pub fn builtin_types() -> Vec<TypePtr> {
    let b = builtins();
    vec![
        b.any.clone(),
        b.boolean.clone(),
        b.integer.clone(),
        b.positive_integer.clone(),
        b.double.clone(),
        b.probability.clone(),
        b.string.clone(),
        b.object.clone(),
    ]
}
