// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::items_after_statements)] // Test helpers
#![allow(clippy::module_name_repetitions)] // Test type names

//! Object model behavior through the public API: native classes next to
//! dynamic ones, inheritance, deep cloning and registry interning.

use lbcore::types::{double_type, integer_type, string_type, ClassBuilder, EnumerationBuilder};
use lbcore::xml;
use lbcore::{
    Error, Object, ObjectExt, ObjectPtr, Result, TypePtr, TypeRegistry, Variable, VariableValue,
};
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::sync::Arc;

// ----------------------------------------------------------------------------
// Native class
// ----------------------------------------------------------------------------

/// Natively stored rectangle; member 0 is `width`, member 1 is `height`.
#[derive(Debug)]
struct Rectangle {
    class: TypePtr,
    sides: Mutex<[Option<f64>; 2]>,
}

impl Rectangle {
    fn side(&self, index: usize) -> Result<Option<f64>> {
        let sides = self.sides.lock();
        sides.get(index).copied().ok_or(Error::IndexOutOfRange {
            index,
            len: sides.len(),
        })
    }
}

impl Object for Rectangle {
    fn class(&self) -> &TypePtr {
        &self.class
    }

    fn variable(&self, index: usize) -> Result<Variable> {
        Ok(match self.side(index)? {
            Some(value) => Variable::double(value),
            None => Variable::missing(&double_type()),
        })
    }

    fn set_variable(&self, index: usize, value: Variable) -> Result<()> {
        self.side(index)?;
        if !value.is_instance_of(&double_type()) {
            return Err(Error::TypeMismatch {
                expected: "Double".into(),
                found: value.ty().name().to_string(),
            });
        }
        self.sides.lock()[index] = value.as_double();
        Ok(())
    }

    fn to_display_string(&self) -> String {
        let sides = self.sides.lock();
        match (sides[0], sides[1]) {
            (Some(w), Some(h)) => format!("Rectangle {}x{}", w, h),
            _ => "Rectangle (incomplete)".to_string(),
        }
    }
}

fn register_rectangle(registry: &TypeRegistry) -> TypePtr {
    registry
        .register(
            ClassBuilder::new("Rectangle")
                .member(&double_type(), "width")
                .member(&double_type(), "height")
                .constructor(|ty: &TypePtr| -> ObjectPtr {
                    Arc::new(Rectangle {
                        class: ty.clone(),
                        sides: Mutex::new([None, None]),
                    })
                })
                .build()
                .expect("rectangle"),
        )
        .expect("register rectangle")
}

#[test]
fn test_native_class_construction() {
    let registry = TypeRegistry::new();
    let rectangle = register_rectangle(&registry);

    let object = rectangle.create_object().expect("object");
    assert_eq!(object.num_variables(), 2);
    assert_eq!(object.num_present_variables(), 0);
    assert_eq!(object.to_display_string(), "Rectangle (incomplete)");

    object
        .set_variable_by_name("width", Variable::double(2.0))
        .expect("width");
    object.set_variable(1, Variable::double(3.0)).expect("height");
    assert_eq!(object.to_display_string(), "Rectangle 2x3");
    assert_eq!(Variable::object(object.clone()).to_string(), "Rectangle 2x3");

    let err = object
        .set_variable(0, Variable::string("wide"))
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert!(matches!(
        object.variable(2),
        Err(Error::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn test_native_class_clone_and_xml() {
    let registry = TypeRegistry::new();
    let rectangle = register_rectangle(&registry);
    let object = rectangle.create_object().expect("object");
    object.set_variable(0, Variable::double(4.5)).expect("width");

    let copy = object.clone_object().expect("clone");
    assert!(!Arc::ptr_eq(&copy, &object));
    assert_eq!(copy.to_display_string(), "Rectangle (incomplete)");
    assert_eq!(copy.compare(&*object).expect("compare"), Ordering::Equal);
    assert!(Arc::ptr_eq(copy.class(), &rectangle));

    let document = xml::save_to_string(&Variable::object(object.clone())).expect("save");
    let loaded = xml::load_from_str(&registry, &document).expect("load");
    let loaded = loaded.as_object().expect("object value");
    assert_eq!(loaded.variable(0).expect("width").as_double(), Some(4.5));
    assert!(!loaded.variable(1).expect("height").exists());
    // Loading goes through the registered constructor.
    assert_eq!(loaded.to_display_string(), "Rectangle (incomplete)");
}

// ----------------------------------------------------------------------------
// Dynamic classes
// ----------------------------------------------------------------------------

#[test]
fn test_inheritance_layout_and_conversion() {
    let registry = TypeRegistry::new();
    let shape = registry.create_dynamic_class("Shape", None).expect("shape");
    shape.add_member(&string_type(), "label").expect("label");
    let circle = registry
        .create_dynamic_class("Circle", Some(&shape))
        .expect("circle");
    circle.add_member(&double_type(), "radius").expect("radius");
    let square = registry
        .create_dynamic_class("Square", Some(&shape))
        .expect("square");

    assert!(circle.inherits_from(&shape));
    assert!(!shape.inherits_from(&circle));
    assert!(!square.inherits_from(&circle));
    assert_eq!(circle.num_members(), 2);
    assert_eq!(circle.member_index("label"), Some(0));
    assert_eq!(circle.member_index("radius"), Some(1));

    let object = circle.create_object().expect("circle object");
    object.set_variable(0, Variable::string("unit")).expect("label");
    object.set_variable(1, Variable::double(1.0)).expect("radius");

    let as_shape = Variable::object_as(object.clone(), &shape).expect("upcast");
    assert!(Arc::ptr_eq(as_shape.ty(), &shape));
    assert!(as_shape.is_instance_of(&circle));

    let back = as_shape.convert_to(&circle).expect("downcast");
    assert!(Arc::ptr_eq(back.ty(), &circle));
    let err = as_shape.convert_to(&square).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    // A holder declared on the base accepts the derived object.
    let holder = registry.create_dynamic_class("Holder", None).expect("holder");
    holder.add_member(&shape, "shape").expect("member");
    let held = holder.create_object().expect("holder object");
    held.set_variable(0, Variable::object(object)).expect("derived value");
    let stored = held.object_variable(0).expect("read").expect("present");
    assert!(Arc::ptr_eq(stored.class(), &circle));
}

#[test]
fn test_base_layout_frozen_after_derivation() {
    let registry = TypeRegistry::new();
    let base = registry.create_dynamic_class("Base", None).expect("base");
    base.add_member(&integer_type(), "a").expect("a");
    let derived = registry
        .create_dynamic_class("Derived", Some(&base))
        .expect("derived");
    derived.add_member(&double_type(), "d").expect("d");

    assert!(matches!(
        base.add_member(&integer_type(), "b"),
        Err(Error::LayoutFrozen(_))
    ));
    assert_eq!(base.num_members(), 1);
    assert_eq!(base.member_index("b"), None);
    assert_eq!(derived.member_index("d"), Some(1));

    // A derived object read through a base-typed slot keeps its own layout.
    let holder = registry.create_dynamic_class("BaseHolder", None).expect("holder");
    holder.add_member(&base, "item").expect("item");
    let object = derived.create_object().expect("derived object");
    object.set_variable(0, Variable::integer(4)).expect("a");
    object.set_variable(1, Variable::double(9.5)).expect("d");
    let held = holder.create_object().expect("holder object");
    held.set_variable(0, Variable::object(object)).expect("item");

    let item = held.object_variable(0).expect("read").expect("present");
    assert_eq!(&*item.class().member_name(1).expect("name"), "d");
    assert_eq!(item.variable(1).expect("d").as_double(), Some(9.5));
    assert_eq!(item.variable_by_name("a").expect("a").as_integer(), Some(4));
}

#[test]
fn test_duplicate_member_and_sealed_errors() {
    let registry = TypeRegistry::new();
    let point = registry.create_dynamic_class("P", None).expect("class");
    point.add_member(&integer_type(), "x").expect("x");
    assert!(matches!(
        point.add_member(&double_type(), "x"),
        Err(Error::DuplicateMemberName { .. })
    ));

    let sealed = registry
        .register(
            ClassBuilder::new("Sealed")
                .member(&integer_type(), "x")
                .build()
                .expect("sealed"),
        )
        .expect("register");
    assert!(matches!(
        sealed.add_member(&integer_type(), "y"),
        Err(Error::SealedClass(_))
    ));
    assert!(matches!(
        double_type().add_member(&integer_type(), "y"),
        Err(Error::NotAClass(_))
    ));
}

#[test]
fn test_members_added_after_instantiation() {
    let registry = TypeRegistry::new();
    let record = registry.create_dynamic_class("Record", None).expect("record");
    record.add_member(&integer_type(), "id").expect("id");

    let object = record.create_object().expect("object");
    object.set_variable(0, Variable::integer(7)).expect("id");

    record.add_member(&string_type(), "note").expect("note");
    assert_eq!(object.num_variables(), 2);
    assert!(!object.variable(1).expect("note").exists());
    object.set_variable(1, Variable::string("late")).expect("set note");
    assert_eq!(object.to_display_string(), "Record{id=7, note=late}");
}

#[test]
fn test_deep_clone_is_independent() {
    let registry = TypeRegistry::new();
    let inner = registry.create_dynamic_class("Inner", None).expect("inner");
    inner.add_member(&integer_type(), "value").expect("value");
    let outer = registry.create_dynamic_class("Outer", None).expect("outer");
    outer.add_member(&inner, "owned").expect("owned");
    outer.add_shared_member(&inner, "shared").expect("shared");

    let owned = inner.create_object().expect("owned");
    owned.set_variable(0, Variable::integer(1)).expect("value");
    let shared = inner.create_object().expect("shared");
    shared.set_variable(0, Variable::integer(2)).expect("value");
    let original = outer.create_object().expect("outer object");
    original
        .set_variable(0, Variable::object(owned.clone()))
        .expect("owned");
    original
        .set_variable(1, Variable::object(shared.clone()))
        .expect("shared");

    let first = original.clone_object().expect("first clone");
    let second = first.clone_object().expect("second clone");
    assert_eq!(
        Variable::object(first.clone()),
        Variable::object(second.clone())
    );
    assert_eq!(
        Variable::object(first.clone()),
        Variable::object(original.clone())
    );

    let copied_owned = first.object_variable(0).expect("read").expect("present");
    let copied_shared = first.object_variable(1).expect("read").expect("present");
    assert!(!Arc::ptr_eq(&copied_owned, &owned));
    assert!(Arc::ptr_eq(&copied_shared, &shared));

    copied_owned
        .set_variable(0, Variable::integer(99))
        .expect("mutate clone");
    assert_eq!(owned.variable(0).expect("value").as_integer(), Some(1));
    assert_eq!(
        first.compare(&*original).expect("compare"),
        Ordering::Greater
    );
}

#[test]
fn test_object_ordering() {
    let registry = TypeRegistry::new();
    let pair = registry.create_dynamic_class("Two", None).expect("class");
    pair.add_member(&integer_type(), "a").expect("a");
    pair.add_member(&integer_type(), "b").expect("b");
    let other = registry.create_dynamic_class("Other", None).expect("other");

    let make = |a: Option<i64>, b: Option<i64>| -> ObjectPtr {
        let object = pair.create_object().expect("object");
        if let Some(a) = a {
            object.set_variable(0, Variable::integer(a)).expect("a");
        }
        if let Some(b) = b {
            object.set_variable(1, Variable::integer(b)).expect("b");
        }
        object
    };

    let low = make(Some(1), Some(9));
    let high = make(Some(2), Some(0));
    let partial = make(None, Some(100));
    assert_eq!(low.compare(&*high).expect("cmp"), Ordering::Less);
    assert_eq!(partial.compare(&*low).expect("cmp"), Ordering::Less);
    assert_eq!(
        low.compare(&*make(Some(1), Some(9))).expect("cmp"),
        Ordering::Equal
    );

    let unrelated = other.create_object().expect("other object");
    assert!(matches!(
        low.compare(&*unrelated),
        Err(Error::IncomparableTypes { .. })
    ));
    // Variables still order unrelated objects consistently.
    let (x, y) = (Variable::object(low), Variable::object(unrelated));
    assert_eq!(x.compare(&y), y.compare(&x).reverse());
    assert_ne!(x, y);
}

// ----------------------------------------------------------------------------
// Variables and registry
// ----------------------------------------------------------------------------

#[test]
fn test_enumeration_variables() {
    let registry = TypeRegistry::new();
    let level = registry
        .register(
            EnumerationBuilder::new("Level")
                .element_with_code("Low", 'l')
                .element_with_code("High", 'h')
                .build()
                .expect("level"),
        )
        .expect("register");

    let high = Variable::enumeration(&level, 1).expect("high");
    assert_eq!(high.enumeration_label().expect("label"), "High");
    assert_eq!(high.to_short_string(), "h");
    assert_eq!(
        high.convert_to(&integer_type()).expect("to integer").as_integer(),
        Some(1)
    );

    let missing = Variable::enumeration(&level, 2).expect("missing index");
    assert!(!missing.exists());
    assert!(matches!(
        missing.enumeration_label(),
        Err(Error::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert!(matches!(
        Variable::enumeration(&level, 3),
        Err(Error::InvalidEnumerationIndex { index: 3, len: 2, .. })
    ));
    assert!(matches!(
        Variable::integer(1).enumeration_label(),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        Variable::with_value(&integer_type(), VariableValue::Enumeration(0)),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_concurrent_registration_interns_once() {
    let registry = TypeRegistry::new();
    let results: Vec<TypePtr> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let ty = ClassBuilder::new("Shared")
                        .member(&double_type(), "value")
                        .dynamic()
                        .build()
                        .expect("class");
                    registry.register(ty).expect("register")
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect()
    });

    let first = &results[0];
    assert!(results.iter().all(|ty| Arc::ptr_eq(ty, first)));
    assert!(Arc::ptr_eq(
        &registry.get_type("Shared").expect("lookup"),
        first
    ));
}

#[test]
fn test_unknown_types_and_templates() {
    let registry = TypeRegistry::new();
    assert!(matches!(
        registry.get_type("Missing"),
        Err(Error::UnknownType(_))
    ));
    assert!(matches!(
        registry.get_type("Pair<Integer,Nope>"),
        Err(Error::UnknownType(_))
    ));

    let pair = registry.get_type("Pair<Integer, Double>").expect("pair");
    assert_eq!(pair.name(), "Pair<Integer,Double>");
    let again = registry.get_type("Pair<Integer,Double>").expect("pair");
    assert!(Arc::ptr_eq(&pair, &again));
    assert_eq!(pair.template_args().len(), 2);
    assert!(Arc::ptr_eq(&pair.member_type(1).expect("second"), &double_type()));
}
