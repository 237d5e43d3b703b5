// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_precision_loss)] // Random test values
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure

//! Randomized checks of the laws the object model relies on.
//!
//! Seeds are fixed so failures reproduce.

use lbcore::types::{
    boolean_type, double_type, integer_type, string_type, EnumerationBuilder,
};
use lbcore::{xml, ObjectPtr, TypePtr, TypeRegistry, Variable};
use std::cmp::Ordering;

const ROUNDS: usize = 200;

fn random_scalar(rng: &mut fastrand::Rng, level: &TypePtr) -> Variable {
    match rng.usize(..7) {
        0 => Variable::missing(&double_type()),
        1 => Variable::boolean(rng.bool()),
        2 => Variable::integer(rng.i64(-50..50)),
        3 => Variable::double(rng.f64() * 100.0 - 50.0),
        4 => Variable::double(rng.i64(-50..50) as f64),
        5 => Variable::string(format!("s{}", rng.u8(..20))),
        _ => Variable::enumeration(level, rng.usize(..=3)).expect("index in range"),
    }
}

fn level_type(registry: &TypeRegistry) -> TypePtr {
    registry
        .register(
            EnumerationBuilder::new("Level")
                .element("Low")
                .element("Mid")
                .element("High")
                .build()
                .expect("level"),
        )
        .expect("register")
}

#[test]
fn test_inheritance_is_transitive() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_0001);
    let registry = TypeRegistry::new();

    let mut chain: Vec<TypePtr> = Vec::new();
    for depth in 0..12 {
        let base = if chain.is_empty() || rng.u8(..4) == 0 {
            None
        } else {
            Some(chain[rng.usize(..chain.len())].clone())
        };
        let class = registry
            .create_dynamic_class(&format!("C{}", depth), base.as_ref())
            .expect("class");
        class
            .add_member(&integer_type(), &format!("m{}", depth))
            .expect("member");
        chain.push(class);
    }

    for a in &chain {
        assert!(a.inherits_from(a));
        for b in &chain {
            for c in &chain {
                if a.inherits_from(b) && b.inherits_from(c) {
                    assert!(a.inherits_from(c), "{} -> {} -> {}", a.name(), b.name(), c.name());
                }
            }
            if a.inherits_from(b) {
                assert!(a.num_members() >= b.num_members());
            }
        }
    }
}

#[test]
fn test_variable_order_is_total() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_0002);
    let registry = TypeRegistry::new();
    let level = level_type(&registry);
    let values: Vec<Variable> = (0..40).map(|_| random_scalar(&mut rng, &level)).collect();

    for a in &values {
        assert_eq!(a.compare(a), Ordering::Equal);
        for b in &values {
            assert_eq!(a.compare(b), b.compare(a).reverse(), "{:?} vs {:?}", a, b);
            for c in &values {
                if a.compare(b) != Ordering::Greater && b.compare(c) != Ordering::Greater {
                    assert_ne!(a.compare(c), Ordering::Greater, "{:?} {:?} {:?}", a, b, c);
                }
            }
        }
    }

    let mut sorted = values.clone();
    sorted.sort();
    assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    let first_present = sorted.iter().position(Variable::exists).unwrap_or(sorted.len());
    assert!(sorted[first_present..].iter().all(Variable::exists));
}

#[test]
fn test_integer_double_comparison_is_exact() {
    assert!(Variable::integer(i64::MAX) > Variable::double(9.2e18));
    assert!(Variable::integer(i64::MAX) < Variable::double(9.3e18));
    assert_eq!(Variable::integer(3), Variable::double(3.0));
    assert!(Variable::integer(3) < Variable::double(3.5));
    assert!(Variable::integer(-3) > Variable::double(-3.5));
}

fn random_record(rng: &mut fastrand::Rng, record: &TypePtr) -> ObjectPtr {
    let object = record.create_object().expect("object");
    if rng.bool() {
        object
            .set_variable(0, Variable::boolean(rng.bool()))
            .expect("flag");
    }
    if rng.bool() {
        object
            .set_variable(1, Variable::integer(rng.i64(..)))
            .expect("count");
    }
    if rng.bool() {
        object
            .set_variable(2, Variable::double(rng.f64()))
            .expect("ratio");
    }
    if rng.bool() {
        let text: String = (0..rng.usize(..12))
            .map(|_| match rng.u8(..5) {
                0 => '<',
                1 => '&',
                2 => '"',
                _ => rng.alphanumeric(),
            })
            .collect();
        object
            .set_variable(3, Variable::string(text))
            .expect("text");
    }
    object
}

#[test]
fn test_clone_and_xml_round_trip() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_0003);
    let registry = TypeRegistry::new();
    let record = registry.create_dynamic_class("Record", None).expect("record");
    record.add_member(&boolean_type(), "flag").expect("flag");
    record.add_member(&integer_type(), "count").expect("count");
    record.add_member(&double_type(), "ratio").expect("ratio");
    record.add_member(&string_type(), "text").expect("text");

    for round in 0..ROUNDS {
        let object = random_record(&mut rng, &record);
        let original = Variable::object(object);

        let once = original.deep_clone().expect("clone");
        let twice = once.deep_clone().expect("clone");
        assert_eq!(once, twice, "round {}", round);
        assert_eq!(original, once, "round {}", round);

        let document = xml::save_to_string(&original).expect("save");
        let loaded = xml::load_from_str(&registry, &document).expect("load");
        assert_eq!(loaded, original, "round {}: {}", round, document);
    }
}
