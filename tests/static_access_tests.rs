// tests/static_access_tests.rs
//! Integration tests for class access: static members and constructors.

mod common;

use std::sync::Arc;

use common::{binder, instance, registry};
use skeleton_key::{
    Binder, BinderConfig, ObjectRef, QualifiedName, Target, Value, provides_features_of,
    provides_static_features_of,
};

fn class_target(name: &str) -> Target {
    Target::Class(QualifiedName::global(name))
}

fn call_static(binder: &Binder, class: &str, method: &str) -> Value {
    let class = binder.registry().get_class(&class.into()).unwrap();
    let method = class.methods_named(method).next().unwrap();
    method.call(None, &[], &class.statics).unwrap()
}

fn call_instance(binder: &Binder, obj: &ObjectRef, method: &str) -> Value {
    let class = binder.registry().get_class(obj.class()).unwrap();
    let method = class.methods_named(method).next().unwrap();
    method.call(Some(obj), &[], &class.statics).unwrap()
}

#[test]
fn test_prime_factory_constructors() {
    let binder = binder();
    let factory = binder
        .bind(class_target("PrimeGenerator"), "PrimeFactory")
        .unwrap();

    let small = factory.call("create", &[Value::Int(16)]).unwrap();
    let small = small.as_object().unwrap();
    assert_eq!(small.class(), &QualifiedName::global("PrimeGenerator"));
    assert_eq!(
        small.get_declared(small.class(), "bufferSize"),
        Some(Value::Int(16))
    );

    let default = factory.call("create", &[]).unwrap();
    let default = default.as_object().unwrap();
    assert_eq!(
        default.get_declared(default.class(), "bufferSize"),
        Some(Value::Int(4096))
    );

    assert_eq!(
        factory.call("getDEFAULT_BUFFER_SIZE", &[]).unwrap(),
        Value::Int(4096)
    );
}

#[test]
fn test_prime_generator_through_capability() {
    let binder = binder();
    let factory = binder
        .bind(class_target("PrimeGenerator"), "PrimeFactory")
        .unwrap();
    let generator = factory.call("create", &[Value::Int(16)]).unwrap();
    let generator = generator.as_object().unwrap();

    let open = binder
        .bind(Target::Instance(Arc::clone(generator)), "OpenPrimeGenerator")
        .unwrap();
    let primes: Vec<Value> = (0..9)
        .map(|i| open.call("getPrime", &[Value::Int(i)]).unwrap())
        .collect();
    let expected: Vec<Value> = [2, 3, 5, 7, 11, 13, 17, 19, 23]
        .into_iter()
        .map(Value::Int)
        .collect();
    assert_eq!(primes, expected);

    assert_eq!(open.call("getBufferSize", &[]).unwrap(), Value::Int(16));
    open.call("setBufferSize", &[Value::Int(32)]).unwrap();
    assert_eq!(open.call("getBufferSize", &[]).unwrap(), Value::Int(32));
}

#[test]
fn test_direct_singleton_modification() {
    let binder = binder();
    let instance = call_static(&binder, "TheOneAndOnly", "getInstance");
    let instance = instance.as_object().unwrap();

    binder
        .bind(Target::Instance(Arc::clone(instance)), "PicklockedSingleton")
        .unwrap()
        .call("setUnique", &[Value::Bool(false)])
        .unwrap();
    assert_eq!(call_instance(&binder, instance, "isUnique"), Value::Bool(false));
}

#[test]
fn test_singleton_factory_intrusion() {
    let binder = binder();
    let instance = binder
        .bind(class_target("TheOneAndOnly"), "PicklockedStatic")
        .unwrap()
        .call("getInstance", &[])
        .unwrap();
    let instance = instance.as_object().unwrap();

    binder
        .bind(Target::Instance(Arc::clone(instance)), "PicklockedSingleton")
        .unwrap()
        .call("setUnique", &[Value::Bool(false)])
        .unwrap();

    let current = call_static(&binder, "TheOneAndOnly", "getInstance");
    assert!(Arc::ptr_eq(current.as_object().unwrap(), instance));
    assert_eq!(
        call_instance(&binder, instance, "isUnique"),
        Value::Bool(false)
    );
}

#[test]
fn test_singleton_injection() {
    let binder = binder();
    let picklocked = binder
        .bind(class_target("TheOneAndOnly"), "PicklockedStaticWithConstructor")
        .unwrap();

    let created = picklocked.call("create", &[]).unwrap();
    let created = created.as_object().unwrap();
    assert_eq!(call_instance(&binder, created, "isUnique"), Value::Bool(true));

    binder
        .bind(Target::Instance(Arc::clone(created)), "PicklockedSingleton")
        .unwrap()
        .call("setUnique", &[Value::Bool(false)])
        .unwrap();
    picklocked
        .call("setInstance", &[Value::Object(Arc::clone(created))])
        .unwrap();

    let current = call_static(&binder, "TheOneAndOnly", "getInstance");
    assert!(Arc::ptr_eq(current.as_object().unwrap(), created));
    assert_eq!(call_instance(&binder, created, "isUnique"), Value::Bool(false));
}

#[test]
fn test_static_feature_checks() {
    let binder = binder();
    for iface in ["PicklockedStatic", "PicklockedStaticWithConstructor"] {
        assert!(provides_static_features_of(&binder, "TheOneAndOnly", iface).is_ok());
    }
    assert!(provides_static_features_of(&binder, "PrimeGenerator", "PrimeFactory").is_ok());

    let report = provides_static_features_of(&binder, "TheOneAndOnly", "PicklockedSingleton")
        .unwrap_err();
    assert_eq!(
        report.to_string(),
        "cannot map following members in TheOneAndOnly:\nvoid setUnique(bool)"
    );
}

#[test]
fn test_create_is_not_special_on_instances() {
    let binder = binder();
    let report = provides_features_of(&binder, "TheOneAndOnly", "PicklockedStaticWithConstructor")
        .unwrap_err();
    assert_eq!(report.conflicts, vec!["TheOneAndOnly create()".to_string()]);

    let obj = instance(&binder, "TheOneAndOnly");
    let err = binder
        .bind(Target::Instance(obj), "PicklockedStaticWithConstructor")
        .unwrap_err();
    assert_eq!(err.operation, "TheOneAndOnly create()");
}

#[test]
fn test_static_members_hidden_from_instances() {
    let config = BinderConfig::new().with_static_members_on_instances(false);
    let binder = Binder::with_config(Arc::new(registry()), config);
    let obj = instance(&binder, "TheOneAndOnly");

    assert!(binder
        .bind(Target::Instance(obj), "PicklockedStatic")
        .is_err());
    assert!(provides_static_features_of(&binder, "TheOneAndOnly", "PicklockedStatic").is_ok());
}

#[test]
fn test_unknown_class_is_reported() {
    let binder = binder();
    let report = provides_static_features_of(&binder, "Nowhere", "PicklockedStatic").unwrap_err();
    assert_eq!(report.conflicts, vec!["unknown type: Nowhere".to_string()]);

    let err = binder
        .bind(class_target("Nowhere"), "PicklockedStatic")
        .unwrap_err();
    assert!(err.operation.is_empty());
}

fn key_proxy(binder: &Binder, class: &str, name: &str) -> Value {
    let key = instance(binder, class);
    key.set_declared(&class.into(), "name", Value::from(name));
    Value::Proxy(binder.bind(Target::Instance(key), "UnlockedKey").unwrap())
}

#[test]
fn test_covariant_constructor_parameter() {
    let binder = binder();
    let factory = binder.bind(class_target("Lock"), "LockFactory").unwrap();

    let lock = factory.call("create", &[Value::from("cellar")]).unwrap();
    let lock = lock.as_object().unwrap();
    assert_eq!(lock.class(), &QualifiedName::global("Lock"));
    assert_eq!(
        lock.get_declared(lock.class(), "label"),
        Some(Value::from("cellar"))
    );
    assert_eq!(lock.get_declared(lock.class(), "key"), Some(Value::Null));
}

#[test]
fn test_converting_constructor_keeps_covariant_arguments() {
    let binder = binder();
    let factory = binder.bind(class_target("Lock"), "LockFactory").unwrap();

    let key = key_proxy(&binder, "MasterKey", "front");
    let lock = factory
        .call("create", &[Value::from("front"), key])
        .unwrap();
    let lock = lock.as_object().unwrap();
    assert_eq!(
        lock.get_declared(lock.class(), "label"),
        Some(Value::from("front"))
    );

    let stored = lock.get_declared(lock.class(), "key").unwrap();
    let stored = stored.as_object().unwrap();
    assert_eq!(stored.class(), &QualifiedName::global("PlainKey"));
    assert_eq!(
        stored.get_declared(stored.class(), "name"),
        Some(Value::from("front"))
    );
}

#[test]
fn test_converting_constructor_unwraps_matching_instance() {
    let binder = binder();
    let factory = binder.bind(class_target("Lock"), "LockFactory").unwrap();

    let key = key_proxy(&binder, "PlainKey", "back");
    let plain = binder.unwrap(&key);
    let lock = factory
        .call("create", &[Value::from("back"), key])
        .unwrap();
    let lock = lock.as_object().unwrap();
    let stored = lock.get_declared(lock.class(), "key").unwrap();
    assert!(Arc::ptr_eq(
        stored.as_object().unwrap(),
        plain.as_object().unwrap()
    ));
}

#[test]
fn test_converting_static_accessors() {
    let binder = binder();
    let locks = binder.bind(class_target("Lock"), "LockFactory").unwrap();
    assert_eq!(locks.call("getMaster", &[]).unwrap(), Value::Null);

    locks
        .call("setMaster", &[key_proxy(&binder, "MasterKey", "garage")])
        .unwrap();

    let master = locks.call("getMaster", &[]).unwrap();
    let proxy = master.as_proxy().unwrap();
    assert_eq!(proxy.interface(), &QualifiedName::global("UnlockedKey"));

    let stored = binder.unwrap(&master);
    let stored = stored.as_object().unwrap();
    assert_eq!(stored.class(), &QualifiedName::global("PlainKey"));
    assert_eq!(
        stored.get_declared(stored.class(), "name"),
        Some(Value::from("garage"))
    );
}

#[test]
fn test_lock_factory_needs_class_access() {
    let binder = binder();
    assert!(provides_static_features_of(&binder, "Lock", "LockFactory").is_ok());
    assert!(provides_features_of(&binder, "Lock", "LockFactory").is_err());
}
