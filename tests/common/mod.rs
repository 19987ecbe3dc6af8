// tests/common/mod.rs
//! Shared fixtures for the integration tests.
//!
//! Each fixture registers a small target type the way its owner would, with
//! private members and native bodies, plus the capability interfaces the
//! tests bind against it.

#![allow(dead_code)]

use std::sync::Arc;

use skeleton_key::{
    Binder, CallContext, CapabilityInterface, ConstructStrategy, ConvertMarker, DataType, Object,
    ObjectRef, OperationDescriptor, QualifiedName, RegistrationError, TargetError, TypeRegistry,
    Value,
};

pub type Body = Result<Value, TargetError>;

fn op(name: &str) -> OperationDescriptor {
    OperationDescriptor::new(name)
}

fn object_arg(ctx: &CallContext<'_>, index: usize) -> Result<Option<ObjectRef>, TargetError> {
    Ok(ctx.arg_value(index)?.as_object().cloned())
}

fn same_object(a: &Value, b: Option<&ObjectRef>) -> bool {
    match (a.as_object(), b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

// ============================================================================
// LockedObject
// ============================================================================

pub fn register_locked_object(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry
        .register_type("LockedSuper")
        .field("private double superField")?
        .method("private double superMethod()", |_: &mut CallContext<'_>| {
            Ok(Value::Double(5.0))
        })?
        .build()?;

    registry
        .register_type("LockedObject")
        .extends("LockedSuper")
        .field("private String myField")?
        .field_init("private final int integer", 2)?
        .method("private int myMethod(String, bool)", |ctx: &mut CallContext<'_>| {
            let string: String = ctx.arg(0)?;
            let flag: bool = ctx.arg(1)?;
            if !flag {
                return Ok(Value::Int(0));
            }
            string
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|e| TargetError::new("NumberFormatException", e.to_string()))
        })?
        .method("public int myPublicMethod()", |ctx: &mut CallContext<'_>| {
            let field: Option<String> = ctx.field_as("myField")?;
            Ok(Value::Int(
                field.and_then(|f| f.parse().ok()).unwrap_or_default(),
            ))
        })?
        .build()?;

    registry
        .register_type("LockedObjectWithDeclaredExceptions")
        .method(
            "private String myMethod(String) throws IOException",
            |_: &mut CallContext<'_>| Err(TargetError::new("java::io::IOException", "no disk")),
        )?
        .build()?;

    registry.register_interface(
        CapabilityInterface::new("UnlockedObject")
            .with_operation(op("setMyField").param(DataType::string()))
            .with_operation(op("getMyField").returns(DataType::string()))
            .with_operation(
                op("myMethod")
                    .param(DataType::string())
                    .param(DataType::bool())
                    .returns(DataType::int()),
            )
            .with_operation(op("getSuperField").returns(DataType::double()))
            .with_operation(op("setSuperField").param(DataType::double()))
            .with_operation(op("superMethod").returns(DataType::double()))
            .with_operation(op("setInteger").param(DataType::int()))
            .with_operation(op("getInteger").returns(DataType::int())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedNotMatchingMethodObject")
            .with_operation(op("notExistingMethod").returns(DataType::bool())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedNotMatchingGetterObject")
            .with_operation(op("getNotExisting").returns(DataType::bool())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedNotMatchingSetterObject")
            .with_operation(op("setNotExisting").param(DataType::bool())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedWithCorrectExceptions").with_operation(
            op("myMethod")
                .param(DataType::string())
                .returns(DataType::string())
                .throws(DataType::object("java::io::IOException")),
        ),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedWithMissingExceptions").with_operation(
            op("myMethod")
                .param(DataType::string())
                .returns(DataType::string()),
        ),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedWithFalseExceptions").with_operation(
            op("myMethod")
                .param(DataType::string())
                .returns(DataType::string())
                .throws(DataType::object("ClassCastException")),
        ),
    )?;
    Ok(())
}

// ============================================================================
// House and Key
// ============================================================================

pub fn register_house(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry.register_type("Key").build()?;

    registry
        .register_type("House")
        .field("private Key houseKey")?
        .field("private bool locked")?
        .field("private int furniture")?
        .constructor("public House(Key)", |ctx: &mut CallContext<'_>| {
            ctx.set_field("houseKey", ctx.arg_value(0)?.clone())?;
            Ok(Value::Void)
        })?
        .method("public bool open(Key)", |ctx: &mut CallContext<'_>| {
            let key = object_arg(ctx, 0)?;
            let matches = same_object(&ctx.field("houseKey")?, key.as_ref());
            if matches {
                ctx.set_field("locked", false)?;
            }
            Ok(Value::Bool(matches))
        })?
        .method("private void open()", |ctx: &mut CallContext<'_>| {
            ctx.set_field("locked", false)?;
            Ok(Value::Void)
        })?
        .method("public void lock(Key)", |ctx: &mut CallContext<'_>| {
            let key = object_arg(ctx, 0)?;
            if same_object(&ctx.field("houseKey")?, key.as_ref()) {
                ctx.set_field("locked", true)?;
            }
            Ok(Value::Void)
        })?
        .method("public void add()", |ctx: &mut CallContext<'_>| {
            let count: i32 = ctx.field_as("furniture")?;
            ctx.set_field("furniture", count + 1)?;
            Ok(Value::Void)
        })?
        .method("public int countFurniture()", |ctx: &mut CallContext<'_>| {
            let locked: bool = ctx.field_as("locked")?;
            if locked {
                return Err(TargetError::new("UnsupportedOperationException", "house is locked"));
            }
            ctx.field("furniture").map_err(Into::into)
        })?
        .build()?;

    registry.register_interface(
        CapabilityInterface::new("Picklocked").with_operation(op("open")),
    )?;
    registry.register_interface(
        CapabilityInterface::new("PicklockedKey")
            .with_operation(op("getHouseKey").returns(DataType::object("Key"))),
    )?;
    registry.register_interface(
        CapabilityInterface::new("PicklockedLock")
            .with_operation(op("setHouseKey").param(DataType::object("Key"))),
    )?;
    Ok(())
}

// ============================================================================
// Safe
// ============================================================================

pub fn register_safe(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry
        .register_type("Safe")
        .field("private bool locked")?
        .field_init("private String combination", "0000")?
        .field("private int items")?
        .method("public void newCombination(String, String)", |ctx: &mut CallContext<'_>| {
            let old: String = ctx.arg(0)?;
            let current: String = ctx.field_as("combination")?;
            if old == current {
                ctx.set_field("combination", ctx.arg_value(1)?.clone())?;
            }
            Ok(Value::Void)
        })?
        .method("public void put()", |ctx: &mut CallContext<'_>| {
            let items: i32 = ctx.field_as("items")?;
            ctx.set_field("items", items + 1)?;
            Ok(Value::Void)
        })?
        .method("public void lock()", |ctx: &mut CallContext<'_>| {
            ctx.set_field("locked", true)?;
            Ok(Value::Void)
        })?
        .method("public int open(String)", |ctx: &mut CallContext<'_>| {
            let combination: String = ctx.arg(0)?;
            let current: String = ctx.field_as("combination")?;
            if combination != current {
                return Err(TargetError::new("IllegalArgumentException", "wrong combination"));
            }
            ctx.set_field("locked", false)?;
            ctx.field("items").map_err(Into::into)
        })?
        .build()?;

    registry.register_interface(
        CapabilityInterface::new("PicklockedSafe")
            .with_operation(op("isLocked").returns(DataType::bool()))
            .with_operation(op("getItems").returns(DataType::int()))
            .with_operation(op("setItems").param(DataType::int())),
    )?;
    Ok(())
}

// ============================================================================
// PrimeGenerator
// ============================================================================

fn nth_prime(index: usize) -> i32 {
    (2..)
        .filter(|n: &i32| (2..).take_while(|d| d * d <= *n).all(|d| n % d != 0))
        .nth(index)
        .unwrap_or_default()
}

pub fn register_prime_generator(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry
        .register_type("PrimeGenerator")
        .field_init("private const int DEFAULT_BUFFER_SIZE", 4096)?
        .field("private final int bufferSize")?
        .constructor("public PrimeGenerator(int)", |ctx: &mut CallContext<'_>| {
            ctx.set_field("bufferSize", ctx.arg_value(0)?.clone())?;
            Ok(Value::Void)
        })?
        .constructor("public PrimeGenerator()", |ctx: &mut CallContext<'_>| {
            ctx.set_field("bufferSize", 4096)?;
            Ok(Value::Void)
        })?
        .method("public int getPrime(int)", |ctx: &mut CallContext<'_>| {
            let index: i32 = ctx.arg(0)?;
            let index = usize::try_from(index)
                .map_err(|e| TargetError::new("IndexOutOfBoundsException", e.to_string()))?;
            Ok(Value::Int(nth_prime(index)))
        })?
        .build()?;

    let generator = DataType::object("PrimeGenerator");
    registry.register_interface(
        CapabilityInterface::new("PrimeFactory")
            .with_operation(op("create").param(DataType::int()).returns(generator.clone()))
            .with_operation(op("create").returns(generator))
            .with_operation(op("getDEFAULT_BUFFER_SIZE").returns(DataType::int())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("OpenPrimeGenerator")
            .with_operation(op("getBufferSize").returns(DataType::int()))
            .with_operation(op("setBufferSize").param(DataType::int()))
            .with_operation(op("getPrime").param(DataType::int()).returns(DataType::int())),
    )?;
    Ok(())
}

// ============================================================================
// TheOneAndOnly
// ============================================================================

pub fn register_singleton(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry
        .register_type("TheOneAndOnly")
        .field("private static TheOneAndOnly instance")?
        .field("private bool unique")?
        .constructor("private TheOneAndOnly()", |ctx: &mut CallContext<'_>| {
            ctx.set_field("unique", true)?;
            Ok(Value::Void)
        })?
        .method(
            "public static TheOneAndOnly getInstance()",
            |ctx: &mut CallContext<'_>| {
                let current = ctx.static_field("instance");
                if !current.is_null() {
                    return Ok(current);
                }
                let instance: ObjectRef = Arc::new(Object::new(ctx.owner().clone()));
                instance.set_declared(ctx.owner(), "unique", Value::Bool(true));
                ctx.set_static_field("instance", Arc::clone(&instance));
                Ok(Value::Object(instance))
            },
        )?
        .method("public bool isUnique()", |ctx: &mut CallContext<'_>| {
            ctx.field("unique").map_err(Into::into)
        })?
        .build()?;

    let singleton = DataType::object("TheOneAndOnly");
    registry.register_interface(
        CapabilityInterface::new("PicklockedSingleton")
            .with_operation(op("setUnique").param(DataType::bool())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("PicklockedStatic")
            .with_operation(op("getInstance").returns(singleton.clone())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("PicklockedStaticWithConstructor")
            .with_operation(op("create").returns(singleton.clone()))
            .with_operation(op("setInstance").param(singleton)),
    )?;
    Ok(())
}

// ============================================================================
// WithFinal
// ============================================================================

pub fn register_with_final(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry
        .register_type("WithFinal")
        .field_init("private const String CONSTANT", "ABC")?
        .field_init("private final String field", "ABC")?
        // The literal is captured directly, as a compiler folding the
        // constant would.
        .method("public String constant()", |_: &mut CallContext<'_>| {
            Ok(Value::from("ABC"))
        })?
        .method("public String readConstant()", |ctx: &mut CallContext<'_>| {
            Ok(ctx.static_field("CONSTANT"))
        })?
        .build()?;

    registry.register_interface(
        CapabilityInterface::new("UnlockedFinal")
            .with_operation(op("getField").returns(DataType::string()))
            .with_operation(op("setField").param(DataType::string()))
            .with_operation(op("getCONSTANT").returns(DataType::string()))
            .with_operation(op("setCONSTANT").param(DataType::string()))
            .with_operation(op("constant").returns(DataType::string()))
            .with_operation(op("readConstant").returns(DataType::string())),
    )?;
    Ok(())
}

// ============================================================================
// Keys and doors (conversion)
// ============================================================================

fn key_operations(iface: CapabilityInterface) -> CapabilityInterface {
    iface
        .with_operation(op("getName").returns(DataType::string()))
        .with_operation(op("setName").param(DataType::string()))
        .with_operation(op("isMaster").returns(DataType::bool()))
        .with_operation(op("setMaster").param(DataType::bool()))
}

pub fn register_doors(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry
        .register_type("PlainKey")
        .field("private String name")?
        .field("private bool master")?
        .build()?;
    registry
        .register_type("MasterKey")
        .field("private String name")?
        .field("private bool master")?
        .field("private int copies")?
        .build()?;
    registry
        .register_type("NamedKey")
        .field("private String name")?
        .field("private bool master")?
        .constructor("public NamedKey(String)", |ctx: &mut CallContext<'_>| {
            ctx.set_field("name", ctx.arg_value(0)?.clone())?;
            Ok(Value::Void)
        })?
        .build()?;

    registry
        .register_type("Door")
        .field("private PlainKey key")?
        .method("private bool open(PlainKey)", |ctx: &mut CallContext<'_>| {
            let Some(key) = object_arg(ctx, 0)? else {
                return Ok(Value::Bool(false));
            };
            if key.class().simple_name() != "PlainKey" {
                return Err(TargetError::new("ClassCastException", key.class().to_string()));
            }
            let class = key.class().clone();
            let name = key.get_declared(&class, "name").unwrap_or(Value::Null);
            let master = key.get_declared(&class, "master").unwrap_or(Value::Bool(false));
            Ok(Value::Bool(name == Value::from("front") || master == Value::Bool(true)))
        })?
        .method("private PlainKey copyKey()", |ctx: &mut CallContext<'_>| {
            ctx.field("key").map_err(Into::into)
        })?
        .build()?;

    registry
        .register_type("Gate")
        .method("private String open(NamedKey)", |ctx: &mut CallContext<'_>| {
            let Some(key) = object_arg(ctx, 0)? else {
                return Ok(Value::Null);
            };
            let class = key.class().clone();
            Ok(key.get_declared(&class, "name").unwrap_or(Value::Null))
        })?
        .build()?;

    let unlocked_key = DataType::object("UnlockedKey");
    let plain = || ConvertMarker::named("PlainKey");
    registry.register_interface(key_operations(CapabilityInterface::new("UnlockedKey")))?;
    registry.register_interface(
        key_operations(CapabilityInterface::new("UnlockedNamedKey")).with_construct(
            ConstructStrategy::new("unnamed", vec![DataType::string()], || {
                vec![Value::from("unnamed")]
            }),
        ),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedDoor")
            .with_operation(
                op("open")
                    .convert_param(unlocked_key.clone(), plain())
                    .returns(DataType::bool()),
            )
            .with_operation(op("copyKey").returns_converted(unlocked_key.clone(), plain()))
            .with_operation(op("getKey").returns_converted(unlocked_key.clone(), plain()))
            .with_operation(op("setKey").convert_param(unlocked_key, plain())),
    )?;
    registry.register_interface(
        CapabilityInterface::new("UnlockedGate").with_operation(
            op("open")
                .convert_param(
                    DataType::object("UnlockedNamedKey"),
                    ConvertMarker::named("NamedKey"),
                )
                .returns(DataType::string()),
        ),
    )?;
    Ok(())
}

// ============================================================================
// Locks (conversion under class access)
// ============================================================================

pub fn register_locks(registry: &mut TypeRegistry) -> Result<(), RegistrationError> {
    registry
        .register_type("Lock")
        .field("private Object label")?
        .field("private PlainKey key")?
        .field("private static PlainKey master")?
        .constructor("public Lock(Object, PlainKey)", |ctx: &mut CallContext<'_>| {
            ctx.set_field("label", ctx.arg_value(0)?.clone())?;
            ctx.set_field("key", ctx.arg_value(1)?.clone())?;
            Ok(Value::Void)
        })?
        .constructor("public Lock(Object)", |ctx: &mut CallContext<'_>| {
            ctx.set_field("label", ctx.arg_value(0)?.clone())?;
            Ok(Value::Void)
        })?
        .build()?;

    let lock = DataType::object("Lock");
    let unlocked_key = DataType::object("UnlockedKey");
    let plain = || ConvertMarker::named("PlainKey");
    registry.register_interface(
        CapabilityInterface::new("LockFactory")
            .with_operation(
                op("create")
                    .param(DataType::string())
                    .convert_param(unlocked_key.clone(), plain())
                    .returns(lock.clone()),
            )
            .with_operation(op("create").param(DataType::string()).returns(lock))
            .with_operation(op("getMaster").returns_converted(unlocked_key.clone(), plain()))
            .with_operation(op("setMaster").convert_param(unlocked_key, plain())),
    )?;
    Ok(())
}

// ============================================================================
// Assembly
// ============================================================================

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    register_locked_object(&mut registry).unwrap();
    register_house(&mut registry).unwrap();
    register_safe(&mut registry).unwrap();
    register_prime_generator(&mut registry).unwrap();
    register_singleton(&mut registry).unwrap();
    register_with_final(&mut registry).unwrap();
    register_doors(&mut registry).unwrap();
    register_locks(&mut registry).unwrap();
    registry
}

pub fn binder() -> Binder {
    Binder::new(Arc::new(registry()))
}

pub fn instance(binder: &Binder, class: &str) -> ObjectRef {
    binder
        .registry()
        .instantiate(&QualifiedName::global(class))
        .unwrap()
}
