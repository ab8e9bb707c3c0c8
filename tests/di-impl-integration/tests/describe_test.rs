//! 描述与接口登记

mod common;

use depend_common::{ActionMap, DependencyError, ParamMap, ParamValue};

#[test]
fn test_describe_returns_cached_descriptor() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let first = manager.describe("Widget")?;
    let second = manager.describe("\\WIDGET ")?;
    assert!(first.ptr_eq(&second));

    let third = manager.describe_with(
        "Widget",
        ParamMap::new().with("size", 3),
        ActionMap::new().with("paint", ParamValue::from("red")),
        None,
    )?;
    assert!(third.ptr_eq(&first));
    assert_eq!(first.params()[0], ("size".to_string(), ParamValue::from(3)));
    assert!(first.action("paint").is_some());
    Ok(())
}

#[test]
fn test_repeated_describe_keeps_earlier_configuration() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    manager.describe_with("Widget", ParamMap::new().with("size", 3), ActionMap::new(), None)?;
    let descriptor = manager.describe_with(
        "Widget",
        ParamMap::new(),
        ActionMap::new().with("paint", ParamValue::from("blue")),
        None,
    )?;

    assert_eq!(descriptor.params()[0].1, ParamValue::from(3));
    assert_eq!(descriptor.own_actions().len(), 1);
    Ok(())
}

#[test]
fn test_describe_builds_parent_and_interfaces() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let child = manager.describe("Child")?;

    let parent = child.parent().expect("父类型描述符");
    assert!(parent.ptr_eq(&manager.describe("Parent")?));
    assert_eq!(child.interfaces().len(), 1);
    assert!(child.interfaces()[0].ptr_eq(&manager.describe("Startable")?));
    assert_eq!(manager.describe_count(), 3);
    Ok(())
}

#[test]
fn test_constructor_dependencies_are_described() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let widget = manager.describe("Widget")?;

    assert_eq!(
        widget.params(),
        vec![
            ("size".to_string(), ParamValue::from(10)),
            ("engine".to_string(), ParamValue::service("Engine")),
        ]
    );
    assert!(manager.descriptor("Engine").is_some());
    Ok(())
}

#[test]
fn test_unknown_type() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let err = manager.describe("NoSuchType").unwrap_err();
    assert!(matches!(err, DependencyError::TypeNotFound { .. }));
    assert_eq!(manager.describe_count(), 0);
    Ok(())
}

#[test]
fn test_implement_aliases_interface() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let circle = manager.implement("Shape", "Circle", ActionMap::new())?;

    assert!(manager.describe("Shape")?.ptr_eq(&circle));
    assert!(manager.describe("Circle")?.ptr_eq(&circle));

    let shape = manager.get("Shape")?;
    assert!(shape.ptr_eq(&manager.get("Circle")?));
    Ok(())
}

#[test]
fn test_implement_rejects_undeclared_interface() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let err = manager.implement("Shape", "Square", ActionMap::new()).unwrap_err();
    match err {
        DependencyError::ContractViolation {
            interface_name,
            class_name,
        } => {
            assert_eq!(interface_name, "Shape");
            assert_eq!(class_name, "Square");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(manager.descriptor("Shape").is_none());
    Ok(())
}

#[test]
fn test_implement_with_actions() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    manager.implement(
        "Shape",
        "Circle",
        ActionMap::new().with("scale", ParamValue::from(3.0)),
    )?;

    let shape = manager.get("Shape")?;
    assert_eq!(shape.cloned::<common::Circle>(), Some(common::Circle { radius: 3.0 }));
    Ok(())
}

#[test]
fn test_standalone_action_descriptor() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let action = manager.action("Widget", "paint", ParamValue::from("green"))?;
    assert_eq!(action.name(), "paint");
    assert_eq!(action.params(), vec![("color".to_string(), ParamValue::from("green"))]);

    let widget = manager.describe("Widget")?;
    widget.insert_action("paint", action);

    let instance = manager.get("Widget")?;
    assert_eq!(
        instance.read(|w: &common::Widget| w.color.clone()).flatten(),
        Some("green".to_string())
    );
    Ok(())
}
