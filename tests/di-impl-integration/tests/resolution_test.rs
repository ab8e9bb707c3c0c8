//! 实例解析：参数覆盖、自动装配、动作执行与失败场景

mod common;

use common::{Engine, Leaf, Node, Tagged, Tree, Widget};
use depend_common::{ActionMap, DependencyError, ParamMap, ParamValue};
use di_abstractions::ResolveOptions;
use di_impl::{Manager, ManagerOptions};
use std::sync::Arc;

#[test]
fn test_param_override_wins_over_literal_default() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let widget = manager.get_with("Widget", ParamMap::new().with("size", 42))?;

    assert_eq!(widget.read(|w: &Widget| w.size), Some(42));
    assert_eq!(manager.describe("Widget")?.params()[0].1, ParamValue::from(10));
    Ok(())
}

#[test]
fn test_param_override_wins_over_service_reference() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe("Widget")?.set_shared(false);

    let err = manager
        .get_with("Widget", ParamMap::new().with("engine", 5))
        .unwrap_err();
    assert!(matches!(err, DependencyError::InvalidParameterShape { .. }));

    let widget = manager.get_with("Widget", ParamMap::new().with(0_usize, 1))?;
    assert_eq!(widget.read(|w: &Widget| w.size), Some(1));

    let turbo = manager.get_with(
        "Widget",
        ParamMap::new().with("engine", ParamValue::service("TurboEngine")),
    )?;
    let engine = turbo
        .read(|w: &Widget| w.engine.clone())
        .ok_or_else(|| anyhow::anyhow!("widget 类型不匹配"))?;
    assert_eq!(engine.cloned::<Engine>(), Some(Engine { power: 900 }));
    assert!(engine.ptr_eq(&manager.get("TurboEngine")?));

    let plain = manager.get("Widget")?;
    let engine = plain
        .read(|w: &Widget| w.engine.clone())
        .ok_or_else(|| anyhow::anyhow!("widget 类型不匹配"))?;
    assert_eq!(engine.cloned::<Engine>(), Some(Engine { power: 100 }));
    Ok(())
}

#[test]
fn test_autowiring_builds_dependency() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let widget = manager.get("Widget")?;
    let engine = widget
        .read(|w: &Widget| w.engine.clone())
        .ok_or_else(|| anyhow::anyhow!("widget 类型不匹配"))?;

    assert_eq!(engine.cloned::<Engine>(), Some(Engine { power: 100 }));
    assert!(engine.ptr_eq(&manager.get("Engine")?));
    Ok(())
}

#[test]
fn test_autowiring_subclass_of_type_being_described() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let tree = manager.get("Tree")?;
    let leaf = tree
        .read(|t: &Tree| t.leaf.clone())
        .ok_or_else(|| anyhow::anyhow!("tree 类型不匹配"))?;
    assert!(leaf.is::<Leaf>());
    assert!(leaf.ptr_eq(&manager.get("Leaf")?));
    Ok(())
}

#[test]
fn test_action_runs_after_construction() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe_with(
        "Engine",
        ParamMap::new().with("power", 1),
        ActionMap::new().with("tune", ParamValue::from(250)),
        None,
    )?;

    let engine = manager.get("Engine")?;
    assert_eq!(engine.cloned::<Engine>(), Some(Engine { power: 250 }));
    Ok(())
}

#[test]
fn test_action_with_service_parameter() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    let node = manager.describe("Node")?;
    manager.set_action(&node, "set_next", ParamValue::service("Engine"))?;

    let instance = manager.get("Node")?;
    let next = instance.read(|n: &Node| n.next.clone()).flatten();
    assert!(next.is_some_and(|next| next.is::<Engine>()));
    Ok(())
}

#[test]
fn test_missing_action_method_is_skipped() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe_with(
        "Engine",
        ParamMap::new(),
        ActionMap::new()
            .with("no_such_method", ParamValue::from(1))
            .with("tune", ParamValue::from(5)),
        None,
    )?;

    let engine = manager.get("Engine")?;
    assert_eq!(engine.cloned::<Engine>(), Some(Engine { power: 5 }));
    Ok(())
}

#[test]
fn test_own_action_beats_interface_and_parent() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe_with(
        "Parent",
        ParamMap::new(),
        ActionMap::new().with("init", ParamValue::from("parent")),
        None,
    )?;
    manager.describe_with(
        "Startable",
        ParamMap::new(),
        ActionMap::new().with("init", ParamValue::from("interface")),
        None,
    )?;
    let child = manager.describe_with(
        "Child",
        ParamMap::new(),
        ActionMap::new().with("init", ParamValue::from("child")),
        None,
    )?;

    assert_eq!(child.actions().len(), 1);
    let instance = manager.get("Child")?;
    assert_eq!(
        instance.read(|t: &Tagged| t.tags.clone()),
        Some(vec!["child".to_string()])
    );

    let parent = manager.get("Parent")?;
    assert_eq!(
        parent.read(|t: &Tagged| t.tags.clone()),
        Some(vec!["parent".to_string()])
    );
    Ok(())
}

#[test]
fn test_interface_action_beats_parent() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe_with(
        "Parent",
        ParamMap::new(),
        ActionMap::new().with("init", ParamValue::from("parent")),
        None,
    )?;
    manager.describe_with(
        "Startable",
        ParamMap::new(),
        ActionMap::new().with("init", ParamValue::from("interface")),
        None,
    )?;

    let instance = manager.get("Child")?;
    assert_eq!(
        instance.read(|t: &Tagged| t.tags.clone()),
        Some(vec!["interface".to_string()])
    );
    Ok(())
}

#[test]
fn test_child_inherits_parent_constructor_params() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe("Child")?.set_param("name", "configured");

    let child = manager.get("Child")?;
    assert_eq!(child.read(|t: &Tagged| t.name.clone()), Some("configured".to_string()));
    Ok(())
}

#[test]
fn test_get_unknown_type() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let err = manager.get("NoSuchType").unwrap_err();
    assert!(matches!(err, DependencyError::TypeNotFound { .. }));
    Ok(())
}

#[test]
fn test_get_abstract_type() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let err = manager.get("AbstractBase").unwrap_err();
    assert!(matches!(err, DependencyError::NotInstantiable { .. }));

    let err = manager.get("Shape").unwrap_err();
    assert!(matches!(err, DependencyError::NotInstantiable { .. }));
    Ok(())
}

#[test]
fn test_transient_self_reference_is_reported() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    let node = manager.describe("Node")?;
    node.set_shared(false);
    manager.set_action(&node, "set_next", ParamValue::service("Node"))?;

    let err = manager.get("Node").unwrap_err();
    assert!(matches!(err, DependencyError::CircularDependency { .. }));
    Ok(())
}

#[test]
fn test_shared_self_reference_resolves_to_itself() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    let node = manager.describe("Node")?;
    manager.set_action(&node, "set_next", ParamValue::service("Node"))?;

    let instance = manager.get("Node")?;
    let next = instance
        .read(|n: &Node| n.next.clone())
        .flatten()
        .ok_or_else(|| anyhow::anyhow!("set_next 没有执行"))?;
    assert!(next.ptr_eq(&instance));
    Ok(())
}

#[test]
fn test_resolution_depth_limit() -> anyhow::Result<()> {
    let options = ManagerOptions {
        resolution: ResolveOptions {
            detect_cycles: true,
            max_depth: 1,
        },
    };
    let mut manager = Manager::with_options(Arc::new(common::registry()?), options);

    let err = manager.get("Widget").unwrap_err();
    assert!(matches!(
        err,
        DependencyError::ResolutionDepthExceeded { max_depth: 1, .. }
    ));
    assert!(manager.get("Engine").is_ok());
    Ok(())
}
