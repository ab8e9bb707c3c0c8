//! 生命周期：单例、瞬时、原型复制以及沿继承链取与

mod common;

use common::{Engine, Tagged};
use depend_common::{Lifetime, ParamValue};
use di_abstractions::Instance;

#[test]
fn test_singleton_law() -> anyhow::Result<()> {
    let mut manager = common::manager()?;

    let first = manager.get("Engine")?;
    let second = manager.get("engine")?;

    assert!(first.ptr_eq(&second));
    assert!(manager.has_instance("Engine"));
    Ok(())
}

#[test]
fn test_transient_law() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe("Engine")?.set_shared(false);

    let first = manager.get("Engine")?;
    let second = manager.get("Engine")?;

    assert!(!first.ptr_eq(&second));
    Ok(())
}

#[test]
fn test_clone_law() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager
        .describe("Engine")?
        .set_lifetime(Lifetime::Cloneable);

    let first = manager.get("Engine")?;
    let second = manager.get("Engine")?;

    assert!(!first.ptr_eq(&second));
    assert_eq!(first.cloned::<Engine>(), second.cloned::<Engine>());

    second.write(|e: &mut Engine| e.power = 1);
    assert_eq!(first.cloned::<Engine>(), Some(Engine { power: 100 }));
    assert_eq!(second.cloned::<Engine>(), Some(Engine { power: 1 }));
    Ok(())
}

#[test]
fn test_clone_does_not_rerun_actions() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    let parent = manager.describe("Parent")?;
    parent.set_lifetime(Lifetime::Cloneable);
    manager.set_action(&parent, "init", ParamValue::from("once"))?;

    let first = manager.get("Parent")?;
    let second = manager.get("Parent")?;

    let tags = |instance: &Instance| instance.read(|t: &Tagged| t.tags.clone());
    assert_eq!(tags(&first), Some(vec!["once".to_string()]));
    assert_eq!(tags(&second), Some(vec!["once".to_string()]));
    Ok(())
}

#[test]
fn test_parent_not_shared_makes_child_not_shared() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe("Parent")?.set_shared(false);
    let child = manager.describe("Child")?;

    assert!(!child.is_shared());
    assert!(!manager.get("Child")?.ptr_eq(&manager.get("Child")?));

    child.set_shared(true);
    assert!(!child.is_shared());
    assert!(!manager.get("Child")?.ptr_eq(&manager.get("Child")?));
    Ok(())
}

#[test]
fn test_child_not_shared_leaves_parent_shared() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    manager.describe("Child")?.set_shared(false);

    assert!(manager.describe("Parent")?.is_shared());
    assert!(manager.get("Parent")?.ptr_eq(&manager.get("Parent")?));
    assert!(!manager.get("Child")?.ptr_eq(&manager.get("Child")?));
    Ok(())
}

#[test]
fn test_child_cannot_become_cloneable_alone() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    let child = manager.describe("Child")?;
    child.set_shared(false).set_cloneable(true);

    assert!(!child.is_cloneable());
    assert_eq!(child.lifetime(), Lifetime::Transient);

    manager.describe("Parent")?.set_cloneable(true);
    assert_eq!(child.lifetime(), Lifetime::Cloneable);
    Ok(())
}

#[test]
fn test_prebuilt_instance_is_shared() -> anyhow::Result<()> {
    let mut manager = common::manager()?;
    let prebuilt = Instance::new("Engine", Engine { power: 7 });
    manager.set("Engine", prebuilt.clone())?;

    let widget = manager.get("Widget")?;
    let engine = widget
        .read(|w: &common::Widget| w.engine.clone())
        .ok_or_else(|| anyhow::anyhow!("widget 类型不匹配"))?;
    assert!(engine.ptr_eq(&prebuilt));
    Ok(())
}
