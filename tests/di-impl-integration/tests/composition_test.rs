//! 通过构建器和配置文件组装容器

mod common;

use common::{Circle, Engine, Widget};
use depend_common::{DependencyResult, InfrastructureError, Lifetime};
use depend_composition::{ManagerBuilder, ServiceSettings};
use di_impl::Manager;
use std::io::Write;

fn settings_file(content: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_services_from_settings_file() -> anyhow::Result<()> {
    let file = settings_file(
        r#"{
            "resolution": { "max_depth": 32 },
            "services": [
                { "name": "Engine", "params": { "power": 300 } },
                {
                    "name": "Widget",
                    "params": { "size": 4, "engine": { "$service": "Engine" } },
                    "actions": { "paint": "yellow" },
                    "shared": false
                },
                {
                    "name": "Shape",
                    "implementation": "Circle",
                    "actions": { "scale": [2.0] }
                }
            ]
        }"#,
    )?;

    let mut manager = ManagerBuilder::new(common::registry()?)
        .with_settings_file(file.path())?
        .build()?;

    let widget = manager.get("Widget")?;
    assert_eq!(widget.read(|w: &Widget| (w.size, w.color.clone())), Some((4, Some("yellow".to_string()))));
    let engine = widget
        .read(|w: &Widget| w.engine.clone())
        .ok_or_else(|| anyhow::anyhow!("widget 类型不匹配"))?;
    assert_eq!(engine.cloned::<Engine>(), Some(Engine { power: 300 }));
    assert!(!widget.ptr_eq(&manager.get("Widget")?));

    let shape = manager.get("Shape")?;
    assert_eq!(shape.cloned::<Circle>(), Some(Circle { radius: 2.0 }));
    Ok(())
}

#[test]
fn test_modules_run_before_services() -> anyhow::Result<()> {
    let module = |manager: &mut Manager| -> DependencyResult<()> {
        manager.describe("Engine")?.set_lifetime(Lifetime::Cloneable);
        Ok(())
    };

    let mut service = ServiceSettings::new("Engine");
    service.shared = Some(true);

    let manager = ManagerBuilder::new(common::registry()?)
        .with_module(module)
        .with_service(service)
        .build()?;

    let descriptor = manager
        .descriptor("Engine")
        .ok_or_else(|| anyhow::anyhow!("Engine 未描述"))?;
    assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
    assert!(descriptor.is_cloneable());
    Ok(())
}

#[test]
fn test_contract_violation_in_settings() -> anyhow::Result<()> {
    let mut service = ServiceSettings::new("Shape");
    service.implementation = Some("Square".to_string());

    let err = ManagerBuilder::new(common::registry()?)
        .with_service(service)
        .build()
        .unwrap_err();

    assert!(matches!(err, InfrastructureError::DependencyError { .. }));
    Ok(())
}
