//! 集成测试共用的类型定义
#![allow(dead_code)]

use depend_common::{DependencyResult, ParameterInfo};
use di_abstractions::Instance;
use di_impl::{Manager, TypeDefinition, TypeRegistry};
use serde_json::json;

/// 引擎
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub power: u32,
}

/// 部件，构造函数依赖引擎
#[derive(Debug)]
pub struct Widget {
    pub size: u32,
    pub engine: Instance,
    pub color: Option<String>,
}

/// 父类型与子类型共用的对象
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub name: String,
    pub tags: Vec<String>,
}

/// 链表节点
#[derive(Debug)]
pub struct Node {
    pub next: Option<Instance>,
}

/// 树，构造函数依赖自己的子类型
#[derive(Debug)]
pub struct Tree {
    pub leaf: Instance,
}

/// 叶子，继承自树
#[derive(Debug)]
pub struct Leaf;

/// 圆形
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

/// 测试用类型注册表
pub fn registry() -> DependencyResult<TypeRegistry> {
    TypeRegistry::new()
        .with(
            TypeDefinition::class("Engine")
                .constructor(
                    vec![ParameterInfo::new("power").with_default(json!(100))],
                    |args| Ok(Engine { power: args.literal(0)? }),
                )
                .method("tune", vec![ParameterInfo::new("power")], |e: &mut Engine, args| {
                    e.power = args.literal(0)?;
                    Ok(())
                })
                .cloneable::<Engine>(),
        )?
        .with(
            TypeDefinition::class("TurboEngine")
                .extends("Engine")
                .factory(|_| Ok(Engine { power: 900 })),
        )?
        .with(
            TypeDefinition::class("Widget")
                .constructor(
                    vec![
                        ParameterInfo::new("size").with_default(json!(10)),
                        ParameterInfo::new("engine").typed("Engine"),
                    ],
                    |args| {
                        Ok(Widget {
                            size: args.literal(0)?,
                            engine: args.instance(1)?,
                            color: None,
                        })
                    },
                )
                .method("paint", vec![ParameterInfo::new("color")], |w: &mut Widget, args| {
                    w.color = Some(args.literal(0)?);
                    Ok(())
                }),
        )?
        .with(
            TypeDefinition::interface("Startable")
                .declare_method("init", vec![ParameterInfo::new("tag")]),
        )?
        .with(
            TypeDefinition::class("Parent")
                .constructor(
                    vec![ParameterInfo::new("name").with_default(json!("parent"))],
                    |args| {
                        Ok(Tagged {
                            name: args.literal(0)?,
                            tags: Vec::new(),
                        })
                    },
                )
                .method("init", vec![ParameterInfo::new("tag")], |t: &mut Tagged, args| {
                    t.tags.push(args.literal(0)?);
                    Ok(())
                })
                .cloneable::<Tagged>(),
        )?
        .with(
            TypeDefinition::class("Child")
                .extends("Parent")
                .implements("Startable")
                .factory(|args| {
                    Ok(Tagged {
                        name: args.literal_or(0, "child".to_string())?,
                        tags: Vec::new(),
                    })
                }),
        )?
        .with(
            TypeDefinition::interface("Shape")
                .declare_method("scale", vec![ParameterInfo::new("factor")]),
        )?
        .with(
            TypeDefinition::class("Circle")
                .implements("Shape")
                .constructor(
                    vec![ParameterInfo::new("radius").with_default(json!(1.0))],
                    |args| Ok(Circle { radius: args.literal(0)? }),
                )
                .method("scale", vec![ParameterInfo::new("factor")], |c: &mut Circle, args| {
                    c.radius *= args.literal::<f64>(0)?;
                    Ok(())
                }),
        )?
        .with(TypeDefinition::class("Square").factory(|_| Ok(Circle { radius: 0.0 })))?
        .with(TypeDefinition::abstract_class("AbstractBase"))?
        .with(
            TypeDefinition::class("Tree").constructor(
                vec![ParameterInfo::new("leaf").typed("Leaf")],
                |args| Ok(Tree { leaf: args.instance(0)? }),
            ),
        )?
        .with(
            TypeDefinition::class("Leaf")
                .extends("Tree")
                .constructor(vec![], |_| Ok(Leaf)),
        )?
        .with(
            TypeDefinition::class("Node")
                .factory(|_| Ok(Node { next: None }))
                .method(
                    "set_next",
                    vec![ParameterInfo::new("next").typed("Node")],
                    |n: &mut Node, args| {
                        n.next = args.optional_instance(0)?;
                        Ok(())
                    },
                ),
        )
}

/// 使用测试注册表创建管理器
pub fn manager() -> DependencyResult<Manager> {
    Ok(Manager::new(registry()?))
}
