//! JSON snapshot of a live module hierarchy.
//!
//! The stub emitter needs an already-imported module graph; a Rust process
//! has no way to hold one directly, so the host exports a snapshot (one
//! small script walking `dir()`/`inspect` on the live package) and the CLI
//! deserializes it here into an [`ObjectGraph`]. Wire types are kept
//! separate from the core graph types and converted in one pass.

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;

use crate::{
    literal::PyLiteral,
    object_graph::{
        BaseType, ClassObject, FunctionObject, FxIndexMap, ModuleId, ModuleObject, ObjectGraph,
        Param, Value,
    },
};

/// Top-level snapshot document.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    pub modules: Vec<SnapshotModule>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotModule {
    /// Canonical dotted name.
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    /// Literal source text; only needed for verbatim-emitted modules.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub attributes: Vec<SnapshotAttribute>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotAttribute {
    pub name: String,
    #[serde(flatten)]
    pub value: SnapshotValue,
}

/// One attribute value, discriminated by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotValue {
    Function(SnapshotFunction),
    Class(SnapshotClass),
    Module { target: String },
    Value { value: SnapshotLiteral },
}

#[derive(Debug, Deserialize)]
pub struct SnapshotFunction {
    #[serde(default)]
    pub doc: Option<String>,
    /// Introspected formal parameters; absent when not introspectable.
    #[serde(default)]
    pub params: Option<Vec<SnapshotParam>>,
    /// Author-supplied argument list, one entry per argument.
    #[serde(default)]
    pub args_override: Option<Vec<String>>,
    /// Dotted name of the defining module; absent when ambiguous.
    #[serde(default)]
    pub defined_in: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotParam {
    pub name: String,
    #[serde(default)]
    pub default: Option<SnapshotLiteral>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotClass {
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub bases: Vec<SnapshotBase>,
    /// Bound methods visible via attribute lookup, inherited ones included.
    #[serde(default)]
    pub methods: Vec<SnapshotMethod>,
    /// Native field-layout metadata, for foreign-binding records.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub defined_in: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotBase {
    pub name: String,
    /// True when this base is the foreign-binding record base.
    #[serde(default)]
    pub foreign_record: bool,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotMethod {
    pub name: String,
    #[serde(flatten)]
    pub function: SnapshotFunction,
}

/// Literal values as they appear in JSON: `null`, booleans, numbers,
/// strings, and arrays (which stand in for Python tuples).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SnapshotLiteral {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<SnapshotLiteral>),
}

impl From<SnapshotLiteral> for PyLiteral {
    fn from(literal: SnapshotLiteral) -> Self {
        match literal {
            SnapshotLiteral::None => PyLiteral::None,
            SnapshotLiteral::Bool(value) => PyLiteral::Bool(value),
            SnapshotLiteral::Int(value) => PyLiteral::Int(value),
            SnapshotLiteral::Float(value) => PyLiteral::Float(value),
            SnapshotLiteral::Str(value) => PyLiteral::Str(value),
            SnapshotLiteral::Tuple(items) => {
                PyLiteral::Tuple(items.into_iter().map(Into::into).collect())
            }
        }
    }
}

impl Snapshot {
    /// Read and parse a snapshot file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    /// The root package name: the first module without a dot in its name.
    /// Used when no config file names one explicitly.
    pub fn infer_root_package(&self) -> Option<&str> {
        self.modules
            .iter()
            .map(|module| module.name.as_str())
            .find(|name| !name.contains('.'))
    }

    /// Build the live object graph from this snapshot.
    ///
    /// Two passes: register every module first so `defined_in` references
    /// resolve regardless of order, then bind attributes. A `defined_in`
    /// naming a module absent from the snapshot (typically a foreign package
    /// like `ctypes`) gets a bare module entry so ownership checks work; it
    /// will never receive a sink.
    pub fn into_graph(self) -> Result<ObjectGraph> {
        let mut graph = ObjectGraph::new();

        for module in &self.modules {
            if graph.module_named(&module.name).is_some() {
                bail!("snapshot lists module '{}' twice", module.name);
            }
            graph.add_module(ModuleObject {
                name: module.name.clone(),
                doc: module.doc.clone(),
                source: module.source.clone(),
                attributes: FxIndexMap::default(),
            });
        }

        for module in self.modules {
            let module_id = graph
                .module_named(&module.name)
                .expect("module registered in first pass");
            for attribute in module.attributes {
                let value = build_value(&mut graph, &attribute.name, attribute.value)?;
                graph.set_attribute(module_id, &attribute.name, value);
            }
        }

        Ok(graph)
    }
}

fn build_value(graph: &mut ObjectGraph, bound_name: &str, value: SnapshotValue) -> Result<Value> {
    Ok(match value {
        SnapshotValue::Function(function) => {
            let defined_in = resolve_owner(graph, function.defined_in.as_deref());
            let func = graph.add_function(FunctionObject {
                // The bound attribute name doubles as `__name__`.
                name: bound_name.to_owned(),
                doc: function.doc,
                params: function.params.map(|params| {
                    params
                        .into_iter()
                        .map(|param| Param {
                            name: param.name,
                            default: param.default.map(Into::into),
                        })
                        .collect()
                }),
                args_override: function.args_override,
                defined_in,
            });
            Value::Function(func)
        }
        SnapshotValue::Class(class) => {
            let defined_in = resolve_owner(graph, class.defined_in.as_deref());
            let mut methods = FxIndexMap::default();
            for method in class.methods {
                let func = graph.add_function(FunctionObject {
                    name: method.name.clone(),
                    doc: method.function.doc,
                    params: method.function.params.map(|params| {
                        params
                            .into_iter()
                            .map(|param| Param {
                                name: param.name,
                                default: param.default.map(Into::into),
                            })
                            .collect()
                    }),
                    args_override: method.function.args_override,
                    defined_in,
                });
                methods.insert(method.name, func);
            }
            let class_id = graph.add_class(ClassObject {
                name: bound_name.to_owned(),
                doc: class.doc,
                bases: class
                    .bases
                    .into_iter()
                    .map(|base| {
                        if base.foreign_record {
                            BaseType::ForeignRecord
                        } else {
                            BaseType::Named(base.name)
                        }
                    })
                    .collect(),
                methods,
                fields: class.fields,
                source: class.source,
                defined_in,
            });
            Value::Class(class_id)
        }
        SnapshotValue::Module { target } => {
            let target = intern_module(graph, &target);
            Value::Module(target)
        }
        SnapshotValue::Value { value } => Value::Plain(value.into()),
    })
}

fn resolve_owner(graph: &mut ObjectGraph, defined_in: Option<&str>) -> Option<ModuleId> {
    defined_in.map(|name| intern_module(graph, name))
}

/// Look a module up by name, creating a bare entry for names the snapshot
/// does not describe.
fn intern_module(graph: &mut ObjectGraph, name: &str) -> ModuleId {
    if let Some(id) = graph.module_named(name) {
        return id;
    }
    debug!("snapshot references undeclared module '{name}', adding a bare entry");
    graph.add_module(ModuleObject {
        name: name.to_owned(),
        doc: None,
        source: None,
        attributes: FxIndexMap::default(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reflection::ReflectionPort;

    const SNAPSHOT: &str = r#"{
        "modules": [
            {
                "name": "pkg",
                "doc": "top level package",
                "attributes": [
                    {"name": "init", "kind": "function",
                     "doc": "Initialize all modules.",
                     "params": [], "defined_in": "pkg.base"},
                    {"name": "display", "kind": "module", "target": "pkg.display"},
                    {"name": "VERSION", "kind": "value", "value": [1, 9, 2]}
                ]
            },
            {
                "name": "pkg.display",
                "attributes": [
                    {"name": "Info", "kind": "class",
                     "bases": [{"name": "Structure", "foreign_record": true}],
                     "methods": [{"name": "current_w", "params": [{"name": "self"}]}],
                     "fields": ["w", "h"],
                     "defined_in": "pkg.display"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_snapshot_round_trip_into_graph() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).expect("valid snapshot");
        assert_eq!(snapshot.infer_root_package(), Some("pkg"));

        let graph = snapshot.into_graph().expect("graph builds");
        let root = graph.module_named("pkg").expect("root exists");
        assert_eq!(graph.module(root).doc.as_deref(), Some("top level package"));

        // "pkg.base" was only referenced as an owner, never declared; it
        // still materializes so ownership checks resolve.
        let base = graph.module_named("pkg.base").expect("interned owner");
        let init = match &graph.module(root).attributes["init"] {
            Value::Function(func) => *func,
            other => panic!("expected function, got {other:?}"),
        };
        assert_eq!(graph.function(init).defined_in, Some(base));

        let display = graph.module_named("pkg.display").expect("declared module");
        assert_eq!(
            graph.module(root).attributes["display"],
            Value::Module(display)
        );
        assert_eq!(
            graph.module(root).attributes["VERSION"],
            Value::Plain(PyLiteral::Tuple(vec![
                PyLiteral::Int(1),
                PyLiteral::Int(9),
                PyLiteral::Int(2),
            ]))
        );
    }

    #[test]
    fn test_literal_null_and_scalars() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"modules": [{"name": "pkg", "attributes": [
                {"name": "A", "kind": "value", "value": null},
                {"name": "B", "kind": "value", "value": true},
                {"name": "C", "kind": "value", "value": 2.5},
                {"name": "D", "kind": "value", "value": "text"}
            ]}]}"#,
        )
        .expect("valid snapshot");
        let graph = snapshot.into_graph().expect("graph builds");
        let root = graph.module_named("pkg").expect("root");
        let attrs = &graph.module(root).attributes;
        assert_eq!(attrs["A"], Value::Plain(PyLiteral::None));
        assert_eq!(attrs["B"], Value::Plain(PyLiteral::Bool(true)));
        assert_eq!(attrs["C"], Value::Plain(PyLiteral::Float(2.5)));
        assert_eq!(attrs["D"], Value::Plain(PyLiteral::Str("text".to_owned())));
    }

    #[test]
    fn test_duplicate_module_is_rejected() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"modules": [{"name": "pkg"}, {"name": "pkg"}]}"#,
        )
        .expect("parses");
        let err = snapshot.into_graph().expect_err("duplicate must fail");
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_foreign_record_base_survives_conversion() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).expect("valid snapshot");
        let graph = snapshot.into_graph().expect("graph builds");
        let display = graph.module_named("pkg.display").expect("module");
        let info = match &graph.module(display).attributes["Info"] {
            Value::Class(class) => *class,
            other => panic!("expected class, got {other:?}"),
        };
        assert!(graph.class(info).is_foreign_record());
        assert_eq!(graph.field_layout_of(info), ["w", "h"]);
    }
}
