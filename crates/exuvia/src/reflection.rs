//! The reflection port: the walker's only window onto live objects.
//!
//! Python introspects live modules with `inspect`; Rust has no equivalent,
//! so every introspection the stub emitter needs is funneled through this
//! trait. The walker, classifier and synthesizer depend on the port alone,
//! which keeps them testable against hand-built graphs and leaves the door
//! open for other backings (a pyo3 bridge, a rustdoc-style JSON dump).

use crate::object_graph::{
    BaseType, ClassId, FunctionId, ModuleId, ObjectGraph, Param, Value,
};

/// Parameter information recoverable for a callable, in priority order.
#[derive(Debug, Clone, Copy)]
pub enum Signature<'a> {
    /// Author-supplied argument list; used verbatim, one entry per argument.
    Override(&'a [String]),
    /// Introspected formal parameters with defaults.
    Formal(&'a [Param]),
    /// Nothing recoverable. Emitting an empty signature would corrupt the
    /// documentation, so callers must treat this as a per-symbol failure.
    Unknown,
}

/// Read-only reflection over a module hierarchy.
pub trait ReflectionPort {
    /// Resolve a canonical dotted name to a module.
    fn module_named(&self, name: &str) -> Option<ModuleId>;

    /// Canonical dotted name of a module.
    fn name_of(&self, module: ModuleId) -> &str;

    fn doc_of_module(&self, module: ModuleId) -> Option<&str>;

    /// Literal module source, when the backing can provide it.
    fn source_text_of_module(&self, module: ModuleId) -> Option<&str>;

    /// Publicly named attributes of a module, sorted by name the way
    /// `dir()` reports them. Underscore-prefixed names are already gone.
    fn list_public_attributes(&self, module: ModuleId) -> Vec<(&str, &Value)>;

    /// The module that actually defines a value, independent of where it was
    /// discovered. `None` means the origin is ambiguous and the caller
    /// should treat the value as locally owned.
    fn owner_of(&self, value: &Value) -> Option<ModuleId>;

    fn function_name(&self, func: FunctionId) -> &str;

    /// Docstring of a callable; the empty string when absent.
    fn doc_of(&self, func: FunctionId) -> &str;

    fn parameters_of(&self, func: FunctionId) -> Signature<'_>;

    fn class_name(&self, class: ClassId) -> &str;

    /// Docstring of a class; the empty string when absent.
    fn doc_of_class(&self, class: ClassId) -> &str;

    /// Direct base classes.
    fn base_types_of(&self, class: ClassId) -> &[BaseType];

    /// Bound methods visible via attribute lookup, inherited ones included,
    /// sorted by name. No publicity filtering here; the class stub path has
    /// its own member filter.
    fn methods_of(&self, class: ClassId) -> Vec<(&str, FunctionId)>;

    /// Field-layout metadata of a foreign-binding record class.
    fn field_layout_of(&self, class: ClassId) -> &[String];

    /// Literal class source, when the backing can provide it.
    fn source_text_of(&self, class: ClassId) -> Option<&str>;
}

impl ReflectionPort for ObjectGraph {
    fn module_named(&self, name: &str) -> Option<ModuleId> {
        self.module_named(name)
    }

    fn name_of(&self, module: ModuleId) -> &str {
        &self.module(module).name
    }

    fn doc_of_module(&self, module: ModuleId) -> Option<&str> {
        self.module(module).doc.as_deref()
    }

    fn source_text_of_module(&self, module: ModuleId) -> Option<&str> {
        self.module(module).source.as_deref()
    }

    fn list_public_attributes(&self, module: ModuleId) -> Vec<(&str, &Value)> {
        let mut attrs: Vec<(&str, &Value)> = self
            .module(module)
            .attributes
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        attrs.sort_by_key(|(name, _)| *name);
        attrs
    }

    fn owner_of(&self, value: &Value) -> Option<ModuleId> {
        match value {
            Value::Function(func) => self.function(*func).defined_in,
            Value::Class(class) => self.class(*class).defined_in,
            // A module attribute is owned by the module it refers to; this
            // is what pulls sub-modules into the walk.
            Value::Module(module) => Some(*module),
            Value::Plain(_) => None,
        }
    }

    fn function_name(&self, func: FunctionId) -> &str {
        &self.function(func).name
    }

    fn doc_of(&self, func: FunctionId) -> &str {
        self.function(func).doc.as_deref().unwrap_or("")
    }

    fn parameters_of(&self, func: FunctionId) -> Signature<'_> {
        let function = self.function(func);
        if let Some(args) = function.args_override.as_deref() {
            Signature::Override(args)
        } else if let Some(params) = function.params.as_deref() {
            Signature::Formal(params)
        } else {
            Signature::Unknown
        }
    }

    fn class_name(&self, class: ClassId) -> &str {
        &self.class(class).name
    }

    fn doc_of_class(&self, class: ClassId) -> &str {
        self.class(class).doc.as_deref().unwrap_or("")
    }

    fn base_types_of(&self, class: ClassId) -> &[BaseType] {
        &self.class(class).bases
    }

    fn methods_of(&self, class: ClassId) -> Vec<(&str, FunctionId)> {
        let mut methods: Vec<(&str, FunctionId)> = self
            .class(class)
            .methods
            .iter()
            .map(|(name, func)| (name.as_str(), *func))
            .collect();
        methods.sort_by_key(|(name, _)| *name);
        methods
    }

    fn field_layout_of(&self, class: ClassId) -> &[String] {
        &self.class(class).fields
    }

    fn source_text_of(&self, class: ClassId) -> Option<&str> {
        self.class(class).source.as_deref()
    }
}
