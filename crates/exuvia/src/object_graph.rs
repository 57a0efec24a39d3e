//! In-memory object graph mirroring a live Python module hierarchy.
//!
//! The graph is the single source of truth for module identity during an
//! emission run. Modules, functions and classes live in arenas addressed by
//! copyable ids; module attribute maps reference arena entries, so the same
//! function object can legitimately appear under several modules (a
//! re-export) while keeping one well-defined owner.
//!
//! The core never creates or destroys graph entries while walking; it only
//! reads them and records visitation externally.

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::literal::PyLiteral;

/// Type alias for FxHasher-based IndexMap
pub type FxIndexMap<K, V> = IndexMap<K, V, std::hash::BuildHasherDefault<FxHasher>>;

/// Unique identifier for a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(u32);

impl ModuleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value of the ModuleId
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Unique identifier for a function object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

/// Unique identifier for a class object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

/// An attribute value discovered on a module or class.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A plain function or other callable
    Function(FunctionId),
    /// A class object
    Class(ClassId),
    /// A module bound as an attribute (`import x` inside the module)
    Module(ModuleId),
    /// Any other value: constants, version tuples, flags
    Plain(PyLiteral),
}

/// One formal parameter of a callable, with its default when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<PyLiteral>,
}

impl Param {
    /// A parameter with no default value.
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            default: None,
        }
    }

    /// A parameter with a default value.
    pub fn with_default(name: &str, default: PyLiteral) -> Self {
        Self {
            name: name.to_owned(),
            default: Some(default),
        }
    }
}

/// A callable captured from the live graph.
///
/// Natively implemented callables often carry no introspectable formal
/// parameters; authors annotate those with an explicit argument list
/// (`args_override`), which always wins over introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionObject {
    pub name: String,
    pub doc: Option<String>,
    /// Introspected formal parameters; `None` when the callable's true
    /// parameter shape could not be recovered.
    pub params: Option<Vec<Param>>,
    /// Author-supplied parameter list, one pre-rendered entry per argument
    /// (e.g. `["a", "b=1"]`). Used verbatim when present.
    pub args_override: Option<Vec<String>>,
    /// Module that defines this callable; `None` when the origin is
    /// ambiguous (builtin-bound values), in which case the walker treats it
    /// as owned by whichever module it was discovered through.
    pub defined_in: Option<ModuleId>,
}

/// A direct base class of a class object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    /// The foreign-binding record base: a memory-layout class bound to a
    /// native structure. Classes deriving from it get a synthesized stub.
    ForeignRecord,
    /// Any ordinary base, by name.
    Named(String),
}

/// A class captured from the live graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassObject {
    pub name: String,
    pub doc: Option<String>,
    pub bases: Vec<BaseType>,
    /// Bound methods visible via attribute lookup, inherited ones included,
    /// in lookup order.
    pub methods: FxIndexMap<String, FunctionId>,
    /// Field-layout metadata of foreign-binding records. Read from the
    /// graph but never rendered into the stub.
    pub fields: Vec<String>,
    /// Literal source text, required for the verbatim copy-through path.
    pub source: Option<String>,
    pub defined_in: Option<ModuleId>,
}

impl ClassObject {
    /// Whether any direct base is the foreign-binding record base.
    pub fn is_foreign_record(&self) -> bool {
        self.bases.contains(&BaseType::ForeignRecord)
    }
}

/// A module captured from the live graph.
#[derive(Debug, Clone)]
pub struct ModuleObject {
    /// Canonical dotted name (e.g. "pygame.surface")
    pub name: String,
    pub doc: Option<String>,
    /// Literal source text, used only for modules configured for verbatim
    /// emission.
    pub source: Option<String>,
    /// Direct attribute bindings in definition order.
    pub attributes: FxIndexMap<String, Value>,
}

/// Arena of live objects plus the name index for module lookup.
#[derive(Debug, Default)]
pub struct ObjectGraph {
    modules: Vec<ModuleObject>,
    functions: Vec<FunctionObject>,
    classes: Vec<ClassObject>,
    name_to_module: FxIndexMap<String, ModuleId>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Panics if the dotted name is already taken; module
    /// names are unique by construction in a live interpreter.
    pub fn add_module(&mut self, module: ModuleObject) -> ModuleId {
        assert!(
            !self.name_to_module.contains_key(&module.name),
            "duplicate module name: {}",
            module.name
        );
        let id = ModuleId(u32::try_from(self.modules.len()).expect("module count exceeds u32"));
        self.name_to_module.insert(module.name.clone(), id);
        self.modules.push(module);
        id
    }

    pub fn add_function(&mut self, function: FunctionObject) -> FunctionId {
        let id =
            FunctionId(u32::try_from(self.functions.len()).expect("function count exceeds u32"));
        self.functions.push(function);
        id
    }

    pub fn add_class(&mut self, class: ClassObject) -> ClassId {
        let id = ClassId(u32::try_from(self.classes.len()).expect("class count exceeds u32"));
        self.classes.push(class);
        id
    }

    /// Bind an attribute on an existing module.
    pub fn set_attribute(&mut self, module: ModuleId, name: &str, value: Value) {
        self.modules[module.0 as usize]
            .attributes
            .insert(name.to_owned(), value);
    }

    pub fn module(&self, id: ModuleId) -> &ModuleObject {
        &self.modules[id.0 as usize]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionObject {
        &self.functions[id.0 as usize]
    }

    pub fn class(&self, id: ClassId) -> &ClassObject {
        &self.classes[id.0 as usize]
    }

    /// Look a module up by its canonical dotted name.
    pub fn module_named(&self, name: &str) -> Option<ModuleId> {
        self.name_to_module.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_module(name: &str) -> ModuleObject {
        ModuleObject {
            name: name.to_owned(),
            doc: None,
            source: None,
            attributes: FxIndexMap::default(),
        }
    }

    #[test]
    fn test_module_lookup_by_name() {
        let mut graph = ObjectGraph::new();
        let root = graph.add_module(bare_module("pkg"));
        let child = graph.add_module(bare_module("pkg.util"));

        assert_eq!(graph.module_named("pkg"), Some(root));
        assert_eq!(graph.module_named("pkg.util"), Some(child));
        assert_eq!(graph.module_named("pkg.missing"), None);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    #[should_panic(expected = "duplicate module name")]
    fn test_duplicate_module_name_rejected() {
        let mut graph = ObjectGraph::new();
        graph.add_module(bare_module("pkg"));
        graph.add_module(bare_module("pkg"));
    }

    #[test]
    fn test_shared_function_identity_across_modules() {
        let mut graph = ObjectGraph::new();
        let origin = graph.add_module(bare_module("pkg.impl"));
        let facade = graph.add_module(bare_module("pkg"));
        let func = graph.add_function(FunctionObject {
            name: "flip".to_owned(),
            doc: Some("Flip the display.".to_owned()),
            params: Some(Vec::new()),
            args_override: None,
            defined_in: Some(origin),
        });

        graph.set_attribute(origin, "flip", Value::Function(func));
        graph.set_attribute(facade, "flip", Value::Function(func));

        let through_origin = &graph.module(origin).attributes["flip"];
        let through_facade = &graph.module(facade).attributes["flip"];
        assert_eq!(through_origin, through_facade);
        assert_eq!(graph.function(func).defined_in, Some(origin));
    }

    #[test]
    fn test_foreign_record_detection() {
        let plain = ClassObject {
            name: "Group".to_owned(),
            doc: None,
            bases: vec![BaseType::Named("object".to_owned())],
            methods: FxIndexMap::default(),
            fields: Vec::new(),
            source: Some("class Group:\n    pass\n".to_owned()),
            defined_in: None,
        };
        assert!(!plain.is_foreign_record());

        let record = ClassObject {
            bases: vec![BaseType::ForeignRecord],
            ..plain
        };
        assert!(record.is_foreign_record());
    }
}
