//! Pure text rendering for stub units.
//!
//! Everything that ends up in a stub file goes through one of the renderers
//! here: function stubs, class headers, value-assignment lines and the
//! per-module header. Rendering takes typed specs and returns strings, with
//! no I/O, so the exact output shape is unit-testable in isolation.

use crate::literal::{PyLiteral, repr_str};

/// Everything needed to render one `def` stub.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionStub {
    pub name: String,
    /// Comma-joined parameter list, already rendered.
    pub params: String,
    /// Docstring; empty string when the callable has none.
    pub doc: String,
}

/// Render a function stub. `indent` is prepended to every line, so the same
/// renderer serves module-level functions (empty indent) and class methods
/// (four spaces). A blank line follows every stub.
pub fn render_function(stub: &FunctionStub, indent: &str) -> String {
    format!(
        "{indent}def {}({}):\n{indent}    '''{}'''\n\n",
        stub.name, stub.params, stub.doc
    )
}

/// Render the header of a synthesized class stub: the `class` line plus the
/// class docstring as a repr literal, the first statement of the body.
pub fn render_class_header(name: &str, doc: &str) -> String {
    format!("class {name}:\n    {}\n", repr_str(doc))
}

/// Render a `name = <repr>` constant line.
pub fn render_value_line(name: &str, value: &PyLiteral) -> String {
    format!("{name} = {value}\n")
}

/// Render the module header every stub file starts with: the module
/// docstring and the documentation-format declaration.
pub fn render_module_header(doc: &str, docformat: &str) -> String {
    format!("'''{doc}'''\n\n__docformat__ = \"{docformat}\"\n")
}
