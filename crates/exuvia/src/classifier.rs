//! Symbol classification and publicity filtering.
//!
//! Given an attribute discovered on a module, decide what (if anything) the
//! stub for that module should contain for it. The rules are positional:
//! private names first, then callables, classes, sub-modules, and finally
//! plain values, which only the aggregator modules may emit.

use crate::{
    literal::PyLiteral,
    object_graph::{ClassId, FunctionId, ModuleId, Value},
};

/// Double-underscore method names the stub tree documents anyway. Everything
/// else underscore-prefixed is filtered out of class stubs.
pub const DOCUMENTED_SPECIALS: [&str; 2] = ["__getattr__", "__setattr__"];

/// What the walker should do with one `(name, value)` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Emit a function stub.
    Function(FunctionId),
    /// Emit a class stub (synthesized or verbatim).
    Class(ClassId),
    /// A module-valued attribute: never emitted as a symbol, only walked
    /// through ownership resolution.
    SubModule(ModuleId),
    /// Emit a `name = repr(value)` line (aggregator modules only).
    ValueLine(PyLiteral),
    /// Nothing to emit.
    Skip,
}

/// Module-level publicity: any underscore prefix makes a name private.
pub fn is_public_name(name: &str) -> bool {
    !name.starts_with('_')
}

/// Member filter for class stub bodies: public names pass, and so do the two
/// documented special methods. Applies only inside class stub generation,
/// never at module top level.
pub fn is_documented_member(name: &str) -> bool {
    is_public_name(name) || DOCUMENTED_SPECIALS.contains(&name)
}

/// Classify one module attribute.
///
/// `in_aggregator` is true when the module being walked is one of the
/// designated aggregator modules (package root, public-constants module),
/// the only place plain values become assignment lines.
pub fn classify(name: &str, value: &Value, in_aggregator: bool) -> Disposition {
    if !is_public_name(name) {
        return Disposition::Skip;
    }
    match value {
        Value::Function(func) => Disposition::Function(*func),
        Value::Class(class) => Disposition::Class(*class),
        Value::Module(module) => Disposition::SubModule(*module),
        Value::Plain(literal) => {
            if in_aggregator {
                Disposition::ValueLine(literal.clone())
            } else {
                Disposition::Skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_private_names_are_skipped() {
        let value = Value::Plain(PyLiteral::Int(1));
        assert_eq!(classify("_internal", &value, true), Disposition::Skip);
        assert_eq!(classify("__all__", &value, true), Disposition::Skip);
    }

    #[test]
    fn test_plain_values_only_in_aggregators() {
        let value = Value::Plain(PyLiteral::Int(8));
        assert_eq!(
            classify("K_RETURN", &value, true),
            Disposition::ValueLine(PyLiteral::Int(8))
        );
        assert_eq!(classify("K_RETURN", &value, false), Disposition::Skip);
    }

    #[test]
    fn test_member_filter_keeps_documented_specials() {
        assert!(is_documented_member("update"));
        assert!(is_documented_member("__getattr__"));
        assert!(is_documented_member("__setattr__"));
        assert!(!is_documented_member("_refresh"));
        assert!(!is_documented_member("__init__"));
        assert!(!is_documented_member("__repr__"));
    }
}
