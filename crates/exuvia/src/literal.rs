//! Python literal values and their `repr` rendering.
//!
//! Stub files must show default values and module constants exactly the way
//! the live interpreter would `repr()` them, so the generated source stays
//! faithful to what a user sees in a REPL. This module models the small set
//! of literal shapes that survive into documentation (numbers, strings,
//! booleans, `None`, tuples) and renders them.

use std::fmt;

/// A Python literal value captured from the live object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum PyLiteral {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer constant
    Int(i64),
    /// Floating point constant
    Float(f64),
    /// String constant
    Str(String),
    /// Tuple of literals, e.g. version triples
    Tuple(Vec<PyLiteral>),
}

impl PyLiteral {
    /// Render this literal the way Python's `repr()` would.
    pub fn py_repr(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PyLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyLiteral::None => write!(f, "None"),
            PyLiteral::Bool(true) => write!(f, "True"),
            PyLiteral::Bool(false) => write!(f, "False"),
            PyLiteral::Int(value) => write!(f, "{value}"),
            PyLiteral::Float(value) => write!(f, "{}", repr_float(*value)),
            PyLiteral::Str(value) => write!(f, "{}", repr_str(value)),
            PyLiteral::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                // A one-element tuple keeps its trailing comma
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Python renders whole floats with a trailing `.0` (`repr(1.0) == '1.0'`).
fn repr_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Render a string the way Python's `repr()` does: single quotes preferred,
/// switching to double quotes when the text contains a single quote but no
/// double quote.
pub fn repr_str(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scalar_reprs() {
        assert_eq!(PyLiteral::None.py_repr(), "None");
        assert_eq!(PyLiteral::Bool(true).py_repr(), "True");
        assert_eq!(PyLiteral::Bool(false).py_repr(), "False");
        assert_eq!(PyLiteral::Int(-3).py_repr(), "-3");
        assert_eq!(PyLiteral::Int(255).py_repr(), "255");
    }

    #[test]
    fn test_float_repr_keeps_trailing_zero() {
        assert_eq!(PyLiteral::Float(1.0).py_repr(), "1.0");
        assert_eq!(PyLiteral::Float(0.5).py_repr(), "0.5");
        assert_eq!(PyLiteral::Float(-2.0).py_repr(), "-2.0");
    }

    #[test]
    fn test_str_repr_quoting() {
        assert_eq!(PyLiteral::Str("hello".into()).py_repr(), "'hello'");
        assert_eq!(PyLiteral::Str("it's".into()).py_repr(), "\"it's\"");
        assert_eq!(
            PyLiteral::Str("both ' and \"".into()).py_repr(),
            "'both \\' and \"'"
        );
        assert_eq!(PyLiteral::Str("line\nbreak".into()).py_repr(), "'line\\nbreak'");
    }

    #[test]
    fn test_tuple_repr() {
        let version = PyLiteral::Tuple(vec![
            PyLiteral::Int(1),
            PyLiteral::Int(9),
            PyLiteral::Int(2),
        ]);
        assert_eq!(version.py_repr(), "(1, 9, 2)");
        assert_eq!(PyLiteral::Tuple(vec![PyLiteral::Int(1)]).py_repr(), "(1,)");
        assert_eq!(PyLiteral::Tuple(Vec::new()).py_repr(), "()");
    }
}
