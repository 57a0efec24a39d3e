//! Class stub synthesis.
//!
//! Two emission paths exist for a class. Classes deriving directly from the
//! foreign-binding record base (memory-layout classes bound to native
//! structures) get a synthesized stub: header, docstring repr, and method
//! signatures only, since their real source describes a binary layout rather
//! than an API. Every other class is trusted to be documentation-safe
//! already and is copied through as literal source text.

use log::{debug, trace, warn};

use crate::{
    classifier::is_documented_member,
    object_graph::{BaseType, ClassId},
    reflection::ReflectionPort,
    signature::extract_function_stub,
    stub_renderer::{render_class_header, render_function},
};

/// Render the stub text for one class.
pub fn render_class<R: ReflectionPort + ?Sized>(reflect: &R, class: ClassId) -> String {
    if reflect
        .base_types_of(class)
        .iter()
        .any(|base| *base == BaseType::ForeignRecord)
    {
        synthesize_record_class(reflect, class)
    } else {
        verbatim_class(reflect, class)
    }
}

/// Signature-only stub for a foreign-binding record class.
fn synthesize_record_class<R: ReflectionPort + ?Sized>(reflect: &R, class: ClassId) -> String {
    let name = reflect.class_name(class);
    let mut out = render_class_header(name, reflect.doc_of_class(class));

    for (member_name, func) in reflect.methods_of(class) {
        if !is_documented_member(member_name) {
            continue;
        }
        match extract_function_stub(reflect, func) {
            Ok(stub) => out.push_str(&render_function(&stub, "    ")),
            Err(err) => warn!("skipping method {name}.{member_name}: {err}"),
        }
    }

    // The native field layout is read but intentionally not rendered as
    // attribute declarations.
    let fields = reflect.field_layout_of(class);
    if !fields.is_empty() {
        trace!("class {name}: {} layout fields not rendered", fields.len());
    }

    out
}

/// Literal copy-through for an ordinary class. When the backing cannot
/// provide source text, fall back to a synthesized stub rather than dropping
/// the class.
fn verbatim_class<R: ReflectionPort + ?Sized>(reflect: &R, class: ClassId) -> String {
    match reflect.source_text_of(class) {
        Some(source) => {
            let mut out = source.to_owned();
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out
        }
        None => {
            debug!(
                "class {}: no source text available, synthesizing signatures",
                reflect.class_name(class)
            );
            synthesize_record_class(reflect, class)
        }
    }
}
