//! Signature extraction for callables.
//!
//! A callable's parameter list comes from one of two places: an explicit
//! author-supplied override (attached by hand to natively implemented
//! callables whose true parameter shape cannot be introspected), or the
//! introspected formal parameters with their defaults. When neither exists
//! the extraction fails for that symbol; an empty signature must never be
//! emitted silently, since it would corrupt the downstream documentation.

use anyhow::{Result, bail};

use crate::{
    object_graph::FunctionId,
    reflection::{ReflectionPort, Signature},
    stub_renderer::FunctionStub,
};

/// Render the parameter-list text for a callable. The override always wins;
/// entries are joined with bare commas.
pub fn parameter_text(signature: &Signature<'_>, name: &str) -> Result<String> {
    match signature {
        Signature::Override(args) => Ok(args.join(",")),
        Signature::Formal(params) => {
            let rendered: Vec<String> = params
                .iter()
                .map(|param| match &param.default {
                    Some(default) => format!("{}={}", param.name, default),
                    None => param.name.clone(),
                })
                .collect();
            Ok(rendered.join(","))
        }
        Signature::Unknown => bail!("no parameter information for callable '{name}'"),
    }
}

/// Build the full stub spec for a callable: parameter list plus docstring.
pub fn extract_function_stub<R: ReflectionPort + ?Sized>(
    reflect: &R,
    func: FunctionId,
) -> Result<FunctionStub> {
    let name = reflect.function_name(func);
    let params = parameter_text(&reflect.parameters_of(func), name)?;
    Ok(FunctionStub {
        name: name.to_owned(),
        params,
        doc: reflect.doc_of(func).to_owned(),
    })
}
