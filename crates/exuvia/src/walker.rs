//! Depth-first walk over the module graph.
//!
//! The walker drives every other component: it visits each module at most
//! once, resolves which module actually owns each discovered symbol, and
//! routes locally-owned symbols through the classifier and renderers into
//! that module's sink. Re-exported symbols are documented at their origin;
//! only the aggregator modules re-emit them.
//!
//! The visited set is the sole guard against unbounded recursion on a
//! cyclic re-export graph: a module is marked visited before its attributes
//! are enumerated, so mutually-referential modules terminate.

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use log::warn;
use rustc_hash::FxHashSet;

use crate::{
    classifier::{Disposition, classify},
    config::Config,
    object_graph::{ModuleId, Value},
    reflection::ReflectionPort,
    signature::extract_function_stub,
    sinks::SinkManager,
    stub_renderer::{render_function, render_value_line},
    synthesizer::render_class,
};

/// Mutable state of one emission run: the visited set and the sink cache.
/// Owned by the single walking thread; a fresh session per run keeps the
/// walker re-entrant.
#[derive(Debug)]
pub struct EmissionSession<'a> {
    visited: FxHashSet<ModuleId>,
    pub sinks: SinkManager<'a>,
}

impl<'a> EmissionSession<'a> {
    pub fn new(base_dir: &Path, config: &'a Config) -> Self {
        Self {
            visited: FxHashSet::default(),
            sinks: SinkManager::new(base_dir, config),
        }
    }
}

/// The traversal orchestrator. Stateless itself; all run state lives in the
/// [`EmissionSession`] threaded through the walk.
#[derive(Debug)]
pub struct GraphWalker<'a, R: ReflectionPort + ?Sized> {
    reflect: &'a R,
    config: &'a Config,
}

impl<'a, R: ReflectionPort + ?Sized> GraphWalker<'a, R> {
    pub fn new(reflect: &'a R, config: &'a Config) -> Self {
        Self { reflect, config }
    }

    /// Walk one module and everything reachable from it through symbol
    /// ownership. Safe to call on an already-visited module (no-op).
    pub fn walk(&self, session: &mut EmissionSession<'_>, module: ModuleId) -> Result<()> {
        if !session.visited.insert(module) {
            return Ok(());
        }

        let module_name = self.reflect.name_of(module).to_owned();
        let module_doc = self.reflect.doc_of_module(module).map(str::to_owned);
        let doc = module_doc.as_deref();

        // Acquire the sink up front: a module whose attributes yield nothing
        // emittable still gets its header-only stub file. A refused sink
        // does not stop the walk; children may still need their own sinks.
        session.sinks.sink_for(&module_name, doc)?;

        // Verbatim modules bypass synthesis entirely: header, then the
        // module's literal source, and none of its children are enumerated.
        if self.config.is_verbatim(&module_name) {
            self.emit_verbatim_module(session, module, &module_name, doc)?;
            return Ok(());
        }

        let in_aggregator = self.config.is_aggregator(&module_name);

        let attributes: Vec<(String, Value)> = self
            .reflect
            .list_public_attributes(module)
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value.clone()))
            .collect();

        for (attr_name, value) in attributes {
            // Ambiguous origin degrades to local ownership.
            let owner = self.reflect.owner_of(&value).unwrap_or(module);

            if owner != module {
                // Document the symbol at its true origin first.
                if !session.visited.contains(&owner) {
                    self.walk(session, owner)?;
                }
                // Outside the aggregators a re-export is never re-emitted.
                if !in_aggregator {
                    continue;
                }
            }

            // Symbols owned outside the recognized prefix are not ours to
            // document.
            if !self.config.in_root_prefix(self.reflect.name_of(owner)) {
                continue;
            }

            match classify(&attr_name, &value, in_aggregator) {
                Disposition::Function(func) => match extract_function_stub(self.reflect, func) {
                    Ok(stub) => {
                        self.write_unit(session, &module_name, doc, &render_function(&stub, ""))?;
                    }
                    Err(err) => warn!("skipping {module_name}.{attr_name}: {err}"),
                },
                Disposition::Class(class) => {
                    let text = render_class(self.reflect, class);
                    self.write_unit(session, &module_name, doc, &text)?;
                }
                // Module-valued attributes were already handled through
                // ownership resolution above.
                Disposition::SubModule(_) | Disposition::Skip => {}
                Disposition::ValueLine(literal) => {
                    self.write_unit(
                        session,
                        &module_name,
                        doc,
                        &render_value_line(&attr_name, &literal),
                    )?;
                }
            }
        }

        Ok(())
    }

    fn emit_verbatim_module(
        &self,
        session: &mut EmissionSession<'_>,
        module: ModuleId,
        module_name: &str,
        doc: Option<&str>,
    ) -> Result<()> {
        let Some(source) = self.reflect.source_text_of_module(module) else {
            warn!("verbatim module {module_name} has no source text; emitting header only");
            return Ok(());
        };
        self.write_unit(session, module_name, doc, source)
    }

    /// Append one rendered stub unit to a module's sink, if it has one.
    fn write_unit(
        &self,
        session: &mut EmissionSession<'_>,
        module_name: &str,
        doc: Option<&str>,
        text: &str,
    ) -> Result<()> {
        if let Some(sink) = session.sinks.sink_for(module_name, doc)? {
            sink.write_all(text.as_bytes())
                .with_context(|| format!("failed to write stub for {module_name}"))?;
        }
        Ok(())
    }
}
