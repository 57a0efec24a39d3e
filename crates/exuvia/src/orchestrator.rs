//! Top-level driver: one call takes a reflection backing, a config and an
//! output directory, and produces the stub tree.

use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use log::info;

use crate::{
    config::Config,
    reflection::ReflectionPort,
    walker::{EmissionSession, GraphWalker},
};

/// Emit the full stub tree for the configured root package.
///
/// Creates `<base_dir>/<root_package>/` (already existing is fine), walks
/// the graph from the root module, flushes every sink, and returns the
/// dotted names of the modules that received stub files. Only output-tree
/// I/O failures abort the run; per-symbol extraction failures are logged
/// and skipped.
pub fn emit_stub_tree<R: ReflectionPort + ?Sized>(
    reflect: &R,
    config: &Config,
    base_dir: &Path,
) -> Result<Vec<String>> {
    ensure!(
        !config.root_package.is_empty(),
        "no root package configured"
    );
    let root = reflect.module_named(&config.root_package).ok_or_else(|| {
        anyhow!(
            "root module '{}' not found in the object graph",
            config.root_package
        )
    })?;

    let package_dir = base_dir.join(&config.root_package);
    std::fs::create_dir_all(&package_dir)
        .with_context(|| format!("failed to create output tree {}", package_dir.display()))?;

    let mut session = EmissionSession::new(base_dir, config);
    GraphWalker::new(reflect, config).walk(&mut session, root)?;
    session.sinks.flush()?;

    let emitted: Vec<String> = session.sinks.emitted_modules().map(str::to_owned).collect();
    info!(
        "emitted {} stub files under {}",
        emitted.len(),
        base_dir.display()
    );
    Ok(emitted)
}
