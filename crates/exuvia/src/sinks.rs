//! Output sink management.
//!
//! One writable stream per emitted module, keyed by dotted name and created
//! lazily on first request. A name outside the recognized prefix, or on the
//! denylist, is memoized as a permanent `None` so callers never retry. Sink
//! creation makes parent directories as needed and writes the module header
//! before handing the stream out, so every stub file starts with its
//! docstring and a `__docformat__` declaration.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;

use crate::{config::Config, object_graph::FxIndexMap, stub_renderer::render_module_header};

/// Maps dotted module names to open stub-file streams for one emission run.
#[derive(Debug)]
pub struct SinkManager<'a> {
    base_dir: PathBuf,
    config: &'a Config,
    sinks: FxIndexMap<String, Option<BufWriter<File>>>,
}

impl<'a> SinkManager<'a> {
    pub fn new(base_dir: &Path, config: &'a Config) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            config,
            sinks: FxIndexMap::default(),
        }
    }

    /// The on-disk path for a module's stub: dots become path separators,
    /// and the root package maps to its package initializer file.
    fn stub_path(&self, module_name: &str) -> PathBuf {
        let ext = &self.config.stub_extension;
        let relative = if module_name == self.config.root_package {
            format!("{module_name}/__init__.{ext}")
        } else {
            format!("{}.{ext}", module_name.replace('.', "/"))
        };
        self.base_dir.join(relative)
    }

    /// Get (or lazily create) the sink for a module. Returns `None` for
    /// names the config rejects; the refusal is cached for the whole run.
    pub fn sink_for(
        &mut self,
        module_name: &str,
        doc: Option<&str>,
    ) -> Result<Option<&mut BufWriter<File>>> {
        if !self.sinks.contains_key(module_name) {
            let sink = if self.config.allows(module_name) {
                Some(self.open_sink(module_name, doc)?)
            } else {
                debug!("no sink for {module_name}: outside prefix or denylisted");
                None
            };
            self.sinks.insert(module_name.to_owned(), sink);
        }
        Ok(self
            .sinks
            .get_mut(module_name)
            .expect("sink entry just inserted")
            .as_mut())
    }

    fn open_sink(&self, module_name: &str, doc: Option<&str>) -> Result<BufWriter<File>> {
        let path = self.stub_path(module_name);
        if let Some(parent) = path.parent() {
            // Idempotent; already-existing directories are fine.
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("failed to create stub file {}", path.display()))?;
        let mut sink = BufWriter::new(file);
        sink.write_all(render_module_header(doc.unwrap_or(""), &self.config.docformat).as_bytes())
            .with_context(|| format!("failed to write header for {module_name}"))?;
        debug!("opened stub file {} for {module_name}", path.display());
        Ok(sink)
    }

    /// Dotted names of modules that actually received a stub file.
    pub fn emitted_modules(&self) -> impl Iterator<Item = &str> {
        self.sinks
            .iter()
            .filter(|(_, sink)| sink.is_some())
            .map(|(name, _)| name.as_str())
    }

    /// Flush every open sink. Called once at the end of a run.
    pub fn flush(&mut self) -> Result<()> {
        for (name, sink) in &mut self.sinks {
            if let Some(sink) = sink {
                sink.flush()
                    .with_context(|| format!("failed to flush stub file for {name}"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_stub_path_mapping() {
        let config = Config::for_package("pygame");
        let manager = SinkManager::new(Path::new("/out"), &config);
        assert_eq!(
            manager.stub_path("pygame"),
            Path::new("/out/pygame/__init__.py")
        );
        assert_eq!(
            manager.stub_path("pygame.mixer.music"),
            Path::new("/out/pygame/mixer/music.py")
        );
    }

    #[test]
    fn test_rejected_names_are_memoized_as_none() {
        let config = Config::for_package("pygame");
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = SinkManager::new(dir.path(), &config);

        assert!(manager.sink_for("ctypes", None).expect("no error").is_none());
        assert!(manager.sink_for("ctypes", None).expect("no error").is_none());
        assert_eq!(manager.emitted_modules().count(), 0);
    }

    #[test]
    fn test_sink_created_once_with_header() {
        let config = Config::for_package("pygame");
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = SinkManager::new(dir.path(), &config);

        {
            let sink = manager
                .sink_for("pygame.font", Some("Font rendering."))
                .expect("no error")
                .expect("sink granted");
            sink.write_all(b"def SysFont(name,size):\n    ''''''\n\n")
                .expect("write");
        }
        // A second request returns the same memoized stream.
        manager
            .sink_for("pygame.font", Some("Font rendering."))
            .expect("no error")
            .expect("sink granted");
        manager.flush().expect("flush");

        let text =
            std::fs::read_to_string(dir.path().join("pygame/font.py")).expect("stub exists");
        assert_eq!(
            text,
            "'''Font rendering.'''\n\n__docformat__ = \"restructuredtext\"\ndef \
             SysFont(name,size):\n    ''''''\n\n"
        );
        assert_eq!(manager.emitted_modules().collect::<Vec<_>>(), vec!["pygame.font"]);
    }
}
