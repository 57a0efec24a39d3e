//! Emission configuration.
//!
//! Which modules receive stub files, which are aggregators, and which are
//! copied through verbatim is policy, not algorithm; it lives in a small
//! TOML-backed config so the same walker serves any package. The defaults
//! reproduce the conventional layout: the package root and `<root>.locals`
//! act as aggregators, nothing is denylisted, stubs use the `.py` extension
//! and declare reStructuredText docstrings.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Emission policy for one package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root package name; only modules under this prefix are emitted.
    pub root_package: String,

    /// Dotted names of internal/implementation modules that never receive a
    /// sink (e.g. version shims, raw binding modules).
    pub denylist: Vec<String>,

    /// Modules allowed to emit plain-value lines and cross-module aliases.
    /// Empty means the conventional pair: the root package and its
    /// public-constants module `<root>.locals`.
    pub aggregator_modules: Vec<String>,

    /// Modules whose whole source is copied through instead of synthesized.
    pub verbatim_modules: Vec<String>,

    /// Value of the `__docformat__` declaration written to every stub.
    pub docformat: String,

    /// File extension of emitted stubs, without the dot.
    pub stub_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_package: String::new(),
            denylist: Vec::new(),
            aggregator_modules: Vec::new(),
            verbatim_modules: Vec::new(),
            docformat: "restructuredtext".to_owned(),
            stub_extension: "py".to_owned(),
        }
    }
}

impl Config {
    /// Conventional configuration for a package, by root name.
    pub fn for_package(root_package: &str) -> Self {
        Self {
            root_package: root_package.to_owned(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        anyhow::ensure!(
            !config.root_package.is_empty(),
            "config file {} does not set root_package",
            path.display()
        );
        Ok(config)
    }

    /// Whether a dotted module name sits under the recognized root prefix.
    /// Symbols owned by modules outside the prefix are never documented.
    pub fn in_root_prefix(&self, module_name: &str) -> bool {
        module_name == self.root_package
            || (module_name.starts_with(&self.root_package)
                && module_name[self.root_package.len()..].starts_with('.'))
    }

    /// Whether a module may receive a sink: inside the root prefix and not
    /// denylisted. Denylisted modules get no file of their own, but their
    /// symbols may still surface through an aggregator.
    pub fn allows(&self, module_name: &str) -> bool {
        self.in_root_prefix(module_name)
            && !self.denylist.iter().any(|denied| denied == module_name)
    }

    /// Whether a module is one of the designated aggregator modules.
    pub fn is_aggregator(&self, module_name: &str) -> bool {
        if self.aggregator_modules.is_empty() {
            module_name == self.root_package
                || module_name
                    .strip_prefix(self.root_package.as_str())
                    .is_some_and(|rest| rest == ".locals")
        } else {
            self.aggregator_modules.iter().any(|name| name == module_name)
        }
    }

    /// Whether a module's source is copied through verbatim.
    pub fn is_verbatim(&self, module_name: &str) -> bool {
        self.verbatim_modules.iter().any(|name| name == module_name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_allows_requires_root_prefix() {
        let config = Config::for_package("pygame");
        assert!(config.allows("pygame"));
        assert!(config.allows("pygame.surface"));
        assert!(config.allows("pygame.mixer.music"));
        // `pygameext` shares the prefix characters but is a different package
        assert!(!config.allows("pygameext"));
        assert!(!config.allows("numpy"));
        assert!(!config.allows("ctypes"));
    }

    #[test]
    fn test_denylist_blocks_internal_modules() {
        let mut config = Config::for_package("pygame");
        config.denylist = vec!["pygame.base".to_owned(), "pygame.version".to_owned()];
        assert!(!config.allows("pygame.base"));
        assert!(!config.allows("pygame.version"));
        assert!(config.allows("pygame.display"));
        // Denylisted modules stay inside the prefix, so their symbols can
        // still be aliased through an aggregator.
        assert!(config.in_root_prefix("pygame.base"));
    }

    #[test]
    fn test_default_aggregators_are_root_and_locals() {
        let config = Config::for_package("pygame");
        assert!(config.is_aggregator("pygame"));
        assert!(config.is_aggregator("pygame.locals"));
        assert!(!config.is_aggregator("pygame.display"));
    }

    #[test]
    fn test_parse_from_toml() {
        let text = r#"
root_package = "pygame"
denylist = ["pygame.base"]
verbatim_modules = ["pygame.sprite"]
"#;
        let config: Config = toml::from_str(text).expect("valid config");
        assert_eq!(config.root_package, "pygame");
        assert!(config.is_verbatim("pygame.sprite"));
        assert_eq!(config.docformat, "restructuredtext");
        assert_eq!(config.stub_extension, "py");
    }
}
