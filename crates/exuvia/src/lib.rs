//! Exuvia extracts a documentation-safe stub tree from a Python module
//! graph: one synthesized source file per module, containing only
//! signatures, docstrings and literal values, never implementation bodies.
//!
//! The graph walker visits each module once, resolves which module actually
//! owns every discovered symbol (so re-exports are documented at their
//! origin), and routes symbols through the classifier and renderers into a
//! lazily-created sink per module. The walker sees live objects only
//! through the [`reflection::ReflectionPort`] trait; the bundled backing is
//! an in-memory [`object_graph::ObjectGraph`], populated programmatically
//! or from a JSON [`snapshot::Snapshot`] exported by the host process.

pub mod classifier;
pub mod config;
pub mod literal;
pub mod object_graph;
pub mod orchestrator;
pub mod reflection;
pub mod signature;
pub mod sinks;
pub mod snapshot;
pub mod stub_renderer;
pub mod synthesizer;
pub mod walker;

pub use crate::{
    config::Config,
    object_graph::ObjectGraph,
    orchestrator::emit_stub_tree,
    reflection::ReflectionPort,
    snapshot::Snapshot,
};
