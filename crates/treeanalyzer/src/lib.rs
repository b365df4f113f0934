//! Execution tree analyzer runtime
//! 
//! This crate wires a `RecordSource` to the core `TreeBuilder` and turns the
//! resulting forest into something a person can read.

mod analyzer;
mod render;
mod source;

pub use analyzer::{AnalyzerConfig, OutputFormat, TreeAnalyzer};
pub use render::{DotRenderer, ForestRenderer, JsonRenderer, TextRenderer};
pub use source::{InMemorySource, JsonSnapshotSource, RecordSource};
