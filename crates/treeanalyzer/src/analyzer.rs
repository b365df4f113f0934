use crate::render::{DotRenderer, ForestRenderer, JsonRenderer, TextRenderer};
use crate::source::RecordSource;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use treecore::{ExecutionRecord, Forest, Result, TreeBuilder};

/// Rendering format for a reconstructed forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Dot,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;
    
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "tree" => Ok(OutputFormat::Text),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected text, dot or json)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Configuration for the analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Only keep executions of this process instance
    pub process_instance: Option<String>,
    pub include_subscriptions: bool,
    pub format: OutputFormat,
    /// Annotate executions with their active/concurrent/scope flags
    pub show_flags: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            process_instance: None,
            include_subscriptions: true,
            format: OutputFormat::Text,
            show_flags: true,
        }
    }
}

impl AnalyzerConfig {
    pub const FORMAT_VAR: &'static str = "EXECTREE_FORMAT";
    pub const PROCESS_INSTANCE_VAR: &'static str = "EXECTREE_PROCESS_INSTANCE";
    pub const SKIP_SUBSCRIPTIONS_VAR: &'static str = "EXECTREE_SKIP_SUBSCRIPTIONS";
    
    /// Defaults overlaid with `EXECTREE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        
        if let Some(raw) = lookup(Self::FORMAT_VAR) {
            match raw.parse() {
                Ok(format) => config.format = format,
                Err(e) => tracing::warn!("Ignoring {}: {}", Self::FORMAT_VAR, e),
            }
        }
        
        if let Some(instance) = lookup(Self::PROCESS_INSTANCE_VAR) {
            if !instance.trim().is_empty() {
                config.process_instance = Some(instance.trim().to_string());
            }
        }
        
        if let Some(raw) = lookup(Self::SKIP_SUBSCRIPTIONS_VAR) {
            config.include_subscriptions =
                !matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        
        config
    }
}

/// Fetches records from a source and reconstructs the execution forest
pub struct TreeAnalyzer {
    source: Arc<dyn RecordSource>,
    builder: TreeBuilder,
    config: AnalyzerConfig,
}

impl TreeAnalyzer {
    /// Create an analyzer with default settings
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self::with_config(source, AnalyzerConfig::default())
    }
    
    pub fn with_config(source: Arc<dyn RecordSource>, config: AnalyzerConfig) -> Self {
        Self {
            source,
            builder: TreeBuilder::new(),
            config,
        }
    }
    
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
    
    /// Fetch all records, apply filters and build the forest
    pub async fn analyze(&self) -> Result<Forest> {
        tracing::info!("Reading records from {}", self.source.describe());
        
        let mut roots = self.source.root_executions().await?;
        let mut children = self.source.child_executions().await?;
        let mut subscriptions = if self.config.include_subscriptions {
            self.source.event_subscriptions().await?
        } else {
            Vec::new()
        };
        
        if let Some(instance) = &self.config.process_instance {
            roots.retain(|r| &r.process_instance_id == instance);
            let kept = descendants_of(&roots, &children);
            children.retain(|c| kept.contains(c.id.as_str()));
            subscriptions.retain(|s| kept.contains(s.execution_id.as_str()));
            tracing::debug!(
                "Filtered records to process instance {} ({} executions kept)",
                instance,
                kept.len()
            );
        }
        
        tracing::info!(
            "Building forest from {} roots, {} children, {} subscriptions",
            roots.len(),
            children.len(),
            subscriptions.len()
        );
        
        let forest = self.builder.build(&roots, &children, &subscriptions).map_err(|e| {
            tracing::error!("Failed to reconstruct execution tree: {}", e);
            e
        })?;
        
        tracing::info!(
            "Reconstructed {} trees ({} vertices, {} edges, depth {})",
            forest.roots().count(),
            forest.vertex_count(),
            forest.edge_count(),
            forest.depth()
        );
        
        Ok(forest)
    }
    
    /// Render a forest in the configured format
    pub fn render(&self, forest: &Forest) -> Result<String> {
        self.renderer().render(forest)
    }
    
    fn renderer(&self) -> Box<dyn ForestRenderer> {
        match self.config.format {
            OutputFormat::Text => Box::new(TextRenderer::new().with_flags(self.config.show_flags)),
            OutputFormat::Dot => Box::new(DotRenderer::new()),
            OutputFormat::Json => Box::new(JsonRenderer::new()),
        }
    }
}

/// Ids of `roots` and every child execution reachable from them
fn descendants_of(roots: &[ExecutionRecord], children: &[ExecutionRecord]) -> HashSet<String> {
    let mut by_parent: HashMap<&str, Vec<&str>> = HashMap::new();
    for child in children {
        if let Some(parent_id) = child.parent_id.as_deref() {
            by_parent.entry(parent_id).or_default().push(child.id.as_str());
        }
    }
    
    let mut kept = HashSet::new();
    let mut stack: Vec<&str> = roots.iter().map(|r| r.id.as_str()).collect();
    while let Some(id) = stack.pop() {
        if kept.insert(id.to_string()) {
            if let Some(ids) = by_parent.get(id) {
                stack.extend(ids.iter().copied());
            }
        }
    }
    kept
}
