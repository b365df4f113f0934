use std::fmt::Write;
use treecore::{AnalyzerError, EdgeKind, ExecutionNode, Forest, Result, VertexKind};

/// Turns a finished forest into a printable document
pub trait ForestRenderer: Send + Sync {
    fn render(&self, forest: &Forest) -> Result<String>;
}

/// Indented tree, one block per root
///
/// Each execution lists its subscriptions first, then its child executions.
/// Indentation stops growing after `max_indent` levels; deeper lines are
/// tagged with their level instead.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    show_flags: bool,
    max_indent: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_flags: false,
            max_indent: 64,
        }
    }
}

/// A line waiting to be written, with its execution id if it has children
struct PendingLine<'a> {
    prefix: String,
    level: usize,
    last: bool,
    text: String,
    execution: Option<&'a str>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn with_flags(mut self, show_flags: bool) -> Self {
        self.show_flags = show_flags;
        self
    }
    
    pub fn with_max_indent(mut self, max_indent: usize) -> Self {
        self.max_indent = max_indent;
        self
    }
    
    fn execution_line(&self, execution: &ExecutionNode) -> String {
        let mut line = format!("EX {}", execution.id);
        if !execution.process_instance_id.is_empty() {
            let _ = write!(line, " [{}]", execution.process_instance_id);
        }
        if self.show_flags {
            let flags: Vec<&str> = [
                (execution.active, "active"),
                (execution.concurrent, "concurrent"),
                (execution.scope, "scope"),
            ]
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect();
            if !flags.is_empty() {
                let _ = write!(line, " ({})", flags.join(", "));
            }
        }
        line
    }
    
    /// Queue the entries below `id`; `level` is the level of `id` itself
    fn push_entries<'a>(
        &self,
        forest: &'a Forest,
        id: &str,
        prefix: &str,
        level: usize,
        stack: &mut Vec<PendingLine<'a>>,
    ) {
        let subscriptions = forest.subscriptions_of(id);
        let children = forest.children_of(id);
        let total = subscriptions.len() + children.len();
        
        let entries = subscriptions
            .into_iter()
            .map(|s| (format!("ES {} [{}] {}", s.id, s.event_type, s.event_name), None::<&str>))
            .chain(children.into_iter().map(|c| (self.execution_line(c), Some(c.id.as_str()))))
            .enumerate()
            .map(|(position, (text, execution))| PendingLine {
                prefix: prefix.to_string(),
                level: level + 1,
                last: position + 1 == total,
                text,
                execution,
            })
            .collect::<Vec<_>>();
        
        // Reversed so the first entry is popped first
        stack.extend(entries.into_iter().rev());
    }
}

impl ForestRenderer for TextRenderer {
    fn render(&self, forest: &Forest) -> Result<String> {
        let mut out = String::new();
        if forest.is_empty() {
            out.push_str("(no executions)\n");
            return Ok(out);
        }
        
        let mut rendered = 0;
        let mut stack = Vec::new();
        for root in forest.roots() {
            let _ = writeln!(out, "{}", self.execution_line(root));
            rendered += 1;
            self.push_entries(forest, &root.id, "", 1, &mut stack);
            
            while let Some(line) = stack.pop() {
                let (branch, indent) = if line.last { ("└── ", "    ") } else { ("├── ", "│   ") };
                // A line at level L sits under L - 2 indentation units
                let capped = line.level - 2 > self.max_indent;
                let marker = if capped { format!("[level {}] ", line.level) } else { String::new() };
                let _ = writeln!(out, "{}{}{}{}", line.prefix, branch, marker, line.text.trim_end());
                rendered += 1;
                
                if let Some(id) = line.execution {
                    let child_prefix = if line.level - 2 < self.max_indent {
                        format!("{}{}", line.prefix, indent)
                    } else {
                        line.prefix.clone()
                    };
                    self.push_entries(forest, id, &child_prefix, line.level, &mut stack);
                }
            }
        }
        
        if rendered < forest.vertex_count() {
            let unreachable = forest.unreachable_executions();
            let labels: Vec<String> = unreachable
                .iter()
                .map(|e| format!("EX {}", e.id))
                .chain(
                    unreachable
                        .iter()
                        .flat_map(|e| forest.subscriptions_of(&e.id))
                        .map(|s| format!("ES {}", s.id)),
                )
                .collect();
            let _ = writeln!(out, "unreachable: {}", labels.join(", "));
        }
        
        Ok(out)
    }
}

/// Graphviz digraph with parents drawn above their children
#[derive(Debug, Clone, Default)]
pub struct DotRenderer;

impl DotRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dot_id(kind: VertexKind, id: &str) -> String {
    match kind {
        VertexKind::Execution => format!("\"ex:{}\"", escape_dot(id)),
        VertexKind::Subscription => format!("\"es:{}\"", escape_dot(id)),
    }
}

impl ForestRenderer for DotRenderer {
    fn render(&self, forest: &Forest) -> Result<String> {
        let mut out = String::new();
        out.push_str("digraph executions {\n");
        out.push_str("  rankdir=BT;\n");
        out.push_str("  node [fontname=\"Helvetica\", fontsize=10];\n");
        out.push_str("  edge [fontname=\"Helvetica\", fontsize=8, color=\"lightgray\"];\n");
        out.push('\n');
        
        for vertex in forest.vertices() {
            let shape = match vertex.kind() {
                VertexKind::Execution => "box",
                VertexKind::Subscription => "ellipse",
            };
            let _ = writeln!(
                out,
                "  {} [label=\"{}\" shape={}];",
                dot_id(vertex.kind(), vertex.id()),
                escape_dot(&vertex.label()),
                shape
            );
        }
        
        out.push('\n');
        
        for edge in forest.edges() {
            let source_kind = match edge.kind {
                EdgeKind::Child => VertexKind::Execution,
                EdgeKind::Subscription => VertexKind::Subscription,
            };
            let _ = writeln!(
                out,
                "  {} -> {} [label=\"{}\"];",
                dot_id(source_kind, &edge.source),
                dot_id(VertexKind::Execution, &edge.target),
                escape_dot(&edge.label)
            );
        }
        
        out.push_str("}\n");
        Ok(out)
    }
}

/// Pretty printed `ForestView`
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ForestRenderer for JsonRenderer {
    fn render(&self, forest: &Forest) -> Result<String> {
        serde_json::to_string_pretty(&forest.to_view())
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(AnalyzerError::from)
    }
}
