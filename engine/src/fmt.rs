//! Rendering a state graph to Graphviz DOT text for offline inspection.
//! Diagnostic only; nothing downstream depends on this format.

use std::fmt::Write;

use itertools::Itertools;

use crate::graph::StateGraph;

/// Serializes the graph as a DOT digraph. The goal node is double-circled,
/// unreachable nodes are drawn dashed, and every edge carries its action
/// instantiation and outcome-branch index.
pub fn to_dot(graph: &StateGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph states {{");
    let _ = writeln!(out, "  rankdir=LR;");
    for (id, state) in graph.nodes() {
        let n: usize = id.into();
        let mut attrs = format!("label=\"{}\"", escape(&state.to_string()));
        if id == graph.goal() {
            attrs.push_str(", shape=doublecircle");
        } else if !graph.is_reachable(id) {
            attrs.push_str(", style=dashed");
        }
        let _ = writeln!(out, "  s{n} [{attrs}];");
    }
    for t in graph.transitions() {
        let src: usize = t.source.into();
        let dst: usize = t.target.into();
        let label = format!("{}({})#{}", t.action, t.args.iter().format(" "), t.branch);
        let _ = writeln!(out, "  s{src} -> s{dst} [label=\"{}\"];", escape(&label));
    }
    let _ = writeln!(out, "}}");
    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
