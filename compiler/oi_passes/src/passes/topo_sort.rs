//! TopoSort (§4.4.9): populate `TypeGraph::final_types` via a deterministic
//! post-order DFS. Strong edges block ordering; deferred edges (pointer,
//! reference, children, cycle-breaker target) are enqueued but don't.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use oi_errors::Result;
use oi_graph::{Node, NodeId, TemplateParam};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct TopoSort;

fn strong_and_deferred(graph: &oi_graph::TypeGraph, id: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
    match graph.get(id) {
        Node::Class(c) => {
            let mut strong: Vec<NodeId> = c.members.iter().map(|m| m.type_ref).collect();
            strong.extend(c.template_params.iter().filter_map(|tp| match tp {
                TemplateParam::Type { type_ref, .. } => Some(*type_ref),
                TemplateParam::Value(_) => None,
            }));
            (strong, c.children.to_vec())
        }
        Node::Container(c) => {
            let strong = c
                .template_params
                .iter()
                .filter_map(|tp| match tp {
                    TemplateParam::Type { type_ref, .. } => Some(*type_ref),
                    TemplateParam::Value(_) => None,
                })
                .collect();
            (strong, Vec::new())
        }
        Node::Array(a) => (vec![a.element], Vec::new()),
        Node::Typedef(t) => (vec![t.underlying], Vec::new()),
        Node::Pointer(p) => (Vec::new(), vec![*p]),
        Node::Reference(r) => (Vec::new(), vec![*r]),
        Node::CycleBreaker { target } => (Vec::new(), vec![*target]),
        Node::CaptureKeys { inner, .. } => (vec![*inner], Vec::new()),
        Node::DummyAllocator { inner, .. } => (Vec::new(), vec![*inner]),
        _ => (Vec::new(), Vec::new()),
    }
}

fn visit(
    graph: &oi_graph::TypeGraph,
    id: NodeId,
    visited: &mut FxHashSet<NodeId>,
    output: &mut Vec<NodeId>,
    deferred: &mut VecDeque<NodeId>,
) {
    if !visited.insert(id) {
        return;
    }
    let (strong, deferred_edges) = strong_and_deferred(graph, id);
    for dep in strong {
        visit(graph, dep, visited, output, deferred);
    }
    output.push(id);
    deferred.extend(deferred_edges);
}

impl Pass for TopoSort {
    fn name(&self) -> &'static str {
        "TopoSort"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let mut visited = FxHashSet::default();
        let mut output = Vec::new();
        let mut deferred = VecDeque::new();

        let roots: Vec<NodeId> = if ctx.graph.roots().is_empty() {
            ctx.graph.ids().collect()
        } else {
            ctx.graph.roots().to_vec()
        };
        for root in roots {
            visit(&ctx.graph, root, &mut visited, &mut output, &mut deferred);
        }
        while let Some(id) = deferred.pop_front() {
            visit(&ctx.graph, id, &mut visited, &mut output, &mut deferred);
        }

        for &id in &output {
            tracker.visit(id);
        }
        ctx.graph.final_types = output;
        Ok(())
    }
}
