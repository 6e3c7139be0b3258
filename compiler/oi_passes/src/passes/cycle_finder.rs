//! CycleFinder (§4.4.8): DFS with an on-stack set; closes cycles by
//! rewriting a preferred edge (`Pointer.pointee`, then
//! `Container.template_param`) to a `CycleBreaker` sentinel.

use rustc_hash::FxHashSet;

use oi_errors::{Error, Result};
use oi_graph::{Node, NodeId, TemplateParam};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct CycleFinder;

/// Identifies an outgoing edge well enough to both classify it (breakable or
/// not) and, if breakable, rewrite its target in place.
#[derive(Debug, Clone, Copy)]
enum EdgeRef {
    Member(NodeId, usize),
    ClassTemplateParam(NodeId, usize),
    ContainerTemplateParam(NodeId, usize),
    Pointer(NodeId),
    ArrayElement(NodeId),
    TypedefUnderlying(NodeId),
}

impl EdgeRef {
    fn breakable(self) -> bool {
        matches!(self, EdgeRef::Pointer(_) | EdgeRef::ContainerTemplateParam(..))
    }
}

fn dependency_edges(graph: &oi_graph::TypeGraph, id: NodeId) -> Vec<(EdgeRef, NodeId)> {
    match graph.get(id) {
        Node::Class(c) => {
            let mut edges: Vec<(EdgeRef, NodeId)> = c
                .members
                .iter()
                .enumerate()
                .map(|(i, m)| (EdgeRef::Member(id, i), m.type_ref))
                .collect();
            edges.extend(c.template_params.iter().enumerate().filter_map(|(i, tp)| {
                match tp {
                    TemplateParam::Type { type_ref, .. } => {
                        Some((EdgeRef::ClassTemplateParam(id, i), *type_ref))
                    }
                    TemplateParam::Value(_) => None,
                }
            }));
            edges
        }
        Node::Container(c) => c
            .template_params
            .iter()
            .enumerate()
            .filter_map(|(i, tp)| match tp {
                TemplateParam::Type { type_ref, .. } => {
                    Some((EdgeRef::ContainerTemplateParam(id, i), *type_ref))
                }
                TemplateParam::Value(_) => None,
            })
            .collect(),
        Node::Pointer(p) => vec![(EdgeRef::Pointer(id), *p)],
        Node::Array(a) => vec![(EdgeRef::ArrayElement(id), a.element)],
        Node::Typedef(t) => vec![(EdgeRef::TypedefUnderlying(id), t.underlying)],
        _ => Vec::new(),
    }
}

fn rewrite_edge(graph: &mut oi_graph::TypeGraph, edge: EdgeRef, new_target: NodeId) {
    match edge {
        EdgeRef::Pointer(id) => {
            if let Node::Pointer(p) = graph.get_mut(id) {
                *p = new_target;
            }
        }
        EdgeRef::ContainerTemplateParam(id, idx) => {
            if let Node::Container(c) = graph.get_mut(id) {
                if let Some(TemplateParam::Type { type_ref, .. }) = c.template_params.get_mut(idx)
                {
                    *type_ref = new_target;
                }
            }
        }
        _ => unreachable!("rewrite_edge called on a non-breakable edge"),
    }
}

fn dfs(
    ctx: &mut Context,
    id: NodeId,
    on_stack: &mut FxHashSet<NodeId>,
    visited: &mut FxHashSet<NodeId>,
) -> Result<()> {
    if visited.contains(&id) {
        return Ok(());
    }
    on_stack.insert(id);

    let edges = dependency_edges(&ctx.graph, id);
    for (edge, target) in edges {
        if on_stack.contains(&target) {
            if edge.breakable() {
                let cb = ctx.graph.make_type(Node::CycleBreaker { target })?;
                rewrite_edge(&mut ctx.graph, edge, cb);
            } else {
                return Err(Error::UnbreakableCycle(format!(
                    "cycle closing at node {target} has no preferred break edge"
                )));
            }
        } else {
            dfs(ctx, target, on_stack, visited)?;
        }
    }

    on_stack.remove(&id);
    visited.insert(id);
    Ok(())
}

impl Pass for CycleFinder {
    fn name(&self) -> &'static str {
        "CycleFinder"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let mut on_stack = FxHashSet::default();
        let mut visited = FxHashSet::default();
        let roots: Vec<NodeId> = if ctx.graph.roots().is_empty() {
            ctx.graph.ids().collect()
        } else {
            ctx.graph.roots().to_vec()
        };
        for root in roots {
            dfs(ctx, root, &mut on_stack, &mut visited)?;
        }
        for id in visited {
            tracker.visit(id);
        }
        Ok(())
    }
}
