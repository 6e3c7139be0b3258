//! KeyCapture (§4.8, logically a post-processor but driven as a pass since
//! it mutates the graph before TopoSort/Prune consume it): wraps a
//! container-typed member's edge in `CaptureKeys`, registering a
//! `capture_keys = true` catalog clone for the emitter to honor.

use oi_errors::Result;
use oi_graph::{Node, NodeId};

use crate::context::{Context, KeyCaptureRequest};
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct KeyCapture;

fn strip_typedef(graph: &oi_graph::TypeGraph, mut id: NodeId) -> NodeId {
    while let Node::Typedef(t) = graph.get(id) {
        id = t.underlying;
    }
    id
}

/// If `type_ref` (after stripping typedefs) names a Container, wraps it in a
/// fresh `CaptureKeys` node and registers the capturing descriptor clone;
/// otherwise returns `type_ref` unchanged.
fn capture_if_container(ctx: &mut Context, type_ref: NodeId) -> Result<NodeId> {
    let stripped = strip_typedef(&ctx.graph, type_ref);
    let Node::Container(c) = ctx.graph.get(stripped) else {
        return Ok(type_ref);
    };
    let info = c.info.clone_with_capture_keys();
    ctx.catalog.push(info.clone());
    ctx.graph.make_type(Node::CaptureKeys {
        inner: type_ref,
        info,
    })
}

impl Pass for KeyCapture {
    fn name(&self) -> &'static str {
        "KeyCapture"
    }

    fn run(&mut self, ctx: &mut Context, _tracker: &mut NodeTracker) -> Result<()> {
        let requests: Vec<KeyCaptureRequest> = ctx.key_capture_requests.clone();
        for request in &requests {
            if request.top_level {
                let roots = ctx.graph.roots().to_vec();
                let mut rewritten = Vec::with_capacity(roots.len());
                for root in roots {
                    rewritten.push(capture_if_container(ctx, root)?);
                }
                ctx.graph.set_roots(rewritten);
                continue;
            }

            let ids: Vec<NodeId> = ctx.graph.ids().collect();
            for id in ids {
                let is_match = matches!(
                    ctx.graph.get(id),
                    Node::Class(c) if c.name == request.type_name || c.fully_qualified_name == request.type_name
                );
                if !is_match {
                    continue;
                }
                let member_idx = match ctx.graph.get(id) {
                    Node::Class(c) => c.members.iter().position(|m| m.name == request.member),
                    _ => None,
                };
                let Some(idx) = member_idx else { continue };
                let old_type_ref = match ctx.graph.get(id) {
                    Node::Class(c) => c.members[idx].type_ref,
                    _ => continue,
                };
                let new_type_ref = capture_if_container(ctx, old_type_ref)?;
                if let Node::Class(c) = ctx.graph.get_mut(id) {
                    c.members[idx].type_ref = new_type_ref;
                }
            }
        }
        Ok(())
    }
}
