//! AlignmentCalc (§4.4.6): bottom-up alignment, setting `packed` when size
//! isn't a multiple of the computed alignment.

use rustc_hash::FxHashSet;

use oi_errors::{Error, Result};
use oi_graph::{Node, NodeId, PrimitiveKind};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct AlignmentCalc;

impl Pass for AlignmentCalc {
    fn name(&self) -> &'static str {
        "AlignmentCalc"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        let mut in_progress = FxHashSet::default();
        for id in ids {
            if tracker.visit(id) {
                continue;
            }
            align_of(&mut ctx.graph, id, &mut in_progress)?;
        }
        Ok(())
    }
}

fn align_of(
    graph: &mut oi_graph::TypeGraph,
    id: NodeId,
    in_progress: &mut FxHashSet<NodeId>,
) -> Result<u64> {
    match graph.get(id).clone() {
        Node::Primitive(k) => Ok(k.align()),
        Node::Pointer(_) | Node::Reference(_) => Ok(PrimitiveKind::UIntPtr.align()),
        Node::Array(a) => align_of(graph, a.element, in_progress),
        Node::Typedef(t) => align_of(graph, t.underlying, in_progress),
        Node::Enum(e) => Ok(e.size.max(1)),
        Node::Incomplete(_) => Ok(1),
        Node::Dummy { align, .. } | Node::DummyAllocator { align, .. } => Ok(align),
        Node::CaptureKeys { inner, .. } => align_of(graph, inner, in_progress),
        Node::CycleBreaker { .. } => Ok(1),
        Node::Container(c) => Ok(c.align.unwrap_or(1)),
        Node::Class(c) => {
            if let Some(a) = c.align {
                return Ok(a);
            }
            if !in_progress.insert(id) {
                return Err(Error::PassCycleUnhandled {
                    pass: "AlignmentCalc",
                    node: id.index() as u32,
                });
            }
            let mut max_align = 1;
            for m in &c.members {
                let a = match m.align {
                    Some(a) => a,
                    None => align_of(graph, m.type_ref, in_progress)?,
                };
                max_align = max_align.max(a);
            }
            in_progress.remove(&id);

            let packed = c.size > 0 && c.size % max_align != 0;
            if let Node::Class(cc) = graph.get_mut(id) {
                cc.align = Some(max_align);
                if packed {
                    cc.packed = true;
                }
            }
            Ok(max_align)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_containers::Catalog;
    use oi_graph::{ClassNode, Member, TypeGraph};

    #[test]
    fn unaligned_size_sets_packed() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "Odd".into(),
                size: 5,
                members: vec![Member {
                    name: "n".into(),
                    type_ref: int32,
                    bit_offset: 0,
                    bit_size: None,
                    align: None,
                }],
                ..ClassNode::default()
            }))
            .unwrap();

        let mut ctx = Context::new(g, Catalog::new());
        let mut tracker = NodeTracker::new();
        AlignmentCalc.run(&mut ctx, &mut tracker).unwrap();

        let Node::Class(c) = ctx.graph.get(class_id) else {
            panic!("expected Class");
        };
        assert_eq!(c.align, Some(4));
        assert!(c.packed);
    }
}
