//! `remove_top_level_pointer` (supplemented, SPEC_FULL item 5): when a root
//! is itself a `Pointer`, replace it with its pointee and record that the
//! emitter should treat the argument as already-a-reference. Grounded on
//! `original_source/oi/type_graph/RemoveTopLevelPointer.{h,cpp}`.

use oi_errors::Result;
use oi_graph::Node;

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct RemoveTopLevelPointer;

impl Pass for RemoveTopLevelPointer {
    fn name(&self) -> &'static str {
        "RemoveTopLevelPointer"
    }

    fn run(&mut self, ctx: &mut Context, _tracker: &mut NodeTracker) -> Result<()> {
        let roots = ctx.graph.roots().to_vec();
        let mut rewritten = Vec::with_capacity(roots.len());
        for root in roots {
            match ctx.graph.get(root) {
                Node::Pointer(pointee) => rewritten.push(*pointee),
                _ => rewritten.push(root),
            }
        }
        ctx.graph.set_roots(rewritten);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_containers::Catalog;
    use oi_graph::{ClassNode, TypeGraph};

    #[test]
    fn replaces_pointer_root_with_pointee() {
        let mut g = TypeGraph::new();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "S".into(),
                ..ClassNode::default()
            }))
            .unwrap();
        let ptr_id = g.make_type(Node::Pointer(class_id)).unwrap();
        g.add_root(ptr_id);

        let mut ctx = Context::new(g, Catalog::new());
        let mut tracker = NodeTracker::new();
        RemoveTopLevelPointer.run(&mut ctx, &mut tracker).unwrap();

        assert_eq!(ctx.graph.roots(), &[class_id]);
    }
}
