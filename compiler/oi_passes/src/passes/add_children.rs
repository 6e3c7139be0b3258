//! `add_children` (supplemented, SPEC_FULL item 3): populates `Class.children`
//! back-references from `Class.parents`, before `Flatten` clears `parents`.
//! Grounded on `original_source/oi/type_graph/AddChildren.h`.

use oi_errors::Result;
use oi_graph::{Node, NodeId};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct AddChildren;

impl Pass for AddChildren {
    fn name(&self) -> &'static str {
        "AddChildren"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        let mut back_edges: Vec<(NodeId, NodeId)> = Vec::new();

        for id in &ids {
            if tracker.visit(*id) {
                continue;
            }
            if let Node::Class(c) = ctx.graph.get(*id) {
                for parent in &c.parents {
                    back_edges.push((parent.type_ref, *id));
                }
            }
        }

        for (parent_id, child_id) in back_edges {
            if let Node::Class(parent) = ctx.graph.get_mut(parent_id) {
                if !parent.children.contains(&child_id) {
                    parent.children.push(child_id);
                }
            }
        }
        Ok(())
    }
}
