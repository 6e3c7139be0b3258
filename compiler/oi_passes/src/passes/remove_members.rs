//! RemoveMembers (§4.4.3): drop ignored, union, and incomplete-typed
//! members.

use oi_errors::Result;
use oi_graph::{ClassKind, Node, NodeId};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct RemoveMembers;

impl Pass for RemoveMembers {
    fn name(&self) -> &'static str {
        "RemoveMembers"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        for id in ids {
            if tracker.visit(id) {
                continue;
            }
            let mut class = match ctx.graph.get(id) {
                Node::Class(c) => c.clone(),
                _ => continue,
            };
            let is_union = class.kind == ClassKind::Union;
            let class_name = class.fully_qualified_name.clone();
            let ignore = &ctx.ignore;
            let graph = &ctx.graph;
            class.members.retain(|m| {
                if is_union {
                    return false;
                }
                if ignore.iter().any(|spec| spec.matches(&class_name, &m.name)) {
                    return false;
                }
                !matches!(graph.get(m.type_ref), Node::Incomplete(_))
            });
            *ctx.graph.get_mut(id) = Node::Class(class);
        }
        Ok(())
    }
}
