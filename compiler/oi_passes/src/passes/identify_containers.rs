//! IdentifyContainers (§4.4.2): replace a Class whose fully-qualified name
//! matches a catalog entry with a Container node delegating to it.

use oi_errors::Result;
use oi_graph::{ContainerNode, Node, NodeId};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct IdentifyContainers;

impl Pass for IdentifyContainers {
    fn name(&self) -> &'static str {
        "IdentifyContainers"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        for id in ids {
            if tracker.visit(id) {
                continue;
            }
            let class = match ctx.graph.get(id) {
                Node::Class(c) => c.clone(),
                _ => continue,
            };
            let Some(info) = ctx.catalog.find(&class.fully_qualified_name).cloned() else {
                continue;
            };

            let underlying_id = ctx.graph.make_type(Node::Class(class.clone()))?;
            *ctx.graph.get_mut(id) = Node::Container(Box::new(ContainerNode {
                name: class.name,
                fully_qualified_name: class.fully_qualified_name,
                size: class.size,
                align: class.align,
                info,
                template_params: class.template_params,
                underlying: Some(underlying_id),
            }));
        }
        Ok(())
    }
}
