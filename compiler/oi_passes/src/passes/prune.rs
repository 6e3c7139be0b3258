//! Prune (§4.4.10): drop information downstream stages no longer need.

use oi_errors::Result;
use oi_graph::{Node, NodeId};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct Prune;

impl Pass for Prune {
    fn name(&self) -> &'static str {
        "Prune"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        for id in ids {
            if tracker.visit(id) {
                continue;
            }
            match ctx.graph.get_mut(id) {
                Node::Class(c) => {
                    c.template_params = Vec::new();
                    c.parents = Vec::new();
                    c.functions = Vec::new();
                    c.members.shrink_to_fit();
                    c.children.shrink_to_fit();
                }
                Node::Container(c) => {
                    c.template_params = Vec::new();
                    c.underlying = None;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_containers::Catalog;
    use oi_graph::{ClassNode, Function, TypeGraph, Virtuality};

    #[test]
    fn drops_template_params_parents_and_functions() {
        let mut g = TypeGraph::new();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "S".into(),
                functions: vec![Function {
                    name: "f".into(),
                    virtuality: Virtuality::NonVirtual,
                }],
                ..ClassNode::default()
            }))
            .unwrap();

        let mut ctx = Context::new(g, Catalog::new());
        let mut tracker = NodeTracker::new();
        Prune.run(&mut ctx, &mut tracker).unwrap();

        let Node::Class(c) = ctx.graph.get(class_id) else { panic!() };
        assert!(c.functions.is_empty());
        assert!(c.parents.is_empty());
        assert!(c.template_params.is_empty());
    }
}
