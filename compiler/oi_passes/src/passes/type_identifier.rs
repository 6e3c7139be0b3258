//! TypeIdentifier (§4.4.4): stub out catalog-directed template parameters
//! (typically allocators) with size/align-preserving `Dummy` placeholders.

use oi_errors::Result;
use oi_graph::{Node, NodeId, TemplateParam};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct TypeIdentifier;

impl Pass for TypeIdentifier {
    fn name(&self) -> &'static str {
        "TypeIdentifier"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        for id in ids {
            if tracker.visit(id) {
                continue;
            }
            let container = match ctx.graph.get(id) {
                Node::Container(c) => (**c).clone(),
                _ => continue,
            };

            for &idx in &container.info.stub_template_params.clone() {
                let Some(TemplateParam::Type { type_ref, qualifiers }) =
                    container.template_params.get(idx).cloned()
                else {
                    continue;
                };

                let (size, align) = node_size_align(&ctx.graph, type_ref);
                let stub_size = size.saturating_sub(1);
                let is_allocator = is_allocator(&ctx.graph, type_ref);

                let stub_id = if is_allocator {
                    let inner = first_template_param_type(&ctx.graph, type_ref)
                        .or_else(|| first_template_param_type(&ctx.graph, id))
                        .unwrap_or(type_ref);
                    ctx.graph.make_type(Node::DummyAllocator {
                        inner,
                        size: stub_size,
                        align,
                    })?
                } else {
                    ctx.graph.make_type(Node::Dummy {
                        size: stub_size,
                        align,
                    })?
                };

                if let Node::Container(c) = ctx.graph.get_mut(id) {
                    if let Some(TemplateParam::Type { type_ref, .. }) =
                        c.template_params.get_mut(idx)
                    {
                        *type_ref = stub_id;
                    } else {
                        c.template_params[idx] = TemplateParam::Type {
                            type_ref: stub_id,
                            qualifiers,
                        };
                    }
                }
            }
        }
        Ok(())
    }
}

fn node_size_align(graph: &oi_graph::TypeGraph, id: NodeId) -> (u64, u64) {
    match graph.get(id) {
        Node::Primitive(k) => (k.size(), k.align()),
        Node::Class(c) => (c.size, c.align.unwrap_or(1)),
        Node::Container(c) => (c.size, c.align.unwrap_or(1)),
        Node::Dummy { size, align } => (*size, *align),
        Node::DummyAllocator { size, align, .. } => (*size, *align),
        _ => (0, 1),
    }
}

fn is_allocator(graph: &oi_graph::TypeGraph, id: NodeId) -> bool {
    matches!(graph.get(id), Node::Class(c) if c.functions.iter().any(|f| f.name == "allocate"))
}

fn first_template_param_type(graph: &oi_graph::TypeGraph, id: NodeId) -> Option<NodeId> {
    let params = match graph.get(id) {
        Node::Class(c) => &c.template_params,
        Node::Container(c) => &c.template_params,
        _ => return None,
    };
    params.first().and_then(|tp| match tp {
        TemplateParam::Type { type_ref, .. } => Some(*type_ref),
        TemplateParam::Value(_) => None,
    })
}
