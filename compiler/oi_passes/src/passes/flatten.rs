//! Flatten (§4.4.1): inline parent members into each Class, in declaration
//! order, at `parent.bit_offset + member.bit_offset`.

use rustc_hash::FxHashSet;

use oi_errors::{Error, Result};
use oi_graph::{Function, Member, Node, NodeId};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct Flatten;

impl Pass for Flatten {
    fn name(&self) -> &'static str {
        "Flatten"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let mut in_progress = FxHashSet::default();
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        for id in ids {
            flatten_node(ctx, id, &mut in_progress, tracker)?;
        }
        Ok(())
    }
}

fn flatten_node(
    ctx: &mut Context,
    id: NodeId,
    in_progress: &mut FxHashSet<NodeId>,
    tracker: &mut NodeTracker,
) -> Result<()> {
    if tracker.is_visited(id) {
        return Ok(());
    }
    if !in_progress.insert(id) {
        return Err(Error::PassCycleUnhandled {
            pass: "Flatten",
            node: id.index() as u32,
        });
    }

    let mut class = match ctx.graph.get(id).clone() {
        Node::Class(c) => c,
        _ => {
            in_progress.remove(&id);
            tracker.visit(id);
            return Ok(());
        }
    };

    if !class.parents.is_empty() {
        let parents = std::mem::take(&mut class.parents);
        let mut inherited_members: Vec<Member> = Vec::new();
        let mut inherited_functions: Vec<Function> = Vec::new();

        for (i, parent) in parents.iter().enumerate() {
            flatten_node(ctx, parent.type_ref, in_progress, tracker)?;
            match ctx.graph.get(parent.type_ref).clone() {
                Node::Class(parent_class) => {
                    for (j, m) in parent_class.members.iter().enumerate() {
                        let mut shifted = m.clone();
                        shifted.bit_offset = parent.bit_offset + m.bit_offset;
                        if j == 0 {
                            let parent_align = parent_class.align.unwrap_or(1);
                            shifted.align =
                                Some(shifted.align.unwrap_or(1).max(parent_align));
                        }
                        inherited_members.push(shifted);
                    }
                    inherited_functions.extend(parent_class.functions.iter().cloned());
                }
                Node::Container(_) => {
                    inherited_members.push(Member {
                        name: format!("__oi_parent_{i}"),
                        type_ref: parent.type_ref,
                        bit_offset: parent.bit_offset,
                        bit_size: None,
                        align: None,
                    });
                }
                other => {
                    return Err(Error::BadGraph(format!(
                        "parent of {id} is neither Class nor Container (found {other:?})"
                    )))
                }
            }
        }

        inherited_members.extend(std::mem::take(&mut class.members));
        class.members = inherited_members;
        inherited_functions.extend(std::mem::take(&mut class.functions));
        class.functions = inherited_functions;

        let looks_like_allocator = class.functions.iter().any(|f| f.name == "allocate");
        if looks_like_allocator && class.template_params.is_empty() {
            if let Some(first_parent) = parents.first() {
                if let Node::Class(parent_class) = ctx.graph.get(first_parent.type_ref) {
                    if let Some(tp) = parent_class.template_params.first() {
                        class.template_params.push(tp.clone());
                    }
                }
            }
        }

        *ctx.graph.get_mut(id) = Node::Class(class);
    } else {
        *ctx.graph.get_mut(id) = Node::Class(class);
    }

    in_progress.remove(&id);
    tracker.visit(id);
    Ok(())
}
