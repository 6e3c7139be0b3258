//! AddPadding (§4.4.5): insert explicit `__oi_padding` members so that
//! member intervals cover `[0, size*8)` contiguously.

use oi_errors::Result;
use oi_graph::{ArrayNode, ClassKind, Member, Node, NodeId, PrimitiveKind};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct AddPadding;

impl Pass for AddPadding {
    fn name(&self) -> &'static str {
        "AddPadding"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        for id in ids {
            if tracker.visit(id) {
                continue;
            }
            let mut class = match ctx.graph.get(id) {
                Node::Class(c) if c.kind != ClassKind::Union => c.clone(),
                _ => continue,
            };

            class.members.sort_by_key(|m| m.bit_offset);
            let mut padded = Vec::with_capacity(class.members.len());
            let mut cursor_bits = 0u64;
            let mut pad_index = 0usize;

            for member in std::mem::take(&mut class.members) {
                if member.bit_offset > cursor_bits {
                    let gap_bits = member.bit_offset - cursor_bits;
                    padded.push(make_padding(
                        &mut ctx.graph,
                        cursor_bits,
                        gap_bits,
                        &mut pad_index,
                    )?);
                }
                let member_size_bits = member_size_bits(&ctx.graph, &member);
                cursor_bits = member.bit_offset + member_size_bits;
                padded.push(member);
            }

            let total_bits = class.size * 8;
            if total_bits > cursor_bits {
                let gap_bits = total_bits - cursor_bits;
                padded.push(make_padding(&mut ctx.graph, cursor_bits, gap_bits, &mut pad_index)?);
            }

            class.members = padded;
            *ctx.graph.get_mut(id) = Node::Class(class);
        }
        Ok(())
    }
}

fn member_size_bits(graph: &oi_graph::TypeGraph, member: &Member) -> u64 {
    if let Some(bits) = member.bit_size {
        return bits;
    }
    match graph.get(member.type_ref) {
        Node::Primitive(k) => k.size() * 8,
        Node::Class(c) => c.size * 8,
        Node::Container(c) => c.size * 8,
        Node::Array(a) => a.length * member_size_bits_of(graph, a.element),
        _ => 0,
    }
}

fn member_size_bits_of(graph: &oi_graph::TypeGraph, id: NodeId) -> u64 {
    match graph.get(id) {
        Node::Primitive(k) => k.size() * 8,
        Node::Class(c) => c.size * 8,
        _ => 0,
    }
}

fn make_padding(
    graph: &mut oi_graph::TypeGraph,
    start_bits: u64,
    gap_bits: u64,
    pad_index: &mut usize,
) -> Result<Member> {
    let int8 = graph.make_primitive(PrimitiveKind::Int8)?;
    *pad_index += 1;
    if gap_bits % 8 == 0 {
        let gap_bytes = gap_bits / 8;
        let array_id = graph.make_type(Node::Array(ArrayNode {
            element: int8,
            length: gap_bytes,
        }))?;
        Ok(Member {
            name: "__oi_padding".into(),
            type_ref: array_id,
            bit_offset: start_bits,
            bit_size: None,
            align: None,
        })
    } else {
        Ok(Member {
            name: "__oi_padding".into(),
            type_ref: int8,
            bit_offset: start_bits,
            bit_size: Some(gap_bits),
            align: None,
        })
    }
}
