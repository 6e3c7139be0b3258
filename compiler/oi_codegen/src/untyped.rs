//! Untyped-mode handlers (§4.5.1): one free `getSizeType` function per
//! traversable Class, writing a trace tag per member and recursing.

use oi_errors::Result;
use oi_graph::{Node, NodeId, TypeGraph};

use crate::layout::type_text;
use crate::writer::Writer;

/// `%1%` substitution, matching the catalog's boost::format-style templates
/// (§3.2, §6).
pub fn expand_template(template: &str, name: &str) -> String {
    template.replace("%1%", name)
}

/// Containers already carry their own resolved `ContainerInfo` (stamped in
/// by `IdentifyContainers`), so no separate catalog lookup is needed here.
pub fn emit_untyped_handlers(w: &mut Writer, graph: &TypeGraph) -> Result<()> {
    for &id in &graph.final_types {
        let Node::Class(c) = graph.get(id) else { continue };
        w.writeln(&format!(
            "void getSizeType(const {}& t, size_t& out) {{",
            c.fully_qualified_name
        ));
        w.indent();
        for m in &c.members {
            if m.name == "__oi_padding" {
                continue;
            }
            emit_member_body(w, graph, &m.name, m.type_ref);
        }
        w.dedent();
        w.writeln("}");
        w.blank();
    }
    Ok(())
}

fn emit_member_body(w: &mut Writer, graph: &TypeGraph, member: &str, type_ref: NodeId) {
    match graph.get(type_ref) {
        Node::Container(c) => {
            let expanded = expand_template(&c.info.codegen.func, &c.fully_qualified_name);
            w.writeln(&format!("// container member `{member}`"));
            w.writeln(&format!("{expanded}(t.{member}, out);"));
        }
        Node::Pointer(pointee) => {
            w.writeln(&format!("out += sizeof(t.{member});"));
            w.writeln(&format!("if (t.{member} && seen.insert((uintptr_t)t.{member}).second) {{"));
            w.indent();
            if matches!(graph.get(*pointee), Node::Incomplete(_)) {
                w.writeln("// pointee is incomplete: address already recorded above");
            } else {
                w.writeln(&format!("getSizeType(*t.{member}, out);"));
            }
            w.dedent();
            w.writeln("}");
        }
        Node::CaptureKeys { inner, .. } => emit_member_body(w, graph, member, *inner),
        _ => {
            w.writeln(&format!("out += sizeof(t.{member}); // {}", type_text(graph, type_ref)));
            if matches!(graph.get(type_ref), Node::Class(_)) {
                w.writeln(&format!("getSizeType(t.{member}, out);"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_graph::{ClassNode, Member, PrimitiveKind};

    #[test]
    fn emits_one_function_per_class_skipping_padding() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let pad = g
            .make_type(Node::Array(oi_graph::ArrayNode {
                element: g.make_primitive(PrimitiveKind::Int8).unwrap(),
                length: 4,
            }))
            .unwrap();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "S".into(),
                fully_qualified_name: "S".into(),
                members: vec![
                    Member { name: "a".into(), type_ref: int32, bit_offset: 0, bit_size: None, align: None },
                    Member { name: "__oi_padding".into(), type_ref: pad, bit_offset: 32, bit_size: None, align: None },
                ],
                ..ClassNode::default()
            }))
            .unwrap();
        g.final_types.push(class_id);

        let mut w = Writer::new();
        emit_untyped_handlers(&mut w, &g).unwrap();
        let out = w.take_output();
        assert!(out.contains("void getSizeType(const S& t, size_t& out) {"));
        assert!(out.contains("out += sizeof(t.a)"));
        assert!(!out.contains("__oi_padding"));
    }
}
