//! Typed-data-segment mode (§4.5.2): each Class becomes a `TypeHandler<DB,
//! T>` partial specialization whose `::type` folds its members' wire shapes
//! and whose `getSizeType` chains `.delegate(...)` per member.

use oi_errors::{Error, Result};
use oi_graph::{Node, TypeGraph};

use crate::descriptor::{wire_shape, wire_type_to_cpp};
use crate::writer::Writer;

pub fn emit_typed_handlers(w: &mut Writer, graph: &TypeGraph) -> Result<()> {
    for &id in &graph.final_types {
        let Node::Class(c) = graph.get(id) else { continue };

        let mut member_shapes = Vec::with_capacity(c.members.len());
        for m in &c.members {
            if m.name == "__oi_padding" {
                continue;
            }
            member_shapes.push(wire_shape(graph, m.type_ref)?);
        }
        let folded = oi_wire::WireType::fold_pairs(member_shapes);

        w.writeln(&format!(
            "template <> struct TypeHandler<DB, {}> {{",
            c.fully_qualified_name
        ));
        w.indent();
        w.writeln(&format!("using type = {};", wire_type_to_cpp(&folded)));
        w.writeln(&format!(
            "static void getSizeType(const {}& t, typename type::Ret ret) {{",
            c.fully_qualified_name
        ));
        w.indent();
        for m in &c.members {
            if m.name == "__oi_padding" {
                continue;
            }
            emit_member_delegate(w, graph, &m.name, m.type_ref)?;
        }
        w.dedent();
        w.writeln("}");
        w.dedent();
        w.writeln("};");
        w.blank();
    }
    Ok(())
}

fn emit_member_delegate(
    w: &mut Writer,
    graph: &TypeGraph,
    member: &str,
    type_ref: oi_graph::NodeId,
) -> Result<()> {
    if let Node::Container(c) = graph.get(type_ref) {
        let Some(handler) = &c.info.codegen.handler else {
            return Err(Error::CodegenHandlerMissing(c.name.clone()));
        };
        let expanded = crate::untyped::expand_template(handler, &c.fully_qualified_name);
        w.writeln(&format!("ret.delegate([&t](auto ret) {{ {expanded}(t.{member}, ret); }});"));
        return Ok(());
    }
    w.writeln(&format!(
        "ret.delegate([&t](auto ret) {{ TypeHandler<DB, decltype(t.{member})>::getSizeType(t.{member}, ret); }});"
    ));
    Ok(())
}
