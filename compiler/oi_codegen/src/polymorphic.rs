//! Polymorphic-inheritance dispatch (§4.5.3): for a Class with a vtable,
//! emit a `getSizeType` that reads the vptr, matches it against each
//! child's vtable range, and delegates to the concrete child's handler.

use oi_graph::{ClassNode, Node, NodeId, TypeGraph, Virtuality};

use crate::writer::Writer;

/// `(vtable_min, vtable_max)` for a concrete override, as resolved by
/// symbol lookup. Supplied by the caller since symbol resolution is outside
/// this crate's scope.
#[derive(Debug, Clone, Copy)]
pub struct VtableRange {
    pub min: u64,
    pub max: u64,
}

pub fn is_polymorphic_root(c: &ClassNode) -> bool {
    !matches!(c.virtuality, None | Some(Virtuality::NonVirtual)) && !c.children.is_empty()
}

/// Emit the dispatch function for `c`. `ranges` maps each child's `NodeId`
/// to its resolved vtable range; a child absent from the map falls through
/// to the base concrete handler, matching the "no symbol -> treat as base"
/// rule.
pub fn emit_dispatch(
    w: &mut Writer,
    graph: &TypeGraph,
    class_name: &str,
    c: &ClassNode,
    ranges: &std::collections::HashMap<NodeId, VtableRange>,
) {
    w.writeln(&format!("void getSizeType(const {class_name}& t, size_t& out) {{"));
    w.indent();
    w.writeln("void** vptr = *reinterpret_cast<void***>(const_cast<void*>(static_cast<const void*>(&t)));");
    w.writeln("ptrdiff_t top_offset = reinterpret_cast<ptrdiff_t*>(vptr)[-2];");
    w.writeln("bool matched = false;");

    for (idx, &child) in c.children.iter().enumerate() {
        let Some(range) = ranges.get(&child) else {
            continue;
        };
        let child_name = match graph.get(child) {
            Node::Class(cc) => cc.fully_qualified_name.clone(),
            _ => continue,
        };
        w.writeln(&format!(
            "if (!matched && (uintptr_t)vptr >= {}ull && (uintptr_t)vptr < {}ull) {{",
            range.min, range.max
        ));
        w.indent();
        w.writeln(&format!("out += sizeof(uint32_t); // child index {idx}"));
        w.writeln(&format!(
            "const auto* concrete = reinterpret_cast<const {child_name}*>(reinterpret_cast<const char*>(&t) + top_offset);"
        ));
        w.writeln("getSizeTypeConcrete(*concrete, out);");
        w.writeln("matched = true;");
        w.dedent();
        w.writeln("}");
    }

    w.writeln("if (!matched) {");
    w.indent();
    w.writeln("out += sizeof(int32_t); // -1: no matching child, fall back to base");
    w.writeln("getSizeTypeConcrete(t, out);");
    w.dedent();
    w.writeln("}");

    w.dedent();
    w.writeln("}");
    w.blank();
}
