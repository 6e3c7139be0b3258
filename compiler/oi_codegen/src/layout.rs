//! Shared structural emission (§4.5 items 1-4): includes, forward
//! declarations, struct bodies, and `static_assert` drift checks. Both
//! emitter modes call into this before emitting their mode-specific
//! handlers.

use oi_graph::{ClassKind, Node, NodeId, PrimitiveKind, TypeGraph};

use crate::writer::Writer;

/// `#include` lines shared by every generated artifact, before any
/// container-specific headers.
const BASE_INCLUDES: &[&str] = &["cstddef", "cstdint", "new"];

pub fn c_primitive_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Int8 => "int8_t",
        PrimitiveKind::Int16 => "int16_t",
        PrimitiveKind::Int32 => "int32_t",
        PrimitiveKind::Int64 => "int64_t",
        PrimitiveKind::UInt8 => "uint8_t",
        PrimitiveKind::UInt16 => "uint16_t",
        PrimitiveKind::UInt32 => "uint32_t",
        PrimitiveKind::UInt64 => "uint64_t",
        PrimitiveKind::Float32 => "float",
        PrimitiveKind::Float64 => "double",
        PrimitiveKind::Float80 => "long double",
        PrimitiveKind::Float128 => "__float128",
        PrimitiveKind::Bool => "bool",
        PrimitiveKind::UIntPtr => "uintptr_t",
        PrimitiveKind::StubbedPointer => "void*",
        PrimitiveKind::Void => "void",
    }
}

/// The declarator text for a member's type, e.g. `int32_t`, `Foo*`,
/// `int8_t[7]` (the array length is appended by the caller as `name[N]`).
pub fn type_text(graph: &TypeGraph, id: NodeId) -> String {
    match graph.get(id) {
        Node::Primitive(k) => c_primitive_name(*k).to_string(),
        Node::Class(c) => c.fully_qualified_name.clone(),
        Node::Container(c) => c.fully_qualified_name.clone(),
        Node::Enum(e) => e.name.clone(),
        Node::Typedef(t) => t.name.clone(),
        Node::Array(a) => type_text(graph, a.element),
        Node::Pointer(inner) => format!("{}*", type_text(graph, *inner)),
        Node::Reference(inner) => format!("{}&", type_text(graph, *inner)),
        Node::Incomplete(i) => i.name.clone(),
        Node::Dummy { size, .. } => format!("std::byte[{size}]"),
        Node::DummyAllocator { .. } => "std::allocator<std::byte>".to_string(),
        Node::CaptureKeys { inner, .. } => type_text(graph, *inner),
        Node::CycleBreaker { target } => format!("{}*", type_text(graph, *target)),
    }
}

fn array_length(graph: &TypeGraph, id: NodeId) -> Option<u64> {
    match graph.get(id) {
        Node::Array(a) => Some(a.length),
        _ => None,
    }
}

pub fn emit_includes(w: &mut Writer, graph: &TypeGraph) {
    for header in BASE_INCLUDES {
        w.writeln(&format!("#include <{header}>"));
    }
    let mut seen = std::collections::BTreeSet::new();
    for id in &graph.final_types {
        if let Node::Container(c) = graph.get(*id) {
            seen.insert(c.info.header.clone());
        }
    }
    for header in seen {
        w.writeln(&format!("#include <{header}>"));
    }
    w.blank();
}

pub fn emit_forward_declarations(w: &mut Writer, graph: &TypeGraph) {
    for &id in &graph.final_types {
        match graph.get(id) {
            Node::Class(c) => w.writeln(&format!(
                "{} {};",
                class_keyword(c.kind),
                c.fully_qualified_name
            )),
            Node::Enum(e) => w.writeln(&format!("using {} = {};", e.name, enum_underlying(e.size))),
            Node::Typedef(t) => {
                w.writeln(&format!("using {} = {};", t.name, type_text(graph, t.underlying)));
            }
            _ => {}
        }
    }
    w.blank();
}

fn class_keyword(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Class => "class",
        ClassKind::Struct => "struct",
        ClassKind::Union => "union",
    }
}

fn enum_underlying(size_bytes: u64) -> &'static str {
    match size_bytes {
        1 => "uint8_t",
        2 => "uint16_t",
        4 => "uint32_t",
        _ => "uint64_t",
    }
}

/// Emit the full body of every non-container Class, members in offset
/// order, with `static_assert`s pinning `sizeof` and each byte-aligned
/// member's `offsetof` against the graph's recorded layout (§4.5 item 4).
pub fn emit_class_definitions(w: &mut Writer, graph: &TypeGraph) {
    for &id in &graph.final_types {
        let Node::Class(c) = graph.get(id) else { continue };
        let mut members = c.members.clone();
        members.sort_by_key(|m| m.bit_offset);

        w.writeln(&format!(
            "{} {} {{",
            class_keyword(c.kind),
            c.fully_qualified_name
        ));
        w.indent();
        for m in &members {
            let base = type_text(graph, m.type_ref);
            match (m.bit_size, array_length(graph, m.type_ref)) {
                (Some(bits), _) => w.writeln(&format!("{base} {} : {bits};", m.name)),
                (None, Some(len)) => w.writeln(&format!("{base} {}[{len}];", m.name)),
                (None, None) => w.writeln(&format!("{base} {};", m.name)),
            }
        }
        w.dedent();
        if c.packed {
            w.writeln("} __attribute__((__packed__));");
        } else {
            w.writeln("};");
        }

        w.writeln(&format!(
            "static_assert(sizeof({}) == {});",
            c.fully_qualified_name, c.size
        ));
        for m in &members {
            if m.bit_size.is_some() || m.name == "__oi_padding" {
                continue;
            }
            let byte_offset = m.bit_offset / 8;
            w.writeln(&format!(
                "static_assert(offsetof({}, {}) == {byte_offset});",
                c.fully_qualified_name, m.name
            ));
        }
        w.blank();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use oi_graph::{ClassNode, Member};

    #[test]
    fn emits_members_in_offset_order_with_static_asserts() {
        let mut g = TypeGraph::new();
        let int32 = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let int64 = g.make_primitive(PrimitiveKind::Int64).unwrap();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "S".into(),
                fully_qualified_name: "S".into(),
                size: 16,
                members: vec![
                    Member { name: "b".into(), type_ref: int64, bit_offset: 64, bit_size: None, align: None },
                    Member { name: "a".into(), type_ref: int32, bit_offset: 0, bit_size: None, align: None },
                ],
                ..ClassNode::default()
            }))
            .unwrap();
        g.final_types.push(class_id);

        let mut w = Writer::new();
        emit_class_definitions(&mut w, &g);
        let out = w.take_output();

        let a_pos = out.find("int32_t a;").unwrap();
        let b_pos = out.find("int64_t b;").unwrap();
        assert!(a_pos < b_pos);
        assert!(out.contains("static_assert(sizeof(S) == 16);"));
        assert!(out.contains("static_assert(offsetof(S, a) == 0);"));
        assert!(out.contains("static_assert(offsetof(S, b) == 8);"));
    }

    #[test]
    fn distinct_classes_sharing_a_base_name_emit_distinct_structs() {
        // NameGen dedups two `Foo`s to distinct `fully_qualified_name`s;
        // codegen must key off that field, not the shared `name`, or both
        // emit as `struct Foo { ... }` and collide.
        let mut g = TypeGraph::new();
        let a = g
            .make_type(Node::Class(ClassNode {
                name: "Foo".into(),
                fully_qualified_name: "Foo_0".into(),
                size: 1,
                ..ClassNode::default()
            }))
            .unwrap();
        let b = g
            .make_type(Node::Class(ClassNode {
                name: "Foo".into(),
                fully_qualified_name: "Foo_1".into(),
                size: 1,
                ..ClassNode::default()
            }))
            .unwrap();
        g.final_types.push(a);
        g.final_types.push(b);

        let mut w = Writer::new();
        emit_class_definitions(&mut w, &g);
        let out = w.take_output();

        assert!(out.contains("struct Foo_0 {"));
        assert!(out.contains("struct Foo_1 {"));
        assert!(!out.contains("struct Foo {"));
    }

    #[test]
    fn packed_class_gets_attribute() {
        let mut g = TypeGraph::new();
        let class_id = g
            .make_type(Node::Class(ClassNode {
                name: "P".into(),
                fully_qualified_name: "P".into(),
                size: 1,
                packed: true,
                ..ClassNode::default()
            }))
            .unwrap();
        g.final_types.push(class_id);

        let mut w = Writer::new();
        emit_class_definitions(&mut w, &g);
        assert!(w.take_output().contains("__attribute__((__packed__))"));
    }
}
