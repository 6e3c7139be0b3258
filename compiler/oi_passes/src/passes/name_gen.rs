//! NameGen (§4.4.7): assign globally unique emitted names.

use rustc_hash::FxHashMap;

use oi_errors::Result;
use oi_graph::{Node, NodeId, Qualifiers, TemplateParam};

use crate::context::Context;
use crate::manager::Pass;
use crate::tracker::NodeTracker;

#[derive(Default)]
pub struct NameGen;

fn strip_template_args(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

fn next_unique(counters: &mut FxHashMap<String, u32>, base: &str) -> String {
    let n = counters
        .entry(base.to_string())
        .and_modify(|c| *c += 1)
        .or_insert(0);
    format!("{base}_{n}")
}

impl Pass for NameGen {
    fn name(&self) -> &'static str {
        "NameGen"
    }

    fn run(&mut self, ctx: &mut Context, tracker: &mut NodeTracker) -> Result<()> {
        let ids: Vec<NodeId> = ctx.graph.ids().collect();
        let mut counters: FxHashMap<String, u32> = FxHashMap::default();
        let mut anon_counter = 0u32;

        for id in &ids {
            if tracker.visit(*id) {
                continue;
            }
            match ctx.graph.get(*id).clone() {
                Node::Class(mut c) => {
                    let base = if c.name.is_empty() {
                        anon_counter += 1;
                        format!("__oi_anon_{anon_counter}")
                    } else {
                        next_unique(&mut counters, strip_template_args(&c.name))
                    };
                    c.fully_qualified_name = base;
                    dedup_member_names(&mut c.members);
                    *ctx.graph.get_mut(*id) = Node::Class(c);
                }
                Node::Enum(mut e) => {
                    e.name = next_unique(&mut counters, strip_template_args(&e.name));
                    *ctx.graph.get_mut(*id) = Node::Enum(e);
                }
                Node::Typedef(mut t) => {
                    t.name = next_unique(&mut counters, strip_template_args(&t.name));
                    *ctx.graph.get_mut(*id) = Node::Typedef(t);
                }
                Node::Container(_) => {} // rebuilt in a second pass, once param names settle
                _ => {}
            }
        }

        // Containers are rebuilt after every other kind has its final name,
        // since a container's emitted name embeds its parameters' names.
        for id in &ids {
            let Node::Container(c) = ctx.graph.get(*id) else {
                continue;
            };
            let mut c = (**c).clone();
            let base = next_unique(&mut counters, strip_template_args(&c.name));
            let param_text: Vec<String> = c
                .template_params
                .iter()
                .map(|tp| template_param_text(&ctx.graph, tp))
                .collect();
            c.fully_qualified_name = if param_text.is_empty() {
                base
            } else {
                format!("{base}<{}>", param_text.join(", "))
            };
            *ctx.graph.get_mut(*id) = Node::Container(Box::new(c));
        }

        Ok(())
    }
}

fn template_param_text(graph: &oi_graph::TypeGraph, tp: &TemplateParam) -> String {
    match tp {
        TemplateParam::Type { type_ref, qualifiers } => {
            let name = emitted_name(graph, *type_ref);
            if qualifiers.contains(Qualifiers::CONST) {
                format!("const {name}")
            } else {
                name
            }
        }
        TemplateParam::Value(text) => text.clone(),
    }
}

fn emitted_name(graph: &oi_graph::TypeGraph, id: NodeId) -> String {
    match graph.get(id) {
        Node::Class(c) => c.fully_qualified_name.clone(),
        Node::Container(c) => c.fully_qualified_name.clone(),
        Node::Enum(e) => e.name.clone(),
        Node::Typedef(t) => t.name.clone(),
        Node::Primitive(k) => format!("{k:?}"),
        Node::Dummy { .. } => "__oi_dummy".to_string(),
        Node::DummyAllocator { .. } => "__oi_dummy_allocator".to_string(),
        _ => "__oi_unnamed".to_string(),
    }
}

fn dedup_member_names(members: &mut [oi_graph::Member]) {
    let mut seen: FxHashMap<String, u32> = FxHashMap::default();
    for m in members.iter_mut() {
        let count = seen.entry(m.name.clone()).or_insert(0);
        if *count > 0 {
            m.name = format!("{}_{}", m.name, *count);
        }
        *count += 1;
    }
}
