//! Process-wide-but-explicit pipeline state (§9 "model as explicit Context
//! handle").

use oi_containers::Catalog;
use oi_graph::{FeatureSet, TypeGraph};

/// One entry in the member ignore list RemoveMembers consults: `member`
/// `"*"` drops every member of `class`.
#[derive(Debug, Clone)]
pub struct IgnoreSpec {
    pub class: String,
    pub member: String,
}

impl IgnoreSpec {
    pub fn matches(&self, class_name: &str, member_name: &str) -> bool {
        self.class == class_name && (self.member == "*" || self.member == member_name)
    }
}

/// A user request to capture container keys, consumed by `KeyCapture` (§4.8).
#[derive(Debug, Clone)]
pub struct KeyCaptureRequest {
    pub type_name: String,
    pub member: String,
    pub top_level: bool,
}

/// Everything a pass needs, threaded explicitly rather than through module
/// globals.
pub struct Context {
    pub graph: TypeGraph,
    pub catalog: Catalog,
    pub features: FeatureSet,
    pub ignore: Vec<IgnoreSpec>,
    pub key_capture_requests: Vec<KeyCaptureRequest>,
}

impl Context {
    pub fn new(graph: TypeGraph, catalog: Catalog) -> Self {
        Context {
            graph,
            catalog,
            features: FeatureSet::default(),
            ignore: Vec::new(),
            key_capture_requests: Vec::new(),
        }
    }
}
