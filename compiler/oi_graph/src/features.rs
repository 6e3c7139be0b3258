//! Named feature flags threaded through the pass pipeline and emitter.
//!
//! Grounded on `original_source/oi/Features.h`'s `EnumBitset<Feature, N>` —
//! rewritten as a `bitflags` set, the idiomatic Rust equivalent (SPEC_FULL
//! item 1).

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FeatureSet: u16 {
        /// Chase raw (non-owning) pointers instead of recording address only.
        const CHASE_RAW_POINTERS       = 1 << 0;
        /// Allow emitting `__attribute__((__packed__))` structs (§4.4.6).
        const PACK_STRUCTS             = 1 << 1;
        /// Emit `__oi_padding` members and padding statistics (§4.4.5).
        const GEN_PADDING_STATS        = 1 << 2;
        /// Run the typed-data-segment emitter instead of the untyped one
        /// (§4.5.1 vs §4.5.2).
        const TYPED_DATA_SEGMENT       = 1 << 3;
        /// Emit the polymorphic-inheritance vtable dispatch (§4.5.3).
        const POLYMORPHIC_INHERITANCE  = 1 << 4;
        /// Run the `Prune` pass (§4.4.10).
        const PRUNE_TYPE_GRAPH         = 1 << 5;
        /// Wrap every root's containers in `CaptureKeys` (§4.8's
        /// `top_level=true`).
        const CAPTURE_KEYS             = 1 << 6;
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        FeatureSet::GEN_PADDING_STATS
    }
}
