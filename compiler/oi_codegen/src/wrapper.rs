//! Top-level wrapper (§4.5.4) and dynamic descriptor emission (§4.5.5).

use std::hash::{Hash, Hasher};

use oi_wire::{MAGIC, SENTINEL};
use rustc_hash::FxHasher;

use crate::writer::Writer;

/// `hash64` used to name the exported entry point and descriptor constant.
/// Grounded on the teacher's own `FxHasher`-based content-hash convention
/// (`ori_ir::canon::hash`); deterministic for a given `type_name`.
pub fn hash64(type_name: &str) -> u64 {
    let mut hasher = FxHasher::default();
    type_name.hash(&mut hasher);
    hasher.finish()
}

pub struct WrapperOptions {
    pub type_name: String,
    pub root_class_name: String,
    pub typed_mode: bool,
    /// Whether a timestamp word follows the header (an optional fourth
    /// header slot per §4.5.4 item 1).
    pub emit_timestamp: bool,
}

/// Emit `getSize_<hash64(type_name)>`: header words, root handler
/// invocation, trailing sentinels, and a size back-fill.
pub fn emit_top_level_wrapper(w: &mut Writer, opts: &WrapperOptions) {
    let hash = hash64(&opts.type_name);
    w.writeln(&format!(
        "extern \"C\" void getSize_{hash}(const {}& t, std::vector<uint8_t>& buf) {{",
        opts.root_class_name
    ));
    w.indent();
    w.writeln(&format!("writeWord(buf, {MAGIC}ull); // magic"));
    w.writeln("writeWord(buf, COOKIE);");
    w.writeln("size_t size_slot = buf.size();");
    w.writeln("writeWord(buf, 0); // size, back-filled below");
    if opts.emit_timestamp {
        w.writeln("writeWord(buf, nowNanos());");
    }

    if opts.typed_mode {
        w.writeln(&format!(
            "TypeHandler<DB, {}>::getSizeType(t, RootRet{{buf}});",
            opts.root_class_name
        ));
    } else {
        w.writeln("size_t out = 0;");
        w.writeln("getSizeType(t, out);");
    }

    w.writeln(&format!("writeVarInt(buf, {SENTINEL}ull);"));
    w.writeln(&format!("writeVarInt(buf, {SENTINEL}ull);"));
    w.writeln("backfillWord(buf, size_slot, buf.size() - size_slot - sizeof(uint64_t));");
    w.dedent();
    w.writeln("}");
    w.blank();
}

/// `extern const dy::Dynamic outputType_<hash64> = TypeHandler<DB,
/// Root>::type::describe;` (§4.5.5), typed mode only.
pub fn emit_dynamic_descriptor(w: &mut Writer, opts: &WrapperOptions) {
    let hash = hash64(&opts.type_name);
    w.writeln(&format!(
        "extern const dy::Dynamic outputType_{hash} = TypeHandler<DB, {}>::type::describe;",
        opts.root_class_name
    ));
    w.blank();
}
