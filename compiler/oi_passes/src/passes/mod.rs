//! The standard pass pipeline (component D, §4.4) plus the supplemented
//! passes listed in SPEC_FULL.md.

mod add_children;
mod add_padding;
mod alignment_calc;
mod cycle_finder;
mod enforce_compatibility;
mod flatten;
mod identify_containers;
mod key_capture;
mod name_gen;
mod prune;
mod remove_members;
mod remove_top_level_pointer;
mod topo_sort;
mod type_identifier;

pub use add_children::AddChildren;
pub use add_padding::AddPadding;
pub use alignment_calc::AlignmentCalc;
pub use cycle_finder::CycleFinder;
pub use enforce_compatibility::EnforceCompatibility;
pub use flatten::Flatten;
pub use identify_containers::IdentifyContainers;
pub use key_capture::KeyCapture;
pub use name_gen::NameGen;
pub use prune::Prune;
pub use remove_members::RemoveMembers;
pub use remove_top_level_pointer::RemoveTopLevelPointer;
pub use topo_sort::TopoSort;
pub use type_identifier::TypeIdentifier;

use crate::manager::PassManager;

/// The standard pipeline order: `add_children` first (it needs
/// `Class.parents` before Flatten clears it), then the ten spec passes in
/// order, with the supplemented validation/normalization passes at the
/// edges.
pub fn standard_pipeline() -> PassManager {
    PassManager::new()
        .add(AddChildren)
        .add(Flatten)
        .add(IdentifyContainers)
        .add(RemoveTopLevelPointer)
        .add(RemoveMembers)
        .add(TypeIdentifier)
        .add(AddPadding)
        .add(AlignmentCalc)
        .add(NameGen)
        .add(CycleFinder)
        .add(TopoSort)
        .add(KeyCapture)
        .add(Prune)
        .add(EnforceCompatibility)
}
