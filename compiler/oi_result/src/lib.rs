//! Decoded result types (§3.4) and the exclusive-size post-processor
//! (component I).

mod element;
mod sized_result;

pub use element::{ContainerStats, Data, Element};
pub use sized_result::{size_elements, SizedElement};
