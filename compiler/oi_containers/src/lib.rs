//! Container catalog (component B): descriptors binding a type-name regex
//! to generated-code templates and wire layout.

mod catalog;
mod ctype;
mod info;

pub use catalog::Catalog;
pub use ctype::ContainerType;
pub use info::{Codegen, ContainerInfo};
