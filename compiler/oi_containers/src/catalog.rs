//! The container catalog: an ordered collection of [`ContainerInfo`]
//! descriptors, matched in source order (§4.2 — "callers must not rely on
//! priority beyond source order").

use std::path::Path;

use oi_errors::Result;
use tracing::debug;

use crate::info::ContainerInfo;

#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: Vec<ContainerInfo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, info: ContainerInfo) {
        self.entries.push(info);
    }

    pub fn load_dir(&mut self, dir: &Path) -> Result<()> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();
        for path in paths {
            debug!(?path, "loading container descriptor");
            self.entries.push(ContainerInfo::load_from_file(&path)?);
        }
        Ok(())
    }

    /// First catalog entry (in source/insertion order) whose matcher accepts
    /// `fully_qualified_name`, or `None` if this is not a container type.
    pub fn find(&self, fully_qualified_name: &str) -> Option<&ContainerInfo> {
        self.entries
            .iter()
            .find(|info| info.matches(fully_qualified_name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;
    use crate::ctype::ContainerType;
    use crate::info::Codegen;
    use regex::Regex;

    fn mk(name: &str) -> ContainerInfo {
        ContainerInfo::from_legacy(
            name,
            Regex::new(&format!("^{name}(<.*>)?$")).unwrap(),
            ContainerType::Vector,
            "vector",
            Codegen {
                decl: "%1%".into(),
                func: "%1%".into(),
                handler: None,
            },
        )
    }

    #[test]
    fn matches_in_source_order() {
        let mut cat = Catalog::new();
        cat.push(mk("std::vector"));
        cat.push(mk("std::vector2"));
        let found = cat.find("std::vector<int>").unwrap();
        assert_eq!(found.type_name, "std::vector");
    }

    #[test]
    fn no_match_returns_none() {
        let cat = Catalog::new();
        assert!(cat.find("std::vector<int>").is_none());
    }
}
