//! Container descriptor records (§3.2, §6).
//!
//! A [`ContainerInfo`] is an immutable record binding a type-name regex to
//! the code-generation templates and wire layout the emitter (`oi_codegen`)
//! needs. Grounded on `original_source/oi/ContainerInfo.{h,cpp}`: the two
//! constructors there (descriptor-file vs. legacy `typeName`+`matcher`) map
//! to [`ContainerInfo::load_from_file`] and [`ContainerInfo::from_legacy`].

use std::path::Path;

use oi_errors::{Error, Result};
use regex::Regex;
use serde::Deserialize;

use crate::ctype::ContainerType;

/// The three text templates the emitter expands with the container's
/// (post-`NameGen`) emitted type name at `%1%`.
#[derive(Debug, Clone)]
pub struct Codegen {
    pub decl: String,
    pub func: String,
    /// Required iff the emitter runs in typed-data-segment mode (§4.5.2).
    pub handler: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub type_name: String,
    pub ctype: ContainerType,
    pub header: String,
    pub matcher: Regex,
    pub stub_template_params: Vec<usize>,
    pub underlying_container_index: Option<usize>,
    pub capture_keys: bool,
    pub codegen: Codegen,
}

impl ContainerInfo {
    /// `^name$|^name<.*>$`, the default matcher derived from a container's
    /// display name (§3.2).
    pub fn default_matcher(type_name: &str) -> Result<Regex> {
        let escaped = regex::escape(type_name);
        let pattern = format!("^{escaped}$|^{escaped}<.*>$");
        Regex::new(&pattern).map_err(|e| Error::BadDescriptor {
            path: type_name.to_string(),
            reason: format!("invalid derived matcher: {e}"),
        })
    }

    /// Load a descriptor from a TOML file. Required fields: `info.type_name`,
    /// `info.ctype`, `info.header`, `codegen.func`, `codegen.decl` (§6).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::load_from_str(&text, &path.display().to_string())
    }

    pub fn load_from_str(text: &str, path_for_errors: &str) -> Result<Self> {
        let raw: RawDescriptor = toml::from_str(text).map_err(|e| Error::BadDescriptor {
            path: path_for_errors.to_string(),
            reason: e.to_string(),
        })?;

        let info = raw.info.ok_or_else(|| Error::BadDescriptor {
            path: path_for_errors.to_string(),
            reason: "missing [info] table".to_string(),
        })?;
        let codegen = raw.codegen.ok_or_else(|| Error::BadDescriptor {
            path: path_for_errors.to_string(),
            reason: "missing [codegen] table".to_string(),
        })?;

        let ctype = ContainerType::from_str(&info.ctype).ok_or_else(|| Error::BadDescriptor {
            path: path_for_errors.to_string(),
            reason: format!("unknown ctype {:?}", info.ctype),
        })?;

        let matcher = match &info.matcher {
            Some(pattern) => Regex::new(pattern).map_err(|e| Error::BadDescriptor {
                path: path_for_errors.to_string(),
                reason: format!("invalid matcher: {e}"),
            })?,
            None => Self::default_matcher(&info.type_name)?,
        };

        Ok(ContainerInfo {
            type_name: info.type_name,
            ctype,
            header: info.header,
            matcher,
            stub_template_params: info.stub_template_params.unwrap_or_default(),
            underlying_container_index: info.underlying_container_index,
            capture_keys: false,
            codegen: Codegen {
                decl: codegen.decl,
                func: codegen.func,
                handler: codegen.handler,
            },
        })
    }

    /// Legacy loader: a hand-supplied matcher instead of one derived from
    /// `type_name` (§4.2's "alternate legacy loader").
    pub fn from_legacy(
        type_name: impl Into<String>,
        matcher: Regex,
        ctype: ContainerType,
        header: impl Into<String>,
        codegen: Codegen,
    ) -> Self {
        ContainerInfo {
            type_name: type_name.into(),
            ctype,
            header: header.into(),
            matcher,
            stub_template_params: Vec::new(),
            underlying_container_index: None,
            capture_keys: false,
            codegen,
        }
    }

    /// Clone this descriptor with `capture_keys` set, used by the KeyCapture
    /// pass (§4.8) to register a distinct catalog entry for a specific
    /// container site without mutating the shared original.
    pub fn clone_with_capture_keys(&self) -> Self {
        let mut clone = self.clone();
        clone.capture_keys = true;
        clone
    }

    pub fn matches(&self, fully_qualified_name: &str) -> bool {
        self.matcher.is_match(fully_qualified_name)
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawDescriptor {
    info: Option<RawInfo>,
    codegen: Option<RawCodegen>,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    type_name: String,
    ctype: String,
    header: String,
    #[serde(default)]
    stub_template_params: Option<Vec<usize>>,
    #[serde(default)]
    underlying_container_index: Option<usize>,
    #[serde(default)]
    matcher: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCodegen {
    func: String,
    decl: String,
    #[serde(default)]
    handler: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;

    #[test]
    fn loads_minimal_vector_descriptor() {
        let text = r#"
            [info]
            type_name = "std::vector"
            ctype = "VECTOR"
            header = "vector"
            stub_template_params = [1]

            [codegen]
            func = "getSizeType(%1%, …)"
            decl = "%1%"
            handler = "handler(%1%)"
        "#;
        let info = ContainerInfo::load_from_str(text, "<test>").unwrap();
        assert_eq!(info.type_name, "std::vector");
        assert_eq!(info.ctype, ContainerType::Vector);
        assert_eq!(info.stub_template_params, vec![1]);
        assert!(info.matches("std::vector<int, std::allocator<int>>"));
        assert!(info.matches("std::vector"));
        assert!(!info.matches("std::vector2<int>"));
    }

    #[test]
    fn missing_info_table_is_bad_descriptor() {
        let text = "[codegen]\nfunc=\"x\"\ndecl=\"y\"\n";
        let err = ContainerInfo::load_from_str(text, "<test>").unwrap_err();
        assert!(matches!(err, Error::BadDescriptor { .. }));
    }

    #[test]
    fn unknown_ctype_is_fatal() {
        let text = r#"
            [info]
            type_name = "weird"
            ctype = "NOT_A_REAL_TYPE"
            header = "weird.h"
            [codegen]
            func = "f"
            decl = "d"
        "#;
        let err = ContainerInfo::load_from_str(text, "<test>").unwrap_err();
        assert!(matches!(err, Error::BadDescriptor { .. }));
    }
}
