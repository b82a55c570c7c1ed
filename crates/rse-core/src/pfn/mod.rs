//! LFN → PFN composition and PFN → local path resolution.
//!
//! A PFN has the shape `scheme://hostname/prefix/relative_path`. The relative
//! path is either given explicitly on the LFN or derived from scope and name
//! by the configured [`Lfn2PfnAlgorithm`].

mod layout;
mod normalize;
mod parse;

pub use layout::Lfn2PfnAlgorithm;
pub use normalize::normalize_path;
pub use parse::{encode_pfn_path, normalize_prefix, parse_pfn, ParsedPfn};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::RseAttributes;
use crate::protocol::ProtocolError;

/// Logical file name: identifies a file independent of where it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lfn {
    pub scope: String,
    pub name: String,
    /// Explicit path relative to the prefix. Empty is treated as absent.
    #[serde(default)]
    pub path: Option<String>,
}

impl Lfn {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Key used in [`PfnMapper::lfns_to_pfns`] results: `scope:name`.
    pub fn did(&self) -> String {
        format!("{}:{}", self.scope, self.name)
    }

    fn explicit_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }
}

/// Path mapping bound to one set of protocol attributes.
#[derive(Debug, Clone)]
pub struct PfnMapper {
    attributes: RseAttributes,
    prefix: String,
}

impl PfnMapper {
    pub fn new(attributes: RseAttributes) -> Self {
        let prefix = normalize_prefix(&attributes.prefix);
        Self { attributes, prefix }
    }

    pub fn attributes(&self) -> &RseAttributes {
        &self.attributes
    }

    /// Normalized prefix, always starting and ending with `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fully qualified PFN for a single LFN. Prefix and relative path are
    /// percent-encoded, so every name resolves back to itself.
    pub fn lfn_to_pfn(&self, lfn: &Lfn) -> String {
        let relative = match lfn.explicit_path() {
            Some(p) => p.strip_prefix('/').unwrap_or(p).to_string(),
            None => self
                .attributes
                .lfn2pfn_algorithm
                .relative_path(&lfn.scope, &lfn.name),
        };
        format!(
            "{}://{}{}{}",
            self.attributes.scheme,
            self.attributes.hostname,
            encode_pfn_path(&self.prefix),
            encode_pfn_path(&relative)
        )
    }

    /// PFNs keyed by `scope:name`. Pass `std::slice::from_ref(&lfn)` or
    /// `Some(&lfn)` for a single LFN.
    pub fn lfns_to_pfns<'a, I>(&self, lfns: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = &'a Lfn>,
    {
        lfns.into_iter()
            .map(|lfn| (lfn.did(), self.lfn_to_pfn(lfn)))
            .collect()
    }

    pub fn parse_pfn(&self, pfn: &str) -> Result<ParsedPfn, ProtocolError> {
        parse_pfn(&self.attributes, pfn)
    }

    /// Parsed decompositions keyed by the PFN string.
    pub fn parse_pfns<'a, I>(&self, pfns: I) -> Result<BTreeMap<String, ParsedPfn>, ProtocolError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        pfns.into_iter()
            .map(|pfn| Ok((pfn.to_string(), self.parse_pfn(pfn)?)))
            .collect()
    }

    /// Local filesystem path of `pfn`. No I/O.
    pub fn pfn_to_local_path(&self, pfn: &str) -> Result<PathBuf, ProtocolError> {
        Ok(self.parse_pfn(pfn)?.to_local_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn mapper(prefix: &str) -> PfnMapper {
        PfnMapper::new(RseAttributes::new("file", "localhost", prefix))
    }

    #[test]
    fn prefix_is_normalized_before_composition() {
        let m = mapper("data");
        assert_eq!(m.prefix(), "/data/");
        let lfn = Lfn::new("test", "file1");
        assert_eq!(m.lfn_to_pfn(&lfn), "file://localhost/data/test/80/25/file1");
    }

    #[test]
    fn deterministic_across_calls() {
        let m = mapper("data");
        let lfn = Lfn::new("test", "file1");
        let first = m.lfns_to_pfns(Some(&lfn));
        let second = m.lfns_to_pfns(std::slice::from_ref(&lfn));
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert!(first.contains_key("test:file1"));
    }

    #[test]
    fn explicit_path_strips_one_leading_separator() {
        let m = mapper("/data/");
        let lfns = vec![
            Lfn::new("test", "a").with_path("/custom/dir/a"),
            Lfn::new("test", "b").with_path("custom/b"),
            Lfn::new("test", "c").with_path(""),
        ];
        let pfns = m.lfns_to_pfns(&lfns);
        assert_eq!(pfns["test:a"], "file://localhost/data/custom/dir/a");
        assert_eq!(pfns["test:b"], "file://localhost/data/custom/b");
        assert_eq!(
            pfns["test:c"],
            format!(
                "file://localhost/data/{}",
                Lfn2PfnAlgorithm::Hash.relative_path("test", "c")
            )
        );
    }

    #[test]
    fn lfn_round_trips_to_prefix_joined_path() {
        let m = mapper("data");
        let lfn = Lfn::new("test", "file1");
        let pfn = m.lfn_to_pfn(&lfn);
        let local = m.pfn_to_local_path(&pfn).unwrap();
        assert_eq!(local, Path::new("/data").join("test/80/25/file1"));
    }

    #[test]
    fn reserved_url_characters_keep_names_apart() {
        let m = mapper("data");
        let names = ["a", "a#b", "a?b", "a%41b", "a b"];
        let mut seen = std::collections::BTreeSet::new();
        for name in names {
            let lfn = Lfn::new("test", name).with_path(format!("test/{name}"));
            let local = m.pfn_to_local_path(&m.lfn_to_pfn(&lfn)).unwrap();
            assert_eq!(local, Path::new("/data/test").join(name));
            assert!(seen.insert(local), "{name} collides with another name");
        }
    }

    #[test]
    fn prefix_with_space_round_trips() {
        let m = mapper("/srv/my rse");
        let lfn = Lfn::new("test", "file1");
        let pfn = m.lfn_to_pfn(&lfn);
        assert!(pfn.starts_with("file://localhost/srv/my%20rse/"));
        assert_eq!(
            m.pfn_to_local_path(&pfn).unwrap(),
            Path::new("/srv/my rse/test/80/25/file1")
        );
    }

    #[test]
    fn parse_pfns_keys_by_input() {
        let m = mapper("/data");
        let parsed = m
            .parse_pfns(["file:///data/x/one", "file:///data/two"])
            .unwrap();
        assert_eq!(parsed["file:///data/x/one"].path, "/x/");
        assert_eq!(parsed["file:///data/two"].name, "two");
        assert!(m.parse_pfns(["file:///data/ok", "file:///elsewhere/f"]).is_err());
    }
}
