//! Deterministic relative paths for LFNs that carry no explicit path.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lfn2PfnAlgorithm {
    /// `scope/xx/yy/name`, where `xxyy` are the first four hex digits of md5("scope:name").
    #[default]
    Hash,
    /// `scope/name`.
    Identity,
}

impl Lfn2PfnAlgorithm {
    /// Relative path (no leading separator) for `scope:name`.
    pub fn relative_path(self, scope: &str, name: &str) -> String {
        match self {
            Lfn2PfnAlgorithm::Hash => {
                let digest = hex::encode(Md5::digest(format!("{scope}:{name}").as_bytes()));
                let scope = if scope.starts_with("user") || scope.starts_with("group") {
                    scope.replace('.', "/")
                } else {
                    scope.to_string()
                };
                format!("{}/{}/{}/{}", scope, &digest[0..2], &digest[2..4], name)
            }
            Lfn2PfnAlgorithm::Identity => format!("{scope}/{name}"),
        }
    }
}
