//! Lexical path normalization (no filesystem access, symlinks are not followed).

use std::path::{Component, Path, PathBuf};

/// Collapses repeated separators, drops `.` and resolves `..` against the
/// preceding component. `..` directly under the root is discarded; leading
/// `..` on a relative path is kept. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut normals = 0usize;
    let mut rooted = false;

    for component in path.components() {
        match component {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => {
                out.push(Component::RootDir.as_os_str());
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if normals > 0 {
                    out.pop();
                    normals -= 1;
                } else if !rooted {
                    out.push("..");
                }
            }
            Component::Normal(name) => {
                out.push(name);
                normals += 1;
            }
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize_path(Path::new(s)).to_string_lossy().into_owned()
    }

    #[test]
    fn collapses_separators() {
        assert_eq!(norm("/data///test/80/25//file1"), "/data/test/80/25/file1");
    }

    #[test]
    fn resolves_dot_segments() {
        assert_eq!(norm("/data/./a/../b"), "/data/b");
        assert_eq!(norm("/../data"), "/data");
    }

    #[test]
    fn keeps_leading_parent_on_relative_paths() {
        assert_eq!(norm("../a/./b/.."), "../a");
        assert_eq!(norm("a/.."), ".");
        assert_eq!(norm(""), ".");
    }
}
