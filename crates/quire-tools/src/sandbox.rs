//! Workspace path sandbox.
//!
//! Every notebook operation takes a path relative to the workspace root.
//! [`Sandbox::resolve`] normalizes it lexically and rejects absolute paths
//! and any `..` that would climb above the root, without touching the
//! filesystem. Paths that pass and already exist are then canonicalized so
//! a symlink inside the workspace cannot point outside it.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::errors::NotebookError;

/// Resolves relative paths against one workspace root.
#[derive(Clone, Debug)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` to an absolute path inside the root.
    ///
    /// An empty path resolves to the root itself.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, NotebookError> {
        let normalized = normalize(relative).ok_or_else(|| {
            warn!(path = relative, "path rejected by sandbox");
            NotebookError::PathEscapes {
                path: relative.to_string(),
            }
        })?;
        let resolved = self.root.join(normalized);
        self.check_links(relative, &resolved)?;
        Ok(resolved)
    }

    /// Reject paths whose nearest existing ancestor canonicalizes outside
    /// the canonical root.
    fn check_links(&self, relative: &str, resolved: &Path) -> Result<(), NotebookError> {
        let Ok(root) = self.root.canonicalize() else {
            return Ok(());
        };
        let Some(existing) = resolved.ancestors().find(|p| p.exists()) else {
            return Ok(());
        };
        match existing.canonicalize() {
            Ok(real) if real.starts_with(&root) => Ok(()),
            Ok(_) => {
                warn!(path = relative, "symlink escape rejected by sandbox");
                Err(NotebookError::PathEscapes {
                    path: relative.to_string(),
                })
            }
            Err(e) => Err(NotebookError::io(relative, e)),
        }
    }
}

/// Lexically normalize a relative path. `None` when the path is absolute or
/// climbs above its starting point.
fn normalize(relative: &str) -> Option<PathBuf> {
    if relative.starts_with(['/', '\\']) {
        return None;
    }
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                let _ = parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn normalizes_inside_paths() {
        assert_eq!(normalize("notes/latex/../latex/./lec01"), Some(PathBuf::from("notes/latex/lec01")));
        assert_eq!(normalize(""), Some(PathBuf::new()));
        assert_eq!(normalize("a/.."), Some(PathBuf::new()));
    }

    #[test]
    fn rejects_escapes_lexically() {
        assert_eq!(normalize("../../etc/passwd"), None);
        assert_eq!(normalize("notes/../../x"), None);
        assert_eq!(normalize("/etc/passwd"), None);
        assert_eq!(normalize("\\server\\share"), None);
    }

    #[test]
    fn resolve_rejects_without_io() {
        // Root does not exist; rejection happens before any filesystem access.
        let sandbox = Sandbox::new("/nonexistent/workspace");
        assert_matches!(
            sandbox.resolve("../../etc/passwd"),
            Err(NotebookError::PathEscapes { .. })
        );
        assert_matches!(
            sandbox.resolve("/etc/passwd"),
            Err(NotebookError::PathEscapes { .. })
        );
    }

    #[test]
    fn resolve_joins_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::new(dir.path());
        assert_eq!(
            sandbox.resolve("hw/hw1/assignment.txt").unwrap(),
            dir.path().join("hw/hw1/assignment.txt")
        );
        assert_eq!(sandbox.resolve("").unwrap(), dir.path().join(""));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let sandbox = Sandbox::new(dir.path());
        assert_matches!(
            sandbox.resolve("link/secret.txt"),
            Err(NotebookError::PathEscapes { .. })
        );
    }
}
