//! Platform-specific path utilities

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Platform-aware path utilities with zero allocation where possible
pub struct PathUtil;

impl PathUtil {
    /// Convert path to POSIX format (forward slashes)
    ///
    /// Borrows when there is nothing to replace.
    #[inline]
    pub fn to_posix(path: &str) -> Cow<'_, str> {
        if path.contains('\\') {
            Cow::Owned(path.replace('\\', "/"))
        } else {
            Cow::Borrowed(path)
        }
    }

    /// Lexically normalize a path: drop `.`, fold `..` into its parent.
    ///
    /// Never touches the filesystem, so symlinks are not resolved. A `..`
    /// that climbs above the root is dropped, as the OS does for `/..`.
    pub fn normalize(path: &Path) -> PathBuf {
        let mut out = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => out.push(component),
                },
                other => out.push(other),
            }
        }
        out
    }

    /// Resolve `requested` under `root` and return the repository-relative
    /// POSIX path when it names a file strictly inside `root`.
    ///
    /// Containment is checked component-wise, so `/work2/x` is not inside
    /// `/work`. Absolute requests replace the root when joined and are
    /// rejected unless they happen to land inside it.
    pub fn contained_relative(root: &Path, requested: &str) -> Option<String> {
        let root = Self::normalize(root);
        let joined = Self::normalize(&root.join(Self::to_posix(requested).as_ref()));

        let relative = joined.strip_prefix(&root).ok()?;
        if relative.as_os_str().is_empty() {
            return None;
        }

        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }

    /// Derive the sibling path for the deduplicated artifact
    ///
    /// `reports/out.csv` becomes `reports/out-unique.csv`; a file name with
    /// no extension gets the suffix appended.
    pub fn unique_sibling(path: &str) -> String {
        let name_start = path.rfind('/').map_or(0, |i| i + 1);
        match path[name_start..].rfind('.') {
            Some(dot) if dot > 0 => {
                let dot = name_start + dot;
                format!("{}-unique{}", &path[..dot], &path[dot..])
            }
            _ => format!("{}-unique", path),
        }
    }
}
