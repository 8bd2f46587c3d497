//! Path Resolver
//!
//! Maps a requested name onto a file below a configured root directory.
//! Only existence, file type and, for executables, permission bits are
//! checked; the target is never opened.

use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Absolute, canonical location of an existing file under a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Resolution error type
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Filename '{}' does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("Name '{0}' does not point inside the configured directory.")]
    OutsideRoot(String),

    #[error("'{}' is not a regular file.", .0.display())]
    NotAFile(PathBuf),

    #[error("'{}' is not marked as executable.", .0.display())]
    NotExecutable(PathBuf),

    #[error("Failed to inspect '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolves `name` to a regular file below `root`
///
/// Absolute names and names with `..` components are rejected outright.
/// Symlinks are followed, and the final target must still lie below the
/// canonical root. Directories, the root itself included, are rejected.
pub fn resolve(root: &Path, name: &str) -> Result<ResolvedPath, ResolveError> {
    let relative = Path::new(name);
    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if name.trim().is_empty() || !plain {
        return Err(ResolveError::OutsideRoot(name.to_string()));
    }

    let candidate = root.join(relative);
    let canonical = match candidate.canonicalize() {
        Ok(path) => path,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ResolveError::NotFound(candidate));
        }
        Err(source) => {
            return Err(ResolveError::Io {
                path: candidate,
                source,
            });
        }
    };

    let canonical_root = root.canonicalize().map_err(|source| ResolveError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    if !canonical.starts_with(&canonical_root) {
        return Err(ResolveError::OutsideRoot(name.to_string()));
    }

    if !canonical.is_file() {
        return Err(ResolveError::NotAFile(canonical));
    }

    Ok(ResolvedPath(canonical))
}

/// Resolves an executable below `root`
///
/// On top of [`resolve`], the target must have at least one execute bit set.
pub fn resolve_executable(root: &Path, name: &str) -> Result<ResolvedPath, ResolveError> {
    let resolved = resolve(root, name)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = resolved
            .as_path()
            .metadata()
            .map_err(|source| ResolveError::Io {
                path: resolved.as_path().to_path_buf(),
                source,
            })?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(ResolveError::NotExecutable(resolved.0));
        }
    }

    Ok(resolved)
}
