//! Workspace location: find the project root that owns a file
//!
//! Starting at the file's directory, ancestors are examined one at a time,
//! nearest first, until a [`LocalProjectDetector`] accepts one. The search
//! ends at the filesystem root (where the parent of a directory is itself)
//! or at an empty / `.` relative path.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::discovery::LocalProjectDetector;
use crate::error::{ErrorCode, InternalError, Result, ResultExt};

/// Parent directory with `dirname` semantics: the parent of `""`, `"."` or a
/// bare file name is `"."`, and the parent of a root is the root itself.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None if path.has_root() => path.to_path_buf(),
        None => PathBuf::from("."),
    }
}

fn is_search_boundary(dir: &Path) -> bool {
    dir.as_os_str().is_empty() || dir == Path::new(".") || parent_dir(dir) == dir
}

/// Find the nearest ancestor directory of `file` that is a project root.
///
/// Every failure, whether no root exists or the detector itself failed, is
/// reported as a single [`ErrorCode::WorkspaceNotFound`] frame naming `file`,
/// wrapping the underlying cause.
pub async fn locate_workspace<D>(file: &Path, detector: &D) -> Result<PathBuf>
where
    D: LocalProjectDetector,
{
    find_project_root(parent_dir(file), detector)
        .await
        .with_wrap_err(ErrorCode::WorkspaceNotFound, || {
            format!("Error while looking at workspace for file: {}.", file.display())
        })
}

async fn find_project_root<D>(start: PathBuf, detector: &D) -> Result<PathBuf>
where
    D: LocalProjectDetector,
{
    let mut candidate = start;
    loop {
        debug!("Checking {:?} for a project root", candidate);
        if detector.is_project_root(&candidate).await? {
            debug!("Project root found: {:?}", candidate);
            return Ok(candidate);
        }

        if is_search_boundary(&candidate) {
            return Err(InternalError::workspace_not_found(
                "Project workspace not found.",
            ));
        }

        candidate = parent_dir(&candidate);
    }
}
