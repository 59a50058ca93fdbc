//! `path[:line]` command-line targets

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use bridge_core::prelude::*;
use bridge_peer::DEFAULT_LINE;

/// Splits a file name from an optional `:line` (and ignored `:column`) suffix
static FILE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^:]*)(?::(?P<line>[^:]*))?(?::.*)?$")
        .expect("Invalid file target regex")
});

/// A file to open and the 1-based line to reveal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub path: PathBuf,
    pub line: u32,
}

impl FileTarget {
    /// Parse `arg`, resolving a relative path against the current directory.
    pub fn parse(arg: &str) -> Result<Self> {
        let cwd = std::env::current_dir()
            .wrap_err(ErrorCode::InvalidArgument, "Cannot determine current directory")?;
        Self::parse_in(arg, &cwd)
    }

    /// Parse `arg`, resolving a relative path against `cwd`.
    ///
    /// Only the last path component is split on `:`, so directories that
    /// contain colons survive. A missing line means line 1.
    pub fn parse_in(arg: &str, cwd: &Path) -> Result<Self> {
        let (dir, file_name) = split_file_name(arg);

        let captures = FILE_NAME_REGEX
            .captures(file_name)
            .ok_or_else(|| InternalError::invalid_argument(format!("Invalid target: {}", arg)))?;
        let name = captures.name("name").map_or("", |m| m.as_str());
        if name.is_empty() {
            return Err(InternalError::invalid_argument(format!(
                "No file name in target: {}",
                arg
            )));
        }

        let line = match captures.name("line") {
            None => DEFAULT_LINE,
            Some(m) => parse_line(m.as_str()).ok_or_else(|| {
                InternalError::invalid_argument(format!(
                    "Invalid line number '{}' in target: {}",
                    m.as_str(),
                    arg
                ))
            })?,
        };

        let path = Path::new(dir).join(name);
        let absolute = if path.is_absolute() {
            path
        } else {
            cwd.join(path)
        };

        Ok(Self {
            path: normalize_path(&absolute),
            line,
        })
    }
}

impl fmt::Display for FileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

fn split_file_name(arg: &str) -> (&str, &str) {
    match arg.rfind(std::path::is_separator) {
        Some(idx) => (&arg[..=idx], &arg[idx + 1..]),
        None => ("", arg),
    }
}

fn parse_line(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|line| *line >= 1)
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component.as_os_str()),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn parse(arg: &str) -> Result<FileTarget> {
        FileTarget::parse_in(arg, Path::new("/home/dev/project"))
    }

    #[test]
    fn test_absolute_with_line() {
        let target = parse("/ws/app/src/index.js:42").unwrap();
        assert_eq!(target.path, PathBuf::from("/ws/app/src/index.js"));
        assert_eq!(target.line, 42);
    }

    #[test]
    fn test_missing_line_defaults_to_one() {
        let target = parse("/ws/app/src/index.js").unwrap();
        assert_eq!(target.line, 1);
    }

    #[test]
    fn test_column_suffix_is_ignored() {
        let target = parse("/ws/app/App.js:10:5").unwrap();
        assert_eq!(target.path, PathBuf::from("/ws/app/App.js"));
        assert_eq!(target.line, 10);
    }

    #[test]
    fn test_relative_path_resolved_against_cwd() {
        let target = parse("src/../lib/./util.js:3").unwrap();
        assert_eq!(target.path, PathBuf::from("/home/dev/project/lib/util.js"));
        assert_eq!(target.line, 3);
    }

    #[test]
    fn test_colon_in_directory_is_kept() {
        let target = parse("/ws/a:b/index.js:7").unwrap();
        assert_eq!(target.path, PathBuf::from("/ws/a:b/index.js"));
        assert_eq!(target.line, 7);
    }

    #[test]
    fn test_paths_are_not_lowercased() {
        let target = parse("/Users/Dev/App.js").unwrap();
        assert_eq!(target.path, PathBuf::from("/Users/Dev/App.js"));
    }

    #[test]
    fn test_invalid_line() {
        for arg in ["/ws/a.js:abc", "/ws/a.js:0", "/ws/a.js:-3", "/ws/a.js:"] {
            let err = parse(arg).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidArgument, "arg {:?}", arg);
        }
    }

    #[test]
    fn test_missing_file_name() {
        for arg in ["", "/ws/app/", ":12"] {
            let err = parse(arg).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidArgument, "arg {:?}", arg);
        }
    }

    #[test]
    fn test_display() {
        let target = parse("/ws/a.js:9").unwrap();
        assert_eq!(target.to_string(), "/ws/a.js:9");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("/")), PathBuf::from("/"));
    }
}
