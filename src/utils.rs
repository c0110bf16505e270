use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Combines a path with the current working directory and returns the absolute path.
///
/// The path does not have to exist; when it can't be canonicalized the joined path is returned.
pub fn combine_with_cwd_and_get_absolute_path(path: &str) -> PathBuf {
    let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let combined = current_dir.join(path);
    fs::canonicalize(&combined).unwrap_or(combined)
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_creating_parents(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let resolved = combine_with_cwd_and_get_absolute_path(&path.to_string_lossy());
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("report.txt"));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.txt");
        write_creating_parents(&path, "captured").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "captured");
    }
}
