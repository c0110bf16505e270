//! Test utilities for syscap tests

use std::fs;
use std::path::PathBuf;

/// Path of the syscap binary built for this test run
pub fn syscap_exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_syscap"))
}

/// Generate a unique temporary file path
pub fn get_temporary_file_name() -> PathBuf {
    std::env::temp_dir().join(uuid::Uuid::new_v4().to_string())
}

/// Temporary directory that gets deleted when the guard is dropped
pub struct TempDirectory {
    path: PathBuf,
}

impl TempDirectory {
    pub fn new() -> Self {
        let path = get_temporary_file_name();
        fs::create_dir_all(&path).expect("Failed to create temp directory");
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for TempDirectory {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
