// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Utilities shared by the file-handling modules.

use std::fs;
use std::path::Path;
use std::time::Duration;

/// Buffer size for file reads and writes (64 KiB).
pub const FILE_BUF_LEN: usize = 64 * 1024;

/// Buffer size for socket sends and receives (16 KiB).
///
/// A performance parameter, not protocol: the peer must tolerate any
/// chunking of the stream.
pub const NET_BUF_LEN: usize = 16 * 1024;

/// Timeout applied to every blocking socket operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Print a status line, `* message` on stdout.
pub fn report_ok(message: &str) {
    println!("* {}", message);
}

/// Print a failure line, `! message` on stderr.
pub fn report_err(message: &str) {
    eprintln!("! {}", message);
}

/// A file that is deleted on drop, unless explicitly committed.
///
/// The receiver writes every incoming artifact through one of these: the
/// guard is constructed before the first byte is written, and `commit()` is
/// called only after the on-disk digest verified against the sender's
/// signature. Every early return (framing error, IO error, timeout, failed
/// verification) drops the guard and removes the partial or unverified
/// file, so no artifact persists without a valid signature.
pub struct FileGuard<'a> {
    path: &'a Path,
    delete: bool,
}

impl<'a> FileGuard<'a> {
    pub fn new(path: &'a Path) -> FileGuard<'a> {
        FileGuard {
            path: path,
            delete: true,
        }
    }

    /// Keep the file: disarm the guard.
    pub fn commit(mut self) {
        self.delete = false;
    }
}

impl<'a> Drop for FileGuard<'a> {
    fn drop(&mut self) {
        if self.delete {
            // The drop with `delete` set happens on an error path, so the
            // file is likely incomplete, or its signature might be invalid.
            // Removing the file is an operation that may fail, but we are
            // already in a failure mode, and the original error is more
            // informative than the secondary IO error. Besides, we cannot
            // return the error here anyway. So ignore the secondary error.
            let _ = fs::remove_file(self.path);
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;

    use tempfile;

    use super::FileGuard;

    #[test]
    fn file_guard_removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.dat");
        fs::write(&path, b"half a transfer").unwrap();
        {
            let _guard = FileGuard::new(&path);
        }
        assert!(!path.exists());
    }

    #[test]
    fn file_guard_keeps_file_after_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verified.dat");
        fs::write(&path, b"a full transfer").unwrap();
        {
            let guard = FileGuard::new(&path);
            guard.commit();
        }
        assert!(path.exists());
    }

    #[test]
    fn file_guard_drop_tolerates_missing_file() {
        // Dropping a guard for a path that was never created must not panic.
        let _guard = FileGuard::new(Path::new("/nonexistent/never-written"));
    }
}
