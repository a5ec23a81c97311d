// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Streaming BLAKE3 digests of files.

use std::fs;
use std::io::Read;
use std::path::Path;

use blake3;

use error::Result;
use util::FILE_BUF_LEN;

/// Compute the BLAKE3 digest of a file.
///
/// Reads the file front to back in fixed-size buffers rather than mapping
/// it; the receiver calls this on a file it wrote moments ago, and a plain
/// read loop behaves the same for a 0-byte artifact as for a large one. The
/// result depends only on the file contents, not on buffer boundaries.
pub fn hash_file(path: &Path) -> Result<blake3::Hash> {
    let mut f = fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();

    let mut buf = vec![0_u8; FILE_BUF_LEN];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 { break }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize())
}

#[cfg(test)]
mod test {
    use std::fs;

    use blake3;
    use tempfile;

    use super::hash_file;

    #[test]
    fn hash_file_of_empty_file_is_blake3_of_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        assert_eq!(hash_file(&path).unwrap(), blake3::hash(b""));
    }

    #[test]
    fn hash_file_matches_one_shot_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello world").unwrap();
        assert_eq!(hash_file(&path).unwrap(), blake3::hash(b"hello world"));
    }

    #[test]
    fn hash_file_is_independent_of_buffer_boundaries() {
        // A file larger than one read buffer, with a length that is not a
        // multiple of it, must hash the same as the contents in one piece.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.bin");
        let data: Vec<u8> = (0..200_001_u32).map(|i| (i % 97) as u8).collect();
        fs::write(&path, &data).unwrap();
        assert_eq!(hash_file(&path).unwrap(), blake3::hash(&data));
    }

    #[test]
    fn hash_file_of_missing_file_is_an_error() {
        assert!(hash_file("/nonexistent/no-such-file".as_ref()).is_err());
    }
}
