// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Directory traversal and the `.packignore` list.

use std::fs;
use std::io;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use error::Result;

/// Ignore patterns loaded from `<root>/.packignore`.
///
/// One pattern per line; blank lines and lines starting with `#` are
/// skipped. A relative path is ignored when any pattern occurs as a
/// substring of it. Substring match, not glob: the pattern `.log` matches
/// `build.log` but also `a.logs/keep.txt`.
pub struct IgnoreList {
    patterns: Vec<String>,
}

impl IgnoreList {
    pub fn new() -> IgnoreList {
        IgnoreList {
            patterns: Vec::new(),
        }
    }

    /// Load the ignore file at the directory root, if there is one.
    pub fn load(root: &Path) -> Result<IgnoreList> {
        let path = root.join(".packignore");
        let f = match fs::File::open(&path) {
            Err(ref err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(IgnoreList::new())
            }
            other => other?,
        };

        let mut patterns = Vec::new();
        for line in io::BufReader::new(f).lines() {
            let line = line?;
            if line.is_empty() {
                continue
            }
            if line.starts_with("#") {
                continue
            }
            patterns.push(line);
        }

        Ok(IgnoreList {
            patterns: patterns,
        })
    }

    pub fn is_ignored(&self, relative: &str) -> bool {
        self.patterns.iter().any(|p| relative.contains(&p[..]))
    }
}

/// Lazily yields `(absolute, relative)` pairs for the regular files under a
/// root, depth-first in directory-iteration order.
///
/// Directories are descended into but not emitted. Symlinks are neither
/// followed nor emitted. The ignore file itself is not emitted either;
/// `.packignore` configures a transfer, it is not part of one. Entries
/// whose relative path matches the ignore list are skipped without being
/// opened.
pub struct Walker {
    root: PathBuf,
    ignore: IgnoreList,
    stack: Vec<fs::ReadDir>,
}

impl Walker {
    pub fn new(root: &Path, ignore: IgnoreList) -> Result<Walker> {
        let top = fs::read_dir(root)?;
        Ok(Walker {
            root: PathBuf::from(root),
            ignore: ignore,
            stack: vec![top],
        })
    }
}

impl Iterator for Walker {
    type Item = Result<(PathBuf, PathBuf)>;

    fn next(&mut self) -> Option<Result<(PathBuf, PathBuf)>> {
        loop {
            let entry = match self.stack.last_mut() {
                Some(dir) => dir.next(),
                None => return None,
            };

            let entry = match entry {
                None => {
                    // This directory is exhausted, resume its parent.
                    self.stack.pop();
                    continue
                }
                Some(Err(err)) => return Some(Err(err.into())),
                Some(Ok(entry)) => entry,
            };

            // `DirEntry::file_type` does not traverse symlinks, which is
            // what keeps them out of the walk entirely.
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => return Some(Err(err.into())),
            };

            let absolute = entry.path();

            if file_type.is_dir() {
                match fs::read_dir(&absolute) {
                    Ok(dir) => self.stack.push(dir),
                    Err(err) => return Some(Err(err.into())),
                }
                continue
            }

            if !file_type.is_file() {
                continue
            }

            // The prefix strip cannot fail: `absolute` came out of an
            // iterator rooted at `self.root`.
            let relative = absolute
                .strip_prefix(&self.root)
                .expect("walked path is always under the walk root")
                .to_path_buf();

            if relative == Path::new(".packignore") {
                continue
            }

            if self.ignore.is_ignored(&relative.to_string_lossy()) {
                continue
            }

            return Some(Ok((absolute, relative)))
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::os::unix;
    use std::path::{Path, PathBuf};

    use tempfile;

    use super::{IgnoreList, Walker};

    fn ignore_from(patterns: &[&str]) -> IgnoreList {
        IgnoreList {
            patterns: patterns.iter().map(|p| String::from(*p)).collect(),
        }
    }

    fn walk_relative(root: &Path, ignore: IgnoreList) -> Vec<PathBuf> {
        let mut relative: Vec<PathBuf> = Walker::new(root, ignore)
            .unwrap()
            .map(|item| item.unwrap().1)
            .collect();
        relative.sort();
        relative
    }

    #[test]
    fn is_ignored_matches_substrings_anywhere() {
        let ignore = ignore_from(&[".log", "tmp/"]);
        assert!(ignore.is_ignored("build.log"));
        assert!(ignore.is_ignored("sub/dir/trace.log"));
        assert!(ignore.is_ignored("tmp/scratch.txt"));
        assert!(!ignore.is_ignored("notes.txt"));
        assert!(!ignore.is_ignored("catalog"));
    }

    #[test]
    fn is_ignored_is_substring_not_glob() {
        // `.log` occurs inside this path even though no component ends in
        // it; substring semantics ignore the file anyway.
        let ignore = ignore_from(&[".log"]);
        assert!(ignore.is_ignored("a.logs/keep.txt"));
    }

    #[test]
    fn load_skips_blanks_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".packignore"),
            b"# build output\n.log\n\ntarget/\n",
        ).unwrap();

        let ignore = IgnoreList::load(dir.path()).unwrap();
        assert!(ignore.is_ignored("x.log"));
        assert!(ignore.is_ignored("target/debug/pack"));
        assert!(!ignore.is_ignored("# build output"));
        assert!(!ignore.is_ignored("src/main.rs"));
    }

    #[test]
    fn load_without_ignore_file_ignores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ignore = IgnoreList::load(dir.path()).unwrap();
        assert!(!ignore.is_ignored("anything"));
    }

    #[test]
    fn walker_yields_nested_regular_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("sub/c.txt"), b"c").unwrap();
        fs::write(dir.path().join("sub/deeper/d.txt"), b"d").unwrap();

        let relative = walk_relative(dir.path(), IgnoreList::new());
        let expected: Vec<PathBuf> = ["a.txt", "sub/c.txt", "sub/deeper/d.txt"]
            .iter()
            .map(|p| PathBuf::from(*p))
            .collect();
        assert_eq!(relative, expected);
    }

    #[test]
    fn walker_applies_ignore_list_and_skips_the_ignore_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".packignore"), b".log\n").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("b.log"), b"b").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.txt"), b"c").unwrap();

        let ignore = IgnoreList::load(dir.path()).unwrap();
        let relative = walk_relative(dir.path(), ignore);
        let expected: Vec<PathBuf> = ["a.txt", "sub/c.txt"]
            .iter()
            .map(|p| PathBuf::from(*p))
            .collect();
        assert_eq!(relative, expected);
    }

    #[test]
    fn walker_does_not_follow_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real.txt"), b"real").unwrap();
        fs::create_dir(dir.path().join("pointed")).unwrap();
        fs::write(dir.path().join("pointed/inner.txt"), b"inner").unwrap();
        unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();
        unix::fs::symlink(dir.path().join("pointed"), dir.path().join("dirlink")).unwrap();

        let relative = walk_relative(dir.path(), IgnoreList::new());
        let expected: Vec<PathBuf> = ["pointed/inner.txt", "real.txt"]
            .iter()
            .map(|p| PathBuf::from(*p))
            .collect();
        assert_eq!(relative, expected);
    }

    #[test]
    fn walker_yields_absolute_paths_that_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"contents").unwrap();

        let mut walker = Walker::new(dir.path(), IgnoreList::new()).unwrap();
        let (absolute, relative) = walker.next().unwrap().unwrap();
        assert_eq!(relative, PathBuf::from("a.txt"));
        assert_eq!(fs::read(&absolute).unwrap(), b"contents");
        assert!(walker.next().is_none());
    }
}
