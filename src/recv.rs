// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The receiving side: accept loop, dispatch, verify, commit or discard.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;

use digest;
use error::{Error, Result};
use frame;
use key;
use util;
use util::{FileGuard, NET_BUF_LEN};

/// The literal that distinguishes a delete request from a transfer frame.
///
/// The receiver peeks at the first bytes of every connection without
/// consuming them. A transfer frame starts with a public key, whose leading
/// bytes are effectively random, so a collision with this prefix is a
/// 2^-56 event.
const DELETE_PREFIX: &'static [u8] = b"DELETE ";

/// Upper bound on a delete request line, terminator excluded.
const MAX_REQUEST_LINE_LEN: usize = 4096;

/// A server that accepts transfers and delete requests, one client at a
/// time, each served to completion before the next accept.
pub struct Receiver {
    listener: TcpListener,
    dest_dir: PathBuf,
    timeout: Duration,
}

impl Receiver {
    /// Bind the listening socket on all interfaces.
    ///
    /// Artifacts are written into `dest_dir`. `std` enables address reuse
    /// on Unix listeners, so a restarted receiver can rebind immediately.
    pub fn bind(port: u16, dest_dir: &Path, timeout: Duration) -> Result<Receiver> {
        let listener = TcpListener::bind(("0.0.0.0", port)).map_err(Error::Net)?;
        Ok(Receiver {
            listener: listener,
            dest_dir: PathBuf::from(dest_dir),
            timeout: timeout,
        })
    }

    /// The port actually bound, useful when the requested port was 0.
    pub fn local_port(&self) -> Result<u16> {
        let addr = self.listener.local_addr().map_err(Error::Net)?;
        Ok(addr.port())
    }

    /// Accept and serve clients forever.
    ///
    /// A failed accept or a failed connection is reported and the loop goes
    /// on; only binding, which already happened, is fatal.
    pub fn serve_forever(&self) -> Result<()> {
        let port = self.local_port()?;
        util::report_ok(&format!("Listening continuously on port {}", port));

        loop {
            match self.serve_one() {
                Ok(()) => {}
                Err(err) => util::report_err(&err.to_string()),
            }
            util::report_ok("Waiting for new connection...");
        }
    }

    /// Accept one connection and serve it to completion.
    pub fn serve_one(&self) -> Result<()> {
        let (stream, peer) = self.listener.accept().map_err(Error::Net)?;
        util::report_ok(&format!("Accepted connection from {}", peer));
        self.handle_client(stream)
    }

    fn handle_client(&self, stream: TcpStream) -> Result<()> {
        // Timeouts go on before the first blocking read; a stalled client
        // must not be able to park the receiver.
        stream.set_read_timeout(Some(self.timeout)).map_err(Error::Net)?;
        stream.set_write_timeout(Some(self.timeout)).map_err(Error::Net)?;

        // A non-destructive peek: the dispatched handler re-reads these
        // same bytes.
        let mut prefix = [0_u8; 8];
        let n = stream.peek(&mut prefix).map_err(Error::Net)?;

        if n >= DELETE_PREFIX.len() && prefix.starts_with(DELETE_PREFIX) {
            self.handle_delete(stream)
        } else {
            self.handle_transfer(stream)
        }
    }

    /// Serve a `DELETE <path>` request line.
    ///
    /// The reply is `OK\n` when the file was removed and `ERROR: <reason>\n`
    /// otherwise. Either way the request was served; a failed removal is the
    /// client's problem, not a connection failure.
    fn handle_delete(&self, mut stream: TcpStream) -> Result<()> {
        let mut line = Vec::new();
        let mut byte = [0_u8; 1];
        loop {
            let n = stream.read(&mut byte).map_err(Error::Net)?;
            if n == 0 || byte[0] == b'\n' {
                break
            }
            if line.len() == MAX_REQUEST_LINE_LEN {
                return Err(Error::FilenameTooLong)
            }
            line.push(byte[0]);
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        // The peek guaranteed the prefix; the slice below cannot miss.
        let path_bytes = &line[DELETE_PREFIX.len()..];
        if path_bytes.is_empty() {
            stream.write_all(b"ERROR: no path given\n").map_err(Error::Net)?;
            return Ok(())
        }

        // The path is used as the client sent it; a relative one resolves
        // against the destination directory, which is what the working
        // directory is for a receiver started in place.
        let requested = Path::new(OsStr::from_bytes(path_bytes));
        let target = if requested.is_absolute() {
            PathBuf::from(requested)
        } else {
            self.dest_dir.join(requested)
        };

        match fs::remove_file(&target) {
            Ok(()) => {
                util::report_ok(&format!("Deleted {}", target.display()));
                stream.write_all(b"OK\n").map_err(Error::Net)?;
            }
            Err(err) => {
                util::report_err(&format!("Could not delete {}: {}", target.display(), err));
                let reply = format!("ERROR: {}\n", err);
                stream.write_all(reply.as_bytes()).map_err(Error::Net)?;
            }
        }

        Ok(())
    }

    /// Serve a signed transfer frame.
    fn handle_transfer(&self, mut stream: TcpStream) -> Result<()> {
        let header = frame::read_header(&mut stream)?;

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let artifact = self.dest_dir.join(artifact_name(&header.filename, &timestamp));

        // From here on, every early return drops the guard and removes the
        // partial file; only a verified artifact survives.
        let guard = FileGuard::new(&artifact);

        let mut total = 0_u64;
        {
            let mut f = io::BufWriter::new(fs::File::create(&artifact)?);
            let mut buf = vec![0_u8; NET_BUF_LEN];
            loop {
                let n = stream.read(&mut buf).map_err(Error::Net)?;
                if n == 0 { break }
                f.write_all(&buf[..n])?;
                total += n as u64;
            }
            f.flush()?;
        }

        util::report_ok(&format!(
            "Received {} bytes into {}",
            total,
            artifact.display()
        ));

        // Hash what reached the disk, not what crossed the wire: this is
        // the only check that also catches local write corruption.
        let artifact_digest = digest::hash_file(&artifact)?;

        if !key::verify_digest(&header.public_key, &artifact_digest, &header.signature) {
            return Err(Error::Mismatch)
        }

        guard.commit();
        util::report_ok("Signature is valid. Transfer complete.");

        Ok(())
    }
}

/// The on-disk name for an incoming file: `<stem>_<timestamp><ext>`.
///
/// Stem and extension come from the sender's filename; any directory prefix
/// a hostile sender smuggles in is discarded along the way, so the artifact
/// always lands flat in the destination directory. Two transfers of the
/// same name within one second collide and the later one wins.
fn artifact_name(filename: &[u8], timestamp: &str) -> OsString {
    let original = Path::new(OsStr::from_bytes(filename));
    let stem = original.file_stem().unwrap_or(OsStr::from_bytes(filename));

    let mut name = OsString::from(stem);
    name.push("_");
    name.push(timestamp);
    if let Some(ext) = original.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}
