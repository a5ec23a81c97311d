// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The sending side: hash, sign, connect, stream.

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::time::Duration;

use ed25519_compact::KeyPair;

use digest;
use error::{Error, Result};
use frame;
use key;
use util;
use util::NET_BUF_LEN;
use walk::{IgnoreList, Walker};

/// Resolve `host:port` to the first usable socket address.
pub fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(..) => return Err(Error::BadAddress(format!("{}:{}", host, port))),
    };
    addrs.next().ok_or(Error::BadAddress(format!("{}:{}", host, port)))
}

/// Send one file as a signed transfer.
///
/// Hashes the file, signs the digest with the caller's identity, connects,
/// writes the frame header, then streams the payload in bounded chunks.
/// Closing the socket is what tells the receiver the payload is complete,
/// so success here means "handed to the network in full", not "verified on
/// the other side"; the receiver decides that on its own.
pub fn send_file(
    path: &Path,
    host: &str,
    port: u16,
    pair: &KeyPair,
    timeout: Duration,
) -> Result<()> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.display().to_string()))
    }

    // The wire carries the final path component only. The receiver's
    // filesystem is intentionally flat; never give it a directory prefix to
    // interpret.
    let msg = "Path has no filename component.";
    let filename = path.file_name().ok_or(Error::Operation(msg))?;

    let file_digest = digest::hash_file(path)?;
    let signature = key::sign_digest(&pair.sk, &file_digest);

    let addr = resolve(host, port)?;
    let mut stream = TcpStream::connect_timeout(&addr, timeout).map_err(Error::Net)?;
    stream.set_write_timeout(Some(timeout)).map_err(Error::Net)?;

    frame::write_header(&mut stream, &pair.pk, &signature, filename.as_bytes())?;

    let mut f = fs::File::open(path)?;
    let mut buf = vec![0_u8; NET_BUF_LEN];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 { break }
        stream.write_all(&buf[..n]).map_err(Error::Net)?;
    }

    // Dropping the stream closes it; the half-close is the end-of-payload
    // marker the receiver waits for.
    Ok(())
}

/// Send every regular file under a directory, `.packignore` applied.
///
/// A failed file does not stop the traversal; the remaining files still get
/// their chance. The error reported at the end is the first one that
/// occurred.
pub fn send_directory(
    dir: &Path,
    host: &str,
    port: u16,
    pair: &KeyPair,
    timeout: Duration,
) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::InputNotFound(dir.display().to_string()))
    }

    let ignore = IgnoreList::load(dir)?;

    let mut first_error = None;
    for item in Walker::new(dir, ignore)? {
        let (absolute, relative) = match item {
            Ok(paths) => paths,
            Err(err) => {
                util::report_err("Failed to read a directory entry.");
                if first_error.is_none() {
                    first_error = Some(err);
                }
                continue
            }
        };

        util::report_ok(&format!("Sending file: {}", relative.display()));
        match send_file(&absolute, host, port, pair, timeout) {
            Ok(()) => {}
            Err(err) => {
                util::report_err(&format!("Failed to send: {}", relative.display()));
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    match first_error {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

/// Transmit the caller's public key file as an ordinary signed transfer.
pub fn send_pubkey(host: &str, port: u16, pair: &KeyPair, timeout: Duration) -> Result<()> {
    let path = key::public_key_path()?;
    send_file(&path, host, port, pair, timeout)
}
