// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! One-shot client for removing a file on a remote receiver.
//!
//! The dialogue is a single text line each way, multiplexed onto the same
//! port as transfers: `DELETE <path>\r\n` out, `OK\n` or `ERROR: <reason>\n`
//! back. The receiver tells the two protocols apart by the request prefix.

use std::io;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use error::{Error, Result};
use send;

/// Ask the receiver at `host:port` to remove `path`.
pub fn delete_remote(path: &str, host: &str, port: u16, timeout: Duration) -> Result<()> {
    let addr = send::resolve(host, port)?;
    let mut stream = TcpStream::connect_timeout(&addr, timeout).map_err(Error::Net)?;
    stream.set_write_timeout(Some(timeout)).map_err(Error::Net)?;
    stream.set_read_timeout(Some(timeout)).map_err(Error::Net)?;

    let request = format!("DELETE {}\r\n", path);
    stream.write_all(request.as_bytes()).map_err(Error::Net)?;

    let mut reply = [0_u8; 128];
    let n = stream.read(&mut reply).map_err(Error::Net)?;
    if n == 0 {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "receiver closed without a reply");
        return Err(Error::Net(err))
    }

    let reply = &reply[..n];
    if reply.starts_with(b"OK") {
        Ok(())
    } else {
        let reason = String::from_utf8_lossy(reply).trim_end().to_string();
        Err(Error::Remote(reason))
    }
}
