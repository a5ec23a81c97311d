// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Implementations of hexadecimal formatting.
//!
//! Backs the `encode` and `decode` commands, and the hex rendering of
//! digests and public keys elsewhere. Encoding is always lowercase; decoding
//! accepts both cases.

use std::fs;
use std::io;
use std::io::{Read, Write};
use std::path::Path;

use error::{Error, Result};
use util::FILE_BUF_LEN;

const HEX_CHARS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// String-format bytes as lowercase hexadecimal, append to the string.
pub fn append_hex(string: &mut String, bytes: &[u8]) {
    for &b in bytes {
        string.push(HEX_CHARS[(b >> 4) as usize]);
        string.push(HEX_CHARS[(b & 0xf) as usize]);
    }
}

/// String-format bytes as lowercase hexadecimal.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    append_hex(&mut s, bytes);
    s
}

/// Parse one hexadecimal digit, either case, return its value.
fn decode_hex_nibble(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(10 + (ch - b'a')),
        b'A'..=b'F' => Some(10 + (ch - b'A')),
        _ => None,
    }
}

/// Decode a full hexadecimal string into bytes.
pub fn decode_hex(hex: &[u8]) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(Error::InvalidHex("Hex input length is odd."))
    }
    let mut out = Vec::with_capacity(hex.len() / 2);
    for pair in hex.chunks(2) {
        let err = Error::InvalidHex("Invalid hex digit.");
        let high = decode_hex_nibble(pair[0]).ok_or(err)?;
        let err = Error::InvalidHex("Invalid hex digit.");
        let low = decode_hex_nibble(pair[1]).ok_or(err)?;
        out.push((high << 4) | low);
    }
    Ok(out)
}

/// Read until the buffer is full or the stream ends, return the byte count.
///
/// `Read::read` may return short counts; decoding needs full buffers so that
/// only the final chunk of a stream can have an odd length.
fn read_full<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = input.read(&mut buf[filled..])?;
        if n == 0 { break }
        filled += n;
    }
    Ok(filled)
}

/// Encode a binary file as a lowercase hex text file.
pub fn encode_hex_file(input: &Path, output: &Path) -> Result<()> {
    let mut ifs = fs::File::open(input)?;
    let mut ofs = io::BufWriter::new(fs::File::create(output)?);

    let mut buf = vec![0_u8; FILE_BUF_LEN];
    let mut hex = String::with_capacity(FILE_BUF_LEN * 2);
    loop {
        let n = ifs.read(&mut buf)?;
        if n == 0 { break }
        hex.clear();
        append_hex(&mut hex, &buf[..n]);
        ofs.write_all(hex.as_bytes())?;
    }
    ofs.flush()?;

    Ok(())
}

/// Decode a hex text file back into a binary file.
pub fn decode_hex_file(input: &Path, output: &Path) -> Result<()> {
    let mut ifs = fs::File::open(input)?;
    let mut ofs = io::BufWriter::new(fs::File::create(output)?);

    // Read in even-sized chunks; `read_full` guarantees that a short chunk
    // only happens at the end of the stream, so an odd count is a malformed
    // input rather than an unlucky read boundary.
    let mut hex = vec![0_u8; FILE_BUF_LEN * 2];
    loop {
        let n = read_full(&mut ifs, &mut hex)?;
        if n == 0 { break }
        let bytes = decode_hex(&hex[..n])?;
        ofs.write_all(&bytes)?;
        if n < hex.len() { break }
    }
    ofs.flush()?;

    Ok(())
}
