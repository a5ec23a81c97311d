// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! The transfer frame: what one connection carries.
//!
//! On the wire a transfer is four sections, concatenated without delimiters:
//!
//! 1. the sender's public key, exactly 32 bytes;
//! 2. a detached Ed25519 signature over the file digest, exactly 64 bytes;
//! 3. the original filename, terminated by a single NUL byte;
//! 4. the payload, until the sender half-closes the connection.
//!
//! There is no trailer, no length field, and no checksum: the lengths of the
//! fixed sections are implied by the cryptographic primitives, the filename
//! by its terminator, and the payload by the connection close. Integrity is
//! established after the fact, by re-hashing what reached the disk.

use std::io;
use std::io::{Read, Write};

use ed25519_compact::{PublicKey, Signature};

use error::{Error, Result};
use key::{PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// Longest filename section the decoder accepts, in bytes before the NUL.
pub const MAX_FILENAME_LEN: usize = 4096;

/// The decoded fixed-size prefix of a transfer.
///
/// The payload is not part of this struct; after `read_header` returns, the
/// reader is positioned at the first payload byte.
pub struct FrameHeader {
    pub public_key: PublicKey,
    pub signature: Signature,

    /// The sender's filename, byte-for-byte as sent, NUL excluded.
    ///
    /// Not assumed to be UTF-8.
    pub filename: Vec<u8>,
}

/// Write the frame header: public key, signature, filename, NUL.
///
/// The filename must be non-empty and free of NUL bytes; path basenames
/// satisfy both by construction.
pub fn write_header<W: Write>(
    out: &mut W,
    public_key: &PublicKey,
    signature: &Signature,
    filename: &[u8],
) -> Result<()> {
    if filename.is_empty() {
        return Err(Error::EmptyFilename)
    }
    debug_assert!(!filename.contains(&0));

    out.write_all(public_key.as_ref()).map_err(Error::Net)?;
    out.write_all(signature.as_ref()).map_err(Error::Net)?;
    out.write_all(filename).map_err(Error::Net)?;
    out.write_all(&[0]).map_err(Error::Net)?;

    Ok(())
}

/// Read one fixed-size field completely, or fail the connection.
///
/// `read_exact` blocks until the full field arrived; a stream that ends
/// inside the field is a short frame, any other failure is a network error.
fn read_field<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<()> {
    match input.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(ref err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(Error::ShortFrame),
        Err(err) => Err(Error::Net(err)),
    }
}

/// Decode a frame header from the start of a stream.
///
/// Reads exactly 32 bytes, then exactly 64, then single bytes up to and
/// including the NUL. Deliberately no read-ahead: the bytes after the NUL
/// are payload and must stay in the stream for the caller.
pub fn read_header<R: Read>(input: &mut R) -> Result<FrameHeader> {
    let mut public_key = [0_u8; PUBLIC_KEY_LEN];
    read_field(input, &mut public_key)?;

    let mut signature = [0_u8; SIGNATURE_LEN];
    read_field(input, &mut signature)?;

    let mut filename = Vec::new();
    loop {
        let mut byte = [0_u8; 1];
        match input.read(&mut byte) {
            Ok(0) => return Err(Error::ShortFrame),
            Ok(..) if byte[0] == 0 => break,
            Ok(..) => {
                if filename.len() == MAX_FILENAME_LEN {
                    return Err(Error::FilenameTooLong)
                }
                filename.push(byte[0]);
            }
            Err(err) => return Err(Error::Net(err)),
        }
    }

    if filename.is_empty() {
        return Err(Error::EmptyFilename)
    }

    Ok(FrameHeader {
        public_key: PublicKey::new(public_key),
        signature: Signature::new(signature),
        filename: filename,
    })
}

#[cfg(test)]
mod test {
    use std::io;
    use std::io::{Cursor, Read};

    use ed25519_compact::{KeyPair, Seed, Signature};

    use error::Error;
    use super::{FrameHeader, MAX_FILENAME_LEN, read_header, write_header};

    fn get_test_key_pair() -> KeyPair {
        let seed = Seed::new(*b"pack-test-key-do-not-use-outside");
        KeyPair::from_seed(seed)
    }

    fn get_test_signature() -> Signature {
        Signature::new([0x17_u8; 64])
    }

    fn encode(filename: &[u8], payload: &[u8]) -> Vec<u8> {
        let pair = get_test_key_pair();
        let mut wire = Vec::new();
        write_header(&mut wire, &pair.pk, &get_test_signature(), filename).unwrap();
        wire.extend_from_slice(payload);
        wire
    }

    fn decode(wire: &[u8]) -> (FrameHeader, Vec<u8>) {
        let mut cursor = Cursor::new(wire);
        let header = read_header(&mut cursor).unwrap();
        let mut payload = Vec::new();
        cursor.read_to_end(&mut payload).unwrap();
        (header, payload)
    }

    /// Yields the wrapped bytes one at a time, like a slow socket.
    struct Trickle<'a> {
        bytes: &'a [u8],
    }

    impl<'a> Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.bytes.is_empty() || buf.is_empty() {
                return Ok(0)
            }
            buf[0] = self.bytes[0];
            self.bytes = &self.bytes[1..];
            Ok(1)
        }
    }

    #[test]
    fn decode_inverts_encode() {
        let wire = encode(b"notes.txt", b"hello world");
        let (header, payload) = decode(&wire);

        assert_eq!(header.public_key.as_ref(), get_test_key_pair().pk.as_ref());
        assert_eq!(header.signature.as_ref(), get_test_signature().as_ref());
        assert_eq!(&header.filename, b"notes.txt");
        assert_eq!(&payload, b"hello world");
    }

    #[test]
    fn decode_handles_empty_payload() {
        let wire = encode(b"empty.bin", b"");
        let (header, payload) = decode(&wire);
        assert_eq!(&header.filename, b"empty.bin");
        assert!(payload.is_empty());
    }

    #[test]
    fn decode_preserves_non_ascii_filename_bytes() {
        let name = b"r\xc3\xa9sum\xc3\xa9 \xff.pdf";
        let wire = encode(name, b"x");
        let (header, ..) = decode(&wire);
        assert_eq!(&header.filename[..], &name[..]);
    }

    #[test]
    fn decode_does_not_depend_on_read_boundaries() {
        let wire = encode(b"notes.txt", b"payload after header");
        let mut trickle = Trickle { bytes: &wire };
        let header = read_header(&mut trickle).unwrap();
        assert_eq!(&header.filename, b"notes.txt");

        let mut payload = Vec::new();
        trickle.read_to_end(&mut payload).unwrap();
        assert_eq!(&payload, b"payload after header");
    }

    #[test]
    fn decode_rejects_truncated_fixed_fields() {
        // Shorter than the 96 bytes of public key plus signature.
        let wire = encode(b"notes.txt", b"");
        for len in [0, 16, 32, 95] {
            match read_header(&mut Cursor::new(&wire[..len])) {
                Err(Error::ShortFrame) => { /* This is expected. */ }
                _ => panic!("{}-byte frame should be a short frame.", len),
            }
        }
    }

    #[test]
    fn decode_rejects_stream_that_ends_before_the_nul() {
        let wire = encode(b"notes.txt", b"");
        // Cut inside the filename, before its terminator.
        let cut = wire.len() - 5;
        match read_header(&mut Cursor::new(&wire[..cut])) {
            Err(Error::ShortFrame) => { /* This is expected. */ }
            _ => panic!("Frame without a filename terminator should be rejected."),
        }
    }

    #[test]
    fn decode_rejects_empty_filename() {
        let pair = get_test_key_pair();
        let mut wire = Vec::new();
        wire.extend_from_slice(pair.pk.as_ref());
        wire.extend_from_slice(get_test_signature().as_ref());
        wire.push(0);

        match read_header(&mut Cursor::new(&wire)) {
            Err(Error::EmptyFilename) => { /* This is expected. */ }
            _ => panic!("Empty filename should be rejected."),
        }
    }

    #[test]
    fn decode_rejects_overlong_filename() {
        let name = vec![b'a'; MAX_FILENAME_LEN + 1];
        let wire = encode(&name, b"");
        match read_header(&mut Cursor::new(&wire)) {
            Err(Error::FilenameTooLong) => { /* This is expected. */ }
            _ => panic!("Overlong filename should be rejected."),
        }
    }

    #[test]
    fn decode_accepts_filename_at_the_bound() {
        let name = vec![b'a'; MAX_FILENAME_LEN];
        let wire = encode(&name, b"");
        let (header, ..) = decode(&wire);
        assert_eq!(header.filename.len(), MAX_FILENAME_LEN);
    }

    #[test]
    fn encode_rejects_empty_filename() {
        let pair = get_test_key_pair();
        let mut wire = Vec::new();
        match write_header(&mut wire, &pair.pk, &get_test_signature(), b"") {
            Err(Error::EmptyFilename) => { /* This is expected. */ }
            _ => panic!("Empty filename should be rejected."),
        }
    }
}
