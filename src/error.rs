// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Errors that Pack can encounter.

use std::error;
use std::fmt;
use std::io;
use std::result;

use ed25519_compact;

#[derive(Debug)]
pub enum Error {
    /// A requested file or directory is absent before any I/O starts.
    InputNotFound(String),

    /// Local filesystem or process-environment failure.
    Io(io::Error),

    /// An operational error occurred.
    Operation(&'static str),

    /// A key file does not have the expected size.
    KeyLength { expected: usize, actual: usize },

    /// Key bytes were rejected by the signature library.
    InvalidKeyData,

    /// The receiver answered a delete request with an error reply.
    Remote(String),

    /// Digest or signature verification failed.
    Mismatch,

    /// Socket-level failure: connect, send, recv, accept, or timeout.
    Net(io::Error),

    /// The destination could not be parsed or resolved as `host:port`.
    BadAddress(String),

    /// A transfer frame started with a NUL filename byte.
    EmptyFilename,

    /// The connection ended inside a fixed-size frame field.
    ShortFrame,

    /// The filename field exceeded the bound the receiver enforces.
    FilenameTooLong,

    /// Hexadecimal input could not be decoded.
    InvalidHex(&'static str),
}

impl Error {
    /// The process exit code for this error.
    ///
    /// 2 input not found, 3 system error, 4 mismatch, 6 network error. The
    /// values match the status constants the wire peers report; 0 is success
    /// and 5 is reserved for command-line usage errors, which the parser
    /// reports as strings rather than through this type. Connection-scoped
    /// framing errors fold into the network code.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::InputNotFound(..) => 2,
            Error::Io(..) => 3,
            Error::Operation(..) => 3,
            Error::KeyLength { .. } => 3,
            Error::InvalidKeyData => 3,
            Error::Remote(..) => 3,
            Error::InvalidHex(..) => 3,
            Error::Mismatch => 4,
            Error::Net(..) => 6,
            Error::BadAddress(..) => 6,
            Error::EmptyFilename => 6,
            Error::ShortFrame => 6,
            Error::FilenameTooLong => 6,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InputNotFound(ref path) => {
                write!(f, "Input not found: {}", path)
            }
            Error::Io(ref err) => {
                write!(f, "IO error: {}", err)
            }
            Error::Operation(msg) => {
                write!(f, "{}", msg)
            }
            Error::KeyLength { expected, actual } => {
                write!(f, "Key file is {} bytes, expected exactly {}.", actual, expected)
            }
            Error::InvalidKeyData => {
                write!(f, "Key file does not contain a valid Ed25519 key.")
            }
            Error::Remote(ref reply) => {
                write!(f, "Receiver reported: {}", reply)
            }
            Error::Mismatch => {
                write!(f, "Digest verification failed.")
            }
            Error::Net(ref err) => {
                write!(f, "Network error: {}", err)
            }
            Error::BadAddress(ref addr) => {
                write!(f, "Invalid destination '{}'. Use <host>:<port>.", addr)
            }
            Error::EmptyFilename => {
                write!(f, "Peer sent a frame with an empty filename.")
            }
            Error::ShortFrame => {
                write!(f, "Connection closed inside the frame header.")
            }
            Error::FilenameTooLong => {
                write!(f, "Peer sent a filename longer than the receiver accepts.")
            }
            Error::InvalidHex(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ed25519_compact::Error> for Error {
    fn from(_: ed25519_compact::Error) -> Error {
        Error::InvalidKeyData
    }
}

pub type Result<T> = result::Result<T, Error>;
