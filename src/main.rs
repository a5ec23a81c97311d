// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

extern crate blake3;
extern crate chrono;
extern crate ed25519_compact;

#[cfg(test)]
extern crate tempfile;

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use ed25519_compact::KeyPair;

mod cli;
mod delete;
mod digest;
mod error;
mod format;
mod frame;
mod key;
mod recv;
mod send;
mod util;
mod walk;

use cli::Cmd;
use error::{Error, Result};
use util::DEFAULT_TIMEOUT;

/// Exit code for malformed command lines; the parser reports those as
/// strings, all other codes come from `Error::exit_code`.
const USAGE_ERROR: i32 = 5;

/// Load the identity from its files under `$HOME/.pack`.
fn load_identity() -> Result<KeyPair> {
    let pub_path = key::public_key_path()?;
    let sec_path = key::secret_key_path()?;
    if !pub_path.is_file() || !sec_path.is_file() {
        let msg = "No identity found. Run 'pack keygen' first.";
        return Err(Error::Operation(msg))
    }
    key::load(&pub_path, &sec_path)
}

fn run_keygen() -> Result<()> {
    let dir = key::key_dir()?;
    if !dir.is_dir() {
        fs::create_dir_all(&dir)?;
    }

    let pub_path = key::public_key_path()?;
    let sec_path = key::secret_key_path()?;
    if pub_path.exists() || sec_path.exists() {
        let msg = "A key pair exists already; refusing to overwrite it.";
        return Err(Error::Operation(msg))
    }

    let pair = key::generate();
    key::save(&pair, &pub_path, &sec_path)?;

    util::report_ok(&format!("Wrote secret key to {}", sec_path.display()));
    util::report_ok(&format!("Wrote public key to {}", pub_path.display()));
    util::report_ok(&format!("Public key: {}", format::encode_hex(pair.pk.as_ref())));
    Ok(())
}

fn run_send(path: String, host: String, port: u16) -> Result<()> {
    let pair = load_identity()?;
    let path = Path::new(&path);

    util::report_ok(&format!("Sending {} to {}:{}", path.display(), host, port));
    if path.is_dir() {
        send::send_directory(path, &host, port, &pair, DEFAULT_TIMEOUT)?;
    } else {
        send::send_file(path, &host, port, &pair, DEFAULT_TIMEOUT)?;
    }
    util::report_ok("Sent successfully.");
    Ok(())
}

fn run_send_pubkey(host: String, port: u16) -> Result<()> {
    let pair = load_identity()?;
    send::send_pubkey(&host, port, &pair, DEFAULT_TIMEOUT)?;
    util::report_ok("Public key sent.");
    Ok(())
}

fn run_recv(port: u16) -> Result<()> {
    // Artifacts land in the working directory of the receiver.
    let receiver = recv::Receiver::bind(port, Path::new("."), DEFAULT_TIMEOUT)?;
    receiver.serve_forever()
}

fn run_delete(path: String, host: String, port: u16) -> Result<()> {
    delete::delete_remote(&path, &host, port, DEFAULT_TIMEOUT)?;
    util::report_ok(&format!("Deleted {} on {}:{}", path, host, port));
    Ok(())
}

fn run_sync(dir: String, host: String, port: u16) -> Result<()> {
    let pair = load_identity()?;
    util::report_ok(&format!("Syncing {} to {}:{}", dir, host, port));
    send::send_directory(Path::new(&dir), &host, port, &pair, DEFAULT_TIMEOUT)?;
    util::report_ok("Sync complete.");
    Ok(())
}

fn run_encode(input: String, output: String) -> Result<()> {
    format::encode_hex_file(Path::new(&input), Path::new(&output))?;
    util::report_ok(&format!("Encoded to hex {}", output));
    Ok(())
}

fn run_decode(input: String, output: String) -> Result<()> {
    format::decode_hex_file(Path::new(&input), Path::new(&output))?;
    util::report_ok(&format!("Decoded to binary {}", output));
    Ok(())
}

/// Encode, decode back, and compare digests of the two binary files.
fn run_verify(input: String, scratch: String) -> Result<()> {
    let input = Path::new(&input);
    let scratch = Path::new(&scratch);
    let decoded = scratch.with_extension("dec");

    format::encode_hex_file(input, scratch)?;
    format::decode_hex_file(scratch, &decoded)?;

    let digest_in = digest::hash_file(input)?;
    let digest_out = digest::hash_file(&decoded)?;

    let hex_in = format::encode_hex(digest_in.as_bytes());
    let hex_out = format::encode_hex(digest_out.as_bytes());

    if digest_in == digest_out {
        util::report_ok(&format!("{} == {}", hex_in, hex_out));
        Ok(())
    } else {
        util::report_err(&format!("{} != {}", hex_in, hex_out));
        Err(Error::Mismatch)
    }
}

fn main() {
    let args = env::args().collect();
    let result = match cli::parse(args) {
        Ok(Cmd::KeyGen) => run_keygen(),
        Ok(Cmd::Send { path, host, port }) => run_send(path, host, port),
        Ok(Cmd::SendPubkey { host, port }) => run_send_pubkey(host, port),
        Ok(Cmd::Recv { port }) => run_recv(port),
        Ok(Cmd::Delete { path, host, port }) => run_delete(path, host, port),
        Ok(Cmd::Sync { dir, host, port }) => run_sync(dir, host, port),
        Ok(Cmd::Encode { input, output }) => run_encode(input, output),
        Ok(Cmd::Decode { input, output }) => run_decode(input, output),
        Ok(Cmd::Verify { input, scratch }) => run_verify(input, scratch),
        Ok(Cmd::Help(cmd)) => {
            cli::print_usage(cmd);
            Ok(())
        }
        Ok(Cmd::Version) => {
            cli::print_version();
            Ok(())
        }
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(USAGE_ERROR)
        }
    };

    if let Err(err) = result {
        util::report_err(&err.to_string());
        process::exit(err.exit_code());
    }
}
