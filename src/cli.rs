// Pack -- Authenticated file transfer.
// Copyright 2026 The Pack Authors.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Command-line argument parser.
//!
//! There do exist Rust libraries for this, but they either bring along too
//! many dependencies, or they only support flags and not commands. And even
//! then, a command line parser is of limited help: validation and
//! interaction between flags still involves a lot of probing the "parsed"
//! flags. So rather than using an external parser, this module provides a
//! light abstraction `ArgIter` to deal with the distinction between long and
//! short flags, and arguments, and a handwritten parser/validator on top
//! based mostly on pattern matching.

use std::fmt;
use std::vec;

/// The port used by `recv` and `sync` when none is given.
pub const DEFAULT_PORT: u16 = 8080;

const VERSION: &'static str = "1.0.0";

const USAGE: &'static str = "
Pack -- Authenticated file transfer.

Usage:
  pack <command> [<args>...]
  pack -h | --help
  pack --version

Commands:
  keygen       Generate the identity key pair.
  send         Send a file or directory to a receiver.
  send-pubkey  Send the public key file to a receiver.
  recv         Receive transfers and delete requests on a port.
  delete       Delete a file on a remote receiver.
  sync         Send a directory to a receiver.
  encode       Encode a binary file to hex.
  decode       Decode a hex file back to binary.
  verify       Check that a file survives a hex round trip.

Options:
  -h --help  Show this screen, or help about a command.
  --version  Show version.

See 'pack <command> --help' for information on a specific command.
";

const USAGE_KEYGEN: &'static str = "
pack keygen -- Generate the identity key pair.

Usage:
  pack keygen

Writes the secret key to ~/.pack/id_ed25519 (64 raw bytes) and the public
key to ~/.pack/id_ed25519.pub (32 raw bytes). Refuses to overwrite an
existing pair.
";

const USAGE_SEND: &'static str = "
pack send -- Send a file or directory to a receiver.

Usage:
  pack send <path> <host:port>

Arguments:
  <path>       File or directory to send. For a directory, every regular
               file under it is sent, except those matching a pattern in
               <path>/.packignore.
  <host:port>  The listening receiver.
";

const USAGE_SEND_PUBKEY: &'static str = "
pack send-pubkey -- Send the public key file to a receiver.

Usage:
  pack send-pubkey <host:port>
";

const USAGE_RECV: &'static str = "
pack recv -- Receive transfers and delete requests on a port.

Usage:
  pack recv [<port>]

Arguments:
  <port>  Port to listen on. Defaults to 8080.
";

const USAGE_DELETE: &'static str = "
pack delete -- Delete a file on a remote receiver.

Usage:
  pack delete <path> <host> <port>
";

const USAGE_SYNC: &'static str = "
pack sync -- Send a directory to a receiver.

Usage:
  pack sync <dir> [<host>[:<port>]]

Arguments:
  <dir>   Directory to send, .packignore applied.
  <host>  Destination host, port 8080 unless given. Defaults to 127.0.0.1.
";

const USAGE_ENCODE: &'static str = "
pack encode -- Encode a binary file to hex.

Usage:
  pack encode <input> <output.hex>
";

const USAGE_DECODE: &'static str = "
pack decode -- Decode a hex file back to binary.

Usage:
  pack decode <input.hex> <output>
";

const USAGE_VERIFY: &'static str = "
pack verify -- Check that a file survives a hex round trip.

Usage:
  pack verify <input> <scratch.hex>

Encodes <input> to <scratch.hex>, decodes that again, and compares the
BLAKE3 digests of the input and the round-tripped copy.
";

#[derive(Debug, Eq, PartialEq)]
pub enum Cmd {
    KeyGen,
    Send { path: String, host: String, port: u16 },
    SendPubkey { host: String, port: u16 },
    Recv { port: u16 },
    Delete { path: String, host: String, port: u16 },
    Sync { dir: String, host: String, port: u16 },
    Encode { input: String, output: String },
    Decode { input: String, output: String },
    Verify { input: String, scratch: String },
    Help(String),
    Version,
}

pub fn print_usage(cmd: String) {
    // Slice usage strings from 1, to cut off the initial newline.
    match &cmd[..] {
        "pack" => print!("{}", &USAGE[1..]),
        "keygen" => print!("{}", &USAGE_KEYGEN[1..]),
        "send" => print!("{}", &USAGE_SEND[1..]),
        "send-pubkey" => print!("{}", &USAGE_SEND_PUBKEY[1..]),
        "recv" => print!("{}", &USAGE_RECV[1..]),
        "delete" => print!("{}", &USAGE_DELETE[1..]),
        "sync" => print!("{}", &USAGE_SYNC[1..]),
        "encode" => print!("{}", &USAGE_ENCODE[1..]),
        "decode" => print!("{}", &USAGE_DECODE[1..]),
        "verify" => print!("{}", &USAGE_VERIFY[1..]),
        _ => println!("'{}' is not a Pack command. See 'pack --help'.", cmd),
    }
}

pub fn print_version() {
    println!("{}", VERSION);
}

enum Arg<T> {
    Plain(T),
    Short(T),
    Long(T),
}

impl Arg<String> {
    fn as_ref(&self) -> Arg<&str> {
        match *self {
            Arg::Plain(ref x) => Arg::Plain(&x[..]),
            Arg::Short(ref x) => Arg::Short(&x[..]),
            Arg::Long(ref x) => Arg::Long(&x[..]),
        }
    }

    fn into_string(self) -> String {
        match self {
            Arg::Plain(x) => x,
            Arg::Short(x) => x,
            Arg::Long(x) => x,
        }
    }
}

impl fmt::Display for Arg<String> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Arg::Plain(ref x) => write!(f, "{}", x),
            Arg::Short(ref x) => write!(f, "-{}", x),
            Arg::Long(ref x) => write!(f, "--{}", x),
        }
    }
}

struct ArgIter {
    /// Underlying args iterator.
    args: vec::IntoIter<String>,

    /// Whether we have observed a `--` argument.
    is_raw: bool,

    /// Leftover to return after an `--foo=bar` or `-fbar`-style argument.
    ///
    /// `--foo=bar` is returned as `Long(foo)` followed by `Plain(bar)`.
    /// `-fbar` is returned as `Short(f)` followed by `Plain(bar)`.
    leftover: Option<String>,
}

impl ArgIter {
    pub fn new(args: Vec<String>) -> ArgIter {
        ArgIter {
            args: args.into_iter(),
            is_raw: false,
            leftover: None,
        }
    }
}

impl Iterator for ArgIter {
    type Item = Arg<String>;

    fn next(&mut self) -> Option<Arg<String>> {
        if self.leftover.is_some() {
            return self.leftover.take().map(Arg::Plain)
        }

        let arg = self.args.next()?;

        if self.is_raw {
            return Some(Arg::Plain(arg))
        }

        if &arg == "--" {
            self.is_raw = true;
            return self.next()
        }

        if arg.starts_with("--") {
            let mut flag = String::from(&arg[2..]);
            if let Some(i) = flag.find('=') {
                self.leftover = Some(flag.split_off(i + 1));
                flag.truncate(i);
            }
            return Some(Arg::Long(flag))
        }

        if arg.starts_with("-") && &arg != "-" {
            let mut flag = String::from(&arg[1..]);
            if flag.len() > 1 {
                self.leftover = Some(flag.split_off(1));
                flag.truncate(1);
            }
            return Some(Arg::Short(flag))
        }

        Some(Arg::Plain(arg))
    }
}

/// Split `host:port`, insisting on both parts.
fn parse_host_port(dest: &str) -> Result<(String, u16), String> {
    let n = match dest.find(':') {
        Some(n) => n,
        None => {
            return Err(format!("Invalid destination '{}'. Use <host>:<port>.", dest))
        }
    };

    let host = &dest[..n];
    if host.is_empty() {
        return Err(format!("Invalid destination '{}'. The host is empty.", dest))
    }

    parse_port(&dest[n + 1..]).map(|port| (String::from(host), port))
}

fn parse_port(port: &str) -> Result<u16, String> {
    match port.parse::<u16>() {
        Ok(p) => Ok(p),
        Err(..) => Err(format!("Invalid port number '{}'.", port)),
    }
}

pub fn parse(argv: Vec<String>) -> Result<Cmd, String> {
    let mut args = ArgIter::new(argv);

    // Skip executable name.
    args.next();

    let arg = match args.next() {
        Some(a) => a,
        None => return Err("No command provided. See --help.".to_string()),
    };

    match arg.as_ref() {
        Arg::Plain("keygen") => parse_keygen(args),
        Arg::Plain("send") => parse_send(args),
        Arg::Plain("send-pubkey") => parse_send_pubkey(args),
        Arg::Plain("recv") => parse_recv(args),
        Arg::Plain("delete") => parse_delete(args),
        Arg::Plain("sync") => parse_sync(args),
        Arg::Plain("encode") => parse_two_paths(args, "encode"),
        Arg::Plain("decode") => parse_two_paths(args, "decode"),
        Arg::Plain("verify") => parse_two_paths(args, "verify"),
        Arg::Plain("help") => parse_help(args),
        Arg::Plain("version") | Arg::Long("version") => drain(args).and(Ok(Cmd::Version)),
        Arg::Short("h") | Arg::Long("help") => parse_help(args),
        _ => unexpected(arg),
    }
}

fn parse_keygen(mut args: ArgIter) -> Result<Cmd, String> {
    while let Some(arg) = args.next() {
        match arg.as_ref() {
            Arg::Short("h") | Arg::Long("help") => return drain_help(args, "keygen"),
            _ => return unexpected(arg),
        }
    }
    Ok(Cmd::KeyGen)
}

fn parse_send(mut args: ArgIter) -> Result<Cmd, String> {
    let mut path = None;
    let mut destination = None;

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            Arg::Short("h") | Arg::Long("help") => return drain_help(args, "send"),
            Arg::Plain(..) if path.is_none() => path = Some(arg.into_string()),
            Arg::Plain(..) if destination.is_none() => destination = Some(arg.into_string()),
            _ => return unexpected(arg),
        }
    }

    let msg = "Path not provided. See 'pack send --help' for usage.";
    let path = path.ok_or(msg.to_string())?;

    let msg = "Destination not provided. See 'pack send --help' for usage.";
    let destination = destination.ok_or(msg.to_string())?;
    let (host, port) = parse_host_port(&destination)?;

    Ok(Cmd::Send {
        path: path,
        host: host,
        port: port,
    })
}

fn parse_send_pubkey(mut args: ArgIter) -> Result<Cmd, String> {
    let mut destination = None;

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            Arg::Short("h") | Arg::Long("help") => return drain_help(args, "send-pubkey"),
            Arg::Plain(..) if destination.is_none() => destination = Some(arg.into_string()),
            _ => return unexpected(arg),
        }
    }

    let msg = "Destination not provided. See 'pack send-pubkey --help' for usage.";
    let destination = destination.ok_or(msg.to_string())?;
    let (host, port) = parse_host_port(&destination)?;

    Ok(Cmd::SendPubkey {
        host: host,
        port: port,
    })
}

fn parse_recv(mut args: ArgIter) -> Result<Cmd, String> {
    let mut port = None;

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            Arg::Short("h") | Arg::Long("help") => return drain_help(args, "recv"),
            Arg::Plain(p) if port.is_none() => port = Some(parse_port(p)?),
            _ => return unexpected(arg),
        }
    }

    Ok(Cmd::Recv {
        port: port.unwrap_or(DEFAULT_PORT),
    })
}

fn parse_delete(mut args: ArgIter) -> Result<Cmd, String> {
    let mut plain = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            Arg::Short("h") | Arg::Long("help") => return drain_help(args, "delete"),
            Arg::Plain(..) if plain.len() < 3 => plain.push(arg.into_string()),
            _ => return unexpected(arg),
        }
    }

    if plain.len() != 3 {
        let msg = "Expected <path> <host> <port>. See 'pack delete --help' for usage.";
        return Err(msg.to_string())
    }

    let port = parse_port(&plain[2])?;
    let host = plain.swap_remove(1);
    let path = plain.swap_remove(0);

    Ok(Cmd::Delete {
        path: path,
        host: host,
        port: port,
    })
}

fn parse_sync(mut args: ArgIter) -> Result<Cmd, String> {
    let mut dir = None;
    let mut destination = None;

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            Arg::Short("h") | Arg::Long("help") => return drain_help(args, "sync"),
            Arg::Plain(..) if dir.is_none() => dir = Some(arg.into_string()),
            Arg::Plain(..) if destination.is_none() => destination = Some(arg.into_string()),
            _ => return unexpected(arg),
        }
    }

    let msg = "Directory not provided. See 'pack sync --help' for usage.";
    let dir = dir.ok_or(msg.to_string())?;

    // A bare host gets the default port; host:port is accepted as well.
    let (host, port) = match destination {
        None => (String::from("127.0.0.1"), DEFAULT_PORT),
        Some(ref dest) if dest.contains(':') => parse_host_port(dest)?,
        Some(dest) => (dest, DEFAULT_PORT),
    };

    Ok(Cmd::Sync {
        dir: dir,
        host: host,
        port: port,
    })
}

/// Shared parser for the `encode`, `decode`, and `verify` commands, which
/// all take an input path and an output path.
fn parse_two_paths(mut args: ArgIter, cmd: &'static str) -> Result<Cmd, String> {
    let mut first = None;
    let mut second = None;

    while let Some(arg) = args.next() {
        match arg.as_ref() {
            Arg::Short("h") | Arg::Long("help") => return drain_help(args, cmd),
            Arg::Plain(..) if first.is_none() => first = Some(arg.into_string()),
            Arg::Plain(..) if second.is_none() => second = Some(arg.into_string()),
            _ => return unexpected(arg),
        }
    }

    let msg = format!("Expected <input> and <output>. See 'pack {} --help' for usage.", cmd);
    let first = first.ok_or(msg.clone())?;
    let second = second.ok_or(msg)?;

    Ok(match cmd {
        "encode" => Cmd::Encode { input: first, output: second },
        "decode" => Cmd::Decode { input: first, output: second },
        "verify" => Cmd::Verify { input: first, scratch: second },
        _ => unreachable!("parse_two_paths is called for fixed command names."),
    })
}

fn parse_help(mut args: ArgIter) -> Result<Cmd, String> {
    match args.next() {
        Some(Arg::Plain(cmd)) => drain(args).and(Ok(Cmd::Help(cmd))),
        Some(arg) => unexpected(arg),
        None => Ok(Cmd::Help("pack".to_string())),
    }
}

fn drain_help(args: ArgIter, cmd: &'static str) -> Result<Cmd, String> {
    drain(args).and(Ok(Cmd::Help(cmd.to_string())))
}

fn drain(args: ArgIter) -> Result<(), String> {
    for arg in args {
        return unexpected::<()>(arg);
    }

    Ok(())
}

fn unexpected<T>(arg: Arg<String>) -> Result<T, String> {
    Err(format!("Unexpected argument '{}'. See 'pack --help'.", arg))
}
