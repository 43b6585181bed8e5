//! Parsing of request arguments (`r:ADDR`, `w:ADDR=DATA`).

use cachesim_core::{AccessKind, Word};
use serde::Serialize;

/// A request given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Request {
    pub kind: AccessKind,
    pub address: u64,
    pub data: Option<Word>,
}

/// Parses a decimal or `0x`-prefixed hex number.
pub fn parse_number(text: &str) -> Result<u64, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid number '{text}': {e}"))
}

/// Parses `r:ADDR` or `w:ADDR=DATA`. `w:ADDR` without data writes zero.
pub fn parse_request(text: &str) -> Result<Request, String> {
    let (op, rest) = text
        .split_once(':')
        .ok_or_else(|| format!("expected r:ADDR or w:ADDR=DATA, got '{text}'"))?;

    match op.to_ascii_lowercase().as_str() {
        "r" | "read" => Ok(Request {
            kind: AccessKind::Read,
            address: parse_number(rest)?,
            data: None,
        }),
        "w" | "write" => {
            let (address, data) = match rest.split_once('=') {
                Some((addr, value)) => (parse_number(addr)?, Some(parse_number(value)?)),
                None => (parse_number(rest)?, None),
            };
            Ok(Request {
                kind: AccessKind::Write,
                address,
                data,
            })
        }
        other => Err(format!("unknown operation '{other}' (use r or w)")),
    }
}
