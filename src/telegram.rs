// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

//! Telegram decoder.
//!
//! A telegram is one line of the M1 ASCII protocol:
//!
//! ```text
//! [0,2)       [2,4)         [4, N-2)   [N-2, N)
//! hex length  command code  payload    not interpreted
//! ```
//!
//! The decoder never validates the checksum and never fails. A malformed
//! line produces an envelope with whatever fields could be read.

use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_MESSAGE;
use crate::dispatch::extractor_for;
use crate::message::{char_slice, parse_leading_hex, MessageData};
use crate::tables::LookupTables;

/// Which side of the link a command code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    FromPanel,
    ToPanel,
}

impl Direction {
    /// Codes whose first character has no lowercase form are sent by the
    /// panel. Digits and punctuation count as uppercase.
    pub fn of(command_code: &str) -> Option<Direction> {
        let mut chars = command_code.chars();
        let first = chars.next()?;
        if chars.count() != 1 {
            return None;
        }
        if first.to_uppercase().eq(std::iter::once(first)) {
            Some(Direction::FromPanel)
        } else {
            Some(Direction::ToPanel)
        }
    }
}

/// Generic decoded shell of a telegram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub command_code: String,
    pub raw_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub label: String,
    pub payload: String,
    pub data: MessageData,
}

/// Decode one line (terminators included) into an envelope.
pub fn decode(line: &str, tables: &LookupTables) -> Envelope {
    let command_code = char_slice(line, 2, 4);
    let char_count = line.chars().count();

    let length = parse_leading_hex(&char_slice(line, 0, 2)).filter(|len| *len > 0);
    let direction = Direction::of(&command_code);
    let label = tables
        .command_label(&command_code)
        .unwrap_or(UNKNOWN_MESSAGE)
        .to_string();
    let payload = char_slice(line, 4, char_count.saturating_sub(2));
    let data = extractor_for(&command_code)
        .map(|extract| extract(&payload, tables))
        .unwrap_or_default();

    Envelope {
        raw_line: line.chars().filter(|c| *c != '\r' && *c != '\n').collect(),
        command_code,
        length,
        direction,
        label,
        payload,
        data,
    }
}
