// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use crate::message::{
    extract_alarm_report, extract_arming_status, extract_invalid_user_code,
    extract_keypad_change, extract_zone_change, MessageData,
};
use crate::tables::LookupTables;

/// A field extractor: builds a typed record from a telegram payload.
pub type Extractor = fn(&str, &LookupTables) -> MessageData;

/// Command codes with a registered field extractor. Any other code decodes
/// to an envelope with empty data.
pub const EXTRACTORS: &[(&str, Extractor)] = &[
    ("AR", extract_alarm_report),
    ("AS", extract_arming_status),
    ("IC", extract_invalid_user_code),
    ("KC", extract_keypad_change),
    ("ZC", extract_zone_change),
];

/// Find the extractor registered for a command code. Codes are case
/// sensitive: `zc` is a different message from `ZC`.
pub fn extractor_for(command_code: &str) -> Option<Extractor> {
    EXTRACTORS
        .iter()
        .find(|(code, _)| *code == command_code)
        .map(|(_, extractor)| *extractor)
}
