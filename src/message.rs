// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

//! Typed data records and the field extractors that build them.
//!
//! Every extractor reads from the telegram payload (the text after the
//! command code) with offsets relative to the payload start. Extractors never
//! fail: a short payload yields truncated strings, absent numbers and absent
//! labels.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::constants::UNKNOWN_ALARM_CODE;
use crate::tables::LookupTables;

/// Number of areas reported by an `AS` telegram.
pub const AREA_COUNT: usize = 8;

/// Number of function keys reported by a `KC` telegram.
pub const FUNCTION_KEY_COUNT: usize = 6;

/// Characters `[start, end)` of `s`, clamped to its length.
pub(crate) fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// Lenient integer parse: optional leading whitespace, an optional sign,
/// then as many decimal digits as are present. `None` when there are none.
///
/// `"000123"` -> 123, `"12ab"` -> 12, `""` -> None, `"-7"` -> -7.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: Option<i64> = None;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = Some(value.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
    }
    value.map(|v| if negative { -v } else { v })
}

/// Lenient hexadecimal parse of the leading hex digits of `s`.
pub fn parse_leading_hex(s: &str) -> Option<u32> {
    let mut value: Option<u32> = None;
    for c in s.trim_start().chars() {
        let Some(digit) = c.to_digit(16) else { break };
        value = Some(value.unwrap_or(0).checked_mul(16)?.checked_add(digit)?);
    }
    value
}

fn lookup_char<'a>(
    chars: &[char],
    index: usize,
    table: impl Fn(char) -> Option<&'a str>,
) -> Option<String> {
    chars.get(index).and_then(|c| table(*c)).map(str::to_string)
}

/// `AR`: alarm report forwarded to the Ethernet module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmReport {
    pub account_number: Option<i64>,
    pub alarm_code: Option<i64>,
    pub alarm_message: String,
    pub area: Option<i64>,
    pub zone: Option<i64>,
    pub tel_ip: Option<i64>,
}

/// Status of one area in an `AS` report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStatus {
    pub arm_status: Option<String>,
    pub arm_up_state: Option<String>,
    pub alarm_state: Option<String>,
}

/// `AS`: arming status of all eight areas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmingStatus {
    pub areas: [AreaStatus; AREA_COUNT],
}

impl ArmingStatus {
    /// Area by 1-based number.
    pub fn area(&self, number: usize) -> Option<&AreaStatus> {
        self.areas.get(number.checked_sub(1)?)
    }
}

impl Serialize for ArmingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(AREA_COUNT))?;
        for (i, area) in self.areas.iter().enumerate() {
            map.serialize_entry(&format!("area{}", i + 1), area)?;
        }
        map.end()
    }
}

/// `IC`: a valid user number with an invalid code was entered. Fields are
/// kept as the raw strings the panel sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidUserCode {
    pub invalid_code: String,
    pub user_code: String,
    pub keypad: String,
}

/// `KC`: keypad key change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadChange {
    pub keypad: Option<i64>,
    pub key: Option<String>,
    pub function_keys: [Option<String>; FUNCTION_KEY_COUNT],
    pub bypass_code_required: String,
    pub key_press: String,
}

impl KeypadChange {
    /// Function key status by 1-based key number.
    pub fn function_key(&self, number: usize) -> Option<&str> {
        self.function_keys
            .get(number.checked_sub(1)?)
            .and_then(|k| k.as_deref())
    }
}

/// Serialized field name of the function key at zero-based `index`.
///
/// Published names are `F01`, `F11`, `F21`, .. `F51`: the index and a
/// literal `1` are concatenated, not added. Subscribers depend on these keys.
pub fn function_key_field_name(index: usize) -> String {
    format!("F{index}1")
}

impl Serialize for KeypadChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + FUNCTION_KEY_COUNT))?;
        map.serialize_entry("keypad", &self.keypad)?;
        map.serialize_entry("key", &self.key)?;
        for (i, status) in self.function_keys.iter().enumerate() {
            map.serialize_entry(&function_key_field_name(i), status)?;
        }
        map.serialize_entry("bypassCodeRequired", &self.bypass_code_required)?;
        map.serialize_entry("keyPress", &self.key_press)?;
        map.end()
    }
}

/// `ZC`: zone change. The zone number stays a string exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneChange {
    pub zone: String,
    pub zone_status: Option<String>,
}

/// Typed payload of a decoded telegram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MessageData {
    AlarmReport(AlarmReport),
    ArmingStatus(ArmingStatus),
    InvalidUserCode(InvalidUserCode),
    KeypadChange(KeypadChange),
    ZoneChange(ZoneChange),
    /// No extractor is registered for the command code.
    #[default]
    Empty,
}

impl MessageData {
    pub fn is_empty(&self) -> bool {
        matches!(self, MessageData::Empty)
    }
}

impl Serialize for MessageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MessageData::AlarmReport(r) => r.serialize(serializer),
            MessageData::ArmingStatus(r) => r.serialize(serializer),
            MessageData::InvalidUserCode(r) => r.serialize(serializer),
            MessageData::KeypadChange(r) => r.serialize(serializer),
            MessageData::ZoneChange(r) => r.serialize(serializer),
            MessageData::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Extract an `AR` alarm report.
pub fn extract_alarm_report(payload: &str, tables: &LookupTables) -> MessageData {
    let alarm_code = parse_leading_int(&char_slice(payload, 6, 10));
    let alarm_message = alarm_code
        .and_then(|code| u32::try_from(code).ok())
        .and_then(|code| tables.alarm_event(code))
        .unwrap_or(UNKNOWN_ALARM_CODE)
        .to_string();

    MessageData::AlarmReport(AlarmReport {
        account_number: parse_leading_int(&char_slice(payload, 0, 6)),
        alarm_code,
        alarm_message,
        area: parse_leading_int(&char_slice(payload, 10, 12)),
        zone: parse_leading_int(&char_slice(payload, 12, 15)),
        tel_ip: parse_leading_int(&char_slice(payload, 15, 16)),
    })
}

/// Extract an `AS` arming status report from three parallel 8-character
/// status strings.
pub fn extract_arming_status(payload: &str, tables: &LookupTables) -> MessageData {
    let arm_statuses: Vec<char> = char_slice(payload, 0, 8).chars().collect();
    let arm_up_states: Vec<char> = char_slice(payload, 8, 16).chars().collect();
    let alarm_states: Vec<char> = char_slice(payload, 16, 24).chars().collect();

    let areas = std::array::from_fn(|i| AreaStatus {
        arm_status: lookup_char(&arm_statuses, i, |c| tables.arm_status(c)),
        arm_up_state: lookup_char(&arm_up_states, i, |c| tables.arm_up_state(c)),
        alarm_state: lookup_char(&alarm_states, i, |c| tables.alarm_state(c)),
    });

    MessageData::ArmingStatus(ArmingStatus { areas })
}

/// Extract an `IC` invalid user code report.
pub fn extract_invalid_user_code(payload: &str, _tables: &LookupTables) -> MessageData {
    MessageData::InvalidUserCode(InvalidUserCode {
        invalid_code: char_slice(payload, 0, 12),
        user_code: char_slice(payload, 12, 15),
        keypad: char_slice(payload, 15, 17),
    })
}

/// Extract a `KC` keypad key change.
pub fn extract_keypad_change(payload: &str, tables: &LookupTables) -> MessageData {
    let key = parse_leading_int(&char_slice(payload, 2, 4))
        .and_then(|code| u32::try_from(code).ok())
        .and_then(|code| tables.key(code))
        .map(str::to_string);
    let leds: Vec<char> = char_slice(payload, 4, 10).chars().collect();

    MessageData::KeypadChange(KeypadChange {
        keypad: parse_leading_int(&char_slice(payload, 0, 2)),
        key,
        function_keys: std::array::from_fn(|i| lookup_char(&leds, i, |c| tables.key_status(c))),
        bypass_code_required: char_slice(payload, 10, 11),
        key_press: char_slice(payload, 11, 19),
    })
}

/// Extract a `ZC` zone change.
pub fn extract_zone_change(payload: &str, tables: &LookupTables) -> MessageData {
    let state: Vec<char> = char_slice(payload, 3, 4).chars().collect();
    MessageData::ZoneChange(ZoneChange {
        zone: char_slice(payload, 0, 3),
        zone_status: lookup_char(&state, 0, |c| tables.zone_state(c)),
    })
}
