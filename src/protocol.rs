// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{CRLF, MAX_SPEECH_WORD, RESERVED};
use crate::error::{ElkError, Result};
use crate::tables::LookupTables;

/// Arming modes understood by the M1. Each maps to a two-character
/// outgoing command code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmMode {
    /// `a0`
    Disarm,
    /// `a1`
    Away,
    /// `a2`
    Stay,
    /// `a3`
    StayInstant,
    /// `a4`
    Night,
    /// `a5`
    NightInstant,
    /// `a6`
    Vacation,
    /// `a7` - step to the next away mode.
    StepAway,
    /// `a8` - step to the next stay mode.
    StepStay,
}

impl ArmMode {
    pub const ALL: [ArmMode; 9] = [
        ArmMode::Disarm,
        ArmMode::Away,
        ArmMode::Stay,
        ArmMode::StayInstant,
        ArmMode::Night,
        ArmMode::NightInstant,
        ArmMode::Vacation,
        ArmMode::StepAway,
        ArmMode::StepStay,
    ];

    /// Outgoing command code.
    pub fn code(self) -> &'static str {
        match self {
            ArmMode::Disarm => "a0",
            ArmMode::Away => "a1",
            ArmMode::Stay => "a2",
            ArmMode::StayInstant => "a3",
            ArmMode::Night => "a4",
            ArmMode::NightInstant => "a5",
            ArmMode::Vacation => "a6",
            ArmMode::StepAway => "a7",
            ArmMode::StepStay => "a8",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArmMode::Disarm => "disarm",
            ArmMode::Away => "away",
            ArmMode::Stay => "stay",
            ArmMode::StayInstant => "stay_instant",
            ArmMode::Night => "night",
            ArmMode::NightInstant => "night_instant",
            ArmMode::Vacation => "vacation",
            ArmMode::StepAway => "step_away",
            ArmMode::StepStay => "step_stay",
        }
    }
}

impl fmt::Display for ArmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArmMode {
    type Err = ElkError;

    /// Accepts the mode name (`stay_instant`, `stay-instant`) or its wire
    /// code (`a3`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ArmMode::ALL
            .into_iter()
            .find(|mode| mode.name() == normalized || mode.code() == normalized)
            .ok_or_else(|| ElkError::InvalidArmMode {
                mode: s.to_string(),
            })
    }
}

/// Per-call overrides for an arming command. Unset fields fall back to the
/// panel configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmOptions {
    pub area: Option<u8>,
    pub code: Option<String>,
}

impl ArmOptions {
    pub fn area(mut self, area: u8) -> Self {
        self.area = Some(area);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Commands that can be sent to the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `aN<area><code>` - arm or disarm one area.
    Arm {
        mode: ArmMode,
        area: u8,
        code: String,
    },
    /// `as` - request arming status. Reply: `AS`.
    ArmingStatusRequest,
    /// `az` - request alarm by zone. Reply: `AZ`.
    AlarmByZoneRequest,
    /// `sw<word>` - speak one vocabulary word.
    SpeakWord { word: u16 },
}

impl Command {
    /// Build a validated arming command.
    pub fn arm(mode: ArmMode, area: u8, code: &str) -> Result<Self> {
        if !(1..=8).contains(&area) {
            return Err(ElkError::InvalidArea { area });
        }
        if code.is_empty() || code.len() > 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ElkError::InvalidUserCode);
        }
        Ok(Command::Arm {
            mode,
            area,
            code: code.to_string(),
        })
    }

    /// Command code this request goes out as.
    pub fn code(&self) -> &'static str {
        match self {
            Command::Arm { mode, .. } => mode.code(),
            Command::ArmingStatusRequest => "as",
            Command::AlarmByZoneRequest => "az",
            Command::SpeakWord { .. } => "sw",
        }
    }

    /// Command code of the panel's reply, for commands that get one.
    pub fn reply_code(&self) -> Option<&'static str> {
        match self {
            Command::ArmingStatusRequest => Some("AS"),
            Command::AlarmByZoneRequest => Some("AZ"),
            _ => None,
        }
    }

    /// Unframed telegram body: command code, data and the reserved field.
    pub fn to_wire_string(&self) -> String {
        match self {
            Command::Arm { mode, area, code } => {
                format!("{}{}{:0>6}{}", mode.code(), area, code, RESERVED)
            }
            Command::ArmingStatusRequest | Command::AlarmByZoneRequest => {
                format!("{}{}", self.code(), RESERVED)
            }
            Command::SpeakWord { word } => format!("sw{:03}{}", word, RESERVED),
        }
    }

    /// Framed telegram ready for the socket.
    pub fn encode(&self) -> String {
        frame(&self.to_wire_string())
    }
}

/// Two's complement of the byte sum, modulo 256.
pub fn checksum(text: &str) -> u8 {
    let sum = text.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
    0u8.wrapping_sub(sum)
}

/// Frame a telegram body: `<len><body><checksum>\r\n`. The length counts the
/// body and the two checksum characters.
pub fn frame(body: &str) -> String {
    let prefixed = format!("{:02X}{}", body.len() + 2, body);
    format!("{}{:02X}{}", prefixed, checksum(&prefixed), CRLF)
}

pub fn encode_arming_command(mode: ArmMode, area: u8, code: &str) -> Result<String> {
    Ok(Command::arm(mode, area, code)?.encode())
}

/// Frame a command that carries no data (`as`, `az`).
pub fn encode_simple_command(code: &str) -> String {
    frame(&format!("{code}{RESERVED}"))
}

/// Word numbers for the text, in order. Numeric tokens in range are used
/// directly; other tokens go through the vocabulary. Unknown tokens are
/// skipped.
pub fn speech_words(text: &str, tables: &LookupTables) -> Vec<u16> {
    let mut words = Vec::new();
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        if token.is_empty() {
            continue;
        }
        let number = match token.parse::<u16>() {
            Ok(n) if (1..=MAX_SPEECH_WORD).contains(&n) => Some(n),
            Ok(_) => None,
            Err(_) => tables.speech_word(token),
        };
        match number {
            Some(n) => words.push(n),
            None => warn!("Skipping unknown speech word: {}", token),
        }
    }
    words
}

/// One framed `sw` telegram per recognised word.
pub fn encode_speech(text: &str, tables: &LookupTables) -> Vec<String> {
    speech_words(text, tables)
        .into_iter()
        .map(|word| Command::SpeakWord { word }.encode())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        assert_eq!(checksum("06as00"), 0x66);
        assert_eq!(checksum("0Da1100123400"), 0x3F);
        assert_eq!(checksum(""), 0);
    }

    #[test]
    fn test_frame_status_request() {
        assert_eq!(encode_simple_command("as"), "06as0066\r\n");
        assert_eq!(
            Command::ArmingStatusRequest.encode(),
            encode_simple_command("as")
        );
    }

    #[test]
    fn test_arm_away_frame() {
        let wire = encode_arming_command(ArmMode::Away, 1, "1234").unwrap();
        assert_eq!(wire, "0Da11001234003F\r\n");
    }

    #[test]
    fn test_arm_codes() {
        let codes: Vec<&str> = ArmMode::ALL.iter().map(|m| m.code()).collect();
        assert_eq!(
            codes,
            ["a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8"]
        );
    }

    #[test]
    fn test_arm_mode_from_str() {
        assert_eq!("away".parse::<ArmMode>().unwrap(), ArmMode::Away);
        assert_eq!("Stay-Instant".parse::<ArmMode>().unwrap(), ArmMode::StayInstant);
        assert_eq!("a8".parse::<ArmMode>().unwrap(), ArmMode::StepStay);
        assert!(matches!(
            "sideways".parse::<ArmMode>(),
            Err(ElkError::InvalidArmMode { .. })
        ));
    }

    #[test]
    fn test_arm_validation() {
        assert!(matches!(
            Command::arm(ArmMode::Away, 0, "1234"),
            Err(ElkError::InvalidArea { area: 0 })
        ));
        assert!(matches!(
            Command::arm(ArmMode::Away, 9, "1234"),
            Err(ElkError::InvalidArea { area: 9 })
        ));
        assert!(matches!(
            Command::arm(ArmMode::Away, 1, ""),
            Err(ElkError::InvalidUserCode)
        ));
        assert!(matches!(
            Command::arm(ArmMode::Away, 1, "12a4"),
            Err(ElkError::InvalidUserCode)
        ));
        assert!(matches!(
            Command::arm(ArmMode::Away, 1, "1234567"),
            Err(ElkError::InvalidUserCode)
        ));
    }

    #[test]
    fn test_disarm_wire_string() {
        let cmd = Command::arm(ArmMode::Disarm, 3, "42").unwrap();
        assert_eq!(cmd.to_wire_string(), "a0300004200");
        assert_eq!(cmd.reply_code(), None);
    }

    #[test]
    fn test_reply_codes() {
        assert_eq!(Command::ArmingStatusRequest.reply_code(), Some("AS"));
        assert_eq!(Command::AlarmByZoneRequest.reply_code(), Some("AZ"));
        assert_eq!(encode_simple_command("az"), Command::AlarmByZoneRequest.encode());
    }

    #[test]
    fn test_speech_numeric_and_vocabulary() {
        let tables = LookupTables::elk_m1().with_speech_words([("hello", 210u16)]);
        let words = speech_words("Hello, 12 unknown 0 474 473", &tables);
        assert_eq!(words, vec![210, 12, 473]);

        let wire = encode_speech("12", &tables);
        assert_eq!(wire.len(), 1);
        assert!(wire[0].starts_with("09sw01200"));
        assert!(wire[0].ends_with("\r\n"));
    }

    #[test]
    fn test_speech_empty_text() {
        assert!(encode_speech("   ", &LookupTables::elk_m1()).is_empty());
    }
}
