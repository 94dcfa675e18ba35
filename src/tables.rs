// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::collections::HashMap;

use crate::constants::{
    ALARM_STATES, ARM_STATUSES, ARM_UP_STATES, COMMAND_LABELS, CONTACT_ID_EVENTS, KEY_STATUSES,
    KEY_TABLE, ZONE_STATES,
};

/// Read-only lookup tables used by the decoder and the field extractors.
///
/// Built once at startup and shared by reference (usually behind an `Arc`).
/// Nothing mutates a table after construction except the builder-style
/// [`with_speech_words`](Self::with_speech_words), which consumes `self`.
#[derive(Debug, Clone)]
pub struct LookupTables {
    commands: HashMap<String, String>,
    alarm_events: HashMap<u32, String>,
    arm_statuses: HashMap<char, String>,
    arm_up_states: HashMap<char, String>,
    alarm_states: HashMap<char, String>,
    zone_states: HashMap<char, String>,
    keys: HashMap<u32, String>,
    key_statuses: HashMap<char, String>,
    speech_words: HashMap<String, u16>,
}

fn char_table(entries: &[(char, &str)]) -> HashMap<char, String> {
    entries.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

impl LookupTables {
    /// Tables for the M1 ASCII protocol.
    pub fn elk_m1() -> Self {
        let mut alarm_events = HashMap::new();
        for (code, label) in CONTACT_ID_EVENTS {
            alarm_events.insert(1000 + code, label.to_string());
            alarm_events.insert(3000 + code, format!("{label} Restore"));
        }

        Self {
            commands: COMMAND_LABELS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            alarm_events,
            arm_statuses: char_table(ARM_STATUSES),
            arm_up_states: char_table(ARM_UP_STATES),
            alarm_states: char_table(ALARM_STATES),
            zone_states: char_table(ZONE_STATES),
            keys: KEY_TABLE.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            key_statuses: char_table(KEY_STATUSES),
            speech_words: HashMap::new(),
        }
    }

    /// Add speech vocabulary entries (word -> M1 word number). Words are
    /// matched case-insensitively.
    pub fn with_speech_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = (S, u16)>,
        S: AsRef<str>,
    {
        for (word, number) in words {
            self.speech_words
                .insert(word.as_ref().to_lowercase(), number);
        }
        self
    }

    pub fn command_label(&self, code: &str) -> Option<&str> {
        self.commands.get(code).map(String::as_str)
    }

    pub fn alarm_event(&self, code: u32) -> Option<&str> {
        self.alarm_events.get(&code).map(String::as_str)
    }

    pub fn arm_status(&self, c: char) -> Option<&str> {
        self.arm_statuses.get(&c).map(String::as_str)
    }

    pub fn arm_up_state(&self, c: char) -> Option<&str> {
        self.arm_up_states.get(&c).map(String::as_str)
    }

    pub fn alarm_state(&self, c: char) -> Option<&str> {
        self.alarm_states.get(&c).map(String::as_str)
    }

    pub fn zone_state(&self, c: char) -> Option<&str> {
        self.zone_states.get(&c).map(String::as_str)
    }

    pub fn key(&self, code: u32) -> Option<&str> {
        self.keys.get(&code).map(String::as_str)
    }

    pub fn key_status(&self, c: char) -> Option<&str> {
        self.key_statuses.get(&c).map(String::as_str)
    }

    /// Look up a speech word number. Case-insensitive.
    pub fn speech_word(&self, word: &str) -> Option<u16> {
        self.speech_words.get(&word.to_lowercase()).copied()
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::elk_m1()
    }
}
