// Property tests for the decoder and the outgoing framing

use std::sync::Arc;

use proptest::prelude::*;

use elk_m1_bridge::dispatch::extractor_for;
use elk_m1_bridge::protocol::{checksum, frame};
use elk_m1_bridge::{decode, Direction, LookupTables};

fn tables() -> LookupTables {
    LookupTables::elk_m1()
}

proptest! {
    #[test]
    fn decode_never_panics(line in any::<String>()) {
        let _ = decode(&line, &tables());
    }

    #[test]
    fn decode_is_deterministic(line in "[0-9A-Fa-z]{0,40}(\r\n)?") {
        let tables = tables();
        prop_assert_eq!(decode(&line, &tables), decode(&line, &tables));
    }

    #[test]
    fn direction_follows_case(code in "[A-Za-z0-9#*?][A-Za-z0-9]", body in "[0-9]{0,20}") {
        let line = format!("0A{code}{body}00\r\n");
        let envelope = decode(&line, &tables());
        let expected = if code.starts_with(|c: char| c.is_ascii_lowercase()) {
            Direction::ToPanel
        } else {
            Direction::FromPanel
        };
        prop_assert_eq!(envelope.direction, Some(expected));
    }

    #[test]
    fn length_present_iff_positive(len in 0u32..256, body in "[A-Z]{2}[0-9]{0,10}") {
        let line = format!("{len:02X}{body}\r\n");
        let envelope = decode(&line, &tables());
        if len == 0 {
            prop_assert_eq!(envelope.length, None);
        } else {
            prop_assert_eq!(envelope.length, Some(len));
        }
    }

    #[test]
    fn unregistered_codes_carry_raw_fields(code in "[A-Za-z]{2}", body in "[0-9]{0,16}") {
        prop_assume!(extractor_for(&code).is_none());
        let line = format!("10{code}{body}00\r\n");
        let envelope = decode(&line, &tables());
        prop_assert_eq!(&envelope.command_code, &code);
        prop_assert_eq!(envelope.raw_line, format!("10{code}{body}00"));
        prop_assert_eq!(envelope.payload, format!("{body}00"));
        prop_assert!(envelope.data.is_empty());
    }

    #[test]
    fn framed_checksum_balances(body in "[a-z][a-z0-9]{1,30}") {
        let telegram = frame(&body);
        prop_assert!(telegram.ends_with("\r\n"));
        let text = telegram.trim_end_matches("\r\n");
        let (prefixed, cks) = text.split_at(text.len() - 2);
        let cks = u8::from_str_radix(cks, 16).unwrap();
        prop_assert_eq!(cks, checksum(prefixed));
        let sum = prefixed.bytes().fold(cks, |acc, b| acc.wrapping_add(b));
        prop_assert_eq!(sum, 0);
        let declared = usize::from_str_radix(&prefixed[..2], 16).unwrap();
        prop_assert_eq!(declared, body.len() + 2);
    }
}

#[test]
fn concurrent_decoding_matches_isolated() {
    let tables = Arc::new(tables());
    let lines: Vec<String> = vec![
        "0AZC012100CB\r\n".to_string(),
        "1EAS1000000040000000600000000000\r\n".to_string(),
        "19KC01110120001111111110000\r\n".to_string(),
        "16IC000000010203001010000\r\n".to_string(),
        "16AR00012311300100500000\r\n".to_string(),
        "0AXY12345600\r\n".to_string(),
    ];
    let isolated: Vec<_> = lines.iter().map(|l| decode(l, &tables)).collect();

    let concurrent: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = lines
            .iter()
            .map(|line| {
                let tables = Arc::clone(&tables);
                scope.spawn(move || decode(line, &tables))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(isolated, concurrent);
}
