// Connection tests against an in-process mock M1XEP

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

use elk_m1_bridge::{
    ArmOptions, ElkConfig, ElkError, ElkPanel, LookupTables, MessageBus, MessageData, PanelEvent,
};

const WAIT: Duration = Duration::from_secs(5);

async fn mock_panel() -> (TcpListener, ElkConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ElkConfig::builder()
        .host("127.0.0.1")
        .port(port)
        .user_code("1234")
        .response_timeout_ms(1000)
        .max_connect_retries(0)
        .build();
    (listener, config)
}

async fn connect(
    listener: &TcpListener,
    config: ElkConfig,
    bus: MessageBus,
) -> (ElkPanel, BufReader<OwnedReadHalf>, OwnedWriteHalf) {
    let tables = Arc::new(LookupTables::elk_m1().with_speech_words([("hello", 210u16)]));
    let panel = ElkPanel::connect_with(config, tables, bus).await.unwrap();
    let (socket, _) = listener.accept().await.unwrap();
    let (reader, writer) = socket.into_split();
    (panel, BufReader::new(reader), writer)
}

async fn read_line(reader: &mut BufReader<OwnedReadHalf>) -> String {
    let mut line = String::new();
    timeout(WAIT, reader.read_line(&mut line))
        .await
        .expect("panel wrote nothing")
        .unwrap();
    line
}

#[tokio::test]
async fn publishes_decoded_lines_in_order() {
    let (listener, config) = mock_panel().await;
    let port = config.port;
    let bus = MessageBus::new(16);
    let mut events = bus.subscribe();
    let (panel, _reader, mut writer) = connect(&listener, config, bus).await;
    let mut zones = panel.subscribe_code("ZC").await;

    match timeout(WAIT, events.recv()).await.unwrap().unwrap() {
        PanelEvent::Connected { host, port: p } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(p, port);
        }
        other => panic!("expected Connected, got {other:?}"),
    }

    // Two lines in one write, the second split across writes.
    writer
        .write_all(b"0AZC012100CB\r\n0AZC0159")
        .await
        .unwrap();
    writer.write_all(b"00CB\r\n").await.unwrap();

    let mut seen = Vec::new();
    for _ in 0..2 {
        match timeout(WAIT, events.recv()).await.unwrap().unwrap() {
            PanelEvent::Message(msg) => seen.push(msg),
            other => panic!("expected Message, got {other:?}"),
        }
    }
    assert_eq!(seen[0].envelope.raw_line, "0AZC012100CB");
    assert_eq!(seen[1].envelope.raw_line, "0AZC015900CB");
    assert_eq!(seen[0].port, port);
    assert_eq!(seen[0].host, "127.0.0.1");
    assert_eq!(seen[0].remote_port, panel.local_addr().port());

    let first = timeout(WAIT, zones.recv()).await.unwrap().unwrap();
    let MessageData::ZoneChange(zc) = &first.envelope.data else {
        panic!("expected zone change");
    };
    assert_eq!(zc.zone, "012");
    let second = timeout(WAIT, zones.recv()).await.unwrap().unwrap();
    let MessageData::ZoneChange(zc) = &second.envelope.data else {
        panic!("expected zone change");
    };
    assert_eq!(zc.zone, "015");
    assert_eq!(zc.zone_status.as_deref(), Some("Violated: Open"));
}

#[tokio::test]
async fn arming_status_request_returns_reply() {
    let (listener, config) = mock_panel().await;
    let (panel, mut reader, mut writer) = connect(&listener, config, MessageBus::new(16)).await;

    let mock = tokio::spawn(async move {
        let request = read_line(&mut reader).await;
        assert_eq!(request, "06as0066\r\n");
        // Unrelated traffic before the reply must not satisfy the request.
        writer.write_all(b"0AZC012100CB\r\n").await.unwrap();
        writer
            .write_all(b"1EAS1000000040000000600000000000\r\n")
            .await
            .unwrap();
        (reader, writer)
    });

    let reply = panel.arming_status_request().await.unwrap();
    assert_eq!(reply.envelope.command_code, "AS");
    let MessageData::ArmingStatus(status) = &reply.envelope.data else {
        panic!("expected arming status");
    };
    assert_eq!(
        status.area(1).unwrap().arm_status.as_deref(),
        Some("Armed Away")
    );
    mock.await.unwrap();
}

#[tokio::test]
async fn request_without_reply_times_out() {
    let (listener, config) = mock_panel().await;
    let config = ElkConfig {
        response_timeout_ms: 100,
        ..config
    };
    let (panel, mut reader, _writer) = connect(&listener, config, MessageBus::new(16)).await;

    let err = panel.alarm_by_zone_request().await.unwrap_err();
    assert!(matches!(
        err,
        ElkError::ResponseTimeout { ref command_code } if command_code == "AZ"
    ));
    assert_eq!(read_line(&mut reader).await, "06az005F\r\n");

    let err = panel.next_message("KC").await.unwrap_err();
    assert!(matches!(err, ElkError::ResponseTimeout { .. }));
}

#[tokio::test]
async fn arm_commands_use_configured_defaults() {
    let (listener, config) = mock_panel().await;
    let (panel, mut reader, _writer) = connect(&listener, config, MessageBus::new(16)).await;

    panel.arm_away(ArmOptions::default()).await.unwrap();
    assert_eq!(read_line(&mut reader).await, "0Da11001234003F\r\n");

    panel
        .disarm(ArmOptions::default().area(2).code("42"))
        .await
        .unwrap();
    let line = read_line(&mut reader).await;
    assert!(line.starts_with("0Da0200004200"), "got {line:?}");

    panel.arm(ArmOptions::default()).await.unwrap();
    assert!(read_line(&mut reader).await.starts_with("0Da1"));

    let err = panel
        .arm_night(ArmOptions::default().area(9))
        .await
        .unwrap_err();
    assert!(matches!(err, ElkError::InvalidArea { area: 9 }));
}

#[tokio::test]
async fn speak_writes_one_telegram_per_word() {
    let (listener, config) = mock_panel().await;
    let (panel, mut reader, _writer) = connect(&listener, config, MessageBus::new(16)).await;

    let sent = panel.speak("hello nonsense 12").await.unwrap();
    assert_eq!(sent, 2);
    assert!(read_line(&mut reader).await.starts_with("09sw21000"));
    assert!(read_line(&mut reader).await.starts_with("09sw01200"));
}

#[tokio::test]
async fn panel_closing_socket_emits_disconnected() {
    let (listener, config) = mock_panel().await;
    let (panel, reader, writer) = connect(&listener, config, MessageBus::new(16)).await;
    let mut events = panel.subscribe();

    drop(writer);
    drop(reader);

    loop {
        match timeout(WAIT, events.recv()).await.unwrap().unwrap() {
            PanelEvent::Disconnected(_) => break,
            PanelEvent::Message(_) => continue,
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert!(!panel.is_connected().await);
    let err = panel.arm_away(ArmOptions::default()).await.unwrap_err();
    assert!(matches!(err, ElkError::Disconnected));
}

#[tokio::test]
async fn client_disconnect_emits_event() {
    let (listener, config) = mock_panel().await;
    let (panel, _reader, _writer) = connect(&listener, config, MessageBus::new(16)).await;
    let mut events = panel.subscribe();

    panel.disconnect().await.unwrap();
    match timeout(WAIT, events.recv()).await.unwrap().unwrap() {
        PanelEvent::Disconnected(reason) => assert_eq!(reason, "closed by client"),
        other => panic!("unexpected event {other:?}"),
    }
    // Second disconnect is a no-op.
    panel.disconnect().await.unwrap();
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let (listener, config) = mock_panel().await;
    drop(listener);

    let bus = MessageBus::new(4);
    let mut events = bus.subscribe();
    let result = ElkPanel::connect_with(config, Arc::new(LookupTables::elk_m1()), bus).await;
    let Err(err) = result else {
        panic!("connect should fail");
    };
    assert!(matches!(err, ElkError::ConnectionRefused { .. }));
    assert!(err.to_string().starts_with("Connection to M1XEP failed!"));
    assert!(matches!(events.try_recv(), Ok(PanelEvent::Error(_))));
}
