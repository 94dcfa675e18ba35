//! Example: Print zone changes and keypad activity as they arrive.

use elk_m1_bridge::{ElkConfig, ElkPanel, MessageData, PanelEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ElkConfig::builder()
        .host("192.168.1.2")
        .port(2000)
        .build();

    let panel = ElkPanel::connect(config).await?;
    let mut events = panel.subscribe();

    println!("Listening for panel messages (Ctrl+C to stop)...\n");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(PanelEvent::Message(msg)) => match &msg.envelope.data {
                        MessageData::ZoneChange(zc) => {
                            println!(
                                "Zone {}: {}",
                                zc.zone,
                                zc.zone_status.as_deref().unwrap_or("?")
                            );
                        }
                        MessageData::KeypadChange(kc) => {
                            println!(
                                "Keypad {:?}: {}",
                                kc.keypad,
                                kc.key.as_deref().unwrap_or("?")
                            );
                        }
                        _ => println!("{} ({})", msg.envelope.label, msg.envelope.command_code),
                    },
                    Ok(PanelEvent::Disconnected(reason)) => {
                        println!("Panel disconnected: {}", reason);
                        break;
                    }
                    Ok(event) => {
                        println!("Event: {:?}", event);
                    }
                    Err(e) => {
                        println!("Event channel error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nDisconnecting...");
                break;
            }
        }
    }

    panel.disconnect().await?;
    Ok(())
}
