//! Example: Request the arming status of all eight areas.

use elk_m1_bridge::{ElkConfig, ElkPanel, MessageData};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ElkConfig::builder()
        .host("192.168.1.2")
        .port(2000)
        .response_timeout_ms(5000)
        .build();

    let panel = ElkPanel::connect(config).await?;

    let reply = panel.arming_status_request().await?;
    if let MessageData::ArmingStatus(status) = &reply.envelope.data {
        for (i, area) in status.areas.iter().enumerate() {
            println!(
                "Area {}: {} / {} / {}",
                i + 1,
                area.arm_status.as_deref().unwrap_or("?"),
                area.arm_up_state.as_deref().unwrap_or("?"),
                area.alarm_state.as_deref().unwrap_or("?"),
            );
        }
    }

    panel.disconnect().await?;
    Ok(())
}
