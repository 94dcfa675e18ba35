// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

use elk_m1_bridge::{
    decode, ArmMode, ArmOptions, ElkConfig, ElkPanel, LookupTables, MessageBus, PanelEvent,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "elk-m1")]
#[command(about = "Talk to an Elk M1 security panel through its M1XEP")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Print every decoded message as a JSON line until interrupted
    Monitor,
    /// Arm an area
    Arm {
        /// Arming mode (away, stay, stay_instant, night, night_instant,
        /// vacation, step_away, step_stay); defaults to the configured mode
        #[arg(long)]
        mode: Option<String>,
        #[command(flatten)]
        target: ArmTarget,
    },
    /// Disarm an area
    Disarm {
        #[command(flatten)]
        target: ArmTarget,
    },
    /// Request arming status and print the reply
    Status,
    /// Request alarm by zone and print the reply
    AlarmByZone,
    /// Speak words through the panel
    Speak {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Decode one telegram offline and print it as JSON
    Decode {
        /// Telegram line; CRLF is appended when missing
        line: String,
    },
}

#[derive(clap::Args)]
struct ArmTarget {
    /// Area number (1-8); defaults to the configured area
    #[arg(long)]
    area: Option<u8>,
    /// User code; defaults to the configured code
    #[arg(long)]
    code: Option<String>,
}

impl ArmTarget {
    fn options(self) -> ArmOptions {
        ArmOptions {
            area: self.area,
            code: self.code,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Config {
    panel: PanelToml,
    #[serde(default)]
    speech_words: HashMap<String, u16>,
}

#[derive(Debug, Deserialize)]
struct PanelToml {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_arm_mode")]
    default_arm_mode: String,
    #[serde(default = "default_response_timeout")]
    response_timeout_ms: u64,
    #[serde(default = "default_area")]
    area: u8,
    #[serde(default)]
    user_code: String,
    #[serde(default = "default_reconnect_delay")]
    reconnect_delay_ms: u64,
    #[serde(default = "default_max_connect_retries")]
    max_connect_retries: u32,
    #[serde(default = "default_connect_timeout")]
    connect_timeout_ms: u64,
    #[serde(default = "default_event_capacity")]
    event_capacity: usize,
    #[serde(default = "default_max_line_length")]
    max_line_length: usize,
}

fn default_port() -> u16 {
    2000
}
fn default_arm_mode() -> String {
    "away".to_string()
}
fn default_response_timeout() -> u64 {
    3000
}
fn default_area() -> u8 {
    1
}
fn default_reconnect_delay() -> u64 {
    5000
}
fn default_max_connect_retries() -> u32 {
    3
}
fn default_connect_timeout() -> u64 {
    10000
}
fn default_event_capacity() -> usize {
    256
}
fn default_max_line_length() -> usize {
    1024
}

fn build_elk_config(toml: &PanelToml) -> Result<ElkConfig> {
    let mode: ArmMode = toml
        .default_arm_mode
        .parse()
        .context("Invalid default_arm_mode")?;
    Ok(ElkConfig::builder()
        .host(&toml.host)
        .port(toml.port)
        .default_arm_mode(mode)
        .response_timeout_ms(toml.response_timeout_ms)
        .area(toml.area)
        .user_code(&toml.user_code)
        .reconnect_delay_ms(toml.reconnect_delay_ms)
        .max_connect_retries(toml.max_connect_retries)
        .connect_timeout_ms(toml.connect_timeout_ms)
        .event_capacity(toml.event_capacity)
        .max_line_length(toml.max_line_length)
        .build())
}

fn load_config(path: &str) -> Result<Config> {
    let config_text = std::fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&config_text).context("Failed to parse config file")
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

async fn monitor(panel: ElkPanel) -> Result<()> {
    let mut events = panel.subscribe();
    let mut sigterm = signal(SignalKind::terminate())?;

    info!("Monitoring. Send SIGINT/SIGTERM to stop.");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }
            event = events.recv() => match event {
                Ok(PanelEvent::Message(msg)) => print_json(&*msg)?,
                Ok(PanelEvent::Connected { host, port }) => info!("Connected to {host}:{port}"),
                Ok(PanelEvent::Error(e)) => error!("Panel error: {e}"),
                Ok(PanelEvent::Disconnected(reason)) => {
                    warn!("Disconnected: {reason}");
                    return Ok(());
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Monitor lagged, {n} events dropped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => return Ok(()),
            }
        }
    }

    panel.disconnect().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity (e.g. RUST_LOG=debug or RUST_LOG=elk_m1_bridge=trace).
    // Default: info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // systemd journal already adds timestamps, so omit them when running under systemd
    if std::env::var_os("JOURNAL_STREAM").is_some() {
        tracing_subscriber::fmt()
            .without_time()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    if let CliCommand::Decode { line } = &cli.command {
        // Offline: no config file needed.
        let tables = LookupTables::elk_m1();
        let line = if line.ends_with('\n') {
            line.clone()
        } else {
            format!("{line}\r\n")
        };
        return print_json(&decode(&line, &tables));
    }

    let config = load_config(&cli.config)?;
    let elk_config = build_elk_config(&config.panel)?;
    let tables = Arc::new(LookupTables::elk_m1().with_speech_words(config.speech_words));
    let bus = MessageBus::new(elk_config.event_capacity);

    let panel = ElkPanel::connect_with(elk_config, tables, bus)
        .await
        .context("Failed to connect to the M1XEP")?;

    match cli.command {
        CliCommand::Monitor => return monitor(panel).await,
        CliCommand::Arm { mode, target } => {
            let mode = match mode {
                Some(m) => m.parse::<ArmMode>().context("Invalid arm mode")?,
                None => panel.config().default_arm_mode,
            };
            panel.arm_with_mode(mode, target.options()).await?;
            info!("Sent {mode}");
        }
        CliCommand::Disarm { target } => {
            panel.disarm(target.options()).await?;
            info!("Sent disarm");
        }
        CliCommand::Status => {
            let reply = panel.arming_status_request().await?;
            print_json(&*reply)?;
        }
        CliCommand::AlarmByZone => {
            let reply = panel.alarm_by_zone_request().await?;
            print_json(&*reply)?;
        }
        CliCommand::Speak { text } => {
            let sent = panel.speak(&text.join(" ")).await?;
            info!("Spoke {sent} word(s)");
        }
        CliCommand::Decode { .. } => {}
    }

    panel.disconnect().await?;
    Ok(())
}
