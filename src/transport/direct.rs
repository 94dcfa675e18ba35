// MIT License - Copyright (c) 2026 Peter Wright
// Elk M1 ASCII protocol client

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info};

use crate::config::ElkConfig;
use crate::error::{ElkError, Result};
use crate::event::{MessageBus, PanelEvent, ReceivedMessage};
use crate::tables::LookupTables;
use crate::telegram::decode;
use crate::transport::codec::TelegramCodec;
use crate::transport::Transport;

type TelegramWriter = FramedWrite<OwnedWriteHalf, TelegramCodec>;

/// Direct TCP transport to the M1XEP's ASCII port.
pub struct DirectTcpTransport {
    writer: Mutex<TelegramWriter>,
    bus: MessageBus,
    connected: Arc<RwLock<bool>>,
    local_addr: SocketAddr,
    reader_handle: Mutex<Option<JoinHandle<()>>>,
}

impl DirectTcpTransport {
    /// Open the socket and start the reader task. Emits
    /// [`PanelEvent::Connected`] once the socket is up.
    pub async fn connect(
        config: &ElkConfig,
        tables: Arc<LookupTables>,
        bus: MessageBus,
    ) -> Result<Self> {
        info!("Connecting to M1XEP at {}:{}", config.host, config.port);

        let stream = match timeout(
            config.connect_timeout(),
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        {
            Err(_) => {
                error!("TCP connect timed out after {}ms", config.connect_timeout_ms);
                return Err(ElkError::ConnectionTimeout);
            }
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                error!("TCP connect refused: {}", e);
                return Err(ElkError::ConnectionRefused {
                    host: config.host.clone(),
                    port: config.port,
                });
            }
            Ok(Err(e)) => {
                error!("TCP connect failed: {}", e);
                return Err(ElkError::Io(e));
            }
            Ok(Ok(stream)) => stream,
        };

        let local_addr = stream.local_addr()?;
        debug!("TCP socket connected from {}", local_addr);

        let (reader, writer) = stream.into_split();
        let connected = Arc::new(RwLock::new(true));

        let reader_handle = spawn_reader_task(
            FramedRead::new(
                reader,
                TelegramCodec::with_max_line_length(config.max_line_length),
            ),
            ReaderContext {
                tables,
                bus: bus.clone(),
                connected: connected.clone(),
                local_addr,
                port: config.port,
            },
        );

        info!("Connected to M1XEP at {}:{}", config.host, config.port);
        bus.emit(PanelEvent::Connected {
            host: config.host.clone(),
            port: config.port,
        });

        Ok(Self {
            writer: Mutex::new(FramedWrite::new(
                writer,
                TelegramCodec::with_max_line_length(config.max_line_length),
            )),
            bus,
            connected,
            local_addr,
            reader_handle: Mutex::new(Some(reader_handle)),
        })
    }

    /// Local address of the socket.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Transport for DirectTcpTransport {
    async fn send(&self, telegram: String) -> Result<()> {
        if !*self.connected.read().await {
            return Err(ElkError::Disconnected);
        }
        debug!("Sending telegram: {}", telegram.trim_end());
        let mut writer = self.writer.lock().await;
        writer.send(telegram).await.map_err(|e| {
            error!("Failed to write telegram: {}", e);
            e
        })
    }

    async fn disconnect(&self) -> Result<()> {
        {
            let mut connected = self.connected.write().await;
            if !*connected {
                return Ok(());
            }
            *connected = false;
        }
        info!("Disconnecting from M1XEP");
        if let Some(handle) = self.reader_handle.lock().await.take() {
            handle.abort();
        }
        let result = self.writer.lock().await.close().await;
        self.bus
            .emit(PanelEvent::Disconnected("closed by client".to_string()));
        result
    }

    async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }
}

impl Drop for DirectTcpTransport {
    fn drop(&mut self) {
        if let Some(handle) = self.reader_handle.get_mut().take() {
            handle.abort();
        }
    }
}

struct ReaderContext {
    tables: Arc<LookupTables>,
    bus: MessageBus,
    connected: Arc<RwLock<bool>>,
    local_addr: SocketAddr,
    port: u16,
}

/// Spawn the reader task: decode each line in arrival order and publish it.
fn spawn_reader_task(
    mut lines: FramedRead<OwnedReadHalf, TelegramCodec>,
    ctx: ReaderContext,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reason = loop {
            match lines.next().await {
                Some(Ok(line)) => {
                    debug!("Received telegram: {}", line.trim_end());
                    let message = ReceivedMessage {
                        envelope: decode(&line, &ctx.tables),
                        time: Utc::now(),
                        host: ctx.local_addr.ip().to_string(),
                        port: ctx.port,
                        remote_port: ctx.local_addr.port(),
                    };
                    ctx.bus.publish(message).await;
                }
                Some(Err(e)) => {
                    error!("Reader: read error: {}", e);
                    ctx.bus.emit(PanelEvent::Error(e.to_string()));
                    break ElkError::Disconnected.to_string();
                }
                None => {
                    debug!("Reader: connection closed");
                    break "connection closed by panel".to_string();
                }
            }
        };

        let mut connected = ctx.connected.write().await;
        if *connected {
            *connected = false;
            info!("Connection to M1XEP ended: {}", reason);
            ctx.bus.emit(PanelEvent::Disconnected(reason));
        }
    })
}
