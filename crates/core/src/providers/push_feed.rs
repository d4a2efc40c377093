//! Streaming connection to the backend push channel.
//!
//! Best effort: a dropped connection is re-established after a fixed delay and
//! nothing missed in between is replayed. The next snapshot fetch corrects the
//! state.

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::models::push::PushMessage;
use crate::models::settings::Settings;

/// Push feed connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PushFeedConfig {
    /// Streaming channel URL
    pub url: String,
    /// Interval between keep-alive pings
    pub ping_interval: Duration,
    /// Fixed wait before each reconnect attempt
    pub reconnect_delay: Duration,
    /// Capacity of the message channel
    pub channel_buffer_size: usize,
}

impl Default for PushFeedConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl PushFeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            url: settings.ws_url.clone(),
            ping_interval: settings.ping_interval().max(Duration::from_millis(1)),
            reconnect_delay: settings.reconnect_interval(),
            channel_buffer_size: settings.channel_buffer_size.max(1),
        }
    }

    /// Zero is raised to one millisecond.
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_channel_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer_size = size.max(1);
        self
    }
}

/// Connection status updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Reconnecting,
}

/// What an incoming text frame asks of the client.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Application-level heartbeat; answer with `pong`.
    Ping,
    Push(PushMessage),
    /// Not a push message (unknown tag, bad payload, server chatter).
    Ignored,
}

impl Frame {
    pub fn parse(text: &str) -> Self {
        if text == "ping" {
            return Frame::Ping;
        }
        match serde_json::from_str::<PushMessage>(text) {
            Ok(message) => Frame::Push(message),
            Err(e) => {
                warn!(error = %e, "dropping unparseable push message");
                debug!(raw = text, "raw push frame");
                Frame::Ignored
            }
        }
    }
}

pub struct PushFeedClient {
    config: PushFeedConfig,
}

impl PushFeedClient {
    pub fn new(config: PushFeedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PushFeedConfig {
        &self.config
    }

    /// Spawn the connection loop.
    ///
    /// Returns the message receiver and the status receiver. The loop ends
    /// once the message receiver is dropped.
    pub fn start(
        self,
    ) -> (
        mpsc::Receiver<PushMessage>,
        mpsc::Receiver<ConnectionStatus>,
    ) {
        let (message_tx, message_rx) = mpsc::channel(self.config.channel_buffer_size);
        let (status_tx, status_rx) = mpsc::channel(16);

        tokio::spawn(run_push_loop(self.config, message_tx, status_tx));

        (message_rx, status_rx)
    }
}

async fn run_push_loop(
    config: PushFeedConfig,
    message_tx: mpsc::Sender<PushMessage>,
    status_tx: mpsc::Sender<ConnectionStatus>,
) {
    info!(url = %config.url, "starting push feed");

    while !message_tx.is_closed() {
        let _ = status_tx.try_send(ConnectionStatus::Reconnecting);

        match connect_async(config.url.as_str()).await {
            Ok((stream, _)) => {
                info!(url = %config.url, "push feed connected");
                let _ = status_tx.try_send(ConnectionStatus::Connected);

                let (mut write, mut read) = stream.split();

                // Writer task: keep-alive pings plus replies from the read loop.
                let (out_tx, mut out_rx) = mpsc::channel::<Message>(8);
                let ping_interval = config.ping_interval;
                let writer = tokio::spawn(async move {
                    let mut interval = tokio::time::interval(ping_interval);
                    interval.tick().await;
                    loop {
                        tokio::select! {
                            _ = interval.tick() => {
                                if write.send(Message::Ping(Vec::new().into())).await.is_err() {
                                    debug!("ping failed, connection likely dead");
                                    break;
                                }
                            }
                            outgoing = out_rx.recv() => {
                                let Some(msg) = outgoing else { break };
                                if write.send(msg).await.is_err() {
                                    debug!("write failed, connection likely dead");
                                    break;
                                }
                            }
                        }
                    }
                });

                while let Some(msg) = read.next().await {
                    match msg {
                        Ok(Message::Text(text)) => match Frame::parse(text.as_str()) {
                            Frame::Ping => {
                                let _ = out_tx.send(Message::Text("pong".into())).await;
                            }
                            Frame::Push(message) => {
                                debug!(kind = message.kind(), "push message received");
                                if message_tx.send(message).await.is_err() {
                                    info!("push receiver dropped, stopping feed");
                                    break;
                                }
                            }
                            Frame::Ignored => {}
                        },
                        Ok(Message::Close(_)) => {
                            info!("server closed push feed");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "push feed error");
                            break;
                        }
                    }
                }

                drop(out_tx);
                writer.abort();
                let _ = status_tx.try_send(ConnectionStatus::Disconnected);
            }
            Err(e) => {
                warn!(url = %config.url, error = %e, "push feed connect failed");
                let _ = status_tx.try_send(ConnectionStatus::Disconnected);
            }
        }

        if message_tx.is_closed() {
            break;
        }
        debug!(delay = ?config.reconnect_delay, "waiting before reconnect");
        tokio::time::sleep(config.reconnect_delay).await;
    }

    info!("push feed stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_follows_settings() {
        let config = PushFeedConfig::default();
        assert_eq!(config.url, "ws://127.0.0.1:8000/ws");
        assert_eq!(config.ping_interval, Duration::from_secs(25));
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
        assert_eq!(config.channel_buffer_size, 1024);
    }

    #[test]
    fn config_builder() {
        let config = PushFeedConfig::new("ws://localhost:9000")
            .with_ping_interval(Duration::from_secs(5))
            .with_reconnect_delay(Duration::from_millis(500))
            .with_channel_buffer_size(0);

        assert_eq!(config.url, "ws://localhost:9000");
        assert_eq!(config.ping_interval, Duration::from_secs(5));
        assert_eq!(config.reconnect_delay, Duration::from_millis(500));
        assert_eq!(config.channel_buffer_size, 1);
    }

    #[test]
    fn frame_parse() {
        assert_eq!(Frame::parse("ping"), Frame::Ping);
        assert_eq!(Frame::parse(r#"{"type":"unknown","data":{}}"#), Frame::Ignored);
        assert_eq!(Frame::parse("not json"), Frame::Ignored);

        let frame = Frame::parse(r#"{"type":"new_candle","data":{"time":60,"open":1,"high":2,"low":0.5,"close":1.5}}"#);
        match frame {
            Frame::Push(PushMessage::NewCandle(bar)) => assert_eq!(bar.time, 60),
            other => panic!("unexpected frame {other:?}"),
        }
    }
}
