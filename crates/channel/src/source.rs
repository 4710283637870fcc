//! WebSocket implementation of the notification event source.

use crate::config::ChannelConfig;
use crate::state::{ConnectionEvent, ConnectionMachine, ConnectionState};
use futures_util::{SinkExt, StreamExt};
use notify_core::{EventSource, SessionCredential, Subscription};
use notify_types::RawEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, sleep, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};
use url::Url;

/// Connects to the notification channel once per session and reconnects with backoff.
pub struct WebSocketSource {
    config: ChannelConfig,
    state: Arc<watch::Sender<ConnectionState>>,
    current: Arc<AtomicU64>,
}

impl WebSocketSource {
    pub fn new(config: ChannelConfig) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            state: Arc::new(state),
            current: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Follows the state of the most recent subscription.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }
}

impl EventSource for WebSocketSource {
    fn subscribe(&self, credential: &SessionCredential) -> Subscription {
        let (events_tx, events_rx) = mpsc::channel(self.config.event_buffer());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;

        let worker = ChannelWorker {
            endpoint: self.config.endpoint_for(credential),
            config: self.config.clone(),
            events: events_tx,
            shutdown: shutdown_rx,
            state: self.state.clone(),
            current: self.current.clone(),
            generation,
            machine: ConnectionMachine::new(self.config.backoff()),
        };
        tokio::spawn(worker.run());

        Subscription::new(events_rx, shutdown_tx)
    }
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum ListenEnd {
    Shutdown,
    ReceiverGone,
    Dropped(String),
}

struct ChannelWorker {
    endpoint: Url,
    config: ChannelConfig,
    events: mpsc::Sender<RawEvent>,
    shutdown: watch::Receiver<bool>,
    state: Arc<watch::Sender<ConnectionState>>,
    current: Arc<AtomicU64>,
    generation: u64,
    machine: ConnectionMachine,
}

impl ChannelWorker {
    async fn run(mut self) {
        self.apply(ConnectionEvent::Start);

        loop {
            match self.machine.state() {
                ConnectionState::Connecting => {
                    if self.events.is_closed() {
                        break;
                    }
                    let connected = tokio::select! {
                        res = connect_async(self.endpoint.as_str()) => res,
                        _ = shutdown_signalled(&mut self.shutdown) => break,
                    };
                    match connected {
                        Ok((socket, _)) => {
                            info!("Connected to notification channel");
                            self.apply(ConnectionEvent::ConnectSucceeded);
                            match self.listen(socket).await {
                                ListenEnd::Shutdown | ListenEnd::ReceiverGone => break,
                                ListenEnd::Dropped(reason) => {
                                    warn!("Notification channel dropped: {}", reason);
                                    self.apply(ConnectionEvent::Dropped);
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Notification channel connect failed: {}", e);
                            self.apply(ConnectionEvent::ConnectFailed);
                        }
                    }
                }
                ConnectionState::Backoff { attempt } => {
                    let delay = self.config.backoff().delay(attempt);
                    info!("Reconnecting in {:?} (attempt {})", delay, attempt + 1);
                    tokio::select! {
                        _ = sleep(delay) => self.apply(ConnectionEvent::BackoffElapsed),
                        _ = shutdown_signalled(&mut self.shutdown) => break,
                    }
                }
                ConnectionState::Disconnected | ConnectionState::Open => {
                    if self.machine.exhausted() {
                        error!(
                            "Notification channel gave up after {} reconnection attempts",
                            self.config.backoff().max_attempts
                        );
                    }
                    break;
                }
            }
        }

        self.apply(ConnectionEvent::Stop);
        debug!("Notification channel worker stopped");
    }

    async fn listen(&mut self, socket: Socket) -> ListenEnd {
        let (mut write, mut read) = socket.split();
        let period = self.config.ping_interval();
        let mut ping = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = shutdown_signalled(&mut self.shutdown) => {
                    info!("Closing notification channel");
                    let _ = write.close().await;
                    return ListenEnd::Shutdown;
                }

                _ = ping.tick() => {
                    if let Err(e) = write.send(Message::Ping(Vec::new())).await {
                        return ListenEnd::Dropped(format!("ping failed: {}", e));
                    }
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => match RawEvent::decode(&text) {
                            Ok(event) => {
                                if self.events.send(event).await.is_err() {
                                    let _ = write.close().await;
                                    return ListenEnd::ReceiverGone;
                                }
                            }
                            Err(e) => warn!("Dropping notification frame: {}", e),
                        },
                        Some(Ok(Message::Binary(data))) => {
                            debug!("Ignoring {}-byte binary frame", data.len());
                        }
                        Some(Ok(Message::Close(frame))) => {
                            return ListenEnd::Dropped(format!("closed by server ({:?})", frame));
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return ListenEnd::Dropped(e.to_string()),
                        None => return ListenEnd::Dropped("stream ended".into()),
                    }
                }
            }
        }
    }

    /// Advances the machine and publishes the result unless a newer subscription has started.
    fn apply(&mut self, event: ConnectionEvent) {
        let state = self.machine.handle(event);
        let (current, generation) = (&self.current, self.generation);
        // Checked under the watch lock so a stale write cannot land after a newer one.
        self.state.send_if_modified(|published| {
            if current.load(Ordering::SeqCst) != generation {
                return false;
            }
            *published = state;
            true
        });
    }
}

/// Resolves once shutdown is requested or the subscription handle is dropped.
async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
