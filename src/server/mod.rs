//! The tinyland host: websocket ingestion/render edge, UDP fiducial edge,
//! and the single engine task that owns all scene state.
//!
//! The engine never runs concurrently with itself. Both edges feed one mpsc
//! channel; the engine task applies each mutation, drains the reactive loop
//! (soft-capped per tick), and broadcasts a render envelope to every
//! connected websocket client.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::{accept_async, tungstenite::Message};

use dotenvy::dotenv;

use crate::config::ServerConfig;
use crate::engine::TinylandEngine;
use models::SceneMessage;

pub mod models;
pub mod osc;
pub mod render;
pub mod rules;

/// Ingestion channel depth; edges block (briefly) rather than flood the
/// engine.
const INGEST_QUEUE: usize = 256;
const RENDER_QUEUE: usize = 32;

pub async fn run() {
    dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    run_with_config(config).await;
}

pub async fn run_with_config(config: ServerConfig) {
    let (ingest_tx, ingest_rx) = mpsc::channel::<SceneMessage>(INGEST_QUEUE);
    let (render_tx, _) = broadcast::channel::<String>(RENDER_QUEUE);

    // UDP fiducial adapter.
    let udp_addr = config.udp_addr();
    match UdpSocket::bind(&udp_addr).await {
        Ok(socket) => {
            log::info!("listening for TUIO fiducials on udp://{}", udp_addr);
            tokio::spawn(udp_task(socket, ingest_tx.clone()));
        }
        Err(e) => {
            log::error!("could not bind UDP {}: {}", udp_addr, e);
            std::process::exit(1);
        }
    }

    // Websocket edge.
    let ws_addr = config.ws_addr();
    let listener = match TcpListener::bind(&ws_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("could not bind websocket {}: {}", ws_addr, e);
            std::process::exit(1);
        }
    };
    log::info!("tinyland websocket on ws://{}", ws_addr);
    {
        let ingest_tx = ingest_tx.clone();
        let render_tx = render_tx.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        log::debug!("websocket client connected: {}", peer);
                        tokio::spawn(client_task(
                            stream,
                            ingest_tx.clone(),
                            render_tx.subscribe(),
                        ));
                    }
                    Err(e) => {
                        log::error!("accept failed: {}", e);
                        return;
                    }
                }
            }
        });
    }

    engine_task(config, ingest_rx, render_tx).await;
}

/// Receive OSC datagrams and forward the marker mutations they carry.
async fn udp_task(socket: UdpSocket, ingest: mpsc::Sender<SceneMessage>) {
    let mut buf = [0u8; 2048];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, _)) => match osc::decode_fiducials(&buf[..len]) {
                Ok(updates) => {
                    for update in updates {
                        if ingest.send(update).await.is_err() {
                            return;
                        }
                    }
                }
                Err(e) => log::debug!("ignoring malformed OSC packet: {}", e),
            },
            Err(e) => {
                log::error!("UDP receive failed: {}", e);
                return;
            }
        }
    }
}

/// One websocket client: scene messages in, render envelopes out.
async fn client_task(
    stream: TcpStream,
    ingest: mpsc::Sender<SceneMessage>,
    mut render_rx: broadcast::Receiver<String>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            log::warn!("websocket handshake failed: {}", e);
            return;
        }
    };
    let (mut sink, mut source) = ws_stream.split();

    loop {
        tokio::select! {
            frame = render_rx.recv() => match frame {
                Ok(text) => {
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // A renderer only needs the latest scene anyway.
                    log::debug!("client lagging, skipped {} frames", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<SceneMessage>(&text) {
                        Ok(message) => {
                            if ingest.send(message).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => log::warn!("ignoring malformed scene message: {}", e),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // pings and pongs handled by tungstenite
                Some(Err(e)) => {
                    log::debug!("websocket read failed: {}", e);
                    break;
                }
            },
        }
    }
}

/// The engine's single thread of execution: apply a mutation, drain, render.
async fn engine_task(
    config: ServerConfig,
    mut ingest_rx: mpsc::Receiver<SceneMessage>,
    render_tx: broadcast::Sender<String>,
) {
    let mut engine = TinylandEngine::new();
    let mut rule_file = rules::RuleFile::new(&config.rules_file);
    match rule_file.reload_if_changed(&mut engine) {
        Ok(count) => log::info!("loaded {} rules from {}", count, config.rules_file),
        Err(e) => log::warn!("no rules loaded from {}: {}", config.rules_file, e),
    }

    while let Some(message) = ingest_rx.recv().await {
        match rule_file.reload_if_changed(&mut engine) {
            Ok(0) => {}
            Ok(count) => log::info!("reloaded {} rules from {}", count, config.rules_file),
            Err(e) => log::warn!("rule reload failed: {}", e),
        }

        apply_message(&mut engine, message);

        let mut drains = 0;
        while engine.execute_loop() {
            drains += 1;
            if drains >= config.max_drains_per_tick {
                log::warn!(
                    "drain cap {} reached with {} work items pending; deferring to next tick",
                    config.max_drains_per_tick,
                    engine.pending_work()
                );
                break;
            }
        }

        match serde_json::to_string(&render::render_envelope(engine.scene())) {
            Ok(frame) => {
                // No subscribers is fine; the scene is still live.
                let _ = render_tx.send(frame);
            }
            Err(e) => log::error!("render serialization failed: {}", e),
        }
    }
}

/// Host convention for the ingestion edge: an id already in the scene means
/// update, otherwise create.
fn apply_message(engine: &mut TinylandEngine, message: SceneMessage) {
    let (id, object) = message.into_parts();
    if engine.scene().contains(&id) {
        if let Err(e) = engine.update(&id, object.attrs) {
            log::warn!("ingestion update on '{}' failed: {}", id, e);
        }
    } else {
        engine.create(&id, object);
    }
}
