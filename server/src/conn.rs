use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use artillery_core::ClientId;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::hub::HubCommand;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Accept sockets forever, one task per connection.
pub async fn serve(addr: &str, hub: mpsc::UnboundedSender<HubCommand>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            }
        };
        let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
        debug!(client = id, %peer, "tcp accepted");
        tokio::spawn(handle_connection(stream, id, hub.clone()));
    }
}

/// Pump one WebSocket: inbound text goes to the hub, hub output goes back
/// out. Any failure ends only this connection.
async fn handle_connection(stream: TcpStream, id: ClientId, hub: mpsc::UnboundedSender<HubCommand>) {
    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(err) => {
            debug!(client = id, %err, "websocket handshake failed");
            return;
        }
    };
    let (mut sink, mut source) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    if hub.send(HubCommand::Connect { id, tx }).is_err() {
        return;
    }

    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(err) = sink.send(Message::text(text)).await {
                debug!(client = id, %err, "websocket send failed");
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let text = text.to_string();
                if hub.send(HubCommand::Text { id, text }).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(client = id, %err, "websocket read failed");
                break;
            }
        }
    }

    let _ = hub.send(HubCommand::Disconnect { id });
    writer.abort();
}
