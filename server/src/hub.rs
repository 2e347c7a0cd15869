use std::collections::HashMap;
use std::time::Duration;

use artillery_core::{ClientId, Outbound, Session, Target};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Sender half of one client's outgoing text frames.
pub type ClientTx = mpsc::UnboundedSender<String>;

#[derive(Debug)]
pub enum HubCommand {
    Connect { id: ClientId, tx: ClientTx },
    Text { id: ClientId, text: String },
    Disconnect { id: ClientId },
}

/// Sole owner of the game session. Sockets talk to it through
/// [`HubCommand`]s; it answers through each client's channel.
pub struct Hub {
    session: Session,
    clients: HashMap<ClientId, ClientTx>,
}

impl Hub {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            clients: HashMap::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handle(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Connect { id, tx } => {
                let seat = self.session.connect(id);
                self.clients.insert(id, tx);
                info!(client = id, ?seat, clients = self.clients.len(), "client connected");
            }
            HubCommand::Text { id, text } => {
                let out = self.session.handle_text(id, &text);
                if out.iter().any(|o| matches!(o.message, artillery_core::ServerMessage::Reset { .. })) {
                    info!(client = id, seed = self.session.game().state().seed, "game reset");
                }
                self.deliver(out);
            }
            HubCommand::Disconnect { id } => {
                self.clients.remove(&id);
                let out = self.session.disconnect(id);
                info!(client = id, clients = self.clients.len(), "client disconnected");
                self.deliver(out);
            }
        }
    }

    /// One simulation step plus its broadcasts.
    pub fn tick(&mut self) {
        let out = self.session.tick();
        self.deliver(out);
    }

    fn deliver(&mut self, out: Vec<Outbound>) {
        for Outbound { to, message } in out {
            let text = match message.encode() {
                Ok(text) => text,
                Err(err) => {
                    warn!(%err, "failed to encode server message");
                    continue;
                }
            };
            match to {
                Target::All => {
                    for (id, tx) in &self.clients {
                        if tx.send(text.clone()).is_err() {
                            debug!(client = id, "send to closed client");
                        }
                    }
                }
                Target::One(id) => {
                    if let Some(tx) = self.clients.get(&id) {
                        if tx.send(text).is_err() {
                            debug!(client = id, "send to closed client");
                        }
                    }
                }
            }
        }
    }

    /// Drive the session at `tick_rate` until every command sender is gone.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<HubCommand>, tick_rate: u32) {
        let period = Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => self.tick(),
                cmd = rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
            }
        }
        info!("hub stopped");
    }
}
