//! WebSocket-based hot reload.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Messages sent to clients for hot reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// Connection established
    Connected,
}

/// Identifier handed out by [`ReloadHub::register`].
pub type ClientId = u64;

/// Registry of connected hot-reload clients.
///
/// The hub owns each client's sending half for as long as the client is
/// registered; broadcasts iterate a snapshot of the current members.
#[derive(Debug, Default)]
pub struct ReloadHub {
    clients: Mutex<HashMap<ClientId, mpsc::UnboundedSender<HmrMessage>>>,
    next_id: AtomicU64,
}

impl ReloadHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client and return its id and message stream.
    pub fn register(&self) -> (ClientId, mpsc::UnboundedReceiver<HmrMessage>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().insert(id, tx);
        tracing::info!("Client connected for hot reload");
        (id, rx)
    }

    /// Remove a client. Unknown ids are ignored.
    pub fn unregister(&self, id: ClientId) {
        if self.lock().remove(&id).is_some() {
            tracing::info!("Client disconnected");
        }
    }

    /// Send a message to every registered client.
    ///
    /// Clients whose stream has closed are dropped from the registry. Returns the
    /// number of clients the message was delivered to.
    pub fn broadcast(&self, msg: HmrMessage) -> usize {
        let snapshot: Vec<(ClientId, mpsc::UnboundedSender<HmrMessage>)> = self
            .lock()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut delivered = 0;
        for (id, tx) in snapshot {
            if tx.send(msg.clone()).is_ok() {
                delivered += 1;
            } else {
                self.unregister(id);
            }
        }
        delivered
    }

    /// Number of registered clients.
    pub fn client_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ClientId, mpsc::UnboundedSender<HmrMessage>>> {
        self.clients.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Generate the client-side hot reload script.
///
/// The socket URL is derived from the page location, so the script works on any
/// host and port the server is bound to.
pub fn hmr_client_script(path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  const ws = new WebSocket(scheme + location.host + '{}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  ws.onopen = function() {{
    console.log('[HMR] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);
    console.log('[HMR]', msg.type);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'connected':
        console.log('[HMR] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[HMR] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        console.log('[HMR] Reconnecting...');
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  ws.onerror = function(e) {{
    console.error('[HMR] WebSocket error:', e);
  }};
}})();
"#,
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_to_every_client() {
        let hub = ReloadHub::new();
        let (_, mut first) = hub.register();
        let (_, mut second) = hub.register();

        let delivered = hub.broadcast(HmrMessage::Reload);

        assert_eq!(delivered, 2);
        assert_eq!(first.try_recv().unwrap(), HmrMessage::Reload);
        assert_eq!(second.try_recv().unwrap(), HmrMessage::Reload);
    }

    #[test]
    fn unregistered_clients_receive_nothing() {
        let hub = ReloadHub::new();
        let (id, mut rx) = hub.register();

        hub.unregister(id);
        let delivered = hub.broadcast(HmrMessage::Reload);

        assert_eq!(delivered, 0);
        assert_eq!(hub.client_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn broadcast_prunes_closed_clients() {
        let hub = ReloadHub::new();
        let (_, rx) = hub.register();
        let (_, mut alive) = hub.register();
        drop(rx);

        let delivered = hub.broadcast(HmrMessage::Reload);

        assert_eq!(delivered, 1);
        assert_eq!(hub.client_count(), 1);
        assert_eq!(alive.try_recv().unwrap(), HmrMessage::Reload);
    }

    #[test]
    fn serializes_messages() {
        let json = serde_json::to_string(&HmrMessage::Reload).unwrap();

        assert_eq!(json, r#"{"type":"reload"}"#);
    }

    #[test]
    fn client_script_targets_path() {
        let script = hmr_client_script("/__hmr");

        assert!(script.contains("location.host + '/__hmr'"));
        assert!(script.contains("case 'reload'"));
    }
}
