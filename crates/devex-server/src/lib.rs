//! Development server with hot reload for the devex-growth directory.
//!
//! Serves the generated page and a small JSON API, regenerates the site when the
//! data file changes, and tells connected browsers to reload over a WebSocket.

pub mod rebuild;
pub mod security;
pub mod server;
pub mod watcher;
pub mod websocket;

pub use rebuild::{RebuildGuard, RebuildState, RebuildTicket};
pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ClientId, HmrMessage, ReloadHub};
