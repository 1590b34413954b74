//! Forwarding actions to the input injector.
//!
//! Each browser session gets its own TCP connection to the upstream
//! consumer.  Actions travel as newline-delimited JSON, one object per line:
//!
//! ```text
//! {"kind":"move","dx":4.2,"dy":-1.0}
//! {"kind":"click","button":"left","press":true}
//! ```
//!
//! When no upstream is configured, or it cannot be reached, actions are
//! logged at `info` level instead so the bridge stays usable for testing a
//! phone against a desktop without an injector running.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use trackpad_core::Action;

/// A TCP connection to the action consumer.
pub struct UpstreamConnection {
    write_half: OwnedWriteHalf,
}

impl UpstreamConnection {
    /// Opens a new TCP connection to `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection cannot be established.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::net::SocketAddr;
    /// use trackpad_bridge::infrastructure::upstream::UpstreamConnection;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let addr: SocketAddr = "127.0.0.1:24811".parse()?;
    /// let conn = UpstreamConnection::connect(addr).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("failed to connect to upstream at {addr}"))?;
        stream.set_nodelay(true).ok();

        // The consumer never talks back; only the write half is kept.
        let (_read_half, write_half) = stream.into_split();
        Ok(Self { write_half })
    }

    /// Writes one action as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub async fn send(&mut self, action: &Action) -> anyhow::Result<()> {
        let line = encode_action_line(action)?;
        self.write_half
            .write_all(line.as_bytes())
            .await
            .context("write to upstream failed")
    }
}

/// Serialises `action` as a single JSON line terminated by `\n`.
///
/// # Errors
///
/// Returns an error if serde cannot encode the action (non-finite floats
/// encode as `null`, so this is not expected in practice).
pub fn encode_action_line(action: &Action) -> anyhow::Result<String> {
    let mut line = serde_json::to_string(action).context("failed to encode action")?;
    line.push('\n');
    Ok(line)
}

/// Drains `rx` until every sender is dropped, delivering each action
/// upstream or to the log.
///
/// A write failure drops the connection and falls back to logging for the
/// rest of the session.
pub async fn forward_actions(
    mut rx: mpsc::UnboundedReceiver<Action>,
    upstream: Option<SocketAddr>,
    session_id: String,
) {
    let mut conn = match upstream {
        Some(addr) => match UpstreamConnection::connect(addr).await {
            Ok(conn) => {
                info!("session {session_id}: forwarding actions to {addr}");
                Some(conn)
            }
            Err(e) => {
                warn!("session {session_id}: {e:#}; logging actions instead");
                None
            }
        },
        None => None,
    };

    while let Some(action) = rx.recv().await {
        if let Some(c) = conn.as_mut() {
            match c.send(&action).await {
                Ok(()) => {
                    debug!("session {session_id}: sent {}", action.kind_name());
                    continue;
                }
                Err(e) => {
                    warn!("session {session_id}: {e:#}; logging actions instead");
                    conn = None;
                }
            }
        }
        info!(session = %session_id, action = %action.log_summary(), "action");
    }

    debug!("session {session_id}: action stream closed");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
