//! Sandbox host: owns the single isolated execution surface for a preview
//! and the inbound half of the bridge channel.
//!
//! The sandbox realm is memory-isolated from the host; all interaction is
//! asynchronous message passing. The embedding layer (a webview, an iframe
//! glue script, or a test) holds a [`SandboxHandle`] and posts raw JSON
//! payloads through it. Handles carry the instance id they were minted for,
//! so messages from a torn-down instance identify themselves and can be
//! discarded.

use crate::error::PreviewError;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Inbound queue depth; a non-responsive consumer back-pressures the
/// embedding layer instead of growing without bound.
pub const INBOUND_QUEUE: usize = 64;

/// Capability flags for an iframe-style embedding: scripting and same-realm
/// storage stay on so previews function; top-level navigation and host
/// cookies/storage remain unreachable; forms, dialogs, and popups are
/// allowed.
pub const SANDBOX_CAPABILITIES: &str =
    "allow-scripts allow-same-origin allow-forms allow-modals allow-popups";

/// One raw message from the sandbox realm, tagged with the posting
/// instance.
#[derive(Debug)]
pub struct InboundEnvelope {
    pub instance: Uuid,
    pub payload: serde_json::Value,
}

/// One isolated execution context, bound 1:1 to the document it renders.
/// Never patched in place — superseded wholesale on every refresh.
#[derive(Debug, Clone)]
pub struct SandboxInstance {
    pub id: Uuid,
    pub document: String,
    pub mounted_at: DateTime<Utc>,
}

/// Owns the lifecycle of exactly one live [`SandboxInstance`].
#[derive(Debug)]
pub struct SandboxHost {
    inbound_tx: mpsc::Sender<InboundEnvelope>,
    live: Option<SandboxInstance>,
}

impl SandboxHost {
    /// Initializes the host with no live instance. The returned receiver is
    /// the single inbound bridge channel; the engine drains it.
    pub fn new() -> (SandboxHost, mpsc::Receiver<InboundEnvelope>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE);
        (
            SandboxHost {
                inbound_tx,
                live: None,
            },
            inbound_rx,
        )
    }

    /// Full destructive reload: tears down any previous instance and mounts
    /// a fresh one for `document`. Sandbox-local runtime state from the old
    /// instance is gone by design. Returns a handle the embedding layer
    /// posts through.
    pub fn render(&mut self, document: String) -> SandboxHandle {
        let instance = SandboxInstance {
            id: Uuid::new_v4(),
            document,
            mounted_at: Utc::now(),
        };
        let handle = SandboxHandle {
            instance: instance.id,
            tx: self.inbound_tx.clone(),
        };
        self.live = Some(instance);
        handle
    }

    pub fn live(&self) -> Option<&SandboxInstance> {
        self.live.as_ref()
    }

    /// Staleness guard: only the live instance's messages are accepted.
    pub fn accepts(&self, instance: Uuid) -> bool {
        self.live.as_ref().is_some_and(|live| live.id == instance)
    }

    /// Destroys the live instance. Messages already in flight from it will
    /// fail the [`SandboxHost::accepts`] check.
    pub fn teardown(&mut self) {
        self.live = None;
    }
}

/// Posting side of the bridge for one specific instance. Cloneable; stale
/// clones keep working but their messages are discarded by the engine.
#[derive(Debug, Clone)]
pub struct SandboxHandle {
    instance: Uuid,
    tx: mpsc::Sender<InboundEnvelope>,
}

impl SandboxHandle {
    pub fn instance(&self) -> Uuid {
        self.instance
    }

    /// Posts one raw payload from the sandbox realm to the host.
    pub async fn post(&self, payload: serde_json::Value) -> Result<(), PreviewError> {
        self.tx
            .send(InboundEnvelope {
                instance: self.instance,
                payload,
            })
            .await
            .map_err(|_| PreviewError::EngineClosed)
    }
}
