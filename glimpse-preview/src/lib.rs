//! # Glimpse preview host
//!
//! Stateful side of the Glimpse live preview engine. Each preview surface
//! gets a [`engine::PreviewEngine`] running as one serial event loop that:
//!
//! - debounces FileMap edits and drives full recompose+reload cycles
//!   through a [`sandbox::SandboxHost`] (one live instance, destroyed and
//!   recreated on every refresh — never patched in place);
//! - decodes inbound bridge messages ([`protocol::BridgeMessage`]) into log
//!   entries, hover state, and selection state, discarding anything
//!   malformed or posted by a torn-down instance;
//! - keeps a bounded [`diagnostics::DiagnosticBuffer`] and produces the
//!   [`diagnostics::FixRequest`] hand-off for the external fix
//!   collaborator;
//! - tracks [`viewport::ViewportState`] device-preset presentation.
//!
//! [`store`] registers many sessions in one process, mirroring the editor's
//! tabs. Document synthesis itself lives in the `glimpse-compose` crate.

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod sandbox;
pub mod store;
pub mod viewport;

pub use diagnostics::{DiagnosticBuffer, DiagnosticCounts, FixRequest, LogEntry, LOG_CAPACITY};
pub use engine::{
    EngineCommand, EngineConfig, EngineEvent, PreviewEngine, RefreshState, DEBOUNCE_WINDOW,
    SNIPPET_LIMIT,
};
pub use error::{PreviewError, PreviewResult};
pub use protocol::{BridgeMessage, HoverInfo, LogKind, SelectionInfo};
pub use sandbox::{
    InboundEnvelope, SandboxHandle, SandboxHost, SandboxInstance, SANDBOX_CAPABILITIES,
};
pub use store::{new_session_store, PreviewSession, SessionStore};
pub use viewport::{DevicePreset, ViewportState, DEVICE_PRESETS, MAX_SCALE, MIN_SCALE};

// Re-exported so hosts depend on one crate.
pub use glimpse_compose::{compose, ComposedDocument, DocumentKind, FileMap};
